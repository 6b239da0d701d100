//! Section 3: hyperparameter sweep tables, one tab per sweep
//!
//! Perplexity renders to 2 decimal places, coherence to 4. Numeric cells
//! get the highlight class; symbolic priors stay unstyled.

use super::{html_escape, PageParams, SweepTab};
use crate::bundle::{Cell, SweepRow};
use std::fmt::Write;

pub fn fmt_perplexity(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn fmt_coherence(value: f64) -> String {
    format!("{:.4}", value)
}

pub fn render(alpha: &[SweepRow], beta: &[SweepRow], params: &PageParams) -> String {
    let (rows, label) = match params.tab {
        SweepTab::Alpha => (alpha, "Alpha"),
        SweepTab::Beta => (beta, "Beta"),
    };

    format!(
        r#"            <div class="section">
                <h2>&#128200; Model Evaluation</h2>
{tabs}
{table}
            </div>"#,
        tabs = render_tabs(params),
        table = render_table(rows, label),
    )
}

fn render_tabs(params: &PageParams) -> String {
    let mut out = String::new();
    out.push_str("                <div class=\"tabs\">\n");
    for (tab, label) in [(SweepTab::Alpha, "Alpha Parameter"), (SweepTab::Beta, "Beta Parameter")] {
        let class = if tab == params.tab { " class=\"active\"" } else { "" };
        let _ = writeln!(
            out,
            "                    <a{class} href=\"?page={page}&amp;page_size={size}&amp;tab={tab}\">{label}</a>",
            page = params.page,
            size = params.page_size,
            tab = tab.as_query(),
        );
    }
    out.push_str("                </div>");
    out
}

fn render_table(rows: &[SweepRow], label: &str) -> String {
    if rows.is_empty() {
        return format!(
            "                <p class=\"empty\">No {} sweep results in this bundle.</p>",
            label.to_lowercase()
        );
    }

    let mut out = String::new();
    out.push_str(
        "                <table>\n                    <thead><tr><th>Alpha</th><th>Beta</th><th>Perplexity</th><th>Coherence</th></tr></thead>\n                    <tbody>\n",
    );
    for row in rows {
        let _ = writeln!(
            out,
            "                        <tr>{}{}{}{}</tr>",
            param_cell(&row.alpha),
            param_cell(&row.beta),
            numeric_cell(&fmt_perplexity(row.perplexity)),
            numeric_cell(&fmt_coherence(row.coherence)),
        );
    }
    out.push_str("                    </tbody>\n                </table>");
    out
}

fn param_cell(cell: &Cell) -> String {
    if cell.is_numeric() {
        numeric_cell(&cell.to_string())
    } else {
        format!("<td>{}</td>", html_escape(&cell.to_string()))
    }
}

fn numeric_cell(text: &str) -> String {
    format!("<td class=\"numeric\">{}</td>", text)
}
