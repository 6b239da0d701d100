//! Section 1: paginated raw-data table
//!
//! Collapsed by default; paging state lives in the query string so every
//! interaction is a plain navigation.

use super::{html_escape, value_text, PageParams, PAGE_SIZES};
use crate::bundle::Record;
use std::fmt::Write;

/// Number of pages for a dataset: `ceil(len / page_size)`, minimum 1.
pub fn page_count(len: usize, page_size: usize) -> usize {
    if len == 0 {
        1
    } else {
        (len + page_size - 1) / page_size
    }
}

/// Half-open row window `[(page-1)*size, page*size)` clipped to the data.
/// `page` is 1-based and assumed already clamped.
pub fn page_bounds(len: usize, page: usize, page_size: usize) -> (usize, usize) {
    let start = (page.saturating_sub(1) * page_size).min(len);
    let end = (page * page_size).min(len);
    (start, end)
}

pub fn render(dataset: &[Record], params: &PageParams) -> String {
    let pages = page_count(dataset.len(), params.page_size);
    let (start, end) = page_bounds(dataset.len(), params.page, params.page_size);

    let mut out = String::new();
    out.push_str("            <details class=\"section\">\n");
    out.push_str("                <summary>&#128193; Raw Comment Data</summary>\n");
    out.push_str(&render_pager(params, pages));

    if dataset.is_empty() {
        out.push_str("                <p class=\"empty\">No documents in this bundle.</p>\n");
    } else {
        out.push_str(&render_table(dataset, start, end));
    }

    let _ = writeln!(
        out,
        "                <p class=\"empty\">Showing rows {}&ndash;{} of {}</p>",
        if end == start { start } else { start + 1 },
        end,
        dataset.len()
    );
    out.push_str("            </details>");
    out
}

fn render_pager(params: &PageParams, pages: usize) -> String {
    let tab = params.tab.as_query();
    let mut out = String::new();
    out.push_str("                <div class=\"pager\">\n");

    // Page-size selector navigates back to page 1.
    out.push_str("                    <label>Rows per page\n");
    let _ = writeln!(
        out,
        "                    <select onchange=\"location.href='?page=1&amp;page_size=' + this.value + '&amp;tab={}'\">",
        tab
    );
    for size in PAGE_SIZES {
        let selected = if size == params.page_size {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "                        <option value=\"{size}\"{selected}>{size}</option>"
        );
    }
    out.push_str("                    </select></label>\n");

    let prev = params.page.saturating_sub(1).max(1);
    let next = (params.page + 1).min(pages);
    let prev_class = if params.page == 1 { " class=\"disabled\"" } else { "" };
    let next_class = if params.page == pages {
        " class=\"disabled\""
    } else {
        ""
    };
    let _ = writeln!(
        out,
        "                    <a{prev_class} href=\"?page={prev}&amp;page_size={size}&amp;tab={tab}\">&larr; Prev</a>",
        size = params.page_size,
    );
    let _ = writeln!(
        out,
        "                    <span>Page {} of {}</span>",
        params.page, pages
    );
    let _ = writeln!(
        out,
        "                    <a{next_class} href=\"?page={next}&amp;page_size={size}&amp;tab={tab}\">Next &rarr;</a>",
        size = params.page_size,
    );
    out.push_str("                </div>\n");
    out
}

fn render_table(dataset: &[Record], start: usize, end: usize) -> String {
    // Column order comes from the first record of the dataset.
    let columns: Vec<&String> = match dataset.first() {
        Some(record) => record.keys().collect(),
        None => Vec::new(),
    };

    let mut out = String::new();
    out.push_str("                <table>\n                    <thead><tr><th>#</th>");
    for column in &columns {
        let _ = write!(out, "<th>{}</th>", html_escape(column));
    }
    out.push_str("</tr></thead>\n                    <tbody>\n");

    for (offset, record) in dataset[start..end].iter().enumerate() {
        let _ = write!(out, "                        <tr><td>{}</td>", start + offset);
        for column in &columns {
            let text = record.get(*column).map(value_text).unwrap_or_default();
            let _ = write!(out, "<td>{}</td>", html_escape(&text));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("                    </tbody>\n                </table>\n");
    out
}
