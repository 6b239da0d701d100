//! Server-side page rendering
//!
//! Every section is a pure function of the loaded bundle and the request's
//! view parameters; `render_page` stitches the fragments into the full
//! document. Each interaction round-trips through the query string and
//! re-renders the whole page from the cached bundle.

pub mod dataset;
pub mod metrics;
pub mod sidebar;
pub mod sweep;
pub mod topics;

use crate::bundle::ResultBundle;
use chrono::Local;
use serde::Deserialize;
use serde_json::Value;

/// Page sizes the raw-data table offers.
pub const PAGE_SIZES: [usize; 4] = [10, 20, 50, 100];
/// Rows per page when the query string asks for nothing (or nonsense).
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Which hyperparameter sweep tab is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepTab {
    Alpha,
    Beta,
}

impl SweepTab {
    pub fn as_query(self) -> &'static str {
        match self {
            SweepTab::Alpha => "alpha",
            SweepTab::Beta => "beta",
        }
    }
}

/// Raw, untrusted query-string values.
#[derive(Debug, Default, Deserialize)]
pub struct RawQuery {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub tab: Option<String>,
}

/// Validated view parameters for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    /// 1-based page number, clamped to the available pages.
    pub page: usize,
    /// One of [`PAGE_SIZES`].
    pub page_size: usize,
    pub tab: SweepTab,
}

impl PageParams {
    /// Normalize a raw query against the dataset length: unknown page sizes
    /// fall back to the default, the page number is clamped into
    /// `[1, max(1, ceil(len/size))]`, unknown tabs land on Alpha.
    pub fn from_query(query: &RawQuery, dataset_len: usize) -> Self {
        let page_size = query
            .page_size
            .filter(|size| PAGE_SIZES.contains(size))
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let pages = dataset::page_count(dataset_len, page_size);
        let page = query.page.unwrap_or(1).clamp(1, pages);
        let tab = match query.tab.as_deref() {
            Some("beta") => SweepTab::Beta,
            _ => SweepTab::Alpha,
        };
        Self {
            page,
            page_size,
            tab,
        }
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            tab: SweepTab::Alpha,
        }
    }
}

/// Escape text for HTML element and attribute positions.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Human-facing text for one table cell of the raw dataset.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// Header decoration, fetched by the browser on a best-effort basis. A
// failed fetch leaves an empty slot and nothing else.
const LOTTIE_PLAYER_SRC: &str =
    "https://unpkg.com/@lottiefiles/lottie-player@2.0.8/dist/lottie-player.js";
const LOTTIE_HEADER_ANIMATION: &str =
    "https://assets1.lottiefiles.com/packages/lf20_0clcyw1e.json";

/// Render the complete dashboard page. `vis` reports whether the
/// visualization document is available; an error shows up as an inline
/// banner in that section only.
pub fn render_page(bundle: &ResultBundle, params: &PageParams, vis: Result<(), &str>) -> String {
    let sidebar = sidebar::render(bundle);
    let dataset = dataset::render(&bundle.dataset, params);
    let topics = topics::render(&bundle.topics);
    let sweep = sweep::render(&bundle.alpha_results, &bundle.beta_results, params);
    let metrics = metrics::render(&bundle.global_results);
    let visualization = render_vis_section(vis);
    let generated = Local::now().format("%Y-%m-%d %H:%M:%S");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>LDA Topic Analysis</title>
    <script src="{lottie_player}" defer></script>
    <style>{css}</style>
</head>
<body>
    <div class="layout">
        <aside class="sidebar">
{sidebar}
        </aside>
        <main class="container">
            <div class="page-header">
                <h1 class="title pulse">&#128202; LDA Topic Analysis</h1>
                <lottie-player src="{lottie_header}" background="transparent" speed="1" style="width: 180px; height: 120px; margin: 0 auto;" loop autoplay></lottie-player>
            </div>
{dataset}
{topics}
{sweep}
{metrics}
{visualization}
            <div class="footer">Generated {generated} &middot; topiclens</div>
        </main>
    </div>
</body>
</html>
"#,
        lottie_player = LOTTIE_PLAYER_SRC,
        lottie_header = LOTTIE_HEADER_ANIMATION,
        css = PAGE_CSS,
        sidebar = sidebar,
        dataset = dataset,
        topics = topics,
        sweep = sweep,
        metrics = metrics,
        visualization = visualization,
        generated = generated,
    )
}

/// Section 5: iframe + download button when the document is ready, an
/// inline error banner otherwise. The rest of the page stays usable.
fn render_vis_section(vis: Result<(), &str>) -> String {
    match vis {
        Ok(()) => r#"            <div class="section">
                <h2>&#128269; Interactive Visualization</h2>
                <iframe src="/vis" width="1300" height="800" frameborder="0" title="LDA visualization"></iframe>
                <p><a class="download-btn" href="/download/lda_visualization.html" download>&#128190; Download Visualization</a></p>
            </div>"#
            .to_string(),
        Err(message) => format!(
            r#"            <div class="section">
                <h2>&#128269; Interactive Visualization</h2>
                <div class="error-banner">Failed to build visualization: {}</div>
            </div>"#,
            html_escape(message)
        ),
    }
}

// Dotted-gradient backdrop, card sections, topic cards, metric boxes,
// and the fade/slide/pulse keyframes.
const PAGE_CSS: &str = r#"
    body {
        margin: 0;
        font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
        color: #1d1d1f;
        background-color: #e5e5f7;
        background-image: radial-gradient(#444cf7 0.5px, transparent 0.5px), radial-gradient(#444cf7 0.5px, #e5e5f7 0.5px);
        background-size: 20px 20px;
        background-position: 0 0, 10px 10px;
        line-height: 1.5;
    }
    .layout { display: grid; grid-template-columns: 300px 1fr; gap: 20px; max-width: 1700px; margin: 0 auto; padding: 20px; }
    .sidebar { min-width: 0; }
    .container { min-width: 0; }
    .page-header { text-align: center; }
    .title {
        font-size: 36px;
        text-align: center;
        margin-bottom: 10px;
        color: #2E86C1;
        animation: fadeIn 2s;
    }
    .section {
        border-radius: 10px;
        padding: 20px;
        margin-bottom: 20px;
        background-color: #f8f9fa;
        box-shadow: 0 4px 6px rgba(0,0,0,0.1);
        transition: transform .2s;
    }
    .section:hover { transform: scale(1.01); }
    .section h2 { margin-top: 0; }
    .topic-columns { display: grid; grid-template-columns: 1fr 1fr; gap: 10px; }
    .topic-card {
        border-left: 5px solid #2E86C1;
        padding: 15px;
        margin-bottom: 10px;
        background-color: white;
        border-radius: 5px;
        animation: slideIn 0.5s ease-out;
    }
    .topic-card h4 { margin: 0 0 8px 0; }
    .topic-card p { margin: 0; word-break: break-word; }
    .metric-box {
        padding: 15px;
        border-radius: 5px;
        background-color: #e8f4f8;
        margin-bottom: 10px;
        transition: all 0.3s;
    }
    .metric-box:hover { box-shadow: 0 5px 15px rgba(46, 134, 193, 0.3); }
    .metric-box h4 { margin: 0 0 8px 0; }
    .metric-box p { margin: 4px 0; }
    .metric-row { display: grid; grid-template-columns: 1fr 1fr; gap: 10px; }
    .metric-value { font-size: 28px; font-weight: 600; }
    .metric-label { color: #6c757d; font-size: 13px; text-transform: uppercase; letter-spacing: 0.04em; }
    table { width: 100%; border-collapse: collapse; background: white; border-radius: 5px; overflow: hidden; }
    th, td { padding: 8px 12px; text-align: left; border-bottom: 1px solid #eceef1; }
    th { background: #f1f3f5; font-size: 13px; text-transform: uppercase; letter-spacing: 0.04em; color: #6c757d; }
    td.numeric { background-color: #e6f7ff; }
    .pager { display: flex; gap: 12px; align-items: center; margin-bottom: 12px; flex-wrap: wrap; }
    .pager a { color: #2E86C1; text-decoration: none; font-weight: 600; }
    .pager a.disabled { color: #adb5bd; pointer-events: none; }
    .pager select { padding: 4px 8px; border-radius: 4px; border: 1px solid #ced4da; }
    .tabs { display: flex; gap: 8px; margin-bottom: 12px; }
    .tabs a {
        padding: 8px 16px;
        border-radius: 5px 5px 0 0;
        background: #dee2e6;
        color: #1d1d1f;
        text-decoration: none;
        font-weight: 600;
    }
    .tabs a.active { background: #2E86C1; color: white; }
    .error-banner {
        background: #fdecea;
        color: #b02a37;
        border-left: 5px solid #b02a37;
        padding: 12px 15px;
        border-radius: 5px;
    }
    .download-btn {
        display: inline-block;
        margin-top: 10px;
        padding: 10px 18px;
        background: #2E86C1;
        color: white;
        border-radius: 5px;
        text-decoration: none;
        font-weight: 600;
    }
    details > summary { cursor: pointer; font-size: 1.2em; font-weight: 600; margin-bottom: 10px; }
    iframe { background: white; border-radius: 5px; max-width: 100%; }
    .footer { text-align: center; color: #6c757d; font-size: 13px; margin: 30px 0 10px; }
    .empty { color: #6c757d; font-style: italic; }
    @keyframes fadeIn { from { opacity: 0; } to { opacity: 1; } }
    @keyframes slideIn {
        from { transform: translateX(-20px); opacity: 0; }
        to { transform: translateX(0); opacity: 1; }
    }
    .pulse { animation: pulse 2s infinite; }
    @keyframes pulse {
        0% { transform: scale(1); }
        50% { transform: scale(1.05); }
        100% { transform: scale(1); }
    }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{Dictionary, GlobalResults, ResultBundle, TopicModel};
    use serde_json::Map;

    pub(crate) fn sample_bundle(rows: usize) -> ResultBundle {
        let dataset = (0..rows)
            .map(|i| {
                let mut record = Map::new();
                record.insert("comment".to_string(), serde_json::json!(format!("row {}", i)));
                record
            })
            .collect();
        ResultBundle {
            dataset,
            topics: vec![
                (0, "0.12*\"service\" + 0.08*\"delay\"".to_string()),
                (1, "0.10*\"driver\" + 0.07*\"app\"".to_string()),
                (2, "0.09*\"price\" + 0.05*\"order\"".to_string()),
            ],
            alpha_results: vec![serde_json::from_value(serde_json::json!([
                0.31, 0.61, -123.456, 0.51234
            ]))
            .unwrap()],
            beta_results: vec![serde_json::from_value(serde_json::json!([
                "symmetric", 0.31, -130.0, 0.4987
            ]))
            .unwrap()],
            global_results: serde_json::from_value(serde_json::json!({
                "Perplexity": -150.2, "Coherence": 0.512
            }))
            .unwrap(),
            lda_best_model: TopicModel::new(
                2,
                vec![
                    vec![
                        ("service".to_string(), 0.12),
                        ("delay".to_string(), 0.08),
                        ("driver".to_string(), 0.06),
                        ("app".to_string(), 0.05),
                        ("order".to_string(), 0.04),
                        ("price".to_string(), 0.03),
                    ],
                    vec![
                        ("price".to_string(), 0.11),
                        ("order".to_string(), 0.09),
                        ("food".to_string(), 0.07),
                        ("time".to_string(), 0.05),
                        ("promo".to_string(), 0.02),
                    ],
                ],
            ),
            corpus: vec![vec![(0, 2), (1, 1)], vec![(0, 1), (2, 3)]],
            gensim_dict: Dictionary::new(
                [
                    (0, "service".to_string()),
                    (1, "delay".to_string()),
                    (2, "price".to_string()),
                ]
                .into_iter()
                .collect(),
            ),
        }
    }

    #[test]
    fn test_page_params_defaults() {
        let params = PageParams::from_query(&RawQuery::default(), 25);
        assert_eq!(params.page, 1);
        assert_eq!(params.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(params.tab, SweepTab::Alpha);
    }

    #[test]
    fn test_page_params_rejects_unknown_page_size() {
        let query = RawQuery {
            page_size: Some(37),
            ..Default::default()
        };
        assert_eq!(PageParams::from_query(&query, 25).page_size, 10);
    }

    #[test]
    fn test_page_params_clamps_page() {
        let query = RawQuery {
            page: Some(99),
            page_size: Some(10),
            tab: None,
        };
        // 25 rows at 10/page -> 3 pages
        assert_eq!(PageParams::from_query(&query, 25).page, 3);

        let query = RawQuery {
            page: Some(0),
            ..Default::default()
        };
        assert_eq!(PageParams::from_query(&query, 25).page, 1);
    }

    #[test]
    fn test_page_params_empty_dataset_still_one_page() {
        let params = PageParams::from_query(&RawQuery::default(), 0);
        assert_eq!(params.page, 1);
    }

    #[test]
    fn test_page_params_tab() {
        let query = RawQuery {
            tab: Some("beta".to_string()),
            ..Default::default()
        };
        assert_eq!(PageParams::from_query(&query, 0).tab, SweepTab::Beta);

        let query = RawQuery {
            tab: Some("gamma".to_string()),
            ..Default::default()
        };
        assert_eq!(PageParams::from_query(&query, 0).tab, SweepTab::Alpha);
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<b>"a" & 'b'</b>"#),
            "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_render_page_is_complete_document() {
        let bundle = sample_bundle(25);
        let params = PageParams::default();
        let html = render_page(&bundle, &params, Ok(()));
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("</html>"));
        assert!(html.contains("LDA Topic Analysis"));
        assert!(html.contains("/download/lda_visualization.html"));
        assert!(html.contains(r#"width="1300" height="800""#));
    }

    #[test]
    fn test_render_page_vis_failure_is_localized() {
        let bundle = sample_bundle(5);
        let params = PageParams::default();
        let html = render_page(&bundle, &params, Err("corpus is empty"));
        // Banner present, iframe absent, the other sections intact.
        assert!(html.contains("Failed to build visualization: corpus is empty"));
        assert!(!html.contains("<iframe"));
        assert!(html.contains("Generated Topics"));
        assert!(html.contains("Best Results"));
    }
}
