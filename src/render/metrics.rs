//! Section 4: best-configuration metrics
//!
//! Missing perplexity shows a placeholder dash; missing coherence shows
//! 0 before formatting. Both are display defaults, never data corrections.

use super::html_escape;
use crate::bundle::GlobalResults;
use serde_json::Value;

/// Perplexity is displayed verbatim when present.
pub fn perplexity_display(results: &GlobalResults) -> String {
    match results.get("Perplexity") {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Coherence defaults to 0 and always renders with 4 decimal places.
pub fn coherence_display(results: &GlobalResults) -> String {
    format!("{:.4}", results.coherence().unwrap_or(0.0))
}

pub fn render(results: &GlobalResults) -> String {
    format!(
        r#"            <div class="section">
                <h2>&#127942; Best Results</h2>
                <div class="metric-row">
                    <div class="metric-box">
                        <div class="metric-label">Perplexity</div>
                        <div class="metric-value">{}</div>
                    </div>
                    <div class="metric-box">
                        <div class="metric-label">Coherence</div>
                        <div class="metric-value">{}</div>
                    </div>
                </div>
            </div>"#,
        html_escape(&perplexity_display(results)),
        html_escape(&coherence_display(results)),
    )
}
