//! Section 2: generated topics, two-column card layout
//!
//! Input order is preserved; cards alternate columns by position parity.

use super::html_escape;
use crate::bundle::TopicEntry;
use std::fmt::Write;

pub fn render(topics: &[TopicEntry]) -> String {
    let mut columns = [String::new(), String::new()];
    for (position, (index, text)) in topics.iter().enumerate() {
        let _ = write!(
            columns[position % 2],
            r#"                        <div class="topic-card">
                            <h4>Topic {}</h4>
                            <p>{}</p>
                        </div>
"#,
            index,
            html_escape(text)
        );
    }

    format!(
        r#"            <div class="section">
                <h2>&#127919; Generated Topics</h2>
                <div class="topic-columns">
                    <div>
{}                    </div>
                    <div>
{}                    </div>
                </div>
            </div>"#,
        columns[0], columns[1]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(index: u32, text: &str) -> TopicEntry {
        (index, text.to_string())
    }

    #[test]
    fn test_alternates_columns_by_position() {
        let topics = vec![
            topic(0, "first"),
            topic(1, "second"),
            topic(2, "third"),
            topic(3, "fourth"),
        ];
        let html = render(&topics);

        // Column boundary: the first <div> holds even positions, the
        // second holds odd ones.
        let split = html.find("</div>\n                    <div>").unwrap();
        let (left, right) = html.split_at(split);
        assert!(left.contains("first") && left.contains("third"));
        assert!(!left.contains("second") && !left.contains("fourth"));
        assert!(right.contains("second") && right.contains("fourth"));
    }

    #[test]
    fn test_preserves_input_order() {
        let topics = vec![topic(2, "gamma"), topic(0, "alpha"), topic(1, "beta")];
        let html = render(&topics);
        // Within a column, earlier positions render first.
        assert!(html.find("gamma").unwrap() < html.find("beta").unwrap());
        // Headings carry the source index, not the position.
        assert!(html.contains("Topic 2"));
        assert!(html.contains("Topic 0"));
    }

    #[test]
    fn test_topic_text_is_escaped() {
        let topics = vec![topic(0, "0.5*\"<tag>\"")];
        let html = render(&topics);
        assert!(html.contains("&lt;tag&gt;"));
    }

    #[test]
    fn test_empty_topic_list() {
        let html = render(&[]);
        assert!(html.contains("Generated Topics"));
        assert!(!html.contains("topic-card"));
    }
}
