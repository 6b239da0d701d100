//! Sidebar: model statistics and per-topic keyword blocks

use super::html_escape;
use crate::bundle::ResultBundle;
use std::fmt::Write;

/// Keywords shown per topic block.
const TOPIC_KEYWORDS: usize = 5;

pub fn render(bundle: &ResultBundle) -> String {
    let stats = bundle.stats();
    let mut out = String::new();

    out.push_str(
        r#"            <div class="metric-box pulse">
                <h3>&#8505; Model Information</h3>
            </div>
"#,
    );
    let _ = write!(
        out,
        r#"            <div class="metric-box">
                <h4>&#128202; Model Statistics</h4>
                <p>&bull; Topics: {}</p>
                <p>&bull; Unique tokens: {}</p>
                <p>&bull; Documents: {}</p>
            </div>
"#,
        stats.num_topics, stats.vocabulary_size, stats.document_count
    );

    out.push_str("            <h3>&#128273; Topic Keywords</h3>\n");
    for topic_id in 0..bundle.lda_best_model.num_topics() {
        let _ = writeln!(
            out,
            "            <div class=\"metric-box\">\n                <h4>Topic {}</h4>",
            topic_id + 1
        );
        for (word, probability) in bundle.lda_best_model.show_topic(topic_id, TOPIC_KEYWORDS) {
            let _ = writeln!(
                out,
                "                <p>&#9642; {} ({:.2})</p>",
                html_escape(word),
                probability
            );
        }
        out.push_str("            </div>\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{Dictionary, GlobalResults, TopicModel};
    use serde_json::Map;

    fn bundle(num_topics: usize, terms_per_topic: usize) -> ResultBundle {
        let topic_terms = (0..num_topics)
            .map(|t| {
                (0..terms_per_topic)
                    .map(|w| (format!("word{}_{}", t, w), 0.1 / (w + 1) as f64))
                    .collect()
            })
            .collect();
        ResultBundle {
            dataset: vec![Map::new(); 7],
            topics: vec![],
            alpha_results: vec![],
            beta_results: vec![],
            global_results: GlobalResults::new(Map::new()),
            lda_best_model: TopicModel::new(num_topics, topic_terms),
            corpus: vec![],
            gensim_dict: Dictionary::new(
                (0..11_u32).map(|i| (i, format!("tok{}", i))).collect(),
            ),
        }
    }

    #[test]
    fn test_statistics_block() {
        let html = render(&bundle(3, 8));
        assert!(html.contains("Topics: 3"));
        assert!(html.contains("Unique tokens: 11"));
        assert!(html.contains("Documents: 7"));
    }

    #[test]
    fn test_one_block_per_topic_with_five_keywords() {
        let html = render(&bundle(3, 8));
        assert_eq!(html.matches("<h4>Topic ").count(), 3);
        // 5 keyword lines per topic, never the full 8-term table.
        assert_eq!(html.matches("&#9642;").count(), 15);
        assert!(html.contains("word0_0"));
        assert!(html.contains("word0_4"));
        assert!(!html.contains("word0_5"));
    }

    #[test]
    fn test_blocks_numbered_from_one() {
        let html = render(&bundle(2, 5));
        assert!(html.contains("<h4>Topic 1</h4>"));
        assert!(html.contains("<h4>Topic 2</h4>"));
        assert!(!html.contains("<h4>Topic 0</h4>"));
    }

    #[test]
    fn test_probabilities_two_decimals() {
        let html = render(&bundle(1, 5));
        // 0.1 / 1 -> "0.10"
        assert!(html.contains("word0_0 (0.10)"));
        // 0.1 / 3 -> "0.03"
        assert!(html.contains("word0_2 (0.03)"));
    }

    #[test]
    fn test_model_order_preserved() {
        let html = render(&bundle(1, 5));
        let first = html.find("word0_0").unwrap();
        let last = html.find("word0_4").unwrap();
        assert!(first < last);
    }
}
