//! Interactive visualization document
//!
//! Assembles a single self-contained HTML file from the trained model, the
//! bag-of-words corpus, and the vocabulary. All layout geometry runs in the
//! document's embedded D3 runtime; this module only gathers and encodes the
//! data the charts read.
//!
//! Preparation failures are the non-fatal tier: the caller renders them as
//! an inline banner and the rest of the dashboard stays usable.

use crate::bundle::{BagOfWords, Dictionary, ResultBundle, TopicModel};
use serde_json::json;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Terms encoded per topic for the bar chart.
const TERMS_PER_TOPIC: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisError {
    /// The bag-of-words corpus has no documents.
    EmptyCorpus,
    /// The vocabulary has no tokens.
    EmptyVocabulary,
    /// The model reports zero topics.
    NoTopics,
    /// The model's topic count disagrees with its term tables.
    TopicMismatch { expected: usize, actual: usize },
}

impl fmt::Display for VisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisError::EmptyCorpus => write!(f, "corpus is empty"),
            VisError::EmptyVocabulary => write!(f, "vocabulary is empty"),
            VisError::NoTopics => write!(f, "model has no topics"),
            VisError::TopicMismatch { expected, actual } => write!(
                f,
                "model reports {} topics but carries {} term tables",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for VisError {}

/// Build the standalone visualization document from the three opaque
/// bundle members.
pub fn prepare(
    model: &TopicModel,
    corpus: &[BagOfWords],
    dictionary: &Dictionary,
) -> Result<String, VisError> {
    if corpus.is_empty() {
        return Err(VisError::EmptyCorpus);
    }
    if dictionary.is_empty() {
        return Err(VisError::EmptyVocabulary);
    }
    if model.num_topics() == 0 {
        return Err(VisError::NoTopics);
    }
    if model.term_table_count() != model.num_topics() {
        return Err(VisError::TopicMismatch {
            expected: model.num_topics(),
            actual: model.term_table_count(),
        });
    }

    let payload = build_payload(model, corpus, dictionary);
    Ok(VIS_TEMPLATE.replace("__DATA__", &payload.to_string()))
}

/// Topic and term data the embedded charts consume: per-topic term tables
/// with corpus frequencies, and a relative weight per topic (the corpus
/// token mass its top terms cover).
fn build_payload(
    model: &TopicModel,
    corpus: &[BagOfWords],
    dictionary: &Dictionary,
) -> serde_json::Value {
    let mut corpus_counts: HashMap<u32, u64> = HashMap::new();
    let mut total_tokens: u64 = 0;
    for document in corpus {
        for (token_id, count) in document {
            *corpus_counts.entry(*token_id).or_insert(0) += u64::from(*count);
            total_tokens += u64::from(*count);
        }
    }

    let token_ids: HashMap<&str, u32> =
        dictionary.iter().map(|(id, token)| (token, id)).collect();

    let topics: Vec<serde_json::Value> = (0..model.num_topics())
        .map(|topic_id| {
            let terms: Vec<serde_json::Value> = model
                .show_topic(topic_id, TERMS_PER_TOPIC)
                .iter()
                .map(|(word, probability)| {
                    let frequency = token_ids
                        .get(word.as_str())
                        .and_then(|id| corpus_counts.get(id))
                        .copied()
                        .unwrap_or(0);
                    json!({
                        "term": word,
                        "prob": probability,
                        "freq": frequency,
                    })
                })
                .collect();

            let weight: u64 = model
                .show_topic(topic_id, TERMS_PER_TOPIC)
                .iter()
                .filter_map(|(word, _)| token_ids.get(word.as_str()))
                .filter_map(|id| corpus_counts.get(id))
                .sum();

            json!({
                "id": topic_id,
                "label": format!("Topic {}", topic_id + 1),
                "weight": weight,
                "terms": terms,
            })
        })
        .collect();

    json!({
        "num_topics": model.num_topics(),
        "vocabulary_size": dictionary.len(),
        "documents": corpus.len(),
        "total_tokens": total_tokens,
        "topics": topics,
    })
}

static PREPARED: OnceLock<Result<String, VisError>> = OnceLock::new();

/// Process-wide one-shot preparation. The document is generated on first
/// use and the identical bytes are served, embedded, and downloaded from
/// then on.
pub fn prepared(bundle: &ResultBundle) -> Result<&'static str, &'static VisError> {
    PREPARED
        .get_or_init(|| {
            prepare(
                &bundle.lda_best_model,
                &bundle.corpus,
                &bundle.gensim_dict,
            )
        })
        .as_ref()
        .map(String::as_str)
}

// The document template. `__DATA__` is replaced with the JSON payload; the
// D3 runtime fetched from the CDN does every bit of layout geometry.
const VIS_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>LDA Topic Visualization</title>
    <script src="https://d3js.org/d3.v7.min.js"></script>
    <style>
        :root {
            --bg: #f5f5f7;
            --card: #ffffff;
            --border: #d2d2d7;
            --text: #1d1d1f;
            --dim: #86868b;
            --accent: #2E86C1;
            --shadow: 0 2px 8px rgba(0,0,0,0.08), 0 1px 2px rgba(0,0,0,0.04);
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--text);
            padding: 1.5rem;
        }
        .charts { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; }
        .chart-card {
            background: var(--card);
            border-radius: 16px;
            padding: 1.5rem;
            box-shadow: var(--shadow);
        }
        .chart-title { font-size: 0.9375rem; font-weight: 600; margin-bottom: 1rem; }
        .meta { color: var(--dim); font-size: 0.8125rem; margin-bottom: 1rem; }
        .topic-circle { cursor: pointer; stroke: #ffffff; stroke-width: 2; }
        .topic-circle.selected { stroke: var(--accent); stroke-width: 3; }
        .topic-label { font-size: 0.75rem; fill: var(--text); pointer-events: none; text-anchor: middle; }
        .bar-prob { fill: var(--accent); }
        .bar-freq { fill: rgba(46, 134, 193, 0.25); }
        .term-label { font-size: 0.75rem; fill: var(--text); }
        .axis text { fill: var(--dim); font-size: 0.6875rem; }
        .tooltip {
            position: absolute;
            background: #1d1d1f;
            color: #ffffff;
            border-radius: 8px;
            padding: 0.5rem 0.75rem;
            font-size: 0.8125rem;
            pointer-events: none;
            opacity: 0;
            transition: opacity 0.15s ease;
        }
        .tooltip.visible { opacity: 1; }
    </style>
</head>
<body>
    <div class="meta" id="meta"></div>
    <div class="charts">
        <div class="chart-card">
            <div class="chart-title">Topic Map</div>
            <div id="topic-map"></div>
        </div>
        <div class="chart-card">
            <div class="chart-title" id="terms-title">Top Terms</div>
            <div id="term-bars"></div>
        </div>
    </div>
    <div class="tooltip" id="tooltip"></div>

    <script>
    const data = __DATA__;
    let selected = 0;

    document.getElementById('meta').textContent =
        data.num_topics + ' topics | ' + data.vocabulary_size + ' tokens | ' +
        data.documents + ' documents | ' + data.total_tokens + ' total token occurrences';

    function showTooltip(event, text) {
        const tooltip = document.getElementById('tooltip');
        tooltip.textContent = text;
        tooltip.classList.add('visible');
        tooltip.style.left = (event.pageX + 10) + 'px';
        tooltip.style.top = (event.pageY - 10) + 'px';
    }

    function hideTooltip() {
        document.getElementById('tooltip').classList.remove('visible');
    }

    function drawTopicMap() {
        const width = 560, height = 560;
        const svg = d3.select('#topic-map')
            .append('svg')
            .attr('width', width)
            .attr('height', height);

        const maxWeight = d3.max(data.topics, t => t.weight) || 1;
        const radius = d3.scaleSqrt().domain([0, maxWeight]).range([8, 70]);
        const color = d3.scaleOrdinal(d3.schemeTableau10);

        const nodes = data.topics.map(t => ({ ...t, r: radius(t.weight) }));

        // Layout is the runtime's job: a force simulation packs the circles.
        const simulation = d3.forceSimulation(nodes)
            .force('center', d3.forceCenter(width / 2, height / 2))
            .force('charge', d3.forceManyBody().strength(4))
            .force('collide', d3.forceCollide().radius(d => d.r + 4))
            .stop();
        for (let i = 0; i < 200; i++) simulation.tick();

        const groups = svg.selectAll('g')
            .data(nodes)
            .enter()
            .append('g')
            .attr('transform', d => 'translate(' + d.x + ',' + d.y + ')');

        groups.append('circle')
            .attr('class', d => 'topic-circle' + (d.id === selected ? ' selected' : ''))
            .attr('r', d => d.r)
            .attr('fill', d => color(d.id))
            .attr('fill-opacity', 0.75)
            .on('mouseover', function(event, d) {
                showTooltip(event, d.label + ': weight ' + d.weight);
            })
            .on('mouseout', hideTooltip)
            .on('click', function(event, d) {
                selected = d.id;
                svg.selectAll('circle').attr('class', n =>
                    'topic-circle' + (n.id === selected ? ' selected' : ''));
                drawTermBars();
            });

        groups.append('text')
            .attr('class', 'topic-label')
            .attr('dy', '0.35em')
            .text(d => d.id + 1);
    }

    function drawTermBars() {
        const topic = data.topics[selected];
        document.getElementById('terms-title').textContent =
            'Top Terms - ' + topic.label;

        const container = document.getElementById('term-bars');
        container.innerHTML = '';

        const margin = { top: 8, right: 20, bottom: 24, left: 110 };
        const width = 560 - margin.left - margin.right;
        const rowHeight = 17;
        const height = topic.terms.length * rowHeight;

        const svg = d3.select('#term-bars')
            .append('svg')
            .attr('width', width + margin.left + margin.right)
            .attr('height', height + margin.top + margin.bottom)
            .append('g')
            .attr('transform', 'translate(' + margin.left + ',' + margin.top + ')');

        const x = d3.scaleLinear()
            .domain([0, d3.max(topic.terms, t => t.prob) || 1])
            .range([0, width]);

        const y = d3.scaleBand()
            .domain(topic.terms.map(t => t.term))
            .range([0, height])
            .padding(0.25);

        svg.selectAll('.bar-prob')
            .data(topic.terms)
            .enter()
            .append('rect')
            .attr('class', 'bar-prob')
            .attr('x', 0)
            .attr('y', t => y(t.term))
            .attr('width', t => x(t.prob))
            .attr('height', y.bandwidth())
            .on('mouseover', function(event, t) {
                showTooltip(event, t.term + ': p=' + t.prob.toFixed(4) + ', corpus freq ' + t.freq);
            })
            .on('mouseout', hideTooltip);

        svg.append('g')
            .attr('class', 'axis')
            .call(d3.axisLeft(y).tickSize(0));

        svg.append('g')
            .attr('class', 'axis')
            .attr('transform', 'translate(0,' + height + ')')
            .call(d3.axisBottom(x).ticks(5));
    }

    drawTopicMap();
    drawTermBars();
    </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn dictionary(tokens: &[&str]) -> Dictionary {
        Dictionary::new(
            tokens
                .iter()
                .enumerate()
                .map(|(id, token)| (id as u32, token.to_string()))
                .collect::<BTreeMap<u32, String>>(),
        )
    }

    fn model() -> TopicModel {
        TopicModel::new(
            2,
            vec![
                vec![("service".to_string(), 0.12), ("delay".to_string(), 0.08)],
                vec![("price".to_string(), 0.11), ("order".to_string(), 0.09)],
            ],
        )
    }

    #[test]
    fn test_prepare_is_self_contained_html() {
        let corpus = vec![vec![(0, 2), (1, 1)], vec![(2, 3)]];
        let dict = dictionary(&["service", "delay", "price", "order"]);
        let html = prepare(&model(), &corpus, &dict).unwrap();
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("</html>"));
        assert!(html.contains("d3.v7.min.js"));
        assert!(!html.contains("__DATA__"));
        assert!(html.contains("\"num_topics\":2"));
    }

    #[test]
    fn test_prepare_empty_corpus() {
        let dict = dictionary(&["service"]);
        let err = prepare(&model(), &[], &dict).unwrap_err();
        assert_eq!(err, VisError::EmptyCorpus);
        assert_eq!(err.to_string(), "corpus is empty");
    }

    #[test]
    fn test_prepare_empty_vocabulary() {
        let corpus = vec![vec![(0, 1)]];
        let err = prepare(&model(), &corpus, &dictionary(&[])).unwrap_err();
        assert_eq!(err, VisError::EmptyVocabulary);
    }

    #[test]
    fn test_prepare_topic_mismatch() {
        let corpus = vec![vec![(0, 1)]];
        let dict = dictionary(&["service"]);
        let broken = TopicModel::new(3, vec![vec![("service".to_string(), 0.5)]]);
        let err = prepare(&broken, &corpus, &dict).unwrap_err();
        assert_eq!(
            err,
            VisError::TopicMismatch {
                expected: 3,
                actual: 1
            }
        );
        assert!(err.to_string().contains("3 topics"));
    }

    #[test]
    fn test_payload_counts_corpus_frequencies() {
        let corpus = vec![vec![(0, 2), (1, 1)], vec![(0, 1), (2, 3)]];
        let dict = dictionary(&["service", "delay", "price", "order"]);
        let payload = build_payload(&model(), &corpus, &dict);

        assert_eq!(payload["documents"], 2);
        assert_eq!(payload["total_tokens"], 7);
        // "service" appears 3 times across the corpus.
        assert_eq!(payload["topics"][0]["terms"][0]["term"], "service");
        assert_eq!(payload["topics"][0]["terms"][0]["freq"], 3);
        // Topic 0 weight covers service (3) + delay (1).
        assert_eq!(payload["topics"][0]["weight"], 4);
        // Topic 1 weight covers price (3) + order (0, absent from corpus).
        assert_eq!(payload["topics"][1]["weight"], 3);
    }
}
