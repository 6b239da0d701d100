//! Result-bundle data model
//!
//! One serialized object holds everything the dashboard shows. The schema is
//! owned by the external training pipeline; this module only mirrors it and
//! checks that every required field made it into the file.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Fields that must be present in the bundle file. Absence of any is a
/// fatal load error; the loader reports the complete missing set in this
/// order.
pub const REQUIRED_KEYS: [&str; 8] = [
    "dataset",
    "topics",
    "alpha_results",
    "beta_results",
    "global_results",
    "lda_best_model",
    "corpus",
    "gensim_dict",
];

/// One raw input document, keyed by column name. Column order follows the
/// source file (serde_json `preserve_order`).
pub type Record = Map<String, Value>;

/// A `(topic index, human-readable description)` pair.
pub type TopicEntry = (u32, String);

/// Bag-of-words representation of one document: `(token id, count)` pairs.
pub type BagOfWords = Vec<(u32, u32)>;

/// The complete pre-computed result bundle. Loaded once per process and
/// never written back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultBundle {
    pub dataset: Vec<Record>,
    pub topics: Vec<TopicEntry>,
    pub alpha_results: Vec<SweepRow>,
    pub beta_results: Vec<SweepRow>,
    pub global_results: GlobalResults,
    pub lda_best_model: TopicModel,
    pub corpus: Vec<BagOfWords>,
    pub gensim_dict: Dictionary,
}

/// Headline numbers for the sidebar and the summary API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelStats {
    pub num_topics: usize,
    pub vocabulary_size: usize,
    pub document_count: usize,
}

impl ResultBundle {
    pub fn stats(&self) -> ModelStats {
        ModelStats {
            num_topics: self.lda_best_model.num_topics(),
            vocabulary_size: self.gensim_dict.len(),
            document_count: self.dataset.len(),
        }
    }
}

/// Return every required key absent from `value`, in [`REQUIRED_KEYS`]
/// order. A non-object value is missing all of them.
pub fn missing_keys(value: &Value) -> Vec<&'static str> {
    match value.as_object() {
        Some(map) => REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| !map.contains_key(*key))
            .collect(),
        None => REQUIRED_KEYS.to_vec(),
    }
}

/// One hyperparameter cell. Sweeps mix numeric priors with symbolic ones
/// (`"symmetric"`, `"asymmetric"`), and only numeric cells get the table
/// highlight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Cell::Number(_))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One row of a hyperparameter sweep, serialized as the 4-tuple
/// `[alpha, beta, perplexity, coherence]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(Cell, Cell, f64, f64)", into = "(Cell, Cell, f64, f64)")]
pub struct SweepRow {
    pub alpha: Cell,
    pub beta: Cell,
    pub perplexity: f64,
    pub coherence: f64,
}

impl From<(Cell, Cell, f64, f64)> for SweepRow {
    fn from((alpha, beta, perplexity, coherence): (Cell, Cell, f64, f64)) -> Self {
        Self {
            alpha,
            beta,
            perplexity,
            coherence,
        }
    }
}

impl From<SweepRow> for (Cell, Cell, f64, f64) {
    fn from(row: SweepRow) -> Self {
        (row.alpha, row.beta, row.perplexity, row.coherence)
    }
}

/// Best-configuration summary, normalized at the load boundary.
///
/// The source artifact stores this either as a plain mapping or as a
/// single-row table; both collapse into one canonical mapping here so no
/// downstream read site has to care.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GlobalResultsRaw")]
pub struct GlobalResults(Map<String, Value>);

#[derive(Deserialize)]
#[serde(untagged)]
enum GlobalResultsRaw {
    Mapping(Map<String, Value>),
    Table(Vec<Map<String, Value>>),
}

impl From<GlobalResultsRaw> for GlobalResults {
    fn from(raw: GlobalResultsRaw) -> Self {
        match raw {
            GlobalResultsRaw::Mapping(map) => GlobalResults(map),
            // A tabular form carries exactly one row of interest.
            GlobalResultsRaw::Table(rows) => {
                GlobalResults(rows.into_iter().next().unwrap_or_default())
            }
        }
    }
}

impl GlobalResults {
    pub fn new(map: Map<String, Value>) -> Self {
        GlobalResults(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Coherence as a number, when present and numeric.
    pub fn coherence(&self) -> Option<f64> {
        self.get("Coherence").and_then(Value::as_f64)
    }
}

/// The selected trained model, reduced to the surface the dashboard needs:
/// topic count and per-topic `(word, probability)` tables, highest
/// probability first, in whatever order the trainer emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicModel {
    num_topics: usize,
    topic_terms: Vec<Vec<(String, f64)>>,
}

impl TopicModel {
    pub fn new(num_topics: usize, topic_terms: Vec<Vec<(String, f64)>>) -> Self {
        Self {
            num_topics,
            topic_terms,
        }
    }

    pub fn num_topics(&self) -> usize {
        self.num_topics
    }

    /// Top `topn` `(word, probability)` pairs for a topic. Out-of-range
    /// topic ids yield an empty slice; shorter term tables are returned
    /// whole.
    pub fn show_topic(&self, topic_id: usize, topn: usize) -> &[(String, f64)] {
        match self.topic_terms.get(topic_id) {
            Some(terms) => &terms[..topn.min(terms.len())],
            None => &[],
        }
    }

    /// Number of topics that actually carry a term table.
    pub fn term_table_count(&self) -> usize {
        self.topic_terms.len()
    }
}

/// id↔token vocabulary of the trained model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary(BTreeMap<u32, String>);

impl Dictionary {
    pub fn new(id2token: BTreeMap<u32, String>) -> Self {
        Dictionary(id2token)
    }

    /// Vocabulary size: count of unique tokens known to the model.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn token(&self, id: u32) -> Option<&str> {
        self.0.get(&id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.0.iter().map(|(id, token)| (*id, token.as_str()))
    }
}
