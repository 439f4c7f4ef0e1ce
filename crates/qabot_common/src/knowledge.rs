//! Knowledge base model
//!
//! On disk the knowledge base is a JSON object whose `question` key holds the
//! list of pairs:
//!
//! ```json
//! { "question": [ { "question": "Hi", "answer": "Hello!" } ] }
//! ```
//!
//! Unknown keys, at the top level or inside a pair, are carried through a
//! load/save cycle untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One stored question and its answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,

    /// Missing or `null` answers load as empty; lookups treat them as "no answer"
    #[serde(default, deserialize_with = "lenient_answer")]
    pub answer: String,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            extra: Map::new(),
        }
    }

    /// Case-insensitive comparison against the stored question
    pub fn asks(&self, question: &str) -> bool {
        self.question.to_lowercase() == question.to_lowercase()
    }

    pub fn has_answer(&self) -> bool {
        !self.answer.trim().is_empty()
    }
}

/// Numbers and booleans keep their text; `null`, lists and objects become empty
fn lenient_answer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

/// Ordered collection of question/answer pairs.
///
/// Duplicated questions are allowed; lookups return the first one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(rename = "question")]
    entries: Vec<QaPair>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(entries: Vec<QaPair>) -> Self {
        Self {
            entries,
            extra: Map::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[QaPair] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QaPair> {
        self.entries.iter()
    }

    /// Question texts in insertion order
    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|pair| pair.question.as_str())
    }

    /// Append a taught pair. No deduplication is done.
    pub fn push(&mut self, pair: QaPair) {
        self.entries.push(pair);
    }
}
