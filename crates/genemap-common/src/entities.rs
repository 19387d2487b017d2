/// Shared value types exchanged between the mapping engine and the
/// surrounding pipeline. Offsets are byte offsets into the document text.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Recognizer provenance
// ---------------------------------------------------------------------------

/// The upstream recognizer that produced a mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeneTagger {
    Gazetteer,
    Dictionary,
    StatisticalTagger,
}

impl GeneTagger {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeneTagger::Gazetteer => "GAZETTEER",
            GeneTagger::Dictionary => "DICTIONARY",
            GeneTagger::StatisticalTagger => "STATISTICAL_TAGGER",
        }
    }
}

impl fmt::Display for GeneTagger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Token layer
// ---------------------------------------------------------------------------

/// One token of an externally supplied token layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub begin: usize,
    pub end: usize,
}

impl Token {
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }
}

// ---------------------------------------------------------------------------
// Resolution result
// ---------------------------------------------------------------------------

/// The database entry a surviving mention was resolved to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub entry_id: String,
    pub score: f64,
    pub tax_id: Option<String>,
}
