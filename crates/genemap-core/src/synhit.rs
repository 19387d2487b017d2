//! Scored dictionary candidates for one mention.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How a candidate was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Matcher {
    /// Normalized mention equals the normalized synonym
    Exact,
    /// Scored by the pair model
    Model,
}

/// One scored resolution candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynHit {
    pub entry_id: String,
    pub score: f64,
    pub matcher: Matcher,
    /// The (normalized) synonym that matched
    pub synonym: String,
    pub tax_id: Option<String>,
    /// Overlap of the entry's context description with the mention's context
    #[serde(default)]
    pub context_score: f64,
}

impl SynHit {
    pub fn new(entry_id: impl Into<String>, score: f64, matcher: Matcher, synonym: impl Into<String>) -> Self {
        Self {
            entry_id: entry_id.into(),
            score,
            matcher,
            synonym: synonym.into(),
            tax_id: None,
            context_score: 0.0,
        }
    }

    pub fn with_tax_id(mut self, tax_id: Option<String>) -> Self {
        self.tax_id = tax_id;
        self
    }

    /// Score descending, then entry id ascending.
    pub fn rank_cmp(&self, other: &SynHit) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.entry_id.cmp(&other.entry_id))
    }
}

impl fmt::Display for SynHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.4}, {:?}, \"{}\")", self.entry_id, self.score, self.matcher, self.synonym)
    }
}

/// Candidates sorted by [`SynHit::rank_cmp`], unique by entry id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynHitSet {
    hits: Vec<SynHit>,
}

impl SynHitSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert in rank order. A hit for an id already present replaces it
    /// only when it scores higher. Returns whether the set changed.
    pub fn add(&mut self, hit: SynHit) -> bool {
        if let Some(pos) = self.position(&hit.entry_id) {
            if hit.score <= self.hits[pos].score {
                return false;
            }
            self.hits.remove(pos);
        }
        let at = self
            .hits
            .binary_search_by(|probe| probe.rank_cmp(&hit))
            .unwrap_or_else(|insert_at| insert_at);
        self.hits.insert(at, hit);
        true
    }

    /// Highest-confidence hit.
    pub fn first(&self) -> Option<&SynHit> {
        self.hits.first()
    }

    /// Keep only hits whose entry id also occurs in `other`.
    pub fn retain_all(&mut self, other: &SynHitSet) -> bool {
        let before = self.hits.len();
        self.hits.retain(|h| other.contains(&h.entry_id));
        self.hits.len() != before
    }

    /// True if both sets share at least one entry id.
    pub fn contains_any(&self, other: &SynHitSet) -> bool {
        self.hits.iter().any(|h| other.contains(&h.entry_id))
    }

    pub fn contains(&self, entry_id: &str) -> bool {
        self.position(entry_id).is_some()
    }

    pub fn get(&self, entry_id: &str) -> Option<&SynHit> {
        self.position(entry_id).map(|i| &self.hits[i])
    }

    /// The leading hits whose score is within `epsilon` of the best one.
    pub fn tied_with_first(&self, epsilon: f64) -> &[SynHit] {
        let Some(best) = self.hits.first() else {
            return &[];
        };
        let n = self
            .hits
            .iter()
            .take_while(|h| best.score - h.score <= epsilon)
            .count();
        &self.hits[..n]
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SynHit> {
        self.hits.iter()
    }

    pub fn into_vec(self) -> Vec<SynHit> {
        self.hits
    }

    fn position(&self, entry_id: &str) -> Option<usize> {
        self.hits.iter().position(|h| h.entry_id == entry_id)
    }
}

/// Sets are equal when they hold the same ids with the same scores.
impl PartialEq for SynHitSet {
    fn eq(&self, other: &Self) -> bool {
        self.hits.len() == other.hits.len()
            && self
                .hits
                .iter()
                .zip(other.hits.iter())
                .all(|(a, b)| a.entry_id == b.entry_id && a.score.total_cmp(&b.score).is_eq())
    }
}

impl FromIterator<SynHit> for SynHitSet {
    fn from_iter<I: IntoIterator<Item = SynHit>>(iter: I) -> Self {
        let mut set = SynHitSet::new();
        for hit in iter {
            set.add(hit);
        }
        set
    }
}

impl IntoIterator for SynHitSet {
    type Item = SynHit;
    type IntoIter = std::vec::IntoIter<SynHit>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.into_iter()
    }
}

impl<'a> IntoIterator for &'a SynHitSet {
    type Item = &'a SynHit;
    type IntoIter = std::slice::Iter<'a, SynHit>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.iter()
    }
}
