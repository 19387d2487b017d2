//! Tie resolution over a mention's candidates.

use tracing::debug;

use crate::context::ContextQuery;
use crate::dictionary::SynonymDictionary;
use crate::synhit::{SynHit, SynHitSet};

#[derive(Debug, Clone, Copy)]
pub struct Disambiguator {
    epsilon: f64,
}

impl Disambiguator {
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// Pick one hit out of `hits`.
    ///
    /// Hits tied with the best score are re-ranked by how well their entry's
    /// context matches `query`; whatever is still tied goes to the lowest
    /// entry id. Only an empty set yields `None`.
    pub fn resolve(&self, hits: &SynHitSet, query: Option<&ContextQuery>, dictionary: &SynonymDictionary) -> Option<SynHit> {
        let tied = hits.tied_with_first(self.epsilon);
        match tied {
            [] => return None,
            [only] => return Some(only.clone()),
            _ => {}
        }

        let mut scored: Vec<SynHit> = tied
            .iter()
            .cloned()
            .map(|mut hit| {
                hit.context_score = match (query, dictionary.context_terms(&hit.entry_id)) {
                    (Some(q), Some(terms)) => q.score(terms),
                    _ => 0.0,
                };
                hit
            })
            .collect();

        let best = scored.iter().map(|h| h.context_score).fold(f64::NEG_INFINITY, f64::max);
        scored.retain(|h| best - h.context_score <= self.epsilon);
        let winner = scored.into_iter().min_by(|a, b| a.entry_id.cmp(&b.entry_id))?;

        debug!(
            "{} candidates tied at {:.4}, chose {} (context {:.4})",
            tied.len(),
            winner.score,
            winner.entry_id,
            winner.context_score
        );
        Some(winner)
    }
}

impl Default for Disambiguator {
    fn default() -> Self {
        Self::new(1e-6)
    }
}
