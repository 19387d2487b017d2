//! Candidate retrieval and model scoring.

use std::sync::Arc;

use tracing::{debug, trace};

use genemap_common::{Result, ScoringConfig};

use crate::compare::PairComparator;
use crate::dictionary::SynonymDictionary;
use crate::features::FeatureExtractor;
use crate::filter::CandidateFilter;
use crate::model::{ScoringModel, PERFECT_SCORE};
use crate::synhit::{Matcher, SynHit, SynHitSet};

/// Scores the dictionary entries that share a token with a mention.
pub struct CandidateScorer {
    dictionary: Arc<SynonymDictionary>,
    model: Arc<ScoringModel>,
    comparator: PairComparator,
    extractor: FeatureExtractor,
    filter: Option<CandidateFilter>,
    threshold: f64,
    max_candidates: usize,
}

impl CandidateScorer {
    pub fn new(
        dictionary: Arc<SynonymDictionary>,
        model: Arc<ScoringModel>,
        scoring: &ScoringConfig,
        max_candidates: usize,
    ) -> Result<Self> {
        let filter = if scoring.candidate_filter {
            Some(CandidateFilter::new()?)
        } else {
            None
        };
        Ok(Self {
            dictionary,
            model,
            comparator: PairComparator::new(),
            extractor: FeatureExtractor::new()?,
            filter,
            threshold: scoring.acceptance_threshold,
            max_candidates,
        })
    }

    /// Candidates for a normalised mention.
    ///
    /// An identical normalised synonym scores [`PERFECT_SCORE`] without the
    /// model. Everything else must beat the acceptance threshold. An empty
    /// set means no candidate was found.
    pub fn score(&self, normalized: &str) -> SynHitSet {
        let mut hits = SynHitSet::new();
        if normalized.is_empty() {
            return hits;
        }

        for entry in self.dictionary.exact(normalized) {
            hits.add(
                SynHit::new(&entry.entry_id, PERFECT_SCORE, Matcher::Exact, &entry.normalized)
                    .with_tax_id(entry.tax_id.clone()),
            );
        }

        let search: Vec<&str> = normalized.split(' ').collect();
        for entry in self.dictionary.candidates(normalized, self.max_candidates) {
            if entry.normalized == normalized {
                continue;
            }
            let found: Vec<&str> = entry.normalized.split(' ').collect();
            let alignment = self.comparator.align(&search, &found);

            if let Some(filter) = &self.filter {
                if filter.filter_out(normalized, &entry.normalized, &alignment) {
                    continue;
                }
            }

            let features = self.extractor.extract(normalized, &entry.normalized, &alignment);
            let confidence = self.model.score(&features);
            trace!("'{}' <-> '{}' ({}): {:.4}", normalized, entry.normalized, entry.entry_id, confidence);
            if confidence > self.threshold {
                hits.add(
                    SynHit::new(&entry.entry_id, confidence, Matcher::Model, &entry.normalized)
                        .with_tax_id(entry.tax_id.clone()),
                );
            }
        }

        if hits.is_empty() {
            debug!("no candidate found for '{}'", normalized);
        }
        hits
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn dictionary(&self) -> &SynonymDictionary {
        &self.dictionary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Feature;

    fn sample_dictionary() -> Arc<SynonymDictionary> {
        let tsv = "IL-2\t3558\t9606\n\
                   interleukin 2\t3558\t9606\n\
                   IL-3\t3562\t9606\n\
                   IL-2 receptor alpha\t3559\t9606\n\
                   TNF alpha\t7124\t9606\n";
        Arc::new(SynonymDictionary::from_tsv(tsv).unwrap())
    }

    /// Rewards token overlap, punishes differing tokens.
    fn sample_model() -> Arc<ScoringModel> {
        let mut weights = [0.0; Feature::COUNT];
        for (i, f) in Feature::ALL.iter().enumerate() {
            weights[i] = match f {
                Feature::TokenOverlap => 6.0,
                Feature::NumDiffs => -1.5,
                _ => 0.0,
            };
        }
        Arc::new(ScoringModel::new(-3.0, weights).unwrap())
    }

    fn scorer(candidate_filter: bool) -> CandidateScorer {
        let scoring = ScoringConfig {
            candidate_filter,
            ..ScoringConfig::default()
        };
        CandidateScorer::new(sample_dictionary(), sample_model(), &scoring, 200).unwrap()
    }

    #[test]
    fn test_exact_match_is_perfect() {
        let hits = scorer(true).score("il 2");
        let first = hits.first().unwrap();
        assert_eq!(first.entry_id, "3558");
        assert_eq!(first.score, PERFECT_SCORE);
        assert_eq!(first.matcher, Matcher::Exact);
        assert_eq!(first.tax_id.as_deref(), Some("9606"));
    }

    #[test]
    fn test_filter_rejects_other_number() {
        // "il 3" differs from "il 2" in one number only
        let hits = scorer(true).score("il 2");
        assert!(!hits.contains("3562"));
    }

    #[test]
    fn test_model_hit_above_threshold() {
        let hits = scorer(true).score("tnf alpha 1");
        let hit = hits.get("7124").unwrap();
        assert_eq!(hit.matcher, Matcher::Model);
        assert!(hit.score > 0.5 && hit.score < 1.0);
    }

    #[test]
    fn test_no_candidates_is_empty() {
        assert!(scorer(true).score("kinase").is_empty());
        assert!(scorer(true).score("").is_empty());
    }
}
