//! The mapping engine.
//!
//! [`GeneMapper`] owns the loaded dictionary and model and runs the full
//! per-document pass:
//!
//! 1. strip species prefixes from mention text;
//! 2. normalise and score every mention;
//! 3. unify overlapping mentions according to the configured policy;
//! 4. corroborate survivors with the candidates of the mentions they beat;
//! 5. break ties with document context and attach a [`Resolution`].
//!
//! The engine holds no per-document state, so one instance can map many
//! documents concurrently.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use genemap_common::{GeneMapError, MapperConfig, Resolution, Result, UnificationPolicy};

use crate::context::ContextBuilder;
use crate::dictionary::SynonymDictionary;
use crate::disambiguate::Disambiguator;
use crate::document::{GeneDocument, GeneMention};
use crate::model::ScoringModel;
use crate::normalise::TermNormalizer;
use crate::scorer::CandidateScorer;
use crate::species::SpeciesPrefixSearcher;

/// Counters for one mapped document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MappingStats {
    pub mentions_in: usize,
    pub species_trimmed: usize,
    pub unified_away: usize,
    pub resolved: usize,
    pub unresolved: usize,
}

impl MappingStats {
    pub fn merge(&mut self, other: &MappingStats) {
        self.mentions_in += other.mentions_in;
        self.species_trimmed += other.species_trimmed;
        self.unified_away += other.unified_away;
        self.resolved += other.resolved;
        self.unresolved += other.unresolved;
    }
}

pub struct GeneMapper {
    config: MapperConfig,
    normalizer: TermNormalizer,
    scorer: CandidateScorer,
    context_builder: ContextBuilder,
    disambiguator: Disambiguator,
    species: Option<SpeciesPrefixSearcher>,
    dictionary: Arc<SynonymDictionary>,
}

impl GeneMapper {
    // ── Constructors ──────────────────────────────────────────────────────────

    pub fn new(config: MapperConfig, dictionary: Arc<SynonymDictionary>, model: Arc<ScoringModel>) -> Result<Self> {
        config.validate()?;

        let normalizer = TermNormalizer::new();
        let scorer = CandidateScorer::new(
            Arc::clone(&dictionary),
            model,
            &config.scoring,
            config.dictionary.max_candidates,
        )?;
        let species = if config.species.enabled {
            Some(SpeciesPrefixSearcher::new(config.species.prefixes.clone())?)
        } else {
            None
        };

        Ok(Self {
            normalizer,
            scorer,
            context_builder: ContextBuilder::new(normalizer, config.context.max_query_clauses),
            disambiguator: Disambiguator::new(config.context.tie_epsilon),
            species,
            dictionary,
            config,
        })
    }

    /// Load the dictionary, its contexts and the model named in `config`.
    pub fn from_config(config: &MapperConfig) -> Result<Self> {
        if config.dictionary.path.is_empty() {
            return Err(GeneMapError::Config("dictionary.path is not set".into()));
        }
        if config.model.path.is_empty() {
            return Err(GeneMapError::Config("model.path is not set".into()));
        }

        let mut dictionary = SynonymDictionary::from_path(&config.dictionary.path)?;
        if let Some(contexts) = &config.dictionary.contexts_path {
            dictionary.load_contexts_path(contexts)?;
        }
        let model = ScoringModel::from_path(&config.model.path)?;

        info!(
            "Gene mapper ready: {} synonyms, policy {:?}",
            dictionary.len(),
            config.unification.policy
        );
        Self::new(config.clone(), Arc::new(dictionary), Arc::new(model))
    }

    // ── Mapping ───────────────────────────────────────────────────────────────

    pub fn map_document(&self, doc: &mut GeneDocument) -> MappingStats {
        let mut stats = MappingStats {
            mentions_in: doc.mentions().len(),
            ..MappingStats::default()
        };

        if let Some(species) = &self.species {
            stats.species_trimmed = doc.remove_species_mention(species);
        }

        for mention in doc.mentions_mut() {
            self.score_mention(mention);
        }

        let dropped = match &self.config.unification.policy {
            UnificationPolicy::PrioritizeTagger { priority_tagger } => {
                doc.unify_genes_prioritize_tagger(*priority_tagger)
            }
            UnificationPolicy::LongerFirst => doc.unify_genes_longer_first(),
        };
        stats.unified_away = dropped.len();

        if self.config.unification.corroborate_overlaps && !dropped.is_empty() {
            corroborate(doc.mentions_mut(), &dropped);
        }

        // Queries need the whole document, so resolve before writing back.
        let snapshot: &GeneDocument = doc;
        let resolutions: Vec<Option<Resolution>> = snapshot
            .mentions()
            .iter()
            .map(|mention| self.resolve_mention(snapshot, mention))
            .collect();
        for (mention, resolution) in doc.mentions_mut().iter_mut().zip(resolutions) {
            match &resolution {
                Some(_) => stats.resolved += 1,
                None => stats.unresolved += 1,
            }
            mention.resolution = resolution;
        }

        debug!(
            "mapped document: {} mentions in, {} resolved, {} unresolved, {} unified away",
            stats.mentions_in, stats.resolved, stats.unresolved, stats.unified_away
        );
        stats
    }

    /// Map independent documents, in parallel above the configured batch size.
    pub fn map_documents(&self, docs: &mut [GeneDocument]) -> Vec<MappingStats> {
        #[cfg(feature = "parallel")]
        {
            let threshold = self.config.execution.parallel_threshold;
            if docs.len() > threshold && threshold > 0 {
                use rayon::prelude::*;
                return docs.par_iter_mut().map(|doc| self.map_document(doc)).collect();
            }
        }
        docs.iter_mut().map(|doc| self.map_document(doc)).collect()
    }

    fn score_mention(&self, mention: &mut GeneMention) {
        let normalized = self.normalizer.normalize(&mention.text);
        let mut hits = self.scorer.score(&normalized);

        if hits.is_empty() && self.config.scoring.strip_non_descriptive_fallback {
            if let Some(stripped) = self.normalizer.strip_non_descriptive_suffix(&normalized) {
                debug!("retrying '{}' as '{}'", normalized, stripped);
                hits = self.scorer.score(&stripped);
            }
        }

        mention.normalized = Some(normalized);
        mention.hits = hits;
    }

    fn resolve_mention(&self, doc: &GeneDocument, mention: &GeneMention) -> Option<Resolution> {
        let query = if mention.hits.tied_with_first(self.config.context.tie_epsilon).len() > 1 {
            Some(
                self.context_builder
                    .make_context_query(doc, mention, self.config.context.window_size),
            )
        } else {
            None
        };

        let hit = self
            .disambiguator
            .resolve(&mention.hits, query.as_ref(), &self.dictionary)?;
        Some(Resolution {
            entry_id: hit.entry_id,
            score: hit.score,
            tax_id: hit.tax_id.or_else(|| mention.tax_id_hint.clone()),
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn dictionary(&self) -> &SynonymDictionary {
        &self.dictionary
    }

    pub fn normalizer(&self) -> &TermNormalizer {
        &self.normalizer
    }
}

/// Keep only the candidates of a survivor that a discarded overlapping
/// mention also found, when there are any.
fn corroborate(survivors: &mut [GeneMention], dropped: &[GeneMention]) {
    for survivor in survivors.iter_mut() {
        for other in dropped {
            if other.hits.is_empty() || !other.overlaps(survivor) {
                continue;
            }
            if survivor.hits.contains_any(&other.hits) && survivor.hits.retain_all(&other.hits) {
                debug!(
                    "{:?} corroborated by {:?} ({}), {} candidates left",
                    survivor.text,
                    other.text,
                    other.tagger,
                    survivor.hits.len()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Feature;
    use genemap_common::GeneTagger;
    use pretty_assertions::assert_eq;

    fn sample_dictionary() -> Arc<SynonymDictionary> {
        let tsv = "IL-2\t3558\t9606\n\
                   interleukin 2\t3558\t9606\n\
                   Hsp70\t944933\n\
                   DnaK\t944750\t562\n\
                   CD25\t3559\t9606\n\
                   CD25\t1111\n";
        let mut dict = SynonymDictionary::from_tsv(tsv).unwrap();
        dict.load_contexts_tsv("3559\tinterleukin 2 receptor on activated T cells\n1111\tplant cell wall\n")
            .unwrap();
        Arc::new(dict)
    }

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

    fn sample_mapper(config: MapperConfig) -> GeneMapper {
        GeneMapper::new(config, sample_dictionary(), sample_model()).unwrap()
    }

    #[test]
    fn test_mapper_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GeneMapper>();
    }

    #[test]
    fn test_map_document_resolves_exact() {
        let text = "Secretion of IL-2 by T cells";
        let mut doc = GeneDocument::new(text)
            .with_mentions(vec![GeneMention::new(13, 17, "IL-2", GeneTagger::Gazetteer)])
            .unwrap();
        let stats = sample_mapper(MapperConfig::default()).map_document(&mut doc);

        assert_eq!(stats.resolved, 1);
        let mention = &doc.mentions()[0];
        assert_eq!(mention.normalized.as_deref(), Some("il 2"));
        let resolution = mention.resolution.as_ref().unwrap();
        assert_eq!(resolution.entry_id, "3558");
        assert_eq!(resolution.tax_id.as_deref(), Some("9606"));
    }

    #[test]
    fn test_species_trim_then_resolve() {
        let text = "The E. coli DnaK protein folds";
        let mut doc = GeneDocument::new(text)
            .with_mentions(vec![GeneMention::new(4, 24, "E. coli DnaK protein", GeneTagger::Gazetteer)])
            .unwrap();
        let stats = sample_mapper(MapperConfig::default()).map_document(&mut doc);

        assert_eq!(stats.species_trimmed, 1);
        let mention = &doc.mentions()[0];
        assert_eq!(mention.begin, 12);
        assert_eq!(mention.text, "DnaK protein");
        assert_eq!(mention.tax_id_hint.as_deref(), Some("562"));
        assert_eq!(mention.resolution.as_ref().unwrap().entry_id, "944750");
    }

    #[test]
    fn test_non_descriptive_fallback() {
        let text = "Hsp70 protein";
        let mut doc = GeneDocument::new(text)
            .with_mentions(vec![GeneMention::new(0, 13, text, GeneTagger::Gazetteer)])
            .unwrap();
        let strict = MapperConfig::default().with_acceptance_threshold(0.9);
        sample_mapper(strict).map_document(&mut doc);

        let mention = &doc.mentions()[0];
        assert_eq!(mention.normalized.as_deref(), Some("hsp 70 protein"));
        let resolution = mention.resolution.as_ref().unwrap();
        assert_eq!(resolution.entry_id, "944933");
        assert_eq!(resolution.score, 1.0);
    }

    #[test]
    fn test_unification_and_corroboration() {
        let text = "human IL-2 and more";
        let mut doc = GeneDocument::new(text)
            .with_mentions(vec![
                GeneMention::new(6, 10, "IL-2", GeneTagger::StatisticalTagger),
                GeneMention::new(0, 10, "human IL-2", GeneTagger::Gazetteer),
            ])
            .unwrap();
        let stats = sample_mapper(MapperConfig::default()).map_document(&mut doc);

        assert_eq!(stats.unified_away, 1);
        assert_eq!(doc.mentions().len(), 1);
        assert_eq!(doc.mentions()[0].tagger, GeneTagger::StatisticalTagger);
        assert_eq!(doc.mentions()[0].resolution.as_ref().unwrap().entry_id, "3558");
    }

    #[test]
    fn test_context_breaks_tie() {
        let text = "CD25 marks activated T cells";
        let mut doc = GeneDocument::new(text)
            .with_mentions(vec![GeneMention::new(0, 4, "CD25", GeneTagger::Dictionary)])
            .unwrap();
        sample_mapper(MapperConfig::default()).map_document(&mut doc);
        assert_eq!(doc.mentions()[0].hits.len(), 2);
        assert_eq!(doc.mentions()[0].resolution.as_ref().unwrap().entry_id, "3559");
    }

    #[test]
    fn test_unresolved_mention() {
        let text = "kinase";
        let mut doc = GeneDocument::new(text)
            .with_mentions(vec![GeneMention::new(0, 6, "kinase", GeneTagger::Dictionary)])
            .unwrap();
        let stats = sample_mapper(MapperConfig::default()).map_document(&mut doc);
        assert_eq!(stats.unresolved, 1);
        assert!(doc.mentions()[0].resolution.is_none());
    }

    #[test]
    fn test_map_documents_batch() {
        let mapper = sample_mapper(MapperConfig::default());
        let mut docs: Vec<GeneDocument> = (0..25)
            .map(|_| {
                GeneDocument::new("IL-2")
                    .with_mentions(vec![GeneMention::new(0, 4, "IL-2", GeneTagger::Gazetteer)])
                    .unwrap()
            })
            .collect();
        let stats = mapper.map_documents(&mut docs);
        assert_eq!(stats.len(), 25);
        assert!(stats.iter().all(|s| s.resolved == 1));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = MapperConfig::default().with_window_size(0);
        assert!(matches!(
            GeneMapper::new(config, sample_dictionary(), sample_model()),
            Err(GeneMapError::Config(_))
        ));
        assert!(matches!(
            GeneMapper::from_config(&MapperConfig::default()),
            Err(GeneMapError::Config(_))
        ));
    }
}
