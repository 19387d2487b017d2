//! Gene and protein mention normalisation and disambiguation.
//!
//! Takes gene mentions located in a document by one or more recognizers,
//! maps each to a database entry through a synonym dictionary and a
//! pre-trained pair scoring model, reconciles overlapping mentions and
//! breaks ties with document context.
//!
//! Usage:
//! ```ignore
//! let mapper = GeneMapper::from_config(&MapperConfig::from_yaml("genemap.yaml")?)?;
//! let mut doc = GeneDocument::new(text).with_mentions(mentions)?;
//! let stats = mapper.map_document(&mut doc);
//! ```

pub mod compare;
pub mod context;
pub mod dictionary;
pub mod disambiguate;
pub mod document;
pub mod features;
pub mod filter;
pub mod lexicon;
pub mod mapper;
pub mod model;
pub mod normalise;
pub mod scorer;
pub mod species;
pub mod synhit;

pub use compare::{Alignment, PairComparator};
pub use context::{ContextBuilder, ContextQuery};
pub use dictionary::{DictionaryEntry, DictionaryStats, SynonymDictionary};
pub use disambiguate::Disambiguator;
pub use document::{GeneDocument, GeneMention};
pub use features::{Feature, FeatureExtractor, FeatureVector};
pub use filter::{CandidateFilter, FilterReason};
pub use mapper::{GeneMapper, MappingStats};
pub use model::{ScoringModel, PERFECT_SCORE};
pub use normalise::TermNormalizer;
pub use scorer::CandidateScorer;
pub use species::{PrefixMatch, SpeciesPrefixSearcher};
pub use synhit::{Matcher, SynHit, SynHitSet};

pub use genemap_common::{GeneMapError, GeneTagger, MapperConfig, Resolution, Result, Token};
