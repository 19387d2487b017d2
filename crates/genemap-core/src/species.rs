//! Species-name prefix matching.
//!
//! Mentions like "E. coli Hsp70 protein DnaK" carry the organism in front
//! of the gene name. The prefixes are a plain data list (see
//! [`default_species_prefixes`]) compiled into one anchored Aho-Corasick
//! automaton; the longest prefix at offset 0 wins.

use aho_corasick::{AhoCorasick, Anchored, Input, MatchKind, StartKind};
use tracing::{info, warn};

use genemap_common::mapper_config::default_species_prefixes;
use genemap_common::{GeneMapError, Result, SpeciesPrefix};

/// A prefix found at the start of a mention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrefixMatch<'a> {
    /// Byte length of the matched prefix, trailing space included
    pub len: usize,
    pub prefix: &'a SpeciesPrefix,
}

pub struct SpeciesPrefixSearcher {
    automaton: AhoCorasick,
    prefixes: Vec<SpeciesPrefix>,
}

impl SpeciesPrefixSearcher {
    pub fn new(prefixes: Vec<SpeciesPrefix>) -> Result<Self> {
        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .start_kind(StartKind::Anchored)
            .build(prefixes.iter().map(|p| p.pattern.as_str()))
            .map_err(|e| GeneMapError::Pattern(format!("species prefixes: {e}")))?;

        info!("Species prefix searcher built: {} prefixes", prefixes.len());
        Ok(Self { automaton, prefixes })
    }

    /// The built-in genus/adjective list.
    pub fn with_defaults() -> Result<Self> {
        Self::new(default_species_prefixes())
    }

    /// Longest prefix that `text` starts with.
    pub fn find_prefix(&self, text: &str) -> Option<PrefixMatch<'_>> {
        let input = Input::new(text).anchored(Anchored::Yes);
        match self.automaton.try_find(input) {
            Ok(Some(m)) => Some(PrefixMatch {
                len: m.end(),
                prefix: &self.prefixes[m.pattern().as_usize()],
            }),
            Ok(None) => None,
            Err(e) => {
                warn!("species prefix search failed on {:?}: {}", text, e);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}
