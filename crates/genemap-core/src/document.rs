//! Per-document mention aggregate.
//!
//! A `GeneDocument` owns the mentions found in one document by any number of
//! recognizers. Several recognizers often report the same gene with slightly
//! different spans ("IL3001" vs "IL3001 receptor"); unification reduces each
//! overlap cluster to one mention. Species trimming shrinks mentions that
//! start with an organism name. Neither ever creates a mention.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use genemap_common::{GeneMapError, GeneTagger, Resolution, Result, Token};

use crate::species::SpeciesPrefixSearcher;
use crate::synhit::SynHitSet;

/// A located gene/protein mention and everything resolved about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneMention {
    pub begin: usize,
    pub end: usize,
    pub text: String,
    pub tagger: GeneTagger,
    /// Recognizer confidence, if the recognizer supplied one
    pub confidence: Option<f64>,
    pub normalized: Option<String>,
    #[serde(default)]
    pub hits: SynHitSet,
    /// Taxonomy id implied by a stripped species prefix
    pub tax_id_hint: Option<String>,
    pub resolution: Option<Resolution>,
}

impl GeneMention {
    pub fn new(begin: usize, end: usize, text: impl Into<String>, tagger: GeneTagger) -> Self {
        Self {
            begin,
            end,
            text: text.into(),
            tagger,
            confidence: None,
            normalized: None,
            hits: SynHitSet::new(),
            tax_id_hint: None,
            resolution: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Span length; zero for an inverted span.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    pub fn is_empty(&self) -> bool {
        self.begin >= self.end
    }

    /// Offset ranges intersect.
    pub fn overlaps(&self, other: &GeneMention) -> bool {
        self.begin < other.end && other.begin < self.end
    }
}

/// Text, optional token layer and mentions of one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneDocument {
    text: String,
    tokens: Option<Vec<Token>>,
    mentions: Vec<GeneMention>,
}

impl GeneDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tokens: None,
            mentions: Vec::new(),
        }
    }

    /// Attach a token layer; tokens are kept sorted by offset.
    pub fn with_tokens(mut self, mut tokens: Vec<Token>) -> Self {
        tokens.sort_by_key(|t| (t.begin, t.end));
        self.tokens = Some(tokens);
        self
    }

    pub fn add_mention(&mut self, mention: GeneMention) -> Result<()> {
        if mention.begin >= mention.end {
            return Err(GeneMapError::InvalidMention(format!(
                "{:?} has begin {} >= end {}",
                mention.text, mention.begin, mention.end
            )));
        }
        self.mentions.push(mention);
        Ok(())
    }

    pub fn with_mentions(mut self, mentions: Vec<GeneMention>) -> Result<Self> {
        for m in mentions {
            self.add_mention(m)?;
        }
        Ok(self)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> Option<&[Token]> {
        self.tokens.as_deref()
    }

    pub fn mentions(&self) -> &[GeneMention] {
        &self.mentions
    }

    pub fn mentions_mut(&mut self) -> &mut [GeneMention] {
        &mut self.mentions
    }

    pub fn into_mentions(self) -> Vec<GeneMention> {
        self.mentions
    }

    // ── Unification ───────────────────────────────────────────────────────────

    /// Keep one `priority` mention per overlap cluster.
    ///
    /// In a cluster holding at least one mention of `priority`, the first such
    /// mention (by begin, then end) survives and the rest of the cluster is
    /// dropped. Clusters without a `priority` mention stay as they are.
    /// Returns the dropped mentions.
    pub fn unify_genes_prioritize_tagger(&mut self, priority: GeneTagger) -> Vec<GeneMention> {
        self.unify_clusters(|cluster| cluster.iter().position(|m| m.tagger == priority))
    }

    /// Keep the longest mention of every overlap cluster (the first one on
    /// equal length). Returns the dropped mentions.
    pub fn unify_genes_longer_first(&mut self) -> Vec<GeneMention> {
        self.unify_clusters(|cluster| {
            let mut best = 0;
            for (i, m) in cluster.iter().enumerate() {
                if m.len() > cluster[best].len() {
                    best = i;
                }
            }
            Some(best)
        })
    }

    /// `choose` picks the survivor of a multi-mention cluster, or `None` to
    /// leave the cluster untouched.
    fn unify_clusters<F>(&mut self, choose: F) -> Vec<GeneMention>
    where
        F: Fn(&[GeneMention]) -> Option<usize>,
    {
        self.mentions.sort_by_key(|m| (m.begin, m.end));

        let mut kept = Vec::with_capacity(self.mentions.len());
        let mut dropped = Vec::new();
        for mut cluster in overlap_clusters(std::mem::take(&mut self.mentions)) {
            if cluster.len() == 1 {
                kept.append(&mut cluster);
                continue;
            }
            match choose(&cluster) {
                Some(survivor) => {
                    let winner = cluster.remove(survivor);
                    debug!(
                        "unified {} overlapping mentions into {:?} [{}..{}] ({})",
                        cluster.len() + 1, winner.text, winner.begin, winner.end, winner.tagger
                    );
                    kept.push(winner);
                    dropped.append(&mut cluster);
                }
                None => kept.append(&mut cluster),
            }
        }
        self.mentions = kept;
        dropped
    }

    // ── Species prefixes ──────────────────────────────────────────────────────

    /// Drop a leading species name from every mention that has one.
    ///
    /// The begin offset advances by the prefix length. A prefix that would
    /// leave nothing of the mention is ignored. Returns the number of
    /// mentions trimmed.
    pub fn remove_species_mention(&mut self, searcher: &SpeciesPrefixSearcher) -> usize {
        let mut trimmed = 0;
        for mention in self.mentions.iter_mut() {
            let Some(found) = searcher.find_prefix(&mention.text) else {
                continue;
            };
            let rest = &mention.text[found.len..];
            if rest.trim().is_empty() || mention.begin + found.len >= mention.end {
                warn!(
                    "species prefix {:?} covers the whole mention {:?}, keeping it",
                    found.prefix.pattern, mention.text
                );
                continue;
            }
            debug!("stripped species prefix {:?} from {:?}", found.prefix.pattern, mention.text);
            mention.text = rest.to_string();
            mention.begin += found.len;
            if mention.tax_id_hint.is_none() {
                mention.tax_id_hint = found.prefix.tax_id.clone();
            }
            trimmed += 1;
        }
        trimmed
    }
}

/// Split offset-sorted mentions into maximal runs of overlapping mentions.
fn overlap_clusters(sorted: Vec<GeneMention>) -> Vec<Vec<GeneMention>> {
    let mut clusters: Vec<Vec<GeneMention>> = Vec::new();
    let mut cluster_end = 0;
    for mention in sorted {
        match clusters.last_mut() {
            Some(cluster) if mention.begin < cluster_end => {
                cluster_end = cluster_end.max(mention.end);
                cluster.push(mention);
            }
            _ => {
                cluster_end = mention.end;
                clusters.push(vec![mention]);
            }
        }
    }
    clusters
}
