//! Synonym dictionary.
//!
//! Loaded once from a tab-separated file and then read-only:
//!
//! ```text
//! # synonym <TAB> entry_id [<TAB> tax_id]
//! interleukin 2	3558	9606
//! IL-2	3558	9606
//! ```
//!
//! Synonyms are normalised at load time with [`TermNormalizer`], so lookups
//! take normalised mention text. An inverted token index narrows the
//! candidates for a mention down to the entries sharing at least one
//! content token with it.

use std::path::Path;

use ahash::{AHashMap, AHashSet};
use serde::Serialize;
use tracing::info;

use genemap_common::{GeneMapError, Result};

use crate::context::context_terms;
use crate::lexicon::{is_number, is_single_char, is_special_word};
use crate::normalise::TermNormalizer;

/// One synonym of one database entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DictionaryEntry {
    pub entry_id: String,
    /// Synonym as written in the dictionary file
    pub synonym: String,
    pub normalized: String,
    pub tax_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DictionaryStats {
    pub entries: usize,
    pub distinct_ids: usize,
    pub indexed_tokens: usize,
    pub duplicates_skipped: usize,
}

pub struct SynonymDictionary {
    entries: Vec<DictionaryEntry>,
    /// normalized synonym → entry indices
    exact: AHashMap<String, Vec<usize>>,
    /// indexed token → entry indices, ascending
    index: AHashMap<String, Vec<usize>>,
    /// entry id → context terms
    contexts: AHashMap<String, AHashSet<String>>,
    stats: DictionaryStats,
}

impl SynonymDictionary {
    // ── Constructors ──────────────────────────────────────────────────────────

    pub fn from_tsv(tsv: &str) -> Result<Self> {
        let normalizer = TermNormalizer::new();
        let mut entries: Vec<DictionaryEntry> = Vec::new();
        let mut seen: AHashSet<(String, String)> = AHashSet::new();
        let mut duplicates_skipped = 0usize;

        for (line_no, line) in tsv.lines().enumerate() {
            let line_no = line_no + 1;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 2 {
                return Err(malformed(line_no, "expected synonym and entry id separated by a tab"));
            }
            let synonym = fields[0].trim();
            let entry_id = fields[1].trim();
            if entry_id.is_empty() {
                return Err(malformed(line_no, "empty entry id"));
            }
            let normalized = normalizer.normalize(synonym);
            if normalized.is_empty() {
                return Err(malformed(line_no, &format!("synonym {synonym:?} normalizes to nothing")));
            }
            let tax_id = fields
                .get(2)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from);

            if !seen.insert((normalized.clone(), entry_id.to_string())) {
                duplicates_skipped += 1;
                continue;
            }
            entries.push(DictionaryEntry {
                entry_id: entry_id.to_string(),
                synonym: synonym.to_string(),
                normalized,
                tax_id,
            });
        }

        let mut exact: AHashMap<String, Vec<usize>> = AHashMap::new();
        let mut index: AHashMap<String, Vec<usize>> = AHashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            exact.entry(entry.normalized.clone()).or_default().push(i);
            for token in index_tokens(&entry.normalized) {
                let postings = index.entry(token.to_string()).or_default();
                if postings.last() != Some(&i) {
                    postings.push(i);
                }
            }
        }

        let distinct_ids = entries.iter().map(|e| e.entry_id.as_str()).collect::<AHashSet<_>>().len();
        let stats = DictionaryStats {
            entries: entries.len(),
            distinct_ids,
            indexed_tokens: index.len(),
            duplicates_skipped,
        };
        info!(
            "Synonym dictionary loaded: {} synonyms, {} entries, {} indexed tokens ({} duplicates skipped)",
            stats.entries, stats.distinct_ids, stats.indexed_tokens, stats.duplicates_skipped
        );

        Ok(Self {
            entries,
            exact,
            index,
            contexts: AHashMap::new(),
            stats,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading synonym dictionary from {}", path.display());
        let tsv = std::fs::read_to_string(path)?;
        Self::from_tsv(&tsv)
    }

    // ── Contexts ──────────────────────────────────────────────────────────────

    /// Attach `entry_id<TAB>free text` context descriptions.
    ///
    /// Several lines for one id are merged. Returns the number of lines read.
    pub fn load_contexts_tsv(&mut self, tsv: &str) -> Result<usize> {
        let normalizer = TermNormalizer::new();
        let mut loaded = 0usize;

        for (line_no, line) in tsv.lines().enumerate() {
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((entry_id, text)) = line.split_once('\t') else {
                return Err(malformed(line_no + 1, "expected entry id and context text separated by a tab"));
            };
            let entry_id = entry_id.trim();
            if entry_id.is_empty() {
                return Err(malformed(line_no + 1, "empty entry id"));
            }
            self.contexts
                .entry(entry_id.to_string())
                .or_default()
                .extend(context_terms(&normalizer, text));
            loaded += 1;
        }

        info!("Entry contexts loaded: {} lines, {} entries with context", loaded, self.contexts.len());
        Ok(loaded)
    }

    pub fn load_contexts_path(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let tsv = std::fs::read_to_string(path.as_ref())?;
        self.load_contexts_tsv(&tsv)
    }

    pub fn context_terms(&self, entry_id: &str) -> Option<&AHashSet<String>> {
        self.contexts.get(entry_id)
    }

    // ── Lookup ────────────────────────────────────────────────────────────────

    /// Entries whose normalised synonym equals `normalized`.
    pub fn exact(&self, normalized: &str) -> impl Iterator<Item = &DictionaryEntry> + '_ {
        self.exact
            .get(normalized)
            .into_iter()
            .flatten()
            .map(move |&i| &self.entries[i])
    }

    /// Up to `max` entries sharing an indexed token with `normalized`, most
    /// shared tokens first, then in file order.
    pub fn candidates(&self, normalized: &str, max: usize) -> Vec<&DictionaryEntry> {
        let query: AHashSet<&str> = index_tokens(normalized).into_iter().collect();

        let mut shared: AHashMap<usize, usize> = AHashMap::new();
        for token in &query {
            if let Some(postings) = self.index.get(*token) {
                for &i in postings {
                    *shared.entry(i).or_insert(0) += 1;
                }
            }
        }

        let mut ranked: Vec<(usize, usize)> = shared.into_iter().collect();
        ranked.sort_unstable_by(|(ia, na), (ib, nb)| nb.cmp(na).then(ia.cmp(ib)));
        ranked.truncate(max);
        ranked.into_iter().map(|(i, _)| &self.entries[i]).collect()
    }

    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> DictionaryStats {
        self.stats
    }
}

/// Content tokens of a normalised term, or all of them when it has none.
fn index_tokens(normalized: &str) -> Vec<&str> {
    let all: Vec<&str> = normalized.split(' ').filter(|t| !t.is_empty()).collect();
    let content: Vec<&str> = all
        .iter()
        .copied()
        .filter(|t| !is_number(t) && !is_special_word(t) && !is_single_char(t))
        .collect();
    if content.is_empty() { all } else { content }
}

fn malformed(line: usize, reason: &str) -> GeneMapError {
    GeneMapError::MalformedDictionaryEntry {
        line,
        reason: reason.to_string(),
    }
}
