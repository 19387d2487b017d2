//! Mention context windows and context queries.
//!
//! When the best candidates of a mention score the same, the words around
//! the mention decide: the window is turned into a bag of normalized terms
//! and compared against each candidate's context description.

use ahash::AHashSet;
use tracing::warn;

use genemap_common::Token;

use crate::document::{GeneDocument, GeneMention};
use crate::lexicon::{is_context_stopword, is_number};
use crate::normalise::TermNormalizer;

/// Disjunctive bag of context terms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextQuery {
    terms: Vec<String>,
}

impl ContextQuery {
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Binary cosine overlap with `entry_terms`, in [0, 1].
    pub fn score(&self, entry_terms: &AHashSet<String>) -> f64 {
        if self.terms.is_empty() || entry_terms.is_empty() {
            return 0.0;
        }
        let shared = self.terms.iter().filter(|t| entry_terms.contains(*t)).count();
        shared as f64 / ((self.terms.len() * entry_terms.len()) as f64).sqrt()
    }
}

/// Normalized, de-duplicated content words of `text`.
pub fn context_terms(normalizer: &TermNormalizer, text: &str) -> Vec<String> {
    let mut seen = AHashSet::new();
    normalizer
        .tokens(text)
        .into_iter()
        .filter(|t| !is_context_stopword(t) && !is_number(t))
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

#[derive(Debug, Clone)]
pub struct ContextBuilder {
    normalizer: TermNormalizer,
    max_query_clauses: usize,
}

impl ContextBuilder {
    pub fn new(normalizer: TermNormalizer, max_query_clauses: usize) -> Self {
        Self { normalizer, max_query_clauses }
    }

    /// Text around `mention`: up to `window_size` tokens of the document's
    /// token layer, or `window_size` characters when there is none.
    ///
    /// The window is cut short at the document boundaries, never padded.
    pub fn make_context(&self, doc: &GeneDocument, mention: &GeneMention, window_size: usize) -> String {
        match doc.tokens() {
            Some(tokens) if !tokens.is_empty() => token_window(doc.text(), tokens, mention, window_size),
            _ => char_window(doc.text(), mention, window_size),
        }
    }

    /// The context window as a query over normalized terms.
    pub fn make_context_query(&self, doc: &GeneDocument, mention: &GeneMention, window_size: usize) -> ContextQuery {
        let window = self.make_context(doc, mention, window_size);
        let mut terms = context_terms(&self.normalizer, &window);
        if terms.len() > self.max_query_clauses {
            warn!(
                "context query for {:?} has {} terms, keeping the first {}",
                mention.text,
                terms.len(),
                self.max_query_clauses
            );
            terms.truncate(self.max_query_clauses);
        }
        ContextQuery { terms }
    }
}

fn token_window(text: &str, tokens: &[Token], mention: &GeneMention, window_size: usize) -> String {
    if window_size == 0 {
        return String::new();
    }
    let first = tokens
        .iter()
        .position(|t| t.end > mention.begin)
        .unwrap_or(tokens.len() - 1);
    let half = window_size / 2;
    let start = first.saturating_sub(half);
    let stop = (first + (window_size - half)).min(tokens.len());

    let begin = floor_char_boundary(text, tokens[start].begin);
    let end = floor_char_boundary(text, tokens[stop - 1].end);
    if begin >= end {
        return String::new();
    }
    text[begin..end].to_string()
}

fn char_window(text: &str, mention: &GeneMention, window_size: usize) -> String {
    let affix = window_size.saturating_sub(mention.len()) / 2;
    let begin = floor_char_boundary(text, mention.begin.saturating_sub(affix));
    let end = floor_char_boundary(text, mention.end.saturating_add(affix));
    if begin >= end {
        return String::new();
    }
    text[begin..end].trim().to_string()
}

/// Largest char boundary at or below `index`, clamped to the text.
fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut i = index.min(text.len());
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use genemap_common::GeneTagger;

    const TEXT: &str = "IL2 is secreted by activated T cells and binds the IL2 receptor complex";

    fn whitespace_tokens(text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut start = None;
        for (i, c) in text.char_indices() {
            match (c.is_whitespace(), start) {
                (true, Some(s)) => {
                    tokens.push(Token::new(s, i));
                    start = None;
                }
                (false, None) => start = Some(i),
                _ => {}
            }
        }
        if let Some(s) = start {
            tokens.push(Token::new(s, text.len()));
        }
        tokens
    }

    fn builder() -> ContextBuilder {
        ContextBuilder::new(TermNormalizer::new(), 1024)
    }

    #[test]
    fn test_token_window_truncated_at_start() {
        let doc = GeneDocument::new(TEXT).with_tokens(whitespace_tokens(TEXT));
        let mention = GeneMention::new(0, 3, "IL2", GeneTagger::Gazetteer);
        let window = builder().make_context(&doc, &mention, 6);
        assert_eq!(window, "IL2 is secreted");
        assert!(window.split_whitespace().count() < 6);
    }

    #[test]
    fn test_token_window_centered() {
        let doc = GeneDocument::new(TEXT).with_tokens(whitespace_tokens(TEXT));
        let begin = TEXT.find("activated").unwrap();
        let mention = GeneMention::new(begin, begin + 9, "activated", GeneTagger::Gazetteer);
        let window = builder().make_context(&doc, &mention, 4);
        assert_eq!(window, "secreted by activated T");
    }

    #[test]
    fn test_token_window_truncated_at_end() {
        let doc = GeneDocument::new(TEXT).with_tokens(whitespace_tokens(TEXT));
        let begin = TEXT.find("complex").unwrap();
        let mention = GeneMention::new(begin, TEXT.len(), "complex", GeneTagger::Gazetteer);
        let window = builder().make_context(&doc, &mention, 6);
        assert_eq!(window, "the IL2 receptor complex");
    }

    #[test]
    fn test_char_window_truncated_at_start() {
        let doc = GeneDocument::new(TEXT);
        let mention = GeneMention::new(0, 3, "IL2", GeneTagger::Gazetteer);
        let window = builder().make_context(&doc, &mention, 11);
        assert_eq!(window, "IL2 is");
        assert!(window.len() < 11);
    }

    #[test]
    fn test_char_window_at_end_and_multibyte() {
        let text = "binds TNFα";
        let doc = GeneDocument::new(text);
        let mention = GeneMention::new(6, text.len(), "TNFα", GeneTagger::Gazetteer);
        let window = builder().make_context(&doc, &mention, 9);
        assert_eq!(window, "s TNFα");
    }

    #[test]
    fn test_context_query_terms() {
        let doc = GeneDocument::new(TEXT).with_tokens(whitespace_tokens(TEXT));
        let mention = GeneMention::new(0, 3, "IL2", GeneTagger::Gazetteer);
        let query = builder().make_context_query(&doc, &mention, 20);
        let terms: Vec<&str> = query.terms().iter().map(String::as_str).collect();
        assert_eq!(
            terms,
            vec!["il", "secreted", "activated", "t", "cells", "binds"]
        );
    }

    #[test]
    fn test_context_query_clause_cap() {
        let doc = GeneDocument::new(TEXT).with_tokens(whitespace_tokens(TEXT));
        let mention = GeneMention::new(0, 3, "IL2", GeneTagger::Gazetteer);
        let query = ContextBuilder::new(TermNormalizer::new(), 3).make_context_query(&doc, &mention, 20);
        assert_eq!(query.terms().len(), 3);
    }

    #[test]
    fn test_query_score() {
        let doc = GeneDocument::new("activated T cells secrete it");
        let mention = GeneMention::new(0, 9, "activated", GeneTagger::Gazetteer);
        let query = builder().make_context_query(&doc, &mention, 100);
        let entry: AHashSet<String> = ["t", "cells", "growth"].iter().map(|s| s.to_string()).collect();
        let score = query.score(&entry);
        assert!(score > 0.0 && score <= 1.0);
        assert_eq!(query.score(&AHashSet::new()), 0.0);
        assert_eq!(ContextQuery::default().score(&entry), 0.0);
    }
}
