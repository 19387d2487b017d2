//! Gene name term normalisation.
//!
//! Canonicalizes raw mention or synonym text into a lower-case,
//! space-separated token sequence so that spelling variants of one name
//! ("IL-2R", "IL2R", "il 2 r") collapse onto the same key.
//!
//! # Example
//! ```ignore
//! let norm = TermNormalizer::new();
//! assert_eq!(norm.normalize("IL-2Rhigh"), "il 2 r high");
//! assert_eq!(norm.normalize("CS-IV"), "cs 4");
//! ```
//!
//! Steps, in order:
//! 1. Unicode greek letters are spelled out (`α` → `alpha`).
//! 2. Every non-alphanumeric character is a boundary, except a decimal
//!    point between two digits. Other non-ASCII characters are boundaries too.
//! 3. Boundaries are inserted at lower→upper, letter→digit and digit→letter
//!    transitions.
//! 4. Greek names and descriptor words glued to the end of a letter run are
//!    split off ("TNFalpha", "Rhigh").
//! 5. Lower-casing, stopword removal, then roman numerals → arabic digits
//!    when the term has more than one token.

use tracing::trace;

use crate::lexicon::{
    is_greek, is_non_descriptive, DESCRIPTOR_SUFFIXES, GREEK_CHARS, GREEK_SUFFIXES,
    TERM_STOPWORDS,
};

/// Stateless normaliser; cheap to construct and safe to share.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermNormalizer;

impl TermNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalise `raw` into space-joined lower-case tokens.
    pub fn normalize(&self, raw: &str) -> String {
        self.tokens(raw).join(" ")
    }

    /// Same as [`normalize`](Self::normalize), returning the tokens.
    pub fn tokens(&self, raw: &str) -> Vec<String> {
        let expanded = spell_out_greek(raw);

        let mut tokens: Vec<String> = Vec::new();
        for raw_token in split_boundaries(&expanded) {
            for piece in split_transitions(&raw_token) {
                for part in split_glued_suffixes(&piece) {
                    tokens.push(part.to_ascii_lowercase());
                }
            }
        }

        let kept: Vec<String> = tokens
            .iter()
            .filter(|t| !TERM_STOPWORDS.contains(&t.as_str()))
            .cloned()
            .collect();
        if !kept.is_empty() {
            tokens = kept;
        }

        if tokens.len() > 1 {
            for token in tokens.iter_mut() {
                if let Some(value) = roman_to_arabic(token) {
                    *token = value.to_string();
                }
            }
        }
        tokens
    }

    /// Drop trailing non-descriptive words ("p53 protein" → "p 53").
    ///
    /// Takes already normalised text. Returns `None` when nothing was
    /// removed or when nothing would remain.
    pub fn strip_non_descriptive_suffix(&self, normalized: &str) -> Option<String> {
        let tokens: Vec<&str> = normalized.split(' ').filter(|t| !t.is_empty()).collect();
        let mut keep = tokens.len();
        while keep > 0 && is_non_descriptive(tokens[keep - 1]) {
            keep -= 1;
        }
        if keep == 0 || keep == tokens.len() {
            return None;
        }
        Some(tokens[..keep].join(" "))
    }
}

// ─────────────────────────────────────────────────────────────────────────────

fn spell_out_greek(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match GREEK_CHARS.iter().find(|(g, _)| *g == c) {
            Some((_, name)) => out.push_str(name),
            None => out.push(c),
        }
    }
    out
}

/// Split on everything that is not an ASCII letter or digit, keeping a
/// decimal point that sits between two digits.
fn split_boundaries(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_alphanumeric() {
            current.push(c);
            continue;
        }
        if c == '.' {
            let after_digit = current.chars().last().is_some_and(|p| p.is_ascii_digit());
            let before_digit = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
            if after_digit && before_digit {
                current.push(c);
                continue;
            }
        }
        if !c.is_ascii() {
            trace!("normalization anomaly: {:?} in {:?} treated as boundary", c, text);
        }
        if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Break a token at lower→upper, letter→digit and digit→letter transitions.
fn split_transitions(token: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in token.chars() {
        if let Some(p) = prev {
            let boundary = (p.is_ascii_lowercase() && c.is_ascii_uppercase())
                || (p.is_ascii_alphabetic() && c.is_ascii_digit())
                || (p.is_ascii_digit() && c.is_ascii_alphabetic());
            if boundary && !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
        prev = Some(c);
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Peel greek names and descriptor words off the end of a letter run.
fn split_glued_suffixes(piece: &str) -> Vec<String> {
    if !piece.bytes().all(|b| b.is_ascii_alphabetic()) {
        return vec![piece.to_string()];
    }

    let mut head = piece;
    let mut tail: Vec<&str> = Vec::new();
    loop {
        match peel_suffix(head) {
            Some(split) => {
                tail.push(&head[split..]);
                head = &head[..split];
            }
            None => break,
        }
    }

    let mut parts = vec![head.to_string()];
    parts.extend(tail.into_iter().rev().map(str::to_string));
    parts
}

/// Byte index where a glued suffix starts, if any.
fn peel_suffix(head: &str) -> Option<usize> {
    let lower = head.to_ascii_lowercase();
    for suffix in GREEK_SUFFIXES {
        if lower.len() > suffix.len() && lower.ends_with(suffix) {
            return Some(head.len() - suffix.len());
        }
    }
    for suffix in DESCRIPTOR_SUFFIXES {
        if head.len() > suffix.len() && head.ends_with(suffix) {
            let split = head.len() - suffix.len();
            if head.as_bytes()[split - 1].is_ascii_uppercase() {
                return Some(split);
            }
        }
    }
    None
}

/// Value of a lower-case roman numeral made of `i`, `v` and `x`.
///
/// Only canonical spellings below 40 are accepted ("iv", not "iiii";
/// "xxxix", not "xxxx"). `xi` is left alone because it is also a greek letter.
fn roman_to_arabic(token: &str) -> Option<u32> {
    if token.is_empty() || is_greek(token) {
        return None;
    }
    let mut total = 0u32;
    let mut prev = 0u32;
    for c in token.chars().rev() {
        let value = match c {
            'i' => 1,
            'v' => 5,
            'x' => 10,
            _ => return None,
        };
        if value < prev {
            total = total.checked_sub(value)?;
        } else {
            total += value;
            prev = value;
        }
    }
    (total > 0 && total < 40 && arabic_to_roman(total) == token).then_some(total)
}

fn arabic_to_roman(mut value: u32) -> String {
    const TABLE: [(u32, &str); 5] = [(10, "x"), (9, "ix"), (5, "v"), (4, "iv"), (1, "i")];
    let mut out = String::new();
    for (n, s) in TABLE {
        while value >= n {
            out.push_str(s);
            value -= n;
        }
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
