//! Token alignment of two normalized terms.
//!
//! A mention "il 2 r alpha" against a synonym "il 2 receptor alpha" shares
//! `il 2 alpha` and differs in `r`, `receptor`. Those two lists are what the
//! pair features and the candidate filter are computed from.

use ahash::AHashMap;

/// Shared and differing tokens of two token sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alignment {
    /// Tokens present in both, in the order of the first sequence.
    pub common: Vec<String>,
    /// Tokens of the first sequence that never occur in the second.
    pub only_a: Vec<String>,
    /// Tokens of the second sequence that never occur in the first.
    pub only_b: Vec<String>,
}

impl Alignment {
    /// A-exclusive tokens followed by B-exclusive tokens.
    pub fn different(&self) -> Vec<String> {
        self.only_a.iter().chain(self.only_b.iter()).cloned().collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PairComparator;

impl PairComparator {
    pub fn new() -> Self {
        Self
    }

    /// `(common, different)` for two pre-normalized token sequences.
    ///
    /// Each shared occurrence consumes one match on the other side. A token
    /// that occurs anywhere on the other side is never reported as different.
    pub fn compare<A, B>(&self, tokens_a: &[A], tokens_b: &[B]) -> (Vec<String>, Vec<String>)
    where
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let alignment = self.align(tokens_a, tokens_b);
        let different = alignment.different();
        (alignment.common, different)
    }

    pub fn align<A, B>(&self, tokens_a: &[A], tokens_b: &[B]) -> Alignment
    where
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let mut available: AHashMap<&str, usize> = AHashMap::new();
        for b in tokens_b {
            *available.entry(b.as_ref()).or_insert(0) += 1;
        }

        let mut common = Vec::new();
        let mut only_a = Vec::new();
        for a in tokens_a {
            let a = a.as_ref();
            match available.get_mut(a) {
                Some(left) if *left > 0 => {
                    *left -= 1;
                    common.push(a.to_string());
                }
                Some(_) => {}
                None => only_a.push(a.to_string()),
            }
        }

        let only_b = tokens_b
            .iter()
            .map(AsRef::as_ref)
            .filter(|b| !tokens_a.iter().any(|a| a.as_ref() == *b))
            .map(str::to_string)
            .collect();

        Alignment { common, only_a, only_b }
    }
}
