//! Rule-based rejection of implausible candidates.
//!
//! Runs on the token alignment before the model is consulted. A synonym that
//! only shares a number or the word "receptor" with the mention, or that
//! differs from it in exactly one number ("il 2" vs "il 3"), names a
//! different gene however high the model would score it.

use ahash::AHashSet;
use regex::Regex;
use tracing::debug;

use genemap_common::{GeneMapError, Result};

use crate::compare::Alignment;
use crate::lexicon::{is_greek, is_modifier, is_special_word};

/// Why a candidate was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterReason {
    OverlapOnlyNumbers,
    OverlapOnlySingleChars,
    OverlapOnlySpecialWords,
    DifferInOneNumber,
    DifferInOneGreek,
    ExtraNumber,
    ExtraGreek,
    ExtraModifier,
}

impl FilterReason {
    pub fn describe(&self) -> &'static str {
        match self {
            FilterReason::OverlapOnlyNumbers => "overlap only numbers",
            FilterReason::OverlapOnlySingleChars => "overlap only single characters or digits",
            FilterReason::OverlapOnlySpecialWords => "overlap only greek, modifier or non-descriptive words",
            FilterReason::DifferInOneNumber => "terms differ in one number only",
            FilterReason::DifferInOneGreek => "terms differ in one greek letter only",
            FilterReason::ExtraNumber => "one term has an extra number other than 1",
            FilterReason::ExtraGreek => "one term has an extra greek letter other than alpha",
            FilterReason::ExtraModifier => "one term has an extra modifier",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CandidateFilter {
    number: Regex,
    extra_number: Regex,
}

impl CandidateFilter {
    pub fn new() -> Result<Self> {
        let compile = |p: &str| Regex::new(p).map_err(|e| GeneMapError::Pattern(e.to_string()));
        Ok(Self {
            number: compile(r"^[0-9]+$")?,
            extra_number: compile(r"^(?:[02-9]|[1-9][0-9]+)$")?,
        })
    }

    /// The first rule that rejects `found` as a candidate for `search`.
    pub fn check(&self, search: &str, found: &str, alignment: &Alignment) -> Option<FilterReason> {
        let common = &alignment.common;
        let search_tokens: Vec<&str> = search.split_whitespace().collect();
        let found_tokens: Vec<&str> = found.split_whitespace().collect();

        let reason = if common.iter().all(|t| self.number.is_match(t)) {
            Some(FilterReason::OverlapOnlyNumbers)
        } else if common.iter().all(|t| is_single_char_or_digit(t)) {
            Some(FilterReason::OverlapOnlySingleChars)
        } else if common.iter().all(|t| is_special_word(t)) {
            Some(FilterReason::OverlapOnlySpecialWords)
        } else if differ_in_one_of(&search_tokens, &found_tokens, |t| self.number.is_match(t)) {
            Some(FilterReason::DifferInOneNumber)
        } else if differ_in_one_of(&search_tokens, &found_tokens, is_greek) {
            Some(FilterReason::DifferInOneGreek)
        } else if extra_token_of(&search_tokens, &found_tokens, |t| self.extra_number.is_match(t)) {
            Some(FilterReason::ExtraNumber)
        } else if extra_token_of(&search_tokens, &found_tokens, |t| is_greek(t) && t != "alpha") {
            Some(FilterReason::ExtraGreek)
        } else if extra_token_of(&search_tokens, &found_tokens, is_modifier) {
            Some(FilterReason::ExtraModifier)
        } else {
            None
        };

        if let Some(r) = reason {
            debug!("filtered out because {}: '{}' <-> '{}'", r.describe(), search, found);
        }
        reason
    }

    pub fn filter_out(&self, search: &str, found: &str, alignment: &Alignment) -> bool {
        self.check(search, found, alignment).is_some()
    }
}

fn is_single_char_or_digit(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_lowercase() || c.is_ascii_digit())
}

/// Both terms hold exactly one token of the class, those tokens differ, and
/// everything before and after them is identical.
fn differ_in_one_of(a: &[&str], b: &[&str], class: impl Fn(&str) -> bool) -> bool {
    let positions = |tokens: &[&str]| -> Vec<usize> {
        tokens.iter().enumerate().filter(|(_, t)| class(t)).map(|(i, _)| i).collect()
    };
    let (pa, pb) = (positions(a), positions(b));
    match (pa.as_slice(), pb.as_slice()) {
        ([i], [j]) => a[*i] != b[*j] && a[..*i] == b[..*j] && a[*i + 1..] == b[*j + 1..],
        _ => false,
    }
}

/// One term has exactly one more distinct token than the other, and the
/// surplus token belongs to the class.
fn extra_token_of(a: &[&str], b: &[&str], class: impl Fn(&str) -> bool) -> bool {
    if a == b {
        return false;
    }
    let set_a: AHashSet<&str> = a.iter().copied().collect();
    let set_b: AHashSet<&str> = b.iter().copied().collect();
    let (larger, smaller) = if set_a.len() == set_b.len() + 1 {
        (&set_a, &set_b)
    } else if set_b.len() == set_a.len() + 1 {
        (&set_b, &set_a)
    } else {
        return false;
    };
    let surplus: Vec<&str> = larger.difference(smaller).copied().collect();
    matches!(surplus.as_slice(), [t] if class(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::PairComparator;

    fn check(search: &str, found: &str) -> Option<FilterReason> {
        let a: Vec<&str> = search.split_whitespace().collect();
        let b: Vec<&str> = found.split_whitespace().collect();
        let alignment = PairComparator::new().align(&a, &b);
        CandidateFilter::new().unwrap().check(search, found, &alignment)
    }

    #[test]
    fn test_overlap_rules() {
        assert_eq!(check("abc 2", "xyz 2"), Some(FilterReason::OverlapOnlyNumbers));
        assert_eq!(check("abc", "xyz"), Some(FilterReason::OverlapOnlyNumbers));
        assert_eq!(check("abc r", "xyz r"), Some(FilterReason::OverlapOnlySingleChars));
        assert_eq!(check("abc receptor", "xyz receptor"), Some(FilterReason::OverlapOnlySpecialWords));
    }

    #[test]
    fn test_differ_in_one() {
        assert_eq!(check("il 2 receptor", "il 3 receptor"), Some(FilterReason::DifferInOneNumber));
        assert_eq!(check("pkc beta", "pkc gamma"), Some(FilterReason::DifferInOneGreek));
    }

    #[test]
    fn test_extra_tokens() {
        assert_eq!(check("il receptor 3", "il receptor"), Some(FilterReason::ExtraNumber));
        assert_eq!(check("il receptor 10", "il receptor"), Some(FilterReason::ExtraNumber));
        assert_eq!(check("il receptor 1", "il receptor"), None);
        assert_eq!(check("il receptor 1 beta", "il receptor 1"), Some(FilterReason::ExtraGreek));
        assert_eq!(check("tnf alpha", "tnf"), None);
        assert_eq!(check("tnf", "tnf receptor"), Some(FilterReason::ExtraModifier));
    }

    #[test]
    fn test_plausible_pair_passes() {
        assert_eq!(check("il 2 r alpha", "il 2 r alpha"), None);
        assert_eq!(check("tnf alpha", "tnf alpha precursor"), None);
    }
}
