//! Pair features for candidate scoring.
//!
//! Every (mention, synonym) pair is described by the same fixed vector of
//! numeric features, indexed by the [`Feature`] enum. The scoring model
//! carries one weight per variant.

use std::fmt;

use ahash::AHashSet;
use regex::Regex;

use genemap_common::{GeneMapError, Result};

use crate::compare::Alignment;
use crate::lexicon::{is_alphabetic, is_greek, is_modifier, is_non_descriptive, is_number, is_single_char};

/// One dimension of the pair feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    SameNum,
    SameGreek,
    SameAlpha,
    SameModifier,
    NumSames,
    NumDiffs,
    OnlySameNumber,
    OnlySameGreek,
    OnlySameChar,
    OnlySameAlpha,
    DiffNum,
    DiffGreek,
    DiffChar,
    DiffAlpha,
    DiffModifier,
    OnlyDiffOne,
    OnlyDiffNumber,
    OnlyDiffGreekAlpha,
    OnlyDiffGreek,
    OnlyDiffAlpha,
    OnlyDiffModifier,
    OnlyDiffNonDescriptive,
    TokenOverlap,
    Substring,
    Transpositions,
    LengthDiff,
    RelativeLength,
    CharLengthRatio,
    SameMolWeight,
    DiffMolWeight,
    CommonBigrams,
}

impl Feature {
    pub const COUNT: usize = 31;

    pub const ALL: [Feature; Feature::COUNT] = [
        Feature::SameNum,
        Feature::SameGreek,
        Feature::SameAlpha,
        Feature::SameModifier,
        Feature::NumSames,
        Feature::NumDiffs,
        Feature::OnlySameNumber,
        Feature::OnlySameGreek,
        Feature::OnlySameChar,
        Feature::OnlySameAlpha,
        Feature::DiffNum,
        Feature::DiffGreek,
        Feature::DiffChar,
        Feature::DiffAlpha,
        Feature::DiffModifier,
        Feature::OnlyDiffOne,
        Feature::OnlyDiffNumber,
        Feature::OnlyDiffGreekAlpha,
        Feature::OnlyDiffGreek,
        Feature::OnlyDiffAlpha,
        Feature::OnlyDiffModifier,
        Feature::OnlyDiffNonDescriptive,
        Feature::TokenOverlap,
        Feature::Substring,
        Feature::Transpositions,
        Feature::LengthDiff,
        Feature::RelativeLength,
        Feature::CharLengthRatio,
        Feature::SameMolWeight,
        Feature::DiffMolWeight,
        Feature::CommonBigrams,
    ];

    /// Name used in serialized model files.
    pub fn name(&self) -> &'static str {
        match self {
            Feature::SameNum => "same_num",
            Feature::SameGreek => "same_greek",
            Feature::SameAlpha => "same_alpha",
            Feature::SameModifier => "same_modifier",
            Feature::NumSames => "num_sames",
            Feature::NumDiffs => "num_diffs",
            Feature::OnlySameNumber => "only_same_number",
            Feature::OnlySameGreek => "only_same_greek",
            Feature::OnlySameChar => "only_same_char",
            Feature::OnlySameAlpha => "only_same_alpha",
            Feature::DiffNum => "diff_num",
            Feature::DiffGreek => "diff_greek",
            Feature::DiffChar => "diff_char",
            Feature::DiffAlpha => "diff_alpha",
            Feature::DiffModifier => "diff_modifier",
            Feature::OnlyDiffOne => "only_diff_one",
            Feature::OnlyDiffNumber => "only_diff_number",
            Feature::OnlyDiffGreekAlpha => "only_diff_greek_alpha",
            Feature::OnlyDiffGreek => "only_diff_greek",
            Feature::OnlyDiffAlpha => "only_diff_alpha",
            Feature::OnlyDiffModifier => "only_diff_modifier",
            Feature::OnlyDiffNonDescriptive => "only_diff_non_descriptive",
            Feature::TokenOverlap => "token_overlap",
            Feature::Substring => "substring",
            Feature::Transpositions => "transpositions",
            Feature::LengthDiff => "length_diff",
            Feature::RelativeLength => "relative_length",
            Feature::CharLengthRatio => "char_length_ratio",
            Feature::SameMolWeight => "same_mol_weight",
            Feature::DiffMolWeight => "diff_mol_weight",
            Feature::CommonBigrams => "common_bigrams",
        }
    }

    pub fn from_name(name: &str) -> Option<Feature> {
        Feature::ALL.iter().copied().find(|f| f.name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dense feature values, one slot per [`Feature`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; Feature::COUNT]);

impl Default for FeatureVector {
    fn default() -> Self {
        Self([0.0; Feature::COUNT])
    }
}

impl FeatureVector {
    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }

    pub fn set(&mut self, feature: Feature, value: f64) {
        self.0[feature.index()] = value;
    }

    fn increment(&mut self, feature: Feature) {
        self.0[feature.index()] += 1.0;
    }

    pub fn as_array(&self) -> &[f64; Feature::COUNT] {
        &self.0
    }

    /// Non-zero features, in declaration order.
    pub fn active(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL
            .iter()
            .map(move |&f| (f, self.get(f)))
            .filter(|(_, v)| *v != 0.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────

/// Computes the [`FeatureVector`] of a normalized term pair.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    mol_weight: Regex,
}

impl FeatureExtractor {
    pub fn new() -> Result<Self> {
        let mol_weight = Regex::new(r"\bp (\d{1,2})\b")
            .map_err(|e| GeneMapError::Pattern(e.to_string()))?;
        Ok(Self { mol_weight })
    }

    /// Features of `term_a` against `term_b`, given their token alignment.
    pub fn extract(&self, term_a: &str, term_b: &str, alignment: &Alignment) -> FeatureVector {
        let mut fv = FeatureVector::default();
        let tokens_a: Vec<&str> = term_a.split_whitespace().collect();
        let tokens_b: Vec<&str> = term_b.split_whitespace().collect();

        // Shared tokens
        for token in &alignment.common {
            let token = token.as_str();
            if is_number(token) {
                fv.increment(Feature::SameNum);
            } else if is_greek(token) {
                fv.increment(Feature::SameGreek);
            } else if is_modifier(token) {
                fv.increment(Feature::SameModifier);
            } else if is_alphabetic(token) && !is_non_descriptive(token) {
                fv.increment(Feature::SameAlpha);
            }
        }
        fv.set(Feature::NumSames, alignment.common.len() as f64);
        if let [only] = alignment.common.as_slice() {
            let only = only.as_str();
            if is_number(only) {
                fv.set(Feature::OnlySameNumber, 1.0);
            } else if is_greek(only) {
                fv.set(Feature::OnlySameGreek, 1.0);
            } else if is_single_char(only) {
                fv.set(Feature::OnlySameChar, 1.0);
            } else if is_alphabetic(only) {
                fv.set(Feature::OnlySameAlpha, 1.0);
            }
        }

        // Differing tokens
        let different = alignment.different();
        for token in &different {
            let token = token.as_str();
            if is_number(token) {
                fv.increment(Feature::DiffNum);
            } else if is_greek(token) {
                fv.increment(Feature::DiffGreek);
            } else if is_single_char(token) {
                fv.increment(Feature::DiffChar);
            } else if is_modifier(token) {
                fv.increment(Feature::DiffModifier);
            } else if is_alphabetic(token) && !is_non_descriptive(token) {
                fv.increment(Feature::DiffAlpha);
            }
        }
        fv.set(Feature::NumDiffs, different.len() as f64);
        if let [only] = different.as_slice() {
            let only = only.as_str();
            let feature = if only == "1" {
                Feature::OnlyDiffOne
            } else if is_number(only) {
                Feature::OnlyDiffNumber
            } else if only == "alpha" {
                Feature::OnlyDiffGreekAlpha
            } else if is_greek(only) {
                Feature::OnlyDiffGreek
            } else if is_modifier(only) {
                Feature::OnlyDiffModifier
            } else if is_non_descriptive(only) {
                Feature::OnlyDiffNonDescriptive
            } else {
                Feature::OnlyDiffAlpha
            };
            fv.set(feature, 1.0);
        }

        // Overlap and length
        let total = tokens_a.len() + tokens_b.len();
        if total > 0 {
            fv.set(Feature::TokenOverlap, 2.0 * alignment.common.len() as f64 / total as f64);
        }
        if !term_a.is_empty() && !term_b.is_empty()
            && (term_a.contains(term_b) || term_b.contains(term_a))
        {
            fv.set(Feature::Substring, 1.0);
        }
        fv.set(Feature::Transpositions, transpositions(&tokens_a, &tokens_b) as f64);

        let len_diff = tokens_a.len().abs_diff(tokens_b.len());
        let max_len = tokens_a.len().max(tokens_b.len());
        fv.set(Feature::LengthDiff, len_diff as f64);
        if max_len > 0 {
            fv.set(Feature::RelativeLength, 1.0 - len_diff as f64 / max_len as f64);
        }
        let (chars_a, chars_b) = (term_a.chars().count(), term_b.chars().count());
        if chars_a.max(chars_b) > 0 {
            fv.set(
                Feature::CharLengthRatio,
                chars_a.min(chars_b) as f64 / chars_a.max(chars_b) as f64,
            );
        }

        // Molecular weight designations ("p 45")
        let weights_a = self.mol_weights(term_a);
        let weights_b = self.mol_weights(term_b);
        if !weights_a.is_empty() && !weights_b.is_empty() {
            if weights_a.intersection(&weights_b).next().is_some() {
                fv.set(Feature::SameMolWeight, 1.0);
            } else {
                fv.set(Feature::DiffMolWeight, 1.0);
            }
        }

        let bigrams_b: AHashSet<(&str, &str)> =
            tokens_b.windows(2).map(|w| (w[0], w[1])).collect();
        let shared_bigrams: AHashSet<(&str, &str)> = tokens_a
            .windows(2)
            .map(|w| (w[0], w[1]))
            .filter(|bg| bigrams_b.contains(bg))
            .collect();
        fv.set(Feature::CommonBigrams, shared_bigrams.len() as f64);

        fv
    }

    fn mol_weights<'t>(&self, term: &'t str) -> AHashSet<&'t str> {
        self.mol_weight
            .captures_iter(term)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect()
    }
}

/// Half the number of shared tokens that appear in a different order.
fn transpositions(tokens_a: &[&str], tokens_b: &[&str]) -> usize {
    let in_b: Vec<&str> = tokens_a.iter().copied().filter(|t| tokens_b.contains(t)).collect();
    let in_a: Vec<&str> = tokens_b.iter().copied().filter(|t| tokens_a.contains(t)).collect();
    let mismatches = in_b.iter().zip(in_a.iter()).filter(|(x, y)| x != y).count();
    mismatches / 2
}
