//! Term normalisation.
//!
//! `TermNormalizer` maps raw gene mention and synonym text onto a canonical
//! token sequence; both sides of every dictionary lookup go through it.

pub mod term;

pub use term::TermNormalizer;
