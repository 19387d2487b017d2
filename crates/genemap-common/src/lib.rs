//! Shared types, errors and configuration used across the genemap crates.

pub mod error;
pub mod entities;
pub mod mapper_config;

// Re-export commonly used types
pub use error::{GeneMapError, Result};
pub use entities::{GeneTagger, Resolution, Token};
pub use mapper_config::{
    ContextConfig, DictionaryConfig, ExecutionConfig, MapperConfig, ModelConfig,
    ScoringConfig, SpeciesConfig, SpeciesPrefix, UnificationConfig, UnificationPolicy,
};
