//! Mapping engine configuration.
//!
//! Loaded once at startup from YAML, JSON or TOML. Every section has
//! defaults so a config file only needs to name the dictionary and model.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::GeneTagger;
use crate::error::{GeneMapError, Result};

/// Complete engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Synonym dictionary source
    #[serde(default)]
    pub dictionary: DictionaryConfig,

    /// Pre-trained scoring model source
    #[serde(default)]
    pub model: ModelConfig,

    /// Candidate scoring options
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Context disambiguation options
    #[serde(default)]
    pub context: ContextConfig,

    /// Mention unification options
    #[serde(default)]
    pub unification: UnificationConfig,

    /// Species prefix trimming
    #[serde(default)]
    pub species: SpeciesConfig,

    /// Batch execution options
    #[serde(default)]
    pub execution: ExecutionConfig,
}

// ── Dictionary ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryConfig {
    /// TSV file: synonym, entry id, optional taxonomy id
    #[serde(default)]
    pub path: String,

    /// Optional TSV file: entry id, free-text context description
    pub contexts_path: Option<String>,

    /// Upper bound on candidates scored per mention
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            contexts_path: None,
            max_candidates: default_max_candidates(),
        }
    }
}

fn default_max_candidates() -> usize { 200 }

// ── Model ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    /// JSON weight file
    #[serde(default)]
    pub path: String,
}

// ── Scoring ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// A candidate must score strictly above this to be kept
    #[serde(default = "default_acceptance_threshold")]
    pub acceptance_threshold: f64,

    /// Reject implausible candidates before model scoring
    #[serde(default = "default_true")]
    pub candidate_filter: bool,

    /// Retry retrieval without trailing non-descriptive words
    #[serde(default = "default_true")]
    pub strip_non_descriptive_fallback: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            acceptance_threshold: default_acceptance_threshold(),
            candidate_filter: true,
            strip_non_descriptive_fallback: true,
        }
    }
}

fn default_acceptance_threshold() -> f64 { 0.5 }
fn default_true() -> bool { true }

// ── Context ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Window size in tokens (or characters without a token layer)
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Maximum number of terms in a context query
    #[serde(default = "default_max_query_clauses")]
    pub max_query_clauses: usize,

    /// Scores closer than this are treated as tied
    #[serde(default = "default_tie_epsilon")]
    pub tie_epsilon: f64,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            max_query_clauses: default_max_query_clauses(),
            tie_epsilon: default_tie_epsilon(),
        }
    }
}

fn default_window_size() -> usize { 50 }
fn default_max_query_clauses() -> usize { 1024 }
fn default_tie_epsilon() -> f64 { 1e-6 }

// ── Unification ───────────────────────────────────────────────────────────────

/// How overlapping mentions from different recognizers are reconciled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UnificationPolicy {
    /// Keep the first mention of the priority tagger in each overlap cluster
    PrioritizeTagger { priority_tagger: GeneTagger },
    /// Keep the longest mention in each overlap cluster
    LongerFirst,
}

impl Default for UnificationPolicy {
    fn default() -> Self {
        UnificationPolicy::PrioritizeTagger {
            priority_tagger: GeneTagger::StatisticalTagger,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnificationConfig {
    #[serde(default)]
    pub policy: UnificationPolicy,

    /// Intersect a survivor's candidates with those of discarded overlaps
    #[serde(default = "default_true")]
    pub corroborate_overlaps: bool,
}

impl Default for UnificationConfig {
    fn default() -> Self {
        Self {
            policy: UnificationPolicy::default(),
            corroborate_overlaps: true,
        }
    }
}

// ── Species ───────────────────────────────────────────────────────────────────

/// A species-name prefix to strip from mention text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesPrefix {
    /// Literal prefix, including the trailing space
    pub pattern: String,
    /// NCBI taxonomy id, when the prefix names a single organism
    pub tax_id: Option<String>,
}

impl SpeciesPrefix {
    pub fn new(pattern: &str, tax_id: Option<&str>) -> Self {
        Self {
            pattern: pattern.to_string(),
            tax_id: tax_id.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_species_prefixes")]
    pub prefixes: Vec<SpeciesPrefix>,
}

impl Default for SpeciesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prefixes: default_species_prefixes(),
        }
    }
}

/// Genus and adjective forms, with and without the species epithet.
pub fn default_species_prefixes() -> Vec<SpeciesPrefix> {
    [
        ("yeast ", Some("4932")),
        ("mammalian ", None),
        ("Drosophila melanogaster ", Some("7227")),
        ("Drosophila ", Some("7227")),
        ("mouse ", Some("10090")),
        ("murine ", Some("10090")),
        ("human ", Some("9606")),
        ("Saccharomyces cerevisiae ", Some("4932")),
        ("Saccharomyces ", Some("4932")),
        ("E. coli ", Some("562")),
        ("Escherichia coli ", Some("562")),
        ("Arabidopsis thaliana ", Some("3702")),
        ("Arabidopsis ", Some("3702")),
        ("Tetrahymena ", None),
        ("eukariotic ", None),
        ("rabbit ", Some("9986")),
        ("goat ", Some("9925")),
        ("rat ", Some("10116")),
        ("Caenorhabditis elegans ", Some("6239")),
        ("Caenorhabditis ", Some("6239")),
    ]
    .into_iter()
    .map(|(pattern, tax_id)| SpeciesPrefix::new(pattern, tax_id))
    .collect()
}

// ── Execution ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Batches larger than this are processed in parallel
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self { parallel_threshold: default_parallel_threshold() }
    }
}

fn default_parallel_threshold() -> usize { 10 }

// ── Helper Methods ────────────────────────────────────────────────────────────

impl MapperConfig {
    /// Load from YAML file
    pub fn from_yaml(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {path}"))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing YAML config {path}"))?;
        debug!("Loaded YAML mapper config from {}", path);
        Ok(config)
    }

    /// Load from JSON file
    pub fn from_json(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {path}"))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("parsing JSON config {path}"))?;
        debug!("Loaded JSON mapper config from {}", path);
        Ok(config)
    }

    /// Load from TOML file
    pub fn from_toml(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {path}"))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("parsing TOML config {path}"))?;
        debug!("Loaded TOML mapper config from {}", path);
        Ok(config)
    }

    pub fn with_dictionary_path(mut self, path: impl Into<String>) -> Self {
        self.dictionary.path = path.into();
        self
    }

    pub fn with_model_path(mut self, path: impl Into<String>) -> Self {
        self.model.path = path.into();
        self
    }

    pub fn with_acceptance_threshold(mut self, threshold: f64) -> Self {
        self.scoring.acceptance_threshold = threshold;
        self
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.context.window_size = window_size;
        self
    }

    pub fn with_policy(mut self, policy: UnificationPolicy) -> Self {
        self.unification.policy = policy;
        self
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.scoring.acceptance_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(GeneMapError::Config(format!(
                "acceptance_threshold must be within [0, 1], got {threshold}"
            )));
        }
        if self.context.window_size == 0 {
            return Err(GeneMapError::Config("context.window_size must be positive".into()));
        }
        if self.context.max_query_clauses == 0 {
            return Err(GeneMapError::Config("context.max_query_clauses must be positive".into()));
        }
        if !self.context.tie_epsilon.is_finite() || self.context.tie_epsilon < 0.0 {
            return Err(GeneMapError::Config("context.tie_epsilon must be a non-negative number".into()));
        }
        if self.dictionary.max_candidates == 0 {
            return Err(GeneMapError::Config("dictionary.max_candidates must be positive".into()));
        }
        if let Some(empty) = self.species.prefixes.iter().find(|p| p.pattern.trim().is_empty()) {
            return Err(GeneMapError::Config(format!(
                "species prefix {:?} is blank", empty.pattern
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = MapperConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.context.window_size, 50);
        assert_eq!(config.scoring.acceptance_threshold, 0.5);
        assert_eq!(
            config.unification.policy,
            UnificationPolicy::PrioritizeTagger { priority_tagger: GeneTagger::StatisticalTagger }
        );
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = r#"
dictionary:
  path: /data/synonyms.tsv
model:
  path: /data/model.json
unification:
  policy:
    type: prioritize_tagger
    priority_tagger: GAZETTEER
"#;
        let config: MapperConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.dictionary.path, "/data/synonyms.tsv");
        assert_eq!(config.dictionary.max_candidates, 200);
        assert_eq!(
            config.unification.policy,
            UnificationPolicy::PrioritizeTagger { priority_tagger: GeneTagger::Gazetteer }
        );
        assert!(config.unification.corroborate_overlaps);
        assert_eq!(config.species.prefixes, default_species_prefixes());
    }

    #[test]
    fn test_toml_longer_first() {
        let text = r#"
[model]
path = "model.json"

[unification.policy]
type = "longer_first"

[context]
window_size = 20
"#;
        let config: MapperConfig = toml::from_str(text).unwrap();
        assert_eq!(config.unification.policy, UnificationPolicy::LongerFirst);
        assert_eq!(config.context.window_size, 20);
        assert_eq!(config.context.max_query_clauses, 1024);
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let config = MapperConfig::default().with_acceptance_threshold(1.5);
        assert!(matches!(config.validate(), Err(GeneMapError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let config = MapperConfig::default().with_window_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_roundtrip_keeps_species() {
        let config = MapperConfig::default().with_dictionary_path("syn.tsv");
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: MapperConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.dictionary.path, "syn.tsv");
        assert_eq!(parsed.species.prefixes.len(), config.species.prefixes.len());
    }

    #[test]
    fn test_file_loaders_agree() {
        let dir = tempfile::tempdir().unwrap();
        let config = MapperConfig::default()
            .with_dictionary_path("syn.tsv")
            .with_model_path("model.json")
            .with_policy(UnificationPolicy::LongerFirst)
            .with_window_size(30);

        let yaml = dir.path().join("genemap.yaml");
        std::fs::write(&yaml, serde_yaml::to_string(&config).unwrap()).unwrap();
        let json = dir.path().join("genemap.json");
        std::fs::write(&json, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        let toml_path = dir.path().join("genemap.toml");
        std::fs::write(
            &toml_path,
            "[dictionary]\npath = \"syn.tsv\"\n\n[model]\npath = \"model.json\"\n\n\
             [context]\nwindow_size = 30\n\n[unification.policy]\ntype = \"longer_first\"\n",
        )
        .unwrap();

        let loaded = [
            MapperConfig::from_yaml(yaml.to_str().unwrap()).unwrap(),
            MapperConfig::from_json(json.to_str().unwrap()).unwrap(),
            MapperConfig::from_toml(toml_path.to_str().unwrap()).unwrap(),
        ];
        for parsed in &loaded {
            assert_eq!(parsed.dictionary.path, "syn.tsv");
            assert_eq!(parsed.model.path, "model.json");
            assert_eq!(parsed.unification.policy, UnificationPolicy::LongerFirst);
            assert_eq!(parsed.context.window_size, 30);
            assert_eq!(parsed.species.prefixes, config.species.prefixes);
        }
    }

    #[test]
    fn test_file_loaders_report_missing_and_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert!(MapperConfig::from_json(missing.to_str().unwrap()).is_err());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[context\nwindow_size = ").unwrap();
        let err = MapperConfig::from_toml(bad.to_str().unwrap()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing TOML config"));
    }
}
