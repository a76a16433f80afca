//! Ruleset configuration
//!
//! Loads the schema / rule definition from a `cardlint.toml` file, or
//! falls back to the built-in model-card ruleset. Configuration is
//! read-only after load; a broken ruleset is a fatal load-time error
//! because it cannot produce a trustworthy score.
//!
//! # Configuration Format
//!
//! ```toml
//! # cardlint.toml
//!
//! [[schema]]
//! key = "license"
//! required = true
//! types = ["string"]
//! allowed = ["mit", "apache-2.0"]
//!
//! [[schema]]
//! key = "base_model"
//! pattern = "^[\\w.-]+/[\\w.-]+$"
//!
//! [[sections]]
//! name = "usage"
//! aliases = ["usage", "quick start", "getting started"]
//! required = true
//! expect_code = true
//!
//! [rules]
//! enabled = ["required-sections", "link-targets"]
//!
//! [citation]
//! field = "citation"
//! formats = ["bibtex"]
//!
//! [scoring]
//! error_weight = 25.0
//! warning_weight = 10.0
//! category_weights = { metadata = 1.0, structure = 1.0, links = 1.0 }
//! ```

use crate::frontmatter::FieldType;
use crate::rules::BUILTIN_RULE_IDS;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading or validating a ruleset
///
/// All of these are fatal: they surface to the caller before any
/// document is evaluated.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("duplicate schema field key `{key}`")]
    DuplicateField { key: String },

    #[error("duplicate section name `{name}`")]
    DuplicateSection { name: String },

    #[error("unknown rule id `{id}` in rules.enabled")]
    UnknownRule { id: String },

    #[error("invalid pattern for schema field `{key}`: {source}")]
    InvalidPattern {
        key: String,
        source: regex::Error,
    },

    #[error("invalid scoring weights: {0}")]
    InvalidWeight(String),
}

/// One taxonomy entry for a frontmatter field
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaRule {
    pub key: String,
    #[serde(default)]
    pub required: bool,
    /// Allowed value types; empty means any type is accepted
    #[serde(default)]
    pub types: Vec<FieldType>,
    /// Enumerated allowed values; empty means unconstrained
    #[serde(default)]
    pub allowed: Vec<String>,
    /// Optional regex the (scalar) value must match
    #[serde(default)]
    pub pattern: Option<String>,
}

impl SchemaRule {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            required: false,
            types: Vec::new(),
            allowed: Vec::new(),
            pattern: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn types(mut self, types: &[FieldType]) -> Self {
        self.types = types.to_vec();
        self
    }

    pub fn allowed(mut self, values: &[&str]) -> Self {
        self.allowed = values.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }
}

/// One logical section requirement, matched by normalized alias
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionSpec {
    pub name: String,
    /// Accepted normalized headings; the name itself always counts
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub required: bool,
    /// Whether the section should contain a runnable code block
    #[serde(default)]
    pub expect_code: bool,
}

/// Rule engine toggles
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    #[serde(default = "default_enabled_rules")]
    pub enabled: Vec<String>,
    /// Language tags that count as runnable for `quickstart-code`
    #[serde(default = "default_code_languages")]
    pub code_languages: Vec<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_rules(),
            code_languages: default_code_languages(),
        }
    }
}

/// Citation cross-check configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CitationConfig {
    /// Frontmatter key announcing a citation format
    #[serde(default = "default_citation_field")]
    pub field: String,
    /// Fence language tags treated as citation blocks
    #[serde(default = "default_citation_formats")]
    pub formats: Vec<String>,
}

impl Default for CitationConfig {
    fn default() -> Self {
        Self {
            field: default_citation_field(),
            formats: default_citation_formats(),
        }
    }
}

/// Per-category weights for the overall score
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryWeights {
    #[serde(default = "one")]
    pub metadata: f64,
    #[serde(default = "one")]
    pub structure: f64,
    #[serde(default = "one")]
    pub links: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            metadata: 1.0,
            structure: 1.0,
            links: 1.0,
        }
    }
}

/// Scoring knobs
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    #[serde(default = "default_error_weight")]
    pub error_weight: f64,
    #[serde(default = "default_warning_weight")]
    pub warning_weight: f64,
    /// Denominator of the subscore formula; findings beyond it clamp to 0
    #[serde(default = "default_max_weight")]
    pub category_max_weight: f64,
    #[serde(default)]
    pub category_weights: CategoryWeights,
    /// Override weight for the malformed-frontmatter finding. Unset
    /// means it penalizes like any other error; set it lower to score
    /// malformed closer to merely-absent frontmatter.
    #[serde(default)]
    pub malformed_frontmatter_weight: Option<f64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            error_weight: default_error_weight(),
            warning_weight: default_warning_weight(),
            category_max_weight: default_max_weight(),
            category_weights: CategoryWeights::default(),
            malformed_frontmatter_weight: None,
        }
    }
}

/// Complete ruleset: schema, section requirements, rule toggles, weights
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesetConfig {
    #[serde(default = "default_schema")]
    pub schema: Vec<SchemaRule>,
    #[serde(default = "default_sections")]
    pub sections: Vec<SectionSpec>,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub citation: CitationConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl Default for RulesetConfig {
    fn default() -> Self {
        Self {
            schema: default_schema(),
            sections: default_sections(),
            rules: RulesConfig::default(),
            citation: CitationConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl RulesetConfig {
    /// Load a ruleset from a TOML file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading ruleset config");
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse a ruleset from TOML text and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants a trustworthy score depends on. Any violation
    /// is fatal at load time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = std::collections::HashSet::new();
        for rule in &self.schema {
            if !seen.insert(rule.key.as_str()) {
                return Err(ConfigError::DuplicateField {
                    key: rule.key.clone(),
                });
            }
            if let Some(pattern) = &rule.pattern {
                regex::Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    key: rule.key.clone(),
                    source,
                })?;
            }
        }

        let mut seen = std::collections::HashSet::new();
        for section in &self.sections {
            if !seen.insert(section.name.as_str()) {
                return Err(ConfigError::DuplicateSection {
                    name: section.name.clone(),
                });
            }
        }

        for id in &self.rules.enabled {
            if !BUILTIN_RULE_IDS.contains(&id.as_str()) {
                return Err(ConfigError::UnknownRule { id: id.clone() });
            }
        }

        let s = &self.scoring;
        if s.error_weight < 0.0 || s.warning_weight < 0.0 {
            return Err(ConfigError::InvalidWeight(
                "severity weights must be non-negative".to_string(),
            ));
        }
        if s.category_max_weight <= 0.0 {
            return Err(ConfigError::InvalidWeight(
                "category_max_weight must be positive".to_string(),
            ));
        }
        if let Some(w) = s.malformed_frontmatter_weight {
            if w < 0.0 {
                return Err(ConfigError::InvalidWeight(
                    "malformed_frontmatter_weight must be non-negative".to_string(),
                ));
            }
        }
        let cw = &s.category_weights;
        if cw.metadata < 0.0 || cw.structure < 0.0 || cw.links < 0.0 {
            return Err(ConfigError::InvalidWeight(
                "category weights must be non-negative".to_string(),
            ));
        }
        if cw.metadata + cw.structure + cw.links <= 0.0 {
            return Err(ConfigError::InvalidWeight(
                "at least one category weight must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Sections that expect runnable code (the quick-start section in
    /// the default ruleset).
    pub fn code_sections(&self) -> impl Iterator<Item = &SectionSpec> {
        self.sections.iter().filter(|s| s.expect_code)
    }
}

fn one() -> f64 {
    1.0
}

fn default_error_weight() -> f64 {
    25.0
}

fn default_warning_weight() -> f64 {
    10.0
}

fn default_max_weight() -> f64 {
    100.0
}

fn default_citation_field() -> String {
    "citation".to_string()
}

fn default_citation_formats() -> Vec<String> {
    vec!["bibtex".to_string()]
}

fn default_enabled_rules() -> Vec<String> {
    BUILTIN_RULE_IDS.iter().map(|s| s.to_string()).collect()
}

fn default_code_languages() -> Vec<String> {
    [
        "python", "py", "bash", "sh", "shell", "console", "rust", "javascript", "js",
        "typescript", "ts", "c", "cpp", "java", "go", "r", "julia",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Built-in field taxonomy for model cards.
fn default_schema() -> Vec<SchemaRule> {
    vec![
        SchemaRule::new("license").required().types(&[FieldType::String]).allowed(&[
            "mit",
            "apache-2.0",
            "bsd-3-clause",
            "gpl-3.0",
            "lgpl-2.1",
            "cc-by-4.0",
            "cc-by-sa-4.0",
            "cc-by-nc-4.0",
            "openrail",
            "bigscience-openrail-m",
            "llama2",
            "other",
        ]),
        SchemaRule::new("pipeline_tag").types(&[FieldType::String]).allowed(&[
            "text-generation",
            "text-classification",
            "token-classification",
            "translation",
            "summarization",
            "question-answering",
            "fill-mask",
            "feature-extraction",
            "image-classification",
            "image-segmentation",
            "object-detection",
            "depth-estimation",
            "automatic-speech-recognition",
            "text-to-image",
        ]),
        SchemaRule::new("tags").types(&[FieldType::List]),
        SchemaRule::new("datasets").types(&[FieldType::List]),
        SchemaRule::new("language").types(&[FieldType::String, FieldType::List]),
        SchemaRule::new("library_name").types(&[FieldType::String]),
        SchemaRule::new("base_model")
            .types(&[FieldType::String])
            .pattern(r"^[\w.-]+/[\w.-]+$"),
        SchemaRule::new("metrics").types(&[FieldType::List]),
        SchemaRule::new("citation").types(&[FieldType::String]),
    ]
}

/// Built-in logical sections for model cards. Alias sets tolerate the
/// variant phrasing cards actually use.
fn default_sections() -> Vec<SectionSpec> {
    vec![
        SectionSpec {
            name: "license".to_string(),
            aliases: vec![
                "license".to_string(),
                "licence".to_string(),
                "licensing".to_string(),
                "license information".to_string(),
            ],
            required: true,
            expect_code: false,
        },
        SectionSpec {
            name: "usage".to_string(),
            aliases: vec![
                "usage".to_string(),
                "quick start".to_string(),
                "quickstart".to_string(),
                "getting started".to_string(),
                "how to use".to_string(),
                "how to get started with the model".to_string(),
                "inference".to_string(),
                "example usage".to_string(),
            ],
            required: true,
            expect_code: true,
        },
        SectionSpec {
            name: "citation".to_string(),
            aliases: vec![
                "citation".to_string(),
                "citing".to_string(),
                "cite".to_string(),
                "bibtex entry and citation info".to_string(),
            ],
            required: false,
            expect_code: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_validates() {
        RulesetConfig::default().validate().expect("default ruleset");
    }

    #[test]
    fn test_empty_toml_gets_defaults() {
        let config = RulesetConfig::from_toml_str("").expect("empty config");
        assert!(config.schema.iter().any(|r| r.key == "license"));
        assert!(config.sections.iter().any(|s| s.name == "usage"));
        assert_eq!(config.citation.formats, ["bibtex"]);
    }

    #[test]
    fn test_default_schema_knows_citation_field() {
        let config = RulesetConfig::default();
        let rule = config
            .schema
            .iter()
            .find(|r| r.key == "citation")
            .expect("citation in default schema");
        assert!(!rule.required);
        assert_eq!(rule.types, [FieldType::String]);
    }

    #[test]
    fn test_custom_schema_replaces_default() {
        let toml = r#"
            [[schema]]
            key = "license"
            required = true
            types = ["string"]
            allowed = ["mit"]
        "#;
        let config = RulesetConfig::from_toml_str(toml).expect("config");
        assert_eq!(config.schema.len(), 1);
        assert_eq!(config.schema[0].allowed, ["mit"]);
    }

    #[test]
    fn test_duplicate_field_key_fatal() {
        let toml = r#"
            [[schema]]
            key = "license"
            [[schema]]
            key = "license"
        "#;
        let err = RulesetConfig::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateField { .. }));
    }

    #[test]
    fn test_unknown_rule_id_fatal() {
        let toml = r#"
            [rules]
            enabled = ["no-such-rule"]
        "#;
        let err = RulesetConfig::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownRule { .. }));
    }

    #[test]
    fn test_invalid_pattern_fatal() {
        let toml = r#"
            [[schema]]
            key = "base_model"
            pattern = "["
        "#;
        let err = RulesetConfig::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn test_bad_weights_fatal() {
        let toml = r#"
            [scoring]
            error_weight = -1.0
        "#;
        let err = RulesetConfig::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWeight(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "[scoring]\nerror_weight = 30.0\n\n[rules]\nenabled = [\"link-targets\"]"
        )
        .expect("write");
        let config = RulesetConfig::load(file.path()).expect("load");
        assert_eq!(config.scoring.error_weight, 30.0);
        assert_eq!(config.rules.enabled, ["link-targets"]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RulesetConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
