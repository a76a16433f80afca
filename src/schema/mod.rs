//! Schema validation
//!
//! Checks extracted frontmatter fields against the field taxonomy.
//! Validation never halts on first failure: every rule is evaluated
//! against every field and all findings accumulate. Findings are
//! emitted in the schema's declared field order, then unknown document
//! fields in document order, so report output is byte-stable.

use crate::config::{ConfigError, SchemaRule};
use crate::frontmatter::{FieldValue, FrontmatterBlock};
use crate::models::{Category, Finding, Location, Severity};
use regex::Regex;
use tracing::debug;

struct CompiledRule {
    rule: SchemaRule,
    pattern: Option<Regex>,
}

/// A compiled, read-only field taxonomy
pub struct Schema {
    rules: Vec<CompiledRule>,
}

impl Schema {
    /// Compile schema rules, turning patterns into regexes. An invalid
    /// pattern is a fatal config error.
    pub fn compile(rules: &[SchemaRule]) -> Result<Self, ConfigError> {
        let mut compiled = Vec::with_capacity(rules.len());
        for rule in rules {
            let pattern = match &rule.pattern {
                Some(p) => Some(Regex::new(p).map_err(|source| ConfigError::InvalidPattern {
                    key: rule.key.clone(),
                    source,
                })?),
                None => None,
            };
            compiled.push(CompiledRule {
                rule: rule.clone(),
                pattern,
            });
        }
        Ok(Self { rules: compiled })
    }

    /// Validate a frontmatter block, returning all findings.
    pub fn validate(&self, block: &FrontmatterBlock) -> Vec<Finding> {
        let mut findings = Vec::new();

        for compiled in &self.rules {
            let rule = &compiled.rule;
            let location = Some(Location::Field {
                key: rule.key.clone(),
            });
            let Some(value) = block.get(&rule.key) else {
                if rule.required {
                    findings.push(Finding::new(
                        "schema-required",
                        Severity::Error,
                        Category::Metadata,
                        format!("required field `{}` is missing", rule.key),
                        location,
                    ));
                }
                continue;
            };

            if !rule.types.is_empty() && !rule.types.contains(&value.field_type()) {
                findings.push(Finding::new(
                    "schema-type",
                    Severity::Error,
                    Category::Metadata,
                    format!(
                        "field `{}` has type {}, expected {}",
                        rule.key,
                        value.field_type(),
                        rule.types
                            .iter()
                            .map(|t| t.to_string())
                            .collect::<Vec<_>>()
                            .join(" or ")
                    ),
                    location,
                ));
                continue;
            }

            if !rule.allowed.is_empty() {
                // Taxonomies evolve, so out-of-enum is a warning.
                for candidate in enum_candidates(value) {
                    if !rule.allowed.iter().any(|a| a == candidate) {
                        findings.push(Finding::new(
                            "schema-enum",
                            Severity::Warning,
                            Category::Metadata,
                            format!(
                                "field `{}` value `{candidate}` is not an allowed value",
                                rule.key
                            ),
                            Some(Location::Field {
                                key: rule.key.clone(),
                            }),
                        ));
                    }
                }
            }

            if let (Some(pattern), Some(scalar)) = (&compiled.pattern, value.as_scalar()) {
                if !pattern.is_match(scalar) {
                    findings.push(Finding::new(
                        "schema-pattern",
                        Severity::Warning,
                        Category::Metadata,
                        format!(
                            "field `{}` value `{scalar}` does not match pattern `{}`",
                            rule.key,
                            pattern.as_str()
                        ),
                        Some(Location::Field {
                            key: rule.key.clone(),
                        }),
                    ));
                }
            }
        }

        // Unknown fields are an extensibility signal, not a defect.
        for key in block.fields.keys() {
            if !self.rules.iter().any(|c| c.rule.key == *key) {
                findings.push(Finding::new(
                    "schema-unknown-field",
                    Severity::Info,
                    Category::Metadata,
                    format!("field `{key}` is not in the schema"),
                    Some(Location::Field { key: key.clone() }),
                ));
            }
        }

        debug!(findings = findings.len(), "schema validated");
        findings
    }
}

fn enum_candidates(value: &FieldValue) -> Vec<&str> {
    match value {
        FieldValue::Scalar(s) => vec![s.as_str()],
        FieldValue::List(items) => items.iter().map(String::as_str).collect(),
        // Nested mappings are not enum-checked; a type constraint
        // rejects them if the schema wants scalars.
        FieldValue::Map(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesetConfig;
    use crate::frontmatter;
    use crate::frontmatter::FieldType;

    fn validate(doc: &str, rules: Vec<SchemaRule>) -> Vec<Finding> {
        let (block, _, _) = frontmatter::parse(doc);
        Schema::compile(&rules).expect("schema").validate(&block)
    }

    #[test]
    fn test_required_field_missing() {
        let findings = validate(
            "---\ntags:\n- vision\n---\n",
            vec![SchemaRule::new("license").required()],
        );
        let errors: Vec<&Finding> = findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule_id, "schema-required");
        assert_eq!(
            errors[0].location,
            Some(Location::Field {
                key: "license".to_string()
            })
        );
    }

    #[test]
    fn test_valid_enum_value_passes() {
        let findings = validate(
            "---\nlicense: mit\n---\n",
            vec![SchemaRule::new("license")
                .required()
                .types(&[FieldType::String])
                .allowed(&["mit", "apache-2.0"])],
        );
        assert!(findings.is_empty());
    }

    #[test]
    fn test_enum_mismatch_is_warning() {
        let findings = validate(
            "---\nlicense: wtfpl\n---\n",
            vec![SchemaRule::new("license").allowed(&["mit"])],
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert_eq!(findings[0].rule_id, "schema-enum");
    }

    #[test]
    fn test_type_mismatch_is_error() {
        let findings = validate(
            "---\ntags: just-a-string\n---\n",
            vec![SchemaRule::new("tags").types(&[FieldType::List])],
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);
        assert_eq!(findings[0].rule_id, "schema-type");
    }

    #[test]
    fn test_list_elements_checked_against_enum() {
        let findings = validate(
            "---\nlanguage:\n- en\n- klingon\n---\n",
            vec![SchemaRule::new("language").allowed(&["en", "fr", "de"])],
        );
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("klingon"));
    }

    #[test]
    fn test_unknown_field_is_info() {
        let findings = validate(
            "---\nlicense: mit\nwidget_count: three\n---\n",
            vec![SchemaRule::new("license").allowed(&["mit"])],
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Info);
        assert_eq!(findings[0].rule_id, "schema-unknown-field");
        assert!(findings[0].message.contains("widget_count"));
    }

    #[test]
    fn test_pattern_mismatch_is_warning() {
        let findings = validate(
            "---\nbase_model: not a repo id\n---\n",
            vec![SchemaRule::new("base_model").pattern(r"^[\w.-]+/[\w.-]+$")],
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule_id, "schema-pattern");
    }

    #[test]
    fn test_schema_order_not_document_order() {
        let findings = validate(
            "---\n---\n",
            vec![
                SchemaRule::new("license").required(),
                SchemaRule::new("pipeline_tag").required(),
            ],
        );
        assert_eq!(findings.len(), 2);
        assert!(findings[0].message.contains("license"));
        assert!(findings[1].message.contains("pipeline_tag"));
    }

    #[test]
    fn test_validation_never_halts_early() {
        let findings = validate(
            "---\ntags: scalar\nextra: x\n---\n",
            vec![
                SchemaRule::new("license").required(),
                SchemaRule::new("tags").types(&[FieldType::List]),
            ],
        );
        // One error per rule plus the unknown-field info.
        assert_eq!(findings.len(), 3);
    }

    #[test]
    fn test_default_schema_compiles() {
        let config = RulesetConfig::default();
        Schema::compile(&config.schema).expect("default schema compiles");
    }

    #[test]
    fn test_absent_frontmatter_reports_only_required() {
        let findings = validate(
            "# No frontmatter here\n",
            vec![
                SchemaRule::new("license").required(),
                SchemaRule::new("tags").types(&[FieldType::List]),
            ],
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule_id, "schema-required");
    }
}
