//! Required section presence rule
//!
//! Each required logical section from the config (a licensing section,
//! a usage/quick-start section) must match some body heading. Matching
//! goes through normalized alias sets so variant phrasing is accepted,
//! never literal string comparison.

use crate::config::RulesetConfig;
use crate::models::{Category, Finding, Severity};
use crate::rules::base::{DocumentModel, Rule};
use crate::scanner::normalize_heading;
use anyhow::Result;

struct Requirement {
    name: String,
    /// Normalized aliases, the name itself included
    aliases: Vec<String>,
}

pub struct RequiredSectionsRule {
    requirements: Vec<Requirement>,
}

impl RequiredSectionsRule {
    pub fn new(config: &RulesetConfig) -> Self {
        let requirements = config
            .sections
            .iter()
            .filter(|s| s.required)
            .map(|s| {
                let mut aliases: Vec<String> = std::iter::once(s.name.as_str())
                    .chain(s.aliases.iter().map(String::as_str))
                    .map(normalize_heading)
                    .collect();
                aliases.dedup();
                Requirement {
                    name: s.name.clone(),
                    aliases,
                }
            })
            .collect();
        Self { requirements }
    }
}

impl Rule for RequiredSectionsRule {
    fn id(&self) -> &'static str {
        "required-sections"
    }

    fn description(&self) -> &'static str {
        "Required sections must exist, matched by normalized heading aliases"
    }

    fn check(&self, model: &DocumentModel) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();
        for req in &self.requirements {
            if model.section_matching(&req.aliases).is_none() {
                findings.push(Finding::new(
                    self.id(),
                    Severity::Error,
                    Category::Structure,
                    format!(
                        "required section `{}` is missing (accepted headings: {})",
                        req.name,
                        req.aliases.join(", ")
                    ),
                    None,
                ));
            }
        }
        Ok(findings)
    }
}
