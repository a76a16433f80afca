//! Code-block executability hint
//!
//! A quick-start section should show at least one fenced code block
//! with a recognized language tag, as a hint that the example is
//! actually runnable. Sections that are missing entirely are
//! `required-sections`' concern, not this rule's.

use crate::config::RulesetConfig;
use crate::models::{Category, Finding, Location, Severity};
use crate::rules::base::{DocumentModel, Rule};
use crate::scanner::normalize_heading;
use anyhow::Result;

struct CodeExpectation {
    name: String,
    aliases: Vec<String>,
}

pub struct QuickstartCodeRule {
    expectations: Vec<CodeExpectation>,
    languages: Vec<String>,
}

impl QuickstartCodeRule {
    pub fn new(config: &RulesetConfig) -> Self {
        let expectations = config
            .code_sections()
            .map(|s| CodeExpectation {
                name: s.name.clone(),
                aliases: std::iter::once(s.name.as_str())
                    .chain(s.aliases.iter().map(String::as_str))
                    .map(normalize_heading)
                    .collect(),
            })
            .collect();
        let languages = config
            .rules
            .code_languages
            .iter()
            .map(|l| l.to_lowercase())
            .collect();
        Self {
            expectations,
            languages,
        }
    }

    fn recognized(&self, language: &Option<String>) -> bool {
        language
            .as_deref()
            .is_some_and(|l| self.languages.iter().any(|known| known == &l.to_lowercase()))
    }
}

impl Rule for QuickstartCodeRule {
    fn id(&self) -> &'static str {
        "quickstart-code"
    }

    fn description(&self) -> &'static str {
        "Quick-start sections should contain a runnable fenced code block"
    }

    fn check(&self, model: &DocumentModel) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();
        for expectation in &self.expectations {
            let Some(section) = model.section_matching(&expectation.aliases) else {
                continue;
            };
            // Sub-headings under the matched section still count: a
            // code block beneath `### With timm` belongs to `## Usage`.
            let has_runnable = model
                .subtree(section)
                .flat_map(|s| s.code_blocks())
                .any(|(language, _)| self.recognized(language));
            if !has_runnable {
                findings.push(Finding::new(
                    self.id(),
                    Severity::Warning,
                    Category::Structure,
                    format!(
                        "section `{}` has no fenced code block with a recognized language tag",
                        expectation.name
                    ),
                    Some(Location::Section {
                        heading: section.heading.clone(),
                        index: section.index,
                    }),
                ));
            }
        }
        Ok(findings)
    }
}
