//! Citation presence cross-check
//!
//! If frontmatter carries a citation field, a matching citation block
//! should appear in the body, and vice versa. Either side missing the
//! other is a warning, not an error: half a citation is still better
//! than none.

use crate::config::RulesetConfig;
use crate::models::{Category, Finding, Location, Severity};
use crate::rules::base::{DocumentModel, Rule};
use anyhow::Result;

pub struct CitationSyncRule {
    field: String,
}

impl CitationSyncRule {
    pub fn new(config: &RulesetConfig) -> Self {
        Self {
            field: config.citation.field.clone(),
        }
    }
}

impl Rule for CitationSyncRule {
    fn id(&self) -> &'static str {
        "citation-sync"
    }

    fn description(&self) -> &'static str {
        "Frontmatter citation field and body citation block must agree"
    }

    fn check(&self, model: &DocumentModel) -> Result<Vec<Finding>> {
        let field_present = model.frontmatter.contains_key(&self.field);
        let body_citation = model
            .sections
            .iter()
            .find(|s| s.citations().next().is_some());

        let mut findings = Vec::new();
        match (field_present, body_citation) {
            (true, None) => findings.push(Finding::new(
                self.id(),
                Severity::Warning,
                Category::Links,
                format!(
                    "frontmatter declares `{}` but no citation block appears in the body",
                    self.field
                ),
                Some(Location::Field {
                    key: self.field.clone(),
                }),
            )),
            (false, Some(section)) => findings.push(Finding::new(
                self.id(),
                Severity::Warning,
                Category::Links,
                format!(
                    "body contains a citation block but frontmatter has no `{}` field",
                    self.field
                ),
                Some(Location::Section {
                    heading: section.heading.clone(),
                    index: section.index,
                }),
            )),
            _ => {}
        }
        Ok(findings)
    }
}
