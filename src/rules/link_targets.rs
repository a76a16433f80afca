//! Link well-formedness rule
//!
//! A link target must be a syntactically valid URI or a non-empty
//! internal relative path. Empty targets are errors; targets that
//! parse as neither are warnings.

use crate::models::{Category, Finding, Location, Severity};
use crate::rules::base::{DocumentModel, Rule};
use anyhow::Result;
use regex::Regex;
use std::sync::OnceLock;

static URI: OnceLock<Regex> = OnceLock::new();

fn uri_pattern() -> &'static Regex {
    URI.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://[^\s/$.?#][^\s]*$").unwrap())
}

pub struct LinkTargetsRule;

impl LinkTargetsRule {
    pub fn new() -> Self {
        Self
    }

    fn diagnose(target: &str) -> Option<(Severity, String)> {
        if target.is_empty() {
            return Some((Severity::Error, "link has an empty target".to_string()));
        }
        if target.contains("://") {
            if !uri_pattern().is_match(target) {
                return Some((
                    Severity::Warning,
                    format!("link target `{target}` is not a well-formed URI"),
                ));
            }
            return None;
        }
        // Relative path, anchor, or scheme:path form (mailto:, doi:).
        if target.chars().any(char::is_whitespace) {
            return Some((
                Severity::Warning,
                format!("link target `{target}` contains whitespace"),
            ));
        }
        None
    }
}

impl Default for LinkTargetsRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for LinkTargetsRule {
    fn id(&self) -> &'static str {
        "link-targets"
    }

    fn description(&self) -> &'static str {
        "Link targets must be valid URIs or non-empty relative paths"
    }

    fn check(&self, model: &DocumentModel) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();
        for section in model.sections {
            for (text, target) in section.links() {
                if let Some((severity, message)) = Self::diagnose(target) {
                    let label = if text.is_empty() { target } else { text };
                    findings.push(Finding::new(
                        self.id(),
                        severity,
                        Category::Links,
                        format!("`{label}`: {message}"),
                        Some(Location::Section {
                            heading: section.heading.clone(),
                            index: section.index,
                        }),
                    ));
                }
            }
        }
        Ok(findings)
    }
}
