//! Duplicate heading detection
//!
//! Duplicate headings are legal markdown and sometimes intentional,
//! so repeats are only noted at `info` severity.

use crate::models::{Category, Finding, Location, Severity};
use crate::rules::base::{DocumentModel, Rule};
use anyhow::Result;
use std::collections::HashSet;

pub struct DuplicateHeadingsRule;

impl DuplicateHeadingsRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DuplicateHeadingsRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for DuplicateHeadingsRule {
    fn id(&self) -> &'static str {
        "duplicate-headings"
    }

    fn description(&self) -> &'static str {
        "Notes headings that appear more than once"
    }

    fn check(&self, model: &DocumentModel) -> Result<Vec<Finding>> {
        let mut seen = HashSet::new();
        let mut findings = Vec::new();
        for section in model.sections {
            if section.normalized.is_empty() {
                continue;
            }
            if !seen.insert(section.normalized.as_str()) {
                findings.push(Finding::new(
                    self.id(),
                    Severity::Info,
                    Category::Structure,
                    format!("heading `{}` appears more than once", section.heading),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::FrontmatterBlock;
    use crate::scanner;

    fn check(body: &str) -> Vec<Finding> {
        let (sections, _) = scanner::scan(body, &[], 0);
        let block = FrontmatterBlock::absent();
        let model = DocumentModel {
            frontmatter: &block,
            sections: &sections,
        };
        DuplicateHeadingsRule::new().check(&model).unwrap()
    }

    #[test]
    fn test_unique_headings_are_clean() {
        assert!(check("# A\n## B\n## C\n").is_empty());
    }

    #[test]
    fn test_duplicate_noted_as_info() {
        let findings = check("## Usage\nx\n## Usage\ny\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Info);
        assert_eq!(
            findings[0].location,
            Some(Location::Section {
                heading: "Usage".to_string(),
                index: 1
            })
        );
    }

    #[test]
    fn test_match_is_normalized() {
        let findings = check("## Quick Start\nx\n##   quick   start\ny\n");
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_triplicate_noted_twice() {
        let findings = check("## A\n## A\n## A\n");
        assert_eq!(findings.len(), 2);
    }
}
