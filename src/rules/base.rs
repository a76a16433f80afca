//! Base rule trait and types
//!
//! This module defines the core abstractions for document rules:
//! - `DocumentModel`, the combined read-only view rules evaluate
//! - `Rule` trait that all rules must implement

use crate::frontmatter::FrontmatterBlock;
use crate::models::Finding;
use crate::scanner::Section;
use anyhow::Result;

/// Combined structured + body model for one document
///
/// Borrowed views only: stages never mutate each other's output.
#[derive(Debug, Clone, Copy)]
pub struct DocumentModel<'a> {
    pub frontmatter: &'a FrontmatterBlock,
    pub sections: &'a [Section],
}

impl<'a> DocumentModel<'a> {
    /// First section whose normalized heading matches any of the given
    /// normalized aliases.
    pub fn section_matching(&self, aliases: &[String]) -> Option<&'a Section> {
        self.sections
            .iter()
            .find(|s| aliases.iter().any(|a| *a == s.normalized))
    }

    /// A section together with its subtree: the following sections at a
    /// deeper nesting level, up to the next heading at equal or
    /// shallower level. A `###` sub-heading under `## Usage` is still
    /// part of the usage section for rules that look at content.
    pub fn subtree(&self, section: &'a Section) -> impl Iterator<Item = &'a Section> {
        let level = section.level;
        std::iter::once(section).chain(
            self.sections[section.index + 1..]
                .iter()
                .take_while(move |s| s.level > level),
        )
    }
}

/// Trait for all document rules
///
/// Rules are pure predicates over the model: independent of each other,
/// total (they terminate and return findings for every well-formed or
/// malformed model), and free of side effects. No rule may depend on
/// another rule's findings.
///
/// # Example Implementation
///
/// ```ignore
/// pub struct MyRule;
///
/// impl Rule for MyRule {
///     fn id(&self) -> &'static str {
///         "my-rule"
///     }
///
///     fn description(&self) -> &'static str {
///         "Checks my specific document property"
///     }
///
///     fn check(&self, model: &DocumentModel) -> Result<Vec<Finding>> {
///         Ok(vec![])
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Unique identifier for this rule, used in findings and config
    fn id(&self) -> &'static str;

    /// Human-readable description of what this rule checks
    fn description(&self) -> &'static str;

    /// Evaluate the rule and return findings
    ///
    /// An `Err` marks the rule itself as broken; the engine logs it and
    /// continues with the remaining rules.
    fn check(&self, model: &DocumentModel) -> Result<Vec<Finding>>;
}
