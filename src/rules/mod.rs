//! Document rules
//!
//! This module provides the rule framework and the built-in rules that
//! evaluate the combined frontmatter + section model.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │                  RuleEngine                    │
//! │  - registers enabled rules from config         │
//! │  - runs them in registration order             │
//! │  - logs and skips a failing rule               │
//! │  - collects findings                           │
//! └────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//! ┌────────────────────────────────────────────────┐
//! │                  Rule trait                    │
//! │  - id(): unique identifier                     │
//! │  - description(): human-readable summary       │
//! │  - check(model): pure, independent, total      │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! # Built-in rules
//!
//! - `required-sections` - required logical sections must exist
//! - `quickstart-code` - quick-start sections need runnable code
//! - `citation-sync` - frontmatter citation field and body block agree
//! - `link-targets` - link targets are valid URIs or relative paths
//! - `duplicate-headings` - repeated headings noted at info

mod base;
mod citation_sync;
mod duplicate_headings;
mod engine;
mod link_targets;
mod quickstart_code;
mod required_sections;

pub use base::{DocumentModel, Rule};
pub use citation_sync::CitationSyncRule;
pub use duplicate_headings::DuplicateHeadingsRule;
pub use engine::RuleEngine;
pub use link_targets::LinkTargetsRule;
pub use quickstart_code::QuickstartCodeRule;
pub use required_sections::RequiredSectionsRule;

/// Identifiers of every built-in rule, in default registration order.
/// Config validation rejects `rules.enabled` entries outside this set.
pub const BUILTIN_RULE_IDS: &[&str] = &[
    "required-sections",
    "quickstart-code",
    "citation-sync",
    "link-targets",
    "duplicate-headings",
];
