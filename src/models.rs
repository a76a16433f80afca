//! Core data models for cardlint
//!
//! These models are used throughout the crate for representing
//! findings, score breakdowns, and the final evaluation report.

use serde::{Deserialize, Serialize};

/// Generate a deterministic finding ID based on content hash.
///
/// This ensures findings have stable IDs across runs, enabling:
/// - Diffing reports over time (fixed vs new vs recurring)
/// - Suppression by ID in config files
/// - Reliable deduplication
///
/// The ID is a 16-character hex string derived from hashing:
/// - rule ID (which rule produced it)
/// - location (where in the document it points)
/// - message (what the issue is)
pub fn deterministic_finding_id(rule_id: &str, location: &str, message: &str) -> String {
    // MD5 keeps IDs stable across compiler versions; DefaultHasher would not.
    let input = format!("{rule_id}\n{location}\n{message}");
    let digest = md5::compute(input.as_bytes());
    format!("{:x}", digest)[..16].to_string()
}

/// Severity levels for findings
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Scoring category a finding counts against
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Frontmatter field completeness and validity
    #[default]
    Metadata,
    /// Section and code-block structure of the body
    Structure,
    /// Link and citation integrity
    Links,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Metadata => write!(f, "metadata"),
            Category::Structure => write!(f, "structure"),
            Category::Links => write!(f, "links"),
        }
    }
}

/// Where in the document a finding points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Location {
    /// A frontmatter field, by key
    Field { key: String },
    /// A body section, by heading text and position among sections
    Section { heading: String, index: usize },
    /// A 1-based line number in the raw document
    Line { line: usize },
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Field { key } => write!(f, "field:{key}"),
            Location::Section { heading, index } => write!(f, "section:{index}:{heading}"),
            Location::Line { line } => write!(f, "line:{line}"),
        }
    }
}

/// One rule evaluation outcome
///
/// Findings are immutable once emitted; a contradictory later rule
/// produces a separate finding rather than revising an earlier one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub rule_id: String,
    pub severity: Severity,
    pub category: Category,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Finding {
    /// Build a finding with a content-derived stable ID.
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        category: Category,
        message: impl Into<String>,
        location: Option<Location>,
    ) -> Self {
        let rule_id = rule_id.into();
        let message = message.into();
        let loc_repr = location.as_ref().map(|l| l.to_string()).unwrap_or_default();
        let id = deterministic_finding_id(&rule_id, &loc_repr, &message);
        Self {
            id,
            rule_id,
            severity,
            category,
            message,
            location,
        }
    }
}

/// Summary of findings by severity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingsSummary {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub total: usize,
}

impl FindingsSummary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut summary = Self::default();
        for f in findings {
            match f.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Info => summary.infos += 1,
            }
            summary.total += 1;
        }
        summary
    }
}

/// Per-category subscores, each 0-100
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Subscores {
    pub metadata: f64,
    pub structure: f64,
    pub links: f64,
}

impl Subscores {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Metadata => self.metadata,
            Category::Structure => self.structure,
            Category::Links => self.links,
        }
    }
}

/// Aggregate evaluation report for one document
///
/// Constructed once per evaluation and never mutated afterwards; the
/// score is a pure function of the findings and the scoring weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub score: f64,
    pub grade: String,
    pub subscores: Subscores,
    pub findings: Vec<Finding>,
    pub findings_summary: FindingsSummary,
}

impl Report {
    /// Calculate grade from score
    pub fn grade_from_score(score: f64) -> String {
        match score {
            s if s >= 90.0 => "A".to_string(),
            s if s >= 80.0 => "B".to_string(),
            s if s >= 70.0 => "C".to_string(),
            s if s >= 60.0 => "D".to_string(),
            _ => "F".to_string(),
        }
    }

    /// Whether any finding carries `error` severity
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }
}
