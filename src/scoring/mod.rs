//! Completeness scoring
//!
//! Aggregates findings into per-category subscores and an overall
//! weighted score.
//!
//! # Scoring Formula
//!
//! ```text
//! subscore  = 100 × (1 − Σ severity_weight / category_max_weight)
//!             clamped to [0, 100]
//! overall   = Σ (category_weight × subscore) / Σ category_weight
//! ```
//!
//! Default weights: error 25, warning 10, info 0. Info findings are
//! informational only and never penalize. The score is a pure function
//! of the findings and the weights: identical findings in identical
//! order always yield the identical score.

use crate::config::ScoringConfig;
use crate::models::{Category, Finding, FindingsSummary, Report, Severity, Subscores};
use tracing::debug;

/// Rule whose finding the malformed-frontmatter weight override targets
const FRONTMATTER_PARSE_RULE: &str = "frontmatter-parse";

pub struct Scorer<'a> {
    config: &'a ScoringConfig,
}

impl<'a> Scorer<'a> {
    pub fn new(config: &'a ScoringConfig) -> Self {
        Self { config }
    }

    fn finding_weight(&self, finding: &Finding) -> f64 {
        if finding.rule_id == FRONTMATTER_PARSE_RULE {
            if let Some(weight) = self.config.malformed_frontmatter_weight {
                return weight;
            }
        }
        match finding.severity {
            Severity::Error => self.config.error_weight,
            Severity::Warning => self.config.warning_weight,
            Severity::Info => 0.0,
        }
    }

    fn subscore(&self, findings: &[Finding], category: Category) -> f64 {
        let penalty: f64 = findings
            .iter()
            .filter(|f| f.category == category)
            .map(|f| self.finding_weight(f))
            .sum();
        let score = 100.0 * (1.0 - penalty / self.config.category_max_weight);
        score.clamp(0.0, 100.0)
    }

    /// Compute all subscores and the weight-normalized overall score.
    pub fn score(&self, findings: &[Finding]) -> (f64, Subscores) {
        let subscores = Subscores {
            metadata: self.subscore(findings, Category::Metadata),
            structure: self.subscore(findings, Category::Structure),
            links: self.subscore(findings, Category::Links),
        };
        let weights = &self.config.category_weights;
        let total_weight = weights.metadata + weights.structure + weights.links;
        let overall = (weights.metadata * subscores.metadata
            + weights.structure * subscores.structure
            + weights.links * subscores.links)
            / total_weight;
        debug!(
            overall,
            metadata = subscores.metadata,
            structure = subscores.structure,
            links = subscores.links,
            "scored document"
        );
        (overall, subscores)
    }

    /// Assemble the final report. Finding order is preserved exactly as
    /// the pipeline produced it.
    pub fn build_report(&self, findings: Vec<Finding>) -> Report {
        let (score, subscores) = self.score(&findings);
        let findings_summary = FindingsSummary::from_findings(&findings);
        Report {
            score,
            grade: Report::grade_from_score(score),
            subscores,
            findings,
            findings_summary,
        }
    }
}
