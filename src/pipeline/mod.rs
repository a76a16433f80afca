//! Document evaluation pipeline
//!
//! Wires the stages together, strictly forward:
//!
//! ```text
//! raw text ─▶ frontmatter ─▶ (fields, body)
//! body     ─▶ scanner     ─▶ sections
//! model    ─▶ schema + rules ─▶ findings
//! findings ─▶ scorer      ─▶ Report
//! ```
//!
//! Each stage fully consumes its input before the next begins, and no
//! stage mutates another's output. One `Evaluator` holds the compiled
//! read-only configuration; evaluations share nothing mutable, so
//! callers may evaluate documents concurrently from multiple threads.

use crate::config::{ConfigError, RulesetConfig};
use crate::models::Report;
use crate::rules::{DocumentModel, RuleEngine};
use crate::schema::Schema;
use crate::scoring::Scorer;
use crate::{frontmatter, scanner};
use thiserror::Error;
use tracing::debug;

/// Caller-contract violations. Everything document-level stays inside
/// the report as findings; only these propagate as errors.
#[derive(Error, Debug)]
pub enum EvaluateError {
    /// The input is not text. Empty documents are valid; binary is not.
    #[error("input is not text: NUL byte at offset {offset}")]
    BinaryInput { offset: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A validated ruleset, compiled once and reused across documents
pub struct Evaluator {
    config: RulesetConfig,
    schema: Schema,
    engine: RuleEngine,
}

impl Evaluator {
    /// Validate and compile a ruleset. Fails before any document is
    /// evaluated if the ruleset itself is broken.
    pub fn new(config: RulesetConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let schema = Schema::compile(&config.schema)?;
        let engine = RuleEngine::from_config(&config);
        Ok(Self {
            config,
            schema,
            engine,
        })
    }

    pub fn config(&self) -> &RulesetConfig {
        &self.config
    }

    /// Evaluate one document and produce its report.
    pub fn evaluate(&self, text: &str) -> Result<Report, EvaluateError> {
        if let Some(offset) = text.bytes().position(|b| b == 0) {
            return Err(EvaluateError::BinaryInput { offset });
        }
        debug!(bytes = text.len(), "evaluating document");

        let mut findings = Vec::new();

        let (block, body, frontmatter_findings) = frontmatter::parse(text);
        findings.extend(frontmatter_findings);

        findings.extend(self.schema.validate(&block));

        // Scanner locations refer to the full document, so offset past
        // the lines the frontmatter consumed.
        let line_offset = text[..text.len() - body.len()].matches('\n').count();
        let (sections, scan_findings) =
            scanner::scan(body, &self.config.citation.formats, line_offset);
        findings.extend(scan_findings);

        let model = DocumentModel {
            frontmatter: &block,
            sections: &sections,
        };
        findings.extend(self.engine.run(&model));

        Ok(Scorer::new(&self.config.scoring).build_report(findings))
    }
}

/// One-shot evaluation: validate the ruleset, then evaluate the
/// document. Callers scoring many documents should build an
/// [`Evaluator`] once instead.
pub fn evaluate(text: &str, config: &RulesetConfig) -> Result<Report, EvaluateError> {
    let evaluator = Evaluator::new(config.clone())?;
    evaluator.evaluate(text)
}
