//! Rule execution engine
//!
//! The RuleEngine runs every registered rule over the document model
//! and collects findings. Rules are independent, so execution order
//! cannot change any individual outcome; the engine still runs them in
//! registration order so report output is byte-stable. A failing rule
//! is logged and skipped, never fatal.

use crate::config::RulesetConfig;
use crate::models::Finding;
use crate::rules::base::{DocumentModel, Rule};
use crate::rules::{
    CitationSyncRule, DuplicateHeadingsRule, LinkTargetsRule, QuickstartCodeRule,
    RequiredSectionsRule,
};
use tracing::{debug, warn};

/// Orchestrates rule evaluation over one document model
pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Register a rule
    pub fn with_rule(mut self, rule: Box<dyn Rule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Build an engine holding the built-in rules enabled in config,
    /// in the config's declared order.
    pub fn from_config(config: &RulesetConfig) -> Self {
        let mut engine = Self::new();
        for id in &config.rules.enabled {
            let rule: Box<dyn Rule> = match id.as_str() {
                "required-sections" => Box::new(RequiredSectionsRule::new(config)),
                "quickstart-code" => Box::new(QuickstartCodeRule::new(config)),
                "citation-sync" => Box::new(CitationSyncRule::new(config)),
                "link-targets" => Box::new(LinkTargetsRule::new()),
                "duplicate-headings" => Box::new(DuplicateHeadingsRule::new()),
                // Config validation rejects unknown ids before we get here.
                other => {
                    warn!(rule = other, "skipping unknown rule id");
                    continue;
                }
            };
            engine.rules.push(rule);
        }
        engine
    }

    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Run all rules and collect their findings.
    pub fn run(&self, model: &DocumentModel) -> Vec<Finding> {
        let mut findings = Vec::new();
        for rule in &self.rules {
            match rule.check(model) {
                Ok(mut produced) => {
                    debug!(rule = rule.id(), findings = produced.len(), "rule evaluated");
                    findings.append(&mut produced);
                }
                Err(err) => {
                    warn!(rule = rule.id(), error = %err, "rule failed, skipping");
                }
            }
        }
        findings
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}
