//! Integration tests for the cardlint evaluation pipeline
//!
//! These tests drive the public library surface end to end:
//! - complete model cards score 100 with zero errors
//! - structural damage degrades scores without crashing
//! - reports are deterministic byte for byte
//!
//! Fixture documents live in `tests/fixtures/`.

use cardlint::{evaluate, reporters, Evaluator, RulesetConfig, Severity};
use std::path::PathBuf;

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixtures_path().join(name)).expect("read fixture")
}

fn default_evaluator() -> Evaluator {
    Evaluator::new(RulesetConfig::default()).expect("default ruleset")
}

/// Ruleset for the minimal scenario documents: `license` required with
/// an enum, plus a usage section that must carry a code block.
fn minimal_config() -> RulesetConfig {
    RulesetConfig::from_toml_str(
        r#"
        [[schema]]
        key = "license"
        required = true
        types = ["string"]
        allowed = ["mit", "apache-2.0"]

        [[sections]]
        name = "usage"
        aliases = ["usage", "quick start"]
        required = true
        expect_code = true
        "#,
    )
    .expect("minimal config")
}

#[test]
fn complete_model_card_scores_100() {
    let report = default_evaluator()
        .evaluate(&fixture("model_card.md"))
        .expect("report");

    assert!(!report.has_errors(), "unexpected errors: {:#?}", report.findings);
    assert_eq!(
        report.findings_summary.total, 0,
        "clean card should have no findings at all: {:#?}",
        report.findings
    );
    assert_eq!(report.subscores.metadata, 100.0);
    assert_eq!(report.subscores.structure, 100.0);
    assert_eq!(report.subscores.links, 100.0);
    assert_eq!(report.score, 100.0);
    assert_eq!(report.grade, "A");
}

#[test]
fn minimal_valid_document_scenario() {
    let doc = "---\nlicense: mit\n---\n## Usage\n```python\nprint(1)\n```";
    let report = evaluate(doc, &minimal_config()).expect("report");

    assert!(!report.has_errors());
    assert_eq!(report.subscores.metadata, 100.0);
    assert_eq!(report.subscores.structure, 100.0);
}

#[test]
fn code_under_nested_heading_satisfies_usage() {
    let doc = "---\nlicense: mit\n---\n## Usage\n### With timm\n```python\nprint(1)\n```";
    let report = evaluate(doc, &minimal_config()).expect("report");

    assert!(
        !report.findings.iter().any(|f| f.rule_id == "quickstart-code"),
        "code under a sub-heading must count for the parent section: {:#?}",
        report.findings
    );
    assert_eq!(report.subscores.structure, 100.0);
}

#[test]
fn missing_required_license_field() {
    let doc = "---\ntags:\n- vision\n---\n## Usage\n```python\nprint(1)\n```";
    let report = evaluate(doc, &minimal_config()).expect("report");

    let errors: Vec<_> = report
        .findings
        .iter()
        .filter(|f| f.severity == Severity::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].rule_id, "schema-required");
    assert!(errors[0].message.contains("license"));
    assert!(report.subscores.metadata < 100.0);
}

#[test]
fn no_frontmatter_at_all() {
    let doc = "## Usage\n```python\nprint(1)\n```\n";
    let report = evaluate(doc, &minimal_config()).expect("report");

    // Only the missing required field, no parse error for the absent block.
    let findings: Vec<_> = report
        .findings
        .iter()
        .filter(|f| f.severity != Severity::Info)
        .collect();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].rule_id, "schema-required");
}

#[test]
fn unclosed_code_fence_truncation() {
    let doc = "---\nlicense: mit\n---\n## Usage\n```python\nprint(1)\n";
    let report = evaluate(doc, &minimal_config()).expect("report");

    let warnings: Vec<_> = report
        .findings
        .iter()
        .filter(|f| f.severity == Severity::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].rule_id, "scanner-truncation");
    // The truncated block still counts as the usage code block.
    assert!(!report.has_errors());
}

#[test]
fn duplicate_frontmatter_key_warns_and_last_wins() {
    let doc = "---\nlicense: mit\npipeline_tag: image-classification\npipeline_tag: depth-estimation\n---\n\
               ## Usage\n```python\nprint(1)\n```\n## License\nMIT.\n";
    let report = default_evaluator().evaluate(doc).expect("report");

    let duplicates: Vec<_> = report
        .findings
        .iter()
        .filter(|f| f.rule_id == "frontmatter-duplicate-key")
        .collect();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].severity, Severity::Warning);

    let (block, _, _) = cardlint::frontmatter::parse(doc);
    assert_eq!(
        block.get("pipeline_tag").and_then(|v| v.as_scalar()),
        Some("depth-estimation")
    );
}

#[test]
fn malformed_frontmatter_keeps_pipeline_running() {
    let doc = "---\nlicense mit with no colon\n---\n## Usage\n```python\nprint(1)\n```";
    let report = evaluate(doc, &minimal_config()).expect("report");

    assert!(report
        .findings
        .iter()
        .any(|f| f.rule_id == "frontmatter-parse" && f.severity == Severity::Error));
    // Malformed means zero fields, so the required field is missing too.
    assert!(report
        .findings
        .iter()
        .any(|f| f.rule_id == "schema-required"));
    // Body stages still ran: the usage section satisfied its rules.
    assert_eq!(report.subscores.structure, 100.0);
}

#[test]
fn reports_are_byte_identical_across_runs() {
    let doc = fixture("model_card.md");
    let evaluator = default_evaluator();

    let a = evaluator.evaluate(&doc).expect("first run");
    let b = evaluator.evaluate(&doc).expect("second run");

    let json_a = reporters::json::render(&a).expect("render a");
    let json_b = reporters::json::render(&b).expect("render b");
    assert_eq!(json_a, json_b);
}

#[test]
fn fresh_evaluators_agree() {
    let doc = "---\nlicense: unknown-license\n---\n## Usage\nno code here\n";
    let a = evaluate(doc, &RulesetConfig::default()).expect("a");
    let b = evaluate(doc, &RulesetConfig::default()).expect("b");
    assert_eq!(
        reporters::json::render(&a).expect("a"),
        reporters::json::render(&b).expect("b")
    );
}

#[test]
fn broken_link_and_missing_citation_degrade_links_subscore() {
    let doc = "---\nlicense: mit\ncitation: bibtex\n---\n\
               ## Usage\n```python\nprint(1)\n```\n## License\nMIT, see [terms]().\n";
    let report = default_evaluator().evaluate(doc).expect("report");

    // Empty link target is an error; declared citation has no block.
    assert!(report
        .findings
        .iter()
        .any(|f| f.rule_id == "link-targets" && f.severity == Severity::Error));
    assert!(report
        .findings
        .iter()
        .any(|f| f.rule_id == "citation-sync" && f.severity == Severity::Warning));
    assert!(report.subscores.links < 100.0);
    assert_eq!(report.subscores.structure, 100.0);
}

#[test]
fn custom_ruleset_from_file() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"
        [[schema]]
        key = "license"
        required = true

        [rules]
        enabled = ["link-targets"]

        [scoring]
        error_weight = 50.0
        "#
    )
    .expect("write config");

    let config = RulesetConfig::load(file.path()).expect("load config");
    let report = evaluate("no frontmatter\n", &config).expect("report");

    // Only the schema and link rules are active; the missing license
    // costs 50 points under the custom weight.
    assert_eq!(report.subscores.metadata, 50.0);
    assert_eq!(report.subscores.structure, 100.0);
}

#[test]
fn empty_document_scores_at_the_floor() {
    let report = default_evaluator().evaluate("").expect("report");
    assert!(report.has_errors());
    // Missing license field, missing license and usage sections.
    assert_eq!(report.subscores.metadata, 75.0);
    assert_eq!(report.subscores.structure, 50.0);
    assert_eq!(report.subscores.links, 100.0);
    assert_eq!(report.grade, "C");
}
