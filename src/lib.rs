//! cardlint: model card and README quality engine
//!
//! Ingests a markdown document with an embedded frontmatter header,
//! separates structured fields from prose, validates the fields against
//! a schema, scans the body for sections, code blocks, links, and
//! citations, evaluates a configurable rule set, and derives a 0-100
//! completeness score plus actionable findings.
//!
//! The engine is a pure, synchronous pipeline over in-memory text. It
//! does no I/O besides optional config-file loading: file discovery and
//! report rendering belong to the calling tool.
//!
//! # Example
//!
//! ```
//! use cardlint::{Evaluator, RulesetConfig};
//!
//! let evaluator = Evaluator::new(RulesetConfig::default())?;
//! let report = evaluator.evaluate(
//!     "---\nlicense: mit\n---\n## Usage\n```python\nprint(1)\n```\n## License\nMIT.\n",
//! )?;
//! assert!(!report.has_errors());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod frontmatter;
pub mod models;
pub mod pipeline;
pub mod reporters;
pub mod rules;
pub mod scanner;
pub mod schema;
pub mod scoring;

pub use config::{ConfigError, RulesetConfig, SchemaRule, SectionSpec};
pub use models::{Category, Finding, FindingsSummary, Location, Report, Severity, Subscores};
pub use pipeline::{evaluate, EvaluateError, Evaluator};
