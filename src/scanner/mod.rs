//! Section scanning
//!
//! Walks the markdown body line by line and produces the ordered
//! sections the rule engine evaluates. Recognized structure:
//!
//! - ATX headings (`#` runs) open a new section at that nesting level
//! - fenced code blocks, language tag captured verbatim
//! - a fence whose tag matches a configured citation format (default
//!   `bibtex`) becomes a citation block
//! - inline `[text](target)` and reference-style `[text]: target` links
//!
//! The scan is single pass and never aborts: an unclosed fence is
//! closed at end of input with a `warning` finding, and whatever was
//! captured is still yielded.

use crate::models::{Category, Finding, Location, Severity};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use tracing::debug;

static INLINE_LINK: OnceLock<Regex> = OnceLock::new();
static REFERENCE_LINK: OnceLock<Regex> = OnceLock::new();

fn inline_link() -> &'static Regex {
    INLINE_LINK.get_or_init(|| Regex::new(r"\[([^\]]*)\]\(([^)]*)\)").unwrap())
}

fn reference_link() -> &'static Regex {
    REFERENCE_LINK.get_or_init(|| Regex::new(r"^\s*\[([^\]]+)\]:\s*(\S+)").unwrap())
}

/// One content block inside a section
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Block {
    Paragraph {
        text: String,
    },
    Code {
        language: Option<String>,
        body: String,
    },
    Link {
        text: String,
        target: String,
    },
    Citation {
        format: String,
        body: String,
    },
}

/// A body region bounded by a heading
///
/// Sections are ordered by document position; heading text need not be
/// unique. Content before the first heading lands in a level-0
/// preamble section with an empty heading.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    /// Heading text as written (without the marker run)
    pub heading: String,
    /// Lower-cased, whitespace-collapsed heading for alias matching
    pub normalized: String,
    pub level: usize,
    /// Position among all scanned sections
    pub index: usize,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn code_blocks(&self) -> impl Iterator<Item = (&Option<String>, &str)> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Code { language, body } => Some((language, body.as_str())),
            _ => None,
        })
    }

    pub fn links(&self) -> impl Iterator<Item = (&str, &str)> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Link { text, target } => Some((text.as_str(), target.as_str())),
            _ => None,
        })
    }

    pub fn citations(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Citation { body, .. } => Some(body.as_str()),
            _ => None,
        })
    }
}

/// Normalize heading text for alias comparison: strip markers and
/// trailing punctuation, lower-case, collapse runs of whitespace.
pub fn normalize_heading(text: &str) -> String {
    let stripped = text
        .trim()
        .trim_start_matches('#')
        .trim()
        .trim_end_matches([':', '.']);
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

struct OpenFence {
    language: Option<String>,
    body: Vec<String>,
    opened_at: usize,
}

/// Scan the body into ordered sections.
///
/// `line_offset` is added to emitted line numbers so locations refer to
/// the full document when the body follows a frontmatter block.
pub fn scan(
    body: &str,
    citation_formats: &[String],
    line_offset: usize,
) -> (Vec<Section>, Vec<Finding>) {
    let mut sections: Vec<Section> = Vec::new();
    let mut current = Section {
        heading: String::new(),
        normalized: String::new(),
        level: 0,
        index: 0,
        blocks: Vec::new(),
    };
    let mut findings = Vec::new();
    let mut fence: Option<OpenFence> = None;
    let mut paragraph: Vec<String> = Vec::new();

    for (idx, line) in body.lines().enumerate() {
        let line_no = line_offset + idx + 1;
        let trimmed = line.trim_start();

        if trimmed.starts_with("```") {
            match fence.take() {
                None => {
                    flush_paragraph(&mut paragraph, &mut current);
                    let tag = trimmed.trim_start_matches('`').trim();
                    fence = Some(OpenFence {
                        language: (!tag.is_empty()).then(|| tag.to_string()),
                        body: Vec::new(),
                        opened_at: line_no,
                    });
                }
                Some(open) => current.blocks.push(close_fence(open, citation_formats)),
            }
            continue;
        }
        if let Some(open) = fence.as_mut() {
            open.body.push(line.to_string());
            continue;
        }

        if let Some((level, heading)) = parse_heading(trimmed) {
            flush_paragraph(&mut paragraph, &mut current);
            // A heading closes open sections at equal or deeper level.
            // Shallower open sections stay conceptually open: blocks
            // attach to the innermost section, and the recorded levels
            // let consumers recover each section's subtree.
            if !current.blocks.is_empty() || !current.heading.is_empty() {
                sections.push(current);
            }
            current = Section {
                normalized: normalize_heading(heading),
                heading: heading.to_string(),
                level,
                index: 0,
                blocks: Vec::new(),
            };
            continue;
        }

        if trimmed.is_empty() {
            flush_paragraph(&mut paragraph, &mut current);
            continue;
        }

        // Prose line: collect links, keep the text for the paragraph.
        if let Some(caps) = reference_link().captures(line) {
            current.blocks.push(Block::Link {
                text: caps[1].to_string(),
                target: caps[2].to_string(),
            });
            continue;
        }
        for caps in inline_link().captures_iter(line) {
            current.blocks.push(Block::Link {
                text: caps[1].to_string(),
                target: caps[2].to_string(),
            });
        }
        paragraph.push(line.trim().to_string());
    }

    // End of input closes every open construct.
    if let Some(open) = fence.take() {
        findings.push(Finding::new(
            "scanner-truncation",
            Severity::Warning,
            Category::Structure,
            format!(
                "code fence opened on line {} was never closed; closed at end of input",
                open.opened_at
            ),
            Some(Location::Line {
                line: open.opened_at,
            }),
        ));
        current.blocks.push(close_fence(open, citation_formats));
    }
    flush_paragraph(&mut paragraph, &mut current);
    if !current.blocks.is_empty() || !current.heading.is_empty() {
        sections.push(current);
    }

    for (i, section) in sections.iter_mut().enumerate() {
        section.index = i;
    }
    debug!(sections = sections.len(), "body scanned");
    (sections, findings)
}

fn parse_heading(trimmed: &str) -> Option<(usize, &str)> {
    if !trimmed.starts_with('#') {
        return None;
    }
    let level = trimmed.chars().take_while(|&c| c == '#').count();
    let rest = &trimmed[level..];
    // `#tag` style text is not a heading.
    if !rest.is_empty() && !rest.starts_with(' ') {
        return None;
    }
    Some((level, rest.trim()))
}

fn close_fence(open: OpenFence, citation_formats: &[String]) -> Block {
    let body = open.body.join("\n");
    if let Some(lang) = open.language.as_deref() {
        if citation_formats.iter().any(|f| f.eq_ignore_ascii_case(lang)) {
            return Block::Citation {
                format: lang.to_lowercase(),
                body,
            };
        }
    }
    Block::Code {
        language: open.language,
        body,
    }
}

fn flush_paragraph(paragraph: &mut Vec<String>, section: &mut Section) {
    if paragraph.is_empty() {
        return;
    }
    section.blocks.push(Block::Paragraph {
        text: paragraph.join("\n"),
    });
    paragraph.clear();
}
