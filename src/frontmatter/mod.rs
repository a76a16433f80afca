//! Frontmatter extraction
//!
//! Pulls the delimited structured header off the top of a document and
//! parses it into an ordered key -> value map. The parser accepts the
//! YAML-ish subset that model cards actually use: scalar values, lists
//! (indented or not, plus inline `[a, b]`), and one level of nested
//! mapping. Anything outside that subset downgrades the whole block to
//! `Malformed` with an `error` finding; the pipeline keeps going with
//! an empty field set so downstream stages still run.

use crate::models::{Category, Finding, Location, Severity};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Line that opens and closes a frontmatter block
pub const DELIMITER: &str = "---";

/// Parse status of the header block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrontmatterStatus {
    Present,
    Absent,
    Malformed,
}

/// Inferred type of a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    List,
    Map,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::List => write!(f, "list"),
            FieldType::Map => write!(f, "map"),
        }
    }
}

/// One structured field value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
    Map(IndexMap<String, String>),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Scalar(_) => FieldType::String,
            FieldValue::List(_) => FieldType::List,
            FieldValue::Map(_) => FieldType::Map,
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(s) => Some(s),
            _ => None,
        }
    }
}

/// The delimited structured header of a document
///
/// Never mutated after `parse` returns it. Key order matches document
/// order so reports stay stable.
#[derive(Debug, Clone, Serialize)]
pub struct FrontmatterBlock {
    pub status: FrontmatterStatus,
    /// Raw text between the delimiters (empty when absent)
    pub raw: String,
    pub fields: IndexMap<String, FieldValue>,
}

impl FrontmatterBlock {
    pub fn absent() -> Self {
        Self {
            status: FrontmatterStatus::Absent,
            raw: String::new(),
            fields: IndexMap::new(),
        }
    }

    fn malformed(raw: String) -> Self {
        Self {
            status: FrontmatterStatus::Malformed,
            raw,
            fields: IndexMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }
}

/// Extract and parse the frontmatter block.
///
/// Returns the block, the remaining body text, and any findings the
/// parse produced. The body borrows from the input; nothing is copied
/// except the raw header span.
pub fn parse(text: &str) -> (FrontmatterBlock, &str, Vec<Finding>) {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut lines = text.split_inclusive('\n');
    let first = match lines.next() {
        Some(l) => l,
        None => return (FrontmatterBlock::absent(), text, Vec::new()),
    };
    if first.trim_end() != DELIMITER {
        debug!("no frontmatter delimiter on first line");
        return (FrontmatterBlock::absent(), text, Vec::new());
    }

    // Locate the closing delimiter, tracking byte offsets.
    let mut offset = first.len();
    let header_start = offset;
    let mut header_end = None;
    let mut body_start = text.len();
    for line in lines {
        if line.trim_end() == DELIMITER {
            header_end = Some(offset);
            body_start = offset + line.len();
            break;
        }
        offset += line.len();
    }

    let Some(header_end) = header_end else {
        let finding = Finding::new(
            "frontmatter-parse",
            Severity::Error,
            Category::Metadata,
            "frontmatter opened on line 1 but the closing delimiter is missing",
            Some(Location::Line { line: 1 }),
        );
        // Best effort: treat everything after the opener as body.
        return (
            FrontmatterBlock::malformed(text[header_start..].to_string()),
            &text[header_start..],
            vec![finding],
        );
    };

    let raw = &text[header_start..header_end];
    let body = &text[body_start..];

    match parse_fields(raw) {
        Ok((fields, mut findings)) => {
            debug!(field_count = fields.len(), "frontmatter parsed");
            findings.sort_by_key(|f| match &f.location {
                Some(Location::Line { line }) => *line,
                _ => 0,
            });
            let block = FrontmatterBlock {
                status: FrontmatterStatus::Present,
                raw: raw.to_string(),
                fields,
            };
            (block, body, findings)
        }
        Err(err) => {
            let finding = Finding::new(
                "frontmatter-parse",
                Severity::Error,
                Category::Metadata,
                format!("malformed frontmatter: {}", err.message),
                Some(Location::Line { line: err.line }),
            );
            (
                FrontmatterBlock::malformed(raw.to_string()),
                body,
                vec![finding],
            )
        }
    }
}

struct ParseFailure {
    line: usize,
    message: String,
}

enum Pending {
    /// `key:` seen, nature of the value not yet known
    Open,
    List(Vec<String>),
    Map(IndexMap<String, String>),
}

/// Parse the header interior. `Err` means the whole block is malformed;
/// the caller then discards all fields per the zero-fields contract.
fn parse_fields(
    raw: &str,
) -> Result<(IndexMap<String, FieldValue>, Vec<Finding>), ParseFailure> {
    let mut fields: IndexMap<String, FieldValue> = IndexMap::new();
    let mut findings = Vec::new();
    // Pending carries the line the key appeared on so a duplicate of a
    // multi-line value is reported at the key, not at the flush point.
    let mut pending: Option<(String, Pending, usize)> = None;

    // Interior starts on document line 2 (line 1 is the opener).
    for (idx, line) in raw.lines().enumerate() {
        let line_no = idx + 2;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let indented = line.starts_with(' ') || line.starts_with('\t');
        let is_list_item = trimmed == "-" || trimmed.starts_with("- ");

        if indented || is_list_item {
            let Some((_, state, _)) = pending.as_mut() else {
                return Err(ParseFailure {
                    line: line_no,
                    message: format!("continuation line without a parent key: {trimmed:?}"),
                });
            };
            if is_list_item {
                let item = strip_quotes(trimmed.trim_start_matches('-').trim());
                match state {
                    Pending::Open => *state = Pending::List(vec![item]),
                    Pending::List(items) => items.push(item),
                    Pending::Map(_) => {
                        return Err(ParseFailure {
                            line: line_no,
                            message: "list item inside a nested mapping".to_string(),
                        })
                    }
                }
            } else if let Some((k, v)) = split_key_value(trimmed) {
                match state {
                    Pending::Open => {
                        let mut map = IndexMap::new();
                        map.insert(k, v);
                        *state = Pending::Map(map);
                    }
                    Pending::Map(map) => {
                        map.insert(k, v);
                    }
                    Pending::List(_) => {
                        return Err(ParseFailure {
                            line: line_no,
                            message: "mapping entry inside a list".to_string(),
                        })
                    }
                }
            } else {
                return Err(ParseFailure {
                    line: line_no,
                    message: format!("expected list item or nested mapping, got {trimmed:?}"),
                });
            }
            continue;
        }

        // Top-level line: must be `key:` or `key: value`.
        commit(&mut fields, &mut findings, pending.take());
        let Some(colon) = trimmed.find(':') else {
            return Err(ParseFailure {
                line: line_no,
                message: format!("expected `key: value`, got {trimmed:?}"),
            });
        };
        let key = trimmed[..colon].trim();
        if key.is_empty() {
            return Err(ParseFailure {
                line: line_no,
                message: "empty field key".to_string(),
            });
        }
        let value = trimmed[colon + 1..].trim();
        if value.is_empty() {
            pending = Some((key.to_string(), Pending::Open, line_no));
        } else {
            let parsed = parse_scalar(value);
            record(&mut fields, &mut findings, key.to_string(), parsed, line_no);
        }
    }
    commit(&mut fields, &mut findings, pending.take());

    Ok((fields, findings))
}

/// Flush a pending multi-line value into the field map.
fn commit(
    fields: &mut IndexMap<String, FieldValue>,
    findings: &mut Vec<Finding>,
    pending: Option<(String, Pending, usize)>,
) {
    let Some((key, state, line_no)) = pending else { return };
    let value = match state {
        // `key:` with nothing under it reads as an empty string.
        Pending::Open => FieldValue::Scalar(String::new()),
        Pending::List(items) => FieldValue::List(items),
        Pending::Map(map) => FieldValue::Map(map),
    };
    record(fields, findings, key, value, line_no);
}

/// Insert a field; duplicate keys keep the last occurrence and emit a warning.
fn record(
    fields: &mut IndexMap<String, FieldValue>,
    findings: &mut Vec<Finding>,
    key: String,
    value: FieldValue,
    line_no: usize,
) {
    if fields.insert(key.clone(), value).is_some() {
        findings.push(Finding::new(
            "frontmatter-duplicate-key",
            Severity::Warning,
            Category::Metadata,
            format!("duplicate frontmatter key `{key}`: last occurrence wins"),
            Some(Location::Line { line: line_no }),
        ));
    }
}

fn split_key_value(line: &str) -> Option<(String, String)> {
    let colon = line.find(':')?;
    let key = line[..colon].trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), strip_quotes(line[colon + 1..].trim())))
}

/// Scalar values may be inline lists: `tags: [vision, pytorch]`.
fn parse_scalar(value: &str) -> FieldValue {
    if let Some(inner) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
        let items: Vec<String> = inner
            .split(',')
            .map(|s| strip_quotes(s.trim()))
            .filter(|s| !s.is_empty())
            .collect();
        return FieldValue::List(items);
    }
    FieldValue::Scalar(strip_quotes(value))
}

fn strip_quotes(value: &str) -> String {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return value[1..value.len() - 1].to_string();
        }
    }
    value.to_string()
}
