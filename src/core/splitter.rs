/// Note splitter: separates the front-matter block of a raw note from its
/// body lines.

use std::path::Path;
use thiserror::Error;

use crate::schema::note::{keys, ParsedNote};
use crate::schema::value::{MetaValue, Metadata};

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("invalid front-matter in {note}: {source}")]
    Yaml {
        note: String,
        source: serde_yaml::Error,
    },
    #[error("front-matter of {note} must be a map, found {found}")]
    NotAMap { note: String, found: &'static str },
}

const DELIMITER: &str = "---";

/// Note name for a filename: the base name without its extension.
pub fn note_name(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(filename)
        .to_string()
}

/// Index of the closing delimiter when the note opens with a front-matter
/// block.
fn closing_delimiter(lines: &[&str]) -> Option<usize> {
    let first = lines.first()?.trim_start_matches('\u{feff}').trim();
    if first != DELIMITER {
        return None;
    }
    lines
        .iter()
        .skip(1)
        .position(|line| line.trim() == DELIMITER)
        .map(|offset| offset + 1)
}

/// Split `raw` into a [`ParsedNote`] using already-parsed `metadata`.
///
/// When the first line is `---` everything up to and including the
/// matching closing `---` is dropped. Without a closing delimiter the
/// original lines are kept as the body, unmodified. Line endings follow
/// [`str::lines`], so a trailing `\r` is dropped.
pub fn split(raw: &str, metadata: Metadata, filename: &str) -> ParsedNote {
    let lines: Vec<&str> = raw.lines().collect();
    let body_start = closing_delimiter(&lines).map_or(0, |close| close + 1);
    let body_lines = lines[body_start..].iter().map(|line| line.to_string()).collect();

    let text = |key: &str| metadata.get_str(key).map(str::to_string);
    ParsedNote {
        unit_type: text(keys::TYPE),
        unit_id: text(keys::ID),
        project_id: text(keys::PROJECT),
        body_lines,
        name: note_name(filename),
        metadata,
    }
}

/// Parse a raw Markdown note, reading its YAML front-matter.
///
/// A leading byte-order mark is dropped. A note without front-matter, or
/// with an empty block, gets empty metadata.
pub fn parse_markdown(raw: &str, filename: &str) -> Result<ParsedNote, NoteError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let lines: Vec<&str> = raw.lines().collect();
    let metadata = match closing_delimiter(&lines) {
        Some(close) => parse_front_matter(&lines[1..close].join("\n"), filename)?,
        None => Metadata::new(),
    };
    Ok(split(raw, metadata, filename))
}

fn parse_front_matter(yaml: &str, filename: &str) -> Result<Metadata, NoteError> {
    if yaml.trim().is_empty() {
        return Ok(Metadata::new());
    }
    let value: MetaValue = serde_yaml::from_str(yaml).map_err(|source| NoteError::Yaml {
        note: filename.to_string(),
        source,
    })?;
    match value {
        MetaValue::Map(map) => Ok(map),
        MetaValue::Null => Ok(Metadata::new()),
        other => Err(NoteError::NotAMap {
            note: filename.to_string(),
            found: other.type_name(),
        }),
    }
}
