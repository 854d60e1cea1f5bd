use serde::{Deserialize, Serialize};

use super::value::{MetaValue, Metadata};
use crate::core::normalize::normalize;

/// Front-matter keys understood by the transpiler.
pub mod keys {
    /// Unit type: [`GLOBALS`](super::GLOBALS), [`KNOT`](super::KNOT), or anything else.
    pub const TYPE: &str = "type";
    pub const ID: &str = "id";
    pub const PROJECT: &str = "project";
    /// Start knot of a globals note, optionally written as a wiki link.
    pub const START: &str = "start";
    pub const VARS: &str = "vars";
    pub const CONSTS: &str = "consts";
    pub const LISTS: &str = "lists";
    /// Per-object fields, declared as `VAR <id>_<field>`.
    pub const FIELDS: &str = "fields";
    pub const TAGS: &str = "tags";
}

/// Unit type of the note holding project-wide declarations.
pub const GLOBALS: &str = "globals";
/// Unit type of a note compiled into a knot.
pub const KNOT: &str = "knot";

/// A note split into structured metadata and raw body lines.
///
/// Notes are built per transpile run and never mutated by the
/// transpiler; every transform produces new line sequences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedNote {
    pub metadata: Metadata,
    pub unit_type: Option<String>,
    pub unit_id: Option<String>,
    pub project_id: Option<String>,
    pub body_lines: Vec<String>,
    /// Base filename without extension.
    pub name: String,
}

impl ParsedNote {
    pub fn is_globals(&self) -> bool {
        self.unit_type.as_deref() == Some(GLOBALS)
    }

    pub fn is_knot(&self) -> bool {
        self.unit_type.as_deref() == Some(KNOT)
    }

    /// Knot identifier: the explicit `id` when present, otherwise the
    /// normalized note name.
    pub fn knot_id(&self) -> String {
        match &self.unit_id {
            Some(id) => id.clone(),
            None => normalize(&self.name),
        }
    }

    /// Metadata entry by key.
    pub fn meta(&self, key: &str) -> Option<&MetaValue> {
        self.metadata.get(key)
    }
}
