//! WASM bindings for narrative-notes, powering the in-browser note editor.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use narrative_notes::core::assembler::assemble_project;
use narrative_notes::core::normalize::normalize;
use narrative_notes::core::project::StoryProject;
use narrative_notes::core::splitter::parse_markdown;
use narrative_notes::schema::note::ParsedNote;
use narrative_notes::schema::options::{TranspileOptions, TranspileResult};

// ---------------------------------------------------------------------------
// Embedded demo story, compiled into the WASM binary
// ---------------------------------------------------------------------------
mod data {
    pub const CAVE: &[(&str, &str)] = &[
        ("_globals.md", include_str!("../../story_data/cave/_globals.md")),
        ("Cave Mouth.md", include_str!("../../story_data/cave/Cave Mouth.md")),
        ("Flooded Hall.md", include_str!("../../story_data/cave/Flooded Hall.md")),
        ("Lantern.md", include_str!("../../story_data/cave/Lantern.md")),
        ("Vault.md", include_str!("../../story_data/cave/Vault.md")),
    ];
}

// ---------------------------------------------------------------------------
// JSON types for the WASM boundary
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NoteInput {
    name: String,
    content: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct TranspileRequest {
    notes: Vec<NoteInput>,
    #[serde(default)]
    project: String,
    #[serde(default)]
    options: TranspileOptions,
}

fn parse_notes(inputs: &[NoteInput]) -> Result<Vec<ParsedNote>, String> {
    inputs
        .iter()
        .map(|input| parse_markdown(&input.content, &input.name).map_err(|e| e.to_string()))
        .collect()
}

fn run(request: &TranspileRequest) -> Result<TranspileResult, String> {
    let notes = parse_notes(&request.notes)?;
    let project = StoryProject::from_notes(&request.project, notes);
    Ok(assemble_project(&project, &request.options))
}

fn demo_request() -> TranspileRequest {
    TranspileRequest {
        notes: demo_inputs(),
        project: "cave".to_string(),
        options: TranspileOptions {
            emit_start_divert: true,
            ..TranspileOptions::default()
        },
    }
}

fn demo_inputs() -> Vec<NoteInput> {
    data::CAVE
        .iter()
        .map(|(name, content)| NoteInput {
            name: name.to_string(),
            content: content.to_string(),
        })
        .collect()
}

/// Transpile a JSON request and return the result as JSON.
///
/// Expected JSON shape:
/// ```json
/// {
///   "notes": [{ "name": "Cave.md", "content": "---\ntype: knot\n---\n..." }],
///   "project": "cave",
///   "options": { "choice_syntax": "Asterisk", "emit_start_divert": true }
/// }
/// ```
/// `project` and `options` may be omitted.
#[wasm_bindgen]
pub fn transpile_json(input: &str) -> Result<String, JsError> {
    let request: TranspileRequest = serde_json::from_str(input)
        .map_err(|e| JsError::new(&format!("Invalid request JSON: {e}")))?;
    let result = run(&request).map_err(|e| JsError::new(&format!("Note parse error: {e}")))?;
    serde_json::to_string(&result).map_err(|e| JsError::new(&format!("Serialization error: {e}")))
}

/// The embedded cave story as a ready-to-send `transpile_json` request.
#[wasm_bindgen]
pub fn demo_request_json() -> Result<String, JsError> {
    serde_json::to_string(&demo_request())
        .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
}

/// Identifier a note name or heading becomes in the script.
#[wasm_bindgen]
pub fn normalize_identifier(text: &str) -> String {
    normalize(text)
}
