/// Story project: groups parsed notes into the globals note, knots and
/// object notes of one story.

use serde::{Deserialize, Serialize};

use crate::core::normalize::normalize;
use crate::schema::note::{keys, ParsedNote};

/// The notes of one story, ready for assembly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryProject {
    /// Project filter; empty accepts every note.
    pub name: String,
    pub globals: Option<ParsedNote>,
    /// Sorted by note name ignoring case, ties in byte order.
    pub knots: Vec<ParsedNote>,
    /// Notes carrying both `id` and `fields`, in input order.
    pub objects: Vec<ParsedNote>,
    /// Start knot as written, with any `[[`/`]]` removed.
    pub start_knot: Option<String>,
    pub warnings: Vec<String>,
}

impl StoryProject {
    /// Group `notes` into a project.
    ///
    /// Notes without a unit type are skipped, as are notes belonging to a
    /// different project when `name` is non-empty. The first globals note
    /// wins; later ones are reported and ignored.
    pub fn from_notes(name: &str, notes: impl IntoIterator<Item = ParsedNote>) -> Self {
        let mut project = StoryProject {
            name: name.to_string(),
            ..StoryProject::default()
        };

        for note in notes {
            if note.unit_type.is_none() {
                continue;
            }
            if !name.is_empty() {
                if let Some(other) = note.project_id.as_deref().filter(|p| *p != name) {
                    log::debug!("skipping {} from project {other}", note.name);
                    continue;
                }
            }

            if note.unit_id.is_some() && note.meta(keys::FIELDS).is_some() && !note.is_globals() {
                project.objects.push(note.clone());
            }

            if note.is_globals() {
                if let Some(first) = &project.globals {
                    project.warnings.push(format!(
                        "{}: second globals note ignored, using {}",
                        note.name, first.name
                    ));
                    continue;
                }
                project.start_knot = note
                    .metadata
                    .get_str(keys::START)
                    .map(strip_link)
                    .filter(|start| !start.is_empty());
                project.globals = Some(note);
            } else if note.is_knot() {
                project.knots.push(note);
            }
        }

        project.knots.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
        project
    }

    /// Divert address of the start knot.
    pub fn start_path(&self) -> Option<String> {
        self.start_knot.as_deref().map(normalize)
    }

    pub fn knot_ids(&self) -> Vec<String> {
        self.knots.iter().map(ParsedNote::knot_id).collect()
    }
}

fn strip_link(start: &str) -> String {
    let start = start.trim();
    let start = start.strip_prefix("[[").unwrap_or(start);
    start.strip_suffix("]]").unwrap_or(start).trim().to_string()
}
