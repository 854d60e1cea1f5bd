/// Story assembler: global declarations followed by one knot per unit note.

use rustc_hash::FxHashSet;

use crate::core::body::transpile_body;
use crate::core::project::StoryProject;
use crate::core::translation::schema;
use crate::schema::note::{keys, ParsedNote};
use crate::schema::options::{TranspileOptions, TranspileResult};
use crate::schema::value::{MetaValue, Metadata};

/// Accumulates output lines and warnings for one run.
struct StoryAssembler<'a> {
    options: &'a TranspileOptions,
    lines: Vec<String>,
    warnings: Vec<String>,
    seen_knots: FxHashSet<String>,
}

impl<'a> StoryAssembler<'a> {
    fn new(options: &'a TranspileOptions) -> Self {
        Self {
            options,
            lines: Vec::new(),
            warnings: Vec::new(),
            seen_knots: FxHashSet::default(),
        }
    }

    fn warn(&mut self, scope: &str, message: impl std::fmt::Display) {
        let warning = format!("{scope}: {message}");
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    /// A metadata entry that must be a map, if present.
    fn map_entry<'n>(&mut self, note: &'n ParsedNote, key: &str) -> Option<&'n Metadata> {
        match note.meta(key)? {
            MetaValue::Map(map) => Some(map),
            MetaValue::Null => None,
            other => {
                self.warn(
                    &note.name,
                    format!("`{key}` must be a map, found {}", other.type_name()),
                );
                None
            }
        }
    }

    fn declare_lists(&mut self, globals: &ParsedNote) {
        let Some(lists) = self.map_entry(globals, keys::LISTS) else {
            return;
        };
        for (name, value) in lists.iter() {
            let values: Option<Vec<String>> = value
                .as_array()
                .and_then(|items| items.iter().map(MetaValue::scalar_text).collect());
            match values {
                Some(values) => {
                    let line = schema().lists.declaration(name, &values);
                    self.lines.push(line);
                }
                None => self.warn(
                    &globals.name,
                    format!("list `{name}` skipped: expected an array of scalars"),
                ),
            }
        }
    }

    fn declare_consts(&mut self, globals: &ParsedNote) {
        let Some(consts) = self.map_entry(globals, keys::CONSTS) else {
            return;
        };
        for (name, value) in consts.iter() {
            match schema().variables.constant(name, value) {
                Some(line) => self.lines.push(line),
                None => self.warn(
                    &globals.name,
                    format!("constant `{name}` skipped: {} value", value.type_name()),
                ),
            }
        }
    }

    fn declare_vars(&mut self, globals: &ParsedNote) {
        let Some(vars) = self.map_entry(globals, keys::VARS) else {
            return;
        };
        for (name, value) in vars.iter() {
            match schema().variables.global(name, value) {
                Some(line) => self.lines.push(line),
                None => self.warn(
                    &globals.name,
                    format!("variable `{name}` skipped: {} value", value.type_name()),
                ),
            }
        }
    }

    fn declare_fields(&mut self, object: &ParsedNote) {
        let Some(id) = object.unit_id.as_deref() else {
            return;
        };
        let Some(fields) = self.map_entry(object, keys::FIELDS) else {
            return;
        };
        for (field, value) in fields.iter() {
            match schema().variables.object_field(id, field, value) {
                Some(line) => self.lines.push(line),
                None => self.warn(
                    &object.name,
                    format!("field `{field}` skipped: {} value", value.type_name()),
                ),
            }
        }
    }

    /// Close the declaration block with a blank line if it emitted anything.
    fn end_declarations(&mut self) {
        if !self.lines.is_empty() {
            self.lines.push(String::new());
        }
    }

    fn start_divert(&mut self, start: Option<String>) {
        if !self.options.emit_start_divert {
            return;
        }
        if let Some(start) = start.filter(|s| !s.is_empty()) {
            let line = schema().navigation.divert_to(&start);
            self.lines.push(line);
            self.lines.push(String::new());
        }
    }

    fn knot(&mut self, unit: &ParsedNote) {
        let s = schema();
        let id = unit.knot_id();
        log::debug!("assembling knot {id} from {}", unit.name);
        if !self.seen_knots.insert(id.clone()) {
            self.warn(&id, "duplicate knot identifier");
        }

        self.lines.push(s.structure.knot(&id));
        match unit.meta(keys::TAGS) {
            Some(MetaValue::Array(tags)) => {
                for tag in tags {
                    match tag.scalar_text() {
                        Some(tag) => self.lines.push(s.tags.unit(&tag)),
                        None => self.warn(&id, format!("{} tag skipped", tag.type_name())),
                    }
                }
            }
            Some(MetaValue::String(tag)) => self.lines.push(s.tags.unit(tag)),
            Some(MetaValue::Null) | None => {}
            Some(other) => self.warn(
                &id,
                format!("`tags` must be an array, found {}", other.type_name()),
            ),
        }

        let body = transpile_body(&unit.body_lines, self.options);
        self.lines.extend(body.lines);
        for warning in body.warnings {
            self.warn(&id, warning);
        }
        self.lines.push(String::new());
    }

    fn finish(self) -> TranspileResult {
        TranspileResult {
            script_text: self.lines.join("\n"),
            warnings: self.warnings,
        }
    }
}

/// Assemble the script for an optional globals note and the units in the
/// given order.
pub fn assemble(
    globals: Option<&ParsedNote>,
    units: &[ParsedNote],
    options: &TranspileOptions,
) -> TranspileResult {
    let mut assembler = StoryAssembler::new(options);
    if let Some(globals) = globals {
        assembler.declare_lists(globals);
        assembler.declare_consts(globals);
        assembler.declare_vars(globals);
        assembler.end_declarations();
    }
    for unit in units {
        assembler.knot(unit);
    }
    assembler.finish()
}

/// Assemble a whole project: globals, object fields, the optional start
/// divert, then every knot.
pub fn assemble_project(project: &StoryProject, options: &TranspileOptions) -> TranspileResult {
    let mut assembler = StoryAssembler::new(options);
    for warning in &project.warnings {
        log::warn!("{warning}");
        assembler.warnings.push(warning.clone());
    }

    if let Some(globals) = &project.globals {
        assembler.declare_lists(globals);
        assembler.declare_consts(globals);
        assembler.declare_vars(globals);
    }
    for object in &project.objects {
        assembler.declare_fields(object);
    }
    assembler.end_declarations();
    assembler.start_divert(project.start_path());

    for knot in &project.knots {
        assembler.knot(knot);
    }
    assembler.finish()
}
