/// Note Linter: reports transpile warnings for a folder of story notes.
///
/// Usage: note_linter <notes_dir> [--project <name>] [--asterisk]

use flexi_logger::Logger;
use narrative_notes::core::assembler::assemble_project;
use narrative_notes::core::project::StoryProject;
use narrative_notes::core::splitter::parse_markdown;
use narrative_notes::schema::note::ParsedNote;
use narrative_notes::schema::options::{ChoiceSyntax, TranspileOptions};
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: note_linter <notes_dir> [--project <name>] [--asterisk]");
        process::exit(0);
    }

    let _logger = Logger::try_with_env_or_str("warn")
        .and_then(|logger| logger.start())
        .ok();

    let notes_dir = Path::new(&args[1]);
    let mut project_name = String::new();
    let mut options = TranspileOptions::default();

    let mut i = 2;
    while i < args.len() {
        if args[i] == "--project" && i + 1 < args.len() {
            i += 1;
            project_name = args[i].clone();
        } else if args[i] == "--asterisk" {
            options.choice_syntax = ChoiceSyntax::Asterisk;
        }
        i += 1;
    }

    if !notes_dir.is_dir() {
        eprintln!("ERROR: Path '{}' is not a directory", notes_dir.display());
        process::exit(1);
    }

    let (notes, errors) = load_notes(notes_dir);
    println!("Loaded {} notes", notes.len());

    let project = StoryProject::from_notes(&project_name, notes);
    let result = assemble_project(&project, &options);

    let mut warnings = result.warnings;
    if let Some(start) = project.start_path() {
        if !project.knot_ids().contains(&start) {
            warnings.push(format!("start knot `{start}` has no note"));
        }
    }

    println!("\n=== Note Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} knots, {} errors, {} warnings",
        project.knots.len(),
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() && warnings.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn load_notes(dir: &Path) -> (Vec<ParsedNote>, Vec<String>) {
    let mut paths = Vec::new();
    collect_markdown(dir, &mut paths);
    paths.sort();

    let mut notes = Vec::new();
    let mut errors = Vec::new();
    for path in paths {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|raw| parse_markdown(&raw, &filename).map_err(|e| e.to_string()));
        match parsed {
            Ok(note) => notes.push(note),
            Err(e) => errors.push(format!("{}: {}", path.display(), e)),
        }
    }
    (notes, errors)
}

fn collect_markdown(dir: &Path, paths: &mut Vec<PathBuf>) {
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                collect_markdown(&path, paths);
            } else if path.extension().and_then(|s| s.to_str()) == Some("md") {
                paths.push(path);
            }
        }
    }
}
