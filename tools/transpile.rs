/// Transpile: converts a folder of Markdown story notes into one script.
///
/// Usage: transpile <notes_dir> [--project <name>] [--options <file.ron>]
///                  [--asterisk] [--output <file>]

use flexi_logger::{Logger, LoggerHandle};
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
        print_usage();
        process::exit(0);
    }

    let _logger = init_logging();

    let notes_dir = PathBuf::from(&args[1]);
    let mut project_name = String::new();
    let mut options_path = None;
    let mut asterisk = false;
    let mut output_path = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--project" if i + 1 < args.len() => {
                i += 1;
                project_name = args[i].clone();
            }
            "--options" if i + 1 < args.len() => {
                i += 1;
                options_path = Some(PathBuf::from(&args[i]));
            }
            "--output" if i + 1 < args.len() => {
                i += 1;
                output_path = Some(PathBuf::from(&args[i]));
            }
            "--asterisk" => asterisk = true,
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let mut options = match options_path {
        Some(ref path) => match TranspileOptions::load_from_ron(path) {
            Ok(options) => options,
            Err(e) => {
                eprintln!("ERROR: Failed to load options from {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => TranspileOptions::default(),
    };
    if asterisk {
        options.choice_syntax = ChoiceSyntax::Asterisk;
    }

    if !notes_dir.is_dir() {
        eprintln!("ERROR: Path '{}' is not a directory", notes_dir.display());
        process::exit(1);
    }
    let notes = load_notes(&notes_dir);
    let project = StoryProject::from_notes(&project_name, notes);
    log::info!(
        "{} knots, {} object notes, globals: {}",
        project.knots.len(),
        project.objects.len(),
        project.globals.as_ref().map_or("none", |g| g.name.as_str())
    );

    let result = assemble_project(&project, &options);

    match output_path {
        Some(ref path) => {
            if let Err(e) = std::fs::write(path, &result.script_text) {
                eprintln!("ERROR: Failed to write {}: {}", path.display(), e);
                process::exit(1);
            }
            log::info!("wrote {}", path.display());
        }
        None => println!("{}", result.script_text),
    }

    for warning in &result.warnings {
        eprintln!("WARNING: {}", warning);
    }
}

fn print_usage() {
    println!("Usage: transpile <notes_dir> [--project <name>] [--options <file.ron>]");
    println!("                 [--asterisk] [--output <file>]");
}

fn init_logging() -> Option<LoggerHandle> {
    match Logger::try_with_env_or_str("info").and_then(|logger| logger.start()) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("WARNING: logging disabled: {}", e);
            None
        }
    }
}

/// Every `.md` file under `dir`, in path order.
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

fn load_notes(dir: &Path) -> Vec<ParsedNote> {
    let mut paths = Vec::new();
    collect_markdown(dir, &mut paths);
    paths.sort();

    let mut notes = Vec::new();
    for path in paths {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                eprintln!("  ERROR reading {}: {}", path.display(), e);
                continue;
            }
        };
        match parse_markdown(&raw, &filename) {
            Ok(note) => {
                log::debug!("loaded {}", path.display());
                notes.push(note);
            }
            Err(e) => eprintln!("  ERROR loading {}: {}", path.display(), e),
        }
    }
    notes
}
