/// Cave Story example: transpiles the notes in `story_data/cave` twice,
/// once as written and once with an in-memory note switched to asterisk
/// choices.
///
/// Run with: cargo run --example cave_story

use narrative_notes::core::assembler::{assemble, assemble_project};
use narrative_notes::core::body::{classify, LineKind};
use narrative_notes::core::project::StoryProject;
use narrative_notes::core::splitter::parse_markdown;
use narrative_notes::schema::options::{ChoiceSyntax, TranspileOptions};

const NOTES: &[&str] = &[
    "_globals.md",
    "Cave Mouth.md",
    "Flooded Hall.md",
    "Lantern.md",
    "Vault.md",
];

const SIDE_PATH: &str = "---
type: knot
id: side_path
---
A narrow crack in the wall.
* Squeeze through [[Vault]]
  -> [[Vault#Floor]]
+ Go back [[Cave Mouth]]
";

fn main() {
    // --- Load the cave notes ---
    let notes: Vec<_> = NOTES
        .iter()
        .map(|name| {
            let raw = std::fs::read_to_string(format!("story_data/cave/{name}"))
                .expect("Failed to read cave note");
            parse_markdown(&raw, name).expect("Failed to parse cave note")
        })
        .collect();

    let project = StoryProject::from_notes("cave", notes);
    println!(
        "Project '{}': start {:?}, knots {:?}\n",
        project.name,
        project.start_path(),
        project.knot_ids()
    );

    // --- Line classification of the first knot ---
    if let Some(first) = project.knots.first() {
        println!("=== Line kinds in {} ===", first.name);
        for line in &first.body_lines {
            let kind = classify(line.trim(), ChoiceSyntax::Blockquote);
            if kind != LineKind::Blank {
                println!("  {:<18} {}", format!("{kind:?}"), line.trim());
            }
        }
        println!();
    }

    // --- Whole story, blockquote choices ---
    let options = TranspileOptions {
        emit_start_divert: true,
        ..TranspileOptions::default()
    };
    let result = assemble_project(&project, &options);
    println!("=== Script ===\n{}", result.script_text);

    // --- A single asterisk-style knot ---
    let side = parse_markdown(SIDE_PATH, "Side Path.md").expect("Failed to parse side path");
    let asterisk = TranspileOptions::new(ChoiceSyntax::Asterisk);
    let side_result = assemble(None, &[side], &asterisk);
    println!("=== Asterisk knot ===\n{}", side_result.script_text);

    for warning in result.warnings.iter().chain(&side_result.warnings) {
        println!("WARNING: {warning}");
    }
}
