/// Body and note-level transpile tests against Markdown fixtures.

use narrative_notes::core::assembler::assemble;
use narrative_notes::core::body::transpile_body;
use narrative_notes::core::normalize::normalize;
use narrative_notes::core::splitter::parse_markdown;
use narrative_notes::schema::options::TranspileOptions;
use std::path::Path;

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(Path::new("tests/fixtures").join(name)).unwrap()
}

#[test]
fn asterisk_note_with_ron_options() {
    let options =
        TranspileOptions::load_from_ron(Path::new("tests/fixtures/asterisk_options.ron")).unwrap();
    let note = parse_markdown(&load_fixture("asterisk_note.md"), "asterisk_note.md").unwrap();
    let result = assemble(None, &[note], &options);

    let lines: Vec<&str> = result.script_text.split('\n').collect();
    assert_eq!(
        lines,
        vec![
            "=== crossroads",
            "# crossroads",
            "Three paths meet here.",
            "* [Take the left path] -> forest",
            "  The trees close in behind you.",
            "** [Run] -> forest.clearing",
            "** (has_torch) [Light the torch]",
            "+ [Rest a while]",
            "  -> camp",
            "* ->",
            "",
            "= camp",
            "You sleep. ~ rested = true",
            "-> END",
            "",
        ]
    );
    assert!(result.warnings.is_empty());
}

#[test]
fn same_note_in_blockquote_mode_is_plain_text() {
    let note = parse_markdown(&load_fixture("asterisk_note.md"), "asterisk_note.md").unwrap();
    let out = transpile_body(&note.body_lines, &TranspileOptions::default());
    assert!(out.lines.contains(&"* Take the left path [[Forest]]".to_string()));
    assert!(!out.lines.iter().any(|line| line.starts_with("** ")));
}

#[test]
fn unrecognized_lines_pass_through() {
    let lines = [
        "Plain prose with **bold** and [a link](https://example.com).",
        "- a markdown bullet",
        "> an ordinary quote",
        "--",
        "------",
        "`code` that is not script",
    ];
    let out = transpile_body(&lines, &TranspileOptions::default());
    assert_eq!(out.lines, lines.to_vec());
    assert!(out.warnings.is_empty());
}

#[test]
fn every_line_is_consumed_once() {
    let lines = [
        "> [!script-if] a",
        "> [!script-if] b",
        "> [!script-cycle]",
        "> - x",
        "> - y",
        "> [!script-else]",
    ];
    let out = transpile_body(&lines, &TranspileOptions::default());
    assert_eq!(
        out.lines,
        vec!["{a:", "}", "{b:", "}", "{&- x | - y}", "> [!script-else]"]
    );
}

#[test]
fn normalize_properties() {
    for input in ["Dark Cave", "Żółta Łąka", "  --42 Things--  ", "ÄÖÜ", "", "___"] {
        let once = normalize(input);
        assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
        assert!(
            once.is_empty()
                || (once.starts_with(|c: char| c.is_ascii_lowercase() || c == '_')
                    && once
                        .chars()
                        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')),
            "unexpected identifier {once:?}"
        );
    }
    assert_eq!(normalize("Żółta Łąka"), "zolta_laka");
}
