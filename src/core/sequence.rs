/// Sequence sub-parser: `sequence`/`cycle`/`shuffle`/`once` callouts.

use crate::core::translation::{schema, CALLOUT_PREFIX, QUOTE_PREFIX};
use crate::core::BlockOutput;

/// Parse a sequence callout starting at `start`.
///
/// Every immediately following quoted line that is not itself a callout
/// opener becomes one item. Returns `None` when `start` does not open a
/// sequence, so the caller can try its other rules.
pub fn parse_sequence_block<L: AsRef<str>>(lines: &[L], start: usize) -> Option<BlockOutput> {
    let s = schema();
    let opener = lines.get(start)?.as_ref().trim();
    let kind = s.sequences.opener(opener)?;

    let mut items = Vec::new();
    let mut i = start + 1;
    while let Some(line) = lines.get(i) {
        let trimmed = line.as_ref().trim();
        match trimmed.strip_prefix(QUOTE_PREFIX) {
            Some(item) if !trimmed.starts_with(CALLOUT_PREFIX) => items.push(item.trim().to_string()),
            _ => break,
        }
        i += 1;
    }

    let mut warnings = Vec::new();
    if items.is_empty() {
        warnings.push(format!(
            "line {}: {} callout has no items",
            start + 1,
            kind.callout_type()
        ));
    }

    Some(BlockOutput {
        lines: vec![s.sequences.sequence(kind, &items)],
        next: i,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_items() {
        let lines = ["> [!script-cycle]", "> a", "> b", "> c", "After"];
        let out = parse_sequence_block(&lines, 0).unwrap();
        assert_eq!(out.lines, vec!["{&a | b | c}"]);
        assert_eq!(out.next, 4);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn each_kind_has_its_sigil() {
        for (callout, expected) in [
            ("sequence", "{x | y}"),
            ("cycle", "{&x | y}"),
            ("shuffle", "{~x | y}"),
            ("once", "{!x | y}"),
        ] {
            let opener = format!("> [!script-{callout}]");
            let lines = [opener.as_str(), "> x", ">  y  "];
            let out = parse_sequence_block(&lines, 0).unwrap();
            assert_eq!(out.lines, vec![expected]);
        }
    }

    #[test]
    fn not_a_sequence() {
        let lines = ["> [!script-if] x", "> a"];
        assert!(parse_sequence_block(&lines, 0).is_none());
        assert!(parse_sequence_block(&lines, 5).is_none());
    }

    #[test]
    fn stops_at_next_callout() {
        let lines = ["> [!script-once]", "> first", "> [!script-cycle]", "> second"];
        let out = parse_sequence_block(&lines, 0).unwrap();
        assert_eq!(out.lines, vec!["{!first}"]);
        assert_eq!(out.next, 2);
    }

    #[test]
    fn stops_at_blank_line() {
        let lines = ["> [!script-shuffle]", "> a", "", "> b"];
        let out = parse_sequence_block(&lines, 0).unwrap();
        assert_eq!(out.lines, vec!["{~a}"]);
        assert_eq!(out.next, 2);
    }

    #[test]
    fn empty_sequence_warns() {
        let lines = ["Intro", "> [!script-sequence]", "Plain"];
        let out = parse_sequence_block(&lines, 1).unwrap();
        assert_eq!(out.lines, vec!["{}"]);
        assert_eq!(out.next, 2);
        assert_eq!(out.warnings, vec!["line 2: sequence callout has no items"]);
    }
}
