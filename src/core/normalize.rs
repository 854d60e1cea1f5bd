/// Identifier normalizer: maps arbitrary text to a script identifier.

/// Diacritics folded to ASCII before non-identifier characters are
/// replaced. Anything not listed here becomes `_`.
const DIACRITICS: &[(char, char)] = &[
    ('ą', 'a'),
    ('ć', 'c'),
    ('ę', 'e'),
    ('ł', 'l'),
    ('ń', 'n'),
    ('ó', 'o'),
    ('ś', 's'),
    ('ź', 'z'),
    ('ż', 'z'),
    ('Ą', 'a'),
    ('Ć', 'c'),
    ('Ę', 'e'),
    ('Ł', 'l'),
    ('Ń', 'n'),
    ('Ó', 'o'),
    ('Ś', 's'),
    ('Ź', 'z'),
    ('Ż', 'z'),
];

fn fold_diacritic(ch: char) -> char {
    DIACRITICS
        .iter()
        .find(|(from, _)| *from == ch)
        .map_or(ch, |(_, to)| *to)
}

/// Normalize text into an identifier matching `^[a-z_][a-z0-9_]*$`
/// (or the empty string).
///
/// Lowercases, folds known diacritics, turns every other character
/// outside `[a-z0-9]` into a single `_` separator, trims separators from
/// both ends and prefixes `_` when the result starts with a digit.
/// Total and idempotent.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_separator = false;

    for ch in text.to_lowercase().chars().map(fold_diacritic) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            out.push(ch);
        } else {
            pending_separator = true;
        }
    }

    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_identifier(s: &str) -> bool {
        let mut chars = s.chars();
        match chars.next() {
            None => true,
            Some(first) => {
                (first.is_ascii_lowercase() || first == '_')
                    && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
            }
        }
    }

    #[test]
    fn lowercases_and_joins_words() {
        assert_eq!(normalize("Dark Cave"), "dark_cave");
        assert_eq!(normalize("Cave"), "cave");
    }

    #[test]
    fn collapses_and_trims_separators() {
        assert_eq!(normalize("  --Hello,   World!!  "), "hello_world");
        assert_eq!(normalize("a__b"), "a_b");
    }

    #[test]
    fn folds_polish_diacritics() {
        assert_eq!(normalize("Zażółć gęślą jaźń"), "zazolc_gesla_jazn");
        assert_eq!(normalize("ŁÓDŹ"), "lodz");
    }

    #[test]
    fn unmapped_diacritics_become_separators() {
        assert_eq!(normalize("café au lait"), "caf_au_lait");
    }

    #[test]
    fn leading_digit_gets_underscore() {
        assert_eq!(normalize("2nd Floor"), "_2nd_floor");
        assert_eq!(normalize("42"), "_42");
    }

    #[test]
    fn empty_and_symbol_only_inputs() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("!!! ???"), "");
    }

    #[test]
    fn idempotent_and_well_formed() {
        let samples = [
            "Dark Cave",
            "2nd Floor",
            "_already_ok",
            "Zażółć gęślą jaźń",
            "café",
            "--x--",
            "Ünïcödé ñame 9",
            "",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
            assert!(is_identifier(&once), "malformed identifier {once:?}");
        }
    }
}
