use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Which notation marks a choice line for a whole run. The two are
/// mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChoiceSyntax {
    /// `> - text` / `> + text`, nested choices inside the quote.
    #[default]
    Blockquote,
    /// `* text` / `+ text`, nested choices by indentation.
    Asterisk,
}

impl ChoiceSyntax {
    /// Parse a user-facing name (`blockquote` or `asterisk`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "blockquote" => Some(Self::Blockquote),
            "asterisk" => Some(Self::Asterisk),
            _ => None,
        }
    }
}

/// Options for one transpile run.
///
/// Loaded from RON, e.g. `(choice_syntax: Asterisk, emit_start_divert: true)`.
/// Missing fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranspileOptions {
    pub choice_syntax: ChoiceSyntax,
    /// Emit `-> <start>` after the declarations when the project names a
    /// start knot.
    pub emit_start_divert: bool,
}

impl TranspileOptions {
    pub fn new(choice_syntax: ChoiceSyntax) -> Self {
        Self {
            choice_syntax,
            ..Self::default()
        }
    }

    /// Load options from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<TranspileOptions, OptionsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse options from a RON string.
    pub fn parse_ron(input: &str) -> Result<TranspileOptions, OptionsError> {
        Ok(ron::from_str(input)?)
    }
}

/// Output of a transpile run, owned by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranspileResult {
    pub script_text: String,
    /// Ordered by discovery.
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_blockquote() {
        let options = TranspileOptions::default();
        assert_eq!(options.choice_syntax, ChoiceSyntax::Blockquote);
        assert!(!options.emit_start_divert);
    }

    #[test]
    fn parse_ron_full() {
        let options =
            TranspileOptions::parse_ron("(choice_syntax: Asterisk, emit_start_divert: true)").unwrap();
        assert_eq!(options.choice_syntax, ChoiceSyntax::Asterisk);
        assert!(options.emit_start_divert);
    }

    #[test]
    fn parse_ron_partial_uses_defaults() {
        let options = TranspileOptions::parse_ron("(emit_start_divert: true)").unwrap();
        assert_eq!(options.choice_syntax, ChoiceSyntax::Blockquote);
        assert!(options.emit_start_divert);
    }

    #[test]
    fn parse_ron_unknown_variant_error() {
        assert!(TranspileOptions::parse_ron("(choice_syntax: Dash)").is_err());
    }

    #[test]
    fn load_options_fixture() {
        let path = std::path::PathBuf::from("tests/fixtures/asterisk_options.ron");
        let options = TranspileOptions::load_from_ron(&path).unwrap();
        assert_eq!(options.choice_syntax, ChoiceSyntax::Asterisk);
    }

    #[test]
    fn choice_syntax_from_name() {
        assert_eq!(ChoiceSyntax::from_name("Asterisk"), Some(ChoiceSyntax::Asterisk));
        assert_eq!(ChoiceSyntax::from_name(" blockquote "), Some(ChoiceSyntax::Blockquote));
        assert_eq!(ChoiceSyntax::from_name("dash"), None);
    }
}
