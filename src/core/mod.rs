pub mod assembler;
pub mod body;
pub mod choice;
pub mod conditional;
pub mod inline;
pub mod normalize;
pub mod project;
pub mod sequence;
pub mod splitter;
pub mod translation;

/// Lines emitted by a block sub-parser and the body index to resume from.
///
/// `next` is always past `start`, so the dispatcher advances by at
/// least one line per block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockOutput {
    pub lines: Vec<String>,
    pub next: usize,
    pub warnings: Vec<String>,
}
