//! Syntax layer: tree-sitter C# parsing, method-shape navigation, and
//! span-based text edits.

pub mod edit;
pub mod method;
pub mod parser;

pub use edit::{apply_edits, TextEdit};
pub use parser::parse;
