//! C# parsing via tree-sitter.
//!
//! tree-sitter is error-tolerant: a file with syntax errors still yields a
//! tree (with ERROR nodes), so linting degrades gracefully on broken code.

use std::path::Path;

use tree_sitter::{Language, Parser, Tree};

use crate::errors::{LintError, Result};

/// The C# grammar used for every parse in this crate.
pub fn language() -> Language {
    tree_sitter_c_sharp::LANGUAGE.into()
}

/// Parse a C# source file into a syntax tree.
pub fn parse(source: &str, path: &Path) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&language())
        .map_err(|e| LintError::internal(format!("failed to load C# grammar: {e}")))?;

    parser
        .parse(source, None)
        .ok_or_else(|| LintError::parse(path, "parser returned no tree"))
}
