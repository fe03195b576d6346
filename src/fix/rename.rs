//! Workspace-wide identifier rename.
//!
//! Resolution is syntactic, in keeping with the rest of the crate: an
//! identifier references the renamed method when its text matches and it sits
//! in a reference position. Name slots of unrelated declarations never
//! qualify; other method declarations with the same name are overloads and
//! follow the `overloads` option.
//!
//! The rename is all-or-nothing: every file's new text is computed before a
//! new workspace is returned, and any error (or a cancellation request)
//! aborts the whole operation with the input workspace untouched.

use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;
use tree_sitter::{Node, Tree};

use crate::errors::{LintError, Result};
use crate::syntax::method::{name_node, text};
use crate::syntax::{apply_edits, parse, TextEdit};
use crate::workspace::Workspace;

#[derive(Debug, Clone, Copy)]
pub struct RenameOptions {
    /// Rename other method declarations sharing the name
    pub overloads: bool,
    /// Rewrite occurrences inside string literals
    pub strings: bool,
    /// Rewrite whole-word occurrences inside comments
    pub comments: bool,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            overloads: true,
            strings: false,
            comments: true,
        }
    }
}

/// Transient description of one rename; exists only for the duration of one
/// fix application.
#[derive(Debug)]
pub struct RenameRequest<'a> {
    pub old_name: &'a str,
    pub new_name: &'a str,
    /// File holding the (already re-resolved) declaration identifier
    pub declaration_file: &'a Path,
    /// Start byte of the declaration identifier within that file
    pub declaration_offset: usize,
    pub options: RenameOptions,
}

/// Rename the declaration and every reference across the workspace,
/// returning the edited workspace.
pub fn rename_symbol(
    workspace: &Workspace,
    request: &RenameRequest<'_>,
    cancel: &CancellationToken,
) -> Result<Workspace> {
    let mut staged: Vec<(PathBuf, String)> = Vec::new();

    for (path, source) in workspace.files() {
        if cancel.is_cancelled() {
            return Err(LintError::Cancelled);
        }
        let tree = parse(source, path)?;
        let edits = collect_rename_edits(&tree, source, path, request);
        if !edits.is_empty() {
            staged.push((path.clone(), apply_edits(source, &edits)?));
        }
    }

    if cancel.is_cancelled() {
        return Err(LintError::Cancelled);
    }

    let mut renamed = workspace.clone();
    for (path, new_text) in staged {
        renamed = renamed.with_file(&path, new_text);
    }
    Ok(renamed)
}

fn collect_rename_edits(
    tree: &Tree,
    source: &str,
    path: &Path,
    request: &RenameRequest<'_>,
) -> Vec<TextEdit> {
    let mut edits = Vec::new();
    let mut stack = vec![tree.root_node()];

    while let Some(node) = stack.pop() {
        match node.kind() {
            "identifier" => {
                if text(node, source) == request.old_name
                    && is_rename_target(node, path, request)
                {
                    edits.push(TextEdit::replace(
                        node.start_byte(),
                        node.end_byte(),
                        request.new_name,
                    ));
                }
            }
            "comment" => {
                if request.options.comments {
                    push_word_edits(node, source, request, &mut edits);
                }
            }
            "string_literal" | "verbatim_string_literal" | "raw_string_literal" => {
                if request.options.strings {
                    push_word_edits(node, source, request, &mut edits);
                }
                // Literal internals are opaque; no descent.
                continue;
            }
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            stack.push(child);
        }
    }

    edits
}

/// Name slots of declarations that are never references to a method symbol.
const NON_REFERENCE_PARENTS: &[&str] = &[
    "class_declaration",
    "struct_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
    "delegate_declaration",
    "namespace_declaration",
    "file_scoped_namespace_declaration",
    "constructor_declaration",
    "destructor_declaration",
    "local_function_statement",
    "variable_declarator",
    "parameter",
    "property_declaration",
    "event_declaration",
    "enum_member_declaration",
    "type_parameter",
    "using_directive",
];

fn is_rename_target(node: Node<'_>, path: &Path, request: &RenameRequest<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };

    if parent.kind() == "method_declaration" {
        let is_name_slot = name_node(parent).is_some_and(|n| n.id() == node.id());
        if !is_name_slot {
            // Return type spelled with the method's name; a type reference,
            // not a reference to the method symbol.
            return false;
        }
        let is_primary = path == request.declaration_file
            && node.start_byte() == request.declaration_offset;
        return is_primary || request.options.overloads;
    }

    !NON_REFERENCE_PARENTS.contains(&parent.kind())
}

fn push_word_edits(
    node: Node<'_>,
    source: &str,
    request: &RenameRequest<'_>,
    edits: &mut Vec<TextEdit>,
) {
    let haystack = text(node, source);
    let base = node.start_byte();
    for offset in word_occurrences(haystack, request.old_name) {
        edits.push(TextEdit::replace(
            base + offset,
            base + offset + request.old_name.len(),
            request.new_name,
        ));
    }
}

/// Byte offsets of whole-word occurrences of `needle` in `haystack`.
fn word_occurrences(haystack: &str, needle: &str) -> Vec<usize> {
    let mut out = Vec::new();
    if needle.is_empty() {
        return out;
    }
    let mut search_from = 0;
    while let Some(found) = haystack[search_from..].find(needle) {
        let at = search_from + found;
        let end = at + needle.len();
        let before_ok = !haystack[..at].chars().next_back().is_some_and(is_word_char);
        let after_ok = !haystack[end..].chars().next().is_some_and(is_word_char);
        if before_ok && after_ok {
            out.push(at);
        }
        search_from = end;
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
