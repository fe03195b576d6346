//! Tree edit planning for the two fix directions.
//!
//! A plan is a set of span-local text edits on the declaring file plus the
//! rename the edit implies. Nothing outside the edited spans is touched, so
//! comments and blank lines above the method survive byte for byte.

use std::path::Path;

use tree_sitter::{Node, Tree};

use crate::errors::{LintError, Result};
use crate::rules::asl001_async_suffix_on_task_test::ASYNC_MARKER_TYPE;
use crate::syntax::method;
use crate::syntax::TextEdit;

/// One fix invocation's worth of edits. Consumed once, then discarded.
#[derive(Debug, Clone)]
pub struct EditPlan {
    /// Structural edits on the declaring file; empty for rename-only fixes.
    pub edits: Vec<TextEdit>,
    pub old_name: String,
    /// Equal to `old_name` when no rename is requested.
    pub new_name: String,
    /// Start byte of the method declaration, used to re-resolve the symbol
    /// after the structural edits land.
    pub method_start: usize,
}

impl EditPlan {
    pub fn requests_rename(&self) -> bool {
        self.new_name != self.old_name
    }
}

/// Plan the rename-only fix for a Task-returning test method carrying the
/// suffix. The declaration itself is structurally fine; only the name (and
/// every reference to it) changes.
pub fn plan_strip_suffix(tree: &Tree, source: &str, path: &Path, offset: usize) -> Result<EditPlan> {
    let (method, name) = locate_method(tree, path, offset)?;
    let old_name = method::text(name, source).to_string();
    let new_name = stripped_name(&old_name)?;

    Ok(EditPlan {
        edits: Vec::new(),
        old_name,
        new_name,
        method_start: method.start_byte(),
    })
}

/// Plan the conversion of a synchronous awaiting method to asynchronous
/// form: insert the `async` modifier after any existing modifiers, rewrite
/// the return type to the Task form, and strip the suffix if one is present.
pub fn plan_make_async(tree: &Tree, source: &str, path: &Path, offset: usize) -> Result<EditPlan> {
    let (method_node, name) = locate_method(tree, path, offset)?;
    let return_type = method::return_type_node(method_node).ok_or(LintError::StructuralMismatch {
        path: path.to_path_buf(),
        offset,
    })?;

    let old_name = method::text(name, source).to_string();
    let new_name = if method::ends_with_async_suffix(&old_name) {
        stripped_name(&old_name)?
    } else {
        old_name.clone()
    };

    let mut edits = Vec::new();
    let new_type = rewritten_return_type(return_type, source);
    if method::has_modifier(method_node, source, "async") {
        // Defensive: the rule never fires on async methods, but a stale
        // violation must not double-insert the modifier.
        edits.push(TextEdit::replace(
            return_type.start_byte(),
            return_type.end_byte(),
            new_type,
        ));
    } else {
        edits.push(TextEdit::replace(
            return_type.start_byte(),
            return_type.end_byte(),
            format!("async {new_type}"),
        ));
    }

    Ok(EditPlan {
        edits,
        old_name,
        new_name,
        method_start: method_node.start_byte(),
    })
}

/// Ascend from the reported offset to the enclosing method declaration and
/// its identifier. Anything else is a structural mismatch, never a silent
/// no-op.
fn locate_method<'t>(tree: &'t Tree, path: &Path, offset: usize) -> Result<(Node<'t>, Node<'t>)> {
    let mismatch = || LintError::StructuralMismatch {
        path: path.to_path_buf(),
        offset,
    };
    let method_node = method::enclosing_method(tree, offset).ok_or_else(mismatch)?;
    let name = method::name_node(method_node).ok_or_else(mismatch)?;
    Ok((method_node, name))
}

/// The rewritten return type: generic type arguments are preserved
/// (`Foo<int>` becomes `Task<int>`), everything else becomes plain `Task`.
fn rewritten_return_type(return_type: Node<'_>, source: &str) -> String {
    match return_type.kind() {
        "generic_name" => {
            let mut cursor = return_type.walk();
            let type_args = return_type
                .named_children(&mut cursor)
                .find(|c| c.kind() == "type_argument_list");
            match type_args {
                Some(args) => format!("{ASYNC_MARKER_TYPE}{}", method::text(args, source)),
                None => ASYNC_MARKER_TYPE.to_string(),
            }
        }
        "qualified_name" | "alias_qualified_name" => {
            let mut cursor = return_type.walk();
            match return_type.named_children(&mut cursor).last() {
                Some(last) => rewritten_return_type(last, source),
                None => ASYNC_MARKER_TYPE.to_string(),
            }
        }
        _ => ASYNC_MARKER_TYPE.to_string(),
    }
}

/// Strip the suffix and insist the remainder is a usable method name.
fn stripped_name(original: &str) -> Result<String> {
    let stripped = method::strip_async_suffix(original);
    if stripped.len() == original.len() {
        return Ok(original.to_string());
    }
    if !is_valid_identifier(stripped) {
        return Err(LintError::InvalidIdentifierAfterStrip {
            original: original.to_string(),
            stripped: stripped.to_string(),
        });
    }
    Ok(stripped.to_string())
}

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_') {
        return false;
    }
    if !chars.all(|c| c.is_alphanumeric() || c == '_') {
        return false;
    }
    !CSHARP_KEYWORDS.contains(&name)
}

/// Reserved C# keywords; a stripped name colliding with one of these would
/// not compile without an escape, so the fix refuses instead.
const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked", "class",
    "const", "continue", "decimal", "default", "delegate", "do", "double", "else", "enum", "event",
    "explicit", "extern", "false", "finally", "fixed", "float", "for", "foreach", "goto", "if",
    "implicit", "in", "int", "interface", "internal", "is", "lock", "long", "namespace", "new",
    "null", "object", "operator", "out", "override", "params", "private", "protected", "public",
    "readonly", "ref", "return", "sbyte", "sealed", "short", "sizeof", "stackalloc", "static",
    "string", "struct", "switch", "this", "throw", "true", "try", "typeof", "uint", "ulong",
    "unchecked", "unsafe", "ushort", "using", "virtual", "void", "volatile", "while",
];
