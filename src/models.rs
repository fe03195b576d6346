use std::collections::HashSet;

use tree_sitter::Node;

use crate::config::TestAttributeCatalog;
use crate::syntax::method;

#[derive(Debug, Clone)]
pub struct Violation {
    pub rule_id: String,
    pub message: String,
    pub file_path: String,
    /// Byte span of the finding; for ASL001 this is exactly the "Async"
    /// suffix substring of the identifier.
    pub offset: usize,
    pub end: usize,
    pub method_name: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Context passed to each rule for checking one method declaration
pub struct RuleContext<'a> {
    pub method: Node<'a>,
    pub file_path: &'a str,
    pub source: &'a str,
    pub attributes: &'a TestAttributeCatalog,
}

/// Immutable snapshot of the structural facts of one method declaration.
/// Derived once per analyzed declaration, never mutated.
#[derive(Debug, Clone)]
pub struct MethodShape {
    pub name: String,
    /// Simple name of the return type ("Task", "void", ...), qualification
    /// and generic arguments stripped.
    pub return_type_name: String,
    pub has_async_modifier: bool,
    pub is_static: bool,
    pub attribute_names: HashSet<String>,
    pub contains_await: bool,
}

impl MethodShape {
    /// Returns None when the node is not a method declaration or is missing
    /// its identifier.
    pub fn from_node(node: Node<'_>, source: &str) -> Option<MethodShape> {
        if node.kind() != "method_declaration" {
            return None;
        }
        let name = method::text(method::name_node(node)?, source).to_string();
        let return_type_name = method::return_type_node(node)
            .map(|t| method::simple_type_name(t, source).to_string())
            .unwrap_or_default();

        Some(MethodShape {
            name,
            return_type_name,
            has_async_modifier: method::has_modifier(node, source, "async"),
            is_static: method::has_modifier(node, source, "static"),
            attribute_names: method::attribute_simple_names(node, source),
            contains_await: method::first_await(node).is_some(),
        })
    }

    /// A method is a test method iff its attribute set intersects the
    /// recognized catalog.
    pub fn is_test_method(&self, catalog: &TestAttributeCatalog) -> bool {
        catalog.recognizes_any(&self.attribute_names)
    }
}
