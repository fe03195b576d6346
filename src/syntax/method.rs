//! Structural navigation over C# method declarations.
//!
//! Navigation is positional (by child node kind and ordering) rather than by
//! grammar field names, so it keeps working across grammar revisions. Within
//! a `method_declaration` the named children run:
//! attribute lists, modifiers, return type, identifier, optional type
//! parameters, parameter list, body.

use std::collections::HashSet;

use tree_sitter::{Node, Tree};

/// The literal suffix this crate's rules are about. ASCII, so byte math on
/// identifier spans is safe.
pub const ASYNC_SUFFIX: &str = "Async";

/// Slice the source text covered by a node.
pub fn text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// Every method declaration in the tree, in source order.
pub fn collect_methods(tree: &Tree) -> Vec<Node<'_>> {
    let mut methods = Vec::new();
    let mut stack = vec![tree.root_node()];
    while let Some(node) = stack.pop() {
        if node.kind() == "method_declaration" {
            methods.push(node);
        }
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            stack.push(child);
        }
    }
    methods.sort_by_key(|n| n.start_byte());
    methods
}

/// The identifier token of a method declaration: the last identifier child
/// before the parameter list.
pub fn name_node(method: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = method.walk();
    let children: Vec<Node> = method.named_children(&mut cursor).collect();
    let params = children.iter().position(|c| c.kind() == "parameter_list")?;
    children[..params]
        .iter()
        .rev()
        .find(|c| c.kind() == "identifier")
        .copied()
}

/// The return-type node: the named child immediately preceding the method
/// name, unless that slot is still an attribute list or modifier.
pub fn return_type_node(method: Node<'_>) -> Option<Node<'_>> {
    let name = name_node(method)?;
    let mut cursor = method.walk();
    let children: Vec<Node> = method.named_children(&mut cursor).collect();
    let idx = children.iter().position(|c| c.id() == name.id())?;
    let candidate = *children.get(idx.checked_sub(1)?)?;
    if matches!(candidate.kind(), "attribute_list" | "modifier") {
        None
    } else {
        Some(candidate)
    }
}

/// All `modifier` children of a method declaration.
pub fn modifier_nodes(method: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = method.walk();
    method
        .named_children(&mut cursor)
        .filter(|c| c.kind() == "modifier")
        .collect()
}

pub fn has_modifier(method: Node<'_>, source: &str, keyword: &str) -> bool {
    modifier_nodes(method)
        .iter()
        .any(|m| text(*m, source) == keyword)
}

/// Resolve a type or attribute name to its simple name: the rightmost
/// segment of a qualified name, the base identifier of a generic name.
pub fn simple_type_name<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    match node.kind() {
        "qualified_name" | "alias_qualified_name" => {
            let mut cursor = node.walk();
            match node.named_children(&mut cursor).last() {
                Some(last) => simple_type_name(last, source),
                None => text(node, source),
            }
        }
        "generic_name" => {
            let mut cursor = node.walk();
            let identifier = node
                .named_children(&mut cursor)
                .find(|c| c.kind() == "identifier");
            identifier.map_or_else(|| text(node, source), |n| text(n, source))
        }
        _ => text(node, source),
    }
}

/// Simple names of every attribute on the method, qualification stripped:
/// `[Framework.Test]` and `[Test]` both contribute "Test".
pub fn attribute_simple_names(method: Node<'_>, source: &str) -> HashSet<String> {
    let mut names = HashSet::new();
    let mut cursor = method.walk();
    for list in method
        .named_children(&mut cursor)
        .filter(|c| c.kind() == "attribute_list")
    {
        let mut attrs = list.walk();
        for attr in list
            .named_children(&mut attrs)
            .filter(|c| c.kind() == "attribute")
        {
            let mut inner = attr.walk();
            let first = attr.named_children(&mut inner).next();
            if let Some(name) = first {
                names.insert(simple_type_name(name, source).to_string());
            }
        }
    }
    names
}

/// First await expression belonging to the method's own body. Awaits inside
/// nested lambdas, anonymous methods, and local functions are suspension
/// points of those callables, not of this method.
pub fn first_await(method: Node<'_>) -> Option<Node<'_>> {
    let mut earliest: Option<Node> = None;
    let mut stack = vec![method];
    while let Some(node) = stack.pop() {
        if node.id() != method.id() {
            match node.kind() {
                "lambda_expression" | "anonymous_method_expression" | "local_function_statement" => {
                    continue
                }
                "await_expression" => {
                    if earliest.map_or(true, |e| node.start_byte() < e.start_byte()) {
                        earliest = Some(node);
                    }
                }
                _ => {}
            }
        }
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            stack.push(child);
        }
    }
    earliest
}

/// Ascend from a byte offset to the method declaration containing it.
pub fn enclosing_method(tree: &Tree, offset: usize) -> Option<Node<'_>> {
    let root = tree.root_node();
    if offset > root.end_byte() {
        return None;
    }
    let mut node = root.named_descendant_for_byte_range(offset, offset)?;
    loop {
        if node.kind() == "method_declaration" {
            return Some(node);
        }
        node = node.parent()?;
    }
}

/// Ordinal, case-insensitive suffix test. The method name "Async" itself
/// counts; the planner rejects it later when stripping would leave nothing.
pub fn ends_with_async_suffix(name: &str) -> bool {
    name.len() >= ASYNC_SUFFIX.len()
        && name.is_char_boundary(name.len() - ASYNC_SUFFIX.len())
        && name[name.len() - ASYNC_SUFFIX.len()..].eq_ignore_ascii_case(ASYNC_SUFFIX)
}

pub fn strip_async_suffix(name: &str) -> &str {
    if ends_with_async_suffix(name) {
        &name[..name.len() - ASYNC_SUFFIX.len()]
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::parse;
    use std::path::Path;

    fn parse_single_method(source: &str) -> (tree_sitter::Tree, String) {
        let tree = parse(source, Path::new("test.cs")).unwrap();
        (tree, source.to_string())
    }

    #[test]
    fn test_name_and_return_type() {
        let source = "class C { public async Task DoWorkAsync() { } }";
        let (tree, source) = parse_single_method(source);
        let methods = collect_methods(&tree);
        assert_eq!(methods.len(), 1);
        let method = methods[0];
        assert_eq!(text(name_node(method).unwrap(), &source), "DoWorkAsync");
        let rt = return_type_node(method).unwrap();
        assert_eq!(simple_type_name(rt, &source), "Task");
    }

    #[test]
    fn test_generic_return_type_simple_name() {
        let source = "class C { Task<int> GetAsync() { return null; } }";
        let (tree, source) = parse_single_method(source);
        let method = collect_methods(&tree)[0];
        let rt = return_type_node(method).unwrap();
        assert_eq!(simple_type_name(rt, &source), "Task");
    }

    #[test]
    fn test_qualified_return_type_simple_name() {
        let source = "class C { System.Threading.Tasks.Task RunAsync() { return null; } }";
        let (tree, source) = parse_single_method(source);
        let method = collect_methods(&tree)[0];
        let rt = return_type_node(method).unwrap();
        assert_eq!(simple_type_name(rt, &source), "Task");
    }

    #[test]
    fn test_generic_method_name_skips_type_parameters() {
        let source = "class C { Task Run<T>(T value) { return null; } }";
        let (tree, source) = parse_single_method(source);
        let method = collect_methods(&tree)[0];
        assert_eq!(text(name_node(method).unwrap(), &source), "Run");
    }

    #[test]
    fn test_modifiers() {
        let source = "class C { public static void Main() { } }";
        let (tree, source) = parse_single_method(source);
        let method = collect_methods(&tree)[0];
        assert!(has_modifier(method, &source, "static"));
        assert!(has_modifier(method, &source, "public"));
        assert!(!has_modifier(method, &source, "async"));
    }

    #[test]
    fn test_attribute_names_bare_and_qualified() {
        let source = "class C { [TestMethod] [Xunit.Fact] void M() { } }";
        let (tree, source) = parse_single_method(source);
        let method = collect_methods(&tree)[0];
        let names = attribute_simple_names(method, &source);
        assert!(names.contains("TestMethod"));
        assert!(names.contains("Fact"));
    }

    #[test]
    fn test_first_await_ignores_lambda_bodies() {
        let source = r#"
class C {
    void M() {
        Action a = async () => { await Task.CompletedTask; };
        a();
    }
}
"#;
        let (tree, _) = parse_single_method(source);
        let method = collect_methods(&tree)[0];
        assert!(first_await(method).is_none());
    }

    #[test]
    fn test_first_await_found_in_body() {
        let source = "class C { void M() { await Task.CompletedTask; } }";
        let (tree, source) = parse_single_method(source);
        let method = collect_methods(&tree)[0];
        let await_node = first_await(method).unwrap();
        assert!(text(await_node, &source).starts_with("await"));
    }

    #[test]
    fn test_enclosing_method_from_identifier_offset() {
        let source = "class C { void Inner() { } }";
        let (tree, source) = parse_single_method(source);
        let offset = source.find("Inner").unwrap() + 1;
        let method = enclosing_method(&tree, offset).unwrap();
        assert_eq!(text(name_node(method).unwrap(), &source), "Inner");
    }

    #[test]
    fn test_enclosing_method_outside_any_method() {
        let source = "using System;\nclass C { }";
        let (tree, _) = parse_single_method(source);
        assert!(enclosing_method(&tree, 2).is_none());
    }

    #[test]
    fn test_suffix_matching() {
        assert!(ends_with_async_suffix("DoWorkAsync"));
        assert!(ends_with_async_suffix("DoWorkASYNC"));
        assert!(ends_with_async_suffix("Async"));
        assert!(!ends_with_async_suffix("DoWork"));
        assert!(!ends_with_async_suffix("Sync"));
        assert_eq!(strip_async_suffix("DoWorkAsync"), "DoWork");
        assert_eq!(strip_async_suffix("DoWork"), "DoWork");
    }
}
