use std::path::Path;

use asyncsuffix_linter::analyze_source;
use asyncsuffix_linter::config::TestAttributeCatalog;
use asyncsuffix_linter::models::{Severity, Violation};
use asyncsuffix_linter::rules::get_all_rules;

fn lint(code: &str) -> Vec<Violation> {
    let rules = get_all_rules();
    let catalog = TestAttributeCatalog::with_defaults();
    analyze_source(Path::new("Tests.cs"), code, &rules, &catalog).unwrap()
}

fn lint_rule(code: &str, rule_id: &str) -> Vec<Violation> {
    lint(code)
        .into_iter()
        .filter(|v| v.rule_id == rule_id)
        .collect()
}

#[test]
fn test_awaiting_sync_test_method_is_flagged() {
    let code = r#"
using System;
using System.Threading.Tasks;

class Program
{
    [Fact]
    void TestMethod1()
    {
        await Task.CompletedTask;
    }
}
"#;

    let violations = lint_rule(code, "ASL002");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].method_name, "TestMethod1");
    assert_eq!(violations[0].severity, Severity::Error);
}

#[test]
fn test_violation_located_at_the_await() {
    let code = "class C { [Fact] void Run() { await Task.CompletedTask; } }";

    let violations = lint_rule(code, "ASL002");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].offset, code.find("await").unwrap());
}

#[test]
fn test_no_await_means_no_diagnostic() {
    // Scenario: non-async, no await - nothing to convert
    let code = r#"
class Program
{
    [TestMethod]
    void TestMethod1Async()
    {
    }
}
"#;

    assert!(lint_rule(code, "ASL002").is_empty());
}

#[test]
fn test_async_method_not_flagged() {
    let code = r#"
class Program
{
    [Fact]
    async Task TestMethod1()
    {
        await Task.CompletedTask;
    }
}
"#;

    assert!(lint_rule(code, "ASL002").is_empty());
}

#[test]
fn test_non_test_method_not_flagged() {
    let code = r#"
class Program
{
    void Helper()
    {
        await Task.CompletedTask;
    }
}
"#;

    assert!(lint(code).is_empty());
}

#[test]
fn test_static_method_excluded() {
    let code = r#"
class Program
{
    [Fact]
    static void TestMethod1()
    {
        await Task.CompletedTask;
    }
}
"#;

    assert!(lint_rule(code, "ASL002").is_empty());
}

#[test]
fn test_await_inside_lambda_does_not_count() {
    let code = r#"
class Program
{
    [Fact]
    void TestMethod1()
    {
        Func<Task> work = async () => { await Task.CompletedTask; };
        work();
    }
}
"#;

    assert!(lint_rule(code, "ASL002").is_empty());
}

#[test]
fn test_await_inside_local_function_does_not_count() {
    let code = r#"
class Program
{
    [Fact]
    void TestMethod1()
    {
        async Task Inner()
        {
            await Task.CompletedTask;
        }
        Inner();
    }
}
"#;

    assert!(lint_rule(code, "ASL002").is_empty());
}

#[test]
fn test_qualified_attribute_matches() {
    let code = r#"
class Program
{
    [Xunit.Fact]
    void TestMethod1()
    {
        await Task.CompletedTask;
    }
}
"#;

    assert_eq!(lint_rule(code, "ASL002").len(), 1);
}

#[test]
fn test_theory_attribute_recognized() {
    let code = r#"
class Program
{
    [Theory]
    void TestMethod1(int value)
    {
        await Task.Delay(value);
    }
}
"#;

    assert_eq!(lint_rule(code, "ASL002").len(), 1);
}
