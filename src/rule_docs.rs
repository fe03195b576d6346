//! Embedded rule documentation served by `--show-rule-doc`

use std::collections::HashMap;

pub fn get_rule_docs() -> HashMap<&'static str, &'static str> {
    let mut docs = HashMap::new();

    docs.insert(
        "ASL001",
        r#"ASL001: Test methods returning Task should not have an 'Async' suffix
=======================================================================

The 'Async' suffix signals "await me" at call sites. Test methods are invoked
by the test framework, never awaited by user code, so the suffix is noise in
test names and clutters test-run reports.

Bad:

    [TestMethod]
    Task TestMethod1Async()
    {
        return Task.CompletedTask;
    }

Good:

    [TestMethod]
    Task TestMethod1()
    {
        return Task.CompletedTask;
    }

Details:
- Matches methods whose return type resolves by simple name to Task
  (qualified spellings like System.Threading.Tasks.Task count, as do
  generic ones like Task<int>).
- The method must carry a recognized test attribute (TestMethod, Test,
  Fact, Theory by default; configurable via `test_attributes` /
  `extra_test_attributes` in asyncsuffix.toml).
- static methods are exempt.
- The auto-fix renames the method and every reference to it across the
  workspace. Occurrences in comments are renamed too; string literals are
  left alone (both configurable under [rename]).
"#,
    );

    docs.insert(
        "ASL002",
        r#"ASL002: Test methods that await must be declared async
======================================================

A method body containing 'await' does not compile without the async
modifier. For test methods the fix is mechanical, so this rule reports it
and offers the full rewrite.

Bad:

    [Fact]
    void TestMethod1()
    {
        await Task.CompletedTask;
    }

Good:

    [Fact]
    async Task TestMethod1()
    {
        await Task.CompletedTask;
    }

Details:
- Awaits inside nested lambdas, anonymous methods, and local functions
  belong to those callables and do not trigger the rule.
- The auto-fix inserts `async` after any existing modifiers, rewrites the
  return type to Task (generic arguments are preserved: Foo<int> becomes
  Task<int>), and strips an 'Async' suffix from the name if one is
  present, renaming all references.
- static methods are exempt.
"#,
    );

    docs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docs_cover_all_rules() {
        let docs = get_rule_docs();
        for rule_id in crate::rules::get_all_rule_ids() {
            assert!(docs.contains_key(rule_id.as_str()), "missing docs for {rule_id}");
        }
    }
}
