//! ASL002: Test methods that await must be declared async
//!
//! Mirrors the compiler's await-in-non-async-method error for test methods,
//! so the auto-fix (add the async modifier, rewrite the return type, drop any
//! 'Async' suffix) can run without a host compiler feeding diagnostics.

use crate::models::{MethodShape, RuleContext, Severity, Violation};
use crate::rules::base::LintRule;
use crate::syntax::method;

pub const RULE_ID: &str = "ASL002";

pub struct AwaitInSyncTestRule;

impl AwaitInSyncTestRule {
    pub fn new() -> Self {
        Self
    }
}

impl LintRule for AwaitInSyncTestRule {
    fn rule_id(&self) -> &str {
        RULE_ID
    }

    fn description(&self) -> &str {
        "Test methods that await must be declared async"
    }

    fn check(&self, context: &RuleContext) -> Vec<Violation> {
        let mut violations = Vec::new();

        let Some(shape) = MethodShape::from_node(context.method, context.source) else {
            return violations;
        };

        // contains_await already ignores nested lambdas and local
        // functions; their awaits are not this method's suspension points.
        if shape.has_async_modifier
            || shape.is_static
            || !shape.contains_await
            || !shape.is_test_method(context.attributes)
        {
            return violations;
        }

        let Some(await_node) = method::first_await(context.method) else {
            return violations;
        };

        violations.push(Violation {
            rule_id: RULE_ID.to_string(),
            message: format!(
                "Test method '{}' awaits but is not declared async",
                shape.name
            ),
            file_path: context.file_path.to_string(),
            offset: await_node.start_byte(),
            end: await_node.end_byte(),
            method_name: shape.name,
            severity: Severity::Error,
        });

        violations
    }
}
