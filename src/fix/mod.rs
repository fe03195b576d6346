//! Fix orchestration: plan the structural edit, apply it, re-resolve the
//! method symbol in the edited tree, then hand off to the rename
//! coordinator. Failures abort the single fix with the workspace untouched;
//! the batch fixer skips the offender and moves on.

pub mod planner;
pub mod rename;

use std::collections::HashSet;
use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub use planner::{plan_make_async, plan_strip_suffix, EditPlan};
pub use rename::{rename_symbol, RenameOptions, RenameRequest};

use crate::config::TestAttributeCatalog;
use crate::errors::{LintError, Result};
use crate::models::Violation;
use crate::rules::base::LintRule;
use crate::rules::{asl001_async_suffix_on_task_test, asl002_await_in_sync_test};
use crate::syntax::method::{name_node, text};
use crate::syntax::{apply_edits, method, parse};
use crate::workspace::Workspace;

/// Hard cap on batch passes; the rules are idempotent so the loop terminates
/// long before this.
const MAX_FIX_PASSES: usize = 1000;

/// Outcome of a batch fix run over one workspace.
#[derive(Debug)]
pub struct FixReport {
    pub workspace: Workspace,
    pub fixes_applied: usize,
    /// Human-readable notes for violations whose fix could not be applied
    pub fixes_skipped: Vec<String>,
}

/// Apply the fix for one violation, returning the edited workspace. The
/// input workspace is never mutated; on error the caller simply keeps it.
pub fn apply_fix(
    workspace: &Workspace,
    violation: &Violation,
    rename_options: RenameOptions,
    cancel: &CancellationToken,
) -> Result<Workspace> {
    if cancel.is_cancelled() {
        return Err(LintError::Cancelled);
    }

    let path = Path::new(&violation.file_path);
    let source = workspace.text(path).ok_or_else(|| {
        LintError::internal(format!("violation file {} not in workspace", violation.file_path))
    })?;
    let tree = parse(source, path)?;

    let plan = match violation.rule_id.as_str() {
        asl001_async_suffix_on_task_test::RULE_ID => {
            plan_strip_suffix(&tree, source, path, violation.offset)?
        }
        asl002_await_in_sync_test::RULE_ID => {
            plan_make_async(&tree, source, path, violation.offset)?
        }
        other => {
            return Err(LintError::internal(format!(
                "no fix registered for rule {other}"
            )))
        }
    };

    // Structural edits first; the old tree and symbol positions are stale
    // from here on.
    let edited = if plan.edits.is_empty() {
        workspace.clone()
    } else {
        let new_text = apply_edits(source, &plan.edits)?;
        workspace.with_file(path, new_text)
    };

    if cancel.is_cancelled() {
        return Err(LintError::Cancelled);
    }

    // Re-resolve the method in the edited tree before renaming.
    let resolution_failure = || LintError::SymbolResolutionFailure {
        path: path.to_path_buf(),
        name: plan.old_name.clone(),
    };
    let edited_source = edited.text(path).ok_or_else(resolution_failure)?;
    let edited_tree = parse(edited_source, path)?;
    let method_node =
        method::enclosing_method(&edited_tree, plan.method_start).ok_or_else(resolution_failure)?;
    let identifier = name_node(method_node).ok_or_else(resolution_failure)?;
    if text(identifier, edited_source) != plan.old_name {
        return Err(resolution_failure());
    }

    if !plan.requests_rename() {
        debug!(rule = %violation.rule_id, method = %plan.old_name, "fix applied without rename");
        return Ok(edited);
    }

    let request = RenameRequest {
        old_name: &plan.old_name,
        new_name: &plan.new_name,
        declaration_file: path,
        declaration_offset: identifier.start_byte(),
        options: rename_options,
    };
    let renamed = rename_symbol(&edited, &request, cancel)?;

    if cancel.is_cancelled() {
        return Err(LintError::Cancelled);
    }

    debug!(
        rule = %violation.rule_id,
        from = %plan.old_name,
        to = %plan.new_name,
        "fix applied with rename"
    );
    Ok(renamed)
}

/// Lint every file of an in-memory workspace with the given rules,
/// violations ordered by file then offset.
pub fn lint_workspace(
    workspace: &Workspace,
    rules: &[Box<dyn LintRule>],
    catalog: &TestAttributeCatalog,
) -> Result<Vec<Violation>> {
    let mut violations = Vec::new();
    for (path, content) in workspace.files() {
        violations.extend(crate::analyze_source(path, content, rules, catalog)?);
    }
    violations.sort_by(|a, b| {
        (a.file_path.as_str(), a.offset).cmp(&(b.file_path.as_str(), b.offset))
    });
    Ok(violations)
}

/// Batch fixer: repeatedly lint the workspace with the given rules and apply
/// the first fixable violation until none remain. Every fix touches a
/// disjoint method declaration, so no ordering dependency exists between
/// them; re-linting after each application keeps all spans fresh across
/// multi-file renames.
pub fn fix_workspace(
    workspace: &Workspace,
    rules: &[Box<dyn LintRule>],
    catalog: &TestAttributeCatalog,
    rename_options: RenameOptions,
    cancel: &CancellationToken,
) -> Result<FixReport> {
    let mut current = workspace.clone();
    let mut fixes_applied = 0usize;
    let mut fixes_skipped = Vec::new();
    let mut failed: HashSet<(String, String, String)> = HashSet::new();

    for _ in 0..MAX_FIX_PASSES {
        if cancel.is_cancelled() {
            return Err(LintError::Cancelled);
        }

        let violations = lint_workspace(&current, rules, catalog)?;
        let next = violations
            .into_iter()
            .find(|v| !failed.contains(&failure_key(v)));
        let Some(violation) = next else {
            break;
        };

        match apply_fix(&current, &violation, rename_options, cancel) {
            Ok(fixed) => {
                current = fixed;
                fixes_applied += 1;
            }
            Err(LintError::Cancelled) => return Err(LintError::Cancelled),
            Err(err) => {
                warn!(
                    rule = %violation.rule_id,
                    method = %violation.method_name,
                    file = %violation.file_path,
                    error = %err,
                    "skipping unfixable violation"
                );
                fixes_skipped.push(format!(
                    "{} '{}' in {}: {}",
                    violation.rule_id, violation.method_name, violation.file_path, err
                ));
                failed.insert(failure_key(&violation));
            }
        }
    }

    Ok(FixReport {
        workspace: current,
        fixes_applied,
        fixes_skipped,
    })
}

/// Identity of a violation for skip tracking. Spans shift as other fixes
/// land, so the key is positional-content based, not offset based.
fn failure_key(violation: &Violation) -> (String, String, String) {
    (
        violation.rule_id.clone(),
        violation.file_path.clone(),
        violation.method_name.clone(),
    )
}
