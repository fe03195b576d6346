//! Naming-convention rules for asynchronous test methods

pub mod base;

pub mod asl002_await_in_sync_test;

use std::collections::HashMap;

use base::LintRule;

/// Get all available rules
pub fn get_all_rules() -> Vec<Box<dyn LintRule>> {
    vec![
        Box::new(asl001_async_suffix_on_task_test::AsyncSuffixOnTaskTestRule::new()),
        Box::new(asl002_await_in_sync_test::AwaitInSyncTestRule::new()),
    ]
}

/// Get rules by ID for quick lookup
pub fn get_rules_by_id() -> HashMap<String, Box<dyn LintRule>> {
    get_all_rules()
        .into_iter()
        .map(|rule| (rule.rule_id().to_string(), rule))
        .collect()
}

/// Get all available rule IDs
pub fn get_all_rule_ids() -> Vec<String> {
    get_all_rules()
        .into_iter()
        .map(|rule| rule.rule_id().to_string())
        .collect()
}

/// Rules restricted to the given ids; all rules when `ids` is None.
pub fn get_rules_for_ids(ids: Option<&[String]>) -> Vec<Box<dyn LintRule>> {
    let all = get_all_rules();
    match ids {
        Some(ids) => all
            .into_iter()
            .filter(|rule| ids.iter().any(|id| id == rule.rule_id()))
            .collect(),
        None => all,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rules_loaded() {
        let rule_ids = get_all_rule_ids();
        assert!(rule_ids.contains(&"ASL001".to_string()));
        assert!(rule_ids.contains(&"ASL002".to_string()));
        assert_eq!(rule_ids.len(), get_rules_by_id().len());
    }

    #[test]
    fn test_rules_for_ids() {
        let selected = get_rules_for_ids(Some(&["ASL002".to_string()]));
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].rule_id(), "ASL002");

        assert_eq!(get_rules_for_ids(None).len(), get_all_rules().len());
    }
}
