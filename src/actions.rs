//! Post-action eligibility.
//!
//! An action runs when it is enabled and its `if` condition holds. Actions
//! carrying a `prompt` additionally need a yes from the confirmation gate.

use crate::config::{Condition, PostAction};
use crate::prompt::Prompter;
use crate::questions::{Answers, as_list};
use anyhow::Result;
use serde_json::Value;
use tracing::debug;

/// Whether `condition` holds for the recorded answers.
///
/// `equals` compares exactly, value and type; an absent answer compares as
/// null. `includes` holds when the answer and the expected values, both
/// viewed as lists, share at least one element.
pub fn condition_holds(condition: &Condition, answers: &Answers) -> bool {
    match condition {
        Condition::Equals { question, value } => {
            answers.get(question).unwrap_or(&Value::Null) == value
        }
        Condition::Includes { question, values } => {
            let Some(answer) = answers.get(question) else {
                return false;
            };
            let recorded = as_list(answer);
            as_list(values).iter().any(|v| recorded.contains(v))
        }
        Condition::Other(_) => true,
    }
}

/// Enabled and condition satisfied; does not consult the confirmation gate.
pub fn is_eligible(action: &PostAction, answers: &Answers) -> bool {
    action.enabled
        && action
            .condition
            .as_ref()
            .is_none_or(|condition| condition_holds(condition, answers))
}

/// Outcome of selecting one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Eligible and confirmed (or no confirmation needed).
    Run,
    /// Disabled or condition not met.
    Ineligible,
    /// Eligible, but the confirmation was declined.
    Declined,
}

/// Decide whether `action` should run, asking for confirmation if needed.
pub fn select(
    action: &PostAction,
    answers: &Answers,
    prompter: &mut dyn Prompter,
) -> Result<Selection> {
    if !is_eligible(action, answers) {
        debug!(action = %action.id, "Post action not eligible");
        return Ok(Selection::Ineligible);
    }
    if let Some(prompt) = &action.prompt {
        let confirmed = prompter.confirm(prompt, action.default.unwrap_or(true))?;
        if !confirmed {
            debug!(action = %action.id, "Post action declined");
            return Ok(Selection::Declined);
        }
    }
    Ok(Selection::Run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompter;
    use serde_json::json;

    fn action(value: Value) -> PostAction {
        serde_json::from_value(value).unwrap()
    }

    fn answers(value: Value) -> Answers {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_equals_is_type_sensitive() {
        let a = action(json!({"id": "a", "command": "x", "if": {"question": "api", "equals": true}}));
        assert!(is_eligible(&a, &answers(json!({"api": true}))));
        assert!(!is_eligible(&a, &answers(json!({"api": "true"}))));
        assert!(!is_eligible(&a, &answers(json!({"api": false}))));
        assert!(!is_eligible(&a, &answers(json!({}))));
    }

    #[test]
    fn test_equals_null_matches_absent() {
        let a = action(json!({"id": "a", "command": "x", "if": {"question": "css", "equals": null}}));
        assert!(is_eligible(&a, &answers(json!({}))));
    }

    #[test]
    fn test_includes_is_overlap() {
        let a = action(json!({"id": "a", "command": "x",
            "if": {"question": "skip", "includes": ["git", "docker"]}}));
        assert!(is_eligible(&a, &answers(json!({"skip": ["docker", "jbuilder"]}))));
        assert!(is_eligible(&a, &answers(json!({"skip": "git"}))));
        assert!(!is_eligible(&a, &answers(json!({"skip": ["jbuilder"]}))));
        assert!(!is_eligible(&a, &answers(json!({"skip": []}))));
        assert!(!is_eligible(&a, &answers(json!({}))));
    }

    #[test]
    fn test_includes_scalar_expected() {
        let a = action(json!({"id": "a", "command": "x", "if": {"question": "db", "includes": "mysql"}}));
        assert!(is_eligible(&a, &answers(json!({"db": "mysql"}))));
        assert!(!is_eligible(&a, &answers(json!({"db": "sqlite3"}))));
    }

    #[test]
    fn test_unrecognized_condition_is_vacuous() {
        let a = action(json!({"id": "a", "command": "x", "if": {"question": "db", "matches": "my.*"}}));
        assert!(is_eligible(&a, &answers(json!({}))));
    }

    #[test]
    fn test_disabled_never_eligible() {
        let a = action(json!({"id": "a", "command": "x", "enabled": false}));
        assert!(!is_eligible(&a, &answers(json!({}))));
    }

    #[test]
    fn test_confirmation_gate() {
        let a = action(json!({"id": "a", "command": "x", "prompt": "Run it?", "default": false}));
        let recorded = answers(json!({}));

        let mut declining = ScriptedPrompter::new();
        assert_eq!(select(&a, &recorded, &mut declining).unwrap(), Selection::Declined);

        let mut accepting = ScriptedPrompter::new().confirm_all(true);
        assert_eq!(select(&a, &recorded, &mut accepting).unwrap(), Selection::Run);
    }

    #[test]
    fn test_ineligible_not_prompted() {
        let a = action(json!({"id": "a", "command": "x", "enabled": false, "prompt": "Run it?"}));
        let mut prompter = ScriptedPrompter::new().confirm_all(true);
        assert_eq!(
            select(&a, &answers(json!({})), &mut prompter).unwrap(),
            Selection::Ineligible
        );
    }
}
