//! Structural validation of a merged wizard document.
//!
//! Validation never stops at the first defect: every issue found across
//! both collections is collected, in document order, into one report.

use super::merge::{MERGEABLE_COLLECTIONS, entry_id};
use super::types::{ConfigDocument, QuestionKind};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Label used in issue strings, e.g. `questions[2] 'database'`.
pub fn entry_label(collection: &str, index: usize, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("{}[{}] '{}'", collection, index, id),
        None => format!("{}[{}]", collection, index),
    }
}

/// Collect every structural issue in a merged document.
pub fn validate(document: &Value) -> Vec<String> {
    let mut issues = Vec::new();
    for collection in MERGEABLE_COLLECTIONS {
        match document.get(collection) {
            None | Some(Value::Null) => {}
            Some(Value::Array(entries)) => {
                validate_collection(collection, entries, &mut issues);
            }
            Some(_) => issues.push(format!("{}: expected a list", collection)),
        }
    }
    issues
}

fn validate_collection(collection: &str, entries: &[Value], issues: &mut Vec<String>) {
    let is_questions = collection == "questions";
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        if !entry.is_object() {
            issues.push(format!(
                "{}: entry must be a mapping",
                entry_label(collection, index, None)
            ));
            continue;
        }

        let id = entry_id(entry);
        let label = entry_label(collection, index, id.as_deref());
        match id {
            Some(id) => {
                let count = counts.entry(id.clone()).or_insert(0);
                if *count == 0 {
                    first_seen.push(id);
                }
                *count += 1;
            }
            None => issues.push(format!("{}: missing id", label)),
        }

        if is_questions {
            validate_question(entry, &label, issues);
        }
    }

    for id in first_seen {
        let count = counts[&id];
        if count > 1 {
            issues.push(format!(
                "{}: duplicate id '{}' ({} occurrences)",
                collection, id, count
            ));
        }
    }
}

fn validate_question(entry: &Value, label: &str, issues: &mut Vec<String>) {
    let kind = entry.get("type").and_then(Value::as_str);
    match kind {
        Some(kind) if QuestionKind::NAMES.contains(&kind) => {
            if QuestionKind::requires_choices(kind) {
                let has_choices = entry
                    .get("choices")
                    .and_then(Value::as_array)
                    .is_some_and(|choices| !choices.is_empty());
                if !has_choices {
                    issues.push(format!("{}: {} question requires choices", label, kind));
                }
            }
        }
        Some(kind) => issues.push(format!("{}: invalid type '{}'", label, kind)),
        None => issues.push(format!(
            "{}: invalid type {}",
            label,
            entry.get("type").map_or("(missing)".to_string(), Value::to_string)
        )),
    }
}

/// Findings that are accepted but worth a warning.
///
/// Reports `depends_on` targets that never resolve (unknown, later, or
/// self references) and questions with more than one default choice.
pub fn policy_warnings(document: &ConfigDocument) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut earlier: HashSet<&str> = HashSet::new();

    for question in &document.questions {
        if let Some(dep) = &question.depends_on {
            if !earlier.contains(dep.question.as_str()) {
                warnings.push(format!(
                    "question '{}' depends on '{}', which is not an earlier question; it will always be skipped",
                    question.id, dep.question
                ));
            }
        }

        let flagged = question.choices().iter().filter(|c| c.default).count();
        if flagged > 1 && question.default.is_none() {
            warnings.push(format!(
                "question '{}' has {} default choices; the first one is used",
                question.id, flagged
            ));
        }

        earlier.insert(question.id.as_str());
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_document_has_no_issues() {
        let doc = json!({
            "questions": [
                {"id": "api", "type": "yes_no", "prompt": "API only?"},
                {"id": "db", "type": "select", "choices": [{"name": "SQLite", "value": "sqlite3"}]}
            ],
            "post_actions": [{"id": "bundle", "command": "bundle install"}]
        });
        assert!(validate(&doc).is_empty());
    }

    #[test]
    fn test_duplicate_id_reported_once_with_count() {
        let doc = json!({"questions": [
            {"id": "api", "type": "yes_no"},
            {"id": "api", "type": "yes_no"}
        ]});
        let issues = validate(&doc);
        assert_eq!(issues, vec!["questions: duplicate id 'api' (2 occurrences)"]);
    }

    #[test]
    fn test_missing_choices() {
        let doc = json!({"questions": [
            {"id": "db", "type": "select"},
            {"id": "tools", "type": "multi_select", "choices": []}
        ]});
        let issues = validate(&doc);
        assert_eq!(issues.len(), 2);
        assert!(issues[0].contains("select question requires choices"));
        assert!(issues[1].contains("multi_select question requires choices"));
    }

    #[test]
    fn test_collects_every_issue_across_collections() {
        let doc = json!({
            "questions": [
                "not a mapping",
                {"type": "input"},
                {"id": "  ", "type": "input"},
                {"id": "x", "type": "checkbox"},
                {"id": "y"}
            ],
            "post_actions": [{"id": "a", "command": "ls"}, {"id": "a", "command": "ls"}, 7]
        });
        let issues = validate(&doc);
        assert_eq!(
            issues,
            vec![
                "questions[0]: entry must be a mapping",
                "questions[1]: missing id",
                "questions[2]: missing id",
                "questions[3] 'x': invalid type 'checkbox'",
                "questions[4] 'y': invalid type (missing)",
                "post_actions[2]: entry must be a mapping",
                "post_actions: duplicate id 'a' (2 occurrences)",
            ]
        );
    }

    #[test]
    fn test_numeric_ids_count_as_present() {
        let doc = json!({"questions": [
            {"id": 42, "type": "input"},
            {"id": "42", "type": "input"},
            {"id": false, "type": "yes_no"}
        ]});
        assert_eq!(
            validate(&doc),
            vec!["questions: duplicate id '42' (2 occurrences)"]
        );
    }

    #[test]
    fn test_post_actions_skip_question_checks() {
        let doc = json!({"post_actions": [{"id": "a", "type": "template", "source": "x"}]});
        assert!(validate(&doc).is_empty());
    }

    #[test]
    fn test_collection_must_be_list() {
        let doc = json!({"questions": {"id": "a"}});
        assert_eq!(validate(&doc), vec!["questions: expected a list"]);
    }

    #[test]
    fn test_policy_warnings() {
        let doc = ConfigDocument::from_value(json!({"questions": [
            {"id": "css", "type": "input", "depends_on": {"question": "api", "value": false}},
            {"id": "api", "type": "yes_no"},
            {"id": "db", "type": "select", "choices": [
                {"name": "a", "default": true},
                {"name": "b", "default": true}
            ]}
        ]}))
        .unwrap();
        let warnings = policy_warnings(&doc);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("'css' depends on 'api'"));
        assert!(warnings[1].contains("'db' has 2 default choices"));
    }
}
