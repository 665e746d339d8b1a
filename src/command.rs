//! Translate a resolved document and its answers into one command line.

use crate::config::{ConfigDocument, FlagTemplates, Question, QuestionKind, interpolate_str};
use crate::error::Result;
use crate::questions::{Answers, as_list};
use serde_json::Value;
use tracing::debug;

/// Literal prefix of every generated command.
pub const COMMAND_PREFIX: &str = "rails new";

/// Build `<prefix> <app_name> <token>...` from the recorded answers.
///
/// Questions contribute tokens in declared order. A question whose answer
/// is absent, `false` or null contributes nothing; empty strings and zero
/// are still processed. Any interpolation failure aborts the build.
pub fn build(app_name: &str, config: &ConfigDocument, answers: &Answers) -> Result<String> {
    let mut tokens = Vec::new();
    for question in &config.questions {
        let Some(answer) = answers.get(&question.id) else {
            continue;
        };
        if matches!(answer, Value::Bool(false) | Value::Null) {
            continue;
        }
        question_tokens(question, answer, &mut tokens)?;
    }

    let mut command = format!("{} {}", COMMAND_PREFIX, app_name);
    for token in &tokens {
        command.push(' ');
        command.push_str(token);
    }
    debug!(command = %command, tokens = tokens.len(), "Built generator command");
    Ok(command)
}

fn question_tokens(question: &Question, answer: &Value, tokens: &mut Vec<String>) -> Result<()> {
    match &question.kind {
        QuestionKind::Select { .. } => {
            let flag = question
                .choice_for(answer)
                .and_then(|choice| choice.flag.as_ref())
                .filter(|flag| !flag.is_empty())
                .or(question.flag.as_ref());
            push_flags(flag, answer, tokens)
        }
        QuestionKind::YesNo | QuestionKind::Input => {
            push_flags(question.flag.as_ref(), answer, tokens)
        }
        QuestionKind::MultiSelect { choices } => {
            let selected = as_list(answer);
            for choice in choices.iter().filter(|c| selected.contains(&&c.value)) {
                push_flags(choice.flag.as_ref(), &choice.value, tokens)?;
            }
            Ok(())
        }
    }
}

fn push_flags(flag: Option<&FlagTemplates>, value: &Value, tokens: &mut Vec<String>) -> Result<()> {
    let Some(flag) = flag else {
        return Ok(());
    };
    for template in flag.templates() {
        tokens.push(interpolate_str(template, value)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use serde_json::json;

    fn doc(value: Value) -> ConfigDocument {
        ConfigDocument::from_value(value).unwrap()
    }

    fn answers(value: Value) -> Answers {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_yes_no_flag_only_when_true() {
        let config = doc(json!({"questions": [{"id": "api", "type": "yes_no", "flag": "--api"}]}));
        assert_eq!(build("app", &config, &answers(json!({"api": true}))).unwrap(), "rails new app --api");
        assert_eq!(build("app", &config, &answers(json!({"api": false}))).unwrap(), "rails new app");
        assert_eq!(build("app", &config, &answers(json!({}))).unwrap(), "rails new app");
    }

    #[test]
    fn test_select_prefers_choice_flag() {
        let config = doc(json!({"questions": [{"id": "db", "type": "select", "flag": "--database=%{value}",
            "choices": [
                {"name": "SQLite", "value": "sqlite3", "flag": ["--skip-db", "--lite"]},
                {"name": "PostgreSQL", "value": "postgresql"}
            ]}]}));
        assert_eq!(
            build("app", &config, &answers(json!({"db": "sqlite3"}))).unwrap(),
            "rails new app --skip-db --lite"
        );
        assert_eq!(
            build("app", &config, &answers(json!({"db": "postgresql"}))).unwrap(),
            "rails new app --database=postgresql"
        );
    }

    #[test]
    fn test_select_without_any_flag_contributes_nothing() {
        let config = doc(json!({"questions": [{"id": "t", "type": "select",
            "choices": [{"name": "Minitest", "value": "minitest"}]}]}));
        assert_eq!(build("app", &config, &answers(json!({"t": "minitest"}))).unwrap(), "rails new app");
    }

    #[test]
    fn test_multi_select_uses_declared_choice_order() {
        let config = doc(json!({"questions": [{"id": "skip", "type": "multi_select", "choices": [
            {"name": "a", "flag": "--skip-a"},
            {"name": "b", "flag": "--skip-b"},
            {"name": "c", "flag": "--skip-c=%{value}"}
        ]}]}));
        assert_eq!(
            build("app", &config, &answers(json!({"skip": ["c", "a"]}))).unwrap(),
            "rails new app --skip-a --skip-c=c"
        );
    }

    #[test]
    fn test_empty_string_and_zero_are_processed() {
        let config = doc(json!({"questions": [
            {"id": "name", "type": "input", "flag": "--name=%{value}"},
            {"id": "jobs", "type": "input", "flag": "-j%{value}"},
            {"id": "none", "type": "input", "flag": "--none=%{value}"}
        ]}));
        let out = build("app", &config, &answers(json!({"name": "", "jobs": 0, "none": null}))).unwrap();
        assert_eq!(out, "rails new app --name= -j0");
    }

    #[test]
    fn test_tokens_follow_question_order() {
        let config = doc(json!({"questions": [
            {"id": "api", "type": "yes_no", "flag": "--api"},
            {"id": "ruby", "type": "input", "flag": "--ruby=%{value}"}
        ]}));
        let out = build("blog", &config, &answers(json!({"ruby": "/usr/bin/ruby", "api": true}))).unwrap();
        assert_eq!(out, "rails new blog --api --ruby=/usr/bin/ruby");
    }

    #[test]
    fn test_interpolation_failure_aborts() {
        let config = doc(json!({"questions": [{"id": "x", "type": "input", "flag": "--x=%{bogus}"}]}));
        let err = build("app", &config, &answers(json!({"x": "y"}))).unwrap_err();
        assert!(matches!(err, ConfigError::Interpolation { .. }));
    }
}
