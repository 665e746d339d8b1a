//! Output formatting for answer summaries.

use crate::config::{ConfigDocument, Question, QuestionKind, value_to_string};
use crate::questions::{Answers, as_list};
use serde_json::Value;

/// Format the recorded answers as a markdown list, in question order.
pub fn format_summary(config: &ConfigDocument, answers: &Answers) -> String {
    let mut md = String::new();
    md.push_str("## Summary\n");

    for question in &config.questions {
        if let Some(answer) = answers.get(&question.id) {
            md.push_str(&format!(
                "- **{}**: {}\n",
                question.prompt_text(),
                format_answer(question, answer)
            ));
        }
    }

    md
}

/// Render one answer for display: choice names, yes/no, comma lists.
pub fn format_answer(question: &Question, answer: &Value) -> String {
    let display = |value: &Value| {
        question
            .choice_for(value)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| value_to_string(value))
    };

    match (&question.kind, answer) {
        (QuestionKind::YesNo, Value::Bool(true)) => "yes".to_string(),
        (QuestionKind::YesNo, Value::Bool(false)) => "no".to_string(),
        (QuestionKind::MultiSelect { .. }, answer) => {
            let names: Vec<String> = as_list(answer).into_iter().map(display).collect();
            if names.is_empty() {
                "none".to_string()
            } else {
                names.join(", ")
            }
        }
        (_, answer) => display(answer),
    }
}
