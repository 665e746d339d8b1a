//! Question evaluation: dependency skipping and default resolution.
//!
//! Questions are evaluated in declared order. A `depends_on` can only see
//! answers recorded for questions evaluated before it, so a reference to a
//! later or unknown question never matches and the dependent question is
//! always skipped.

use crate::config::{ConfigDocument, Question, QuestionKind, value_to_string};
use crate::prompt::Prompter;
use anyhow::Result;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Recorded answers by question id. Unanswered ids are absent.
pub type Answers = BTreeMap<String, Value>;

/// View a value as a list: arrays as-is, null as empty, scalars as one item.
pub fn as_list(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// The default for a question, if it has one.
///
/// An explicit question-level `default` wins. Otherwise the first choice
/// flagged `default: true` is used; for multi_select it is wrapped in a
/// one-element list.
pub fn resolved_default(question: &Question) -> Option<Value> {
    if let Some(default) = &question.default {
        return Some(default.clone());
    }
    let choice = question.choices().iter().find(|choice| choice.default)?;
    match question.kind {
        QuestionKind::MultiSelect { .. } => Some(Value::Array(vec![choice.value.clone()])),
        _ => Some(choice.value.clone()),
    }
}

/// Whether `question` is skipped given the answers recorded so far.
pub fn is_skipped(question: &Question, recorded: &Answers) -> bool {
    match &question.depends_on {
        None => false,
        Some(dep) => recorded.get(&dep.question) != Some(&dep.value),
    }
}

/// Decides which questions to ask and resolves their answers.
pub struct QuestionGraph<'a> {
    questions: &'a [Question],
    preset: Answers,
}

impl<'a> QuestionGraph<'a> {
    pub fn new(config: &'a ConfigDocument) -> Self {
        Self {
            questions: &config.questions,
            preset: Answers::new(),
        }
    }

    /// Seed the graph with answers that must not be asked again.
    ///
    /// A null preset counts as no answer.
    pub fn with_answers(mut self, preset: Answers) -> Self {
        let known: HashSet<&str> = self.questions.iter().map(|q| q.id.as_str()).collect();
        for id in preset.keys().filter(|id| !known.contains(id.as_str())) {
            warn!(question = %id, "Ignoring answer for unknown question");
        }
        self.preset = preset
            .into_iter()
            .filter(|(id, value)| known.contains(id.as_str()) && !value.is_null())
            .collect();
        self
    }

    /// Record every non-skipped question's default, where it has one.
    pub fn resolve_defaults(&self) -> Answers {
        let mut recorded = Answers::new();
        for question in self.questions {
            if self.skip(question, &recorded) {
                continue;
            }
            let value = self
                .preset
                .get(&question.id)
                .cloned()
                .or_else(|| resolved_default(question));
            if let Some(value) = value {
                recorded.insert(question.id.clone(), value);
            }
        }
        recorded
    }

    /// Ask every non-skipped question through `prompter`.
    pub fn resolve_interactive(&self, prompter: &mut dyn Prompter) -> Result<Answers> {
        let mut recorded = Answers::new();
        for question in self.questions {
            if self.skip(question, &recorded) {
                continue;
            }
            let value = match self.preset.get(&question.id) {
                Some(preset) => preset.clone(),
                None => ask(question, prompter)?,
            };
            recorded.insert(question.id.clone(), value);
        }
        Ok(recorded)
    }

    fn skip(&self, question: &Question, recorded: &Answers) -> bool {
        let skipped = is_skipped(question, recorded);
        if skipped {
            debug!(question = %question.id, "Skipping question, dependency not met");
        }
        skipped
    }
}

fn ask(question: &Question, prompter: &mut dyn Prompter) -> Result<Value> {
    let default = resolved_default(question);
    let value = match &question.kind {
        QuestionKind::Select { choices } => {
            let index = default
                .as_ref()
                .and_then(|d| choices.iter().position(|c| &c.value == d));
            prompter.select(question, index)?
        }
        QuestionKind::MultiSelect { choices } => {
            let selected = default.as_ref().map(as_list).unwrap_or_default();
            let checked: Vec<bool> = choices
                .iter()
                .map(|c| selected.contains(&&c.value))
                .collect();
            Value::Array(prompter.multi_select(question, &checked)?)
        }
        QuestionKind::YesNo => {
            Value::Bool(prompter.yes_no(question, default.as_ref().and_then(Value::as_bool))?)
        }
        QuestionKind::Input => {
            Value::String(prompter.input(question, default.as_ref().map(value_to_string))?)
        }
    };
    Ok(value)
}
