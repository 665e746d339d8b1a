//! Prompting collaborators.
//!
//! [`Prompter`] is the seam between question evaluation and whatever asks
//! the user. [`TerminalPrompter`] asks on the terminal; [`ScriptedPrompter`]
//! answers from a fixed script and otherwise takes the default.

use crate::config::Question;
use anyhow::{Result, anyhow};
use dialoguer::{Confirm, Input, MultiSelect, Select, theme::ColorfulTheme};
use serde_json::Value;
use std::collections::HashMap;

/// Returns typed answers for each question kind.
pub trait Prompter {
    /// Pick one choice; returns the chosen choice's value.
    fn select(&mut self, question: &Question, default: Option<usize>) -> Result<Value>;

    /// Pick any subset of choices; `checked` pre-selects per choice.
    fn multi_select(&mut self, question: &Question, checked: &[bool]) -> Result<Vec<Value>>;

    fn yes_no(&mut self, question: &Question, default: Option<bool>) -> Result<bool>;

    fn input(&mut self, question: &Question, default: Option<String>) -> Result<String>;

    /// Confirmation gate for a post action.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;
}

/// Interactive terminal prompts.
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn select(&mut self, question: &Question, default: Option<usize>) -> Result<Value> {
        let choices = question.choices();
        let names: Vec<&str> = choices.iter().map(|c| c.name.as_str()).collect();
        let index = Select::with_theme(&self.theme)
            .with_prompt(question.prompt_text())
            .items(&names)
            .default(default.unwrap_or(0))
            .interact()?;
        choices
            .get(index)
            .map(|c| c.value.clone())
            .ok_or_else(|| anyhow!("no choice at index {} for '{}'", index, question.id))
    }

    fn multi_select(&mut self, question: &Question, checked: &[bool]) -> Result<Vec<Value>> {
        let choices = question.choices();
        let names: Vec<&str> = choices.iter().map(|c| c.name.as_str()).collect();
        let indices = MultiSelect::with_theme(&self.theme)
            .with_prompt(question.prompt_text())
            .items(&names)
            .defaults(checked)
            .interact()?;
        Ok(indices
            .into_iter()
            .filter_map(|i| choices.get(i).map(|c| c.value.clone()))
            .collect())
    }

    fn yes_no(&mut self, question: &Question, default: Option<bool>) -> Result<bool> {
        let mut confirm = Confirm::with_theme(&self.theme).with_prompt(question.prompt_text());
        if let Some(default) = default {
            confirm = confirm.default(default);
        }
        Ok(confirm.interact()?)
    }

    fn input(&mut self, question: &Question, default: Option<String>) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(question.prompt_text())
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default);
        }
        Ok(input.interact_text()?)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }
}

/// Non-interactive prompter.
///
/// Scripted answers are returned as given; anything else takes the
/// prompt's default. Confirmations are answered with `confirm_all` when set,
/// otherwise with their default.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: HashMap<String, Value>,
    confirm_all: Option<bool>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, question: impl Into<String>, value: Value) -> Self {
        self.answers.insert(question.into(), value);
        self
    }

    pub fn confirm_all(mut self, answer: bool) -> Self {
        self.confirm_all = Some(answer);
        self
    }

    /// Ids of questions asked so far, in order.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    fn scripted(&mut self, question: &Question) -> Option<Value> {
        self.asked.push(question.id.clone());
        self.answers.get(&question.id).cloned()
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&mut self, question: &Question, default: Option<usize>) -> Result<Value> {
        if let Some(value) = self.scripted(question) {
            return Ok(value);
        }
        question
            .choices()
            .get(default.unwrap_or(0))
            .map(|c| c.value.clone())
            .ok_or_else(|| anyhow!("question '{}' has no choices", question.id))
    }

    fn multi_select(&mut self, question: &Question, checked: &[bool]) -> Result<Vec<Value>> {
        if let Some(value) = self.scripted(question) {
            return Ok(match value {
                Value::Array(items) => items,
                other => vec![other],
            });
        }
        Ok(question
            .choices()
            .iter()
            .zip(checked)
            .filter(|(_, checked)| **checked)
            .map(|(c, _)| c.value.clone())
            .collect())
    }

    fn yes_no(&mut self, question: &Question, default: Option<bool>) -> Result<bool> {
        match self.scripted(question) {
            Some(Value::Bool(b)) => Ok(b),
            Some(other) => Err(anyhow!(
                "scripted answer for '{}' is not a boolean: {}",
                question.id,
                other
            )),
            None => Ok(default.unwrap_or(false)),
        }
    }

    fn input(&mut self, question: &Question, default: Option<String>) -> Result<String> {
        match self.scripted(question) {
            Some(value) => Ok(crate::config::value_to_string(&value)),
            None => Ok(default.unwrap_or_default()),
        }
    }

    fn confirm(&mut self, _prompt: &str, default: bool) -> Result<bool> {
        Ok(self.confirm_all.unwrap_or(default))
    }
}
