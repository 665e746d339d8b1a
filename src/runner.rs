//! The generation pipeline.
//!
//! Builds the generator command, hands it to an [`Executor`], then walks
//! the post actions in declared order. A failing generator command is
//! fatal; a failing post action is logged and the walk continues.

use crate::actions::{self, Selection};
use crate::command;
use crate::config::{ActionTask, ConfigDocument, PostAction};
use crate::prompt::Prompter;
use crate::questions::Answers;
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::io::Write;
use tracing::{error, info};

/// Carries out commands and template applications.
pub trait Executor {
    fn run_command(&mut self, command: &str) -> Result<()>;

    fn apply_template(&mut self, source: &str, variables: &Map<String, Value>) -> Result<()>;
}

/// What happened to one post action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Ran,
    Failed(String),
    /// Disabled or its condition was not met.
    Skipped,
    /// The confirmation prompt was answered no.
    Declined,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub command: String,
    /// Outcome per post action id, in declared order.
    pub actions: Vec<(String, ActionOutcome)>,
}

impl RunReport {
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.actions.iter().filter_map(|(id, outcome)| match outcome {
            ActionOutcome::Failed(reason) => Some((id.as_str(), reason.as_str())),
            _ => None,
        })
    }
}

/// Variables passed to a template action.
///
/// The action's own variables plus `app_name` and `answers`, which always
/// hold the implicit values.
pub fn template_variables(
    app_name: &str,
    answers: &Answers,
    own: &Map<String, Value>,
) -> Map<String, Value> {
    let mut variables = own.clone();
    variables.insert("app_name".to_string(), Value::String(app_name.to_string()));
    variables.insert(
        "answers".to_string(),
        Value::Object(answers.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
    );
    variables
}

pub struct Runner<'a> {
    app_name: &'a str,
    config: &'a ConfigDocument,
    answers: &'a Answers,
}

impl<'a> Runner<'a> {
    pub fn new(app_name: &'a str, config: &'a ConfigDocument, answers: &'a Answers) -> Self {
        Self {
            app_name,
            config,
            answers,
        }
    }

    pub fn run(&self, executor: &mut dyn Executor, prompter: &mut dyn Prompter) -> Result<RunReport> {
        let command = command::build(self.app_name, self.config, self.answers)?;
        info!(command = %command, "Running generator");
        executor
            .run_command(&command)
            .with_context(|| format!("generator command failed: {}", command))?;

        let mut outcomes = Vec::with_capacity(self.config.post_actions.len());
        for action in &self.config.post_actions {
            let outcome = match actions::select(action, self.answers, prompter)? {
                Selection::Ineligible => ActionOutcome::Skipped,
                Selection::Declined => ActionOutcome::Declined,
                Selection::Run => self.execute(action, executor),
            };
            outcomes.push((action.id.clone(), outcome));
        }

        Ok(RunReport {
            command,
            actions: outcomes,
        })
    }

    fn execute(&self, action: &PostAction, executor: &mut dyn Executor) -> ActionOutcome {
        info!(action = %action.id, name = %action.name, "Running post action");
        let result = match &action.task {
            ActionTask::Command(command) => executor.run_command(command),
            ActionTask::Template { source, variables } => executor.apply_template(
                source,
                &template_variables(self.app_name, self.answers, variables),
            ),
        };
        match result {
            Ok(()) => ActionOutcome::Ran,
            Err(e) => {
                error!(action = %action.id, error = %e, "Post action failed");
                ActionOutcome::Failed(format!("{:#}", e))
            }
        }
    }
}

/// Prints each step instead of executing it.
pub struct DryRunExecutor<W: Write> {
    out: W,
}

impl<W: Write> DryRunExecutor<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Executor for DryRunExecutor<W> {
    fn run_command(&mut self, command: &str) -> Result<()> {
        writeln!(self.out, "$ {}", command)?;
        Ok(())
    }

    fn apply_template(&mut self, source: &str, variables: &Map<String, Value>) -> Result<()> {
        let names: Vec<&str> = variables.keys().map(String::as_str).collect();
        writeln!(self.out, "apply template {} ({})", source, names.join(", "))?;
        Ok(())
    }
}
