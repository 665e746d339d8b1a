//! Typed wizard document.
//!
//! The merged layer document is decoded into these types once validation
//! succeeds. Nothing downstream indexes raw mappings.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One flag template or a list of them, emitted in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagTemplates {
    One(String),
    Many(Vec<String>),
}

impl FlagTemplates {
    pub fn templates(&self) -> &[String] {
        match self {
            FlagTemplates::One(template) => std::slice::from_ref(template),
            FlagTemplates::Many(templates) => templates,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.templates().is_empty()
    }
}

/// A selectable option of a select or multi_select question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawChoice")]
pub struct Choice {
    pub name: String,
    pub value: Value,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag: Option<FlagTemplates>,
}

#[derive(Deserialize)]
struct RawChoice {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    value: Option<Value>,
    #[serde(default)]
    default: bool,
    #[serde(default, alias = "flags")]
    flag: Option<FlagTemplates>,
}

impl TryFrom<RawChoice> for Choice {
    type Error = String;

    fn try_from(raw: RawChoice) -> std::result::Result<Self, Self::Error> {
        let (name, value) = match (raw.name, raw.value) {
            (Some(name), Some(value)) => (name, value),
            (Some(name), None) => (name.clone(), Value::String(name)),
            (None, Some(value)) => (crate::config::value_to_string(&value), value),
            (None, None) => return Err("choice needs a name or a value".to_string()),
        };
        Ok(Self {
            name,
            value,
            default: raw.default,
            flag: raw.flag,
        })
    }
}

/// The kind of a question, decided once from its `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    Select { choices: Vec<Choice> },
    MultiSelect { choices: Vec<Choice> },
    YesNo,
    Input,
}

impl QuestionKind {
    /// Names accepted in the `type` field.
    pub const NAMES: [&'static str; 4] = ["select", "multi_select", "yes_no", "input"];

    pub fn name(&self) -> &'static str {
        match self {
            QuestionKind::Select { .. } => "select",
            QuestionKind::MultiSelect { .. } => "multi_select",
            QuestionKind::YesNo => "yes_no",
            QuestionKind::Input => "input",
        }
    }

    /// Whether a question of this `type` name must declare choices.
    pub fn requires_choices(name: &str) -> bool {
        matches!(name, "select" | "multi_select")
    }
}

/// `depends_on`: ask the question only when an earlier answer matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    #[serde(alias = "on")]
    pub question: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(flatten)]
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Dependency>,
    #[serde(default, alias = "flags", skip_serializing_if = "Option::is_none")]
    pub flag: Option<FlagTemplates>,
}

impl Question {
    /// Prompt text, falling back to the id.
    pub fn prompt_text(&self) -> &str {
        self.prompt.as_deref().unwrap_or(&self.id)
    }

    /// Declared choices; empty for yes_no and input questions.
    pub fn choices(&self) -> &[Choice] {
        match &self.kind {
            QuestionKind::Select { choices } | QuestionKind::MultiSelect { choices } => choices,
            QuestionKind::YesNo | QuestionKind::Input => &[],
        }
    }

    pub fn choice_for(&self, value: &Value) -> Option<&Choice> {
        self.choices().iter().find(|choice| &choice.value == value)
    }
}

/// Gate on a post action, read from its `if` field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Recorded answer must equal `value` exactly.
    Equals { question: String, value: Value },
    /// Recorded answer and `values` (both coerced to lists) must overlap.
    Includes { question: String, values: Value },
    /// Any other shape; always satisfied.
    Other(Value),
}

impl From<Value> for Condition {
    fn from(value: Value) -> Self {
        let question = value
            .get("question")
            .and_then(Value::as_str)
            .map(str::to_string);
        match (question, value.get("equals"), value.get("includes")) {
            (Some(question), Some(expected), _) => Condition::Equals {
                question,
                value: expected.clone(),
            },
            (Some(question), None, Some(values)) => Condition::Includes {
                question,
                values: values.clone(),
            },
            _ => Condition::Other(value),
        }
    }
}

impl From<Condition> for Value {
    fn from(condition: Condition) -> Self {
        match condition {
            Condition::Equals { question, value } => {
                serde_json::json!({ "question": question, "equals": value })
            }
            Condition::Includes { question, values } => {
                serde_json::json!({ "question": question, "includes": values })
            }
            Condition::Other(value) => value,
        }
    }
}

/// What a post action does once it is allowed to run.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionTask {
    /// A shell command line.
    Command(String),
    /// Apply a template from `source` with extra variables.
    Template {
        source: String,
        variables: Map<String, Value>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPostAction", into = "RawPostAction")]
pub struct PostAction {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub task: ActionTask,
    pub condition: Option<Condition>,
    /// Confirmation question asked before running.
    pub prompt: Option<String>,
    /// Default answer for the confirmation.
    pub default: Option<bool>,
}

#[derive(Serialize, Deserialize)]
struct RawPostAction {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    enabled: Option<bool>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    variables: Map<String, Value>,
    #[serde(default, rename = "if", skip_serializing_if = "Option::is_none")]
    condition: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<bool>,
}

impl TryFrom<RawPostAction> for PostAction {
    type Error = String;

    fn try_from(raw: RawPostAction) -> std::result::Result<Self, Self::Error> {
        let task = match raw.kind.as_deref() {
            Some("template") => ActionTask::Template {
                source: raw
                    .source
                    .ok_or_else(|| "template action requires a source".to_string())?,
                variables: raw.variables,
            },
            None | Some("command") => ActionTask::Command(
                raw.command
                    .ok_or_else(|| "action requires a command".to_string())?,
            ),
            Some(other) => return Err(format!("unknown action type '{}'", other)),
        };
        Ok(Self {
            name: raw.name.unwrap_or_else(|| raw.id.clone()),
            id: raw.id,
            enabled: raw.enabled.unwrap_or(true),
            task,
            condition: raw.condition.map(Condition::from),
            prompt: raw.prompt,
            default: raw.default,
        })
    }
}

impl From<PostAction> for RawPostAction {
    fn from(action: PostAction) -> Self {
        let (kind, command, source, variables) = match action.task {
            ActionTask::Command(command) => (None, Some(command), None, Map::new()),
            ActionTask::Template { source, variables } => {
                (Some("template".to_string()), None, Some(source), variables)
            }
        };
        Self {
            id: action.id,
            name: Some(action.name),
            enabled: (!action.enabled).then_some(false),
            kind,
            command,
            source,
            variables,
            condition: action.condition.map(Value::from),
            prompt: action.prompt,
            default: action.default,
        }
    }
}

/// The merged, validated wizard document.
///
/// Every load produces a fresh, independently owned document.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ConfigDocument {
    pub questions: Vec<Question>,
    pub post_actions: Vec<PostAction>,
    /// Every other top-level key, kept as merged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigDocument {
    /// Decode a structurally valid merged document.
    ///
    /// Entries are decoded one at a time so that every defective entry is
    /// reported in a single validation failure.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(ConfigError::Validation {
                issues: vec!["document: expected a mapping".to_string()],
            });
        };

        let mut issues = Vec::new();
        let questions = decode_collection(map.remove("questions"), "questions", &mut issues);
        let post_actions =
            decode_collection(map.remove("post_actions"), "post_actions", &mut issues);

        if !issues.is_empty() {
            return Err(ConfigError::Validation { issues });
        }

        Ok(Self {
            questions,
            post_actions,
            extra: map,
        })
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn post_action(&self, id: &str) -> Option<&PostAction> {
        self.post_actions.iter().find(|a| a.id == id)
    }
}

fn decode_collection<T: serde::de::DeserializeOwned>(
    value: Option<Value>,
    collection: &str,
    issues: &mut Vec<String>,
) -> Vec<T> {
    let entries = match value {
        Some(Value::Array(entries)) => entries,
        Some(Value::Null) | None => return Vec::new(),
        Some(_) => {
            issues.push(format!("{}: expected a list", collection));
            return Vec::new();
        }
    };

    let mut decoded = Vec::with_capacity(entries.len());
    for (index, mut entry) in entries.into_iter().enumerate() {
        let id = crate::config::entry_id(&entry);
        if let (Some(id), Some(map)) = (&id, entry.as_object_mut()) {
            map.insert("id".to_string(), Value::String(id.clone()));
        }
        match serde_json::from_value::<T>(entry) {
            Ok(item) => decoded.push(item),
            Err(e) => issues.push(format!(
                "{}: {}",
                crate::config::validate::entry_label(collection, index, id.as_deref()),
                e
            )),
        }
    }
    decoded
}
