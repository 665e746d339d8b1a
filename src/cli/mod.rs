//! CLI command definitions for scaffold-wizard
//!
//! This module defines the CLI structure using clap's derive macros and
//! resolves the layer paths the loader consumes.

use crate::config::{Layer, LayerSources, Source, default_base};
use crate::questions::Answers;
use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

/// Environment variable naming the base document.
pub const ENV_CONFIG: &str = "SCAFFOLD_WIZARD_CONFIG";
/// Environment variable naming the user override document.
pub const ENV_USER_CONFIG: &str = "SCAFFOLD_WIZARD_USER_CONFIG";
/// Environment variable naming the per-run preset.
pub const ENV_PRESET: &str = "SCAFFOLD_WIZARD_PRESET";

/// Interactive application generator wizard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base wizard document (default: built-in)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// User override document (default: ~/.scaffold-wizard/config.yaml)
    #[arg(long, global = true)]
    pub user_config: Option<PathBuf>,

    /// Per-run preset document
    #[arg(short, long, global = true)]
    pub preset: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask the wizard questions and dry-run the generator
    New(NewArgs),

    /// Print the generator command built from defaults and given answers
    Command(AnswerArgs),

    /// Load and validate the merged configuration
    Validate,

    /// Print the merged configuration as YAML
    Show,
}

#[derive(Args, Debug)]
pub struct NewArgs {
    #[command(flatten)]
    pub answers: AnswerArgs,

    /// Use defaults instead of asking
    #[arg(long)]
    pub defaults: bool,

    /// Answer every post-action confirmation with yes
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct AnswerArgs {
    /// Application name
    pub app_name: String,

    /// Preset answer as ID=VALUE; VALUE is read as YAML (true, [a, b], text)
    #[arg(short, long = "answer", value_name = "ID=VALUE")]
    pub answers: Vec<String>,
}

impl AnswerArgs {
    pub fn parsed(&self) -> Result<Answers> {
        parse_answers(&self.answers)
    }
}

/// Parse one `id=value` pair.
pub fn parse_answer(pair: &str) -> Result<(String, Value)> {
    let Some((id, raw)) = pair.split_once('=') else {
        bail!("answer '{}' must look like ID=VALUE", pair);
    };
    let id = id.trim();
    if id.is_empty() {
        bail!("answer '{}' has an empty id", pair);
    }
    let value = if raw.trim().is_empty() {
        Value::String(String::new())
    } else {
        serde_yaml::from_str::<Value>(raw)
            .with_context(|| format!("answer '{}' has an unreadable value", pair))?
    };
    Ok((id.to_string(), value))
}

pub fn parse_answers(pairs: &[String]) -> Result<Answers> {
    pairs.iter().map(|pair| parse_answer(pair)).collect()
}

impl Cli {
    /// Resolve one source per layer from flags, environment, and defaults.
    pub fn layer_sources(&self) -> LayerSources {
        let env_path = |name: &str| std::env::var_os(name).map(PathBuf::from);

        let base = self
            .config
            .clone()
            .or_else(|| env_path(ENV_CONFIG))
            .map(Source::File)
            .unwrap_or_else(default_base);
        let user = self
            .user_config
            .clone()
            .or_else(|| env_path(ENV_USER_CONFIG))
            .or_else(default_user_config)
            .map(Source::File);
        let preset = self
            .preset
            .clone()
            .or_else(|| env_path(ENV_PRESET))
            .map(Source::File);

        debug!(layer = %Layer::Base, source = %base.name(), "Resolved layer");
        if let Some(user) = &user {
            debug!(layer = %Layer::User, source = %user.name(), "Resolved layer");
        }
        if let Some(preset) = &preset {
            debug!(layer = %Layer::Preset, source = %preset.name(), "Resolved layer");
        }

        LayerSources::new(base).with_user(user).with_preset(preset)
    }
}

/// `~/.scaffold-wizard/config.yaml`, when a home directory is known.
pub fn default_user_config() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".scaffold-wizard").join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_answer_values() {
        assert_eq!(parse_answer("api=true").unwrap(), ("api".to_string(), json!(true)));
        assert_eq!(
            parse_answer("database=postgresql").unwrap(),
            ("database".to_string(), json!("postgresql"))
        );
        assert_eq!(
            parse_answer("skip=[git, docker]").unwrap(),
            ("skip".to_string(), json!(["git", "docker"]))
        );
        assert_eq!(parse_answer("ruby=").unwrap(), ("ruby".to_string(), json!("")));
    }

    #[test]
    fn test_parse_answer_rejects_malformed() {
        assert!(parse_answer("api").is_err());
        assert!(parse_answer("=true").is_err());
    }

    #[test]
    fn test_cli_parses_new() {
        let cli = Cli::parse_from([
            "scaffold-wizard",
            "--preset",
            "api.yaml",
            "new",
            "blog",
            "--defaults",
            "-a",
            "api=true",
        ]);
        match cli.command {
            Command::New(args) => {
                assert!(args.defaults);
                assert_eq!(args.answers.app_name, "blog");
                assert_eq!(args.answers.parsed().unwrap().get("api"), Some(&json!(true)));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.preset, Some(PathBuf::from("api.yaml")));
    }

    #[test]
    fn test_explicit_paths_become_file_sources() {
        let cli = Cli::parse_from([
            "scaffold-wizard",
            "--config",
            "base.yaml",
            "--user-config",
            "user.yaml",
            "validate",
        ]);
        let sources = cli.layer_sources();
        assert!(matches!(sources.base, Source::File(ref p) if p == &PathBuf::from("base.yaml")));
        assert!(matches!(sources.user, Some(Source::File(ref p)) if p == &PathBuf::from("user.yaml")));
    }
}
