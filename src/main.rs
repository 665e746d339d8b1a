//! scaffold-wizard
//!
//! Loads the layered wizard configuration, collects answers, and prints
//! the generator command and post actions it would run.

use anyhow::Result;
use clap::Parser;
use scaffold_wizard::cli::{AnswerArgs, Cli, Command, NewArgs};
use scaffold_wizard::command;
use scaffold_wizard::config::{ConfigDocument, LayerSources};
use scaffold_wizard::error::ConfigError;
use scaffold_wizard::format::format_summary;
use scaffold_wizard::logging;
use scaffold_wizard::prompt::{Prompter, ScriptedPrompter, TerminalPrompter};
use scaffold_wizard::questions::QuestionGraph;
use scaffold_wizard::runner::{ActionOutcome, DryRunExecutor, Runner};
use tracing::{info, warn};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log, cli.verbose)?;

    let sources = cli.layer_sources();
    match &cli.command {
        Command::New(args) => run_new(&sources, args),
        Command::Command(args) => run_command(&sources, args),
        Command::Validate => run_validate(&sources),
        Command::Show => run_show(&sources),
    }
}

fn load(sources: &LayerSources) -> Result<ConfigDocument> {
    let config = sources.load()?;
    info!(
        questions = config.questions.len(),
        post_actions = config.post_actions.len(),
        "Loaded wizard configuration"
    );
    Ok(config)
}

fn run_new(sources: &LayerSources, args: &NewArgs) -> Result<()> {
    let config = load(sources)?;
    let graph = QuestionGraph::new(&config).with_answers(args.answers.parsed()?);

    let mut scripted = ScriptedPrompter::new();
    if args.yes {
        scripted = scripted.confirm_all(true);
    }
    let mut terminal = TerminalPrompter::new();
    let noninteractive = args.defaults || args.yes;

    let answers = if args.defaults {
        graph.resolve_defaults()
    } else {
        graph.resolve_interactive(&mut terminal)?
    };

    println!("{}", format_summary(&config, &answers));

    let prompter: &mut dyn Prompter = if noninteractive {
        &mut scripted
    } else {
        &mut terminal
    };
    let mut executor = DryRunExecutor::new(std::io::stdout());
    let report = Runner::new(&args.answers.app_name, &config, &answers).run(&mut executor, prompter)?;

    for (id, outcome) in &report.actions {
        match outcome {
            ActionOutcome::Ran => info!(action = %id, "Post action done"),
            ActionOutcome::Skipped => info!(action = %id, "Post action skipped"),
            ActionOutcome::Declined => info!(action = %id, "Post action declined"),
            ActionOutcome::Failed(reason) => warn!(action = %id, reason = %reason, "Post action failed"),
        }
    }
    Ok(())
}

fn run_command(sources: &LayerSources, args: &AnswerArgs) -> Result<()> {
    let config = load(sources)?;
    let answers = QuestionGraph::new(&config)
        .with_answers(args.parsed()?)
        .resolve_defaults();
    println!("{}", command::build(&args.app_name, &config, &answers)?);
    Ok(())
}

fn run_validate(sources: &LayerSources) -> Result<()> {
    match sources.load() {
        Ok(_) => {
            println!("ok");
            Ok(())
        }
        Err(ConfigError::Validation { issues }) => {
            for issue in &issues {
                println!("{}", issue);
            }
            anyhow::bail!("{} validation issue(s)", issues.len())
        }
        Err(e) => Err(e.into()),
    }
}

fn run_show(sources: &LayerSources) -> Result<()> {
    let merged = sources.load_merged()?;
    print!("{}", serde_yaml::to_string(&merged)?);
    Ok(())
}
