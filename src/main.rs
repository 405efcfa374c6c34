mod cli;
mod commands;
mod config;
mod engine;
mod manifest;
mod providers;
mod resource;
mod state;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command, StateCommand};
use std::io;
use std::path::PathBuf;

/// Global context for the application
pub struct Context {
    pub quiet: bool,
    pub config: Option<PathBuf>,
    pub manifest: PathBuf,
    pub state: PathBuf,
    pub password: Option<String>,
}

fn main() {
    if let Err(e) = run() {
        ui::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        quiet: cli.quiet,
        config: cli.config,
        manifest: cli.manifest,
        state: cli.state,
        password: cli.password,
    };

    match cli.command {
        Command::Plan(args) => commands::declarative::plan(&ctx, args.target.as_deref()),
        Command::Apply(args) => {
            commands::declarative::apply(&ctx, args.target.as_deref(), args.auto_approve)
        }
        Command::Refresh => commands::declarative::refresh(&ctx),
        Command::Import { label, id } => commands::declarative::import(&ctx, &label, &id),
        Command::Destroy(args) => {
            commands::declarative::destroy(&ctx, args.target.as_deref(), args.auto_approve)
        }
        Command::State(cmd) => match cmd {
            StateCommand::List => commands::state::list(&ctx),
            StateCommand::Show { label } => commands::state::show(&ctx, &label),
        },
        Command::Completions { shell } => {
            generate(shell, &mut Cli::command(), "mzprov", &mut io::stdout());
            Ok(())
        }
    }
}
