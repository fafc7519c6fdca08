mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{edit, inspect, session, tag, EditArgs, InspectArgs, SessionArgs, TagArgs};
use tracing_subscriber::EnvFilter;

/// jsxed - edit JSX markup by picking rendered elements
#[derive(Parser, Debug)]
#[command(name = "jsxed")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print markup with an identifier marker on every element
    Tag(TagArgs),

    /// List elements, or show the edit panel of one element
    Inspect(InspectArgs),

    /// Apply text, style and attribute edits to one element
    Edit(EditArgs),

    /// Interactively edit a stored component
    Session(SessionArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Tag(args) => tag(args, &cwd),
        Command::Inspect(args) => inspect(args, &cwd),
        Command::Edit(args) => edit(args, &cwd),
        Command::Session(args) => session(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
