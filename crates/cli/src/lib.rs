pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "outfitter",
    about = "Outfitter operator CLI",
    long_about = "Inspect Outfitter configuration and LLM readiness, and run the \
                  shopping pipeline end to end against the built-in catalog.",
    after_help = "Examples:\n  outfitter doctor --json\n  outfitter demo --message \"ski trip, $400, size M\""
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Validate config, LLM readiness, and catalog integrity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Parse a request and run discovery plus checkout against the built-in catalog")]
    Demo {
        #[arg(
            long,
            default_value = "I need gear for a ski trip, budget $400, size M, delivery within 5 days",
            help = "Shopping request to run through the pipeline"
        )]
        message: String,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Demo { message } => commands::demo::run(&message),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
