// agriquota/src/main.rs

mod cli;
mod commands;

use clap::Parser;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs on stderr, stdout carries command output only
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Select {
            project_dir,
            questionnaire,
            record,
            values,
        } => commands::select::execute(project_dir, questionnaire, record, values).await,

        Commands::Check {
            project_dir,
            questionnaire,
            records,
        } => commands::check::execute(project_dir, questionnaire, records).await,

        Commands::Progress {
            project_dir,
            questionnaire,
            format,
            save,
        } => commands::progress::execute(project_dir, questionnaire, format, save).await,

        Commands::Validate {
            project_dir,
            strict,
        } => commands::validate::execute(project_dir, strict),
    }
}
