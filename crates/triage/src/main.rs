mod cli;
mod commands;
mod render;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with the wizard prompt
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Annotate {
            evaluator,
            mode,
            start,
            data,
            results,
        } => {
            let mut config = data.config();
            if let Some(results) = results {
                config.results_dir = results;
            }
            let mode = mode.map(Into::into).unwrap_or(config.default_mode);
            commands::annotate::run(&config, &evaluator, mode, start)
        }
        Commands::Items { data, json } => commands::items::run(&data.config(), json),
        Commands::Categories { data } => commands::categories::run(&data.config()),
        Commands::Summary { file, total } => commands::summary::run(&file, total),
        Commands::Version => commands::version::run(),
    }
}
