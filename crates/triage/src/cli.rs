use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use triage_core::{Config, Mode};

#[derive(Parser)]
#[command(name = "triage")]
#[command(version)]
#[command(about = "Annotate medical intake dialogues with category and KTAS level")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive annotation session
    Annotate {
        /// Evaluator identifier
        #[arg(short, long, env = "TRIAGE_EVALUATOR")]
        evaluator: String,

        /// Evaluation mode [default: plain]
        #[arg(short, long, value_enum, env = "TRIAGE_MODE")]
        mode: Option<ModeArg>,

        /// Item number to start from (1-based)
        #[arg(short, long, default_value_t = 1)]
        start: usize,

        #[command(flatten)]
        data: DataArgs,

        /// Directory for result files
        #[arg(long, env = "TRIAGE_RESULTS")]
        results: Option<PathBuf>,
    },

    /// List dialogue items
    Items {
        #[command(flatten)]
        data: DataArgs,

        /// Print items as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Show the category taxonomy
    Categories {
        #[command(flatten)]
        data: DataArgs,
    },

    /// Summarize an exported result file
    Summary {
        /// Result CSV written by `annotate`
        file: PathBuf,

        /// Total item count, for the completion figure
        #[arg(long)]
        total: Option<usize>,
    },

    /// Print version information
    Version,
}

/// Input table locations
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// Dialogue table (.csv or .jsonl)
    #[arg(long, env = "TRIAGE_ITEMS")]
    pub items: Option<PathBuf>,

    /// Directory with adult.csv and pediatric.csv
    #[arg(long, env = "TRIAGE_CATEGORIES")]
    pub categories: Option<PathBuf>,
}

impl DataArgs {
    /// Apply command-line overrides on top of the default config
    pub fn config(&self) -> Config {
        let mut config = Config::new();
        if let Some(items) = &self.items {
            config.items_path = items.clone();
        }
        if let Some(categories) = &self.categories {
            config.categories_dir = categories.clone();
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Classification only
    #[value(alias = "ver1")]
    Plain,
    /// Show the model's prediction at each step
    #[value(alias = "ver2")]
    Assisted,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Plain => Mode::Plain,
            ModeArg::Assisted => Mode::Assisted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_version() {
        let cli = Cli::try_parse_from(["triage", "version"]);
        assert!(cli.is_ok());
        assert!(matches!(cli.unwrap().command, Commands::Version));
    }

    #[test]
    fn test_cli_parse_annotate() {
        let cli = Cli::try_parse_from([
            "triage",
            "annotate",
            "--evaluator",
            "E001",
            "--mode",
            "ver2",
            "--start",
            "4",
            "--items",
            "data/items.jsonl",
        ])
        .unwrap();

        if let Commands::Annotate {
            evaluator,
            mode,
            start,
            data,
            results,
        } = cli.command
        {
            assert_eq!(evaluator, "E001");
            assert_eq!(mode, Some(ModeArg::Assisted));
            assert_eq!(start, 4);
            assert_eq!(data.items, Some(PathBuf::from("data/items.jsonl")));
            assert_eq!(results, None);
        } else {
            panic!("Expected Annotate command");
        }
    }

    #[test]
    fn test_cli_parse_summary() {
        let cli = Cli::try_parse_from(["triage", "summary", "out.csv", "--total", "10"]).unwrap();
        if let Commands::Summary { file, total } = cli.command {
            assert_eq!(file, PathBuf::from("out.csv"));
            assert_eq!(total, Some(10));
        } else {
            panic!("Expected Summary command");
        }
    }

    #[test]
    fn test_data_args_override_config() {
        let args = DataArgs {
            items: Some(PathBuf::from("other.csv")),
            categories: None,
        };
        let config = args.config();
        assert_eq!(config.items_path, PathBuf::from("other.csv"));
        assert_eq!(config.categories_dir, Config::new().categories_dir);
    }
}
