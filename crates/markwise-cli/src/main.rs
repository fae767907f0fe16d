//! markwise CLI: grade answer sheets from the command line.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::filter::{Directive, LevelFilter};

mod commands;

#[derive(Parser)]
#[command(name = "markwise", version, about = "Automated short-answer grading")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade an answer sheet against a question bank
    Grade {
        /// Path to the .toml question bank (or a directory holding one)
        #[arg(long)]
        bank: PathBuf,

        /// Extracted answer-sheet text, answers separated by END
        #[arg(long)]
        answers: PathBuf,

        /// Grammar checker to use (defaults to the configured one)
        #[arg(long)]
        checker: Option<String>,

        /// Output directory (defaults to the configured one)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Re-grade the answers stored in a previous report
    Reevaluate {
        /// Previous report JSON
        #[arg(long)]
        report: PathBuf,

        /// Path to the .toml question bank
        #[arg(long)]
        bank: PathBuf,

        /// Grammar checker to use (defaults to the configured one)
        #[arg(long)]
        checker: Option<String>,

        /// Output directory for the new report
        #[arg(long)]
        output: Option<PathBuf>,

        /// Score change (in marks) below which a question counts as unchanged
        #[arg(long, default_value = "0.01")]
        threshold: f64,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compare two submission reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Score change (in marks) below which a question counts as unchanged
        #[arg(long, default_value = "0.01")]
        threshold: f64,

        /// Exit code 1 if any question lost marks
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to a question bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// Run the grammar checker on a piece of text
    CheckGrammar {
        /// Text to check
        #[arg(long)]
        text: String,

        /// Grammar checker to use (defaults to the configured one)
        #[arg(long)]
        checker: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and sample question bank
    Init,
}

#[tokio::main]
async fn main() {
    let directive: Directive = "markwise=info"
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(directive))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            bank,
            answers,
            checker,
            output,
            format,
            config,
        } => commands::grade::execute(bank, answers, checker, output, format, config).await,
        Commands::Reevaluate {
            report,
            bank,
            checker,
            output,
            threshold,
            config,
        } => {
            commands::reevaluate::execute(report, bank, checker, output, threshold, config).await
        }
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_regression, format),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::CheckGrammar {
            text,
            checker,
            config,
        } => commands::check_grammar::execute(text, checker, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
