//! quizladder CLI: adaptive quiz sessions from the command line.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizladder", version, about = "Adaptive quiz question sequencer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a quiz interactively
    Play {
        /// Path to a .toml bank or a directory of banks
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Named source from the config (used when --bank is absent)
        #[arg(long)]
        source: Option<String>,

        /// Record the session under this user
        #[arg(long)]
        user: Option<String>,

        /// Only ask questions in these categories (comma-separated)
        #[arg(long)]
        category: Option<String>,

        /// Also write an HTML report to this path
        #[arg(long)]
        html: Option<PathBuf>,

        /// Do not record the session in the history
        #[arg(long)]
        no_history: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run a session with scripted answers and print the order asked
    Simulate {
        /// Path to a .toml bank or a directory of banks
        #[arg(long)]
        bank: PathBuf,

        /// Outcome per question: c = correct, x = incorrect (missing = incorrect)
        #[arg(long, default_value = "")]
        answers: String,

        /// Only ask questions in these categories (comma-separated)
        #[arg(long)]
        category: Option<String>,

        /// Record the session in the history under this user
        #[arg(long)]
        record: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Also write an HTML report to this path
        #[arg(long)]
        html: Option<PathBuf>,

        /// Save the session report as JSON to this path
        #[arg(long)]
        save: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Render a saved session report as HTML
    Report {
        /// Session report JSON (from `simulate --save`)
        #[arg(long)]
        session: PathBuf,

        /// Output HTML path
        #[arg(long)]
        html: PathBuf,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// Show a user's past sessions
    History {
        /// User to show (defaults to the configured user)
        #[arg(long)]
        user: Option<String>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example bank
    Init {
        /// User name to put in the config
        #[arg(long)]
        user: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizladder=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            bank,
            source,
            user,
            category,
            html,
            no_history,
            config,
        } => {
            commands::play::execute(bank, source, user, category, html, no_history, config).await
        }
        Commands::Simulate {
            bank,
            answers,
            category,
            record,
            format,
            html,
            save,
            config,
        } => {
            let output = commands::simulate::Output { format, html, save };
            commands::simulate::execute(bank, answers, category, record, output, config).await
        }
        Commands::Report { session, html } => commands::report::execute(session, html),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::History {
            user,
            format,
            config,
        } => commands::history::execute(user, format, config),
        Commands::Init { user } => commands::init::execute(user),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
