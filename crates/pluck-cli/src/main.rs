mod commands;
mod output;

use clap::{Parser, Subcommand};
use pluck_core::DocumentKind;
use std::path::PathBuf;

use commands::extract::ExtractArgs;

#[derive(Parser)]
#[command(
    name = "pluck",
    version,
    about = "Pull graded tasks out of syllabi and transactions out of bank statements"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract tasks (title, due date, weight) from a syllabus
    Tasks {
        #[command(flatten)]
        args: ExtractArgs,
    },
    /// Extract transactions (date, description, signed amount) from a bank statement
    Transactions {
        #[command(flatten)]
        args: ExtractArgs,

        /// Append debit/credit totals and runway
        #[arg(long)]
        summary: bool,
    },
    /// Extract from a document whose kind is given by name
    Extract {
        #[command(flatten)]
        args: ExtractArgs,

        /// Document kind: syllabus or bank-statement
        #[arg(short, long, value_parser = parse_kind)]
        kind: DocumentKind,

        /// Append debit/credit totals and runway (statements only)
        #[arg(long)]
        summary: bool,
    },
    /// Manage and inspect sign rule tables
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// List predefined sign rule tables
    List,
    /// Show the rules of a preset in order of precedence
    Show {
        /// Preset name (e.g., "default")
        preset: String,
    },
    /// Print the JSON schema with field descriptions and example
    Schema,
    /// Validate a custom sign rule file
    Validate {
        /// Path to JSON rule file
        file: PathBuf,
    },
}

fn parse_kind(s: &str) -> Result<DocumentKind, String> {
    DocumentKind::from_str_loose(s).map_err(|e| e.to_string())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Tasks { args } => commands::extract::run(DocumentKind::Syllabus, args, false),
        Commands::Transactions { args, summary } => {
            commands::extract::run(DocumentKind::BankStatement, args, summary)
        }
        Commands::Extract {
            args,
            kind,
            summary,
        } => commands::extract::run(kind, args, summary),
        Commands::Rules { action } => match action {
            RulesAction::List => commands::rules::list(),
            RulesAction::Show { preset } => commands::rules::show(&preset),
            RulesAction::Schema => commands::rules::schema(),
            RulesAction::Validate { file } => commands::rules::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
