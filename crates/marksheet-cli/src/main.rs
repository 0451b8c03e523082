//! marksheet CLI — record marks per subject and track averages.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "marksheet", version, about = "Record subject marks and track averages")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that opens the stored roster.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the stored roster and theme (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show subjects, marks and averages
    Show {
        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Add a subject
    AddSubject {
        /// Name for the new subject
        #[arg(long)]
        name: Option<String>,
    },

    /// Rename a subject
    Rename {
        /// Subject number (as shown by `show`)
        #[arg(long)]
        subject: usize,

        /// New name
        #[arg(long)]
        name: String,
    },

    /// Remove a subject and its marks
    RemoveSubject {
        /// Subject number (as shown by `show`)
        #[arg(long)]
        subject: usize,
    },

    /// Add a mark entry to a subject
    AddMark {
        /// Subject number (as shown by `show`)
        #[arg(long)]
        subject: usize,

        /// Value for the new entry (left blank if omitted)
        #[arg(long)]
        value: Option<String>,
    },

    /// Change a mark entry; an empty value removes it
    SetMark {
        /// Subject number (as shown by `show`)
        #[arg(long)]
        subject: usize,

        /// Mark number within the subject
        #[arg(long)]
        mark: usize,

        /// New text, e.g. "7.5"
        #[arg(long, allow_hyphen_values = true)]
        value: String,
    },

    /// Delete all subjects and marks
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Show or change the colour theme
    Theme {
        /// Switch between light and dark
        #[arg(long, conflicts_with = "set")]
        toggle: bool,

        /// Set the theme explicitly: light, dark
        #[arg(long)]
        set: Option<String>,
    },

    /// Show settings and version information
    Settings,

    /// Edit interactively, one command per line
    Shell,

    /// Create a starter config file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("marksheet=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let global = cli.global;

    let result = match cli.command {
        Commands::Show { format } => commands::show::execute(&global, format).await,
        Commands::AddSubject { name } => commands::edit::add_subject(&global, name).await,
        Commands::Rename { subject, name } => {
            commands::edit::rename(&global, subject, name).await
        }
        Commands::RemoveSubject { subject } => {
            commands::edit::remove_subject(&global, subject).await
        }
        Commands::AddMark { subject, value } => {
            commands::edit::add_mark(&global, subject, value).await
        }
        Commands::SetMark {
            subject,
            mark,
            value,
        } => commands::edit::set_mark(&global, subject, mark, value).await,
        Commands::Reset { yes } => commands::reset::execute(&global, yes).await,
        Commands::Theme { toggle, set } => commands::theme::execute(&global, toggle, set).await,
        Commands::Settings => commands::theme::settings(&global).await,
        Commands::Shell => commands::shell::execute(&global).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
