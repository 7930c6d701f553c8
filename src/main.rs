//! # deepr CLI
//!
//! The `deepr` binary is the terminal interface for the deep research
//! service. It covers sign-in, research submission, status watching,
//! report display, history, and PDF export.
//!
//! ## Usage
//!
//! ```bash
//! deepr --config ./config/deepr.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `deepr login` | Sign in with email and password |
//! | `deepr register` | Create an account and sign in |
//! | `deepr oauth` | Sign in through the browser |
//! | `deepr logout` | Remove the stored session |
//! | `deepr whoami` | Show the signed-in profile |
//! | `deepr new "<topic>"` | Start a research job |
//! | `deepr status <id>` | One-shot status check |
//! | `deepr watch <id>` | Poll a job until it settles, then display it |
//! | `deepr show <id>` | Display an already-completed report |
//! | `deepr history` | List past research runs, newest first |
//! | `deepr pdf <id>` | Download the report as a PDF |

mod auth;
mod client;
mod config;
#[allow(dead_code)]
mod error;
#[allow(dead_code)]
mod export;
mod history;
#[allow(dead_code)]
mod models;
mod oauth;
#[allow(dead_code)]
mod poller;
mod render;
mod session;
mod show;
mod submit;
mod watch;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// deepr — a CLI client for an AI-assisted deep research report service.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file; a missing file falls back to built-in defaults. See
/// `config/deepr.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "deepr",
    about = "deepr — a CLI client for an AI-assisted deep research report service",
    version,
    long_about = "deepr submits research topics to a remote backend, follows each job with a \
    fixed-interval status poll until it completes or fails, fetches the finished report, and \
    exports it as a PDF. Sign in first with `deepr login`, `deepr register`, or `deepr oauth`."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/deepr.toml`. API endpoint, poll cadence,
    /// session location, and OAuth settings are read from this file.
    #[arg(long, global = true, default_value = "./config/deepr.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password.
    ///
    /// Prompts for the password when `--password` is not given, then
    /// stores the issued token as the active session.
    Login {
        #[arg(long)]
        email: String,

        /// Password (prompted interactively when omitted).
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account and sign in.
    ///
    /// Prompts for the password twice when `--password` is not given; a
    /// mismatch is rejected locally without contacting the backend.
    Register {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        /// Password (prompted interactively, with confirmation, when omitted).
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign in through the browser (OAuth).
    ///
    /// Opens the provider's authorize page and waits for the redirect on
    /// a local callback listener. Requires an `[auth.oauth]` config section.
    Oauth,

    /// Remove the stored session.
    Logout,

    /// Show the signed-in profile.
    Whoami,

    /// Start a research job on a topic.
    ///
    /// The topic must be non-empty after trimming. With `--watch` the
    /// command follows the job to completion and prints the report.
    New {
        /// The research topic.
        topic: String,

        /// Additional context passed along with the topic.
        #[arg(long)]
        context: Option<String>,

        /// Follow the job until it settles instead of returning immediately.
        #[arg(long)]
        watch: bool,
    },

    /// One-shot status check for a research job.
    Status {
        /// Research job id.
        id: String,
    },

    /// Poll a research job until it settles, then display the report.
    ///
    /// Checks status every five seconds (configurable) with exactly one
    /// request in flight at a time. Ctrl-c stops watching; the job keeps
    /// running server-side.
    Watch {
        /// Research job id.
        id: String,
    },

    /// Display an already-completed report.
    Show {
        /// Research job id.
        id: String,
    },

    /// List past research runs, newest first.
    History,

    /// Download a completed report as a PDF.
    ///
    /// Saves `Research_Report_<id>.pdf` into the export directory.
    Pdf {
        /// Research job id.
        id: String,

        /// Directory to save into (defaults to `[export].dir`).
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Login { email, password } => {
            auth::run_login(&cfg, &email, password.as_deref()).await?;
        }
        Commands::Register {
            username,
            email,
            password,
        } => {
            auth::run_register(&cfg, &username, &email, password.as_deref()).await?;
        }
        Commands::Oauth => {
            oauth::run_oauth(&cfg).await?;
        }
        Commands::Logout => {
            auth::run_logout(&cfg)?;
        }
        Commands::Whoami => {
            auth::run_whoami(&cfg).await?;
        }
        Commands::New {
            topic,
            context,
            watch,
        } => {
            submit::run_submit(&cfg, &topic, context.as_deref(), watch).await?;
        }
        Commands::Status { id } => {
            watch::run_status(&cfg, &id).await?;
        }
        Commands::Watch { id } => {
            watch::run_watch(&cfg, &id).await?;
        }
        Commands::Show { id } => {
            show::run_show(&cfg, &id).await?;
        }
        Commands::History => {
            history::run_history(&cfg).await?;
        }
        Commands::Pdf { id, output } => {
            export::run_export(&cfg, &id, output).await?;
        }
    }

    Ok(())
}
