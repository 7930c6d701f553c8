//! Watching a research job until it settles.
//!
//! `run_watch` drives the poll loop and displays the result;
//! `run_status` is the one-shot status check.

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::client::ApiClient;
use crate::config::Config;
use crate::poller::{self, PollOptions, PollOutcome, StderrPollProgress};
use crate::render;
use crate::session;

/// CLI entry point for `deepr watch`.
pub async fn run_watch(config: &Config, id: &str) -> Result<()> {
    let session = session::require(&session::session_path(config))?;
    let client = ApiClient::new(config, Some(&session))?;
    let opts = PollOptions::from_config(config);

    // Ctrl-c stops scheduling further polls; the job keeps running
    // server-side.
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    eprintln!(
        "researching...  (status refreshes every {}s, ctrl-c to stop watching)",
        config.poll.interval_secs
    );

    match poller::poll_until_terminal(&client, id, &opts, &cancel, &StderrPollProgress).await {
        PollOutcome::Completed(report) => {
            print!("{}", render::render_report(&report));
            Ok(())
        }
        PollOutcome::Failed => {
            anyhow::bail!("Research failed. Please try again.")
        }
        PollOutcome::Error(err) => {
            tracing::debug!(error = ?err, "watch aborted");
            Err(err.into())
        }
        PollOutcome::TimedOut { attempts } => {
            anyhow::bail!(
                "gave up after {} status checks; the job may still finish — retry with `deepr watch {}`",
                attempts,
                id
            )
        }
        PollOutcome::Cancelled => {
            eprintln!("stopped watching; resume with `deepr watch {}`", id);
            Ok(())
        }
    }
}

/// CLI entry point for `deepr status`.
pub async fn run_status(config: &Config, id: &str) -> Result<()> {
    let session = session::require(&session::session_path(config))?;
    let client = ApiClient::new(config, Some(&session))?;

    let status = client.research_status(id).await?;
    println!("{}", status);
    Ok(())
}
