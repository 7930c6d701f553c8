//! Research status poll loop.
//!
//! Drives a submitted job to a terminal outcome: query status, and while
//! the backend reports the job as pending or in progress, sleep a fixed
//! interval and query again. Polls for one job are strictly sequential —
//! the next query is scheduled only after the previous response settles,
//! so at most one status request is ever in flight. On `completed` the
//! report is fetched exactly once; on `failed` nothing further is fetched.
//!
//! The loop is a cancellable task: callers hand in a
//! [`CancellationToken`] tied to whatever owns the watch (the CLI wires it
//! to ctrl-c), and cancellation between ticks stops all further
//! scheduling. An optional attempt cap turns an indefinitely in-progress
//! job into a [`PollOutcome::TimedOut`]; by default polling is unbounded.
//!
//! Nothing is persisted — a new watch of the same job starts from scratch.

use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{Report, ResearchStatus};

/// Read side of the research backend the poller drives.
///
/// [`crate::client::ApiClient`] is the production implementation; tests
/// substitute scripted in-memory backends.
#[async_trait]
pub trait ResearchBackend: Send + Sync {
    async fn fetch_status(&self, id: &str) -> Result<ResearchStatus, ApiError>;
    async fn fetch_report(&self, id: &str) -> Result<Report, ApiError>;
}

/// Terminal outcome of one poll loop.
#[derive(Debug)]
pub enum PollOutcome {
    /// Status reached `completed` and the report was fetched once.
    Completed(Box<Report>),
    /// The backend reported the job itself failed. No report exists.
    Failed,
    /// Transport or client failure, distinct from a failed job. Includes a
    /// result fetch that failed after a completed status was observed.
    Error(ApiError),
    /// The optional attempt cap ran out before a terminal status.
    TimedOut { attempts: u32 },
    /// The caller cancelled; nothing further was scheduled.
    Cancelled,
}

/// Poll cadence and bounds.
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Delay between one response settling and the next status query.
    pub interval: Duration,
    /// Maximum number of status queries. `None` polls until terminal.
    pub max_attempts: Option<u32>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: None,
        }
    }
}

impl PollOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: config.poll_interval(),
            max_attempts: config.poll.max_attempts,
        }
    }
}

/// Observer for poll ticks: the CLI installs a stderr reporter, tests a
/// recording one.
pub trait PollProgressReporter: Send + Sync {
    /// Called after every status response, before the loop acts on it.
    fn tick(&self, attempt: u32, status: ResearchStatus);
}

/// Human-friendly progress on stderr, one line per status check.
pub struct StderrPollProgress;

impl PollProgressReporter for StderrPollProgress {
    fn tick(&self, attempt: u32, status: ResearchStatus) {
        eprintln!("status check {}  {}", attempt, status);
    }
}

/// Reporter that swallows ticks.
pub struct SilentProgress;

impl PollProgressReporter for SilentProgress {
    fn tick(&self, _attempt: u32, _status: ResearchStatus) {}
}

/// Poll `id` until a terminal outcome.
pub async fn poll_until_terminal(
    backend: &dyn ResearchBackend,
    id: &str,
    opts: &PollOptions,
    cancel: &CancellationToken,
    progress: &dyn PollProgressReporter,
) -> PollOutcome {
    let mut attempts: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            return PollOutcome::Cancelled;
        }

        let status = match backend.fetch_status(id).await {
            Ok(status) => status,
            Err(err) => return PollOutcome::Error(err),
        };
        attempts += 1;
        progress.tick(attempts, status);
        tracing::debug!(id, attempts, %status, "poll tick");

        match status {
            ResearchStatus::Completed => {
                return match backend.fetch_report(id).await {
                    Ok(report) => PollOutcome::Completed(Box::new(report)),
                    Err(err) => PollOutcome::Error(err),
                };
            }
            ResearchStatus::Failed => return PollOutcome::Failed,
            ResearchStatus::Pending | ResearchStatus::InProgress => {
                if let Some(max) = opts.max_attempts {
                    if attempts >= max {
                        return PollOutcome::TimedOut { attempts };
                    }
                }
                tokio::select! {
                    _ = cancel.cancelled() => return PollOutcome::Cancelled,
                    _ = tokio::time::sleep(opts.interval) => {}
                }
            }
        }
    }
}
