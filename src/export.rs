//! PDF export with single-flight guarding and a transient error slot.
//!
//! Exporting is an on-demand action, available once a report exists. One
//! download runs at a time per exporter: a second invocation while one is
//! in flight is a no-op that issues no request. A failed export records a
//! message that self-clears after five seconds, and releases the guard so
//! the user can try again.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::ApiError;
use crate::session;

/// How long a failed export's message stays visible before self-clearing.
const ERROR_TTL: Duration = Duration::from_secs(5);

/// Deterministic download name for a report's PDF.
pub fn pdf_filename(id: &str) -> String {
    format!("Research_Report_{}.pdf", id)
}

/// Fetch side needed by the exporter (implemented by `ApiClient`).
#[async_trait]
pub trait PdfSource: Send + Sync {
    async fn fetch_pdf(&self, id: &str) -> Result<Vec<u8>, ApiError>;
}

/// Result of one export invocation.
#[derive(Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved(PathBuf),
    /// A download is already running; no request was issued.
    AlreadyInFlight,
    Failed(String),
}

/// Single-flight PDF exporter. Cheap to clone; clones share state.
#[derive(Clone, Default)]
pub struct PdfExporter {
    inner: Arc<ExporterState>,
}

#[derive(Default)]
struct ExporterState {
    in_flight: AtomicBool,
    last_error: Mutex<Option<String>>,
    // Stamped per failure so a stale clear timer cannot wipe a newer message.
    error_generation: AtomicU64,
}

impl PdfExporter {
    /// Download the PDF for `id` and write it to `dest_dir` under its
    /// deterministic filename.
    pub async fn export(
        &self,
        source: &dyn PdfSource,
        id: &str,
        dest_dir: &Path,
    ) -> ExportOutcome {
        if self
            .inner
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return ExportOutcome::AlreadyInFlight;
        }

        let outcome = match source.fetch_pdf(id).await {
            Ok(bytes) => {
                let path = dest_dir.join(pdf_filename(id));
                match std::fs::write(&path, &bytes) {
                    Ok(()) => ExportOutcome::Saved(path),
                    Err(err) => self.record_error(format!("Failed to save PDF: {}", err)),
                }
            }
            Err(err) => self.record_error(format!("Failed to download PDF: {}", err)),
        };

        self.inner.in_flight.store(false, Ordering::SeqCst);
        outcome
    }

    /// Message from the most recent failed export, until it self-clears.
    pub fn last_error(&self) -> Option<String> {
        self.inner.last_error.lock().unwrap().clone()
    }

    fn record_error(&self, message: String) -> ExportOutcome {
        let generation = self.inner.error_generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.inner.last_error.lock().unwrap() = Some(message.clone());

        let state = self.inner.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ERROR_TTL).await;
            if state.error_generation.load(Ordering::SeqCst) == generation {
                *state.last_error.lock().unwrap() = None;
            }
        });

        ExportOutcome::Failed(message)
    }
}

/// CLI entry point for `deepr pdf`.
pub async fn run_export(config: &Config, id: &str, output: Option<PathBuf>) -> Result<()> {
    let session = session::require(&session::session_path(config))?;
    let client = ApiClient::new(config, Some(&session))?;

    let dest_dir = output.unwrap_or_else(|| config.export.dir.clone());
    std::fs::create_dir_all(&dest_dir)
        .with_context(|| format!("Failed to create {}", dest_dir.display()))?;

    let exporter = PdfExporter::default();
    match exporter.export(&client, id, &dest_dir).await {
        ExportOutcome::Saved(path) => {
            println!("saved {}", path.display());
            Ok(())
        }
        ExportOutcome::Failed(message) => anyhow::bail!(message),
        ExportOutcome::AlreadyInFlight => {
            anyhow::bail!("a download for this report is already running")
        }
    }
}
