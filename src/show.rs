//! One-shot report display for an already-settled job.

use anyhow::Result;

use crate::client::ApiClient;
use crate::config::Config;
use crate::models::ResearchStatus;
use crate::render;
use crate::session;

/// CLI entry point for `deepr show`.
///
/// Checks status first and fetches the report only on `completed` — a
/// report is never requested for a pending, in-progress, or failed job.
pub async fn run_show(config: &Config, id: &str) -> Result<()> {
    let session = session::require(&session::session_path(config))?;
    let client = ApiClient::new(config, Some(&session))?;

    match client.research_status(id).await? {
        ResearchStatus::Completed => {
            let report = client.research_result(id).await?;
            print!("{}", render::render_report(&report));
            Ok(())
        }
        ResearchStatus::Failed => {
            anyhow::bail!("Research failed. Please try again.")
        }
        status => {
            println!("research is still {} — follow it with `deepr watch {}`", status, id);
            Ok(())
        }
    }
}
