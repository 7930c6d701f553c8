//! Research submission.
//!
//! Validates the topic locally (an empty topic never reaches the network),
//! issues one create request, and either hands off to the watch loop or
//! prints the job id for later.

use anyhow::Result;

use crate::client::ApiClient;
use crate::config::Config;
use crate::session;
use crate::watch;

/// CLI entry point for `deepr new`.
pub async fn run_submit(
    config: &Config,
    topic: &str,
    context: Option<&str>,
    watch_after: bool,
) -> Result<()> {
    let session = session::require(&session::session_path(config))?;
    let client = ApiClient::new(config, Some(&session))?;

    let submitted = client.create_research(topic, context).await?;
    println!("research started: {}", submitted.research_id);
    if let Some(eta) = submitted.estimated_time {
        println!("estimated time: {}s", eta);
    }

    if watch_after {
        watch::run_watch(config, &submitted.research_id).await
    } else {
        println!("track it with: deepr watch {}", submitted.research_id);
        Ok(())
    }
}
