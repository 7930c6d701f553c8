//! Research history listing.

use anyhow::Result;

use crate::client::ApiClient;
use crate::config::Config;
use crate::render;
use crate::session;

/// CLI entry point for `deepr history`. Entries arrive newest first.
pub async fn run_history(config: &Config) -> Result<()> {
    let session = session::require(&session::session_path(config))?;
    let client = ApiClient::new(config, Some(&session))?;

    let entries = client.research_history().await?;
    print!("{}", render::render_history(&entries));
    Ok(())
}
