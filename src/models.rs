//! Wire types shared with the research backend.
//!
//! These are transient client-side copies of backend-owned entities: the
//! client deserializes them from responses and never mutates them. A
//! [`Report`] exists only once the corresponding job status is
//! [`ResearchStatus::Completed`].

use serde::{Deserialize, Serialize};

/// Lifecycle state of a research job, re-read on every poll tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchStatus {
    /// Accepted but not yet picked up by a worker.
    Pending,
    /// Running. The backend worker reports `processing` once it has picked
    /// the job up; both strings read as in-progress here.
    #[serde(alias = "processing")]
    InProgress,
    /// Finished successfully — the report is now fetchable.
    Completed,
    /// Finished unsuccessfully. Terminal, no report exists.
    Failed,
}

impl ResearchStatus {
    /// Terminal states stop the poll loop.
    pub fn is_terminal(self) -> bool {
        matches!(self, ResearchStatus::Completed | ResearchStatus::Failed)
    }
}

impl std::fmt::Display for ResearchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResearchStatus::Pending => "pending",
            ResearchStatus::InProgress => "in_progress",
            ResearchStatus::Completed => "completed",
            ResearchStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Body of `POST /research/`.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchRequest {
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_context: Option<String>,
}

/// Response of `POST /research/`. Everything beyond `research_id` is
/// informational.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub research_id: String,
    pub status: ResearchStatus,
    #[serde(default)]
    pub estimated_time: Option<i64>,
}

/// Response of `GET /research/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: ResearchStatus,
}

/// A cited source attached to a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// One titled section of a report. `content` is markdown, carried verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub content: String,
}

/// A completed research report.
///
/// Timestamps stay as the backend's ISO-8601 strings — the service emits
/// naive UTC timestamps, so display code parses leniently instead of the
/// deserializer rejecting them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub topic: String,
    pub summary: String,
    pub sections: Vec<Section>,
    #[serde(default)]
    pub sources: Vec<Source>,
    pub created_at: String,
}

/// One row of `GET /research/history`, delivered newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub user_id: i64,
    pub topic: String,
    pub created_at: String,
}

/// Envelope of `GET /research/history`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    pub researches: Vec<HistoryEntry>,
}

/// Profile of the signed-in account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

/// Credential issued by `POST /auth/token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}
