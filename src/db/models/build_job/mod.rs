use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{any::AnyRow, FromRow, Row as _};

pub mod manager;

/// Trait for managing queued build jobs.
#[async_trait]
pub trait Manager {
    /// Find all jobs queued for `project`, oldest first.
    async fn find_all_by_project(&self, project: i64) -> anyhow::Result<Vec<QueuedJob>>;
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
/// Model for a build job waiting in the outbox table.
pub struct QueuedJob {
    /// Primary key.
    pub id: i64,
    /// Foreign key reference to the project to build.
    pub project: i64,
    /// Version to build. `None` builds `latest`.
    pub version: Option<i64>,
    /// Whether the build ignores up-to-date checks.
    /// Stored as 0/1.
    pub force: i64,
    /// Time the job was queued, RFC 3339.
    pub queued_at: String,
}

impl FromRow<'_, AnyRow> for QueuedJob {
    fn from_row(row: &AnyRow) -> anyhow::Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            project: row.try_get("project")?,
            version: row.try_get("version").ok(),
            force: row.try_get("force")?,
            queued_at: row.try_get("queued_at")?,
        })
    }
}
