//! Hand-off of documentation builds to the external build system.
//!
//! Enqueueing is fire-and-forget: once a job is accepted its lifecycle
//! belongs to the build system, and nothing here waits on or tracks it.
use async_trait::async_trait;

use crate::db::{DatabaseConnection, DatabaseKind};

/// A request to rebuild a project's documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildJob {
    /// Primary key of the project to build.
    pub project: i64,
    /// Primary key of the version to build. `None` builds `latest`.
    pub version: Option<i64>,
    /// Rebuild even if the output looks up to date.
    pub force: bool,
}

impl BuildJob {
    /// A forced build of `project`, at `version` or `latest`.
    #[must_use]
    pub const fn forced(project: i64, version: Option<i64>) -> Self {
        Self {
            project,
            version,
            force: true,
        }
    }
}

/// Destination of build jobs.
#[async_trait]
pub trait Queue: Send + Sync {
    /// Submit `job` for asynchronous execution.
    ///
    /// # Errors
    /// Errors if the job could not be accepted. No retry is attempted.
    async fn enqueue(&self, job: &BuildJob) -> anyhow::Result<()>;
}

#[async_trait]
impl Queue for DatabaseConnection {
    /// Insert the job into the `build_job` outbox read by the build workers.
    ///
    /// # Errors
    /// Errors if the job cannot be inserted into the database.
    #[tracing::instrument(level = "debug", skip(self))]
    async fn enqueue(&self, job: &BuildJob) -> anyhow::Result<()> {
        let statement = "
            INSERT INTO build_job ( project, version, force, queued_at )
            VALUES ( $1, $2, $3, $4 )
        ";
        match self.kind {
            DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query(statement)
                    .bind(job.project)
                    .bind(job.version)
                    .bind(i64::from(job.force))
                    .bind(chrono::Utc::now().to_rfc3339())
                    .execute(&mut *connection)
                    .await?;
            }
        }
        tracing::info!(
            project = job.project,
            version = ?job.version,
            "Queued documentation build"
        );
        Ok(())
    }
}
