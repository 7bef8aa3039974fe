//! Manager for the build job model.
use crate::db::{DatabaseConnection, DatabaseKind};
use async_trait::async_trait;

use super::QueuedJob;

#[async_trait]
impl super::Manager for DatabaseConnection {
    /// Find all jobs queued for `project`.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_all_by_project(&self, project: i64) -> anyhow::Result<Vec<QueuedJob>> {
        let statement = "
            SELECT *
            FROM build_job
            WHERE project = $1
            ORDER BY id ASC
        ";
        let rows = match self.kind {
            DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, QueuedJob>(statement)
                    .bind(project)
                    .fetch_all(&mut *connection)
                    .await?
            }
        };
        Ok(rows)
    }
}
