//! Manager for the version model.
use crate::db::{DatabaseConnection, DatabaseKind, DatabaseTransaction};
use async_trait::async_trait;

use super::{Version, REMOTE_BRANCH_PREFIX};

#[async_trait]
impl super::Manager for DatabaseConnection {
    /// Find the version tracking `branch`, either directly or as a remote-tracking branch.
    /// A direct match is preferred.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_by_branch_name(
        &self,
        project: i64,
        branch: &str,
    ) -> anyhow::Result<Option<Version>> {
        let statement = "
            SELECT *
            FROM version
            WHERE project = $1 AND (identifier = $2 OR identifier = $3)
            ORDER BY identifier = $2 DESC, id ASC
            LIMIT 1
        ";
        let remote = format!("{REMOTE_BRANCH_PREFIX}{branch}");
        let row = match self.kind {
            DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Version>(statement)
                    .bind(project)
                    .bind(branch)
                    .bind(remote)
                    .fetch_optional(&mut *connection)
                    .await?
            }
        };
        Ok(row)
    }

    /// Find a version by project and slug.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_by_slug(&self, project: i64, slug: &str) -> anyhow::Result<Option<Version>> {
        let statement = "
            SELECT *
            FROM version
            WHERE project = $1 AND slug = $2
        ";
        let row = match self.kind {
            DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Version>(statement)
                    .bind(project)
                    .bind(slug)
                    .fetch_optional(&mut *connection)
                    .await?
            }
        };
        Ok(row)
    }
}

#[async_trait]
impl super::TxManager for DatabaseTransaction {
    /// Insert a new version into the database.
    ///
    /// # Errors
    /// Errors if the version cannot be inserted into the database.
    async fn create(&mut self, version: &Version) -> anyhow::Result<Option<i64>> {
        let statement = "
            INSERT INTO version ( project, slug, identifier, verbose_name, active )
            VALUES ( $1, $2, $3, $4, $5 )
            RETURNING id
        ";
        let id: i64 = sqlx::query_scalar(statement)
            .bind(version.project)
            .bind(&version.slug)
            .bind(&version.identifier)
            .bind(&version.verbose_name)
            .bind(version.active)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(Some(id))
    }
}
