//! Manager for the imported file model.
use crate::db::{DatabaseConnection, DatabaseKind, DatabaseTransaction};
use async_trait::async_trait;

use super::{slugify, ImportedFile};

#[async_trait]
impl super::Manager for DatabaseConnection {
    /// Pick a random imported file, scoped to `project_slug` when given.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_random(
        &self,
        project_slug: Option<&str>,
    ) -> anyhow::Result<Option<ImportedFile>> {
        let statement = "
            SELECT f.id, f.project, f.name, f.slug, f.path,
                p.slug AS project_slug,
                COALESCE(v.slug, 'latest') AS version_slug
            FROM imported_file f
            JOIN project p ON p.id = f.project
            LEFT JOIN version v ON v.id = f.version
            WHERE $1 IS NULL OR p.slug = $1
            ORDER BY RANDOM()
            LIMIT 1
        ";
        let row = match self.kind {
            DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, ImportedFile>(statement)
                    .bind(project_slug)
                    .fetch_optional(&mut *connection)
                    .await?
            }
        };
        Ok(row)
    }
}

#[async_trait]
impl super::TxManager for DatabaseTransaction {
    /// Insert a new imported file into the database.
    ///
    /// # Errors
    /// Errors if the imported file cannot be inserted into the database.
    async fn create(
        &mut self,
        project: i64,
        version: Option<i64>,
        name: &str,
        path: &str,
    ) -> anyhow::Result<Option<i64>> {
        let statement = "
            INSERT INTO imported_file ( project, version, name, slug, path )
            VALUES ( $1, $2, $3, $4, $5 )
            RETURNING id
        ";
        let id: i64 = sqlx::query_scalar(statement)
            .bind(project)
            .bind(version)
            .bind(name)
            .bind(slugify(name))
            .bind(path)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(Some(id))
    }
}
