//! Manager for the project model.
use crate::db::{DatabaseConnection, DatabaseKind, DatabaseTransaction};
use async_trait::async_trait;

use super::Project;

#[async_trait]
impl super::Manager for DatabaseConnection {
    /// Find a project by primary key.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_by_pk(&self, pk: i64) -> anyhow::Result<Option<Project>> {
        let statement = "
            SELECT *
            FROM project
            WHERE id = $1
        ";
        let row = match self.kind {
            DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Project>(statement)
                    .bind(pk)
                    .fetch_optional(&mut *connection)
                    .await?
            }
        };
        Ok(row)
    }

    /// Find a project by slug.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_by_slug(&self, slug: &str) -> anyhow::Result<Option<Project>> {
        let statement = "
            SELECT *
            FROM project
            WHERE slug = $1
        ";
        let row = match self.kind {
            DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Project>(statement)
                    .bind(slug)
                    .fetch_optional(&mut *connection)
                    .await?
            }
        };
        Ok(row)
    }

    /// Find the first project whose repository URL contains `url`.
    /// Substring containment tolerates `.git` suffixes and scheme differences.
    /// When several projects match, the oldest one wins.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_first_by_repo_containing(&self, url: &str) -> anyhow::Result<Option<Project>> {
        let statement = "
            SELECT *
            FROM project
            WHERE instr(repo, $1) > 0
            ORDER BY id ASC
            LIMIT 1
        ";
        let row = match self.kind {
            DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Project>(statement)
                    .bind(url)
                    .fetch_optional(&mut *connection)
                    .await?
            }
        };
        Ok(row)
    }

    /// Find the `limit` most recently modified projects, newest first.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_recently_modified(&self, limit: i64) -> anyhow::Result<Vec<Project>> {
        let statement = "
            SELECT *
            FROM project
            ORDER BY modified_date DESC
            LIMIT $1
        ";
        let rows = match self.kind {
            DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Project>(statement)
                    .bind(limit)
                    .fetch_all(&mut *connection)
                    .await?
            }
        };
        Ok(rows)
    }

    /// Find all featured projects.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_featured(&self) -> anyhow::Result<Vec<Project>> {
        let statement = "
            SELECT *
            FROM project
            WHERE featured = 1
            ORDER BY name ASC
        ";
        let rows = match self.kind {
            DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Project>(statement)
                    .fetch_all(&mut *connection)
                    .await?
            }
        };
        Ok(rows)
    }
}

#[async_trait]
impl super::TxManager for DatabaseTransaction {
    /// Insert a new project into the database.
    ///
    /// # Errors
    /// Errors if the project cannot be inserted into the database.
    async fn create(&mut self, project: &Project) -> anyhow::Result<Option<i64>> {
        let statement = "
            INSERT INTO project ( slug, name, repo, repo_type, default_branch, default_version, documentation_type, featured, modified_date )
            VALUES ( $1, $2, $3, $4, $5, $6, $7, $8, $9 )
            RETURNING id
        ";
        let id: i64 = sqlx::query_scalar(statement)
            .bind(&project.slug)
            .bind(&project.name)
            .bind(&project.repo)
            .bind(&project.repo_type)
            .bind(project.default_branch.clone())
            .bind(&project.default_version)
            .bind(&project.documentation_type)
            .bind(project.featured)
            .bind(&project.modified_date)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(Some(id))
    }
}
