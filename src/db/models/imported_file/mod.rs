use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::{any::AnyRow, FromRow, Row as _};

use crate::resolver::docs::{canonical_url, DEFAULT_LANGUAGE};

pub mod manager;

/// Trait for managing imported files.
#[async_trait]
pub trait Manager {
    /// Pick a uniformly random imported file, optionally restricted to one project.
    async fn find_random(&self, project_slug: Option<&str>)
        -> anyhow::Result<Option<ImportedFile>>;
}

/// Trait for managing transactional imported files.
#[async_trait]
pub trait TxManager {
    /// Create an imported file.
    async fn create(
        &mut self,
        project: i64,
        version: Option<i64>,
        name: &str,
        path: &str,
    ) -> anyhow::Result<Option<i64>>;
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
/// Model for a documentation page imported from a build.
pub struct ImportedFile {
    /// Primary key.
    pub id: i64,
    /// Foreign key reference to the owning project.
    pub project: i64,
    /// Slug of the owning project.
    pub project_slug: String,
    /// Slug of the version the file was imported from.
    /// `latest` when the file is not tied to a version.
    pub version_slug: String,
    /// Page title.
    pub name: String,
    /// URL-safe identifier derived from the name.
    pub slug: String,
    /// Path of the page relative to the version's build root.
    pub path: String,
}

impl FromRow<'_, AnyRow> for ImportedFile {
    fn from_row(row: &AnyRow) -> anyhow::Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            project: row.try_get("project")?,
            project_slug: row.try_get("project_slug")?,
            version_slug: row.try_get("version_slug")?,
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            path: row.try_get("path")?,
        })
    }
}

impl ImportedFile {
    /// Canonical URL of the page.
    #[must_use]
    pub fn absolute_url(&self) -> String {
        canonical_url(
            &self.project_slug,
            DEFAULT_LANGUAGE,
            &self.version_slug,
            self.path.trim_start_matches('/'),
        )
    }
}

/// Turn a page name into a URL-safe slug.
#[must_use]
pub fn slugify(name: &str) -> String {
    lazy_static! {
        static ref NON_WORD: Regex = Regex::new(r"[^\w]+").expect("Failed to compile regex!?!");
    }
    NON_WORD
        .replace_all(&name.to_lowercase(), "-")
        .trim_matches('-')
        .to_owned()
}
