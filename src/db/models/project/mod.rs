use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{any::AnyRow, FromRow, Row as _};
use std::path::{Path, PathBuf};

pub mod manager;

/// Documentation type whose HTML output uses one directory per page.
pub const SPHINX_HTMLDIR: &str = "sphinx_htmldir";

/// Name of the directory holding every built version of a project.
pub const BUILDS_DIR: &str = "rtd-builds";

/// Trait for managing projects.
#[async_trait]
pub trait Manager {
    /// Find a project by primary key.
    async fn find_by_pk(&self, pk: i64) -> anyhow::Result<Option<Project>>;
    /// Find a project by its unique slug.
    async fn find_by_slug(&self, slug: &str) -> anyhow::Result<Option<Project>>;
    /// Find the first project whose `repo` contains `url`.
    async fn find_first_by_repo_containing(&self, url: &str) -> anyhow::Result<Option<Project>>;
    /// Find the `limit` most recently modified projects.
    async fn find_recently_modified(&self, limit: i64) -> anyhow::Result<Vec<Project>>;
    /// Find all featured projects.
    async fn find_featured(&self) -> anyhow::Result<Vec<Project>>;
}

/// Trait for managing transactional projects.
#[async_trait]
pub trait TxManager {
    /// Create a project.
    async fn create(&mut self, project: &Project) -> anyhow::Result<Option<i64>>;
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
/// Model for a project.
pub struct Project {
    /// Primary key.
    pub id: i64,
    /// Unique, URL-safe identifier of the project.
    pub slug: String,
    /// Human readable name.
    pub name: String,
    /// Source-control URL of the project's repository.
    pub repo: String,
    /// Version control system of the repository, e.g. `git` or `hg`.
    pub repo_type: String,
    /// Branch that builds as `latest`. Falls back to the VCS default when unset.
    pub default_branch: Option<String>,
    /// Version slug visitors are redirected to when none is given.
    pub default_version: String,
    /// Builder used for the documentation, e.g. `sphinx` or `sphinx_htmldir`.
    pub documentation_type: String,
    /// Whether the project is listed on the homepage.
    /// Stored as 0/1.
    pub featured: i64,
    /// Last modification date, RFC 3339.
    pub modified_date: String,
}

impl FromRow<'_, AnyRow> for Project {
    fn from_row(row: &AnyRow) -> anyhow::Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            slug: row.try_get("slug")?,
            name: row.try_get("name")?,
            repo: row.try_get("repo")?,
            repo_type: row.try_get("repo_type")?,
            default_branch: row.try_get("default_branch").ok(),
            default_version: row.try_get("default_version")?,
            documentation_type: row.try_get("documentation_type")?,
            featured: row.try_get("featured")?,
            modified_date: row.try_get("modified_date")?,
        })
    }
}

impl Project {
    /// Create a new git project with the default settings.
    #[must_use]
    pub fn new(slug: &str, name: &str, repo: &str) -> Self {
        Self {
            id: 0,
            slug: slug.to_owned(),
            name: name.to_owned(),
            repo: repo.to_owned(),
            repo_type: "git".to_owned(),
            default_branch: None,
            default_version: "latest".to_owned(),
            documentation_type: "sphinx".to_owned(),
            featured: 0,
            modified_date: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Branch the repository checks out when none is configured.
    #[must_use]
    pub fn fallback_branch(&self) -> &'static str {
        match self.repo_type.as_str() {
            "hg" => "default",
            "bzr" | "svn" => "trunk",
            _ => "master",
        }
    }

    /// Branch whose commits build as `latest`.
    #[must_use]
    pub fn effective_default_branch(&self) -> &str {
        self.default_branch
            .as_deref()
            .filter(|branch| !branch.is_empty())
            .unwrap_or_else(|| self.fallback_branch())
    }

    /// Whether the project is built with the directory-per-page HTML builder.
    #[must_use]
    pub fn is_htmldir(&self) -> bool {
        self.documentation_type == SPHINX_HTMLDIR
    }

    /// Directory holding the built HTML of `version` under `doc_root`.
    #[must_use]
    pub fn build_path(&self, doc_root: &Path, version: &str) -> PathBuf {
        doc_root.join(&self.slug).join(BUILDS_DIR).join(version)
    }
}
