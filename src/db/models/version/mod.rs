use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{any::AnyRow, FromRow, Row as _};

pub mod manager;

/// Slug of the version built from the project's default branch.
pub const LATEST: &str = "latest";

/// Prefix remote-tracking branches are recorded under.
pub const REMOTE_BRANCH_PREFIX: &str = "remotes/origin/";

/// Trait for managing versions.
#[async_trait]
pub trait Manager {
    /// Find the version of `project` tracking the branch or tag `branch`.
    async fn find_by_branch_name(
        &self,
        project: i64,
        branch: &str,
    ) -> anyhow::Result<Option<Version>>;
    /// Find the version of `project` with the given slug.
    async fn find_by_slug(&self, project: i64, slug: &str) -> anyhow::Result<Option<Version>>;
}

/// Trait for managing transactional versions.
#[async_trait]
pub trait TxManager {
    /// Create a new version.
    async fn create(&mut self, version: &Version) -> anyhow::Result<Option<i64>>;
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
/// Model for a version.
pub struct Version {
    /// Primary key.
    pub id: i64,
    /// Foreign key reference to the owning project.
    pub project: i64,
    /// Identifier of the version in URLs, unique within the project.
    pub slug: String,
    /// Branch or tag name the version is built from.
    pub identifier: String,
    /// Display name.
    pub verbose_name: String,
    /// Whether webhooks may trigger builds of this version.
    /// Stored as 0/1.
    pub active: i64,
}

impl FromRow<'_, AnyRow> for Version {
    fn from_row(row: &AnyRow) -> anyhow::Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            project: row.try_get("project")?,
            slug: row.try_get("slug")?,
            identifier: row.try_get("identifier")?,
            verbose_name: row.try_get("verbose_name")?,
            active: row.try_get("active")?,
        })
    }
}

impl Version {
    /// Create a new, active version of `project` built from `identifier`.
    #[must_use]
    pub fn new(project: i64, slug: &str, identifier: &str) -> Self {
        Self {
            id: 0,
            project,
            slug: slug.to_owned(),
            identifier: identifier.to_owned(),
            verbose_name: slug.to_owned(),
            active: 1,
        }
    }

    /// Whether webhooks may trigger builds of this version.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active != 0
    }

    /// Name of the branch the version is built from, without any remote prefix.
    #[must_use]
    pub fn branch_name(&self) -> &str {
        self.identifier
            .strip_prefix(REMOTE_BRANCH_PREFIX)
            .unwrap_or(&self.identifier)
    }
}
