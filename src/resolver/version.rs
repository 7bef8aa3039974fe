//! Mapping of a pushed branch to the version it should rebuild.
use crate::db::models::{
    project::Project,
    version::{self, LATEST},
};

/// What a push to a branch should build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Build the version with primary key `version`, or `latest` when `None`.
    Build {
        /// Primary key of the version to build.
        version: Option<i64>,
        /// Slug reported back to the webhook caller.
        slug: String,
    },
    /// The branch belongs to an inactive version and must not be built.
    Inactive {
        /// The pushed branch.
        branch: String,
    },
}

/// Resolve `branch` of `project` to the version a push should build.
///
/// Pushes to the default branch always build `latest`. Pushes to a branch
/// without a version also build `latest`, leaving the choice of version
/// to the build system.
///
/// # Errors
/// Errors if the database can't be queried, or if the project has no
/// `latest` version to build a default-branch push as.
#[tracing::instrument(skip(db, project), fields(project = %project.slug))]
pub async fn resolve(
    db: &impl version::Manager,
    project: &Project,
    branch: &str,
) -> anyhow::Result<Resolution> {
    let Some(candidate) = db.find_by_branch_name(project.id, branch).await? else {
        tracing::info!("No version tracks '{branch}', building {LATEST}");
        return Ok(Resolution::Build {
            version: None,
            slug: LATEST.to_owned(),
        });
    };

    if candidate.branch_name() == project.effective_default_branch() {
        let Some(latest) = db.find_by_slug(project.id, LATEST).await? else {
            anyhow::bail!(
                "Project '{}' has no '{LATEST}' version for its default branch '{branch}'",
                project.slug
            );
        };
        tracing::info!("Default branch '{branch}' builds as {LATEST}");
        return Ok(Resolution::Build {
            version: Some(latest.id),
            slug: latest.slug,
        });
    }

    if !candidate.is_active() {
        tracing::info!("Not building inactive version {}", candidate.slug);
        return Ok(Resolution::Inactive {
            branch: branch.to_owned(),
        });
    }

    Ok(Resolution::Build {
        version: Some(candidate.id),
        slug: candidate.slug,
    })
}
