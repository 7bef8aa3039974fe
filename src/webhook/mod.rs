//! Webhook dispatch: from a provider's post-commit payload to a queued build.
//!
//! A payload either starts a build, is deliberately not built because its
//! branch belongs to an inactive version, or fails. Failures of every kind
//! go through [`Failure::report`], so no payload can escape the handler as
//! a raw fault.
use std::fmt;

use crate::{
    build::{BuildJob, Queue},
    db::{
        models::{
            project::{self, Project},
            version::{self, LATEST},
        },
        DatabaseConnection,
    },
    notify::Notifier,
    resolver::version::{resolve, Resolution},
};

use self::payload::{BitbucketPayload, GithubPayload};

pub mod payload;

/// Subject of administrator notifications about failed webhook builds.
pub const FAILURE_SUBJECT: &str = "Build Failure";

/// Source-control provider a webhook came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// GitHub push events.
    Github,
    /// Bitbucket post-commit hooks.
    Bitbucket,
}

impl fmt::Display for Provider {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Github => write!(formatter, "github"),
            Self::Bitbucket => write!(formatter, "bitbucket"),
        }
    }
}

/// Result of a successfully handled webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A build was queued, at the given slug when the provider reports one.
    Started(Option<String>),
    /// The branch belongs to an inactive version; nothing was queued.
    NotBuilding(String),
}

impl Outcome {
    /// Plain-text message returned to the webhook caller.
    #[must_use]
    pub fn message(&self) -> String {
        match *self {
            Self::Started(Some(ref slug)) => format!("Build Started: {slug}"),
            Self::Started(None) => "Build Started".to_owned(),
            Self::NotBuilding(ref branch) => format!("Not Building: {branch}"),
        }
    }
}

/// Why a webhook did not result in a build.
#[derive(Debug, derive_more::Display)]
pub enum DispatchError {
    /// The payload is missing, not JSON, or lacks expected keys.
    #[display(fmt = "malformed payload: {}", _0)]
    Parse(String),
    /// No project's repository matches the payload's repository URL.
    #[display(fmt = "no project with a repository matching '{}'", _0)]
    ProjectNotFound(String),
    /// The project or version lookup failed.
    #[display(fmt = "lookup failed: {}", _0)]
    Lookup(anyhow::Error),
    /// The build queue did not accept the job.
    #[display(fmt = "enqueue failed: {}", _0)]
    Enqueue(anyhow::Error),
}

impl DispatchError {
    /// Short name of the error kind, for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match *self {
            Self::Parse(_) => "parse",
            Self::ProjectNotFound(_) => "project_not_found",
            Self::Lookup(_) => "lookup",
            Self::Enqueue(_) => "enqueue",
        }
    }
}

/// A webhook that failed to build, with what is known about its origin.
#[derive(Debug)]
pub struct Failure {
    /// Provider that sent the webhook.
    pub provider: Provider,
    /// Repository name from the payload, when it could be read.
    pub repository: Option<String>,
    /// What went wrong.
    pub error: DispatchError,
}

impl Failure {
    /// Log the failure and notify the administrators.
    pub fn report(&self, notifier: &dyn Notifier) {
        tracing::warn!(
            provider = %self.provider,
            kind = self.error.kind(),
            "Webhook build failed: {}",
            self.error
        );
        let repository = self.repository.as_deref().unwrap_or("<unknown repository>");
        notifier.notify(
            FAILURE_SUBJECT,
            &format!(
                "{repository} failed to build via {}.\n\n{}",
                self.provider, self.error
            ),
        );
    }
}

/// Handle a GitHub push event.
///
/// # Errors
/// Errors if the payload can't be parsed, no project matches it, or the
/// build can't be resolved or queued.
#[tracing::instrument(name = "Github Build", skip(db, queue, raw))]
pub async fn github(
    db: &DatabaseConnection,
    queue: &dyn Queue,
    raw: &str,
) -> Result<Outcome, Failure> {
    let fail = |repository: Option<String>, error| Failure {
        provider: Provider::Github,
        repository,
        error,
    };
    let payload: GithubPayload = serde_json::from_str(raw)
        .map_err(|err| fail(repository_name_hint(raw), DispatchError::Parse(err.to_string())))?;
    let name = payload.repository.name.clone();
    let url = payload.normalized_url();
    let branch = payload.branch();
    tracing::info!("{url}:{branch}");

    let project = find_project(db, &url)
        .await
        .map_err(|err| fail(Some(name.clone()), err))?;
    let resolution = resolve(db, &project, branch)
        .await
        .map_err(|err| fail(Some(name.clone()), DispatchError::Lookup(err)))?;
    match resolution {
        Resolution::Inactive { branch } => Ok(Outcome::NotBuilding(branch)),
        Resolution::Build { version, slug } => {
            tracing::info!("Building {}:{slug}", project.slug);
            queue
                .enqueue(&BuildJob::forced(project.id, version))
                .await
                .map_err(|err| fail(Some(name), DispatchError::Enqueue(err)))?;
            Ok(Outcome::Started(Some(slug)))
        }
    }
}

/// Handle a Bitbucket post-commit hook.
///
/// Bitbucket payloads always force a build of `latest`.
///
/// # Errors
/// Errors if the payload can't be parsed, no project matches it, or the
/// build can't be queued.
#[tracing::instrument(name = "Bitbucket Build", skip(db, queue, raw))]
pub async fn bitbucket(
    db: &DatabaseConnection,
    queue: &dyn Queue,
    raw: &str,
) -> Result<Outcome, Failure> {
    let fail = |repository: Option<String>, error| Failure {
        provider: Provider::Bitbucket,
        repository,
        error,
    };
    let payload: BitbucketPayload = serde_json::from_str(raw)
        .map_err(|err| fail(repository_name_hint(raw), DispatchError::Parse(err.to_string())))?;
    let name = payload.repository.name.clone();
    let url = payload.normalized_url();
    tracing::info!("{url}");

    let project = find_project(db, &url)
        .await
        .map_err(|err| fail(Some(name.clone()), err))?;
    tracing::info!("Building {}:{LATEST}", project.slug);
    queue
        .enqueue(&BuildJob::forced(project.id, None))
        .await
        .map_err(|err| fail(Some(name), DispatchError::Enqueue(err)))?;
    Ok(Outcome::Started(None))
}

/// Queue a forced build of `project`, at `version_slug` when given, else `latest`.
///
/// # Errors
/// Errors if `version_slug` names no version of the project, or the build
/// can't be queued.
#[tracing::instrument(skip(db, queue, project), fields(project = %project.slug))]
pub async fn trigger(
    db: &DatabaseConnection,
    queue: &dyn Queue,
    project: &Project,
    version_slug: Option<&str>,
) -> anyhow::Result<()> {
    let version = match version_slug.filter(|slug| !slug.is_empty()) {
        Some(slug) => {
            let Some(version) = version::Manager::find_by_slug(db, project.id, slug).await? else {
                anyhow::bail!("Project '{}' has no version '{slug}'", project.slug);
            };
            Some(version.id)
        }
        None => None,
    };
    queue.enqueue(&BuildJob::forced(project.id, version)).await
}

/// Find the project whose repository matches the normalized `url`.
async fn find_project(db: &DatabaseConnection, url: &str) -> Result<Project, DispatchError> {
    if url.is_empty() {
        return Err(DispatchError::ProjectNotFound(url.to_owned()));
    }
    project::Manager::find_first_by_repo_containing(db, url)
        .await
        .map_err(DispatchError::Lookup)?
        .ok_or_else(|| DispatchError::ProjectNotFound(url.to_owned()))
}

/// Best-effort read of `repository.name` from a payload that failed to parse.
fn repository_name_hint(raw: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    value
        .pointer("/repository/name")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}
