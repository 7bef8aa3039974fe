//! Resolution of documentation URLs to build artifacts.
//!
//! Documentation is only ever served under its canonical URL
//! `/docs/<project>/<lang>/<version>/<filename>`. Requests missing the
//! language or version are redirected there, so the canonical form is what
//! gets bookmarked and indexed.
use std::path::{Component, Path, PathBuf};

use url::Url;

use crate::db::models::project::{Project, BUILDS_DIR};

/// Language used when a request doesn't name one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Page served for a bare version URL.
pub const INDEX_FILE: &str = "index.html";

/// Where a documentation request leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocTarget {
    /// Redirect to the canonical URL.
    Redirect(String),
    /// Serve a built file.
    Serve(ResolvedFile),
}

/// A built file of a project version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Location of the file on disk.
    pub path: PathBuf,
    /// Location of the file relative to the front-end server's build root,
    /// used for accelerated transfer.
    pub internal_path: String,
    /// File name relative to the version's build root.
    pub filename: String,
}

/// Error resolving a documentation request.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum DocError {
    /// The filename escapes the version's build directory.
    #[display(fmt = "invalid documentation path '{}'", _0)]
    InvalidPath(String),
}

/// Canonical URL of `filename` in the given project, language and version.
///
/// Every segment is percent-encoded; slashes inside `filename` are kept.
#[must_use]
pub fn canonical_url(project_slug: &str, lang_slug: &str, version_slug: &str, filename: &str) -> String {
    let Ok(mut url) = Url::parse("http://docs.invalid/") else {
        return format!("/docs/{project_slug}/{lang_slug}/{version_slug}/{filename}");
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments
            .pop_if_empty()
            .extend(["docs", project_slug, lang_slug, version_slug])
            .extend(filename.split('/'));
    }
    url.path().to_owned()
}

/// Permanent redirect target for the legacy `/docs/<user>/<project>/<filename>` URLs.
#[must_use]
pub fn legacy_redirect(project: &Project, filename: &str) -> String {
    canonical_url(
        &project.slug,
        DEFAULT_LANGUAGE,
        &project.default_version,
        filename,
    )
}

/// Resolve a documentation request.
///
/// Missing `lang_slug` or `version_slug` redirect to the project's default
/// version in [`DEFAULT_LANGUAGE`].
///
/// # Errors
/// Errors if `filename` tries to leave the version's build directory.
pub fn resolve(
    project: &Project,
    lang_slug: Option<&str>,
    version_slug: Option<&str>,
    filename: &str,
    doc_root: &Path,
    accel_prefix: &str,
) -> Result<DocTarget, DocError> {
    let (Some(_), Some(version_slug)) = (
        lang_slug.filter(|lang| !lang.is_empty()),
        version_slug.filter(|version| !version.is_empty()),
    ) else {
        return Ok(DocTarget::Redirect(canonical_url(
            &project.slug,
            DEFAULT_LANGUAGE,
            &project.default_version,
            filename,
        )));
    };

    let filename = served_filename(project, filename);
    if !is_contained(&filename) || !is_contained(version_slug) {
        return Err(DocError::InvalidPath(filename));
    }
    let path = project
        .build_path(doc_root, version_slug)
        .join(&filename);
    let internal_path = format!(
        "{}/{}/{BUILDS_DIR}/{version_slug}/{filename}",
        accel_prefix.trim_end_matches('/'),
        project.slug,
    );
    Ok(DocTarget::Serve(ResolvedFile {
        path,
        internal_path,
        filename,
    }))
}

/// Name of the file to serve for the requested `filename`.
///
/// Directory-per-page builds serve `<dir>/index.html` for directory URLs.
/// Static assets, HTML files, search indexes and inventories are left alone.
#[must_use]
pub fn served_filename(project: &Project, filename: &str) -> String {
    if filename.is_empty() {
        return INDEX_FILE.to_owned();
    }
    if project.is_htmldir() && wants_index(filename) {
        let dir = filename.trim_end_matches('/');
        if dir.is_empty() {
            return INDEX_FILE.to_owned();
        }
        return format!("{dir}/{INDEX_FILE}");
    }
    filename.trim_end_matches('/').to_owned()
}

/// Whether a directory-per-page build should append the index page to `filename`.
fn wants_index(filename: &str) -> bool {
    let name = filename
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    !(filename.contains("_static")
        || filename.contains("html")
        || filename.contains("inv")
        || name.starts_with("searchindex"))
}

/// Whether `relative` stays inside the directory it is joined to.
fn is_contained(relative: &str) -> bool {
    Path::new(relative)
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}
