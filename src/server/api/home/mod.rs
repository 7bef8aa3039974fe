//! Homepage and random page discovery.
use actix_web::{http::header, web, HttpRequest, HttpResponse};
use serde::Serialize;

use crate::{
    db::models::{
        imported_file,
        project::{self, Project},
    },
    resolver::docs::{canonical_url, DEFAULT_LANGUAGE},
    server::errors::HTTPError,
};

use super::state::{App as AppState, Global as _};

/// Number of recently modified projects listed on the homepage.
pub const LATEST_PROJECTS: i64 = 10;

/// A project as listed on the homepage.
#[derive(Debug, Serialize)]
pub struct ProjectSummary {
    /// Project slug.
    pub slug: String,
    /// Project name.
    pub name: String,
    /// Canonical URL of the project's default version.
    pub url: String,
    /// Last modification date, RFC 3339.
    pub modified_date: String,
}

impl From<Project> for ProjectSummary {
    fn from(project: Project) -> Self {
        let url = canonical_url(
            &project.slug,
            DEFAULT_LANGUAGE,
            &project.default_version,
            "",
        );
        Self {
            slug: project.slug,
            name: project.name,
            url,
            modified_date: project.modified_date,
        }
    }
}

/// Homepage listing.
#[derive(Debug, Serialize)]
pub struct Homepage {
    /// The most recently modified projects, newest first.
    pub project_list: Vec<ProjectSummary>,
    /// All featured projects.
    pub featured_list: Vec<ProjectSummary>,
}

/// Homepage: recently modified and featured projects.
#[tracing::instrument(skip(data))]
pub async fn homepage(data: web::Data<AppState>) -> Result<HttpResponse, HTTPError> {
    let db = data.db();
    let latest = project::Manager::find_recently_modified(db, LATEST_PROJECTS)
        .await
        .map_err(|err| {
            tracing::error!("Error listing recent projects: {err}");
            HTTPError::InternalServerError
        })?;
    let featured = project::Manager::find_featured(db).await.map_err(|err| {
        tracing::error!("Error listing featured projects: {err}");
        HTTPError::InternalServerError
    })?;
    Ok(HttpResponse::Ok().json(Homepage {
        project_list: latest.into_iter().map(Into::into).collect(),
        featured_list: featured.into_iter().map(Into::into).collect(),
    }))
}

/// Redirect to a random documentation page, optionally within one project.
#[tracing::instrument(skip(req, data))]
pub async fn random_page(
    req: HttpRequest,
    data: web::Data<AppState>,
) -> Result<HttpResponse, HTTPError> {
    let project_slug = req.match_info().get("project_slug");
    let file = imported_file::Manager::find_random(data.db(), project_slug)
        .await
        .map_err(|err| {
            tracing::error!("Error picking a random page: {err}");
            HTTPError::InternalServerError
        })?
        .ok_or(HTTPError::NotFound)?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, file.absolute_url()))
        .finish())
}
