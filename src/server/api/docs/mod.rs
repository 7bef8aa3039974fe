//! API endpoint for serving built documentation.
use actix_files::NamedFile;
use actix_web::{
    http::header::{self, ContentType, HeaderValue},
    web, HttpRequest, HttpResponse,
};

use crate::{
    db::models::project::{self, Project},
    resolver::docs::{self, DocTarget, ResolvedFile},
    server::{errors::HTTPError, headers::HTTP_X_ACCEL_REDIRECT},
    utils::http::{accel_redirect_value, guess_type},
};

use super::state::{App as AppState, Global as _};

/// Serve a documentation file.
///
/// The project comes from the `project_slug` path segment, or from the
/// request's subdomain when served as `<project>.<public_domain>`.
#[tracing::instrument(skip(req, data), fields(path = %req.path()))]
pub async fn serve_docs(
    req: HttpRequest,
    data: web::Data<AppState>,
) -> Result<HttpResponse, HTTPError> {
    let path_slug = req.match_info().get("project_slug").map(ToOwned::to_owned);
    let project_slug = match path_slug {
        Some(ref slug) => slug.clone(),
        None => data
            .config()
            .subdomain_slug(req.connection_info().host())
            .ok_or(HTTPError::NotFound)?,
    };
    let project = match find_project(&data, &project_slug).await {
        Ok(project) => project,
        Err(HTTPError::NotFound) if path_slug.is_some() => {
            return legacy_fallback(&req, &data).await;
        }
        Err(err) => return Err(err),
    };
    let config = data.config();
    let target = docs::resolve(
        &project,
        req.match_info().get("lang_slug"),
        req.match_info().get("version_slug"),
        req.match_info().get("filename").unwrap_or_default(),
        &config.doc_root,
        &config.accel_prefix,
    )
    .map_err(|err| {
        tracing::debug!("{err}");
        HTTPError::NotFound
    })?;
    match target {
        DocTarget::Redirect(url) => Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, url))
            .finish()),
        DocTarget::Serve(file) if config.debug => stream(&req, &file).await,
        DocTarget::Serve(file) => accelerate(&file),
    }
}

/// Permanently redirect the legacy `/docs/<username>/<project>/<filename>` URLs.
#[tracing::instrument(skip(req, data), fields(path = %req.path()))]
pub async fn legacy_serve_docs(
    req: HttpRequest,
    data: web::Data<AppState>,
) -> Result<HttpResponse, HTTPError> {
    let project_slug = req.match_info().get("project_slug").unwrap_or_default();
    let project = find_project(&data, project_slug).await?;
    let filename = req.match_info().get("filename").unwrap_or_default();
    Ok(HttpResponse::MovedPermanently()
        .insert_header((header::LOCATION, docs::legacy_redirect(&project, filename)))
        .finish())
}

/// Retry a `/docs/<a>/<b>/<c>...` request that named no known project as the
/// legacy `/docs/<username>/<project>/<filename>` form.
///
/// A two-letter project slug makes the legacy form look like a canonical
/// URL with `<b>` as the language.
async fn legacy_fallback(req: &HttpRequest, data: &AppState) -> Result<HttpResponse, HTTPError> {
    let info = req.match_info();
    let (Some(project_slug), Some(version_slug)) = (info.get("lang_slug"), info.get("version_slug"))
    else {
        return Err(HTTPError::NotFound);
    };
    let project = find_project(data, project_slug).await?;
    let filename = match info.get("filename") {
        Some(rest) => format!("{version_slug}/{rest}"),
        None => version_slug.to_owned(),
    };
    Ok(HttpResponse::MovedPermanently()
        .insert_header((header::LOCATION, docs::legacy_redirect(&project, &filename)))
        .finish())
}

/// Look up the project by slug, or 404.
async fn find_project(data: &AppState, slug: &str) -> Result<Project, HTTPError> {
    project::Manager::find_by_slug(data.db(), slug)
        .await
        .map_err(|err| {
            tracing::error!("Error looking up project '{slug}': {err}");
            HTTPError::InternalServerError
        })?
        .ok_or(HTTPError::NotFound)
}

/// Hand the file over to the front-end server with `X-Accel-Redirect`.
fn accelerate(file: &ResolvedFile) -> Result<HttpResponse, HTTPError> {
    let (mime, encoding) = guess_type(&file.filename);
    let Some(location) = accel_redirect_value(&file.internal_path) else {
        tracing::debug!("Can't send '{}' as a header", file.internal_path);
        return Err(HTTPError::NotFound);
    };
    let mut response = HttpResponse::Ok();
    response
        .insert_header(ContentType(mime))
        .insert_header((HTTP_X_ACCEL_REDIRECT, location));
    if let Some(encoding) = encoding {
        response.insert_header((header::CONTENT_ENCODING, HeaderValue::from_static(encoding)));
    }
    Ok(response.finish())
}

/// Stream the file from disk, for running without a front-end server.
async fn stream(req: &HttpRequest, file: &ResolvedFile) -> Result<HttpResponse, HTTPError> {
    let (mime, encoding) = guess_type(&file.filename);
    let named = NamedFile::open_async(&file.path).await.map_err(|err| {
        tracing::debug!("{}: {err}", file.path.display());
        HTTPError::NotFound
    })?;
    let mut response = named.set_content_type(mime).into_response(req);
    if let Some(encoding) = encoding {
        response
            .headers_mut()
            .insert(header::CONTENT_ENCODING, HeaderValue::from_static(encoding));
    }
    Ok(response)
}
