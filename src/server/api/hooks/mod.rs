//! Post-commit webhook endpoints.
//!
//! Webhook callers only ever get short plain-text answers. A build that was
//! not started, whether deliberately or because of a failure, answers 404.
use actix_web::{http::header::ContentType, web, HttpResponse};
use serde_derive::Deserialize;

use crate::{
    db::models::project,
    server::{errors::HTTPError, pages},
    webhook::{self, DispatchError, Failure, Outcome, Provider},
};

use super::state::{App as AppState, Global as _};

/// Largest accepted form body. Push events listing many commits get big.
pub const HOOK_FORM_LIMIT: usize = 5 * 1024 * 1024;

/// Form posted by GitHub and Bitbucket.
#[derive(Debug, Deserialize)]
pub struct HookForm {
    /// JSON-encoded event.
    pub payload: Option<String>,
}

/// Form posted to the generic build trigger.
#[derive(Debug, Deserialize)]
pub struct BuildForm {
    /// Version to build instead of `latest`.
    pub version_slug: Option<String>,
}

/// GitHub post-commit hook.
pub async fn github_build(
    data: web::Data<AppState>,
    form: Option<web::Form<HookForm>>,
) -> HttpResponse {
    let result = match payload(form, Provider::Github) {
        Ok(raw) => webhook::github(data.db(), data.queue(), &raw).await,
        Err(failure) => Err(failure),
    };
    reply(&data, result)
}

/// Bitbucket post-commit hook.
pub async fn bitbucket_build(
    data: web::Data<AppState>,
    form: Option<web::Form<HookForm>>,
) -> HttpResponse {
    let result = match payload(form, Provider::Bitbucket) {
        Ok(raw) => webhook::bitbucket(data.db(), data.queue(), &raw).await,
        Err(failure) => Err(failure),
    };
    reply(&data, result)
}

/// Explain how to set up post-commit hooks.
pub async fn post_commit_info() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(ContentType::html())
        .body(pages::POST_COMMIT)
}

/// Build trigger for any system that can `POST` to a URL.
///
/// An unknown project is a 404; an unknown `version_slug` is a server error.
#[tracing::instrument(skip(data, form))]
pub async fn generic_build(
    data: web::Data<AppState>,
    pk: web::Path<i64>,
    form: Option<web::Form<BuildForm>>,
) -> Result<HttpResponse, HTTPError> {
    let pk = pk.into_inner();
    let Some(project) = project::Manager::find_by_pk(data.db(), pk)
        .await
        .map_err(|err| {
            tracing::error!("Error looking up project {pk}: {err}");
            HTTPError::InternalServerError
        })?
    else {
        return Err(HTTPError::NotFound);
    };
    let version_slug = form.as_ref().and_then(|form| form.version_slug.as_deref());
    webhook::trigger(data.db(), data.queue(), &project, version_slug)
        .await
        .map_err(|err| {
            tracing::error!("Error triggering build of {}: {err}", project.slug);
            HTTPError::InternalServerError
        })?;
    Ok(plain_text(HttpResponse::Ok(), &Outcome::Started(None).message()))
}

/// Informational page of the generic build trigger.
pub async fn generic_build_info(
    data: web::Data<AppState>,
    pk: web::Path<i64>,
) -> Result<HttpResponse, HTTPError> {
    let pk = pk.into_inner();
    project::Manager::find_by_pk(data.db(), pk)
        .await
        .map_err(|err| {
            tracing::error!("Error looking up project {pk}: {err}");
            HTTPError::InternalServerError
        })?
        .ok_or(HTTPError::NotFound)?;
    Ok(post_commit_info().await)
}

/// Extract the raw JSON payload from the posted form.
fn payload(form: Option<web::Form<HookForm>>, provider: Provider) -> Result<String, Failure> {
    form.and_then(|form| form.into_inner().payload)
        .ok_or_else(|| Failure {
            provider,
            repository: None,
            error: DispatchError::Parse("missing 'payload' form field".to_owned()),
        })
}

/// Turn a dispatch result into the caller-facing answer.
fn reply(data: &AppState, result: Result<Outcome, Failure>) -> HttpResponse {
    match result {
        Ok(outcome @ Outcome::Started(_)) => plain_text(HttpResponse::Ok(), &outcome.message()),
        Ok(outcome @ Outcome::NotBuilding(_)) => {
            plain_text(HttpResponse::NotFound(), &outcome.message())
        }
        Err(failure) => {
            failure.report(data.notifier());
            plain_text(HttpResponse::NotFound(), "Build Failed")
        }
    }
}

/// Finish `builder` with a plain-text `body`.
fn plain_text(mut builder: actix_web::HttpResponseBuilder, body: &str) -> HttpResponse {
    builder
        .insert_header(ContentType::plaintext())
        .body(body.to_owned())
}
