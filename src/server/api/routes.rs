//! A central place to register App routes.
use actix_service::ServiceFactory;
use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    guard, http::header, web, App, Error,
};

use crate::server::errors::not_found;

use super::{
    docs::{legacy_serve_docs, serve_docs},
    home::{homepage, random_page},
    hooks::{
        bitbucket_build, generic_build, generic_build_info, github_build, post_commit_info,
        HOOK_FORM_LIMIT,
    },
    state::{App as AppState, Global as _},
};

/// Two-letter language segment of documentation URLs.
const LANG_PATTERN: &str = "{lang_slug:[a-z]{2}}";

/// Version segment of documentation URLs.
const VERSION_PATTERN: &str = "{version_slug:[-._\\w]+}";

#[expect(
    clippy::literal_string_with_formatting_args,
    reason = "Actix Web resource path uses `{param}` syntax which is not formatting but route pattern matching"
)]
/// Central place to register all the App routing.
///
/// `/docs`, the random pages and the build triggers come first so a project
/// subdomain never shadows them. Project subdomains come before the
/// homepage, so that `<project>.<domain>/` serves the project's docs.
///
/// # Errors
/// Errors if the routes can't be built from the configuration.
#[tracing::instrument(skip(app, state))]
pub fn register_app<
    U: MessageBody,
    V: ServiceFactory<
        ServiceRequest,
        Response = ServiceResponse<U>,
        Config = (),
        InitError = (),
        Error = Error,
    >,
>(
    mut app: App<V>,
    state: &AppState,
) -> anyhow::Result<App<V>> {
    let hook_form = web::FormConfig::default().limit(HOOK_FORM_LIMIT);
    app = app
        .app_data(web::Data::new(state.clone()))
        .service(docs_scope())
        .service(web::resource("/random/").route(web::get().to(random_page)))
        .service(web::resource("/random/{project_slug}/").route(web::get().to(random_page)))
        .service(
            web::resource("/github-hook/")
                .app_data(hook_form.clone())
                .route(web::post().to(github_build))
                .route(web::get().to(post_commit_info)),
        )
        .service(
            web::resource("/bitbucket-hook/")
                .app_data(hook_form)
                .route(web::post().to(bitbucket_build))
                .route(web::get().to(post_commit_info)),
        )
        .service(
            web::resource("/build/{pk}/")
                .route(web::post().to(generic_build))
                .route(web::get().to(generic_build_info)),
        );

    if state.config().public_domain.is_some() {
        app = initialize_subdomain_routes(app, state);
    }

    app = app
        .service(web::resource("/").route(web::get().to(homepage)))
        .default_service(web::to(not_found));
    Ok(app)
}

/// Canonical, partial and legacy documentation URLs.
#[expect(
    clippy::literal_string_with_formatting_args,
    reason = "Actix Web resource path uses `{param}` syntax which is not formatting but route pattern matching"
)]
fn docs_scope() -> actix_web::Scope {
    web::scope("/docs")
        .service(doc_resource(&format!(
            "/{{project_slug}}/{LANG_PATTERN}/{VERSION_PATTERN}/{{filename:.*}}"
        )))
        .service(doc_resource(&format!(
            "/{{project_slug}}/{LANG_PATTERN}/{VERSION_PATTERN}"
        )))
        .service(doc_resource("/{project_slug}/"))
        .service(doc_resource("/{project_slug}"))
        .service(
            web::resource("/{username}/{project_slug}/{filename:.*}")
                .route(web::get().to(legacy_serve_docs))
                .route(web::head().to(legacy_serve_docs)),
        )
}

/// Routes serving a project's docs from `<project>.<public_domain>`.
#[expect(
    clippy::literal_string_with_formatting_args,
    reason = "Actix Web resource path uses `{param}` syntax which is not formatting but route pattern matching"
)]
fn initialize_subdomain_routes<
    U: MessageBody,
    V: ServiceFactory<
        ServiceRequest,
        Response = ServiceResponse<U>,
        Config = (),
        InitError = (),
        Error = Error,
    >,
>(
    app: App<V>,
    state: &AppState,
) -> App<V> {
    tracing::info!(
        "Serving project subdomains of {}",
        state.config().public_domain.as_deref().unwrap_or_default()
    );
    let config = state.config.clone();
    let on_project_subdomain = guard::fn_guard(move |ctx| {
        ctx.head()
            .headers()
            .get(header::HOST)
            .and_then(|host| host.to_str().ok())
            .and_then(|host| config.subdomain_slug(host))
            .is_some()
    });
    app.service(
        web::scope("")
            .guard(on_project_subdomain)
            .service(doc_resource(&format!(
                "/{LANG_PATTERN}/{VERSION_PATTERN}/{{filename:.*}}"
            )))
            .service(doc_resource(&format!("/{LANG_PATTERN}/{VERSION_PATTERN}")))
            .service(doc_resource("/{filename:.*}")),
    )
}

/// GET and HEAD resource serving docs at `path`.
fn doc_resource(path: &str) -> actix_web::Resource {
    web::resource(path)
        .route(web::get().to(serve_docs))
        .route(web::head().to(serve_docs))
}
