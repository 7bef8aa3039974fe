//! Run the docserve HTTP server.
#![allow(clippy::exit, clippy::module_name_repetitions)]
use crate::config::Config;
use crate::db;
use crate::notify::TracingNotifier;
use crate::server::api::state::App as AppState;
use crate::server::tracing::DocserveRootSpanBuilder;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{App, Error, HttpServer};

use std::{io, process, sync::Arc};

use actix_http::body::MessageBody;
use actix_service::ServiceFactory;
use tracing_actix_web::TracingLogger;

use crate::server::api::routes;

/// Serve webhooks and documentation with the given configuration.
#[actix_web::main]
pub async fn serve(config: Config) -> io::Result<()> {
    let bind = config.bind.clone();
    let port = config.port;
    let message = "Running docserve for builds in";
    tracing::info!(
        "{message} '{}' on http://{bind}:{port}.",
        config.doc_root.display()
    );

    let db = match db::init::connect(&config.database_url).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!(
                "error: could not connect to database. Confirm that DATABASE_URL env var or `database_url` is set correctly."
            );
            tracing::error!("Error: {:?}", err);
            process::exit(1);
        }
    };

    let queue = Arc::new(db.clone());
    let state = AppState::new(db, config, queue, Arc::new(TracingNotifier));

    HttpServer::new(move || {
        init_app(&state)
            .unwrap_or_else(|err| {
                tracing::error!("Unable to initialize app.");
                tracing::error!("Error: {:?}", err);
                process::exit(1);
            })
            .wrap(TracingLogger::<DocserveRootSpanBuilder>::new())
    })
    .bind((bind, port))?
    .run()
    .await
}

/// Initialize the application and all possible routing at start-up time.
///
/// # Arguments
/// * `state` - The application state
/// # Errors
/// Will error if unable to initialize the application
pub fn init_app(
    state: &AppState,
) -> anyhow::Result<
    App<
        impl ServiceFactory<
            ServiceRequest,
            Response = ServiceResponse<impl MessageBody>,
            Config = (),
            InitError = (),
            Error = Error,
        >,
    >,
> {
    let app = routes::register_app(App::new(), state)?;
    Ok(app)
}
