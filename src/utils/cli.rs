//! Running the CLI

// Allow exits because in this file we ideally handle all errors with known exit codes
#![allow(clippy::exit)]

use crate::config::{Config, DEFAULT_CONFIG_PATH};
use crate::notify::ADMINS_TARGET;
use crate::server::app::serve;
use clap::Parser;
use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter, fmt, prelude::*, EnvFilter};

/// Docserve accepts post-commit webhooks and serves built documentation.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_PATH))]
    config: String,
    /// Docserve cli subcommands
    #[command(subcommand)]
    subcommands: Subcommands,
}

///
#[derive(Clone, clap::Subcommand)]
enum Subcommands {
    /// Serve webhooks and documentation
    Serve {
        /// Port on which to serve. Overrides the configured port.
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Log to stdout, filtered by `RUST_LOG` (default `info`).
/// Administrator notifications also go to a daily log in `admin_log_dir`.
fn init_tracing(admin_log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (admins, guard) = admin_log_dir.map_or((None, None), |dir| {
        let appender = tracing_appender::rolling::daily(dir, "admins.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer()
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(filter::Targets::new().with_target(ADMINS_TARGET, Level::ERROR));
        (Some(layer), Some(guard))
    });
    tracing_subscriber::registry()
        .with(fmt::layer().with_filter(env_filter))
        .with(admins)
        .init();
    guard
}

/// Main entrypoint to application
///
/// # Errors
/// Errors if the HTTP server can't bind or fails while running.
pub fn run() -> std::io::Result<()> {
    let cli = Cli::parse();
    let config = match Config::load(Path::new(&cli.config)) {
        Ok(config) => config,
        Err(err) => {
            let _guard = init_tracing(None);
            tracing::error!("error: could not load config `{}`: {err}", &cli.config);
            std::process::exit(1);
        }
    };
    let _guard = init_tracing(config.admin_log_dir.as_deref());
    tracing::debug!("Starting application");

    match cli.subcommands {
        Subcommands::Serve { port } => {
            let mut config = config;
            if let Some(port) = port {
                config.port = port;
            }
            serve(config)
        }
    }
}
