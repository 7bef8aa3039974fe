//! Centralized state management for the Actix web server
use std::{fmt, sync::Arc};

use crate::{build::Queue, config::Config, db, notify::Notifier};

/// Global, read-only state
pub trait Global {
    /// Database connection
    fn db(&self) -> &db::DatabaseConnection;
    /// Server configuration
    fn config(&self) -> &Config;
    /// Destination of build jobs
    fn queue(&self) -> &dyn Queue;
    /// Receiver of administrator notifications
    fn notifier(&self) -> &dyn Notifier;
}

/// Application state
///
/// Every collaborator is passed in at construction, so tests can swap the
/// queue or the notifier.
#[derive(Clone)]
pub struct App {
    /// Database connection
    pub db: db::DatabaseConnection,
    /// Server configuration
    pub config: Arc<Config>,
    /// Destination of build jobs
    pub queue: Arc<dyn Queue>,
    /// Receiver of administrator notifications
    pub notifier: Arc<dyn Notifier>,
}

impl App {
    /// Create the application state.
    #[must_use]
    pub fn new(
        db: db::DatabaseConnection,
        config: Config,
        queue: Arc<dyn Queue>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            db,
            config: Arc::new(config),
            queue,
            notifier,
        }
    }
}

impl Global for App {
    fn db(&self) -> &db::DatabaseConnection {
        &self.db
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn queue(&self) -> &dyn Queue {
        self.queue.as_ref()
    }

    fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }
}

impl fmt::Debug for App {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "App serving builds from {} ({})",
            self.config.doc_root.display(),
            if self.config.debug { "debug" } else { "accelerated" }
        )
    }
}
