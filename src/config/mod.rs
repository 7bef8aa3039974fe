//! Server configuration, read from a TOML file.
use serde_derive::{Deserialize, Serialize};
use std::env;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "docserve.toml";

/// Path prefix of the internal location the front-end server maps to the build output root.
pub const DEFAULT_ACCEL_PREFIX: &str = "/user_builds";

/// Runtime configuration of the docserve server.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Database URL, e.g. `sqlite:///var/lib/docserve/db.sqlite3?mode=rwc`.
    /// Overridden by the `DATABASE_URL` environment variable.
    pub database_url: String,
    /// Address to bind the HTTP server to.
    pub bind: String,
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// When set, documentation files are streamed from disk by the app itself
    /// instead of being handed to the front-end server.
    pub debug: bool,
    /// Root directory holding every project's build output.
    pub doc_root: PathBuf,
    /// Internal location prefix used in `X-Accel-Redirect` headers.
    pub accel_prefix: String,
    /// Domain under which projects are served on their own subdomain,
    /// e.g. `readthedocs.org` serves `<project>.readthedocs.org`.
    pub public_domain: Option<String>,
    /// Directory for the daily-rolling administrator notification log.
    pub admin_log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://docserve.sqlite3?mode=rwc".to_owned(),
            bind: "127.0.0.1".to_owned(),
            port: 8080,
            debug: false,
            doc_root: PathBuf::from("user_builds"),
            accel_prefix: DEFAULT_ACCEL_PREFIX.to_owned(),
            public_domain: None,
            admin_log_dir: None,
        }
    }
}

impl Config {
    /// Parse a configuration from its TOML source.
    ///
    /// # Errors
    /// Will error if the TOML is malformed or a key has the wrong type.
    pub fn from_toml(source: &str) -> anyhow::Result<Self> {
        let conf: Self = toml::from_str(source)?;
        Ok(conf)
    }

    /// Load the configuration at `path`.
    ///
    /// A missing file yields the default configuration. `DATABASE_URL`
    /// takes precedence over the file's `database_url`.
    ///
    /// # Errors
    /// Will error if the file exists but can't be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut conf = if path.exists() {
            let config_str = read_to_string(path)?;
            Self::from_toml(&config_str)?
        } else {
            tracing::info!(
                "No config file at '{}', using defaults",
                path.to_string_lossy()
            );
            Self::default()
        };
        if let Ok(db_url) = env::var("DATABASE_URL") {
            conf.database_url = db_url;
        }
        Ok(conf)
    }

    /// Extract the project slug from a request host served on a project subdomain.
    ///
    /// Returns `None` when no public domain is configured, or when `host`
    /// is the bare public domain or some other host.
    #[must_use]
    pub fn subdomain_slug(&self, host: &str) -> Option<String> {
        let domain = self.public_domain.as_deref()?;
        let host = host.split(':').next().unwrap_or(host);
        let slug = host.strip_suffix(domain)?.strip_suffix('.')?;
        if slug.is_empty() || slug.contains('.') || slug == "www" {
            return None;
        }
        Some(slug.to_owned())
    }
}
