//! Configuration for iradio.
//!
//! Values are layered with `figment`, lowest precedence first:
//!
//! 1. built-in defaults,
//! 2. `config.toml` in the platform configuration directory, if present,
//! 3. an explicit configuration file (TOML, YAML or JSON, by extension),
//! 4. `IRADIO_`-prefixed environment variables, nested with `__`
//!    (`IRADIO_SITE__URL`, `IRADIO_DATABASE__PATH`, ...).
//!
//! ```toml
//! [site]
//! url = "https://www.internet-radio.com/"
//! timeout_secs = 30
//!
//! [database]
//! path = "/var/lib/iradio/iradio.sqlite3"
//! destination = "public"
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "iradio";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DATABASE_FILE_NAME: &str = "iradio.sqlite3";
pub const ENV_PREFIX: &str = "IRADIO_";

pub const DEFAULT_SITE_URL: &str = "https://www.internet-radio.com/";
pub const DEFAULT_USER_AGENT: &str = concat!("iradio/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DESTINATION: &str = "public";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub database: DatabaseConfig,
}

/// The radio directory being scraped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory root; category pages live under `<url>stations/`.
    pub url: String,
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}
impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SITE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
impl SiteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file, created on first use.
    pub path: PathBuf,
    /// Schema that `update` merges every snapshot into.
    pub destination: String,
}
impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: default_database_path(), destination: DEFAULT_DESTINATION.to_string() }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

/// The platform data directory, or the working directory when the platform
/// has none (no home directory).
fn default_database_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME))
}

/// Location of the per-user configuration file, if the platform has one.
pub fn user_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

impl Config {
    /// Load from every layer, with an optional explicit file on top of the
    /// per-user one.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let user = user_config_path();
        Self::from_figment(Self::figment(user.as_deref(), explicit)?)
    }

    /// Build the layered provider without extracting it.
    ///
    /// A missing per-user file is skipped; a missing explicit file is an
    /// error.
    pub fn figment(user: Option<&Path>, explicit: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = user {
            figment = figment.merge(Toml::file(path));
        }
        if let Some(path) = explicit {
            if !path.is_file() {
                exn::bail!(ErrorKind::Load);
            }
            tracing::debug!(path = %path.display(), "Using configuration file");
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => figment.merge(Toml::file(path)),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let mut config: Config = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.normalize()?;
        Ok(config)
    }

    /// Validate values and fix up the ones that can be fixed.
    fn normalize(&mut self) -> Result<()> {
        let url = self.site.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            exn::bail!(ErrorKind::Invalid("site.url"));
        }
        self.site.url = url.to_string();
        if !self.site.url.ends_with('/') {
            tracing::warn!(url = %self.site.url, "Site URL has no trailing '/', appending one");
            self.site.url.push('/');
        }
        if self.site.user_agent.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("site.user_agent"));
        }
        if self.site.timeout_secs == 0 {
            exn::bail!(ErrorKind::Invalid("site.timeout_secs"));
        }
        if self.database.path.as_os_str().is_empty() {
            exn::bail!(ErrorKind::Invalid("database.path"));
        }
        if self.database.destination.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("database.destination"));
        }
        Ok(())
    }
}
