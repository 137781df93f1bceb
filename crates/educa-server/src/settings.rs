//! Runtime configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. defaults for the selected [`Environment`]
//! 2. the TOML file given with `--config` (optional)
//! 3. `EDUCA_`-prefixed environment variables, `__` between nested keys,
//!    e.g. `EDUCA_DATABASE__PATH=/var/lib/educa/educa.db`

use std::{fmt, path::{Path, PathBuf}};

use clap::ValueEnum;
use config::{
  Config, ConfigBuilder, Environment as EnvSource, File, builder::DefaultState,
};
use serde::Deserialize;
use thiserror::Error;

/// Redis location shared by the cache and the real-time layer in production.
pub const PRODUCTION_REDIS_URL: &str = "redis://cache:6379";

#[derive(Debug, Error)]
pub enum SettingsError {
  #[error("configuration error: {0}")]
  Load(#[from] config::ConfigError),

  #[error("{0} must be set in the {1} environment")]
  Missing(&'static str, Environment),

  #[error("invalid {key}: {value:?}")]
  Invalid { key: &'static str, value: String },
}

// ─── Environment ─────────────────────────────────────────────────────────────

/// The deployment environment, chosen at process start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
  #[default]
  Development,
  Production,
}

impl Environment {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Development => "development",
      Self::Production => "production",
    }
  }
}

impl fmt::Display for Environment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Sections ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfig {
  /// SQLite file. Required in production.
  pub path: Option<PathBuf>,
}

/// Where the response cache lives. Provisioned only; no handler caches yet.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  /// `local` for a per-process cache, or a `redis://` URL.
  pub location: String,
}

/// Backend of the real-time messaging layer. Provisioned only.
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
  /// `memory` for an in-process layer, or `redis://` URLs.
  pub hosts: Vec<String>,
}

/// A parsed backend location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
  InProcess,
  Redis(String),
}

impl fmt::Display for Backend {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::InProcess => f.write_str("in-process"),
      Self::Redis(url) => write!(f, "redis at {url}"),
    }
  }
}

fn parse_backend(
  key: &'static str,
  value: &str,
  in_process: &str,
) -> Result<Backend, SettingsError> {
  if value == in_process {
    Ok(Backend::InProcess)
  } else if value.starts_with("redis://") || value.starts_with("rediss://") {
    Ok(Backend::Redis(value.to_owned()))
  } else {
    Err(SettingsError::Invalid { key, value: value.to_owned() })
  }
}

impl CacheConfig {
  pub fn backend(&self) -> Result<Backend, SettingsError> {
    parse_backend("cache.location", &self.location, "local")
  }
}

impl RealtimeConfig {
  pub fn backends(&self) -> Result<Vec<Backend>, SettingsError> {
    self
      .hosts
      .iter()
      .map(|h| parse_backend("realtime.hosts", h, "memory"))
      .collect()
  }
}

/// `EDUCA_` variables; `__` separates nested keys and `,` list items.
fn env_source() -> EnvSource {
  EnvSource::with_prefix("EDUCA")
    .prefix_separator("_")
    .separator("__")
    .list_separator(",")
    .with_list_parse_key("realtime.hosts")
    .try_parsing(true)
}

// ─── AppConfig ───────────────────────────────────────────────────────────────

/// Complete runtime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  #[serde(skip)]
  pub environment: Environment,
  pub host:        String,
  pub port:        u16,
  #[serde(default)]
  pub database:    DatabaseConfig,
  pub cache:       CacheConfig,
  pub realtime:    RealtimeConfig,
}

impl AppConfig {
  /// Load configuration for `environment` from defaults, `path` (if it
  /// exists) and the process environment.
  pub fn load(environment: Environment, path: &Path) -> Result<Self, SettingsError> {
    Self::load_with(environment, path, env_source())
  }

  fn load_with(
    environment: Environment,
    path: &Path,
    vars: EnvSource,
  ) -> Result<Self, SettingsError> {
    let builder = Self::defaults(environment)?
      .add_source(File::from(path).required(false))
      .add_source(vars);
    Self::from_builder(environment, builder)
  }

  /// Defaults for `environment`, before any file or variable is applied.
  pub fn defaults(
    environment: Environment,
  ) -> Result<ConfigBuilder<DefaultState>, SettingsError> {
    let builder = Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8000)?;

    let builder = match environment {
      Environment::Development => builder
        .set_default("database.path", "educa.db")?
        .set_default("cache.location", "local")?
        .set_default("realtime.hosts", vec!["memory"])?,
      Environment::Production => builder
        .set_default("host", "0.0.0.0")?
        .set_default("cache.location", PRODUCTION_REDIS_URL)?
        .set_default("realtime.hosts", vec![PRODUCTION_REDIS_URL])?,
    };
    Ok(builder)
  }

  /// Build, deserialise and validate.
  pub fn from_builder(
    environment: Environment,
    builder: ConfigBuilder<DefaultState>,
  ) -> Result<Self, SettingsError> {
    let mut cfg: AppConfig = builder.build()?.try_deserialize()?;
    cfg.environment = environment;
    cfg.validate()?;
    Ok(cfg)
  }

  fn validate(&self) -> Result<(), SettingsError> {
    if self.database.path.is_none() {
      return Err(SettingsError::Missing("database.path", self.environment));
    }
    self.cache.backend()?;
    self.realtime.backends()?;
    Ok(())
  }

  /// The SQLite file to open; present once validated.
  pub fn database_path(&self) -> Result<&Path, SettingsError> {
    self
      .database
      .path
      .as_deref()
      .ok_or(SettingsError::Missing("database.path", self.environment))
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

#[cfg(test)]
mod tests {
  use super::*;
  use config::{FileFormat, Map};

  fn with_toml(environment: Environment, toml: &str) -> Result<AppConfig, SettingsError> {
    let builder = AppConfig::defaults(environment)
      .unwrap()
      .add_source(File::from_str(toml, FileFormat::Toml));
    AppConfig::from_builder(environment, builder)
  }

  #[test]
  fn development_defaults_are_self_contained() {
    let cfg = with_toml(Environment::Development, "").unwrap();
    assert_eq!(cfg.environment, Environment::Development);
    assert_eq!(cfg.address(), "127.0.0.1:8000");
    assert_eq!(cfg.database_path().unwrap(), Path::new("educa.db"));
    assert_eq!(cfg.cache.backend().unwrap(), Backend::InProcess);
    assert_eq!(cfg.realtime.backends().unwrap(), vec![Backend::InProcess]);
  }

  #[test]
  fn production_requires_a_database_path() {
    let err = with_toml(Environment::Production, "").unwrap_err();
    assert!(matches!(err, SettingsError::Missing("database.path", Environment::Production)));
  }

  #[test]
  fn production_uses_redis_for_cache_and_realtime() {
    let cfg = with_toml(
      Environment::Production,
      "[database]\npath = \"/var/lib/educa/educa.db\"\n",
    )
    .unwrap();
    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.cache.backend().unwrap(), Backend::Redis(PRODUCTION_REDIS_URL.into()));
    assert_eq!(
      cfg.realtime.backends().unwrap(),
      vec![Backend::Redis(PRODUCTION_REDIS_URL.into())]
    );
  }

  #[test]
  fn file_overrides_defaults() {
    let cfg = with_toml(
      Environment::Development,
      "port = 9000\n[cache]\nlocation = \"redis://localhost:6379\"\n",
    )
    .unwrap();
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.cache.backend().unwrap(), Backend::Redis("redis://localhost:6379".into()));
  }

  #[test]
  fn unknown_cache_scheme_is_rejected() {
    let err = with_toml(
      Environment::Development,
      "[cache]\nlocation = \"memcached://localhost\"\n",
    )
    .unwrap_err();
    assert!(matches!(err, SettingsError::Invalid { key: "cache.location", .. }));
  }

  fn with_vars(environment: Environment, vars: &[(&str, &str)]) -> Result<AppConfig, SettingsError> {
    let vars: Map<String, String> =
      vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    AppConfig::load_with(
      environment,
      Path::new("/nonexistent/educa.toml"),
      env_source().source(Some(vars)),
    )
  }

  #[test]
  fn production_reads_settings_from_the_environment() {
    let cfg = with_vars(Environment::Production, &[
      ("EDUCA_DATABASE__PATH", "/var/lib/educa/educa.db"),
      ("EDUCA_CACHE__LOCATION", "redis://cache-a:6379"),
      ("EDUCA_REALTIME__HOSTS", "redis://rt-a:6379,redis://rt-b:6379"),
      ("EDUCA_PORT", "9100"),
    ])
    .unwrap();
    assert_eq!(cfg.database_path().unwrap(), Path::new("/var/lib/educa/educa.db"));
    assert_eq!(cfg.port, 9100);
    assert_eq!(cfg.cache.backend().unwrap(), Backend::Redis("redis://cache-a:6379".into()));
    assert_eq!(cfg.realtime.backends().unwrap(), vec![
      Backend::Redis("redis://rt-a:6379".into()),
      Backend::Redis("redis://rt-b:6379".into()),
    ]);
  }

  #[test]
  fn unprefixed_and_double_underscore_prefixed_variables_are_ignored() {
    let err = with_vars(Environment::Production, &[
      ("DATABASE__PATH", "/tmp/a.db"),
      ("EDUCA__DATABASE__PATH", "/tmp/b.db"),
    ])
    .unwrap_err();
    assert!(matches!(err, SettingsError::Missing("database.path", Environment::Production)));
  }
}
