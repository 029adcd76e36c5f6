//! Server configuration: an optional TOML file overlaid with `FIELDPLAN_*`
//! environment variables.
//!
//! ```toml
//! host       = "0.0.0.0"
//! port       = 8080
//! store_path = "~/.local/share/fieldplan/fieldplan.db"
//!
//! [scheduling]
//! lunch_minutes       = 30
//! recovery_lookahead_days = 30
//! ```
//!
//! Nested keys use a double underscore in the environment, e.g.
//! `FIELDPLAN_SCHEDULING__VISIT_MINUTES=20`.

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, Source};
use fieldplan_core::capacity::SchedulingConfig;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  pub scheduling: SchedulingConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       8080,
      store_path: PathBuf::from("fieldplan.db"),
      scheduling: SchedulingConfig::default(),
    }
  }
}

/// The `FIELDPLAN_*` environment source.
pub fn environment() -> Environment {
  Environment::with_prefix("FIELDPLAN")
    .prefix_separator("_")
    .separator("__")
    .try_parsing(true)
}

/// Layer `file` and then `env` over the defaults.
pub fn load<F>(file: F, env: Environment) -> Result<ServerConfig, ConfigError>
where
  F: Source + Send + Sync + 'static,
{
  Config::builder()
    .add_source(file)
    .add_source(env)
    .build()?
    .try_deserialize()
}

#[cfg(test)]
mod tests {
  use config::{File, FileFormat};

  use super::*;

  fn no_env() -> Environment { environment().source(Some(Default::default())) }

  #[test]
  fn empty_config_uses_defaults() {
    let cfg = load(File::from_str("", FileFormat::Toml), no_env()).unwrap();
    assert_eq!(cfg, ServerConfig::default());
    assert_eq!(cfg.scheduling.daily_capacity(), 14);
  }

  #[test]
  fn file_overrides_nested_scheduling_keys() {
    let toml = r#"
      port = 9000

      [scheduling]
      visit_minutes = 25
      recovery_lookahead_days = 10
    "#;
    let cfg = load(File::from_str(toml, FileFormat::Toml), no_env()).unwrap();
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.scheduling.visit_minutes, 25);
    assert_eq!(cfg.scheduling.recovery_lookahead_days, 10);
    assert_eq!(cfg.scheduling.travel_minutes, 20);
    assert_eq!(cfg.scheduling.daily_capacity(), 11);
  }

  #[test]
  fn environment_wins_over_file() {
    let env = environment().source(Some(
      [
        ("FIELDPLAN_PORT", "7000"),
        ("FIELDPLAN_SCHEDULING__DAILY_CAPACITY_OVERRIDE", "6"),
      ]
      .into_iter()
      .map(|(k, v)| (k.to_owned(), v.to_owned()))
      .collect(),
    ));
    let cfg = load(File::from_str("port = 9000", FileFormat::Toml), env).unwrap();
    assert_eq!(cfg.port, 7000);
    assert_eq!(cfg.scheduling.daily_capacity(), 6);
  }

  #[test]
  fn missing_file_is_not_an_error() {
    let file = File::with_name("/nonexistent/fieldplan.toml").required(false);
    let cfg = load(file, no_env()).unwrap();
    assert_eq!(cfg.port, 8080);
  }
}
