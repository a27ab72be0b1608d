use serde::Deserialize;
use std::collections::HashMap;
use std::env;

use coolie_catalog::{AssignmentStrategy, Dictionary, FareConfig, Helper, Roster, RosterError};
use coolie_core::{FieldDefaults, FieldValue};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub fare: FareConfig,
    #[serde(default)]
    pub assignment: AssignmentConfig,
    /// Replaces the built-in helper roster when present.
    #[serde(default)]
    pub roster: Option<Vec<Helper>>,
    #[serde(default)]
    pub schema: SchemaConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 { 5 }

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentKind {
    #[default]
    CityCode,
    Roster,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AssignmentConfig {
    #[serde(default)]
    pub strategy: AssignmentKind,
}

/// Per-field backfill values layered over the built-in ones (`country = "India"`).
/// Only `country` doubles as a request default; other fields stay required.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SchemaConfig {
    #[serde(default)]
    pub defaults: HashMap<String, FieldValue>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TranslationProvider {
    #[default]
    Dictionary,
    Http,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TranslationConfig {
    #[serde(default)]
    pub provider: TranslationProvider,
    /// LibreTranslate-compatible `/translate` endpoint
    #[serde(default = "default_translation_url")]
    pub url: String,
    pub api_key: Option<String>,
    #[serde(default = "default_translation_timeout")]
    pub timeout_seconds: u64,
    /// Extra words merged into the built-in dictionary, keyed by language.
    #[serde(default)]
    pub dictionary: HashMap<String, HashMap<String, String>>,
}

fn default_translation_url() -> String { "https://libretranslate.com/translate".to_string() }
fn default_translation_timeout() -> u64 { 10 }

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            url: default_translation_url(),
            api_key: None,
            timeout_seconds: default_translation_timeout(),
            dictionary: HashMap::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `COOLIE__SERVER__PORT=9000`
            .add_source(config::Environment::with_prefix("COOLIE").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn field_defaults(&self) -> FieldDefaults {
        FieldDefaults::with_overrides(self.schema.defaults.clone())
    }

    pub fn dictionary(&self) -> Dictionary {
        Dictionary::with_entries(self.translation.dictionary.clone())
    }

    pub fn roster(&self) -> Result<Roster, RosterError> {
        match &self.roster {
            Some(helpers) => Roster::new(helpers.clone()),
            None => Ok(Roster::default()),
        }
    }

    pub fn assignment_strategy(&self) -> Result<AssignmentStrategy, RosterError> {
        Ok(match self.assignment.strategy {
            AssignmentKind::CityCode => AssignmentStrategy::CityCode,
            AssignmentKind::Roster => AssignmentStrategy::Roster(self.roster()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(src: &str) -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(src, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = from_toml(
            r#"
            [server]
            port = 8080

            [database]
            url = "sqlite::memory:"
            "#,
        );

        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.fare, FareConfig::default());
        assert_eq!(config.assignment.strategy, AssignmentKind::CityCode);
        assert_eq!(config.translation.provider, TranslationProvider::Dictionary);
        assert_eq!(config.translation.timeout_seconds, 10);
        assert_eq!(config.field_defaults().get("country"), Some(&FieldValue::text("India")));
        assert!(matches!(config.assignment_strategy().unwrap(), AssignmentStrategy::CityCode));
    }

    #[test]
    fn test_full_config() {
        let config = from_toml(
            r#"
            [server]
            port = 9000

            [database]
            url = "sqlite://bookings.db?mode=rwc"
            max_connections = 2

            [fare]
            base = 40.0

            [assignment]
            strategy = "roster"

            [[roster]]
            name = "Kiran"
            rating = 4.9
            station = "Agra"

            [schema.defaults]
            service_type = "porter"

            [translation]
            provider = "http"
            url = "http://localhost:5000/translate"
            timeout_seconds = 3
            "#,
        );

        assert_eq!(config.fare.base, 40.0);
        assert_eq!(config.fare.rate_per_kg, 2.5);
        assert_eq!(config.translation.provider, TranslationProvider::Http);
        assert_eq!(config.translation.timeout_seconds, 3);

        let defaults = config.field_defaults();
        assert_eq!(defaults.get("service_type"), Some(&FieldValue::text("porter")));
        assert_eq!(defaults.get("country"), Some(&FieldValue::text("India")));

        match config.assignment_strategy().unwrap() {
            AssignmentStrategy::Roster(roster) => {
                assert_eq!(roster.helpers().len(), 1);
                assert!(roster.contains("Kiran"));
            }
            other => panic!("unexpected strategy {:?}", other),
        }
    }

    #[test]
    fn test_unnamed_roster_helper_is_rejected() {
        let config = from_toml(
            r#"
            [server]
            port = 8080

            [database]
            url = "sqlite::memory:"

            [assignment]
            strategy = "roster"

            [[roster]]
            name = " "
            rating = 4.0
            station = "Agra"
            "#,
        );

        assert!(matches!(
            config.assignment_strategy(),
            Err(RosterError::UnnamedHelper { .. })
        ));
    }
}
