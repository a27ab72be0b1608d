use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use coolie_catalog::{AssignmentStrategy, DictionaryTranslator, FareEngine};
use coolie_core::{BookingRepository, FieldDefaults, Translator};
use coolie_store::app_config::{Config, TranslationProvider};
use coolie_store::{DbClient, HttpTranslator, SchemaManager, SqliteBookingRepository};

#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<dyn BookingRepository>,
    pub translator: Arc<dyn Translator>,
    pub fares: FareEngine,
    pub assigner: Arc<AssignmentStrategy>,
    pub field_defaults: Arc<FieldDefaults>,
}

impl AppState {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        translator: Arc<dyn Translator>,
        fares: FareEngine,
        assigner: AssignmentStrategy,
        field_defaults: FieldDefaults,
    ) -> Self {
        Self {
            bookings,
            translator,
            fares,
            assigner: Arc::new(assigner),
            field_defaults: Arc::new(field_defaults),
        }
    }

    /// Open the database, migrate the schema and wire up collaborators.
    /// Any failure here is fatal to startup.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let db = DbClient::new(&config.database)
            .await
            .with_context(|| format!("Failed to open database {}", config.database.url))?;

        let field_defaults = config.field_defaults();
        db.migrate(&SchemaManager::new(field_defaults.clone()))
            .await
            .context("Failed to migrate bookings schema")?;

        let assigner = config
            .assignment_strategy()
            .context("Invalid helper roster")?;

        let translator: Arc<dyn Translator> = match config.translation.provider {
            TranslationProvider::Dictionary => {
                Arc::new(DictionaryTranslator::new(config.dictionary()))
            }
            TranslationProvider::Http => Arc::new(
                HttpTranslator::new(&config.translation)
                    .context("Failed to build translation client")?,
            ),
        };

        info!(
            "Helper assignment: {}, translation: {}, fare: {} + {}/kg",
            assigner.name(),
            translator.provider(),
            config.fare.base,
            config.fare.rate_per_kg
        );

        Ok(Self::new(
            Arc::new(SqliteBookingRepository::new(db.pool.clone())),
            translator,
            FareEngine::new(config.fare),
            assigner,
            field_defaults,
        ))
    }
}
