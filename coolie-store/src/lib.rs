pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod error;
pub mod schema;
pub mod translate_client;

pub use booking_repo::SqliteBookingRepository;
pub use database::DbClient;
pub use error::StoreError;
pub use schema::{MigrationReport, SchemaManager};
pub use translate_client::HttpTranslator;
