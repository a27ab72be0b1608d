use serde::{Deserialize, Serialize};

use crate::pii::Masked;

/// Emitted (as a structured log record) after a booking row is committed.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BookingCreatedEvent {
    pub booking_id: i64,
    pub passenger: Masked<String>,
    pub city: String,
    pub helper: String,
    pub fare: f64,
    pub created_at: String,
}

/// Emitted once per startup when the schema manager changed the bookings table.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SchemaMigratedEvent {
    pub schema_version: u32,
    pub added_columns: Vec<String>,
    pub backfilled_rows: u64,
    pub migrated_at: i64,
}

impl SchemaMigratedEvent {
    pub fn new(schema_version: u32, added_columns: Vec<String>, backfilled_rows: u64) -> Self {
        Self {
            schema_version,
            added_columns,
            backfilled_rows,
            migrated_at: chrono::Utc::now().timestamp(),
        }
    }
}
