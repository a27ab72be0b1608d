use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};
use tracing::debug;

use coolie_core::{BookingRepository, BookingRow, NewBooking, StoredBooking};

use crate::schema::{bind_value, validate_identifier, BOOKINGS_TABLE};

/// Booking store over the evolving `bookings` table.
///
/// Assumes the schema manager has already run for the current declaration.
pub struct SqliteBookingRepository {
    pool: SqlitePool,
}

impl SqliteBookingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepository {
    async fn create_booking(
        &self,
        booking: NewBooking,
    ) -> Result<StoredBooking, Box<dyn std::error::Error + Send + Sync>> {
        let columns = booking.columns();
        for (name, _) in &columns {
            validate_identifier(name)?;
        }

        let names = columns
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            BOOKINGS_TABLE, names, placeholders
        );

        let mut query = sqlx::query(&sql);
        for (_, value) in &columns {
            query = bind_value(query, value);
        }

        let id = query.execute(&self.pool).await?.last_insert_rowid();
        debug!("Inserted booking {}", id);

        Ok(booking.into_stored(id))
    }

    async fn list_bookings(
        &self,
    ) -> Result<Vec<BookingRow>, Box<dyn std::error::Error + Send + Sync>> {
        let sql = format!("SELECT * FROM {} ORDER BY id DESC", BOOKINGS_TABLE);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        let bookings = rows
            .iter()
            .map(row_to_map)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(bookings)
    }
}

/// Decode every column of `row` by the SQLite type of its stored value.
pub(crate) fn row_to_map(row: &SqliteRow) -> Result<BookingRow, sqlx::Error> {
    let mut map = BookingRow::new();

    for column in row.columns() {
        let idx = column.ordinal();
        let raw = row.try_get_raw(idx)?;

        let value = if raw.is_null() {
            Value::Null
        } else {
            let type_name = raw.type_info().name().to_string();
            match type_name.as_str() {
                "INTEGER" => Value::from(row.try_get::<i64, _>(idx)?),
                "REAL" => Value::from(row.try_get::<f64, _>(idx)?),
                "BLOB" => Value::from(row.try_get::<Vec<u8>, _>(idx)?),
                _ => Value::from(row.try_get::<String, _>(idx)?),
            }
        };

        map.insert(column.name().to_string(), value);
    }

    Ok(map)
}
