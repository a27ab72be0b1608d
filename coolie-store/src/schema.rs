//! Additive schema evolution for the `bookings` table.
//!
//! The table starts as a bare `id` column and grows one column per declared
//! field. When a column is added to a table that already holds rows, those
//! rows are backfilled from [`FieldDefaults`] in the same transaction, and
//! the column is recorded in `schema_migrations` so the backfill is a
//! one-time step.

use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqlitePool};
use sqlx::{Executor, Row, Sqlite};
use tracing::{debug, info};

use coolie_core::fields::{declared_fields, SCHEMA_VERSION};
use coolie_core::{FieldDefaults, FieldSpec, FieldValue};
use coolie_shared::models::events::SchemaMigratedEvent;

use crate::error::StoreError;

pub const BOOKINGS_TABLE: &str = "bookings";
pub const MIGRATIONS_TABLE: &str = "schema_migrations";

/// What a call to [`SchemaManager::ensure`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub added_columns: Vec<String>,
    pub backfilled_rows: u64,
}

impl MigrationReport {
    pub fn is_empty(&self) -> bool {
        self.added_columns.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SchemaManager {
    fields: Vec<FieldSpec>,
    defaults: FieldDefaults,
    version: u32,
}

impl SchemaManager {
    /// Manager for the current booking declaration.
    pub fn new(defaults: FieldDefaults) -> Self {
        Self {
            fields: declared_fields().copied().collect(),
            defaults,
            version: SCHEMA_VERSION,
        }
    }

    /// Manager for an explicit field list, e.g. an older or newer revision.
    pub fn with_fields(fields: Vec<FieldSpec>, defaults: FieldDefaults, version: u32) -> Self {
        Self { fields, defaults, version }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Bring the table up to the declaration. Idempotent; all-or-nothing.
    pub async fn ensure(&self, pool: &SqlitePool) -> Result<MigrationReport, StoreError> {
        for spec in &self.fields {
            validate_identifier(spec.name)?;
        }

        let mut tx = pool.begin().await?;

        let create_bookings = format!(
            "CREATE TABLE IF NOT EXISTS {} (id INTEGER PRIMARY KEY AUTOINCREMENT)",
            BOOKINGS_TABLE
        );
        sqlx::query(&create_bookings).execute(&mut *tx).await?;

        let create_migrations = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                column_name TEXT PRIMARY KEY,
                schema_version INTEGER NOT NULL,
                backfilled_rows INTEGER NOT NULL,
                applied_at TEXT NOT NULL
            )",
            MIGRATIONS_TABLE
        );
        sqlx::query(&create_migrations).execute(&mut *tx).await?;

        let existing = table_columns(&mut *tx, BOOKINGS_TABLE).await?;
        debug!("Existing {} columns: {:?}", BOOKINGS_TABLE, existing);

        let mut report = MigrationReport::default();

        for spec in &self.fields {
            if existing.iter().any(|c| c == spec.name) {
                continue;
            }

            let alter = format!(
                "ALTER TABLE {} ADD COLUMN {} {}",
                BOOKINGS_TABLE,
                spec.name,
                spec.kind.sql_type()
            );
            sqlx::query(&alter).execute(&mut *tx).await?;

            let mut backfilled = 0;
            if let Some(value) = self.defaults.backfill_for(spec) {
                let update = format!("UPDATE {} SET {} = ?", BOOKINGS_TABLE, spec.name);
                backfilled = bind_value(sqlx::query(&update), &value)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected();
            }

            let record = format!(
                "INSERT OR REPLACE INTO {} (column_name, schema_version, backfilled_rows, applied_at)
                 VALUES (?, ?, ?, ?)",
                MIGRATIONS_TABLE
            );
            sqlx::query(&record)
                .bind(spec.name)
                .bind(self.version as i64)
                .bind(backfilled as i64)
                .bind(chrono::Utc::now().to_rfc3339())
                .execute(&mut *tx)
                .await?;

            info!(
                "Added column {}.{} ({}), backfilled {} rows",
                BOOKINGS_TABLE,
                spec.name,
                spec.kind.sql_type(),
                backfilled
            );
            report.added_columns.push(spec.name.to_string());
            report.backfilled_rows += backfilled;
        }

        tx.commit().await?;

        if !report.is_empty() {
            let event = SchemaMigratedEvent::new(
                self.version,
                report.added_columns.clone(),
                report.backfilled_rows,
            );
            info!(?event, "Schema migrated");
        }

        Ok(report)
    }
}

/// Column names of `table`, in table order.
pub async fn table_columns<'e, E>(executor: E, table: &str) -> Result<Vec<String>, StoreError>
where
    E: Executor<'e, Database = Sqlite>,
{
    validate_identifier(table)?;
    let pragma = format!("PRAGMA table_info({})", table);
    let rows = sqlx::query(&pragma).fetch_all(executor).await?;

    rows.iter()
        .map(|row| row.try_get::<String, _>("name").map_err(StoreError::from))
        .collect()
}

/// Column and table names are interpolated into SQL, so only plain identifiers pass.
pub fn validate_identifier(name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidIdentifier(name.to_string()))
    }
}

pub(crate) fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &FieldValue,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        FieldValue::Text(s) => query.bind(s.clone()),
        FieldValue::Real(r) => query.bind(*r),
        FieldValue::Integer(i) => query.bind(*i),
        FieldValue::Boolean(b) => query.bind(*b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking_repo::row_to_map;
    use crate::database::DbClient;
    use coolie_core::BookingRow;
    use coolie_core::fields::{FieldKind, BOOKING_FIELDS, DERIVED_FIELDS};

    async fn all_rows(pool: &SqlitePool) -> Vec<BookingRow> {
        let rows = sqlx::query("SELECT * FROM bookings ORDER BY id")
            .fetch_all(pool)
            .await
            .unwrap();
        rows.iter().map(|row| row_to_map(row).unwrap()).collect()
    }

    #[tokio::test]
    async fn test_fresh_database_gets_every_declared_column() {
        let db = DbClient::in_memory().await.unwrap();
        let manager = SchemaManager::new(FieldDefaults::default());

        let report = manager.ensure(&db.pool).await.unwrap();

        let columns = table_columns(&db.pool, BOOKINGS_TABLE).await.unwrap();
        let mut expected = vec!["id".to_string()];
        expected.extend(declared_fields().map(|f| f.name.to_string()));
        assert_eq!(columns, expected);
        assert_eq!(report.added_columns.len(), BOOKING_FIELDS.len() + DERIVED_FIELDS.len());
        assert_eq!(report.backfilled_rows, 0);
    }

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let db = DbClient::in_memory().await.unwrap();
        let manager = SchemaManager::new(FieldDefaults::default());
        manager.ensure(&db.pool).await.unwrap();

        sqlx::query("INSERT INTO bookings (name, city, fare) VALUES ('Asha', 'Gwalior', 55.0)")
            .execute(&db.pool)
            .await
            .unwrap();
        let columns_before = table_columns(&db.pool, BOOKINGS_TABLE).await.unwrap();
        let rows_before = all_rows(&db.pool).await;

        let report = manager.ensure(&db.pool).await.unwrap();

        assert!(report.is_empty());
        assert_eq!(table_columns(&db.pool, BOOKINGS_TABLE).await.unwrap(), columns_before);
        assert_eq!(all_rows(&db.pool).await, rows_before);
    }

    #[tokio::test]
    async fn test_new_field_backfills_existing_rows() {
        let db = DbClient::in_memory().await.unwrap();
        let v1 = vec![
            FieldSpec::input("name", FieldKind::Text),
            FieldSpec::input("city", FieldKind::Text),
        ];
        SchemaManager::with_fields(v1.clone(), FieldDefaults::default(), 1)
            .ensure(&db.pool)
            .await
            .unwrap();

        for name in ["Asha", "Ravi"] {
            sqlx::query("INSERT INTO bookings (name, city) VALUES (?, 'Gwalior')")
                .bind(name)
                .execute(&db.pool)
                .await
                .unwrap();
        }

        let mut defaults = FieldDefaults::default();
        defaults.insert("vip", FieldValue::Boolean(false));
        let mut v2 = v1.clone();
        v2.push(FieldSpec::input("country", FieldKind::Text));
        v2.push(FieldSpec::input("vip", FieldKind::Boolean));
        v2.push(FieldSpec::input("gate", FieldKind::Text));
        v2.push(FieldSpec::derived("helper", FieldKind::Text));

        let report = SchemaManager::with_fields(v2, defaults, 2)
            .ensure(&db.pool)
            .await
            .unwrap();

        assert_eq!(report.added_columns, vec!["country", "vip", "gate", "helper"]);
        // country, vip and helper each backfill two rows; gate has no default
        assert_eq!(report.backfilled_rows, 6);

        let rows = sqlx::query("SELECT name, city, country, vip, gate, helper FROM bookings ORDER BY id")
            .fetch_all(&db.pool)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        for (row, name) in rows.iter().zip(["Asha", "Ravi"]) {
            assert_eq!(row.get::<String, _>("name"), name);
            assert_eq!(row.get::<String, _>("city"), "Gwalior");
            assert_eq!(row.get::<String, _>("country"), "India");
            assert_eq!(row.get::<i64, _>("vip"), 0);
            assert_eq!(row.get::<Option<String>, _>("gate"), None);
            assert_eq!(row.get::<String, _>("helper"), "");
        }

        let recorded: Vec<(String, i64)> =
            sqlx::query_as("SELECT column_name, schema_version FROM schema_migrations WHERE schema_version = 2 ORDER BY column_name")
                .fetch_all(&db.pool)
                .await
                .unwrap();
        assert_eq!(
            recorded,
            vec![
                ("country".to_string(), 2),
                ("gate".to_string(), 2),
                ("helper".to_string(), 2),
                ("vip".to_string(), 2),
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_field_name_aborts_before_changes() {
        let db = DbClient::in_memory().await.unwrap();
        let fields = vec![
            FieldSpec::input("name", FieldKind::Text),
            FieldSpec::input("city; DROP TABLE bookings", FieldKind::Text),
        ];

        let err = SchemaManager::with_fields(fields, FieldDefaults::default(), 1)
            .ensure(&db.pool)
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::InvalidIdentifier(_)));
        assert!(table_columns(&db.pool, BOOKINGS_TABLE).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_backfill_rolls_back_every_step() {
        let db = DbClient::in_memory().await.unwrap();
        let v1 = vec![FieldSpec::input("name", FieldKind::Text)];
        SchemaManager::with_fields(v1.clone(), FieldDefaults::default(), 1)
            .ensure(&db.pool)
            .await
            .unwrap();

        sqlx::query("INSERT INTO bookings (name) VALUES ('Asha')")
            .execute(&db.pool)
            .await
            .unwrap();
        sqlx::query(
            "CREATE TRIGGER reject_updates BEFORE UPDATE ON bookings
             BEGIN SELECT RAISE(ABORT, 'backfill rejected'); END",
        )
        .execute(&db.pool)
        .await
        .unwrap();

        // gate has no default and is added before country fails to backfill
        let mut v2 = v1.clone();
        v2.push(FieldSpec::input("gate", FieldKind::Text));
        v2.push(FieldSpec::input("country", FieldKind::Text));

        let err = SchemaManager::with_fields(v2, FieldDefaults::default(), 2)
            .ensure(&db.pool)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("backfill rejected"));

        assert_eq!(
            table_columns(&db.pool, BOOKINGS_TABLE).await.unwrap(),
            vec!["id".to_string(), "name".to_string()]
        );
        let (recorded,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM schema_migrations WHERE schema_version = 2")
                .fetch_one(&db.pool)
                .await
                .unwrap();
        assert_eq!(recorded, 0);
    }

    #[test]
    fn test_identifier_rules() {
        assert!(validate_identifier("luggage_weight").is_ok());
        assert!(validate_identifier("_x1").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("1abc").is_err());
        assert!(validate_identifier("a-b").is_err());
        assert!(validate_identifier("a b").is_err());
    }
}
