use serde::{Deserialize, Serialize};

use crate::fields::{FieldDefaults, FieldValue, BOOKING_FIELDS};
use crate::{CoreError, CoreResult};

/// Body of `POST /book`.
///
/// `country` is optional; when absent it is resolved from [`FieldDefaults`].
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    pub state: String,
    pub city: String,
    pub luggage_weight: f64,
    pub arrival_time: String,
    pub service_type: String,
}

impl BookingRequest {
    /// Validate and resolve defaults.
    pub fn into_record(self, defaults: &FieldDefaults) -> CoreResult<BookingRecord> {
        require_non_blank("name", &self.name)?;
        require_non_blank("state", &self.state)?;
        require_non_blank("city", &self.city)?;

        if !self.luggage_weight.is_finite() {
            return Err(CoreError::ValidationError(
                "luggage_weight must be a finite number".to_string(),
            ));
        }
        if self.luggage_weight < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "luggage_weight must not be negative (got {})",
                self.luggage_weight
            )));
        }

        let country = match self.country {
            Some(country) => country,
            None => defaults
                .get("country")
                .map(|v| v.to_string())
                .unwrap_or_default(),
        };

        Ok(BookingRecord {
            name: self.name,
            country,
            state: self.state,
            city: self.city,
            luggage_weight: self.luggage_weight,
            arrival_time: self.arrival_time,
            service_type: self.service_type,
        })
    }
}

fn require_non_blank(field: &str, value: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::ValidationError(format!("{} is required", field)));
    }
    Ok(())
}

/// Validated caller-supplied booking fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub name: String,
    pub country: String,
    pub state: String,
    pub city: String,
    pub luggage_weight: f64,
    pub arrival_time: String,
    pub service_type: String,
}

impl BookingRecord {
    /// Column/value pairs in [`BOOKING_FIELDS`] order.
    pub fn field_values(&self) -> Vec<(&'static str, FieldValue)> {
        let values = [
            FieldValue::text(self.name.clone()),
            FieldValue::text(self.country.clone()),
            FieldValue::text(self.state.clone()),
            FieldValue::text(self.city.clone()),
            FieldValue::Real(self.luggage_weight),
            FieldValue::text(self.arrival_time.clone()),
            FieldValue::text(self.service_type.clone()),
        ];
        BOOKING_FIELDS.iter().map(|f| f.name).zip(values).collect()
    }
}

/// A booking ready to be persisted: the record plus its derived columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBooking {
    #[serde(flatten)]
    pub record: BookingRecord,
    pub helper: String,
    pub fare: f64,
    pub timestamp: String,
}

impl NewBooking {
    pub fn new(record: BookingRecord, helper: String, fare: f64) -> Self {
        Self {
            record,
            helper,
            fare,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Every declared column with its value, derived columns last.
    pub fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        let mut columns = self.record.field_values();
        columns.push(("helper", FieldValue::text(self.helper.clone())));
        columns.push(("fare", FieldValue::Real(self.fare)));
        columns.push(("timestamp", FieldValue::text(self.timestamp.clone())));
        columns
    }

    pub fn into_stored(self, id: i64) -> StoredBooking {
        StoredBooking { id, booking: self }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredBooking {
    pub id: i64,
    #[serde(flatten)]
    pub booking: NewBooking,
}
