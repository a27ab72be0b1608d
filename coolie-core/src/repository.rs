use async_trait::async_trait;

use crate::booking::{NewBooking, StoredBooking};

/// One row of the bookings table keyed by column name.
pub type BookingRow = serde_json::Map<String, serde_json::Value>;

/// Repository trait for booking persistence
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert one booking and return it with its assigned identifier.
    async fn create_booking(
        &self,
        booking: NewBooking,
    ) -> Result<StoredBooking, Box<dyn std::error::Error + Send + Sync>>;

    /// All bookings, newest first, using the table's current column set.
    async fn list_bookings(
        &self,
    ) -> Result<Vec<BookingRow>, Box<dyn std::error::Error + Send + Sync>>;
}
