pub mod booking;
pub mod fields;
pub mod repository;
pub mod translation;

pub use booking::{BookingRecord, BookingRequest, NewBooking, StoredBooking};
pub use fields::{FieldDefaults, FieldKind, FieldSpec, FieldValue};
pub use repository::{BookingRepository, BookingRow};
pub use translation::{TranslationError, Translator};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
