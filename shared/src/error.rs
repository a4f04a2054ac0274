//! Error types for the shared crate
//!
//! Only the raw-record boundary can fail. Anything past normalization is
//! absorbed into numeric fallbacks by the engine.

use thiserror::Error;

/// Raised while normalizing a raw record into a strict model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("Record is missing an id")]
    MissingId,

    #[error("Booking {id} has no event date")]
    MissingEventDate { id: String },

    #[error("Booking {id} has an invalid event date: {value}")]
    InvalidEventDate { id: String, value: String },

    #[error("Unknown {field} value: {value}")]
    UnknownValue { field: &'static str, value: String },
}

pub type RecordResult<T> = Result<T, RecordError>;
