//! Shared types for the booking settlement workspace
//!
//! Strict data records consumed by the settlement engine, the lenient raw
//! records they are normalized from, and the boundary error type.

pub mod error;
pub mod models;
pub mod serde_helpers;

// Re-exports
pub use error::{RecordError, RecordResult};
pub use models::{
    Booking, BookingLifecycleState, BookingRecord, PaymentStatus, Provider, ProviderRecord,
    ProviderSummary, Recipient, SettlementTotals, Summary, TrendPoint,
};
pub use serde::{Deserialize, Serialize};
