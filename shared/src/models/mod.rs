//! Data models
//!
//! Strict records (`Booking`, `Provider`) are what the settlement engine reads.
//! Raw records (`BookingRecord`, `ProviderRecord`) mirror the loosely-typed
//! rows the event store hands out and are normalized exactly once.

pub mod booking;
pub mod provider;
pub mod summary;

// Re-exports
pub use booking::*;
pub use provider::*;
pub use summary::*;
