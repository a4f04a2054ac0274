//! Revenue-split settlement engine
//!
//! Splits each booking's gross amount between the agency and the assigned
//! provider and folds the results into agency-wide and per-provider summaries.
//!
//! # Modules
//!
//! - [`visibility`] - which bookings take part (soft delete, cancellation, window, provider)
//! - [`percentage`] - provider share precedence: override → provider default → agency fallback
//! - [`calculator`] - provider / agency net for one booking
//! - [`aggregator`] - totals, balance buckets, per-provider breakdown, monthly trend
//! - [`service`] - async facade over the event store, provider directory and config
//!
//! The engine itself is synchronous and pure; [`service::SettlementService`]
//! does the fetching.

pub mod aggregator;
pub mod calculator;
pub mod config;
pub mod lookup;
pub mod money;
pub mod palette;
pub mod percentage;
pub mod period;
pub mod service;
pub mod store;
pub mod utils;
pub mod visibility;

// Re-exports
pub use aggregator::{
    BalanceBucket, SummaryQuery, UnassignedPolicy, balance_bucket, revenue_trend, summarize,
    summarize_provider,
};
pub use calculator::{SettlementResult, compute_settlement};
pub use config::Config;
pub use lookup::{ProviderIndex, ProviderLookup};
pub use palette::{color_for, color_for_index};
pub use percentage::{PercentageSource, ResolvedPercentage, resolve, resolve_with_source};
pub use period::Period;
pub use service::{ServiceError, ServiceResult, SettlementService};
pub use store::{
    ConfigProvider, EventStore, MemoryEventStore, MemoryProviderDirectory, ProviderDirectory,
    StoreError,
};
pub use visibility::is_eligible;
