//! Source data collaborators
//!
//! The engine never talks to storage itself. Callers fetch bookings, providers
//! and configuration through these traits first, then hand the snapshot to the
//! synchronous engine. In-memory implementations back tests and embedding.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared::models::{Booking, BookingRecord, Provider, ProviderRecord};
use thiserror::Error;

use crate::aggregator::UnassignedPolicy;
use crate::period::Period;

/// Collaborator error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid source data: {0}")]
    InvalidData(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::InvalidData(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

// ============================================================================
// Traits
// ============================================================================

/// Event store: candidate bookings for a window
///
/// Implementations may return deleted or cancelled bookings; the engine
/// filters them.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn bookings(&self, period: &Period) -> StoreResult<Vec<Booking>>;
}

/// Provider directory
#[async_trait]
pub trait ProviderDirectory: Send + Sync {
    async fn providers(&self) -> StoreResult<Vec<Provider>>;
}

/// Agency-wide configuration
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    async fn agency_default_percentage(&self) -> StoreResult<f64>;

    async fn unassigned_policy(&self) -> StoreResult<UnassignedPolicy> {
        Ok(UnassignedPolicy::default())
    }
}

// ============================================================================
// Boundary normalization
// ============================================================================

/// Normalize raw booking rows, dropping (and logging) the unusable ones
pub fn normalize_bookings(records: impl IntoIterator<Item = BookingRecord>) -> Vec<Booking> {
    records
        .into_iter()
        .filter_map(|record| match record.normalize() {
            Ok(booking) => Some(booking),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unusable booking record");
                None
            }
        })
        .collect()
}

/// Normalize raw provider rows, dropping (and logging) the unusable ones
pub fn normalize_providers(records: impl IntoIterator<Item = ProviderRecord>) -> Vec<Provider> {
    records
        .into_iter()
        .filter_map(|record| match record.normalize() {
            Ok(provider) => Some(provider),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unusable provider record");
                None
            }
        })
        .collect()
}

// ============================================================================
// In-memory implementations
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryEventStore {
    bookings: RwLock<Vec<Booking>>,
}

impl MemoryEventStore {
    pub fn new(bookings: Vec<Booking>) -> Self {
        Self {
            bookings: RwLock::new(bookings),
        }
    }

    /// Load a JSON array of raw booking rows
    pub fn from_json(json: &str) -> StoreResult<Self> {
        let records: Vec<BookingRecord> = serde_json::from_str(json)?;
        let total = records.len();
        let bookings = normalize_bookings(records);
        tracing::info!(total, loaded = bookings.len(), "Bookings loaded");
        Ok(Self::new(bookings))
    }

    /// Insert or replace by id
    pub fn upsert(&self, booking: Booking) {
        let mut bookings = self.bookings.write();
        match bookings.iter_mut().find(|b| b.id == booking.id) {
            Some(existing) => *existing = booking,
            None => bookings.push(booking),
        }
    }

    /// Soft delete; returns false when the id is unknown
    pub fn soft_delete(&self, id: &str) -> bool {
        let mut bookings = self.bookings.write();
        match bookings.iter_mut().find(|b| b.id == id) {
            Some(booking) => {
                booking.is_deleted = true;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.bookings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.read().is_empty()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn bookings(&self, period: &Period) -> StoreResult<Vec<Booking>> {
        Ok(self
            .bookings
            .read()
            .iter()
            .filter(|b| period.contains(b.event_date))
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct MemoryProviderDirectory {
    providers: RwLock<Vec<Provider>>,
}

impl MemoryProviderDirectory {
    pub fn new(providers: Vec<Provider>) -> Self {
        Self {
            providers: RwLock::new(providers),
        }
    }

    /// Load a JSON array of raw provider rows
    pub fn from_json(json: &str) -> StoreResult<Self> {
        let records: Vec<ProviderRecord> = serde_json::from_str(json)?;
        Ok(Self::new(normalize_providers(records)))
    }

    /// Insert or replace by id
    pub fn upsert(&self, provider: Provider) {
        let mut providers = self.providers.write();
        match providers.iter_mut().find(|p| p.id == provider.id) {
            Some(existing) => *existing = provider,
            None => providers.push(provider),
        }
    }
}

#[async_trait]
impl ProviderDirectory for MemoryProviderDirectory {
    async fn providers(&self) -> StoreResult<Vec<Provider>> {
        Ok(self.providers.read().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const BOOKINGS_JSON: &str = r#"[
        {"id": "b-1", "grossAmount": 1000, "providerId": "dj-1", "eventDate": "2024-05-01"},
        {"id": "b-2", "grossAmount": "250.50", "providerId": "dj-2", "eventDate": "2024-06-01"},
        {"grossAmount": 10, "eventDate": "2024-05-01"},
        {"id": "b-4", "grossAmount": 10}
    ]"#;

    #[tokio::test]
    async fn test_from_json_skips_unusable_records() {
        let store = MemoryEventStore::from_json(BOOKINGS_JSON).unwrap();
        assert_eq!(store.len(), 2);

        let may = Period::month(2024, 5).unwrap();
        let bookings = store.bookings(&may).await.unwrap();
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].id, "b-1");
    }

    #[tokio::test]
    async fn test_from_json_accepts_loose_deleted_flags() {
        let store = MemoryEventStore::from_json(
            r#"[
                {"id": "b-1", "grossAmount": 100, "eventDate": "2024-05-01", "isDeleted": "true"},
                {"id": "b-2", "grossAmount": 200, "eventDate": "2024-05-02", "isDeleted": 1},
                {"id": "b-3", "grossAmount": 300, "eventDate": "2024-05-03", "isDeleted": "no"},
                {"id": "b-4", "grossAmount": 400, "eventDate": "2024-05-04", "isDeleted": null}
            ]"#,
        )
        .unwrap();
        assert_eq!(store.len(), 4);

        let bookings = store.bookings(&Period::unbounded()).await.unwrap();
        let deleted: Vec<&str> = bookings
            .iter()
            .filter(|b| b.is_deleted)
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(deleted, vec!["b-1", "b-2"]);
    }

    #[test]
    fn test_from_json_rejects_malformed_document() {
        assert!(matches!(
            MemoryEventStore::from_json("{not json"),
            Err(StoreError::InvalidData(_))
        ));
    }

    #[tokio::test]
    async fn test_upsert_and_soft_delete() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let store = MemoryEventStore::default();
        store.upsert(Booking::new("b-1", date, 100.0));
        store.upsert(Booking::new("b-1", date, 200.0));
        assert_eq!(store.len(), 1);

        assert!(store.soft_delete("b-1"));
        assert!(!store.soft_delete("missing"));

        let bookings = store.bookings(&Period::unbounded()).await.unwrap();
        assert_eq!(bookings[0].gross_amount, 200.0);
        assert!(bookings[0].is_deleted);
    }

    #[tokio::test]
    async fn test_provider_directory_from_json() {
        let directory = MemoryProviderDirectory::from_json(
            r#"[{"id": "dj-1", "name": "Nova", "defaultSplitPercentage": "70"}, {"name": "nameless"}]"#,
        )
        .unwrap();
        let providers = directory.providers().await.unwrap();
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].default_split_percentage, Some(70.0));

        directory.upsert(Provider::new("dj-1", "Nova II"));
        assert_eq!(directory.providers().await.unwrap()[0].display_name, "Nova II");
    }
}
