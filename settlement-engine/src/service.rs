//! Settlement service
//!
//! Fetches bookings, providers and configuration from their collaborators,
//! then runs the synchronous engine over that snapshot. All three sources are
//! read before any calculation starts and never refreshed mid-computation.

use std::sync::Arc;

use shared::models::{Booking, ProviderSummary, Summary, TrendPoint};
use thiserror::Error;

use crate::aggregator::{self, SummaryQuery, UnassignedPolicy};
use crate::lookup::ProviderIndex;
use crate::period::Period;
use crate::store::{ConfigProvider, EventStore, ProviderDirectory, StoreError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Consistent view of the three sources
struct Snapshot {
    bookings: Vec<Booking>,
    providers: ProviderIndex,
    agency_default_percentage: f64,
    unassigned: UnassignedPolicy,
}

#[derive(Clone)]
pub struct SettlementService {
    events: Arc<dyn EventStore>,
    providers: Arc<dyn ProviderDirectory>,
    config: Arc<dyn ConfigProvider>,
}

impl SettlementService {
    pub fn new(
        events: Arc<dyn EventStore>,
        providers: Arc<dyn ProviderDirectory>,
        config: Arc<dyn ConfigProvider>,
    ) -> Self {
        Self {
            events,
            providers,
            config,
        }
    }

    async fn snapshot(&self, period: &Period) -> ServiceResult<Snapshot> {
        let (bookings, providers, agency_default_percentage, unassigned) = tokio::try_join!(
            self.events.bookings(period),
            self.providers.providers(),
            self.config.agency_default_percentage(),
            self.config.unassigned_policy(),
        )?;

        tracing::debug!(
            bookings = bookings.len(),
            providers = providers.len(),
            agency_default_percentage,
            "Settlement snapshot fetched"
        );

        Ok(Snapshot {
            bookings,
            providers: ProviderIndex::new(providers),
            agency_default_percentage,
            unassigned,
        })
    }

    fn query(period: Option<Period>, provider_filter: Option<&str>, unassigned: UnassignedPolicy) -> SummaryQuery {
        SummaryQuery {
            period,
            provider_filter: provider_filter.map(str::to_string),
            unassigned,
        }
    }

    /// Agency-wide summary (optionally scoped to one provider)
    pub async fn summary(&self, period: Option<Period>, provider_filter: Option<&str>) -> ServiceResult<Summary> {
        let snapshot = self.snapshot(&period.unwrap_or_default()).await?;
        let query = Self::query(period, provider_filter, snapshot.unassigned);
        Ok(aggregator::summarize(
            &snapshot.bookings,
            &query,
            &snapshot.providers,
            snapshot.agency_default_percentage,
        ))
    }

    /// One provider's summary; zero-valued when it has no bookings
    pub async fn provider_summary(&self, provider_id: &str, period: Option<Period>) -> ServiceResult<ProviderSummary> {
        let snapshot = self.snapshot(&period.unwrap_or_default()).await?;
        Ok(aggregator::summarize_provider(
            &snapshot.bookings,
            provider_id,
            period,
            &snapshot.providers,
            snapshot.agency_default_percentage,
        ))
    }

    /// Monthly revenue trend
    pub async fn revenue_trend(
        &self,
        period: Option<Period>,
        provider_filter: Option<&str>,
    ) -> ServiceResult<Vec<TrendPoint>> {
        let snapshot = self.snapshot(&period.unwrap_or_default()).await?;
        let query = Self::query(period, provider_filter, snapshot.unassigned);
        Ok(aggregator::revenue_trend(
            &snapshot.bookings,
            &query,
            &snapshot.providers,
            snapshot.agency_default_percentage,
        ))
    }
}
