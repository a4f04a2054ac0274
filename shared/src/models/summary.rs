//! Settlement summary models
//!
//! Derived, never persisted. Recomputed from source data on every request.

use serde::{Deserialize, Serialize};

/// Totals and balance buckets over a set of eligible bookings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementTotals {
    pub total_bookings: u32,
    pub total_gross: f64,
    pub total_costs: f64,
    pub total_provider_net: f64,
    pub total_agency_net: f64,
    /// Provider share of paid bookings the agency collected
    pub balance_owed_to_provider_by_agency: f64,
    /// Agency share of paid bookings the provider collected
    pub balance_owed_to_agency_by_provider: f64,
    /// Informational: provider share of pending/partial/overdue bookings paid to the agency
    pub pending_provider_share_via_agency: f64,
    /// Informational: agency share of pending/partial/overdue bookings paid to the provider
    pub pending_agency_share_via_provider: f64,
}

impl SettlementTotals {
    pub fn is_empty(&self) -> bool {
        self.total_bookings == 0
    }
}

/// Totals scoped to one provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSummary {
    pub provider_id: String,
    /// `None` when the provider is not in the directory
    pub display_name: Option<String>,
    /// Chart color
    pub color: String,
    /// In-window, non-deleted bookings for this provider (cancelled ones included)
    pub events_considered: u32,
    #[serde(flatten)]
    pub totals: SettlementTotals,
}

/// Agency-wide summary with per-provider breakdown
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(flatten)]
    pub totals: SettlementTotals,
    /// Sorted by provider id
    pub providers: Vec<ProviderSummary>,
}

impl Summary {
    pub fn provider(&self, provider_id: &str) -> Option<&ProviderSummary> {
        self.providers.iter().find(|p| p.provider_id == provider_id)
    }
}

/// Revenue trend data point (one calendar month)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// `YYYY-MM`
    pub month: String,
    pub bookings: u32,
    pub gross: f64,
    pub provider_net: f64,
    pub agency_net: f64,
}
