//! Aggregator
//!
//! Folds bookings into agency-wide totals, a per-provider breakdown and a
//! monthly revenue trend. Sums are exact `Decimal` sums, so the result does not
//! depend on input order.
//!
//! # Balance buckets
//!
//! | status | recipient = agency | recipient = provider |
//! |--------|--------------------|----------------------|
//! | paid | owed to provider += provider net | owed to agency += agency net |
//! | pending / partial / overdue | pending provider share += provider net | pending agency share += agency net |
//! | cancelled | excluded | excluded |
//!
//! A booking with no known recipient counts in the totals only.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{
    Booking, PaymentStatus, ProviderSummary, Recipient, SettlementTotals, Summary, TrendPoint,
};

use crate::calculator::{SettlementResult, compute_settlement};
use crate::lookup::ProviderLookup;
use crate::money::{non_negative, to_f64};
use crate::palette::{PROVIDER_COLORS, color_for};
use crate::percentage::resolve_with_source;
use crate::period::Period;
use crate::visibility::{Exclusion, exclusion};


// ============================================================================
// Query
// ============================================================================

/// How bookings without a provider are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnassignedPolicy {
    /// Ignored entirely
    #[default]
    Exclude,
    /// Counted in agency-wide totals (agency fallback percentage), never per provider
    AgencyTotals,
}

impl FromStr for UnassignedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exclude" => Ok(UnassignedPolicy::Exclude),
            "agency" | "agency_totals" => Ok(UnassignedPolicy::AgencyTotals),
            other => Err(format!("unknown unassigned-booking policy: {}", other)),
        }
    }
}

/// Period, optional provider filter and unassigned-booking policy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryQuery {
    pub period: Option<Period>,
    pub provider_filter: Option<String>,
    pub unassigned: UnassignedPolicy,
}

impl SummaryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_period(period: Period) -> Self {
        Self {
            period: Some(period),
            ..Self::default()
        }
    }

    pub fn with_provider(mut self, provider_id: impl Into<String>) -> Self {
        self.provider_filter = Some(provider_id.into());
        self
    }

    pub fn with_unassigned(mut self, policy: UnassignedPolicy) -> Self {
        self.unassigned = policy;
        self
    }
}

// ============================================================================
// Balance table
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceBucket {
    OwedToProviderByAgency,
    OwedToAgencyByProvider,
    PendingProviderShareViaAgency,
    PendingAgencyShareViaProvider,
}

/// Bucket a booking's share lands in, if any
pub fn balance_bucket(status: PaymentStatus, recipient: Option<Recipient>) -> Option<BalanceBucket> {
    use BalanceBucket::*;
    match (status, recipient?) {
        (PaymentStatus::Paid, Recipient::Agency) => Some(OwedToProviderByAgency),
        (PaymentStatus::Paid, Recipient::Provider) => Some(OwedToAgencyByProvider),
        (
            PaymentStatus::Pending | PaymentStatus::Partial | PaymentStatus::Overdue,
            Recipient::Agency,
        ) => Some(PendingProviderShareViaAgency),
        (
            PaymentStatus::Pending | PaymentStatus::Partial | PaymentStatus::Overdue,
            Recipient::Provider,
        ) => Some(PendingAgencyShareViaProvider),
        (PaymentStatus::Cancelled, _) => None,
    }
}

// ============================================================================
// Accumulators
// ============================================================================

#[derive(Debug, Clone, Default)]
struct TotalsAccumulator {
    bookings: u32,
    gross: Decimal,
    costs: Decimal,
    provider_net: Decimal,
    agency_net: Decimal,
    owed_to_provider: Decimal,
    owed_to_agency: Decimal,
    pending_provider: Decimal,
    pending_agency: Decimal,
}

impl TotalsAccumulator {
    fn add(&mut self, booking: &Booking, settlement: &SettlementResult) {
        self.bookings += 1;
        self.gross += settlement.gross();
        self.costs += non_negative(booking.costs);
        self.provider_net += settlement.provider_net;
        self.agency_net += settlement.agency_net;

        match balance_bucket(booking.payment_status, booking.settlement_recipient()) {
            Some(BalanceBucket::OwedToProviderByAgency) => {
                self.owed_to_provider += settlement.provider_net
            }
            Some(BalanceBucket::OwedToAgencyByProvider) => {
                self.owed_to_agency += settlement.agency_net
            }
            Some(BalanceBucket::PendingProviderShareViaAgency) => {
                self.pending_provider += settlement.provider_net
            }
            Some(BalanceBucket::PendingAgencyShareViaProvider) => {
                self.pending_agency += settlement.agency_net
            }
            None => {}
        }
    }

    fn finish(&self) -> SettlementTotals {
        SettlementTotals {
            total_bookings: self.bookings,
            total_gross: to_f64(self.gross),
            total_costs: to_f64(self.costs),
            total_provider_net: to_f64(self.provider_net),
            total_agency_net: to_f64(self.agency_net),
            balance_owed_to_provider_by_agency: to_f64(self.owed_to_provider),
            balance_owed_to_agency_by_provider: to_f64(self.owed_to_agency),
            pending_provider_share_via_agency: to_f64(self.pending_provider),
            pending_agency_share_via_provider: to_f64(self.pending_agency),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct ProviderAccumulator {
    considered: u32,
    totals: TotalsAccumulator,
}

#[derive(Debug, Clone, Default)]
struct TrendAccumulator {
    bookings: u32,
    gross: Decimal,
    provider_net: Decimal,
    agency_net: Decimal,
}

// ============================================================================
// Walk
// ============================================================================

enum Visit<'a> {
    /// In window and not deleted, but cancelled
    Cancelled { provider_id: Option<&'a str> },
    Settled {
        booking: &'a Booking,
        provider_id: Option<&'a str>,
        settlement: SettlementResult,
    },
}

/// Filter, resolve and settle every booking, reporting each relevant one
fn walk<'a, L, F>(
    bookings: &'a [Booking],
    query: &SummaryQuery,
    providers: &L,
    agency_default_percentage: f64,
    mut visit: F,
) where
    L: ProviderLookup + ?Sized,
    F: FnMut(Visit<'a>),
{
    let period = query.period.as_ref();
    let filter = query.provider_filter.as_deref();

    for booking in bookings {
        let provider_id = booking.provider_id.as_deref();

        match exclusion(booking, period, filter) {
            None => {}
            Some(Exclusion::Cancelled) => {
                tracing::debug!(booking_id = %booking.id, "Excluded: cancelled");
                visit(Visit::Cancelled { provider_id });
                continue;
            }
            Some(reason) => {
                tracing::debug!(booking_id = %booking.id, reason = ?reason, "Excluded");
                continue;
            }
        }

        let provider = match provider_id {
            Some(id) => {
                let provider = providers.provider(id);
                if provider.is_none() {
                    tracing::debug!(booking_id = %booking.id, provider_id = %id, "Unknown provider, using agency fallback");
                }
                provider
            }
            None if query.unassigned == UnassignedPolicy::AgencyTotals => None,
            None => {
                tracing::debug!(booking_id = %booking.id, "Excluded: no provider assigned");
                continue;
            }
        };

        let resolved = resolve_with_source(booking, provider, agency_default_percentage);
        let settlement = compute_settlement(booking, resolved.percentage);
        tracing::trace!(
            booking_id = %booking.id,
            percentage = resolved.percentage,
            source = ?resolved.source,
            provider_net = %settlement.provider_net,
            agency_net = %settlement.agency_net,
            "Booking settled"
        );

        visit(Visit::Settled {
            booking,
            provider_id,
            settlement,
        });
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Agency-wide summary with per-provider breakdown
///
/// Each booking is resolved against its own assigned provider. Zero eligible
/// bookings yield an all-zero summary.
pub fn summarize<L>(
    bookings: &[Booking],
    query: &SummaryQuery,
    providers: &L,
    agency_default_percentage: f64,
) -> Summary
where
    L: ProviderLookup + ?Sized,
{
    let mut totals = TotalsAccumulator::default();
    let mut per_provider: BTreeMap<&str, ProviderAccumulator> = BTreeMap::new();

    walk(bookings, query, providers, agency_default_percentage, |visit| match visit {
        Visit::Cancelled { provider_id } => {
            if let Some(id) = provider_id {
                per_provider.entry(id).or_default().considered += 1;
            }
        }
        Visit::Settled {
            booking,
            provider_id,
            settlement,
        } => {
            totals.add(booking, &settlement);
            if let Some(id) = provider_id {
                let entry = per_provider.entry(id).or_default();
                entry.considered += 1;
                entry.totals.add(booking, &settlement);
            }
        }
    });

    let providers_out = per_provider
        .into_iter()
        .map(|(id, acc)| ProviderSummary {
            provider_id: id.to_string(),
            display_name: providers.provider(id).map(|p| p.display_name.clone()),
            color: color_for(id, PROVIDER_COLORS).to_string(),
            events_considered: acc.considered,
            totals: acc.totals.finish(),
        })
        .collect::<Vec<_>>();

    let summary = Summary {
        totals: totals.finish(),
        providers: providers_out,
    };

    tracing::info!(
        input = bookings.len(),
        eligible = summary.totals.total_bookings,
        providers = summary.providers.len(),
        total_gross = summary.totals.total_gross,
        "Settlement summary computed"
    );

    summary
}

/// Summary for one provider; zero-valued when it has no bookings in the window
pub fn summarize_provider<L>(
    bookings: &[Booking],
    provider_id: &str,
    period: Option<Period>,
    providers: &L,
    agency_default_percentage: f64,
) -> ProviderSummary
where
    L: ProviderLookup + ?Sized,
{
    let query = SummaryQuery {
        period,
        provider_filter: Some(provider_id.to_string()),
        unassigned: UnassignedPolicy::Exclude,
    };

    summarize(bookings, &query, providers, agency_default_percentage)
        .providers
        .into_iter()
        .find(|p| p.provider_id == provider_id)
        .unwrap_or_else(|| ProviderSummary {
            provider_id: provider_id.to_string(),
            display_name: providers.provider(provider_id).map(|p| p.display_name.clone()),
            color: color_for(provider_id, PROVIDER_COLORS).to_string(),
            events_considered: 0,
            totals: SettlementTotals::default(),
        })
}

/// Monthly gross / provider net / agency net, sorted by month
pub fn revenue_trend<L>(
    bookings: &[Booking],
    query: &SummaryQuery,
    providers: &L,
    agency_default_percentage: f64,
) -> Vec<TrendPoint>
where
    L: ProviderLookup + ?Sized,
{
    use chrono::Datelike;

    let mut months: BTreeMap<(i32, u32), TrendAccumulator> = BTreeMap::new();

    walk(bookings, query, providers, agency_default_percentage, |visit| {
        if let Visit::Settled {
            booking, settlement, ..
        } = visit
        {
            let key = (booking.event_date.year(), booking.event_date.month());
            let acc = months.entry(key).or_default();
            acc.bookings += 1;
            acc.gross += settlement.gross();
            acc.provider_net += settlement.provider_net;
            acc.agency_net += settlement.agency_net;
        }
    });

    months
        .into_iter()
        .map(|((year, month), acc)| TrendPoint {
            month: format!("{:04}-{:02}", year, month),
            bookings: acc.bookings,
            gross: to_f64(acc.gross),
            provider_net: to_f64(acc.provider_net),
            agency_net: to_f64(acc.agency_net),
        })
        .collect()
}
