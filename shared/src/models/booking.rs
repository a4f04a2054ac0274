//! Booking Model

use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{RecordError, RecordResult};
use crate::serde_helpers::{lenient_bool, lenient_f64, lenient_string};

/// Payment status of a booking
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Partial,
    Paid,
    Overdue,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Overdue => "overdue",
            PaymentStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "partial" => Ok(PaymentStatus::Partial),
            "paid" => Ok(PaymentStatus::Paid),
            "overdue" => Ok(PaymentStatus::Overdue),
            "cancelled" | "canceled" => Ok(PaymentStatus::Cancelled),
            _ => Err(RecordError::UnknownValue {
                field: "paymentStatus",
                value: s.to_string(),
            }),
        }
    }
}

/// Party that received a client payment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Recipient {
    /// The agency's own account
    Agency,
    /// The assigned provider (DJ)
    Provider,
}

impl FromStr for Recipient {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "agency" => Ok(Recipient::Agency),
            "provider" | "dj" => Ok(Recipient::Provider),
            _ => Err(RecordError::UnknownValue {
                field: "recipient",
                value: s.to_string(),
            }),
        }
    }
}

/// Single exclusion state derived from the soft-delete flag and payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingLifecycleState {
    Active,
    Cancelled,
    /// Soft-deleted; wins over every other state
    Deleted,
}

impl BookingLifecycleState {
    pub fn is_active(&self) -> bool {
        matches!(self, BookingLifecycleState::Active)
    }
}

/// Booking entity, already normalized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    /// Price agreed with the client
    pub gross_amount: f64,
    /// Provider expenses reimbursed before the split
    #[serde(default)]
    pub costs: f64,
    /// Informational only
    #[serde(default)]
    pub deposit_amount: f64,
    #[serde(default)]
    pub deposit_recipient: Option<Recipient>,
    /// Who received the full client payment, when known
    #[serde(default)]
    pub payment_recipient: Option<Recipient>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub provider_id: Option<String>,
    pub event_date: NaiveDate,
    #[serde(default)]
    pub is_deleted: bool,
    /// Provider share (0-100) for this booking only
    #[serde(default)]
    pub percentage_override: Option<f64>,
}

impl Booking {
    /// Active, pending booking with no costs, provider or override
    pub fn new(id: impl Into<String>, event_date: NaiveDate, gross_amount: f64) -> Self {
        Self {
            id: id.into(),
            gross_amount,
            costs: 0.0,
            deposit_amount: 0.0,
            deposit_recipient: None,
            payment_recipient: None,
            payment_status: PaymentStatus::Pending,
            provider_id: None,
            event_date,
            is_deleted: false,
            percentage_override: None,
        }
    }

    pub fn lifecycle_state(&self) -> BookingLifecycleState {
        if self.is_deleted {
            BookingLifecycleState::Deleted
        } else if self.payment_status == PaymentStatus::Cancelled {
            BookingLifecycleState::Cancelled
        } else {
            BookingLifecycleState::Active
        }
    }

    /// Actual holder of the client payment: explicit recipient, else deposit recipient
    pub fn settlement_recipient(&self) -> Option<Recipient> {
        self.payment_recipient.or(self.deposit_recipient)
    }
}

/// Raw booking row as stored upstream
///
/// Every field is optional and numeric fields may arrive as strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub gross_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub costs: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub deposit_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub deposit_recipient: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub payment_recipient: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub payment_status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub provider_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub event_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_deleted: bool,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub percentage_override: Option<f64>,
}

impl BookingRecord {
    /// Normalize into a strict [`Booking`]
    ///
    /// Only a missing id or an unusable event date is fatal for the record.
    /// Unknown status values degrade to `pending`, unknown recipients to none.
    pub fn normalize(self) -> RecordResult<Booking> {
        let id = self.id.ok_or(RecordError::MissingId)?;

        let raw_date = self
            .event_date
            .ok_or_else(|| RecordError::MissingEventDate { id: id.clone() })?;
        let event_date = parse_event_date(&raw_date).ok_or_else(|| RecordError::InvalidEventDate {
            id: id.clone(),
            value: raw_date.clone(),
        })?;

        let payment_status = match self.payment_status.as_deref().map(str::parse::<PaymentStatus>) {
            Some(Ok(status)) => status,
            Some(Err(e)) => {
                tracing::warn!(booking_id = %id, error = %e, "Unknown payment status, treating as pending");
                PaymentStatus::Pending
            }
            None => PaymentStatus::Pending,
        };

        Ok(Booking {
            gross_amount: self.gross_amount.unwrap_or(0.0),
            costs: self.costs.unwrap_or(0.0),
            deposit_amount: self.deposit_amount.unwrap_or(0.0),
            deposit_recipient: parse_recipient(&id, self.deposit_recipient.as_deref()),
            payment_recipient: parse_recipient(&id, self.payment_recipient.as_deref()),
            payment_status,
            provider_id: self.provider_id,
            event_date,
            is_deleted: self.is_deleted,
            percentage_override: self.percentage_override,
            id,
        })
    }
}

fn parse_recipient(booking_id: &str, raw: Option<&str>) -> Option<Recipient> {
    let raw = raw?;
    match raw.parse::<Recipient>() {
        Ok(r) => Some(r),
        Err(e) => {
            tracing::warn!(booking_id = %booking_id, error = %e, "Ignoring unknown recipient");
            None
        }
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (date part is kept)
fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.date_naive())
    })
}
