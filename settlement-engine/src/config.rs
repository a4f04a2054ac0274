use async_trait::async_trait;
use shared::serde_helpers::parse_number;

use crate::aggregator::UnassignedPolicy;
use crate::percentage::is_valid_percentage;
use crate::store::{ConfigProvider, StoreResult};

/// Agency share used when nothing is configured
pub const DEFAULT_AGENCY_PERCENTAGE: f64 = 30.0;

/// Engine configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | AGENCY_DEFAULT_PERCENTAGE | 30 | Agency's own default share (0-100) |
/// | UNASSIGNED_BOOKINGS | exclude | `exclude` or `agency` (count in agency totals) |
/// | LOG_LEVEL | info | Default log level |
/// | LOG_DIR | - | Enables daily-rolling file logs |
/// | ENVIRONMENT | development | Runtime environment |
///
/// # Example
///
/// ```ignore
/// AGENCY_DEFAULT_PERCENTAGE=25 UNASSIGNED_BOOKINGS=agency cargo test
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Agency's default share; provider fallback is `100 - this`
    pub agency_default_percentage: f64,
    /// Treatment of bookings without a provider
    pub unassigned_policy: UnassignedPolicy,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// development | staging | production
    pub environment: String,
}

impl Config {
    /// Load `.env` (if present), then read the environment
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        Self::from_env()
    }

    /// Read configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source; invalid values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let agency_default_percentage = match lookup("AGENCY_DEFAULT_PERCENTAGE") {
            Some(raw) => match parse_number(&raw).filter(|v| is_valid_percentage(*v)) {
                Some(value) => value,
                None => {
                    tracing::warn!(value = %raw, "Invalid AGENCY_DEFAULT_PERCENTAGE, using default");
                    DEFAULT_AGENCY_PERCENTAGE
                }
            },
            None => DEFAULT_AGENCY_PERCENTAGE,
        };

        let unassigned_policy = match lookup("UNASSIGNED_BOOKINGS") {
            Some(raw) => raw.parse::<UnassignedPolicy>().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Invalid UNASSIGNED_BOOKINGS, using default");
                UnassignedPolicy::default()
            }),
            None => UnassignedPolicy::default(),
        };

        Self {
            agency_default_percentage,
            unassigned_policy,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: lookup("LOG_DIR").filter(|d| !d.trim().is_empty()),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".into()),
        }
    }

    /// Defaults with explicit settlement values
    ///
    /// Mostly used in tests
    pub fn with_overrides(agency_default_percentage: f64, unassigned_policy: UnassignedPolicy) -> Self {
        let mut config = Self::from_lookup(|_| None);
        config.agency_default_percentage = agency_default_percentage;
        config.unassigned_policy = unassigned_policy;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[async_trait]
impl ConfigProvider for Config {
    async fn agency_default_percentage(&self) -> StoreResult<f64> {
        Ok(self.agency_default_percentage)
    }

    async fn unassigned_policy(&self) -> StoreResult<UnassignedPolicy> {
        Ok(self.unassigned_policy)
    }
}
