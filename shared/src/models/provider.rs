//! Provider Model (DJ)

use serde::{Deserialize, Serialize};

use crate::error::{RecordError, RecordResult};
use crate::serde_helpers::{lenient_f64, lenient_string};

/// Service provider a booking can be assigned to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: String,
    pub display_name: String,
    /// Provider share (0-100) used when a booking has no override
    #[serde(default)]
    pub default_split_percentage: Option<f64>,
}

impl Provider {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            default_split_percentage: None,
        }
    }

    pub fn with_default_split(mut self, percentage: f64) -> Self {
        self.default_split_percentage = Some(percentage);
        self
    }
}

/// Raw provider row as stored upstream
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRecord {
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub id: Option<String>,
    #[serde(default, alias = "name", deserialize_with = "lenient_string::deserialize")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub default_split_percentage: Option<f64>,
}

impl ProviderRecord {
    /// Normalize into a strict [`Provider`]; the display name falls back to the id
    pub fn normalize(self) -> RecordResult<Provider> {
        let id = self.id.ok_or(RecordError::MissingId)?;
        Ok(Provider {
            display_name: self.display_name.unwrap_or_else(|| id.clone()),
            default_split_percentage: self.default_split_percentage,
            id,
        })
    }
}
