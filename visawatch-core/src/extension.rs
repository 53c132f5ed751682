use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alert::{Alert, AlertKind};
use crate::passenger::{DayCount, PassengerRecord, VisaStatus};
use crate::status::{derive_status, EXPIRING_WINDOW_DAYS};
use crate::{CoreError, CoreResult};

pub const MIN_EXTENSION_DAYS: u32 = 1;
pub const MAX_EXTENSION_DAYS: u32 = 365;
pub const DEFAULT_EXTENSION_DAYS: u32 = 30;

/// How an extension assigns the record's status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionStatusPolicy {
    /// Run the regular status mapping, so a record still at or below zero stays expired
    #[default]
    Derive,
    /// `valid` above the expiring window, otherwise `expiring`, even when still overdue
    Legacy,
}

impl ExtensionStatusPolicy {
    pub fn resolve(self, days_remaining: DayCount) -> VisaStatus {
        match self {
            ExtensionStatusPolicy::Derive => derive_status(days_remaining),
            ExtensionStatusPolicy::Legacy => {
                if days_remaining > DayCount::from_days(EXPIRING_WINDOW_DAYS) {
                    VisaStatus::Valid
                } else {
                    VisaStatus::Expiring
                }
            }
        }
    }
}

/// A validated extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionRequest {
    pub days: u32,
    pub reason: String,
}

impl ExtensionRequest {
    /// Validate raw form input
    pub fn parse(days_input: &str, reason: &str) -> CoreResult<Self> {
        let days: i64 = days_input.trim().parse().map_err(|_| {
            CoreError::ValidationError(format!("extension days must be a whole number, got '{}'", days_input))
        })?;

        if days < MIN_EXTENSION_DAYS as i64 || days > MAX_EXTENSION_DAYS as i64 {
            return Err(CoreError::ValidationError(format!(
                "extension days must be between {} and {}, got {}",
                MIN_EXTENSION_DAYS, MAX_EXTENSION_DAYS, days
            )));
        }

        let reason = reason.trim();
        if reason.is_empty() {
            return Err(CoreError::ValidationError("extension reason is required".to_string()));
        }

        Ok(Self {
            days: days as u32,
            reason: reason.to_string(),
        })
    }
}

/// Apply a validated extension and return the `success` alert it appended
pub fn apply_extension(
    record: &mut PassengerRecord,
    request: &ExtensionRequest,
    policy: ExtensionStatusPolicy,
    now: DateTime<Utc>,
) -> Alert {
    let added = DayCount::from_days(request.days as i64);
    record.days_remaining = record.days_remaining.saturating_add(added);
    record.visa_duration_days = record.visa_duration_days.saturating_add(request.days);
    record.status = policy.resolve(record.days_remaining);

    record.push_alert(
        AlertKind::Success,
        format!("Visa extended by {} days. Reason: {}", request.days, request.reason),
        now,
    )
}
