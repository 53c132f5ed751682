use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;
use visawatch_shared::pii::Masked;

use crate::alert::{Alert, AlertKind};
use crate::status::derive_status;
use crate::{CoreError, CoreResult};

/// Remaining visa days, stored in tenths of a day.
///
/// The simulated clock moves in fractions of a day, so the countdown keeps
/// that precision and only rounds for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DayCount(i64);

impl DayCount {
    pub const TENTHS_PER_DAY: i64 = 10;

    pub const fn from_days(days: i64) -> Self {
        Self(days * Self::TENTHS_PER_DAY)
    }

    pub const fn from_tenths(tenths: i64) -> Self {
        Self(tenths)
    }

    /// Nearest tenth of a day
    pub fn from_days_f64(days: f64) -> Self {
        Self((days * Self::TENTHS_PER_DAY as f64).round() as i64)
    }

    pub fn as_days_f64(self) -> f64 {
        self.0 as f64 / Self::TENTHS_PER_DAY as f64
    }

    /// Whole days for display. Halves round up, so -5.5 shows as -5.
    pub fn rounded(self) -> i64 {
        (self.0 + Self::TENTHS_PER_DAY / 2).div_euclid(Self::TENTHS_PER_DAY)
    }

    pub fn saturating_add(self, other: DayCount) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: DayCount) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for DayCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.as_days_f64())
    }
}

impl Serialize for DayCount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_days_f64())
    }
}

impl<'de> Deserialize<'de> for DayCount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let days = f64::deserialize(deserializer)?;
        Ok(Self::from_days_f64(days))
    }
}

/// Visa state shown on the dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VisaStatus {
    Valid,
    Expiring,
    Expired,
    /// Accepted by filters and counted in statistics, but nothing assigns it.
    Extended,
}

impl VisaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisaStatus::Valid => "valid",
            VisaStatus::Expiring => "expiring",
            VisaStatus::Expired => "expired",
            VisaStatus::Extended => "extended",
        }
    }
}

/// Input for creating a record
#[derive(Debug, Clone)]
pub struct NewPassenger {
    pub name: String,
    pub passport_number: String,
    pub nationality: String,
    pub visa_type: String,
    pub email: String,
    pub phone: String,
    pub entry_date: DateTime<Utc>,
    pub visa_duration_days: u32,
    pub days_remaining: DayCount,
}

/// Partial update of a record's display fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PassengerPatch {
    pub name: Option<String>,
    pub passport_number: Option<String>,
    pub nationality: Option<String>,
    pub visa_type: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl PassengerPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.passport_number.is_none()
            && self.nationality.is_none()
            && self.visa_type.is_none()
            && self.email.is_none()
            && self.phone.is_none()
    }
}

/// One traveler's visa record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PassengerRecord {
    pub id: Uuid,
    pub name: String,
    pub passport_number: Masked<String>,
    pub nationality: String,
    pub visa_type: String,
    pub email: Masked<String>,
    pub phone: Masked<String>,
    pub entry_date: DateTime<Utc>,
    pub visa_duration_days: u32,
    pub days_remaining: DayCount,
    pub status: VisaStatus,
    pub alerts: Vec<Alert>,
    /// Threshold day values whose alert has already been raised
    #[serde(default)]
    pub fired_thresholds: BTreeSet<u32>,
}

impl PassengerRecord {
    pub fn new(id: Uuid, input: NewPassenger) -> Self {
        Self {
            id,
            name: input.name,
            passport_number: input.passport_number.into(),
            nationality: input.nationality,
            visa_type: input.visa_type,
            email: input.email.into(),
            phone: input.phone.into(),
            entry_date: input.entry_date,
            visa_duration_days: input.visa_duration_days,
            days_remaining: input.days_remaining,
            status: derive_status(input.days_remaining),
            alerts: Vec::new(),
            fired_thresholds: BTreeSet::new(),
        }
    }

    /// Append an unread alert and return a copy of it
    pub fn push_alert(&mut self, kind: AlertKind, message: impl Into<String>, at: DateTime<Utc>) -> Alert {
        let alert = Alert::new(self.id, kind, message, at);
        self.alerts.push(alert.clone());
        alert
    }

    pub fn unread_count(&self) -> usize {
        self.alerts.iter().filter(|a| !a.read).count()
    }

    /// Returns true if this record owns the alert
    pub fn mark_alert_read(&mut self, alert_id: &Uuid) -> bool {
        match self.alerts.iter_mut().find(|a| a.id == *alert_id) {
            Some(alert) => {
                alert.mark_read();
                true
            }
            None => false,
        }
    }

    /// Returns how many alerts flipped
    pub fn mark_all_read(&mut self) -> usize {
        self.alerts
            .iter_mut()
            .map(|a| a.mark_read())
            .filter(|changed| *changed)
            .count()
    }

    /// Apply a display-field edit. Either every provided field is applied or none is.
    pub fn apply_patch(&mut self, patch: PassengerPatch) -> CoreResult<()> {
        if patch.is_empty() {
            return Err(CoreError::ValidationError("no fields to update".to_string()));
        }

        let fields = [
            ("name", &patch.name),
            ("passport_number", &patch.passport_number),
            ("nationality", &patch.nationality),
            ("visa_type", &patch.visa_type),
            ("email", &patch.email),
            ("phone", &patch.phone),
        ];
        for (field, value) in fields {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                return Err(CoreError::ValidationError(format!("{} must not be empty", field)));
            }
        }

        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(passport) = patch.passport_number {
            self.passport_number = passport.trim().to_string().into();
        }
        if let Some(nationality) = patch.nationality {
            self.nationality = nationality.trim().to_string();
        }
        if let Some(visa_type) = patch.visa_type {
            self.visa_type = visa_type.trim().to_string();
        }
        if let Some(email) = patch.email {
            self.email = email.trim().to_string().into();
        }
        if let Some(phone) = patch.phone {
            self.phone = phone.trim().to_string().into();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample;

    #[test]
    fn test_day_count_rounding() {
        assert_eq!(DayCount::from_tenths(304).rounded(), 30);
        assert_eq!(DayCount::from_tenths(305).rounded(), 31);
        assert_eq!(DayCount::from_tenths(-55).rounded(), -5);
        assert_eq!(DayCount::from_tenths(-56).rounded(), -6);
        assert_eq!(DayCount::from_days_f64(0.1), DayCount::from_tenths(1));
        assert_eq!(DayCount::from_days(-10).to_string(), "-10.0");
    }

    #[test]
    fn test_new_record_derives_status() {
        assert_eq!(sample(45).status, VisaStatus::Valid);
        assert_eq!(sample(15).status, VisaStatus::Expiring);
        assert_eq!(sample(-5).status, VisaStatus::Expired);
        assert!(sample(45).alerts.is_empty());
    }

    #[test]
    fn test_mark_alerts_read() {
        let mut record = sample(20);
        let first = record.push_alert(AlertKind::Info, "one", Utc::now());
        record.push_alert(AlertKind::Warning, "two", Utc::now());
        assert_eq!(record.unread_count(), 2);

        assert!(record.mark_alert_read(&first.id));
        assert!(!record.mark_alert_read(&Uuid::new_v4()));
        assert_eq!(record.unread_count(), 1);

        assert_eq!(record.mark_all_read(), 1);
        assert_eq!(record.unread_count(), 0);
        assert_eq!(record.alerts.len(), 2);
    }

    #[test]
    fn test_patch_rejects_blank_fields_without_mutation() {
        let mut record = sample(20);
        let before = record.clone();

        let patch = PassengerPatch {
            name: Some("Carla".to_string()),
            email: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(record.apply_patch(patch).is_err());
        assert_eq!(record, before);

        assert!(record.apply_patch(PassengerPatch::default()).is_err());
    }

    #[test]
    fn test_patch_updates_display_fields_only() {
        let mut record = sample(20);
        let patch = PassengerPatch {
            name: Some(" Carla Souza ".to_string()),
            nationality: Some("Portugal".to_string()),
            ..Default::default()
        };
        record.apply_patch(patch).unwrap();
        assert_eq!(record.name, "Carla Souza");
        assert_eq!(record.nationality, "Portugal");
        assert_eq!(record.days_remaining, DayCount::from_days(20));
        assert_eq!(record.passport_number.expose(), "AB123456");
    }

    #[test]
    fn test_record_debug_masks_passport() {
        let record = sample(20);
        let debug = format!("{:?}", record);
        assert!(!debug.contains("AB123456"));
    }
}
