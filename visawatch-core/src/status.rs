use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alert::{Alert, AlertKind};
use crate::passenger::{DayCount, PassengerRecord, VisaStatus};
use crate::{CoreError, CoreResult};

/// Upper bound (inclusive) of the expiring window
pub const EXPIRING_WINDOW_DAYS: i64 = 30;

/// Map a countdown to its status. Never yields `Extended`.
pub fn derive_status(days_remaining: DayCount) -> VisaStatus {
    if days_remaining <= DayCount::from_days(0) {
        VisaStatus::Expired
    } else if days_remaining <= DayCount::from_days(EXPIRING_WINDOW_DAYS) {
        VisaStatus::Expiring
    } else {
        VisaStatus::Valid
    }
}

/// A countdown value that raises an alert when the clock passes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertThreshold {
    pub days: u32,
    pub kind: AlertKind,
}

impl AlertThreshold {
    pub fn new(days: u32, kind: AlertKind) -> Self {
        Self { days, kind }
    }

    pub fn message(&self) -> String {
        match self.kind {
            AlertKind::Danger => format!("Visa expires in {} days!", self.days),
            _ => format!("Visa expires in {} days", self.days),
        }
    }

    /// True when a step from `previous` down to `next` reaches this value.
    /// A countdown that already sat on the value does not cross it again.
    fn crossed(&self, previous: DayCount, next: DayCount) -> bool {
        let mark = DayCount::from_days(self.days as i64);
        next <= mark && mark < previous
    }
}

/// How the simulated clock ages records
#[derive(Debug, Clone, PartialEq)]
pub struct ClockRules {
    pub step: DayCount,
    pub floor: DayCount,
    pub thresholds: Vec<AlertThreshold>,
}

impl ClockRules {
    pub fn new(step: DayCount, floor: DayCount, thresholds: Vec<AlertThreshold>) -> CoreResult<Self> {
        if step <= DayCount::default() {
            return Err(CoreError::ValidationError(format!(
                "clock step must be positive, got {}",
                step
            )));
        }
        if let Some(bad) = thresholds.iter().find(|t| t.days == 0) {
            return Err(CoreError::ValidationError(format!(
                "alert threshold must be positive, got {}",
                bad.days
            )));
        }
        Ok(Self { step, floor, thresholds })
    }
}

impl Default for ClockRules {
    fn default() -> Self {
        Self {
            step: DayCount::from_tenths(1),
            floor: DayCount::from_days(-10),
            thresholds: vec![
                AlertThreshold::new(30, AlertKind::Warning),
                AlertThreshold::new(7, AlertKind::Danger),
            ],
        }
    }
}

/// Age one record by a single clock step.
///
/// Recomputes the status and appends any threshold alert the step reaches
/// (`next <= threshold < previous`) that has not fired for this record yet.
/// Returns the alerts created.
pub fn tick_record(record: &mut PassengerRecord, rules: &ClockRules, now: DateTime<Utc>) -> Vec<Alert> {
    let previous = record.days_remaining;
    let next = previous.saturating_sub(rules.step).max(rules.floor);

    record.days_remaining = next;
    record.status = derive_status(next);

    let mut raised = Vec::new();
    for threshold in &rules.thresholds {
        if record.fired_thresholds.contains(&threshold.days) || !threshold.crossed(previous, next) {
            continue;
        }
        record.fired_thresholds.insert(threshold.days);
        tracing::debug!(passenger_id = %record.id, threshold = threshold.days, "threshold alert raised");
        raised.push(record.push_alert(threshold.kind, threshold.message(), now));
    }
    raised
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::apply_extension;
    use crate::test_support::sample;
    use crate::{ExtensionRequest, ExtensionStatusPolicy};

    #[test]
    fn test_status_mapping_boundaries() {
        assert_eq!(derive_status(DayCount::from_days(0)), VisaStatus::Expired);
        assert_eq!(derive_status(DayCount::from_days(-3)), VisaStatus::Expired);
        assert_eq!(derive_status(DayCount::from_tenths(1)), VisaStatus::Expiring);
        assert_eq!(derive_status(DayCount::from_days(30)), VisaStatus::Expiring);
        assert_eq!(derive_status(DayCount::from_tenths(301)), VisaStatus::Valid);
    }

    #[test]
    fn test_tick_decrements_and_clamps() {
        let rules = ClockRules::default();
        let mut record = sample(-9);
        record.days_remaining = DayCount::from_tenths(-99);

        tick_record(&mut record, &rules, Utc::now());
        assert_eq!(record.days_remaining, DayCount::from_days(-10));

        for _ in 0..50 {
            tick_record(&mut record, &rules, Utc::now());
        }
        assert_eq!(record.days_remaining, DayCount::from_days(-10));
        assert_eq!(record.status, VisaStatus::Expired);
    }

    #[test]
    fn test_threshold_alerts_fire_once() {
        let rules = ClockRules::default();
        let mut record = sample(31);

        // 31.0 -> 6.0 days, plenty of ticks past both thresholds
        let mut raised = Vec::new();
        for _ in 0..250 {
            raised.extend(tick_record(&mut record, &rules, Utc::now()));
        }

        assert_eq!(record.days_remaining, DayCount::from_days(6));
        assert_eq!(raised.len(), 2);
        assert_eq!(raised[0].kind, AlertKind::Warning);
        assert_eq!(raised[0].message, "Visa expires in 30 days");
        assert_eq!(raised[1].kind, AlertKind::Danger);
        assert_eq!(raised[1].message, "Visa expires in 7 days!");
        assert_eq!(record.alerts.len(), 2);
        assert!(record.fired_thresholds.contains(&30));
        assert!(record.fired_thresholds.contains(&7));
    }

    #[test]
    fn test_threshold_fires_on_exact_crossing_tick() {
        let rules = ClockRules::default();
        let mut record = sample(30);
        record.days_remaining = DayCount::from_tenths(301);

        assert!(tick_record(&mut record, &rules, Utc::now()).len() == 1);
        assert_eq!(record.days_remaining, DayCount::from_days(30));
        assert!(tick_record(&mut record, &rules, Utc::now()).is_empty());
    }

    #[test]
    fn test_extension_landing_on_threshold_stays_quiet() {
        let rules = ClockRules::default();
        let mut record = sample(15);
        let request = ExtensionRequest::parse("15", "conference").unwrap();
        apply_extension(&mut record, &request, ExtensionStatusPolicy::Derive, Utc::now());
        assert_eq!(record.days_remaining, DayCount::from_days(30));

        assert!(tick_record(&mut record, &rules, Utc::now()).is_empty());
        assert_eq!(record.days_remaining, DayCount::from_tenths(299));
        assert!(!record.fired_thresholds.contains(&30));

        record.days_remaining = DayCount::from_days(7);
        assert!(tick_record(&mut record, &rules, Utc::now()).is_empty());
    }

    #[test]
    fn test_records_already_below_threshold_stay_quiet() {
        let rules = ClockRules::default();
        let mut record = sample(25);
        for _ in 0..10 {
            assert!(tick_record(&mut record, &rules, Utc::now()).is_empty());
        }
        assert_eq!(record.status, VisaStatus::Expiring);
    }

    #[test]
    fn test_status_tracks_countdown_across_expiry() {
        let rules = ClockRules::default();
        let mut record = sample(1);
        for _ in 0..10 {
            tick_record(&mut record, &rules, Utc::now());
        }
        assert_eq!(record.days_remaining, DayCount::from_days(0));
        assert_eq!(record.status, VisaStatus::Expired);
    }

    #[test]
    fn test_rules_validation() {
        assert!(ClockRules::new(DayCount::default(), DayCount::from_days(-10), vec![]).is_err());
        assert!(ClockRules::new(
            DayCount::from_tenths(1),
            DayCount::from_days(-10),
            vec![AlertThreshold::new(0, AlertKind::Info)]
        )
        .is_err());
    }
}
