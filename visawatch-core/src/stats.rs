use serde::Serialize;

use crate::alert::Alert;
use crate::passenger::{PassengerRecord, VisaStatus};

/// Dashboard counters, derived from one snapshot of the collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub valid: usize,
    pub expiring: usize,
    pub expired: usize,
    pub extended: usize,
    pub total_alerts: usize,
    pub unread_alerts: usize,
}

impl DashboardStats {
    pub fn collect(records: &[PassengerRecord]) -> Self {
        records.iter().fold(
            Self {
                total: records.len(),
                ..Default::default()
            },
            |mut stats, record| {
                match record.status {
                    VisaStatus::Valid => stats.valid += 1,
                    VisaStatus::Expiring => stats.expiring += 1,
                    VisaStatus::Expired => stats.expired += 1,
                    VisaStatus::Extended => stats.extended += 1,
                }
                stats.total_alerts += record.alerts.len();
                stats.unread_alerts += record.unread_count();
                stats
            },
        )
    }
}

/// Every unread alert, by record then creation order
pub fn unread_alerts(records: &[PassengerRecord]) -> Vec<&Alert> {
    records
        .iter()
        .flat_map(|r| r.alerts.iter())
        .filter(|a| !a.read)
        .collect()
}
