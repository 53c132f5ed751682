pub mod alert;
pub mod passenger;
pub mod status;
pub mod extension;
pub mod search;
pub mod stats;

pub use alert::{Alert, AlertKind};
pub use passenger::{DayCount, NewPassenger, PassengerPatch, PassengerRecord, VisaStatus};
pub use status::{derive_status, AlertThreshold, ClockRules};
pub use extension::{ExtensionRequest, ExtensionStatusPolicy};
pub use search::{SearchQuery, StatusFilter};
pub use stats::DashboardStats;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::passenger::{DayCount, NewPassenger, PassengerRecord};

    pub fn sample(days: i64) -> PassengerRecord {
        named("Carlos Silva", "AB123456", "Brazil", days)
    }

    pub fn named(name: &str, passport: &str, nationality: &str, days: i64) -> PassengerRecord {
        PassengerRecord::new(
            Uuid::new_v4(),
            NewPassenger {
                name: name.to_string(),
                passport_number: passport.to_string(),
                nationality: nationality.to_string(),
                visa_type: "tourist".to_string(),
                email: "carlos@email.com".to_string(),
                phone: "+55 11 98765-4321".to_string(),
                entry_date: Utc::now(),
                visa_duration_days: 90,
                days_remaining: DayCount::from_days(days),
            },
        )
    }
}
