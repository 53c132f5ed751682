use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use uuid::Uuid;
use visawatch_core::{Alert, AlertKind, DayCount, NewPassenger, PassengerRecord};

fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

struct SeedAlert {
    id: u128,
    kind: AlertKind,
    message: &'static str,
    date: DateTime<Utc>,
    read: bool,
}

#[allow(clippy::too_many_arguments)]
fn seeded(
    id: u128,
    name: &str,
    passport: &str,
    nationality: &str,
    visa_type: &str,
    email: &str,
    phone: &str,
    entry_date: DateTime<Utc>,
    visa_duration_days: u32,
    days_remaining: i64,
    alerts: Vec<SeedAlert>,
) -> PassengerRecord {
    let mut record = PassengerRecord::new(
        Uuid::from_u128(id),
        NewPassenger {
            name: name.to_string(),
            passport_number: passport.to_string(),
            nationality: nationality.to_string(),
            visa_type: visa_type.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            entry_date,
            visa_duration_days,
            days_remaining: DayCount::from_days(days_remaining),
        },
    );
    let passenger_id = record.id;
    record.alerts = alerts
        .into_iter()
        .map(|a| Alert {
            id: Uuid::from_u128(a.id),
            passenger_id,
            kind: a.kind,
            message: a.message.to_string(),
            date: a.date,
            read: a.read,
        })
        .collect();
    record
}

/// The fixed demo roster the dashboard starts from
pub fn mock_passengers() -> Vec<PassengerRecord> {
    vec![
        seeded(
            1, "Carlos Silva", "AB123456", "Brazil", "tourist",
            "carlos@email.com", "+55 11 98765-4321",
            day(2025, 1, 15), 90, 15,
            vec![
                SeedAlert { id: 0xa1, kind: AlertKind::Warning, message: "Visa expires in 15 days", date: day(2025, 4, 10), read: false },
                SeedAlert { id: 0xa2, kind: AlertKind::Info, message: "Extension requested", date: day(2025, 3, 20), read: true },
            ],
        ),
        seeded(
            2, "Maria Garcia", "CD789012", "Spain", "student",
            "maria@email.com", "+34 600 123 456",
            day(2025, 2, 1), 180, 45,
            vec![
                SeedAlert { id: 0xa3, kind: AlertKind::Info, message: "Documentation complete", date: day(2025, 2, 5), read: true },
            ],
        ),
        seeded(
            3, "John Smith", "EF345678", "United States", "business",
            "john@email.com", "+1 202 555 0187",
            day(2025, 1, 10), 30, -5,
            vec![
                SeedAlert { id: 0xa4, kind: AlertKind::Danger, message: "Visa expired 5 days ago", date: day(2025, 4, 5), read: false },
            ],
        ),
        seeded(
            4, "Anna Müller", "GH901234", "Germany", "work",
            "anna@email.com", "+49 151 12345678",
            day(2025, 3, 1), 365, 320,
            vec![],
        ),
        seeded(
            5, "Kenji Tanaka", "IJ567890", "Japan", "tourist",
            "kenji@email.com", "+81 90 1234 5678",
            day(2025, 3, 15), 90, 60,
            vec![],
        ),
        seeded(
            6, "Sophie Martin", "KL123456", "France", "student",
            "sophie@email.com", "+33 6 12 34 56 78",
            day(2025, 2, 20), 120, 25,
            vec![
                SeedAlert { id: 0xa5, kind: AlertKind::Warning, message: "Visa expires in 25 days", date: day(2025, 4, 1), read: false },
            ],
        ),
    ]
}

/// A new record with placeholder details, meant to be edited afterwards.
/// `ordinal` is the roster size including this record.
pub fn placeholder_passenger<R: Rng + ?Sized>(
    ordinal: usize,
    visa_days: u32,
    now: DateTime<Utc>,
    rng: &mut R,
) -> PassengerRecord {
    PassengerRecord::new(
        Uuid::new_v4(),
        NewPassenger {
            name: format!("New Passenger {}", ordinal),
            passport_number: format!("XX{}", rng.gen_range(0..1_000_000u32)),
            nationality: "To be defined".to_string(),
            visa_type: "tourist".to_string(),
            email: "email@example.com".to_string(),
            phone: "+00 000 000 000".to_string(),
            entry_date: now,
            visa_duration_days: visa_days,
            days_remaining: DayCount::from_days(visa_days as i64),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use visawatch_core::{DashboardStats, VisaStatus};

    #[test]
    fn test_mock_roster_shape() {
        let records = mock_passengers();
        assert_eq!(records.len(), 6);
        assert_eq!(records[0].name, "Carlos Silva");
        assert_eq!(records[0].status, VisaStatus::Expiring);
        assert_eq!(records[2].status, VisaStatus::Expired);
        for record in &records {
            assert!(record.alerts.iter().all(|a| a.passenger_id == record.id));
        }

        let stats = DashboardStats::collect(&records);
        assert_eq!((stats.valid, stats.expiring, stats.expired), (3, 2, 1));
        assert_eq!(stats.total_alerts, 5);
        assert_eq!(stats.unread_alerts, 3);
    }

    #[test]
    fn test_placeholder_defaults() {
        let mut rng = rand::thread_rng();
        let record = placeholder_passenger(7, 90, Utc::now(), &mut rng);
        assert_eq!(record.name, "New Passenger 7");
        assert!(record.passport_number.expose().starts_with("XX"));
        assert_eq!(record.visa_type, "tourist");
        assert_eq!(record.visa_duration_days, 90);
        assert_eq!(record.days_remaining, DayCount::from_days(90));
        assert_eq!(record.status, VisaStatus::Valid);
        assert!(record.alerts.is_empty());
    }
}
