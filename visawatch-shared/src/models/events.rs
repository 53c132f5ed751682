use uuid::Uuid;

/// Payloads pushed to live dashboard subscribers.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DashboardEvent {
    AlertRaised(AlertRaisedEvent),
    PassengerAdded(PassengerAddedEvent),
    VisaExtended(VisaExtendedEvent),
    StateReset { timestamp: i64 },
}

impl DashboardEvent {
    /// SSE event name for this payload.
    pub fn name(&self) -> &'static str {
        match self {
            DashboardEvent::AlertRaised(_) => "alert_raised",
            DashboardEvent::PassengerAdded(_) => "passenger_added",
            DashboardEvent::VisaExtended(_) => "visa_extended",
            DashboardEvent::StateReset { .. } => "state_reset",
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct AlertRaisedEvent {
    pub alert_id: Uuid,
    pub passenger_id: Uuid,
    pub kind: String,
    pub message: String,
    pub raised_at: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct PassengerAddedEvent {
    pub passenger_id: Uuid,
    pub name: String,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct VisaExtendedEvent {
    pub passenger_id: Uuid,
    pub extension_days: u32,
    pub days_remaining: i64,
    pub status: String,
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_is_tagged() {
        let event = DashboardEvent::StateReset { timestamp: 42 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "state_reset");
        assert_eq!(json["timestamp"], 42);
        assert_eq!(event.name(), "state_reset");
    }
}
