use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity of a passenger alert
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warning,
    Danger,
    Info,
    Success,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Warning => "warning",
            AlertKind::Danger => "danger",
            AlertKind::Info => "info",
            AlertKind::Success => "success",
        }
    }
}

/// A timestamped notification attached to one passenger record.
///
/// Alerts are never removed; `read` only ever goes from `false` to `true`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub id: Uuid,
    pub passenger_id: Uuid,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    pub date: DateTime<Utc>,
    pub read: bool,
}

impl Alert {
    pub fn new(passenger_id: Uuid, kind: AlertKind, message: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            passenger_id,
            kind,
            message: message.into(),
            date,
            read: false,
        }
    }

    /// Returns true if the flag actually flipped
    pub fn mark_read(&mut self) -> bool {
        let changed = !self.read;
        self.read = true;
        changed
    }
}
