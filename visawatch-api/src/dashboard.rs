use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;
use visawatch_core::stats::unread_alerts;
use visawatch_core::{
    Alert, ClockRules, CoreError, CoreResult, DashboardStats, ExtensionRequest, PassengerPatch,
    PassengerRecord, SearchQuery, VisaStatus,
};
use visawatch_shared::models::events::{
    AlertRaisedEvent, DashboardEvent, PassengerAddedEvent, VisaExtendedEvent,
};
use visawatch_shared::pii::Masked;
use visawatch_store::app_config::BusinessRules;
use visawatch_store::seed::placeholder_passenger;
use visawatch_store::RecordStore;

/// Draft values of the extension form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionForm {
    pub extension_days: String,
    pub reason: String,
}

impl ExtensionForm {
    fn blank(default_days: u32) -> Self {
        Self {
            extension_days: default_days.to_string(),
            reason: String::new(),
        }
    }
}

/// One row of the passenger list
#[derive(Debug, Clone, Serialize)]
pub struct PassengerSummary {
    pub id: Uuid,
    pub name: String,
    pub passport_number: Masked<String>,
    pub nationality: String,
    pub visa_type: String,
    pub status: VisaStatus,
    pub days_remaining: i64,
    pub unread_alerts: usize,
}

impl From<&PassengerRecord> for PassengerSummary {
    fn from(record: &PassengerRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            passport_number: record.passport_number.clone(),
            nationality: record.nationality.clone(),
            visa_type: record.visa_type.clone(),
            status: record.status,
            days_remaining: record.days_remaining.rounded(),
            unread_alerts: record.unread_count(),
        }
    }
}

/// Full record as shown in the detail pane
#[derive(Debug, Clone, Serialize)]
pub struct PassengerDetail {
    pub id: Uuid,
    pub name: String,
    pub passport_number: Masked<String>,
    pub nationality: String,
    pub visa_type: String,
    pub email: Masked<String>,
    pub phone: Masked<String>,
    pub entry_date: DateTime<Utc>,
    pub visa_duration_days: u32,
    pub days_remaining: i64,
    pub days_remaining_exact: f64,
    pub status: VisaStatus,
    pub unread_alerts: usize,
    pub alerts: Vec<Alert>,
}

impl From<&PassengerRecord> for PassengerDetail {
    fn from(record: &PassengerRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            passport_number: record.passport_number.clone(),
            nationality: record.nationality.clone(),
            visa_type: record.visa_type.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            entry_date: record.entry_date,
            visa_duration_days: record.visa_duration_days,
            days_remaining: record.days_remaining.rounded(),
            days_remaining_exact: record.days_remaining.as_days_f64(),
            status: record.status,
            unread_alerts: record.unread_count(),
            alerts: record.alerts.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UnreadAlerts {
    pub count: usize,
    pub alerts: Vec<Alert>,
}

/// Everything the console renders, derived from one snapshot
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub stats: DashboardStats,
    pub query: SearchQuery,
    pub passengers: Vec<PassengerSummary>,
    pub selected: Option<PassengerDetail>,
    pub unread: UnreadAlerts,
    pub form: ExtensionForm,
}

/// Result of an accepted operator action
#[derive(Debug, Clone, Serialize)]
pub struct ActionReceipt<T> {
    pub confirmation: String,
    #[serde(flatten)]
    pub payload: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtensionOutcome {
    pub passenger: PassengerDetail,
    pub alert: Alert,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentAlert {
    pub alert: Alert,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddedPassenger {
    pub passenger: PassengerDetail,
}

/// Controller state: records, selection, list query and form draft.
///
/// The owner serializes access (see `AppState`), so every method runs as one
/// uninterrupted unit relative to the clock.
pub struct Dashboard {
    store: RecordStore,
    seed: Vec<PassengerRecord>,
    selected: Option<Uuid>,
    query: SearchQuery,
    form: ExtensionForm,
    rules: BusinessRules,
    clock_rules: ClockRules,
    events: broadcast::Sender<DashboardEvent>,
}

impl Dashboard {
    pub fn new(
        seed: Vec<PassengerRecord>,
        rules: BusinessRules,
        clock_rules: ClockRules,
        events: broadcast::Sender<DashboardEvent>,
    ) -> Self {
        let selected = seed.first().map(|r| r.id);
        let form = ExtensionForm::blank(rules.default_extension_days);
        Self {
            store: RecordStore::new(seed.clone()),
            seed,
            selected,
            query: SearchQuery::default(),
            form,
            rules,
            clock_rules,
            events,
        }
    }

    pub fn view(&self) -> DashboardView {
        let records = self.store.snapshot();
        let unread: Vec<Alert> = unread_alerts(&records).into_iter().cloned().collect();
        DashboardView {
            stats: DashboardStats::collect(&records),
            query: self.query.clone(),
            passengers: self.query.apply(&records).into_iter().map(PassengerSummary::from).collect(),
            selected: self
                .selected
                .and_then(|id| records.iter().find(|r| r.id == id))
                .map(PassengerDetail::from),
            unread: UnreadAlerts {
                count: unread.len(),
                alerts: unread,
            },
            form: self.form.clone(),
        }
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats::collect(&self.store.snapshot())
    }

    pub fn set_query(&mut self, query: SearchQuery) {
        debug!(search = %query.search, filter = ?query.filter, "list query changed");
        self.query = query;
    }

    /// Ad-hoc listing that leaves the stored query alone
    pub fn list(&self, query: &SearchQuery) -> Vec<PassengerSummary> {
        let records = self.store.snapshot();
        query.apply(&records).into_iter().map(PassengerSummary::from).collect()
    }

    pub fn detail(&self, id: &Uuid) -> CoreResult<PassengerDetail> {
        self.store
            .get(id)
            .map(PassengerDetail::from)
            .ok_or_else(|| CoreError::NotFound(format!("passenger {}", id)))
    }

    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    pub fn select(&mut self, id: &Uuid) -> CoreResult<PassengerDetail> {
        let detail = self.detail(id)?;
        self.selected = Some(*id);
        Ok(detail)
    }

    pub fn form(&self) -> &ExtensionForm {
        &self.form
    }

    pub fn update_form(&mut self, extension_days: Option<String>, reason: Option<String>) -> ExtensionForm {
        if let Some(days) = extension_days {
            self.form.extension_days = days;
        }
        if let Some(reason) = reason {
            self.form.reason = reason;
        }
        self.form.clone()
    }

    /// Add a placeholder passenger and select it.
    ///
    /// The returned detail is read back from the store; a miss there is an
    /// internal fault, not a client error.
    pub fn add_passenger(&mut self) -> anyhow::Result<ActionReceipt<AddedPassenger>> {
        let now = Utc::now();
        let record = placeholder_passenger(
            self.store.len() + 1,
            self.rules.new_passenger_visa_days,
            now,
            &mut rand::thread_rng(),
        );
        let id = record.id;

        info!(passenger_id = %record.id, passport = ?record.passport_number, "passenger added");
        self.publish(DashboardEvent::PassengerAdded(PassengerAddedEvent {
            passenger_id: record.id,
            name: record.name.clone(),
            timestamp: now.timestamp(),
        }));
        self.store.insert(record);

        let detail = self
            .detail(&id)
            .with_context(|| format!("passenger {} missing right after insert", id))?;
        self.selected = Some(id);

        Ok(ActionReceipt {
            confirmation: "New passenger added. Please edit the details.".to_string(),
            payload: AddedPassenger { passenger: detail },
        })
    }

    pub fn edit_passenger(&mut self, id: &Uuid, patch: PassengerPatch) -> CoreResult<PassengerDetail> {
        let record = self.store.edit(id, patch)?;
        info!(passenger_id = %id, "passenger details updated");
        Ok(PassengerDetail::from(&record))
    }

    /// Run the extension workflow for one passenger.
    ///
    /// Missing inputs fall back to the form draft. Invalid input leaves both
    /// the record and the draft untouched; success selects the passenger and
    /// resets the draft.
    pub fn submit_extension(
        &mut self,
        id: &Uuid,
        extension_days: Option<String>,
        reason: Option<String>,
    ) -> CoreResult<ActionReceipt<ExtensionOutcome>> {
        let days_input = extension_days.unwrap_or_else(|| self.form.extension_days.clone());
        let reason_input = reason.unwrap_or_else(|| self.form.reason.clone());

        if self.store.get(id).is_none() {
            return Err(CoreError::NotFound(format!("passenger {}", id)));
        }
        let request = ExtensionRequest::parse(&days_input, &reason_input)?;

        let now = Utc::now();
        let (record, alert) = self
            .store
            .extend(id, &request, self.rules.extension_status_policy, now)?;

        info!(
            passenger_id = %id,
            days = request.days,
            status = record.status.as_str(),
            "visa extended"
        );
        self.publish(DashboardEvent::VisaExtended(VisaExtendedEvent {
            passenger_id: record.id,
            extension_days: request.days,
            days_remaining: record.days_remaining.rounded(),
            status: record.status.as_str().to_string(),
            timestamp: now.timestamp(),
        }));
        self.publish_alert(&alert);

        self.selected = Some(*id);
        self.form = ExtensionForm::blank(self.rules.default_extension_days);

        Ok(ActionReceipt {
            confirmation: format!("Visa for {} extended by {} days.", record.name, request.days),
            payload: ExtensionOutcome {
                passenger: PassengerDetail::from(&record),
                alert,
            },
        })
    }

    /// Send an `info` alert, defaulting to the configured reminder text
    pub fn send_alert(&mut self, id: &Uuid, message: Option<String>) -> CoreResult<ActionReceipt<SentAlert>> {
        let message = message.unwrap_or_else(|| self.rules.reminder_message.clone());
        let alert = self.store.send_alert(id, &message, Utc::now())?;
        let name = self.store.get(id).map(|r| r.name.clone()).unwrap_or_default();

        info!(passenger_id = %id, alert_id = %alert.id, "alert sent");
        self.publish_alert(&alert);

        Ok(ActionReceipt {
            confirmation: format!("Alert sent to {}: {}", name, message),
            payload: SentAlert { alert },
        })
    }

    pub fn unread_alerts(&self) -> UnreadAlerts {
        let records = self.store.snapshot();
        let alerts: Vec<Alert> = unread_alerts(&records).into_iter().cloned().collect();
        UnreadAlerts {
            count: alerts.len(),
            alerts,
        }
    }

    /// No-op for unknown ids
    pub fn mark_alert_read(&mut self, alert_id: &Uuid) -> bool {
        let found = self.store.mark_alert_read(alert_id);
        debug!(alert_id = %alert_id, found, "mark alert read");
        found
    }

    pub fn mark_all_read(&mut self) -> usize {
        let flipped = self.store.mark_all_read();
        debug!(flipped, "marked all alerts read");
        flipped
    }

    /// One simulated clock step over the whole roster
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<Alert> {
        let raised = self.store.tick(&self.clock_rules, now);
        for alert in &raised {
            self.publish_alert(alert);
        }
        raised
    }

    /// Back to the seed roster, first record selected, empty query and form
    pub fn reset(&mut self) {
        self.store.replace_all(self.seed.clone());
        self.selected = self.seed.first().map(|r| r.id);
        self.query = SearchQuery::default();
        self.form = ExtensionForm::blank(self.rules.default_extension_days);
        info!(passengers = self.store.len(), "dashboard reset to seed data");
        self.publish(DashboardEvent::StateReset {
            timestamp: Utc::now().timestamp(),
        });
    }

    fn publish_alert(&self, alert: &Alert) {
        self.publish(DashboardEvent::AlertRaised(AlertRaisedEvent {
            alert_id: alert.id,
            passenger_id: alert.passenger_id,
            kind: alert.kind.as_str().to_string(),
            message: alert.message.clone(),
            raised_at: alert.date.timestamp(),
        }));
    }

    // No subscribers is fine
    fn publish(&self, event: DashboardEvent) {
        let _ = self.events.send(event);
    }
}
