use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use visawatch_core::extension::apply_extension;
use visawatch_core::status::tick_record;
use visawatch_core::{
    Alert, AlertKind, ClockRules, CoreError, CoreResult, ExtensionRequest, ExtensionStatusPolicy,
    PassengerPatch, PassengerRecord,
};

/// In-memory passenger collection.
///
/// Readers hold `Arc` snapshots. Every mutation goes through `Arc::make_mut`,
/// so a snapshot handed out earlier never changes under its holder.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Arc<Vec<PassengerRecord>>,
}

impl RecordStore {
    pub fn new(records: Vec<PassengerRecord>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }

    pub fn snapshot(&self) -> Arc<Vec<PassengerRecord>> {
        Arc::clone(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &Uuid) -> Option<&PassengerRecord> {
        self.records.iter().find(|r| r.id == *id)
    }

    /// Append a record at the end of the collection
    pub fn insert(&mut self, record: PassengerRecord) {
        Arc::make_mut(&mut self.records).push(record);
    }

    /// Discard everything and start over from `records`
    pub fn replace_all(&mut self, records: Vec<PassengerRecord>) {
        self.records = Arc::new(records);
    }

    /// Age every record by one clock step; returns the threshold alerts raised
    pub fn tick(&mut self, rules: &ClockRules, now: DateTime<Utc>) -> Vec<Alert> {
        Arc::make_mut(&mut self.records)
            .iter_mut()
            .flat_map(|record| tick_record(record, rules, now))
            .collect()
    }

    /// Returns the updated record and the `success` alert
    pub fn extend(
        &mut self,
        id: &Uuid,
        request: &ExtensionRequest,
        policy: ExtensionStatusPolicy,
        now: DateTime<Utc>,
    ) -> CoreResult<(PassengerRecord, Alert)> {
        let record = self.get_mut(id)?;
        let alert = apply_extension(record, request, policy, now);
        Ok((record.clone(), alert))
    }

    /// Append an unread `info` alert to one record
    pub fn send_alert(&mut self, id: &Uuid, message: &str, now: DateTime<Utc>) -> CoreResult<Alert> {
        let record = self.get_mut(id)?;
        Ok(record.push_alert(AlertKind::Info, message, now))
    }

    /// Unknown ids are ignored. Returns whether an alert matched.
    pub fn mark_alert_read(&mut self, alert_id: &Uuid) -> bool {
        let owner = self
            .records
            .iter()
            .position(|r| r.alerts.iter().any(|a| a.id == *alert_id));
        match owner {
            Some(index) => Arc::make_mut(&mut self.records)[index].mark_alert_read(alert_id),
            None => false,
        }
    }

    /// Returns how many alerts flipped
    pub fn mark_all_read(&mut self) -> usize {
        if self.records.iter().all(|r| r.unread_count() == 0) {
            return 0;
        }
        Arc::make_mut(&mut self.records)
            .iter_mut()
            .map(|r| r.mark_all_read())
            .sum()
    }

    pub fn edit(&mut self, id: &Uuid, patch: PassengerPatch) -> CoreResult<PassengerRecord> {
        let record = self.get_mut(id)?;
        record.apply_patch(patch)?;
        Ok(record.clone())
    }

    /// Lookup first, so a miss never copies the collection
    fn get_mut(&mut self, id: &Uuid) -> CoreResult<&mut PassengerRecord> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == *id)
            .ok_or_else(|| CoreError::NotFound(format!("passenger {}", id)))?;
        Ok(&mut Arc::make_mut(&mut self.records)[index])
    }
}
