use serde::{Deserialize, Serialize};

use crate::passenger::{PassengerRecord, VisaStatus};

/// Status selector of the passenger list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Valid,
    Expiring,
    Expired,
    Extended,
}

impl StatusFilter {
    pub fn admits(self, status: VisaStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Valid => status == VisaStatus::Valid,
            StatusFilter::Expiring => status == VisaStatus::Expiring,
            StatusFilter::Expired => status == VisaStatus::Expired,
            StatusFilter::Extended => status == VisaStatus::Extended,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default, alias = "status")]
    pub filter: StatusFilter,
}

impl SearchQuery {
    pub fn new(search: impl Into<String>, filter: StatusFilter) -> Self {
        Self {
            search: search.into(),
            filter,
        }
    }

    /// Case-insensitive match on name, passport number or nationality, AND the status filter
    pub fn matches(&self, record: &PassengerRecord) -> bool {
        if !self.filter.admits(record.status) {
            return false;
        }
        let needle = self.search.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            record.name.as_str(),
            record.passport_number.expose().as_str(),
            record.nationality.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Matching records in collection order
    pub fn apply<'a>(&self, records: &'a [PassengerRecord]) -> Vec<&'a PassengerRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::named;

    fn roster() -> Vec<PassengerRecord> {
        vec![
            named("Carlos Silva", "AB123456", "Brazil", 15),
            named("Maria Garcia", "CD789012", "Spain", 45),
            named("John Smith", "EF345678", "United States", -5),
            named("Ana Souza", "SILVA001", "Portugal", 60),
            named("Kenji Tanaka", "IJ567890", "Silvania", 20),
        ]
    }

    #[test]
    fn test_search_matches_any_field_case_insensitively() {
        let records = roster();
        let query = SearchQuery::new("silva", StatusFilter::All);
        let names: Vec<&str> = query.apply(&records).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Carlos Silva", "Ana Souza", "Kenji Tanaka"]);
    }

    #[test]
    fn test_filter_combines_with_search() {
        let records = roster();
        let query = SearchQuery::new("SILVA", StatusFilter::Expiring);
        let names: Vec<&str> = query.apply(&records).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Carlos Silva", "Kenji Tanaka"]);
    }

    #[test]
    fn test_empty_query_passes_everything_in_order() {
        let records = roster();
        let all = SearchQuery::default().apply(&records);
        assert_eq!(all.len(), records.len());
        assert_eq!(all[2].name, "John Smith");
    }

    #[test]
    fn test_extended_filter_is_empty_without_assignments() {
        let records = roster();
        assert!(SearchQuery::new("", StatusFilter::Extended).apply(&records).is_empty());
        assert_eq!(SearchQuery::new("", StatusFilter::Expired).apply(&records).len(), 1);
    }

    #[test]
    fn test_query_accepts_status_alias() {
        let query: SearchQuery = serde_json::from_str(r#"{"search":"kenji","status":"expiring"}"#).unwrap();
        assert_eq!(query.filter, StatusFilter::Expiring);
    }
}
