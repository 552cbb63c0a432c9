//! Usage events and backfills.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::string_enum;
use crate::validate::validate_fields;

/// Event properties: a flat JSON object.
pub type EventProperties = serde_json::Map<String, serde_json::Value>;

/// A usage event to ingest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestEvent {
    /// Name of the event.
    pub event_name: String,
    /// Key deduplicating this event.
    pub idempotency_key: String,
    /// Event properties.
    pub properties: EventProperties,
    /// When the event happened.
    pub timestamp: DateTime<Utc>,
    /// Orb-assigned customer ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// The caller's own customer ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_customer_id: Option<String>,
}

impl IngestEvent {
    /// An event for the customer with the given external ID.
    pub fn for_external_customer(
        external_customer_id: impl Into<String>,
        event_name: impl Into<String>,
        idempotency_key: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            event_name: event_name.into(),
            idempotency_key: idempotency_key.into(),
            properties: EventProperties::new(),
            timestamp,
            customer_id: None,
            external_customer_id: Some(external_customer_id.into()),
        }
    }

    /// Set one property.
    #[must_use]
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// An event rejected at ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// Idempotency key of the rejected event.
    pub idempotency_key: String,
    /// Why it was rejected.
    pub validation_errors: Vec<String>,
}

/// Debug output of an ingestion call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestDebug {
    /// Keys already seen.
    pub duplicate: Vec<String>,
    /// Keys ingested.
    pub ingested: Vec<String>,
}

/// Result of an ingestion call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResponse {
    /// Events that failed validation.
    pub validation_failed: Vec<ValidationFailure>,
    /// Present when ingestion ran in debug mode.
    #[serde(default)]
    pub debug: Option<IngestDebug>,
}

/// A stored event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Orb-assigned event ID (the idempotency key).
    pub id: String,
    /// Orb-assigned customer ID.
    #[serde(default)]
    pub customer_id: Option<String>,
    /// Whether the event was deprecated.
    pub deprecated: bool,
    /// Name of the event.
    pub event_name: String,
    /// The caller's own customer ID.
    #[serde(default)]
    pub external_customer_id: Option<String>,
    /// Event properties.
    pub properties: EventProperties,
    /// When the event happened.
    pub timestamp: DateTime<Utc>,
}

/// Events matched by a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSearchResult {
    /// Matching events.
    pub data: Vec<Event>,
}

/// Result of amending an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAmendResponse {
    /// ID of the amended event.
    pub amended: String,
}

/// Result of deprecating an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDeprecateResponse {
    /// ID of the deprecated event.
    pub deprecated: String,
}

string_enum! {
    /// Lifecycle state of a backfill.
    pub enum BackfillStatus {
        /// Open and accepting events.
        Pending = "pending",
        /// Closed and reflected in billing.
        Reflected = "reflected",
        /// Being reverted.
        PendingRevert = "pending_revert",
        /// Reverted.
        Reverted = "reverted",
    }
}

/// A batch of historical events replacing or adding to a timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backfill {
    /// Orb-assigned backfill ID.
    pub id: String,
    /// When the backfill was closed.
    #[serde(default)]
    pub close_time: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Customer the backfill is scoped to.
    #[serde(default)]
    pub customer_id: Option<String>,
    /// Filter selecting events to deprecate.
    #[serde(default)]
    pub deprecation_filter: Option<String>,
    /// Events ingested so far.
    pub events_ingested: i64,
    /// Whether existing events in the timeframe are replaced.
    pub replace_existing_events: bool,
    /// When the backfill was reverted.
    #[serde(default)]
    pub reverted_at: Option<DateTime<Utc>>,
    /// Lifecycle state.
    pub status: BackfillStatus,
    /// End of the timeframe, exclusive.
    pub timeframe_end: DateTime<Utc>,
    /// Start of the timeframe, inclusive.
    pub timeframe_start: DateTime<Utc>,
}

validate_fields!(IngestEvent {});
validate_fields!(ValidationFailure {});
validate_fields!(IngestDebug {});
validate_fields!(IngestResponse {
    validation_failed,
    debug,
});
validate_fields!(Event {});
validate_fields!(EventSearchResult { data });
validate_fields!(EventAmendResponse {});
validate_fields!(EventDeprecateResponse {});
validate_fields!(Backfill { status });

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::validate::Validate;

    #[test]
    fn ingest_event_skips_unset_customer_ids() {
        let event = IngestEvent::for_external_customer(
            "acme",
            "api_call",
            "evt_1",
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        )
        .with_property("region", "eu");
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "event_name": "api_call",
                "idempotency_key": "evt_1",
                "properties": {"region": "eu"},
                "timestamp": "2024-03-01T00:00:00Z",
                "external_customer_id": "acme"
            })
        );
    }

    #[test]
    fn backfill_status_is_validated() {
        let backfill: Backfill = serde_json::from_value(json!({
            "id": "bf_1",
            "created_at": "2024-03-01T00:00:00Z",
            "events_ingested": 0,
            "replace_existing_events": true,
            "status": "reflected",
            "timeframe_end": "2024-03-02T00:00:00Z",
            "timeframe_start": "2024-03-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(backfill.status, BackfillStatus::Reflected);
        assert!(backfill.validate().is_ok());
    }
}
