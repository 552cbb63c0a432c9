//! Event ingestion, search and backfill endpoints.

use chrono::{DateTime, Utc};
use orb_core::event::EventProperties;
use orb_core::{
    Backfill, EventAmendResponse, EventDeprecateResponse, EventSearchResult, IngestEvent,
    IngestResponse, Page,
};
use serde::Serialize;

use crate::client::OrbClient;
use crate::error::ClientError;
use crate::request::{json_body, required, CursorParams, Paginated, Params, Route};

/// Ingest a batch of usage events.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestParams {
    /// Events to ingest. Must not be empty.
    pub events: Vec<IngestEvent>,
    /// Ingest into this open backfill.
    #[serde(skip)]
    pub backfill_id: Option<String>,
    /// Return which events were ingested and which were duplicates.
    #[serde(skip)]
    pub debug: Option<bool>,
}

impl IngestParams {
    /// Ingest `events`.
    #[must_use]
    pub fn new(events: Vec<IngestEvent>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }
}

impl Params for IngestParams {
    type Response = IngestResponse;
    const ROUTE: Route = Route::post("/ingest");

    fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(backfill_id) = &self.backfill_id {
            query.push(("backfill_id".to_string(), backfill_id.clone()));
        }
        if let Some(debug) = self.debug {
            query.push(("debug".to_string(), debug.to_string()));
        }
        query
    }

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        if self.events.is_empty() {
            return Err(ClientError::MissingArgument { name: "events" });
        }
        json_body(self)
    }
}

/// Look up events by ID.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventSearchParams {
    /// Event IDs (idempotency keys). Must not be empty.
    pub event_ids: Vec<String>,
    /// Only events at or after this time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe_start: Option<DateTime<Utc>>,
    /// Only events before this time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe_end: Option<DateTime<Utc>>,
}

impl Params for EventSearchParams {
    type Response = EventSearchResult;
    const ROUTE: Route = Route::post("/events/search");

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        if self.event_ids.is_empty() {
            return Err(ClientError::MissingArgument { name: "event_ids" });
        }
        json_body(self)
    }
}

/// Replace an ingested event.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventAmendParams {
    /// Event ID. Required.
    #[serde(skip)]
    pub event_id: Option<String>,
    /// New event name. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    /// New properties.
    pub properties: EventProperties,
    /// New timestamp. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Orb-assigned customer ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// The caller's own customer ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_customer_id: Option<String>,
}

impl Params for EventAmendParams {
    type Response = EventAmendResponse;
    const ROUTE: Route = Route::put("/events/{event_id}");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![("event_id", required(&self.event_id, "event_id")?.clone())])
    }

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        required(&self.event_name, "event_name")?;
        required(&self.timestamp, "timestamp")?;
        json_body(self)
    }
}

/// Deprecate an ingested event.
#[derive(Debug, Clone, Default)]
pub struct EventDeprecateParams {
    /// Event ID. Required.
    pub event_id: Option<String>,
}

impl Params for EventDeprecateParams {
    type Response = EventDeprecateResponse;
    const ROUTE: Route = Route::put("/events/{event_id}/deprecate");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![("event_id", required(&self.event_id, "event_id")?.clone())])
    }
}

/// Open a backfill over a timeframe.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BackfillCreateParams {
    /// Start of the timeframe, inclusive. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe_start: Option<DateTime<Utc>>,
    /// End of the timeframe, exclusive. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe_end: Option<DateTime<Utc>>,
    /// Scope to this customer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// Scope to the customer with this external ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_customer_id: Option<String>,
    /// Filter selecting existing events to deprecate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation_filter: Option<String>,
    /// Replace existing events in the timeframe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace_existing_events: Option<bool>,
    /// Close the backfill automatically at this time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_time: Option<DateTime<Utc>>,
}

impl Params for BackfillCreateParams {
    type Response = Backfill;
    const ROUTE: Route = Route::post("/events/backfills");

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        required(&self.timeframe_start, "timeframe_start")?;
        required(&self.timeframe_end, "timeframe_end")?;
        json_body(self)
    }
}

/// List backfills.
#[derive(Debug, Clone, Default)]
pub struct BackfillListParams {
    /// Cursor and page size.
    pub page: CursorParams,
}

impl Params for BackfillListParams {
    type Response = Page<Backfill>;
    const ROUTE: Route = Route::get("/events/backfills");

    fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        self.page.push_query(&mut query);
        query
    }
}

impl Paginated for BackfillListParams {
    type Item = Backfill;

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.page.cursor = cursor;
    }
}

/// Fetch a backfill by ID.
#[derive(Debug, Clone, Default)]
pub struct BackfillFetchParams {
    /// Backfill ID. Required.
    pub backfill_id: Option<String>,
}

impl Params for BackfillFetchParams {
    type Response = Backfill;
    const ROUTE: Route = Route::get("/events/backfills/{backfill_id}");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        backfill_path(self.backfill_id.as_ref())
    }
}

/// Close a backfill so its events are reflected in billing.
#[derive(Debug, Clone, Default)]
pub struct BackfillCloseParams {
    /// Backfill ID. Required.
    pub backfill_id: Option<String>,
}

impl Params for BackfillCloseParams {
    type Response = Backfill;
    const ROUTE: Route = Route::post("/events/backfills/{backfill_id}/close");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        backfill_path(self.backfill_id.as_ref())
    }
}

/// Revert a closed backfill.
#[derive(Debug, Clone, Default)]
pub struct BackfillRevertParams {
    /// Backfill ID. Required.
    pub backfill_id: Option<String>,
}

impl Params for BackfillRevertParams {
    type Response = Backfill;
    const ROUTE: Route = Route::post("/events/backfills/{backfill_id}/revert");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        backfill_path(self.backfill_id.as_ref())
    }
}

fn backfill_path(id: Option<&String>) -> Result<Vec<(&'static str, String)>, ClientError> {
    let id = id.ok_or(ClientError::MissingArgument {
        name: "backfill_id",
    })?;
    Ok(vec![("backfill_id", id.clone())])
}

/// Event endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Events<'a> {
    client: &'a OrbClient,
}

impl<'a> Events<'a> {
    pub(crate) fn new(client: &'a OrbClient) -> Self {
        Self { client }
    }

    /// Ingest usage events.
    ///
    /// # Errors
    ///
    /// Returns an error if `events` is empty, the request fails or the
    /// server returns an error.
    pub async fn ingest(&self, params: IngestParams) -> Result<IngestResponse, ClientError> {
        self.client.execute(&params).await
    }

    /// Search events by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if no IDs are given, the request fails or the server
    /// returns an error.
    pub async fn search(
        &self,
        params: EventSearchParams,
    ) -> Result<EventSearchResult, ClientError> {
        self.client.execute(&params).await
    }

    /// Amend an event.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is unset, the request fails or
    /// the server returns an error.
    pub async fn amend(&self, params: EventAmendParams) -> Result<EventAmendResponse, ClientError> {
        self.client.execute(&params).await
    }

    /// Deprecate an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn deprecate(
        &self,
        event_id: impl Into<String>,
    ) -> Result<EventDeprecateResponse, ClientError> {
        let params = EventDeprecateParams {
            event_id: Some(event_id.into()),
        };
        self.client.execute(&params).await
    }

    /// Open a backfill.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeframe is unset, the request fails or the
    /// server returns an error.
    pub async fn create_backfill(
        &self,
        params: BackfillCreateParams,
    ) -> Result<Backfill, ClientError> {
        self.client.execute(&params).await
    }

    /// List backfills, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_backfills(
        &self,
        params: BackfillListParams,
    ) -> Result<Page<Backfill>, ClientError> {
        self.client.execute(&params).await
    }

    /// Fetch a backfill.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn fetch_backfill(
        &self,
        backfill_id: impl Into<String>,
    ) -> Result<Backfill, ClientError> {
        let params = BackfillFetchParams {
            backfill_id: Some(backfill_id.into()),
        };
        self.client.execute(&params).await
    }

    /// Close a backfill.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn close_backfill(
        &self,
        backfill_id: impl Into<String>,
    ) -> Result<Backfill, ClientError> {
        let params = BackfillCloseParams {
            backfill_id: Some(backfill_id.into()),
        };
        self.client.execute(&params).await
    }

    /// Revert a backfill.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn revert_backfill(
        &self,
        backfill_id: impl Into<String>,
    ) -> Result<Backfill, ClientError> {
        let params = BackfillRevertParams {
            backfill_id: Some(backfill_id.into()),
        };
        self.client.execute(&params).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn ingest_puts_flags_in_query() {
        let event = IngestEvent::for_external_customer(
            "acme",
            "api_call",
            "evt_1",
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        )
        .with_property("region", "eu");
        let params = IngestParams {
            debug: Some(true),
            ..IngestParams::new(vec![event])
        };

        let url = params.url("https://api.withorb.com/v1").unwrap();
        assert_eq!(url.query(), Some("debug=true"));
        let body = params.body().unwrap().unwrap();
        assert_eq!(body["events"][0]["properties"]["region"], "eu");
        assert!(body.get("debug").is_none());
    }

    #[test]
    fn empty_ingest_is_rejected_before_sending() {
        assert!(matches!(
            IngestParams::default().body(),
            Err(ClientError::MissingArgument { name: "events" })
        ));
    }

    #[test]
    fn backfill_routes_encode_the_id() {
        let params = BackfillRevertParams {
            backfill_id: Some("bf_1".into()),
        };
        assert_eq!(
            params.url("https://api.withorb.com/v1").unwrap().path(),
            "/v1/events/backfills/bf_1/revert"
        );
    }
}
