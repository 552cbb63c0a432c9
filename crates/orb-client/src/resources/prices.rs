//! Price endpoints.

use chrono::{DateTime, Utc};
use orb_core::{MetadataPatch, NewFloatingPrice, Page, Price, PriceEvaluateResponse};
use serde::Serialize;

use crate::client::OrbClient;
use crate::error::ClientError;
use crate::request::{json_body, required, CursorParams, Paginated, Params, Route};

/// Create a price outside any plan.
#[derive(Debug, Clone, Default)]
pub struct PriceCreateParams {
    /// The price definition. Required.
    pub price: Option<NewFloatingPrice>,
    /// Sent as the `Idempotency-Key` header.
    pub idempotency_key: Option<String>,
}

impl From<NewFloatingPrice> for PriceCreateParams {
    fn from(price: NewFloatingPrice) -> Self {
        Self {
            price: Some(price),
            idempotency_key: None,
        }
    }
}

impl Params for PriceCreateParams {
    type Response = Price;
    const ROUTE: Route = Route::post("/prices");

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        json_body(required(&self.price, "price")?)
    }

    fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }
}

/// List prices.
#[derive(Debug, Clone, Default)]
pub struct PriceListParams {
    /// Cursor and page size.
    pub page: CursorParams,
}

impl Params for PriceListParams {
    type Response = Page<Price>;
    const ROUTE: Route = Route::get("/prices");

    fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        self.page.push_query(&mut query);
        query
    }
}

impl Paginated for PriceListParams {
    type Item = Price;

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.page.cursor = cursor;
    }
}

/// Fetch a price by ID.
#[derive(Debug, Clone, Default)]
pub struct PriceFetchParams {
    /// Price ID. Required.
    pub price_id: Option<String>,
}

impl Params for PriceFetchParams {
    type Response = Price;
    const ROUTE: Route = Route::get("/prices/{price_id}");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![("price_id", required(&self.price_id, "price_id")?.clone())])
    }
}

/// Update a price's metadata.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PriceUpdateParams {
    /// Price ID. Required.
    #[serde(skip)]
    pub price_id: Option<String>,
    /// Metadata changes; `None` values delete keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataPatch>,
}

impl Params for PriceUpdateParams {
    type Response = Price;
    const ROUTE: Route = Route::put("/prices/{price_id}");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![("price_id", required(&self.price_id, "price_id")?.clone())])
    }

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        json_body(self)
    }
}

/// Evaluate a price against ingested usage.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PriceEvaluateParams {
    /// Price ID. Required.
    #[serde(skip)]
    pub price_id: Option<String>,
    /// Start of the timeframe, inclusive. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe_start: Option<DateTime<Utc>>,
    /// End of the timeframe, exclusive. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe_end: Option<DateTime<Utc>>,
    /// Only usage of this customer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// Only usage of the customer with this external ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_customer_id: Option<String>,
    /// Event filter expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Properties to group results by.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub grouping_keys: Vec<String>,
}

impl Params for PriceEvaluateParams {
    type Response = PriceEvaluateResponse;
    const ROUTE: Route = Route::post("/prices/{price_id}/evaluate");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![("price_id", required(&self.price_id, "price_id")?.clone())])
    }

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        required(&self.timeframe_start, "timeframe_start")?;
        required(&self.timeframe_end, "timeframe_end")?;
        json_body(self)
    }
}

/// Fetch a price by external ID.
#[derive(Debug, Clone, Default)]
pub struct PriceFetchByExternalIdParams {
    /// External price ID. Required.
    pub external_price_id: Option<String>,
}

impl Params for PriceFetchByExternalIdParams {
    type Response = Price;
    const ROUTE: Route = Route::get("/prices/external_price_id/{external_price_id}");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![(
            "external_price_id",
            required(&self.external_price_id, "external_price_id")?.clone(),
        )])
    }
}

/// Price endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Prices<'a> {
    client: &'a OrbClient,
}

impl<'a> Prices<'a> {
    pub(crate) fn new(client: &'a OrbClient) -> Self {
        Self { client }
    }

    /// Create a price.
    ///
    /// # Errors
    ///
    /// Returns an error if the price is unset, the request fails or the
    /// server returns an error.
    pub async fn create(&self, params: PriceCreateParams) -> Result<Price, ClientError> {
        self.client.execute(&params).await
    }

    /// List prices, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list(&self, params: PriceListParams) -> Result<Page<Price>, ClientError> {
        self.client.execute(&params).await
    }

    /// Fetch a price.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn fetch(&self, price_id: impl Into<String>) -> Result<Price, ClientError> {
        let params = PriceFetchParams {
            price_id: Some(price_id.into()),
        };
        self.client.execute(&params).await
    }

    /// Update a price.
    ///
    /// # Errors
    ///
    /// Returns an error if the price ID is unset, the request fails or the
    /// server returns an error.
    pub async fn update(&self, params: PriceUpdateParams) -> Result<Price, ClientError> {
        self.client.execute(&params).await
    }

    /// Evaluate a price over a timeframe.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is unset, the request fails or
    /// the server returns an error.
    pub async fn evaluate(
        &self,
        params: PriceEvaluateParams,
    ) -> Result<PriceEvaluateResponse, ClientError> {
        self.client.execute(&params).await
    }

    /// Fetch a price by external ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn fetch_by_external_id(
        &self,
        external_price_id: impl Into<String>,
    ) -> Result<Price, ClientError> {
        let params = PriceFetchByExternalIdParams {
            external_price_id: Some(external_price_id.into()),
        };
        self.client.execute(&params).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use orb_core::{Cadence, NewFloatingPriceCommon};

    use super::*;

    #[test]
    fn evaluate_without_price_id_fails_on_url() {
        let params = PriceEvaluateParams {
            timeframe_start: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            timeframe_end: Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
            ..PriceEvaluateParams::default()
        };
        assert!(matches!(
            params.url("https://api.withorb.com/v1"),
            Err(ClientError::MissingArgument { name: "price_id" })
        ));
    }

    #[test]
    fn evaluate_body_leaves_out_the_path_value() {
        let params = PriceEvaluateParams {
            price_id: Some("price_1".into()),
            timeframe_start: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            timeframe_end: Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
            grouping_keys: vec!["region".into()],
            ..PriceEvaluateParams::default()
        };
        let body = params.body().unwrap().unwrap();
        assert!(body.get("price_id").is_none());
        assert_eq!(body["grouping_keys"][0], "region");
        assert_eq!(body["timeframe_start"], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn create_sends_the_price_itself() {
        let params = PriceCreateParams::from(NewFloatingPrice::unit(
            NewFloatingPriceCommon::new("API calls", "item_1", Cadence::Monthly, "USD"),
            "0.01",
        ));
        let body = params.body().unwrap().unwrap();
        assert_eq!(body["model_type"], "unit");
        assert_eq!(body["unit_config"]["unit_amount"], "0.01");
        assert_eq!(body["currency"], "USD");

        let empty = PriceCreateParams::default();
        assert!(matches!(
            empty.body(),
            Err(ClientError::MissingArgument { name: "price" })
        ));
    }
}
