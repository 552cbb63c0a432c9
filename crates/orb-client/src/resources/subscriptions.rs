//! Subscription endpoints.

use chrono::{DateTime, Utc};
use orb_core::plan::{AddAdjustment, AddPrice, RemovePrice};
use orb_core::{
    AddPriceInterval, CancelOption, EditPriceInterval, Metadata, MetadataPatch, Page,
    Subscription, SubscriptionStatus,
};
use serde::Serialize;

use crate::client::OrbClient;
use crate::error::ClientError;
use crate::request::{
    json_body, required, CursorParams, Paginated, Params, Route, TimeRange,
};

/// Subscribe a customer to a plan.
///
/// The customer is named by `customer_id` or `external_customer_id`, and the
/// plan by `plan_id` or `external_plan_id`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubscriptionCreateParams {
    /// Orb-assigned customer ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// The caller's own customer ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_customer_id: Option<String>,
    /// Orb-assigned plan ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    /// The caller's own plan ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_plan_id: Option<String>,
    /// Plan version to subscribe to; the default version when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_version_number: Option<i64>,
    /// Start of the subscription; now when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    /// End of the subscription; open-ended when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    /// Whether invoices are collected automatically.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_collection: Option<bool>,
    /// Memo printed on invoices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_invoice_memo: Option<String>,
    /// Days until an invoice is due.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_terms: Option<i64>,
    /// User-defined metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Prices added on top of the plan.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add_prices: Vec<AddPrice>,
    /// Plan prices left out of this subscription.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remove_prices: Vec<RemovePrice>,
    /// Adjustments added on top of the plan.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add_adjustments: Vec<AddAdjustment>,
    /// Sent as the `Idempotency-Key` header.
    #[serde(skip)]
    pub idempotency_key: Option<String>,
}

impl SubscriptionCreateParams {
    /// Subscribe the customer with ID `customer_id` to plan `plan_id`.
    #[must_use]
    pub fn new(customer_id: impl Into<String>, plan_id: impl Into<String>) -> Self {
        Self {
            customer_id: Some(customer_id.into()),
            plan_id: Some(plan_id.into()),
            ..Self::default()
        }
    }
}

impl Params for SubscriptionCreateParams {
    type Response = Subscription;
    const ROUTE: Route = Route::post("/subscriptions");

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        if self.customer_id.is_none() && self.external_customer_id.is_none() {
            return Err(ClientError::MissingArgument {
                name: "customer_id",
            });
        }
        if self.plan_id.is_none() && self.external_plan_id.is_none() {
            return Err(ClientError::MissingArgument { name: "plan_id" });
        }
        json_body(self)
    }

    fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }
}

/// List subscriptions.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionListParams {
    /// Cursor and page size.
    pub page: CursorParams,
    /// Filter on creation time.
    pub created_at: TimeRange,
    /// Only subscriptions of these customers.
    pub customer_ids: Vec<String>,
    /// Only subscriptions of these customers, by external ID.
    pub external_customer_ids: Vec<String>,
    /// Only subscriptions in this status.
    pub status: Option<SubscriptionStatus>,
}

impl Params for SubscriptionListParams {
    type Response = Page<Subscription>;
    const ROUTE: Route = Route::get("/subscriptions");

    fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        self.page.push_query(&mut query);
        self.created_at.push_query("created_at", &mut query);
        for id in &self.customer_ids {
            query.push(("customer_id[]".to_string(), id.clone()));
        }
        for id in &self.external_customer_ids {
            query.push(("external_customer_id[]".to_string(), id.clone()));
        }
        if let Some(status) = &self.status {
            query.push(("status".to_string(), status.to_string()));
        }
        query
    }
}

impl Paginated for SubscriptionListParams {
    type Item = Subscription;

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.page.cursor = cursor;
    }
}

/// Fetch a subscription by ID.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionFetchParams {
    /// Subscription ID. Required.
    pub subscription_id: Option<String>,
}

impl Params for SubscriptionFetchParams {
    type Response = Subscription;
    const ROUTE: Route = Route::get("/subscriptions/{subscription_id}");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        subscription_path(self.subscription_id.as_ref())
    }
}

/// Update a subscription's settings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubscriptionUpdateParams {
    /// Subscription ID. Required.
    #[serde(skip)]
    pub subscription_id: Option<String>,
    /// Whether invoices are collected automatically.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_collection: Option<bool>,
    /// Memo printed on invoices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_invoice_memo: Option<String>,
    /// Amount that triggers an early invoice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoicing_threshold: Option<String>,
    /// Metadata changes; `None` values delete keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataPatch>,
    /// Days until an invoice is due.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_terms: Option<i64>,
}

impl Params for SubscriptionUpdateParams {
    type Response = Subscription;
    const ROUTE: Route = Route::put("/subscriptions/{subscription_id}");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        subscription_path(self.subscription_id.as_ref())
    }

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        json_body(self)
    }
}

/// Cancel a subscription.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubscriptionCancelParams {
    /// Subscription ID. Required.
    #[serde(skip)]
    pub subscription_id: Option<String>,
    /// When the cancellation takes effect. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_option: Option<CancelOption>,
    /// Date of a `requested_date` cancellation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_date: Option<DateTime<Utc>>,
    /// Sent as the `Idempotency-Key` header.
    #[serde(skip)]
    pub idempotency_key: Option<String>,
}

impl Params for SubscriptionCancelParams {
    type Response = Subscription;
    const ROUTE: Route = Route::post("/subscriptions/{subscription_id}/cancel");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        subscription_path(self.subscription_id.as_ref())
    }

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        let option = required(&self.cancel_option, "cancel_option")?;
        if *option == CancelOption::RequestedDate {
            required(&self.cancellation_date, "cancellation_date")?;
        }
        json_body(self)
    }

    fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }
}

/// Undo a scheduled cancellation.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionUnscheduleCancellationParams {
    /// Subscription ID. Required.
    pub subscription_id: Option<String>,
}

impl Params for SubscriptionUnscheduleCancellationParams {
    type Response = Subscription;
    const ROUTE: Route = Route::post("/subscriptions/{subscription_id}/unschedule_cancellation");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        subscription_path(self.subscription_id.as_ref())
    }
}

/// Add or edit price intervals of a subscription.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubscriptionPriceIntervalsParams {
    /// Subscription ID. Required.
    #[serde(skip)]
    pub subscription_id: Option<String>,
    /// Intervals to add.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add: Vec<AddPriceInterval>,
    /// Intervals to edit.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub edit: Vec<EditPriceInterval>,
    /// Sent as the `Idempotency-Key` header.
    #[serde(skip)]
    pub idempotency_key: Option<String>,
}

impl Params for SubscriptionPriceIntervalsParams {
    type Response = Subscription;
    const ROUTE: Route = Route::post("/subscriptions/{subscription_id}/price_intervals");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        subscription_path(self.subscription_id.as_ref())
    }

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        json_body(self)
    }

    fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }
}

fn subscription_path(id: Option<&String>) -> Result<Vec<(&'static str, String)>, ClientError> {
    let id = id.ok_or(ClientError::MissingArgument {
        name: "subscription_id",
    })?;
    Ok(vec![("subscription_id", id.clone())])
}

/// Subscription endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Subscriptions<'a> {
    client: &'a OrbClient,
}

impl<'a> Subscriptions<'a> {
    pub(crate) fn new(client: &'a OrbClient) -> Self {
        Self { client }
    }

    /// Create a subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer or plan is unset, the request fails
    /// or the server returns an error.
    pub async fn create(
        &self,
        params: SubscriptionCreateParams,
    ) -> Result<Subscription, ClientError> {
        self.client.execute(&params).await
    }

    /// List subscriptions, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list(
        &self,
        params: SubscriptionListParams,
    ) -> Result<Page<Subscription>, ClientError> {
        self.client.execute(&params).await
    }

    /// Fetch a subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn fetch(
        &self,
        subscription_id: impl Into<String>,
    ) -> Result<Subscription, ClientError> {
        let params = SubscriptionFetchParams {
            subscription_id: Some(subscription_id.into()),
        };
        self.client.execute(&params).await
    }

    /// Update a subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscription ID is unset, the request fails
    /// or the server returns an error.
    pub async fn update(
        &self,
        params: SubscriptionUpdateParams,
    ) -> Result<Subscription, ClientError> {
        self.client.execute(&params).await
    }

    /// Cancel a subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is unset, the request fails or
    /// the server returns an error.
    pub async fn cancel(
        &self,
        params: SubscriptionCancelParams,
    ) -> Result<Subscription, ClientError> {
        self.client.execute(&params).await
    }

    /// Undo a scheduled cancellation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn unschedule_cancellation(
        &self,
        subscription_id: impl Into<String>,
    ) -> Result<Subscription, ClientError> {
        let params = SubscriptionUnscheduleCancellationParams {
            subscription_id: Some(subscription_id.into()),
        };
        self.client.execute(&params).await
    }

    /// Add or edit price intervals.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscription ID is unset, the request fails
    /// or the server returns an error.
    pub async fn price_intervals(
        &self,
        params: SubscriptionPriceIntervalsParams,
    ) -> Result<Subscription, ClientError> {
        self.client.execute(&params).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use orb_core::BillingCycleRelativeDate;

    use super::*;

    #[test]
    fn create_needs_a_customer() {
        let params = SubscriptionCreateParams {
            plan_id: Some("plan_1".into()),
            ..SubscriptionCreateParams::default()
        };
        assert!(matches!(
            params.body(),
            Err(ClientError::MissingArgument { name: "customer_id" })
        ));

        let params = SubscriptionCreateParams {
            external_customer_id: Some("acme".into()),
            external_plan_id: Some("pro".into()),
            ..SubscriptionCreateParams::default()
        };
        let body = params.body().unwrap().unwrap();
        assert_eq!(body["external_customer_id"], "acme");
        assert!(body.get("customer_id").is_none());
    }

    #[test]
    fn requested_date_cancel_needs_a_date() {
        let mut params = SubscriptionCancelParams {
            subscription_id: Some("sub_1".into()),
            cancel_option: Some(CancelOption::RequestedDate),
            ..SubscriptionCancelParams::default()
        };
        assert!(matches!(
            params.body(),
            Err(ClientError::MissingArgument {
                name: "cancellation_date"
            })
        ));

        params.cancellation_date = Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        let body = params.body().unwrap().unwrap();
        assert_eq!(body["cancel_option"], "requested_date");
        assert_eq!(body["cancellation_date"], "2024-06-01T00:00:00Z");
    }

    #[test]
    fn list_repeats_customer_filters() {
        let params = SubscriptionListParams {
            customer_ids: vec!["c1".into(), "c2".into()],
            status: Some(SubscriptionStatus::Active),
            ..SubscriptionListParams::default()
        };
        let url = params.url("https://api.withorb.com/v1").unwrap();
        assert_eq!(
            url.query(),
            Some("customer_id%5B%5D=c1&customer_id%5B%5D=c2&status=active")
        );
    }

    #[test]
    fn price_intervals_encode_relative_dates() {
        let params = SubscriptionPriceIntervalsParams {
            subscription_id: Some("sub_1".into()),
            add: vec![AddPriceInterval::for_price(
                "price_1",
                BillingCycleRelativeDate::StartOfTerm.into(),
            )],
            ..SubscriptionPriceIntervalsParams::default()
        };
        let body = params.body().unwrap().unwrap();
        assert_eq!(body["add"][0]["start_date"], "start_of_term");
        assert_eq!(body["add"][0]["price_id"], "price_1");
        assert!(body.get("edit").is_none());
        assert_eq!(
            params.url("https://api.withorb.com/v1").unwrap().path(),
            "/v1/subscriptions/sub_1/price_intervals"
        );
    }
}
