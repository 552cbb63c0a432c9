//! Alert endpoints.

use orb_core::{Alert, AlertType, Page, Threshold};
use serde::Serialize;

use crate::client::OrbClient;
use crate::error::ClientError;
use crate::request::{json_body, required, CursorParams, Paginated, Params, Route, TimeRange};

/// What a new alert watches and when it fires.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AlertRule {
    /// Alert type. Required.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<AlertType>,
    /// Currency watched, for cost and credit alerts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Metric watched, for usage alerts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_id: Option<String>,
    /// Trigger values.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub thresholds: Vec<Threshold>,
}

impl AlertRule {
    /// A rule of the given type with the given thresholds.
    #[must_use]
    pub fn new(kind: AlertType, thresholds: impl IntoIterator<Item = f64>) -> Self {
        Self {
            kind: Some(kind),
            thresholds: thresholds.into_iter().map(|value| Threshold { value }).collect(),
            ..Self::default()
        }
    }

    fn checked_body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        required(&self.kind, "type")?;
        json_body(self)
    }
}

/// Create an alert for a customer.
#[derive(Debug, Clone, Default)]
pub struct CustomerAlertCreateParams {
    /// Customer ID. Required.
    pub customer_id: Option<String>,
    /// The alert rule.
    pub rule: AlertRule,
}

impl Params for CustomerAlertCreateParams {
    type Response = Alert;
    const ROUTE: Route = Route::post("/alerts/customer_id/{customer_id}");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![(
            "customer_id",
            required(&self.customer_id, "customer_id")?.clone(),
        )])
    }

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        self.rule.checked_body()
    }
}

/// Create an alert for a customer addressed by external ID.
#[derive(Debug, Clone, Default)]
pub struct ExternalCustomerAlertCreateParams {
    /// External customer ID. Required.
    pub external_customer_id: Option<String>,
    /// The alert rule.
    pub rule: AlertRule,
}

impl Params for ExternalCustomerAlertCreateParams {
    type Response = Alert;
    const ROUTE: Route = Route::post("/alerts/external_customer_id/{external_customer_id}");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![(
            "external_customer_id",
            required(&self.external_customer_id, "external_customer_id")?.clone(),
        )])
    }

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        self.rule.checked_body()
    }
}

/// Create an alert for a subscription.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionAlertCreateParams {
    /// Subscription ID. Required.
    pub subscription_id: Option<String>,
    /// The alert rule.
    pub rule: AlertRule,
}

impl Params for SubscriptionAlertCreateParams {
    type Response = Alert;
    const ROUTE: Route = Route::post("/alerts/subscription_id/{subscription_id}");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![(
            "subscription_id",
            required(&self.subscription_id, "subscription_id")?.clone(),
        )])
    }

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        if self.rule.thresholds.is_empty() {
            return Err(ClientError::MissingArgument { name: "thresholds" });
        }
        self.rule.checked_body()
    }
}

/// List alerts.
#[derive(Debug, Clone, Default)]
pub struct AlertListParams {
    /// Cursor and page size.
    pub page: CursorParams,
    /// Filter on creation time.
    pub created_at: TimeRange,
    /// Only alerts of this customer.
    pub customer_id: Option<String>,
    /// Only alerts of the customer with this external ID.
    pub external_customer_id: Option<String>,
    /// Only alerts of this subscription.
    pub subscription_id: Option<String>,
}

impl Params for AlertListParams {
    type Response = Page<Alert>;
    const ROUTE: Route = Route::get("/alerts");

    fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        self.page.push_query(&mut query);
        self.created_at.push_query("created_at", &mut query);
        let filters = [
            ("customer_id", &self.customer_id),
            ("external_customer_id", &self.external_customer_id),
            ("subscription_id", &self.subscription_id),
        ];
        for (key, value) in filters {
            if let Some(value) = value {
                query.push((key.to_string(), value.clone()));
            }
        }
        query
    }
}

impl Paginated for AlertListParams {
    type Item = Alert;

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.page.cursor = cursor;
    }
}

/// Fetch an alert by ID.
#[derive(Debug, Clone, Default)]
pub struct AlertFetchParams {
    /// Alert ID. Required.
    pub alert_id: Option<String>,
}

impl Params for AlertFetchParams {
    type Response = Alert;
    const ROUTE: Route = Route::get("/alerts/{alert_id}");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![("alert_id", required(&self.alert_id, "alert_id")?.clone())])
    }
}

/// Replace an alert's thresholds.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AlertUpdateParams {
    /// Alert configuration ID. Required.
    #[serde(skip)]
    pub alert_configuration_id: Option<String>,
    /// New trigger values.
    pub thresholds: Vec<Threshold>,
}

impl Params for AlertUpdateParams {
    type Response = Alert;
    const ROUTE: Route = Route::put("/alerts/{alert_configuration_id}");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        alert_configuration_path(self.alert_configuration_id.as_ref())
    }

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        json_body(self)
    }
}

/// Enable an alert.
#[derive(Debug, Clone, Default)]
pub struct AlertEnableParams {
    /// Alert configuration ID. Required.
    pub alert_configuration_id: Option<String>,
    /// Enable only for this subscription.
    pub subscription_id: Option<String>,
}

impl Params for AlertEnableParams {
    type Response = Alert;
    const ROUTE: Route = Route::post("/alerts/{alert_configuration_id}/enable");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        alert_configuration_path(self.alert_configuration_id.as_ref())
    }

    fn query(&self) -> Vec<(String, String)> {
        subscription_query(self.subscription_id.as_ref())
    }
}

/// Disable an alert.
#[derive(Debug, Clone, Default)]
pub struct AlertDisableParams {
    /// Alert configuration ID. Required.
    pub alert_configuration_id: Option<String>,
    /// Disable only for this subscription.
    pub subscription_id: Option<String>,
}

impl Params for AlertDisableParams {
    type Response = Alert;
    const ROUTE: Route = Route::post("/alerts/{alert_configuration_id}/disable");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        alert_configuration_path(self.alert_configuration_id.as_ref())
    }

    fn query(&self) -> Vec<(String, String)> {
        subscription_query(self.subscription_id.as_ref())
    }
}

fn alert_configuration_path(
    id: Option<&String>,
) -> Result<Vec<(&'static str, String)>, ClientError> {
    let id = id.ok_or(ClientError::MissingArgument {
        name: "alert_configuration_id",
    })?;
    Ok(vec![("alert_configuration_id", id.clone())])
}

fn subscription_query(subscription_id: Option<&String>) -> Vec<(String, String)> {
    subscription_id
        .map(|id| vec![("subscription_id".to_string(), id.clone())])
        .unwrap_or_default()
}

/// Alert endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Alerts<'a> {
    client: &'a OrbClient,
}

impl<'a> Alerts<'a> {
    pub(crate) fn new(client: &'a OrbClient) -> Self {
        Self { client }
    }

    /// List alerts, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list(&self, params: AlertListParams) -> Result<Page<Alert>, ClientError> {
        self.client.execute(&params).await
    }

    /// Fetch an alert.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn fetch(&self, alert_id: impl Into<String>) -> Result<Alert, ClientError> {
        let params = AlertFetchParams {
            alert_id: Some(alert_id.into()),
        };
        self.client.execute(&params).await
    }

    /// Replace an alert's thresholds.
    ///
    /// # Errors
    ///
    /// Returns an error if the alert ID is unset, the request fails or the
    /// server returns an error.
    pub async fn update(&self, params: AlertUpdateParams) -> Result<Alert, ClientError> {
        self.client.execute(&params).await
    }

    /// Create an alert for a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is unset, the request fails or
    /// the server returns an error.
    pub async fn create_for_customer(
        &self,
        params: CustomerAlertCreateParams,
    ) -> Result<Alert, ClientError> {
        self.client.execute(&params).await
    }

    /// Create an alert for a customer addressed by external ID.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is unset, the request fails or
    /// the server returns an error.
    pub async fn create_for_external_customer(
        &self,
        params: ExternalCustomerAlertCreateParams,
    ) -> Result<Alert, ClientError> {
        self.client.execute(&params).await
    }

    /// Create an alert for a subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is unset, the request fails or
    /// the server returns an error.
    pub async fn create_for_subscription(
        &self,
        params: SubscriptionAlertCreateParams,
    ) -> Result<Alert, ClientError> {
        self.client.execute(&params).await
    }

    /// Enable an alert.
    ///
    /// # Errors
    ///
    /// Returns an error if the alert ID is unset, the request fails or the
    /// server returns an error.
    pub async fn enable(&self, params: AlertEnableParams) -> Result<Alert, ClientError> {
        self.client.execute(&params).await
    }

    /// Disable an alert.
    ///
    /// # Errors
    ///
    /// Returns an error if the alert ID is unset, the request fails or the
    /// server returns an error.
    pub async fn disable(&self, params: AlertDisableParams) -> Result<Alert, ClientError> {
        self.client.execute(&params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_body_renames_type() {
        let params = CustomerAlertCreateParams {
            customer_id: Some("cus_1".into()),
            rule: AlertRule {
                currency: Some("USD".into()),
                ..AlertRule::new(AlertType::CreditBalanceDropped, [10.0])
            },
        };
        let body = params.body().unwrap().unwrap();
        assert_eq!(body["type"], "credit_balance_dropped");
        assert_eq!(body["thresholds"][0]["value"], 10.0);
        assert!(body.get("metric_id").is_none());
    }

    #[test]
    fn subscription_alert_needs_thresholds() {
        let params = SubscriptionAlertCreateParams {
            subscription_id: Some("sub_1".into()),
            rule: AlertRule::new(AlertType::UsageExceeded, Vec::<f64>::new()),
        };
        assert!(matches!(
            params.body(),
            Err(ClientError::MissingArgument { name: "thresholds" })
        ));
    }

    #[test]
    fn enable_scopes_to_subscription_in_query() {
        let params = AlertEnableParams {
            alert_configuration_id: Some("alert_1".into()),
            subscription_id: Some("sub_1".into()),
        };
        let url = params.url("https://api.withorb.com/v1").unwrap();
        assert_eq!(url.path(), "/v1/alerts/alert_1/enable");
        assert_eq!(url.query(), Some("subscription_id=sub_1"));
        assert!(params.body().unwrap().is_none());
    }
}
