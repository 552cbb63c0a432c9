//! Plan endpoints.

use orb_core::plan::{
    AddAdjustment, AddPrice, Plan, PlanStatus, PlanVersion, RemoveAdjustment, RemovePrice,
    ReplaceAdjustment, ReplacePrice,
};
use orb_core::{Metadata, MetadataPatch, NewPlanPrice, Page};
use serde::Serialize;

use crate::client::OrbClient;
use crate::error::ClientError;
use crate::request::{json_body, required, CursorParams, Paginated, Params, Route, TimeRange};

/// Create a plan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanCreateParams {
    /// Currency of the plan. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Plan name. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Prices of the first version.
    pub prices: Vec<NewPlanPrice>,
    /// Memo printed on invoices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_invoice_memo: Option<String>,
    /// The caller's own plan ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_plan_id: Option<String>,
    /// User-defined metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Days until an invoice is due.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_terms: Option<i64>,
    /// Initial status; `active` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PlanStatus>,
    /// Sent as the `Idempotency-Key` header.
    #[serde(skip)]
    pub idempotency_key: Option<String>,
}

impl PlanCreateParams {
    /// A plan with the given name, currency and prices.
    #[must_use]
    pub fn new(name: impl Into<String>, currency: impl Into<String>, prices: Vec<NewPlanPrice>) -> Self {
        Self {
            name: Some(name.into()),
            currency: Some(currency.into()),
            prices,
            ..Self::default()
        }
    }
}

impl Params for PlanCreateParams {
    type Response = Plan;
    const ROUTE: Route = Route::post("/plans");

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        required(&self.currency, "currency")?;
        required(&self.name, "name")?;
        json_body(self)
    }

    fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }
}

/// List plans.
#[derive(Debug, Clone, Default)]
pub struct PlanListParams {
    /// Cursor and page size.
    pub page: CursorParams,
    /// Filter on creation time.
    pub created_at: TimeRange,
    /// Only plans in this status.
    pub status: Option<PlanStatus>,
}

impl Params for PlanListParams {
    type Response = Page<Plan>;
    const ROUTE: Route = Route::get("/plans");

    fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        self.page.push_query(&mut query);
        self.created_at.push_query("created_at", &mut query);
        if let Some(status) = &self.status {
            query.push(("status".to_string(), status.to_string()));
        }
        query
    }
}

impl Paginated for PlanListParams {
    type Item = Plan;

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.page.cursor = cursor;
    }
}

/// Fetch a plan by ID.
#[derive(Debug, Clone, Default)]
pub struct PlanFetchParams {
    /// Plan ID. Required.
    pub plan_id: Option<String>,
}

impl Params for PlanFetchParams {
    type Response = Plan;
    const ROUTE: Route = Route::get("/plans/{plan_id}");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![("plan_id", required(&self.plan_id, "plan_id")?.clone())])
    }
}

/// Update a plan's external ID or metadata.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanUpdateParams {
    /// Plan ID. Required.
    #[serde(skip)]
    pub plan_id: Option<String>,
    /// New external plan ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_plan_id: Option<String>,
    /// Metadata changes; `None` values delete keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataPatch>,
}

impl Params for PlanUpdateParams {
    type Response = Plan;
    const ROUTE: Route = Route::put("/plans/{plan_id}");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![("plan_id", required(&self.plan_id, "plan_id")?.clone())])
    }

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        json_body(self)
    }
}

/// Fetch a plan by external ID.
#[derive(Debug, Clone, Default)]
pub struct PlanFetchByExternalIdParams {
    /// External plan ID. Required.
    pub external_plan_id: Option<String>,
}

impl Params for PlanFetchByExternalIdParams {
    type Response = Plan;
    const ROUTE: Route = Route::get("/plans/external_plan_id/{external_plan_id}");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![(
            "external_plan_id",
            required(&self.external_plan_id, "external_plan_id")?.clone(),
        )])
    }
}

/// Update a plan addressed by external ID.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanUpdateByExternalIdParams {
    /// Current external plan ID. Required.
    #[serde(skip)]
    pub other_external_plan_id: Option<String>,
    /// New external plan ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_plan_id: Option<String>,
    /// Metadata changes; `None` values delete keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataPatch>,
}

impl Params for PlanUpdateByExternalIdParams {
    type Response = Plan;
    const ROUTE: Route = Route::put("/plans/external_plan_id/{other_external_plan_id}");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![(
            "other_external_plan_id",
            required(&self.other_external_plan_id, "other_external_plan_id")?.clone(),
        )])
    }

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        json_body(self)
    }
}

/// Create a new version of a plan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanVersionCreateParams {
    /// Plan ID. Required.
    #[serde(skip)]
    pub plan_id: Option<String>,
    /// Version number to create. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    /// Prices to add.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add_prices: Vec<AddPrice>,
    /// Adjustments to add.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add_adjustments: Vec<AddAdjustment>,
    /// Prices to remove.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remove_prices: Vec<RemovePrice>,
    /// Adjustments to remove.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remove_adjustments: Vec<RemoveAdjustment>,
    /// Prices to replace.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replace_prices: Vec<ReplacePrice>,
    /// Adjustments to replace.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replace_adjustments: Vec<ReplaceAdjustment>,
    /// Make the new version the default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_as_default: Option<bool>,
}

impl PlanVersionCreateParams {
    /// A new version `version` of `plan_id` with no changes yet.
    #[must_use]
    pub fn new(plan_id: impl Into<String>, version: i64) -> Self {
        Self {
            plan_id: Some(plan_id.into()),
            version: Some(version),
            ..Self::default()
        }
    }

    /// Add a price.
    #[must_use]
    pub fn add_price(mut self, price: AddPrice) -> Self {
        self.add_prices.push(price);
        self
    }

    /// Remove a price.
    #[must_use]
    pub fn remove_price(mut self, price_id: impl Into<String>) -> Self {
        self.remove_prices.push(RemovePrice {
            price_id: price_id.into(),
            plan_phase_order: None,
        });
        self
    }
}

impl Params for PlanVersionCreateParams {
    type Response = PlanVersion;
    const ROUTE: Route = Route::post("/plans/{plan_id}/versions");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![("plan_id", required(&self.plan_id, "plan_id")?.clone())])
    }

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        required(&self.version, "version")?;
        json_body(self)
    }
}

/// Fetch one version of a plan.
#[derive(Debug, Clone, Default)]
pub struct PlanVersionFetchParams {
    /// Plan ID. Required.
    pub plan_id: Option<String>,
    /// Version number. Required.
    pub version: Option<i64>,
}

impl Params for PlanVersionFetchParams {
    type Response = PlanVersion;
    const ROUTE: Route = Route::get("/plans/{plan_id}/versions/{version}");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![
            ("plan_id", required(&self.plan_id, "plan_id")?.clone()),
            ("version", required(&self.version, "version")?.to_string()),
        ])
    }
}

/// Make a version the plan's default.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanSetDefaultVersionParams {
    /// Plan ID. Required.
    #[serde(skip)]
    pub plan_id: Option<String>,
    /// Version to make default. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

impl Params for PlanSetDefaultVersionParams {
    type Response = Plan;
    const ROUTE: Route = Route::post("/plans/{plan_id}/set_default_version");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![("plan_id", required(&self.plan_id, "plan_id")?.clone())])
    }

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        required(&self.version, "version")?;
        json_body(self)
    }
}

/// Create a version of a plan addressed by external ID.
#[derive(Debug, Clone, Default)]
pub struct PlanVersionCreateByExternalIdParams {
    /// External plan ID. Required.
    pub external_plan_id: Option<String>,
    /// Version number and changes. Its `plan_id` is not used.
    pub changes: PlanVersionCreateParams,
}

impl PlanVersionCreateByExternalIdParams {
    /// A new version `version` of `external_plan_id` with no changes yet.
    #[must_use]
    pub fn new(external_plan_id: impl Into<String>, version: i64) -> Self {
        Self {
            external_plan_id: Some(external_plan_id.into()),
            changes: PlanVersionCreateParams {
                version: Some(version),
                ..PlanVersionCreateParams::default()
            },
        }
    }

    /// Add a price.
    #[must_use]
    pub fn add_price(mut self, price: AddPrice) -> Self {
        self.changes = self.changes.add_price(price);
        self
    }

    /// Remove a price.
    #[must_use]
    pub fn remove_price(mut self, price_id: impl Into<String>) -> Self {
        self.changes = self.changes.remove_price(price_id);
        self
    }
}

impl Params for PlanVersionCreateByExternalIdParams {
    type Response = PlanVersion;
    const ROUTE: Route = Route::post("/plans/external_plan_id/{external_plan_id}/versions");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![(
            "external_plan_id",
            required(&self.external_plan_id, "external_plan_id")?.clone(),
        )])
    }

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        required(&self.changes.version, "version")?;
        json_body(&self.changes)
    }
}

/// Fetch one version of a plan addressed by external ID.
#[derive(Debug, Clone, Default)]
pub struct PlanVersionFetchByExternalIdParams {
    /// External plan ID. Required.
    pub external_plan_id: Option<String>,
    /// Version number. Required.
    pub version: Option<i64>,
}

impl Params for PlanVersionFetchByExternalIdParams {
    type Response = PlanVersion;
    const ROUTE: Route =
        Route::get("/plans/external_plan_id/{external_plan_id}/versions/{version}");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![
            (
                "external_plan_id",
                required(&self.external_plan_id, "external_plan_id")?.clone(),
            ),
            ("version", required(&self.version, "version")?.to_string()),
        ])
    }
}

/// Make a version the default of a plan addressed by external ID.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanSetDefaultVersionByExternalIdParams {
    /// External plan ID. Required.
    #[serde(skip)]
    pub external_plan_id: Option<String>,
    /// Version to make default. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

impl Params for PlanSetDefaultVersionByExternalIdParams {
    type Response = Plan;
    const ROUTE: Route =
        Route::post("/plans/external_plan_id/{external_plan_id}/set_default_version");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![(
            "external_plan_id",
            required(&self.external_plan_id, "external_plan_id")?.clone(),
        )])
    }

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        required(&self.version, "version")?;
        json_body(self)
    }
}

/// Plan endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Plans<'a> {
    client: &'a OrbClient,
}

impl<'a> Plans<'a> {
    pub(crate) fn new(client: &'a OrbClient) -> Self {
        Self { client }
    }

    /// Create a plan.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is unset, the request fails or
    /// the server returns an error.
    pub async fn create(&self, params: PlanCreateParams) -> Result<Plan, ClientError> {
        self.client.execute(&params).await
    }

    /// List plans, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list(&self, params: PlanListParams) -> Result<Page<Plan>, ClientError> {
        self.client.execute(&params).await
    }

    /// Fetch a plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn fetch(&self, plan_id: impl Into<String>) -> Result<Plan, ClientError> {
        let params = PlanFetchParams {
            plan_id: Some(plan_id.into()),
        };
        self.client.execute(&params).await
    }

    /// Update a plan.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is unset, the request fails or
    /// the server returns an error.
    pub async fn update(&self, params: PlanUpdateParams) -> Result<Plan, ClientError> {
        self.client.execute(&params).await
    }

    /// Fetch a plan by external ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn fetch_by_external_id(
        &self,
        external_plan_id: impl Into<String>,
    ) -> Result<Plan, ClientError> {
        let params = PlanFetchByExternalIdParams {
            external_plan_id: Some(external_plan_id.into()),
        };
        self.client.execute(&params).await
    }

    /// Update a plan addressed by external ID.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is unset, the request fails or
    /// the server returns an error.
    pub async fn update_by_external_id(
        &self,
        params: PlanUpdateByExternalIdParams,
    ) -> Result<Plan, ClientError> {
        self.client.execute(&params).await
    }

    /// Create a plan version.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is unset, the request fails or
    /// the server returns an error.
    pub async fn create_version(
        &self,
        params: PlanVersionCreateParams,
    ) -> Result<PlanVersion, ClientError> {
        self.client.execute(&params).await
    }

    /// Fetch a plan version.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn fetch_version(
        &self,
        plan_id: impl Into<String>,
        version: i64,
    ) -> Result<PlanVersion, ClientError> {
        let params = PlanVersionFetchParams {
            plan_id: Some(plan_id.into()),
            version: Some(version),
        };
        self.client.execute(&params).await
    }

    /// Make a version the plan's default.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn set_default_version(
        &self,
        plan_id: impl Into<String>,
        version: i64,
    ) -> Result<Plan, ClientError> {
        let params = PlanSetDefaultVersionParams {
            plan_id: Some(plan_id.into()),
            version: Some(version),
        };
        self.client.execute(&params).await
    }

    /// Create a version of a plan addressed by external ID.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is unset, the request fails or
    /// the server returns an error.
    pub async fn create_version_by_external_id(
        &self,
        params: PlanVersionCreateByExternalIdParams,
    ) -> Result<PlanVersion, ClientError> {
        self.client.execute(&params).await
    }

    /// Fetch a version of a plan addressed by external ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn fetch_version_by_external_id(
        &self,
        external_plan_id: impl Into<String>,
        version: i64,
    ) -> Result<PlanVersion, ClientError> {
        let params = PlanVersionFetchByExternalIdParams {
            external_plan_id: Some(external_plan_id.into()),
            version: Some(version),
        };
        self.client.execute(&params).await
    }

    /// Make a version the default of a plan addressed by external ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn set_default_version_by_external_id(
        &self,
        external_plan_id: impl Into<String>,
        version: i64,
    ) -> Result<Plan, ClientError> {
        let params = PlanSetDefaultVersionByExternalIdParams {
            external_plan_id: Some(external_plan_id.into()),
            version: Some(version),
        };
        self.client.execute(&params).await
    }
}

#[cfg(test)]
mod tests {
    use orb_core::{Cadence, NewPlanPriceCommon};

    use super::*;

    #[test]
    fn version_create_body_nests_unit_price() {
        let params = PlanVersionCreateParams::new("plan_id", 0).add_price(AddPrice::new(
            NewPlanPrice::unit(
                NewPlanPriceCommon::new("Seats", "item_id", Cadence::Annual),
                "1.00",
            ),
        ));

        let body = params.body().unwrap().unwrap();
        assert_eq!(body["version"], 0);
        assert_eq!(body["add_prices"][0]["price"]["model_type"], "unit");
        assert_eq!(body["add_prices"][0]["price"]["cadence"], "annual");
        assert_eq!(body["add_prices"][0]["price"]["item_id"], "item_id");
        assert!(body.get("plan_id").is_none());
        assert!(body.get("remove_prices").is_none());

        let url = params.url("https://api.withorb.com/v1").unwrap();
        assert_eq!(url.as_str(), "https://api.withorb.com/v1/plans/plan_id/versions");
    }

    #[test]
    fn version_create_requires_version_lazily() {
        let params = PlanVersionCreateParams {
            plan_id: Some("plan_id".into()),
            ..PlanVersionCreateParams::default()
        };
        assert!(params.url("https://api.withorb.com/v1").is_ok());
        assert!(matches!(
            params.body(),
            Err(ClientError::MissingArgument { name: "version" })
        ));
    }

    #[test]
    fn list_query_includes_filters() {
        let params = PlanListParams {
            page: CursorParams {
                cursor: Some("c1".into()),
                limit: Some(10),
            },
            status: Some(PlanStatus::Active),
            ..PlanListParams::default()
        };
        let url = params.url("https://api.withorb.com/v1").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.withorb.com/v1/plans?cursor=c1&limit=10&status=active"
        );
    }

    #[test]
    fn external_version_create_sends_changes_only() {
        let params = PlanVersionCreateByExternalIdParams::new("pro plan", 3).remove_price("price_1");
        let url = params.url("https://api.withorb.com/v1").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.withorb.com/v1/plans/external_plan_id/pro%20plan/versions"
        );
        let body = params.body().unwrap().unwrap();
        assert_eq!(body["version"], 3);
        assert_eq!(body["remove_prices"][0]["price_id"], "price_1");
        assert!(body.get("plan_id").is_none());
        assert!(body.get("external_plan_id").is_none());
    }

    #[test]
    fn external_version_routes_need_the_id() {
        let params = PlanVersionCreateByExternalIdParams::default();
        assert!(matches!(
            params.url("https://api.withorb.com/v1"),
            Err(ClientError::MissingArgument {
                name: "external_plan_id"
            })
        ));
        assert!(matches!(
            params.body(),
            Err(ClientError::MissingArgument { name: "version" })
        ));

        let params = PlanSetDefaultVersionByExternalIdParams {
            external_plan_id: Some("pro".into()),
            version: Some(2),
        };
        assert_eq!(
            params.url("https://api.withorb.com/v1").unwrap().path(),
            "/v1/plans/external_plan_id/pro/set_default_version"
        );
        assert_eq!(params.body().unwrap().unwrap(), serde_json::json!({"version": 2}));
    }

    #[test]
    fn fetch_version_needs_both_path_values() {
        let params = PlanVersionFetchParams {
            plan_id: Some("plan_1".into()),
            version: None,
        };
        assert!(matches!(
            params.url("https://api.withorb.com/v1"),
            Err(ClientError::MissingArgument { name: "version" })
        ));
    }
}
