//! Customer endpoints, including balance transactions.

use orb_core::customer::{BalanceTransactionType, PaymentProvider};
use orb_core::{
    Address, BalanceTransaction, Customer, CustomerTaxId, Metadata, MetadataPatch, Page,
    TaxConfiguration,
};
use serde::Serialize;

use crate::client::OrbClient;
use crate::error::ClientError;
use crate::request::{json_body, required, CursorParams, Paginated, Params, Route, TimeRange};

/// Create a customer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CustomerCreateParams {
    /// Billing email. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The caller's own customer ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_customer_id: Option<String>,
    /// Invoicing currency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// IANA timezone used for billing boundaries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Extra invoice recipients.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_emails: Vec<String>,
    /// Whether invoices are collected automatically.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_collection: Option<bool>,
    /// Whether invoices are emailed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_delivery: Option<bool>,
    /// Billing address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
    /// Shipping address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Address>,
    /// External payment provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_provider: Option<PaymentProvider>,
    /// Customer ID in the payment provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_provider_id: Option<String>,
    /// Tax provider settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_configuration: Option<TaxConfiguration>,
    /// Registered tax ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<CustomerTaxId>,
    /// User-defined metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Sent as the `Idempotency-Key` header.
    #[serde(skip)]
    pub idempotency_key: Option<String>,
}

impl CustomerCreateParams {
    /// A customer with the given name and billing email.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            ..Self::default()
        }
    }
}

impl Params for CustomerCreateParams {
    type Response = Customer;
    const ROUTE: Route = Route::post("/customers");

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        required(&self.email, "email")?;
        required(&self.name, "name")?;
        json_body(self)
    }

    fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }
}

/// List customers.
#[derive(Debug, Clone, Default)]
pub struct CustomerListParams {
    /// Cursor and page size.
    pub page: CursorParams,
    /// Filter on creation time.
    pub created_at: TimeRange,
}

impl Params for CustomerListParams {
    type Response = Page<Customer>;
    const ROUTE: Route = Route::get("/customers");

    fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        self.page.push_query(&mut query);
        self.created_at.push_query("created_at", &mut query);
        query
    }
}

impl Paginated for CustomerListParams {
    type Item = Customer;

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.page.cursor = cursor;
    }
}

/// Fetch a customer by ID.
#[derive(Debug, Clone, Default)]
pub struct CustomerFetchParams {
    /// Customer ID. Required.
    pub customer_id: Option<String>,
}

impl Params for CustomerFetchParams {
    type Response = Customer;
    const ROUTE: Route = Route::get("/customers/{customer_id}");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        customer_path(self.customer_id.as_ref())
    }
}

/// Update a customer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CustomerUpdateParams {
    /// Customer ID. Required.
    #[serde(skip)]
    pub customer_id: Option<String>,
    /// New billing email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New external customer ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_customer_id: Option<String>,
    /// Whether invoices are collected automatically.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_collection: Option<bool>,
    /// Whether invoices are emailed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_delivery: Option<bool>,
    /// Billing address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
    /// Shipping address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Address>,
    /// Tax provider settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_configuration: Option<TaxConfiguration>,
    /// Registered tax ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<CustomerTaxId>,
    /// Metadata changes; `None` values delete keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataPatch>,
}

impl Params for CustomerUpdateParams {
    type Response = Customer;
    const ROUTE: Route = Route::put("/customers/{customer_id}");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        customer_path(self.customer_id.as_ref())
    }

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        json_body(self)
    }
}

/// Delete a customer.
#[derive(Debug, Clone, Default)]
pub struct CustomerDeleteParams {
    /// Customer ID. Required.
    pub customer_id: Option<String>,
}

impl Params for CustomerDeleteParams {
    type Response = ();
    const ROUTE: Route = Route::delete("/customers/{customer_id}");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        customer_path(self.customer_id.as_ref())
    }
}

/// Fetch a customer by external ID.
#[derive(Debug, Clone, Default)]
pub struct CustomerFetchByExternalIdParams {
    /// External customer ID. Required.
    pub external_customer_id: Option<String>,
}

impl Params for CustomerFetchByExternalIdParams {
    type Response = Customer;
    const ROUTE: Route = Route::get("/customers/external_customer_id/{external_customer_id}");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![(
            "external_customer_id",
            required(&self.external_customer_id, "external_customer_id")?.clone(),
        )])
    }
}

/// Change a customer's balance.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BalanceTransactionCreateParams {
    /// Customer ID. Required.
    #[serde(skip)]
    pub customer_id: Option<String>,
    /// Amount, as a decimal string. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    /// Direction of the change. Required.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<BalanceTransactionType>,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sent as the `Idempotency-Key` header.
    #[serde(skip)]
    pub idempotency_key: Option<String>,
}

impl Params for BalanceTransactionCreateParams {
    type Response = BalanceTransaction;
    const ROUTE: Route = Route::post("/customers/{customer_id}/balance_transactions");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        customer_path(self.customer_id.as_ref())
    }

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        required(&self.amount, "amount")?;
        required(&self.kind, "type")?;
        json_body(self)
    }

    fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }
}

/// List a customer's balance transactions.
#[derive(Debug, Clone, Default)]
pub struct BalanceTransactionListParams {
    /// Customer ID. Required.
    pub customer_id: Option<String>,
    /// Cursor and page size.
    pub page: CursorParams,
    /// Filter on when the transaction happened.
    pub operation_time: TimeRange,
}

impl Params for BalanceTransactionListParams {
    type Response = Page<BalanceTransaction>;
    const ROUTE: Route = Route::get("/customers/{customer_id}/balance_transactions");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        customer_path(self.customer_id.as_ref())
    }

    fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        self.page.push_query(&mut query);
        self.operation_time.push_query("operation_time", &mut query);
        query
    }
}

impl Paginated for BalanceTransactionListParams {
    type Item = BalanceTransaction;

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.page.cursor = cursor;
    }
}

fn customer_path(id: Option<&String>) -> Result<Vec<(&'static str, String)>, ClientError> {
    let id = id.ok_or(ClientError::MissingArgument {
        name: "customer_id",
    })?;
    Ok(vec![("customer_id", id.clone())])
}

/// Customer endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Customers<'a> {
    client: &'a OrbClient,
}

impl<'a> Customers<'a> {
    pub(crate) fn new(client: &'a OrbClient) -> Self {
        Self { client }
    }

    /// Create a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is unset, the request fails or
    /// the server returns an error.
    pub async fn create(&self, params: CustomerCreateParams) -> Result<Customer, ClientError> {
        self.client.execute(&params).await
    }

    /// List customers, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list(&self, params: CustomerListParams) -> Result<Page<Customer>, ClientError> {
        self.client.execute(&params).await
    }

    /// Fetch a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn fetch(&self, customer_id: impl Into<String>) -> Result<Customer, ClientError> {
        let params = CustomerFetchParams {
            customer_id: Some(customer_id.into()),
        };
        self.client.execute(&params).await
    }

    /// Update a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer ID is unset, the request fails or
    /// the server returns an error.
    pub async fn update(&self, params: CustomerUpdateParams) -> Result<Customer, ClientError> {
        self.client.execute(&params).await
    }

    /// Delete a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn delete(&self, customer_id: impl Into<String>) -> Result<(), ClientError> {
        let params = CustomerDeleteParams {
            customer_id: Some(customer_id.into()),
        };
        self.client.execute(&params).await
    }

    /// Fetch a customer by external ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn fetch_by_external_id(
        &self,
        external_customer_id: impl Into<String>,
    ) -> Result<Customer, ClientError> {
        let params = CustomerFetchByExternalIdParams {
            external_customer_id: Some(external_customer_id.into()),
        };
        self.client.execute(&params).await
    }

    /// Create a balance transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is unset, the request fails or
    /// the server returns an error.
    pub async fn create_balance_transaction(
        &self,
        params: BalanceTransactionCreateParams,
    ) -> Result<BalanceTransaction, ClientError> {
        self.client.execute(&params).await
    }

    /// List balance transactions, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer ID is unset, the request fails or
    /// the server returns an error.
    pub async fn list_balance_transactions(
        &self,
        params: BalanceTransactionListParams,
    ) -> Result<Page<BalanceTransaction>, ClientError> {
        self.client.execute(&params).await
    }
}

#[cfg(test)]
mod tests {
    use orb_core::customer::{tax_provider, ProviderTaxConfiguration};

    use super::*;

    #[test]
    fn create_encodes_tax_configuration_discriminator() {
        let params = CustomerCreateParams {
            tax_configuration: Some(TaxConfiguration::Taxjar(ProviderTaxConfiguration::<
                tax_provider::Taxjar,
            >::new(true))),
            ..CustomerCreateParams::new("Acme", "billing@acme.test")
        };
        let body = params.body().unwrap().unwrap();
        assert_eq!(body["tax_configuration"]["tax_provider"], "taxjar");
        assert_eq!(body["tax_configuration"]["tax_exempt"], true);
        assert!(body.get("additional_emails").is_none());
    }

    #[test]
    fn balance_transaction_renames_kind() {
        let params = BalanceTransactionCreateParams {
            customer_id: Some("cus_1".into()),
            amount: Some("25.00".into()),
            kind: Some(BalanceTransactionType::Increment),
            ..BalanceTransactionCreateParams::default()
        };
        let body = params.body().unwrap().unwrap();
        assert_eq!(body["type"], "increment");
        assert!(body.get("kind").is_none());

        let missing = BalanceTransactionCreateParams {
            amount: Some("1".into()),
            ..BalanceTransactionCreateParams::default()
        };
        assert!(matches!(
            missing.body(),
            Err(ClientError::MissingArgument { name: "type" })
        ));
    }

    #[test]
    fn external_id_is_one_encoded_segment() {
        let params = CustomerFetchByExternalIdParams {
            external_customer_id: Some("acme/eu".into()),
        };
        assert_eq!(
            params.url("https://api.withorb.com/v1").unwrap().path(),
            "/v1/customers/external_customer_id/acme%2Feu"
        );
    }
}
