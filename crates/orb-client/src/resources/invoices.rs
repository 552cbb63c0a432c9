//! Invoice endpoints.

use chrono::NaiveDate;
use orb_core::{
    DateOrDateTime, Invoice, InvoiceStatus, Metadata, MetadataPatch, NewInvoiceLineItem, Page,
};
use serde::Serialize;

use crate::client::OrbClient;
use crate::error::ClientError;
use crate::request::{json_body, required, CursorParams, Paginated, Params, Route, TimeRange};

/// Create a one-off invoice.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InvoiceCreateParams {
    /// Currency of the invoice. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Date or time the invoice is issued on. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<DateOrDateTime>,
    /// Line items.
    pub line_items: Vec<NewInvoiceLineItem>,
    /// Days until the invoice is due. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_terms: Option<i64>,
    /// Orb-assigned customer ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// The caller's own customer ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_customer_id: Option<String>,
    /// Memo printed on the invoice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    /// User-defined metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Issue the invoice right after creating it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub will_auto_issue: Option<bool>,
    /// Sent as the `Idempotency-Key` header.
    #[serde(skip)]
    pub idempotency_key: Option<String>,
}

impl Params for InvoiceCreateParams {
    type Response = Invoice;
    const ROUTE: Route = Route::post("/invoices");

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        required(&self.currency, "currency")?;
        required(&self.invoice_date, "invoice_date")?;
        required(&self.net_terms, "net_terms")?;
        json_body(self)
    }

    fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }
}

/// List invoices.
#[derive(Debug, Clone, Default)]
pub struct InvoiceListParams {
    /// Cursor and page size.
    pub page: CursorParams,
    /// Only invoices of this customer.
    pub customer_id: Option<String>,
    /// Only invoices of the customer with this external ID.
    pub external_customer_id: Option<String>,
    /// Only invoices of this subscription.
    pub subscription_id: Option<String>,
    /// Only invoices in these states.
    pub status: Vec<InvoiceStatus>,
    /// Filter on the invoice date.
    pub invoice_date: TimeRange,
}

impl Params for InvoiceListParams {
    type Response = Page<Invoice>;
    const ROUTE: Route = Route::get("/invoices");

    fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        self.page.push_query(&mut query);
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
        for status in &self.status {
            query.push(("status[]".to_string(), status.to_string()));
        }
        self.invoice_date.push_query("invoice_date", &mut query);
        query
    }
}

impl Paginated for InvoiceListParams {
    type Item = Invoice;

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.page.cursor = cursor;
    }
}

/// Fetch an invoice by ID.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFetchParams {
    /// Invoice ID. Required.
    pub invoice_id: Option<String>,
}

impl Params for InvoiceFetchParams {
    type Response = Invoice;
    const ROUTE: Route = Route::get("/invoices/{invoice_id}");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        invoice_path(self.invoice_id.as_ref())
    }
}

/// Update an invoice's metadata.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InvoiceUpdateParams {
    /// Invoice ID. Required.
    #[serde(skip)]
    pub invoice_id: Option<String>,
    /// Metadata changes; `None` values delete keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataPatch>,
}

impl Params for InvoiceUpdateParams {
    type Response = Invoice;
    const ROUTE: Route = Route::put("/invoices/{invoice_id}");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        invoice_path(self.invoice_id.as_ref())
    }

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        json_body(self)
    }
}

/// Issue a draft invoice.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InvoiceIssueParams {
    /// Invoice ID. Required.
    #[serde(skip)]
    pub invoice_id: Option<String>,
    /// Wait for payment side effects before returning.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synchronous: Option<bool>,
}

impl Params for InvoiceIssueParams {
    type Response = Invoice;
    const ROUTE: Route = Route::post("/invoices/{invoice_id}/issue");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        invoice_path(self.invoice_id.as_ref())
    }

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        json_body(self)
    }
}

/// Void an issued invoice.
#[derive(Debug, Clone, Default)]
pub struct InvoiceVoidParams {
    /// Invoice ID. Required.
    pub invoice_id: Option<String>,
}

impl Params for InvoiceVoidParams {
    type Response = Invoice;
    const ROUTE: Route = Route::post("/invoices/{invoice_id}/void");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        invoice_path(self.invoice_id.as_ref())
    }
}

/// Record an out-of-band payment.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InvoiceMarkPaidParams {
    /// Invoice ID. Required.
    #[serde(skip)]
    pub invoice_id: Option<String>,
    /// Date the payment was received. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_received_date: Option<NaiveDate>,
    /// Reference of the payment in an external system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Free-form notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Params for InvoiceMarkPaidParams {
    type Response = Invoice;
    const ROUTE: Route = Route::post("/invoices/{invoice_id}/mark_paid");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        invoice_path(self.invoice_id.as_ref())
    }

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        required(&self.payment_received_date, "payment_received_date")?;
        json_body(self)
    }
}

fn invoice_path(id: Option<&String>) -> Result<Vec<(&'static str, String)>, ClientError> {
    let id = id.ok_or(ClientError::MissingArgument { name: "invoice_id" })?;
    Ok(vec![("invoice_id", id.clone())])
}

/// Invoice endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Invoices<'a> {
    client: &'a OrbClient,
}

impl<'a> Invoices<'a> {
    pub(crate) fn new(client: &'a OrbClient) -> Self {
        Self { client }
    }

    /// Create a one-off invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is unset, the request fails or
    /// the server returns an error.
    pub async fn create(&self, params: InvoiceCreateParams) -> Result<Invoice, ClientError> {
        self.client.execute(&params).await
    }

    /// List invoices, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list(&self, params: InvoiceListParams) -> Result<Page<Invoice>, ClientError> {
        self.client.execute(&params).await
    }

    /// Fetch an invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn fetch(&self, invoice_id: impl Into<String>) -> Result<Invoice, ClientError> {
        let params = InvoiceFetchParams {
            invoice_id: Some(invoice_id.into()),
        };
        self.client.execute(&params).await
    }

    /// Update an invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice ID is unset, the request fails or the
    /// server returns an error.
    pub async fn update(&self, params: InvoiceUpdateParams) -> Result<Invoice, ClientError> {
        self.client.execute(&params).await
    }

    /// Issue a draft invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice ID is unset, the request fails or the
    /// server returns an error.
    pub async fn issue(&self, params: InvoiceIssueParams) -> Result<Invoice, ClientError> {
        self.client.execute(&params).await
    }

    /// Void an invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn void(&self, invoice_id: impl Into<String>) -> Result<Invoice, ClientError> {
        let params = InvoiceVoidParams {
            invoice_id: Some(invoice_id.into()),
        };
        self.client.execute(&params).await
    }

    /// Mark an invoice as paid.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is unset, the request fails or
    /// the server returns an error.
    pub async fn mark_paid(&self, params: InvoiceMarkPaidParams) -> Result<Invoice, ClientError> {
        self.client.execute(&params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_checks_required_values_in_order() {
        let mut params = InvoiceCreateParams {
            currency: Some("USD".into()),
            ..InvoiceCreateParams::default()
        };
        assert!(matches!(
            params.body(),
            Err(ClientError::MissingArgument { name: "invoice_date" })
        ));

        params.invoice_date = Some(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().into());
        params.net_terms = Some(30);
        let body = params.body().unwrap().unwrap();
        assert_eq!(body["invoice_date"], "2024-03-01");
        assert_eq!(body["line_items"], serde_json::json!([]));
    }

    #[test]
    fn list_encodes_status_array() {
        let params = InvoiceListParams {
            customer_id: Some("cus_1".into()),
            status: vec![InvoiceStatus::Draft, InvoiceStatus::Issued],
            ..InvoiceListParams::default()
        };
        let url = params.url("https://api.withorb.com/v1").unwrap();
        assert_eq!(
            url.query(),
            Some("customer_id=cus_1&status%5B%5D=draft&status%5B%5D=issued")
        );
    }

    #[test]
    fn mark_paid_requires_payment_date() {
        let params = InvoiceMarkPaidParams {
            invoice_id: Some("inv_1".into()),
            ..InvoiceMarkPaidParams::default()
        };
        assert!(params.url("https://api.withorb.com/v1").is_ok());
        assert!(matches!(
            params.body(),
            Err(ClientError::MissingArgument {
                name: "payment_received_date"
            })
        ));
    }
}
