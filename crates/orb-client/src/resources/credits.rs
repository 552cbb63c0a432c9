//! Credit block and credit ledger endpoints.

use orb_core::credit::EntryStatus;
use orb_core::{AddLedgerEntry, CreditBlock, CreditLedgerEntry, Page};

use crate::client::OrbClient;
use crate::error::ClientError;
use crate::request::{json_body, required, CursorParams, Paginated, Params, Route, TimeRange};

/// List a customer's credit blocks.
#[derive(Debug, Clone, Default)]
pub struct CreditBlockListParams {
    /// Customer ID. Required.
    pub customer_id: Option<String>,
    /// Cursor and page size.
    pub page: CursorParams,
    /// Only blocks in this currency.
    pub currency: Option<String>,
    /// Include expired and depleted blocks.
    pub include_all_blocks: Option<bool>,
}

impl Params for CreditBlockListParams {
    type Response = Page<CreditBlock>;
    const ROUTE: Route = Route::get("/customers/{customer_id}/credits");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![(
            "customer_id",
            required(&self.customer_id, "customer_id")?.clone(),
        )])
    }

    fn query(&self) -> Vec<(String, String)> {
        block_query(&self.page, self.currency.as_ref(), self.include_all_blocks)
    }
}

impl Paginated for CreditBlockListParams {
    type Item = CreditBlock;

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.page.cursor = cursor;
    }
}

/// List credit blocks of a customer addressed by external ID.
#[derive(Debug, Clone, Default)]
pub struct CreditBlockListByExternalIdParams {
    /// External customer ID. Required.
    pub external_customer_id: Option<String>,
    /// Cursor and page size.
    pub page: CursorParams,
    /// Only blocks in this currency.
    pub currency: Option<String>,
    /// Include expired and depleted blocks.
    pub include_all_blocks: Option<bool>,
}

impl Params for CreditBlockListByExternalIdParams {
    type Response = Page<CreditBlock>;
    const ROUTE: Route = Route::get("/customers/external_customer_id/{external_customer_id}/credits");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![(
            "external_customer_id",
            required(&self.external_customer_id, "external_customer_id")?.clone(),
        )])
    }

    fn query(&self) -> Vec<(String, String)> {
        block_query(&self.page, self.currency.as_ref(), self.include_all_blocks)
    }
}

impl Paginated for CreditBlockListByExternalIdParams {
    type Item = CreditBlock;

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.page.cursor = cursor;
    }
}

fn block_query(
    page: &CursorParams,
    currency: Option<&String>,
    include_all_blocks: Option<bool>,
) -> Vec<(String, String)> {
    let mut query = Vec::new();
    page.push_query(&mut query);
    if let Some(currency) = currency {
        query.push(("currency".to_string(), currency.clone()));
    }
    if let Some(include) = include_all_blocks {
        query.push(("include_all_blocks".to_string(), include.to_string()));
    }
    query
}

/// Filters shared by both ledger listings.
#[derive(Debug, Clone, Default)]
pub struct LedgerFilters {
    /// Cursor and page size.
    pub page: CursorParams,
    /// Filter on creation time.
    pub created_at: TimeRange,
    /// Only entries in this currency.
    pub currency: Option<String>,
    /// Only entries with this `entry_type`.
    pub entry_type: Option<String>,
    /// Only committed or only pending entries.
    pub entry_status: Option<EntryStatus>,
    /// Only entries of at least this amount.
    pub minimum_amount: Option<String>,
}

impl LedgerFilters {
    fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        self.page.push_query(&mut query);
        self.created_at.push_query("created_at", &mut query);
        let filters = [
            ("currency", self.currency.clone()),
            ("entry_type", self.entry_type.clone()),
            ("entry_status", self.entry_status.as_ref().map(ToString::to_string)),
            ("minimum_amount", self.minimum_amount.clone()),
        ];
        for (key, value) in filters {
            if let Some(value) = value {
                query.push((key.to_string(), value));
            }
        }
        query
    }
}

/// List a customer's credit ledger.
#[derive(Debug, Clone, Default)]
pub struct CreditLedgerListParams {
    /// Customer ID. Required.
    pub customer_id: Option<String>,
    /// Cursor, page size and entry filters.
    pub filters: LedgerFilters,
}

impl Params for CreditLedgerListParams {
    type Response = Page<CreditLedgerEntry>;
    const ROUTE: Route = Route::get("/customers/{customer_id}/credits/ledger");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![(
            "customer_id",
            required(&self.customer_id, "customer_id")?.clone(),
        )])
    }

    fn query(&self) -> Vec<(String, String)> {
        self.filters.query()
    }
}

impl Paginated for CreditLedgerListParams {
    type Item = CreditLedgerEntry;

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.filters.page.cursor = cursor;
    }
}

/// List the credit ledger of a customer addressed by external ID.
#[derive(Debug, Clone, Default)]
pub struct CreditLedgerListByExternalIdParams {
    /// External customer ID. Required.
    pub external_customer_id: Option<String>,
    /// Cursor, page size and entry filters.
    pub filters: LedgerFilters,
}

impl Params for CreditLedgerListByExternalIdParams {
    type Response = Page<CreditLedgerEntry>;
    const ROUTE: Route =
        Route::get("/customers/external_customer_id/{external_customer_id}/credits/ledger");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![(
            "external_customer_id",
            required(&self.external_customer_id, "external_customer_id")?.clone(),
        )])
    }

    fn query(&self) -> Vec<(String, String)> {
        self.filters.query()
    }
}

impl Paginated for CreditLedgerListByExternalIdParams {
    type Item = CreditLedgerEntry;

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.filters.page.cursor = cursor;
    }
}

/// Write one entry to a customer's credit ledger.
#[derive(Debug, Clone, Default)]
pub struct CreditLedgerEntryCreateParams {
    /// Customer ID. Required.
    pub customer_id: Option<String>,
    /// The entry to write. Required.
    pub entry: Option<AddLedgerEntry>,
    /// Sent as the `Idempotency-Key` header.
    pub idempotency_key: Option<String>,
}

impl CreditLedgerEntryCreateParams {
    /// Write `entry` for `customer_id`.
    #[must_use]
    pub fn new(customer_id: impl Into<String>, entry: AddLedgerEntry) -> Self {
        Self {
            customer_id: Some(customer_id.into()),
            entry: Some(entry),
            idempotency_key: None,
        }
    }
}

impl Params for CreditLedgerEntryCreateParams {
    type Response = CreditLedgerEntry;
    const ROUTE: Route = Route::post("/customers/{customer_id}/credits/ledger_entry");

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![(
            "customer_id",
            required(&self.customer_id, "customer_id")?.clone(),
        )])
    }

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        json_body(required(&self.entry, "entry")?)
    }

    fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }
}

/// Write one entry to the credit ledger of a customer addressed by
/// external ID.
#[derive(Debug, Clone, Default)]
pub struct CreditLedgerEntryCreateByExternalIdParams {
    /// External customer ID. Required.
    pub external_customer_id: Option<String>,
    /// The entry to write. Required.
    pub entry: Option<AddLedgerEntry>,
    /// Sent as the `Idempotency-Key` header.
    pub idempotency_key: Option<String>,
}

impl CreditLedgerEntryCreateByExternalIdParams {
    /// Write `entry` for `external_customer_id`.
    #[must_use]
    pub fn new(external_customer_id: impl Into<String>, entry: AddLedgerEntry) -> Self {
        Self {
            external_customer_id: Some(external_customer_id.into()),
            entry: Some(entry),
            idempotency_key: None,
        }
    }
}

impl Params for CreditLedgerEntryCreateByExternalIdParams {
    type Response = CreditLedgerEntry;
    const ROUTE: Route = Route::post(
        "/customers/external_customer_id/{external_customer_id}/credits/ledger_entry",
    );

    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(vec![(
            "external_customer_id",
            required(&self.external_customer_id, "external_customer_id")?.clone(),
        )])
    }

    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        json_body(required(&self.entry, "entry")?)
    }

    fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }
}

/// Credit endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Credits<'a> {
    client: &'a OrbClient,
}

impl<'a> Credits<'a> {
    pub(crate) fn new(client: &'a OrbClient) -> Self {
        Self { client }
    }

    /// List credit blocks, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer ID is unset, the request fails or
    /// the server returns an error.
    pub async fn list_blocks(
        &self,
        params: CreditBlockListParams,
    ) -> Result<Page<CreditBlock>, ClientError> {
        self.client.execute(&params).await
    }

    /// List credit blocks of a customer addressed by external ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the external ID is unset, the request fails or
    /// the server returns an error.
    pub async fn list_blocks_by_external_id(
        &self,
        params: CreditBlockListByExternalIdParams,
    ) -> Result<Page<CreditBlock>, ClientError> {
        self.client.execute(&params).await
    }

    /// List ledger entries, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer ID is unset, the request fails or
    /// the server returns an error.
    pub async fn list_ledger(
        &self,
        params: CreditLedgerListParams,
    ) -> Result<Page<CreditLedgerEntry>, ClientError> {
        self.client.execute(&params).await
    }

    /// List the ledger of a customer addressed by external ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the external ID is unset, the request fails or
    /// the server returns an error.
    pub async fn list_ledger_by_external_id(
        &self,
        params: CreditLedgerListByExternalIdParams,
    ) -> Result<Page<CreditLedgerEntry>, ClientError> {
        self.client.execute(&params).await
    }

    /// Write a ledger entry. The response is the entry the server recorded,
    /// which may differ in type from the one written (a void can come back
    /// as `void_initiated`).
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is unset, the request fails or
    /// the server returns an error.
    pub async fn create_ledger_entry(
        &self,
        params: CreditLedgerEntryCreateParams,
    ) -> Result<CreditLedgerEntry, ClientError> {
        self.client.execute(&params).await
    }

    /// Write a ledger entry for a customer addressed by external ID.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is unset, the request fails or
    /// the server returns an error.
    pub async fn create_ledger_entry_by_external_id(
        &self,
        params: CreditLedgerEntryCreateByExternalIdParams,
    ) -> Result<CreditLedgerEntry, ClientError> {
        self.client.execute(&params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_entry_body_is_the_entry() {
        let params =
            CreditLedgerEntryCreateParams::new("cus_1", AddLedgerEntry::void(5.0, "blk_1"));
        let body = params.body().unwrap().unwrap();
        assert_eq!(body["entry_type"], "void");
        assert_eq!(body["block_id"], "blk_1");
        assert_eq!(
            params.url("https://api.withorb.com/v1").unwrap().path(),
            "/v1/customers/cus_1/credits/ledger_entry"
        );
    }

    #[test]
    fn ledger_query_includes_set_filters_only() {
        let params = CreditLedgerListParams {
            customer_id: Some("cus_1".into()),
            filters: LedgerFilters {
                entry_status: Some(EntryStatus::Committed),
                currency: Some("credits".into()),
                ..LedgerFilters::default()
            },
        };
        let url = params.url("https://api.withorb.com/v1").unwrap();
        assert_eq!(url.query(), Some("currency=credits&entry_status=committed"));
    }

    #[test]
    fn external_ledger_routes_encode_the_id() {
        let params = CreditLedgerListByExternalIdParams {
            external_customer_id: Some("acme corp".into()),
            filters: LedgerFilters {
                entry_type: Some("void".into()),
                ..LedgerFilters::default()
            },
        };
        let url = params.url("https://api.withorb.com/v1").unwrap();
        assert_eq!(
            url.path(),
            "/v1/customers/external_customer_id/acme%20corp/credits/ledger"
        );
        assert_eq!(url.query(), Some("entry_type=void"));

        let params = CreditLedgerEntryCreateByExternalIdParams::new(
            "acme",
            AddLedgerEntry::increment(10.0),
        );
        assert_eq!(
            params.url("https://api.withorb.com/v1").unwrap().path(),
            "/v1/customers/external_customer_id/acme/credits/ledger_entry"
        );
        assert_eq!(params.body().unwrap().unwrap()["entry_type"], "increment");
    }

    #[test]
    fn external_ledger_entry_needs_the_entry() {
        let params = CreditLedgerEntryCreateByExternalIdParams {
            external_customer_id: Some("acme".into()),
            ..CreditLedgerEntryCreateByExternalIdParams::default()
        };
        assert!(matches!(
            params.body(),
            Err(ClientError::MissingArgument { name: "entry" })
        ));
    }

    #[test]
    fn block_list_by_external_id_needs_the_id() {
        let params = CreditBlockListByExternalIdParams::default();
        assert!(matches!(
            params.url("https://api.withorb.com/v1"),
            Err(ClientError::MissingArgument {
                name: "external_customer_id"
            })
        ));
    }
}
