//! Async client for the Orb billing API.
//!
//! Endpoints are grouped by resource behind accessors on [`OrbClient`]. Each
//! endpoint takes a params value, and required values left unset fail with
//! [`ClientError::MissingArgument`] before any request is sent.
//!
//! # Example
//!
//! ```no_run
//! use orb_client::orb_core::{AddPrice, Cadence, NewPlanPrice, NewPlanPriceCommon};
//! use orb_client::{OrbClient, PlanVersionCreateParams};
//!
//! # async fn example() -> Result<(), orb_client::ClientError> {
//! let client = OrbClient::new("your-api-key")?;
//!
//! let price = NewPlanPrice::unit(
//!     NewPlanPriceCommon::new("Seats", "item_id", Cadence::Annual),
//!     "10.00",
//! );
//! let version = client
//!     .plans()
//!     .create_version(PlanVersionCreateParams::new("plan_id", 2).add_price(AddPrice::new(price)))
//!     .await?;
//!
//! println!("created version {}", version.version);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod config;
mod error;
mod request;
pub mod resources;
mod retry;

pub use client::OrbClient;
pub use config::{ClientOptions, EnvConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECONDS};
pub use error::ClientError;
pub use request::{
    new_idempotency_key, required, CursorParams, Method, Paginated, Params, Route, TimeRange,
};
pub use resources::alerts::{
    AlertDisableParams, AlertEnableParams, AlertFetchParams, AlertListParams, AlertRule,
    AlertUpdateParams, Alerts, CustomerAlertCreateParams, ExternalCustomerAlertCreateParams,
    SubscriptionAlertCreateParams,
};
pub use resources::credits::{
    CreditBlockListByExternalIdParams, CreditBlockListParams,
    CreditLedgerEntryCreateByExternalIdParams, CreditLedgerEntryCreateParams,
    CreditLedgerListByExternalIdParams, CreditLedgerListParams, Credits, LedgerFilters,
};
pub use resources::customers::{
    BalanceTransactionCreateParams, BalanceTransactionListParams, CustomerCreateParams,
    CustomerDeleteParams, CustomerFetchByExternalIdParams, CustomerFetchParams,
    CustomerListParams, CustomerUpdateParams, Customers,
};
pub use resources::events::{
    BackfillCloseParams, BackfillCreateParams, BackfillFetchParams, BackfillListParams,
    BackfillRevertParams, EventAmendParams, EventDeprecateParams, EventSearchParams, Events,
    IngestParams,
};
pub use resources::invoices::{
    InvoiceCreateParams, InvoiceFetchParams, InvoiceIssueParams, InvoiceListParams,
    InvoiceMarkPaidParams, InvoiceUpdateParams, InvoiceVoidParams, Invoices,
};
pub use resources::plans::{
    PlanCreateParams, PlanFetchByExternalIdParams, PlanFetchParams, PlanListParams,
    PlanSetDefaultVersionByExternalIdParams, PlanSetDefaultVersionParams,
    PlanUpdateByExternalIdParams, PlanUpdateParams, PlanVersionCreateByExternalIdParams,
    PlanVersionCreateParams, PlanVersionFetchByExternalIdParams, PlanVersionFetchParams, Plans,
};
pub use resources::prices::{
    PriceCreateParams, PriceEvaluateParams, PriceFetchByExternalIdParams, PriceFetchParams,
    PriceListParams, PriceUpdateParams, Prices,
};
pub use resources::subscriptions::{
    SubscriptionCancelParams, SubscriptionCreateParams, SubscriptionFetchParams,
    SubscriptionListParams, SubscriptionPriceIntervalsParams,
    SubscriptionUnscheduleCancellationParams, SubscriptionUpdateParams, Subscriptions,
};

pub use orb_core;
