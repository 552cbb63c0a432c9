//! Core models for the Orb billing API.
//!
//! This crate holds the typed request and response shapes used by
//! `orb-client`:
//!
//! - **Unions**: `Price`, `Adjustment`, `Discount`, `CreditLedgerEntry`,
//!   `TaxConfiguration` and friends, each a closed enum selected by one
//!   discriminator key
//! - **Resources**: `Plan`, `Subscription`, `Invoice`, `Customer`,
//!   `CreditBlock`, `Alert`, `Event`, `Backfill`
//! - **Pagination**: `Page<T>`
//! - **Validation**: the `Validate` trait
//!
//! # Decoding
//!
//! Models are plain serde types, so `serde_json::from_value` works. The
//! [`from_value`] and [`from_str`] helpers do the same but classify failures
//! into [`ModelError`]:
//!
//! ```
//! use orb_core::{from_value, ModelError, Page, Alert};
//!
//! let err = from_value::<Page<Alert>>(serde_json::json!({"data": []})).unwrap_err();
//! assert!(matches!(err, ModelError::MissingField { ref field, .. } if field == "pagination_metadata"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod adjustment;
pub mod alert;
pub mod credit;
pub mod customer;
pub mod dates;
pub mod discount;
mod enums;
pub mod error;
pub mod event;
pub mod invoice;
pub mod new_price;
pub mod page;
pub mod plan;
pub mod price;
pub mod shared;
pub mod subscription;
pub mod union;
pub mod validate;

pub use adjustment::{Adjustment, NewAdjustment};
pub use alert::{Alert, AlertType, Threshold};
pub use credit::{AddLedgerEntry, CreditBlock, CreditLedgerEntry};
pub use customer::{BalanceTransaction, Customer, CustomerTaxId, TaxConfiguration};
pub use dates::{BillingCycleRelativeDate, DateOrDateTime, DateTimeOrRelative, GroupingValue};
pub use discount::Discount;
pub use error::{ModelError, Result, UnionError, UnionErrorKind};
pub use event::{
    Backfill, Event, EventAmendResponse, EventDeprecateResponse, EventSearchResult, IngestEvent,
    IngestResponse,
};
pub use invoice::{Invoice, InvoiceLineItem, InvoiceStatus, NewInvoiceLineItem};
pub use new_price::{NewFloatingPrice, NewFloatingPriceCommon, NewPlanPrice, NewPlanPriceCommon};
pub use page::{Page, PaginationMetadata};
pub use plan::{
    AddAdjustment, AddPrice, Plan, PlanStatus, PlanVersion, RemoveAdjustment, RemovePrice,
    ReplaceAdjustment, ReplacePrice,
};
pub use price::{Price, PriceCommon, PriceEvaluateResponse};
pub use shared::{Address, Cadence, Metadata, MetadataPatch};
pub use subscription::{
    AddPriceInterval, CancelOption, EditPriceInterval, Subscription, SubscriptionStatus,
};
pub use union::Discriminated;
pub use validate::Validate;

/// Decode a model from a JSON value, classifying failures.
///
/// # Errors
///
/// Returns [`ModelError::Union`] when a union anywhere in the value fails,
/// [`ModelError::MissingField`] or [`ModelError::UnexpectedNull`] for the
/// matching serde failures, and [`ModelError::Json`] otherwise.
pub fn from_value<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(ModelError::from)
}

/// Decode a model from JSON text, classifying failures.
///
/// # Errors
///
/// See [`from_value`].
pub fn from_str<T: serde::de::DeserializeOwned>(json: &str) -> Result<T> {
    serde_json::from_str(json).map_err(ModelError::from)
}

/// Decode a model from JSON bytes, classifying failures.
///
/// # Errors
///
/// See [`from_value`].
pub fn from_slice<T: serde::de::DeserializeOwned>(json: &[u8]) -> Result<T> {
    serde_json::from_slice(json).map_err(ModelError::from)
}
