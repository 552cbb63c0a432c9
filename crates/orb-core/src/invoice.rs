//! Invoices and their line items.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::customer::CustomerTaxId;
use crate::discount::Discount;
use crate::enums::string_enum;
use crate::price::{model_type, Price, UnitConfig};
use crate::shared::{Address, CustomerMinified, IdRef, Metadata};
use crate::validate::validate_fields;

string_enum! {
    /// Lifecycle state of an invoice.
    pub enum InvoiceStatus {
        /// Not yet issued; still changes with usage.
        Draft = "draft",
        /// Issued to the customer.
        Issued = "issued",
        /// Paid in full.
        Paid = "paid",
        /// Synced to an external system.
        Synced = "synced",
        /// Voided.
        Void = "void",
    }
}

string_enum! {
    /// What produced an invoice.
    pub enum InvoiceSource {
        /// A subscription billing period.
        Subscription = "subscription",
        /// A threshold or partial period.
        Partial = "partial",
        /// Created by hand.
        OneOff = "one_off",
    }
}

/// Automatic payment collection state of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoCollection {
    /// Whether collection is attempted automatically.
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Next scheduled attempt.
    #[serde(default)]
    pub next_attempt_at: Option<DateTime<Utc>>,
    /// Last attempt made.
    #[serde(default)]
    pub previously_attempted_at: Option<DateTime<Utc>>,
}

/// One line of an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    /// Orb-assigned line item ID.
    pub id: String,
    /// Final amount, as a decimal string.
    pub amount: String,
    /// Discount applied to the line.
    #[serde(default)]
    pub discount: Option<Discount>,
    /// End of the service period.
    pub end_date: DateTime<Utc>,
    /// Grouping value, for grouped prices.
    #[serde(default)]
    pub grouping: Option<String>,
    /// Line name.
    pub name: String,
    /// Price billed on this line.
    #[serde(default)]
    pub price: Option<Price>,
    /// Quantity billed.
    pub quantity: f64,
    /// Start of the service period.
    pub start_date: DateTime<Utc>,
    /// Amount before discounts, as a decimal string.
    pub subtotal: String,
}

/// An invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Orb-assigned invoice ID.
    pub id: String,
    /// Amount due, as a decimal string.
    pub amount_due: String,
    /// Automatic collection state.
    pub auto_collection: AutoCollection,
    /// Billing address at issue time.
    #[serde(default)]
    pub billing_address: Option<Address>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Currency of the invoice.
    pub currency: String,
    /// The billed customer.
    pub customer: CustomerMinified,
    /// Customer tax ID at issue time.
    #[serde(default)]
    pub customer_tax_id: Option<CustomerTaxId>,
    /// Payment due date.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Hosted payment page.
    #[serde(default)]
    pub hosted_invoice_url: Option<String>,
    /// Invoice date.
    pub invoice_date: DateTime<Utc>,
    /// Human-readable invoice number.
    pub invoice_number: String,
    /// PDF download link.
    #[serde(default)]
    pub invoice_pdf: Option<String>,
    /// What produced the invoice.
    pub invoice_source: InvoiceSource,
    /// When the invoice was issued.
    #[serde(default)]
    pub issued_at: Option<DateTime<Utc>>,
    /// Invoice lines.
    pub line_items: Vec<InvoiceLineItem>,
    /// Free-form memo.
    #[serde(default)]
    pub memo: Option<String>,
    /// User-defined metadata.
    #[serde(default)]
    pub metadata: Metadata,
    /// When the invoice was paid.
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    /// When the last payment attempt failed.
    #[serde(default)]
    pub payment_failed_at: Option<DateTime<Utc>>,
    /// When the invoice will be issued.
    #[serde(default)]
    pub scheduled_issue_at: Option<DateTime<Utc>>,
    /// Lifecycle state.
    pub status: InvoiceStatus,
    /// Subscription the invoice belongs to.
    #[serde(default)]
    pub subscription: Option<IdRef>,
    /// Amount before discounts and taxes, as a decimal string.
    pub subtotal: String,
    /// When syncing to an external system failed.
    #[serde(default)]
    pub sync_failed_at: Option<DateTime<Utc>>,
    /// Total, as a decimal string.
    pub total: String,
    /// When the invoice was voided.
    #[serde(default)]
    pub voided_at: Option<DateTime<Utc>>,
    /// Whether the invoice will be issued automatically.
    pub will_auto_issue: bool,
}

/// A line item for a one-off invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvoiceLineItem {
    /// End of the service period.
    pub end_date: NaiveDate,
    /// Item billed.
    pub item_id: String,
    /// Pricing model; only unit pricing is accepted here.
    pub model_type: model_type::Unit,
    /// Line name.
    pub name: String,
    /// Quantity billed.
    pub quantity: f64,
    /// Start of the service period.
    pub start_date: NaiveDate,
    /// Unit rate.
    pub unit_config: UnitConfig,
}

validate_fields!(AutoCollection {});
validate_fields!(InvoiceLineItem { discount, price });
validate_fields!(Invoice {
    auto_collection,
    billing_address,
    customer,
    customer_tax_id,
    invoice_source,
    line_items,
    status,
    subscription,
});
validate_fields!(NewInvoiceLineItem { unit_config });

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validate::Validate;

    #[test]
    fn decodes_minimal_invoice() {
        let invoice: Invoice = serde_json::from_value(json!({
            "id": "inv_1",
            "amount_due": "12.00",
            "auto_collection": {"enabled": true},
            "created_at": "2024-02-01T00:00:00Z",
            "currency": "USD",
            "customer": {"id": "cus_1", "external_customer_id": null},
            "invoice_date": "2024-02-01T00:00:00Z",
            "invoice_number": "INV-0001",
            "invoice_source": "subscription",
            "line_items": [],
            "status": "issued",
            "subtotal": "12.00",
            "total": "12.00",
            "will_auto_issue": false
        }))
        .unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Issued);
        assert!(invoice.paid_at.is_none());
        assert!(invoice.validate().is_ok());
    }

    #[test]
    fn new_line_item_carries_unit_model_type() {
        let item = NewInvoiceLineItem {
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            item_id: "item_1".into(),
            model_type: model_type::Unit,
            name: "Setup".into(),
            quantity: 1.0,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            unit_config: UnitConfig {
                unit_amount: "250.00".into(),
            },
        };
        let encoded = serde_json::to_value(&item).unwrap();
        assert_eq!(encoded["model_type"], "unit");
        assert_eq!(encoded["end_date"], "2024-01-31");
    }
}
