//! Customers, their tax settings and balance transactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::string_enum;
use crate::shared::{Address, IdRef, Metadata};
use crate::union::discriminated_union;
use crate::validate::validate_fields;

string_enum! {
    /// External system that collects payment for a customer.
    pub enum PaymentProvider {
        /// QuickBooks.
        Quickbooks = "quickbooks",
        /// Bill.com.
        BillCom = "bill.com",
        /// Stripe, charging directly.
        StripeCharge = "stripe_charge",
        /// Stripe, through Stripe invoices.
        StripeInvoice = "stripe_invoice",
        /// NetSuite.
        Netsuite = "netsuite",
    }
}

string_enum! {
    /// Why a customer balance changed.
    pub enum BalanceTransactionAction {
        /// Balance applied to an invoice.
        AppliedToInvoice = "applied_to_invoice",
        /// Manual change.
        ManualAdjustment = "manual_adjustment",
        /// Refund from a proration.
        ProratedRefund = "prorated_refund",
        /// Reverted proration refund.
        RevertProratedRefund = "revert_prorated_refund",
        /// Balance returned when an invoice was voided.
        ReturnFromVoiding = "return_from_voiding",
        /// Credit note applied.
        CreditNoteApplied = "credit_note_applied",
        /// Credit note voided.
        CreditNoteVoided = "credit_note_voided",
        /// Refund of an overpayment.
        OverpaymentRefund = "overpayment_refund",
        /// Payment recorded outside Orb.
        ExternalPayment = "external_payment",
    }
}

string_enum! {
    /// Direction of a balance transaction.
    pub enum BalanceTransactionType {
        /// Balance increased.
        Increment = "increment",
        /// Balance decreased.
        Decrement = "decrement",
    }
}

/// A tax identifier registered for a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerTaxId {
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    /// Kind of tax ID, such as `eu_vat`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The tax ID itself.
    pub value: String,
}

/// A customer account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Orb-assigned customer ID.
    pub id: String,
    /// Extra addresses invoices are sent to.
    #[serde(default)]
    pub additional_emails: Vec<String>,
    /// Whether invoices are charged automatically.
    pub auto_collection: bool,
    /// Current balance, as a decimal string.
    pub balance: String,
    /// Billing address.
    #[serde(default)]
    pub billing_address: Option<Address>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Currency the customer is billed in, once set.
    #[serde(default)]
    pub currency: Option<String>,
    /// Primary email.
    pub email: String,
    /// Whether invoices are emailed.
    pub email_delivery: bool,
    /// Opt out of automated tax calculation.
    #[serde(default)]
    pub exempt_from_automated_tax: Option<bool>,
    /// The caller's own customer ID.
    #[serde(default)]
    pub external_customer_id: Option<String>,
    /// User-defined metadata.
    #[serde(default)]
    pub metadata: Metadata,
    /// Display name.
    pub name: String,
    /// External payment provider.
    #[serde(default)]
    pub payment_provider: Option<PaymentProvider>,
    /// Customer ID in the payment provider.
    #[serde(default)]
    pub payment_provider_id: Option<String>,
    /// Hosted customer portal.
    #[serde(default)]
    pub portal_url: Option<String>,
    /// Shipping address.
    #[serde(default)]
    pub shipping_address: Option<Address>,
    /// Registered tax ID.
    #[serde(default)]
    pub tax_id: Option<CustomerTaxId>,
    /// IANA timezone used for billing boundaries.
    pub timezone: String,
}

/// Discriminator values for the `tax_provider` key.
pub mod tax_provider {
    use crate::union::tag_type;

    tag_type! {
        /// `tax_provider` of Avalara.
        Avalara = "avalara";
        /// `tax_provider` of TaxJar.
        Taxjar = "taxjar";
        /// `tax_provider` of Sphere.
        Sphere = "sphere";
        /// `tax_provider` of Numeral.
        Numeral = "numeral";
        /// `tax_provider` of Anrok.
        Anrok = "anrok";
    }
}

/// Avalara tax settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvalaraTaxConfiguration {
    /// Discriminator.
    pub tax_provider: tax_provider::Avalara,
    /// Whether the customer is exempt.
    pub tax_exempt: bool,
    /// Avalara exemption code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_exemption_code: Option<String>,
}

/// Settings shared by providers that only take an exemption flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderTaxConfiguration<P> {
    /// Discriminator.
    pub tax_provider: P,
    /// Whether the customer is exempt.
    pub tax_exempt: bool,
}

impl<P: Default> ProviderTaxConfiguration<P> {
    /// Settings with the given exemption flag.
    #[must_use]
    pub fn new(tax_exempt: bool) -> Self {
        Self {
            tax_provider: P::default(),
            tax_exempt,
        }
    }
}

impl<P> crate::validate::Validate for ProviderTaxConfiguration<P> {
    fn validate(&self) -> Result<(), crate::ModelError> {
        Ok(())
    }
}

validate_fields!(AvalaraTaxConfiguration {});

discriminated_union! {
    /// Tax settings for one provider, keyed by `tax_provider`.
    pub enum TaxConfiguration on "tax_provider" {
        /// Avalara.
        "avalara" => Avalara(AvalaraTaxConfiguration) as as_avalara,
        /// TaxJar.
        "taxjar" => Taxjar(ProviderTaxConfiguration<tax_provider::Taxjar>) as as_taxjar,
        /// Sphere.
        "sphere" => Sphere(ProviderTaxConfiguration<tax_provider::Sphere>) as as_sphere,
        /// Numeral.
        "numeral" => Numeral(ProviderTaxConfiguration<tax_provider::Numeral>) as as_numeral,
        /// Anrok.
        "anrok" => Anrok(ProviderTaxConfiguration<tax_provider::Anrok>) as as_anrok,
    }
}

/// One change to a customer's balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceTransaction {
    /// Orb-assigned transaction ID.
    pub id: String,
    /// Why the balance changed.
    pub action: BalanceTransactionAction,
    /// Signed amount, as a decimal string.
    pub amount: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Credit note involved, if any.
    #[serde(default)]
    pub credit_note: Option<IdRef>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Balance after the transaction.
    pub ending_balance: String,
    /// Invoice involved, if any.
    #[serde(default)]
    pub invoice: Option<IdRef>,
    /// Balance before the transaction.
    pub starting_balance: String,
    /// Direction of the change.
    #[serde(rename = "type")]
    pub kind: BalanceTransactionType,
}

validate_fields!(CustomerTaxId {});
validate_fields!(Customer {
    billing_address,
    payment_provider,
    shipping_address,
    tax_id,
});
validate_fields!(BalanceTransaction {
    action,
    credit_note,
    invoice,
    kind,
});

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::UnionError;
    use crate::union::{assert_every_variant_round_trips, Discriminated};
    use crate::validate::Validate;

    fn customer_json() -> serde_json::Value {
        json!({
            "id": "cus_1",
            "additional_emails": [],
            "auto_collection": true,
            "balance": "0.00",
            "billing_address": null,
            "created_at": "2024-01-01T00:00:00Z",
            "currency": "USD",
            "email": "billing@example.com",
            "email_delivery": true,
            "external_customer_id": "acme",
            "metadata": {"tier": "gold"},
            "name": "Acme",
            "payment_provider": "stripe_charge",
            "payment_provider_id": "cus_stripe",
            "portal_url": null,
            "shipping_address": null,
            "tax_id": {"country": "DE", "type": "eu_vat", "value": "DE123"},
            "timezone": "Etc/UTC"
        })
    }

    #[test]
    fn decodes_customer() {
        let customer: Customer = serde_json::from_value(customer_json()).unwrap();
        assert_eq!(customer.external_customer_id.as_deref(), Some("acme"));
        assert_eq!(customer.tax_id.as_ref().unwrap().kind, "eu_vat");
        assert_eq!(customer.payment_provider, Some(PaymentProvider::StripeCharge));
        assert!(customer.validate().is_ok());
    }

    #[test]
    fn unknown_payment_provider_fails_validation() {
        let mut value = customer_json();
        value["payment_provider"] = json!("paypal");
        let customer: Customer = serde_json::from_value(value).unwrap();
        assert!(customer.validate().is_err());
    }

    #[test]
    fn tax_configuration_picks_provider() {
        let config = TaxConfiguration::decode(json!({
            "tax_provider": "avalara",
            "tax_exempt": true,
            "tax_exemption_code": "E"
        }))
        .unwrap();
        assert_eq!(
            config.as_avalara().unwrap().tax_exemption_code.as_deref(),
            Some("E")
        );
        assert!(config.validate().is_ok());

        let config = TaxConfiguration::from(ProviderTaxConfiguration::<tax_provider::Anrok>::new(
            false,
        ));
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({"tax_provider": "anrok", "tax_exempt": false})
        );
    }

    #[test]
    fn every_tax_provider_round_trips() {
        assert_every_variant_round_trips::<TaxConfiguration>(|tax_provider| {
            let mut value = json!({"tax_exempt": true});
            if tax_provider == "avalara" {
                value["tax_exemption_code"] = json!("E");
            }
            value
        });
    }

    #[test]
    fn unknown_tax_provider_is_rejected() {
        let err = TaxConfiguration::decode(json!({"tax_provider": "vertex", "tax_exempt": true}))
            .unwrap_err();
        assert!(matches!(err, UnionError::UnknownVariant { .. }));
    }

    #[test]
    fn balance_transaction_type_is_renamed() {
        let transaction: BalanceTransaction = serde_json::from_value(json!({
            "id": "bt_1",
            "action": "manual_adjustment",
            "amount": "10.00",
            "created_at": "2024-01-01T00:00:00Z",
            "credit_note": null,
            "description": null,
            "ending_balance": "10.00",
            "invoice": null,
            "starting_balance": "0.00",
            "type": "increment"
        }))
        .unwrap();
        assert_eq!(transaction.kind, BalanceTransactionType::Increment);
        assert!(transaction.validate().is_ok());
    }
}
