//! Prepaid credits: blocks, ledger entries and ledger writes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::string_enum;
use crate::shared::{CustomerMinified, Metadata};
use crate::union::discriminated_union;
use crate::validate::validate_fields;

string_enum! {
    /// State of a credit block.
    pub enum CreditBlockStatus {
        /// Credits can be drawn down.
        Active = "active",
        /// Waiting for the purchase invoice to be paid.
        PendingPayment = "pending_payment",
    }
}

string_enum! {
    /// Whether a ledger entry is final.
    pub enum EntryStatus {
        /// Final.
        Committed = "committed",
        /// May still change.
        Pending = "pending",
    }
}

string_enum! {
    /// Reason given when voiding credits.
    pub enum VoidReason {
        /// Credits were refunded.
        Refund = "refund",
    }
}

/// A block of credits with one cost basis and expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditBlock {
    /// Orb-assigned block ID.
    pub id: String,
    /// Remaining credits.
    pub balance: f64,
    /// When the block becomes usable.
    #[serde(default)]
    pub effective_date: Option<DateTime<Utc>>,
    /// When the block expires.
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
    /// Credits the block started with.
    #[serde(default)]
    pub maximum_initial_balance: Option<f64>,
    /// Price paid per credit, as a decimal string.
    #[serde(default)]
    pub per_unit_cost_basis: Option<String>,
    /// State of the block.
    pub status: CreditBlockStatus,
}

/// The block a ledger entry touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerCreditBlock {
    /// Orb-assigned block ID.
    pub id: String,
    /// When the block expires.
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
    /// Price paid per credit, as a decimal string.
    #[serde(default)]
    pub per_unit_cost_basis: Option<String>,
}

/// Fields present on every ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntryCommon {
    /// Orb-assigned entry ID.
    pub id: String,
    /// Signed credit amount.
    pub amount: f64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Block the entry touched.
    pub credit_block: LedgerCreditBlock,
    /// Credit currency.
    pub currency: String,
    /// Customer owning the ledger.
    pub customer: CustomerMinified,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Balance after the entry.
    pub ending_balance: f64,
    /// Whether the entry is final.
    pub entry_status: EntryStatus,
    /// Position in the customer's ledger.
    pub ledger_sequence_number: i64,
    /// User-defined metadata.
    #[serde(default)]
    pub metadata: Metadata,
    /// Balance before the entry.
    pub starting_balance: f64,
}

/// Discriminator values for the `entry_type` key.
pub mod entry_type {
    use crate::union::tag_type;

    tag_type! {
        /// `entry_type` of credit grants.
        Increment = "increment";
        /// `entry_type` of credit draw-downs.
        Decrement = "decrement";
        /// `entry_type` of expiry changes.
        ExpirationChange = "expiration_change";
        /// `entry_type` of block expiries.
        CreditBlockExpiry = "credit_block_expiry";
        /// `entry_type` of voids.
        Void = "void";
        /// `entry_type` of voids awaiting completion.
        VoidInitiated = "void_initiated";
        /// `entry_type` of amendments.
        Amendment = "amendment";
    }
}

/// Credits granted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncrementLedgerEntry {
    /// Shared entry fields.
    #[serde(flatten)]
    pub common: LedgerEntryCommon,
    /// Discriminator.
    pub entry_type: entry_type::Increment,
}

/// Credits drawn down by usage or by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecrementLedgerEntry {
    /// Shared entry fields.
    #[serde(flatten)]
    pub common: LedgerEntryCommon,
    /// Discriminator.
    pub entry_type: entry_type::Decrement,
    /// Event that consumed the credits.
    #[serde(default)]
    pub event_id: Option<String>,
    /// Invoice that consumed the credits.
    #[serde(default)]
    pub invoice_id: Option<String>,
    /// Price that consumed the credits.
    #[serde(default)]
    pub price_id: Option<String>,
}

/// A block's expiry was moved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpirationChangeLedgerEntry {
    /// Shared entry fields.
    #[serde(flatten)]
    pub common: LedgerEntryCommon,
    /// Discriminator.
    pub entry_type: entry_type::ExpirationChange,
    /// The new expiry.
    #[serde(default)]
    pub new_block_expiry_date: Option<DateTime<Utc>>,
}

/// A block expired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditBlockExpiryLedgerEntry {
    /// Shared entry fields.
    #[serde(flatten)]
    pub common: LedgerEntryCommon,
    /// Discriminator.
    pub entry_type: entry_type::CreditBlockExpiry,
}

/// Credits were voided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoidLedgerEntry {
    /// Shared entry fields.
    #[serde(flatten)]
    pub common: LedgerEntryCommon,
    /// Discriminator.
    pub entry_type: entry_type::Void,
    /// Credits voided.
    pub void_amount: f64,
    /// Reason given.
    #[serde(default)]
    pub void_reason: Option<String>,
}

/// A void was started and will complete once the refund settles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoidInitiatedLedgerEntry {
    /// Shared entry fields.
    #[serde(flatten)]
    pub common: LedgerEntryCommon,
    /// Discriminator.
    pub entry_type: entry_type::VoidInitiated,
    /// Expiry applied to the block being voided.
    pub new_block_expiry_date: DateTime<Utc>,
    /// Credits voided.
    pub void_amount: f64,
    /// Reason given.
    #[serde(default)]
    pub void_reason: Option<String>,
}

/// A block's balance was corrected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmendmentLedgerEntry {
    /// Shared entry fields.
    #[serde(flatten)]
    pub common: LedgerEntryCommon,
    /// Discriminator.
    pub entry_type: entry_type::Amendment,
}

validate_fields!(CreditBlock { status });
validate_fields!(LedgerCreditBlock {});
validate_fields!(LedgerEntryCommon {
    credit_block,
    customer,
    entry_status,
});
validate_fields!(IncrementLedgerEntry { common });
validate_fields!(DecrementLedgerEntry { common });
validate_fields!(ExpirationChangeLedgerEntry { common });
validate_fields!(CreditBlockExpiryLedgerEntry { common });
validate_fields!(VoidLedgerEntry { common });
validate_fields!(VoidInitiatedLedgerEntry { common });
validate_fields!(AmendmentLedgerEntry { common });

discriminated_union! {
    /// One entry of a customer's credit ledger, keyed by `entry_type`.
    pub enum CreditLedgerEntry on "entry_type" {
        /// Credits granted.
        "increment" => Increment(IncrementLedgerEntry) as as_increment,
        /// Credits drawn down.
        "decrement" => Decrement(DecrementLedgerEntry) as as_decrement,
        /// Expiry moved.
        "expiration_change" => ExpirationChange(ExpirationChangeLedgerEntry) as as_expiration_change,
        /// Block expired.
        "credit_block_expiry" => CreditBlockExpiry(CreditBlockExpiryLedgerEntry) as as_credit_block_expiry,
        /// Credits voided.
        "void" => Void(VoidLedgerEntry) as as_void,
        /// Void started.
        "void_initiated" => VoidInitiated(VoidInitiatedLedgerEntry) as as_void_initiated,
        /// Balance corrected.
        "amendment" => Amendment(AmendmentLedgerEntry) as as_amendment,
    }
}

impl CreditLedgerEntry {
    /// Fields shared by every entry.
    #[must_use]
    pub fn common(&self) -> &LedgerEntryCommon {
        match self {
            Self::Increment(e) => &e.common,
            Self::Decrement(e) => &e.common,
            Self::ExpirationChange(e) => &e.common,
            Self::CreditBlockExpiry(e) => &e.common,
            Self::Void(e) => &e.common,
            Self::VoidInitiated(e) => &e.common,
            Self::Amendment(e) => &e.common,
        }
    }
}

/// Grant credits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddIncrement {
    /// Discriminator.
    pub entry_type: entry_type::Increment,
    /// Credits to grant.
    pub amount: f64,
    /// Credit currency; defaults to the customer's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the credits become usable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<DateTime<Utc>>,
    /// When the credits expire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
    /// User-defined metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Price paid per credit, as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_unit_cost_basis: Option<String>,
}

/// Draw down credits by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddDecrement {
    /// Discriminator.
    pub entry_type: entry_type::Decrement,
    /// Credits to remove.
    pub amount: f64,
    /// Credit currency; defaults to the customer's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// User-defined metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Move the expiry of credits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddExpirationChange {
    /// Discriminator.
    pub entry_type: entry_type::ExpirationChange,
    /// The new expiry date.
    pub target_expiry_date: NaiveDate,
    /// Current expiry of the credits to move.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
    /// Credits to move; all when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Block to move.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    /// Credit currency; defaults to the customer's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// User-defined metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Void credits in a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddVoid {
    /// Discriminator.
    pub entry_type: entry_type::Void,
    /// Credits to void.
    pub amount: f64,
    /// Block to void from.
    pub block_id: String,
    /// Reason for the void.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub void_reason: Option<VoidReason>,
    /// Credit currency; defaults to the customer's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// User-defined metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Correct the balance of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddAmendment {
    /// Discriminator.
    pub entry_type: entry_type::Amendment,
    /// Signed credit correction.
    pub amount: f64,
    /// Block to amend.
    pub block_id: String,
    /// Credit currency; defaults to the customer's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// User-defined metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

validate_fields!(AddIncrement {});
validate_fields!(AddDecrement {});
validate_fields!(AddExpirationChange {});
validate_fields!(AddVoid { void_reason });
validate_fields!(AddAmendment {});

discriminated_union! {
    /// A ledger write, keyed by `entry_type`.
    pub enum AddLedgerEntry on "entry_type" {
        /// Grant credits.
        "increment" => Increment(AddIncrement) as as_increment,
        /// Draw down credits.
        "decrement" => Decrement(AddDecrement) as as_decrement,
        /// Move an expiry.
        "expiration_change" => ExpirationChange(AddExpirationChange) as as_expiration_change,
        /// Void credits.
        "void" => Void(AddVoid) as as_void,
        /// Correct a balance.
        "amendment" => Amendment(AddAmendment) as as_amendment,
    }
}

impl AddLedgerEntry {
    /// Grant `amount` credits.
    #[must_use]
    pub fn increment(amount: f64) -> Self {
        Self::Increment(AddIncrement {
            entry_type: entry_type::Increment,
            amount,
            currency: None,
            description: None,
            effective_date: None,
            expiry_date: None,
            metadata: None,
            per_unit_cost_basis: None,
        })
    }

    /// Remove `amount` credits.
    #[must_use]
    pub fn decrement(amount: f64) -> Self {
        Self::Decrement(AddDecrement {
            entry_type: entry_type::Decrement,
            amount,
            currency: None,
            description: None,
            metadata: None,
        })
    }

    /// Void `amount` credits from `block_id`.
    pub fn void(amount: f64, block_id: impl Into<String>) -> Self {
        Self::Void(AddVoid {
            entry_type: entry_type::Void,
            amount,
            block_id: block_id.into(),
            void_reason: None,
            currency: None,
            description: None,
            metadata: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::error::{ModelError, UnionErrorKind};
    use crate::page::Page;
    use crate::union::{assert_every_variant_round_trips, Discriminated};
    use crate::validate::Validate;

    fn entry_json(entry_type: &str) -> Value {
        json!({
            "id": "le_1",
            "amount": -5.0,
            "created_at": "2024-04-01T00:00:00Z",
            "credit_block": {"id": "cb_1", "expiry_date": null, "per_unit_cost_basis": "1.00"},
            "currency": "credits",
            "customer": {"id": "cus_1", "external_customer_id": null},
            "description": null,
            "ending_balance": 95.0,
            "entry_status": "committed",
            "entry_type": entry_type,
            "ledger_sequence_number": 4,
            "metadata": {},
            "starting_balance": 100.0
        })
    }

    #[test]
    fn void_entry_is_picked_by_discriminator() {
        let mut value = entry_json("void");
        value["void_amount"] = json!(5.0);
        value["void_reason"] = json!("refund");

        let entry = CreditLedgerEntry::decode(value).unwrap();
        assert_eq!(entry.as_void().unwrap().void_amount, 5.0);
        assert!(entry.as_increment().is_none());
        assert!(entry.as_decrement().is_none());
        assert!(entry.as_expiration_change().is_none());
        assert!(entry.as_credit_block_expiry().is_none());
        assert!(entry.as_void_initiated().is_none());
        assert!(entry.as_amendment().is_none());
        assert_eq!(entry.common().ledger_sequence_number, 4);
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn every_entry_type_round_trips() {
        assert_every_variant_round_trips::<CreditLedgerEntry>(|kind| {
            let mut value = entry_json(kind);
            match kind {
                "decrement" => {
                    value["event_id"] = json!("evt_1");
                    value["price_id"] = json!("price_1");
                }
                "expiration_change" => {
                    value["new_block_expiry_date"] = json!("2025-01-01T00:00:00Z");
                }
                "void" => value["void_amount"] = json!(5.0),
                "void_initiated" => {
                    value["void_amount"] = json!(5.0);
                    value["void_reason"] = json!("refund");
                    value["new_block_expiry_date"] = json!("2025-01-01T00:00:00Z");
                }
                _ => {}
            }
            value
        });
    }

    #[test]
    fn every_ledger_write_round_trips() {
        assert_every_variant_round_trips::<AddLedgerEntry>(|kind| match kind {
            "increment" => json!({
                "amount": 100.0,
                "expiry_date": "2025-01-01T00:00:00Z",
                "per_unit_cost_basis": "0.50"
            }),
            "decrement" => json!({"amount": 10.0, "description": "manual"}),
            "expiration_change" => json!({
                "target_expiry_date": "2025-06-30",
                "block_id": "cb_1"
            }),
            "void" => json!({"amount": 10.0, "block_id": "cb_1", "void_reason": "refund"}),
            _ => json!({"amount": -3.0, "block_id": "cb_1"}),
        });
    }

    #[test]
    fn unknown_entry_type_is_a_union_error() {
        let err = crate::from_value::<CreditLedgerEntry>(entry_json("teleport")).unwrap_err();
        match err {
            ModelError::Union { kind, union, message } => {
                assert_eq!(kind, UnionErrorKind::UnknownVariant);
                assert_eq!(union, "CreditLedgerEntry");
                assert!(message.contains("teleport"));
            }
            other => panic!("expected Union, got {other:?}"),
        }
    }

    #[test]
    fn union_errors_survive_nesting_in_a_page() {
        let mut entry = entry_json("void");
        entry.as_object_mut().unwrap().remove("entry_type");
        let err = crate::from_value::<Page<CreditLedgerEntry>>(json!({
            "data": [entry],
            "pagination_metadata": {"has_more": false, "next_cursor": null}
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            ModelError::Union {
                kind: UnionErrorKind::MissingDiscriminator,
                ..
            }
        ));

        let mut entry = entry_json("void");
        entry.as_object_mut().unwrap().remove("void_amount");
        let err = crate::from_str::<Page<CreditLedgerEntry>>(
            &json!({
                "data": [entry],
                "pagination_metadata": {"has_more": false, "next_cursor": null}
            })
            .to_string(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ModelError::Union {
                kind: UnionErrorKind::VariantMismatch,
                ..
            }
        ));
    }

    #[test]
    fn void_initiated_needs_new_expiry() {
        let mut value = entry_json("void_initiated");
        value["void_amount"] = json!(5.0);
        let err = CreditLedgerEntry::decode(value).unwrap_err();
        assert!(err.to_string().contains("new_block_expiry_date"));
    }

    #[test]
    fn ledger_write_encodes_entry_type() {
        let write = AddLedgerEntry::void(10.0, "cb_1");
        assert_eq!(
            serde_json::to_value(&write).unwrap(),
            json!({"entry_type": "void", "amount": 10.0, "block_id": "cb_1"})
        );

        let back = AddLedgerEntry::decode(json!({
            "entry_type": "expiration_change",
            "target_expiry_date": "2025-01-01"
        }))
        .unwrap();
        assert_eq!(
            back.as_expiration_change().unwrap().target_expiry_date,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
    }
}
