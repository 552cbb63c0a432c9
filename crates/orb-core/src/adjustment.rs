//! Price adjustments: discounts, minimums and maximums applied to a set of
//! prices.

use serde::{Deserialize, Serialize};

use crate::union::discriminated_union;
use crate::validate::validate_fields;

/// Discriminator values for the `adjustment_type` key.
pub mod adjustment_type {
    use crate::union::tag_type;

    tag_type! {
        /// `adjustment_type` of usage discounts.
        UsageDiscount = "usage_discount";
        /// `adjustment_type` of amount discounts.
        AmountDiscount = "amount_discount";
        /// `adjustment_type` of percentage discounts.
        PercentageDiscount = "percentage_discount";
        /// `adjustment_type` of minimums.
        Minimum = "minimum";
        /// `adjustment_type` of maximums.
        Maximum = "maximum";
    }
}

/// Fields present on every adjustment returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentCommon {
    /// Orb-assigned adjustment ID.
    pub id: String,
    /// Price IDs the adjustment applies to.
    pub applies_to_price_ids: Vec<String>,
    /// Whether the adjustment applies to the invoice as a whole.
    pub is_invoice_level: bool,
    /// Plan phase the adjustment belongs to.
    #[serde(default)]
    pub plan_phase_order: Option<i64>,
    /// Free-form reason shown on invoices.
    #[serde(default)]
    pub reason: Option<String>,
}

validate_fields!(AdjustmentCommon {});

/// Free usage units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageDiscountAdjustment {
    /// Shared adjustment fields.
    #[serde(flatten)]
    pub common: AdjustmentCommon,
    /// Discriminator.
    pub adjustment_type: adjustment_type::UsageDiscount,
    /// Units discounted.
    pub usage_discount: f64,
}

/// A fixed amount off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountDiscountAdjustment {
    /// Shared adjustment fields.
    #[serde(flatten)]
    pub common: AdjustmentCommon,
    /// Discriminator.
    pub adjustment_type: adjustment_type::AmountDiscount,
    /// Amount taken off, as a decimal string.
    pub amount_discount: String,
}

/// A percentage off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentageDiscountAdjustment {
    /// Shared adjustment fields.
    #[serde(flatten)]
    pub common: AdjustmentCommon,
    /// Discriminator.
    pub adjustment_type: adjustment_type::PercentageDiscount,
    /// Fraction taken off, between 0 and 1.
    pub percentage_discount: f64,
}

/// A minimum spend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimumAdjustment {
    /// Shared adjustment fields.
    #[serde(flatten)]
    pub common: AdjustmentCommon,
    /// Discriminator.
    pub adjustment_type: adjustment_type::Minimum,
    /// Item the true-up is billed against.
    pub item_id: String,
    /// Minimum amount, as a decimal string.
    pub minimum_amount: String,
}

/// A maximum spend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaximumAdjustment {
    /// Shared adjustment fields.
    #[serde(flatten)]
    pub common: AdjustmentCommon,
    /// Discriminator.
    pub adjustment_type: adjustment_type::Maximum,
    /// Maximum amount, as a decimal string.
    pub maximum_amount: String,
}

validate_fields!(UsageDiscountAdjustment { common });
validate_fields!(AmountDiscountAdjustment { common });
validate_fields!(PercentageDiscountAdjustment { common });
validate_fields!(MinimumAdjustment { common });
validate_fields!(MaximumAdjustment { common });

discriminated_union! {
    /// An adjustment as returned by the API, keyed by `adjustment_type`.
    pub enum Adjustment on "adjustment_type" {
        /// Free usage units.
        "usage_discount" => UsageDiscount(UsageDiscountAdjustment) as as_usage_discount,
        /// Fixed amount off.
        "amount_discount" => AmountDiscount(AmountDiscountAdjustment) as as_amount_discount,
        /// Percentage off.
        "percentage_discount" => PercentageDiscount(PercentageDiscountAdjustment) as as_percentage_discount,
        /// Minimum spend.
        "minimum" => Minimum(MinimumAdjustment) as as_minimum,
        /// Maximum spend.
        "maximum" => Maximum(MaximumAdjustment) as as_maximum,
    }
}

impl Adjustment {
    /// Fields shared by every adjustment.
    #[must_use]
    pub fn common(&self) -> &AdjustmentCommon {
        match self {
            Self::UsageDiscount(a) => &a.common,
            Self::AmountDiscount(a) => &a.common,
            Self::PercentageDiscount(a) => &a.common,
            Self::Minimum(a) => &a.common,
            Self::Maximum(a) => &a.common,
        }
    }
}

/// Free usage units, in a create request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUsageDiscount {
    /// Discriminator.
    pub adjustment_type: adjustment_type::UsageDiscount,
    /// Price IDs the adjustment applies to.
    pub applies_to_price_ids: Vec<String>,
    /// Units discounted.
    pub usage_discount: f64,
    /// Apply to the invoice as a whole.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_invoice_level: Option<bool>,
}

/// A fixed amount off, in a create request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAmountDiscount {
    /// Discriminator.
    pub adjustment_type: adjustment_type::AmountDiscount,
    /// Amount taken off, as a decimal string.
    pub amount_discount: String,
    /// Price IDs the adjustment applies to.
    pub applies_to_price_ids: Vec<String>,
    /// Apply to the invoice as a whole.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_invoice_level: Option<bool>,
}

/// A percentage off, in a create request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPercentageDiscount {
    /// Discriminator.
    pub adjustment_type: adjustment_type::PercentageDiscount,
    /// Price IDs the adjustment applies to.
    pub applies_to_price_ids: Vec<String>,
    /// Fraction taken off, between 0 and 1.
    pub percentage_discount: f64,
    /// Apply to the invoice as a whole.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_invoice_level: Option<bool>,
}

/// A minimum spend, in a create request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMinimum {
    /// Discriminator.
    pub adjustment_type: adjustment_type::Minimum,
    /// Price IDs the adjustment applies to.
    pub applies_to_price_ids: Vec<String>,
    /// Item the true-up is billed against.
    pub item_id: String,
    /// Minimum amount, as a decimal string.
    pub minimum_amount: String,
    /// Apply to the invoice as a whole.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_invoice_level: Option<bool>,
}

/// A maximum spend, in a create request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMaximum {
    /// Discriminator.
    pub adjustment_type: adjustment_type::Maximum,
    /// Price IDs the adjustment applies to.
    pub applies_to_price_ids: Vec<String>,
    /// Maximum amount, as a decimal string.
    pub maximum_amount: String,
    /// Apply to the invoice as a whole.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_invoice_level: Option<bool>,
}

validate_fields!(NewUsageDiscount {});
validate_fields!(NewAmountDiscount {});
validate_fields!(NewPercentageDiscount {});
validate_fields!(NewMinimum {});
validate_fields!(NewMaximum {});

discriminated_union! {
    /// An adjustment to create, keyed by `adjustment_type`.
    pub enum NewAdjustment on "adjustment_type" {
        /// Free usage units.
        "usage_discount" => UsageDiscount(NewUsageDiscount) as as_usage_discount,
        /// Fixed amount off.
        "amount_discount" => AmountDiscount(NewAmountDiscount) as as_amount_discount,
        /// Percentage off.
        "percentage_discount" => PercentageDiscount(NewPercentageDiscount) as as_percentage_discount,
        /// Minimum spend.
        "minimum" => Minimum(NewMinimum) as as_minimum,
        /// Maximum spend.
        "maximum" => Maximum(NewMaximum) as as_maximum,
    }
}

impl NewAdjustment {
    /// A percentage discount on the given prices.
    pub fn percentage_discount(applies_to_price_ids: Vec<String>, percentage: f64) -> Self {
        Self::PercentageDiscount(NewPercentageDiscount {
            adjustment_type: adjustment_type::PercentageDiscount,
            applies_to_price_ids,
            percentage_discount: percentage,
            is_invoice_level: None,
        })
    }

    /// A fixed amount off the given prices.
    pub fn amount_discount(applies_to_price_ids: Vec<String>, amount: impl Into<String>) -> Self {
        Self::AmountDiscount(NewAmountDiscount {
            adjustment_type: adjustment_type::AmountDiscount,
            amount_discount: amount.into(),
            applies_to_price_ids,
            is_invoice_level: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::union::{assert_every_variant_round_trips, Discriminated};

    fn adjustment_json(adjustment_type: &str) -> serde_json::Value {
        let mut value = json!({
            "id": "adj_1",
            "applies_to_price_ids": ["price_1", "price_2"],
            "is_invoice_level": false,
            "plan_phase_order": 1,
            "reason": "launch promo"
        });
        match adjustment_type {
            "usage_discount" => value["usage_discount"] = json!(50.0),
            "amount_discount" => value["amount_discount"] = json!("5.00"),
            "percentage_discount" => value["percentage_discount"] = json!(0.25),
            "minimum" => {
                value["item_id"] = json!("item_1");
                value["minimum_amount"] = json!("100.00");
            }
            _ => value["maximum_amount"] = json!("900.00"),
        }
        value
    }

    #[test]
    fn every_adjustment_type_round_trips() {
        assert_every_variant_round_trips::<Adjustment>(adjustment_json);
    }

    #[test]
    fn every_new_adjustment_type_round_trips() {
        assert_every_variant_round_trips::<NewAdjustment>(adjustment_json);
    }

    #[test]
    fn decodes_minimum_adjustment() {
        let adjustment = Adjustment::decode(json!({
            "id": "adj_1",
            "adjustment_type": "minimum",
            "applies_to_price_ids": ["price_1"],
            "is_invoice_level": false,
            "plan_phase_order": null,
            "reason": null,
            "item_id": "item_1",
            "minimum_amount": "100.00"
        }))
        .unwrap();
        assert_eq!(adjustment.common().id, "adj_1");
        assert_eq!(adjustment.as_minimum().unwrap().minimum_amount, "100.00");
    }

    #[test]
    fn new_adjustment_encodes_discriminator() {
        let adjustment = NewAdjustment::percentage_discount(vec!["price_1".into()], 0.1);
        assert_eq!(
            serde_json::to_value(&adjustment).unwrap(),
            json!({
                "adjustment_type": "percentage_discount",
                "applies_to_price_ids": ["price_1"],
                "percentage_discount": 0.1
            })
        );
    }
}
