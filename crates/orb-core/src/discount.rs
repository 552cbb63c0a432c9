//! Discounts attached to prices, plans and coupons.

use serde::{Deserialize, Serialize};

use crate::union::discriminated_union;
use crate::validate::validate_fields;

/// Discriminator values for the `discount_type` key.
pub mod discount_type {
    use crate::union::tag_type;

    tag_type! {
        /// `discount_type` of percentage discounts.
        Percentage = "percentage";
        /// `discount_type` of trial discounts.
        Trial = "trial";
        /// `discount_type` of usage discounts.
        Usage = "usage";
        /// `discount_type` of amount discounts.
        Amount = "amount";
    }
}

/// A percentage off the listed prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentageDiscount {
    /// Discriminator.
    pub discount_type: discount_type::Percentage,
    /// Price IDs the discount applies to.
    pub applies_to_price_ids: Vec<String>,
    /// Fraction taken off, between 0 and 1.
    pub percentage_discount: f64,
    /// Free-form reason shown on invoices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A trial period discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialDiscount {
    /// Discriminator.
    pub discount_type: discount_type::Trial,
    /// Price IDs the discount applies to.
    pub applies_to_price_ids: Vec<String>,
    /// Fixed amount taken off during the trial.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_amount_discount: Option<String>,
    /// Fraction taken off during the trial.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_percentage_discount: Option<f64>,
    /// Free-form reason shown on invoices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A number of free usage units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageDiscount {
    /// Discriminator.
    pub discount_type: discount_type::Usage,
    /// Price IDs the discount applies to.
    pub applies_to_price_ids: Vec<String>,
    /// Units discounted.
    pub usage_discount: f64,
    /// Free-form reason shown on invoices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A fixed amount off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountDiscount {
    /// Discriminator.
    pub discount_type: discount_type::Amount,
    /// Amount taken off, as a decimal string.
    pub amount_discount: String,
    /// Price IDs the discount applies to.
    pub applies_to_price_ids: Vec<String>,
    /// Free-form reason shown on invoices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

validate_fields!(PercentageDiscount {});
validate_fields!(TrialDiscount {});
validate_fields!(UsageDiscount {});
validate_fields!(AmountDiscount {});

discriminated_union! {
    /// A discount, keyed by `discount_type`.
    pub enum Discount on "discount_type" {
        /// Percentage off.
        "percentage" => Percentage(PercentageDiscount) as as_percentage,
        /// Trial discount.
        "trial" => Trial(TrialDiscount) as as_trial,
        /// Free usage units.
        "usage" => Usage(UsageDiscount) as as_usage,
        /// Fixed amount off.
        "amount" => Amount(AmountDiscount) as as_amount,
    }
}

impl Discount {
    /// Price IDs the discount applies to.
    #[must_use]
    pub fn applies_to_price_ids(&self) -> &[String] {
        match self {
            Self::Percentage(d) => &d.applies_to_price_ids,
            Self::Trial(d) => &d.applies_to_price_ids,
            Self::Usage(d) => &d.applies_to_price_ids,
            Self::Amount(d) => &d.applies_to_price_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::union::{assert_every_variant_round_trips, Discriminated};

    #[test]
    fn every_discount_type_round_trips() {
        assert_every_variant_round_trips::<Discount>(|discount_type| {
            let mut value = json!({"applies_to_price_ids": ["price_1"], "reason": "loyalty"});
            match discount_type {
                "percentage" => value["percentage_discount"] = json!(0.15),
                "trial" => value["trial_amount_discount"] = json!("20.00"),
                "usage" => value["usage_discount"] = json!(3.0),
                _ => value["amount_discount"] = json!("5.00"),
            }
            value
        });
    }

    #[test]
    fn decodes_each_discount_type() {
        let discount = Discount::decode(json!({
            "discount_type": "amount",
            "amount_discount": "5.00",
            "applies_to_price_ids": ["price_1"]
        }))
        .unwrap();
        assert_eq!(discount.as_amount().unwrap().amount_discount, "5.00");
        assert_eq!(discount.applies_to_price_ids(), ["price_1".to_owned()]);

        let discount = Discount::decode(json!({
            "discount_type": "trial",
            "applies_to_price_ids": [],
            "trial_percentage_discount": 1.0
        }))
        .unwrap();
        assert_eq!(discount.variant_name(), "trial");
    }

    #[test]
    fn percentage_requires_its_amount() {
        let err = Discount::decode(json!({
            "discount_type": "percentage",
            "applies_to_price_ids": []
        }))
        .unwrap_err();
        assert!(err.to_string().contains("percentage_discount"));
    }
}
