//! Small shapes shared across resources.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::string_enum;
use crate::validate::validate_fields;

/// User-defined key/value metadata attached to a resource.
pub type Metadata = BTreeMap<String, String>;

/// Metadata in update requests. Setting a key to `None` deletes it.
pub type MetadataPatch = BTreeMap<String, Option<String>>;

/// Free-form configuration object for pricing models without a typed shape.
pub type CustomConfig = serde_json::Map<String, serde_json::Value>;

string_enum! {
    /// How often a price is billed.
    pub enum Cadence {
        /// Billed once.
        OneTime = "one_time",
        /// Billed monthly.
        Monthly = "monthly",
        /// Billed quarterly.
        Quarterly = "quarterly",
        /// Billed twice a year.
        SemiAnnual = "semi_annual",
        /// Billed yearly.
        Annual = "annual",
        /// Billed on a custom cycle.
        Custom = "custom",
    }
}

string_enum! {
    /// Unit of a billing cycle duration.
    pub enum DurationUnit {
        /// Days.
        Day = "day",
        /// Months.
        Month = "month",
    }
}

/// A reference to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSlim {
    /// Orb-assigned item ID.
    pub id: String,
    /// Item name.
    pub name: String,
}

/// A reference to a billable metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillableMetricTiny {
    /// Orb-assigned metric ID.
    pub id: String,
}

/// A bare ID reference (`{ "id": ... }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    /// The referenced ID.
    pub id: String,
}

/// Customer identifiers embedded in other resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerMinified {
    /// Orb-assigned customer ID.
    pub id: String,
    /// The caller's own customer ID.
    pub external_customer_id: Option<String>,
}

/// Length of a billing or invoicing cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingCycleConfiguration {
    /// Number of units in the cycle.
    pub duration: i64,
    /// The unit the duration is expressed in.
    pub duration_unit: DurationUnit,
}

/// A minimum spend applied to a price or plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Minimum {
    /// Price IDs the minimum applies to.
    pub applies_to_price_ids: Vec<String>,
    /// Minimum amount, as a decimal string.
    pub minimum_amount: String,
}

/// A maximum spend applied to a price or plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maximum {
    /// Price IDs the maximum applies to.
    pub applies_to_price_ids: Vec<String>,
    /// Maximum amount, as a decimal string.
    pub maximum_amount: String,
}

/// A credit allocation granted alongside a price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Whether unused credits roll over.
    pub allows_rollover: bool,
    /// Currency of the allocated credits.
    pub currency: String,
    /// Custom expiration of the allocated credits.
    #[serde(default)]
    pub custom_expiration: Option<BillingCycleConfiguration>,
}

/// A customer's postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// City.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// First street line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line1: Option<String>,
    /// Second street line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    /// Postal code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// State or region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

validate_fields!(ItemSlim {});
validate_fields!(BillableMetricTiny {});
validate_fields!(IdRef {});
validate_fields!(CustomerMinified {});
validate_fields!(BillingCycleConfiguration { duration_unit });
validate_fields!(Minimum {});
validate_fields!(Maximum {});
validate_fields!(Allocation { custom_expiration });
validate_fields!(Address {});

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::Validate;

    #[test]
    fn optional_address_fields_default_to_none() {
        let address: Address = serde_json::from_value(json!({"city": "Berlin"})).unwrap();
        assert_eq!(address.city.as_deref(), Some("Berlin"));
        assert!(address.line1.is_none());
        assert_eq!(serde_json::to_value(&address).unwrap(), json!({"city": "Berlin"}));
    }

    #[test]
    fn billing_cycle_validates_its_unit() {
        let cycle: BillingCycleConfiguration =
            serde_json::from_value(json!({"duration": 3, "duration_unit": "fortnight"})).unwrap();
        assert!(cycle.validate().is_err());

        let cycle: BillingCycleConfiguration =
            serde_json::from_value(json!({"duration": 3, "duration_unit": "month"})).unwrap();
        assert!(cycle.validate().is_ok());
    }
}
