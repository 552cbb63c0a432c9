//! Prices as returned by the API.
//!
//! A [`Price`] is one of the pricing models listed under
//! [`model_type`]. Every variant carries the same [`PriceCommon`] fields,
//! its own `model_type` tag and a model-specific configuration object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::discount::Discount;
use crate::enums::string_enum;
use crate::shared::{
    Allocation, BillableMetricTiny, BillingCycleConfiguration, Cadence, CustomConfig, ItemSlim,
    Maximum, Metadata, Minimum,
};
use crate::validate::validate_fields;

/// Discriminator values for the `model_type` key.
pub mod model_type {
    use crate::union::tag_type;

    tag_type! {
        /// `model_type` of unit prices.
        Unit = "unit";
        /// `model_type` of package prices.
        Package = "package";
        /// `model_type` of matrix prices.
        Matrix = "matrix";
        /// `model_type` of tiered prices.
        Tiered = "tiered";
        /// `model_type` of bulk prices.
        Bulk = "bulk";
        /// `model_type` of threshold total amount prices.
        ThresholdTotalAmount = "threshold_total_amount";
        /// `model_type` of tiered package prices.
        TieredPackage = "tiered_package";
        /// `model_type` of grouped tiered prices.
        GroupedTiered = "grouped_tiered";
        /// `model_type` of tiered with minimum prices.
        TieredWithMinimum = "tiered_with_minimum";
        /// `model_type` of tiered package with minimum prices.
        TieredPackageWithMinimum = "tiered_package_with_minimum";
        /// `model_type` of package with allocation prices.
        PackageWithAllocation = "package_with_allocation";
        /// `model_type` of unit with percent prices.
        UnitWithPercent = "unit_with_percent";
        /// `model_type` of matrix with allocation prices.
        MatrixWithAllocation = "matrix_with_allocation";
        /// `model_type` of tiered with proration prices.
        TieredWithProration = "tiered_with_proration";
        /// `model_type` of unit with proration prices.
        UnitWithProration = "unit_with_proration";
        /// `model_type` of grouped allocation prices.
        GroupedAllocation = "grouped_allocation";
        /// `model_type` of bulk with proration prices.
        BulkWithProration = "bulk_with_proration";
        /// `model_type` of grouped with prorated minimum prices.
        GroupedWithProratedMinimum = "grouped_with_prorated_minimum";
        /// `model_type` of grouped with metered minimum prices.
        GroupedWithMeteredMinimum = "grouped_with_metered_minimum";
        /// `model_type` of grouped with min max thresholds prices.
        GroupedWithMinMaxThresholds = "grouped_with_min_max_thresholds";
        /// `model_type` of matrix with display name prices.
        MatrixWithDisplayName = "matrix_with_display_name";
        /// `model_type` of grouped tiered package prices.
        GroupedTieredPackage = "grouped_tiered_package";
        /// `model_type` of max group tiered package prices.
        MaxGroupTieredPackage = "max_group_tiered_package";
        /// `model_type` of scalable matrix with unit pricing prices.
        ScalableMatrixWithUnitPricing = "scalable_matrix_with_unit_pricing";
        /// `model_type` of scalable matrix with tiered pricing prices.
        ScalableMatrixWithTieredPricing = "scalable_matrix_with_tiered_pricing";
        /// `model_type` of cumulative grouped bulk prices.
        CumulativeGroupedBulk = "cumulative_grouped_bulk";
        /// `model_type` of minimum prices.
        Minimum = "minimum";
        /// `model_type` of minimum composite prices.
        MinimumComposite = "minimum_composite";
        /// `model_type` of percent prices.
        Percent = "percent";
        /// `model_type` of event output prices.
        EventOutput = "event_output";
    }
}

/// Define a `model_type` union whose variants share one common field set.
///
/// Each variant becomes a struct holding the flattened common fields, its
/// tag and its configuration object.
macro_rules! model_union {
    (
        $(#[$meta:meta])*
        pub enum $union:ident: $common:ty {
            $(
                $(#[$vmeta:meta])*
                $tag:literal => $variant:ident($struct:ident) as $accessor:ident {
                    model_type: $tag_ty:ty,
                    $config_field:ident: $config:ty,
                }
            )+
        }
    ) => {
        $(
            $(#[$vmeta])*
            #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
            pub struct $struct {
                /// Fields shared by every pricing model.
                #[serde(flatten)]
                pub common: $common,
                /// Pricing model discriminator.
                pub model_type: $tag_ty,
                /// Pricing model configuration.
                pub $config_field: $config,
            }

            $crate::validate::validate_fields!($struct { common, $config_field });
        )+

        $crate::union::discriminated_union! {
            $(#[$meta])*
            pub enum $union on "model_type" {
                $( $(#[$vmeta])* $tag => $variant($struct) as $accessor, )+
            }
        }

        impl $union {
            /// Fields shared by every pricing model.
            #[must_use]
            pub fn common(&self) -> &$common {
                match self {
                    $( Self::$variant(inner) => &inner.common, )+
                }
            }
        }
    };
}

pub(crate) use model_union;

string_enum! {
    /// Whether a price is usage-based or a fixed fee.
    pub enum PriceType {
        /// Billed on metered usage.
        UsagePrice = "usage_price",
        /// Billed as a fixed fee.
        FixedPrice = "fixed_price",
    }
}

/// Fields present on every price, whatever its model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceCommon {
    /// Orb-assigned price ID.
    pub id: String,
    /// Metric the price rates, for usage prices.
    #[serde(default)]
    pub billable_metric: Option<BillableMetricTiny>,
    /// Billing cycle the price follows.
    pub billing_cycle_configuration: BillingCycleConfiguration,
    /// Billing cadence.
    pub cadence: Cadence,
    /// Conversion rate into the invoicing currency.
    #[serde(default)]
    pub conversion_rate: Option<f64>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Credits granted alongside the price.
    #[serde(default)]
    pub credit_allocation: Option<Allocation>,
    /// Currency of the price.
    pub currency: String,
    /// Discount applied to the price.
    #[serde(default)]
    pub discount: Option<Discount>,
    /// The caller's own ID for the price.
    #[serde(default)]
    pub external_price_id: Option<String>,
    /// Fixed quantity billed for fixed-fee prices.
    #[serde(default)]
    pub fixed_price_quantity: Option<f64>,
    /// Invoicing cycle, when it differs from the billing cycle.
    #[serde(default)]
    pub invoicing_cycle_configuration: Option<BillingCycleConfiguration>,
    /// Item being priced.
    pub item: ItemSlim,
    /// Maximum spend on this price.
    #[serde(default)]
    pub maximum: Option<Maximum>,
    /// Maximum amount, as a decimal string.
    #[serde(default)]
    pub maximum_amount: Option<String>,
    /// User-defined metadata.
    #[serde(default)]
    pub metadata: Metadata,
    /// Minimum spend on this price.
    #[serde(default)]
    pub minimum: Option<Minimum>,
    /// Minimum amount, as a decimal string.
    #[serde(default)]
    pub minimum_amount: Option<String>,
    /// Display name.
    pub name: String,
    /// Plan phase the price belongs to.
    #[serde(default)]
    pub plan_phase_order: Option<i64>,
    /// Usage or fixed.
    pub price_type: PriceType,
    /// ID of the price this one replaces in a plan version.
    #[serde(default)]
    pub replaces_price_id: Option<String>,
}

validate_fields!(PriceCommon {
    billable_metric,
    billing_cycle_configuration,
    cadence,
    credit_allocation,
    discount,
    invoicing_cycle_configuration,
    item,
    maximum,
    minimum,
    price_type,
});

/// Rate charged per unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitConfig {
    /// Amount per unit, as a decimal string.
    pub unit_amount: String,
}

/// Amount charged per started package of units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Amount per package, as a decimal string.
    pub package_amount: String,
    /// Units per package.
    pub package_size: i64,
}

/// One cell of a pricing matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixValue {
    /// Dimension values selecting this cell.
    pub dimension_values: Vec<Option<String>>,
    /// Amount per unit in this cell.
    pub unit_amount: String,
}

/// Unit rates in a one or two dimensional matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixConfig {
    /// Fallback rate for usage outside any cell.
    pub default_unit_amount: String,
    /// Dimension keys.
    pub dimensions: Vec<Option<String>>,
    /// Configured cells.
    pub matrix_values: Vec<MatrixValue>,
}

/// Matrix rates with a credit allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixWithAllocationConfig {
    /// Allocation granted per period.
    pub allocation: f64,
    /// Fallback rate for usage outside any cell.
    pub default_unit_amount: String,
    /// Dimension keys.
    pub dimensions: Vec<Option<String>>,
    /// Configured cells.
    pub matrix_values: Vec<MatrixValue>,
}

/// One tier of a tiered price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    /// Inclusive lower bound.
    pub first_unit: f64,
    /// Exclusive upper bound; `None` on the last tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_unit: Option<f64>,
    /// Amount per unit within the tier.
    pub unit_amount: String,
}

/// Graduated rates by usage tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TieredConfig {
    /// Tiers in ascending order.
    pub tiers: Vec<Tier>,
}

/// One tier of a bulk price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkTier {
    /// Upper bound of the tier; `None` on the last tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_units: Option<f64>,
    /// Amount per unit for all usage once this tier is reached.
    pub unit_amount: String,
}

/// A single rate chosen by total usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkConfig {
    /// Tiers in ascending order.
    pub tiers: Vec<BulkTier>,
}

/// Minimum spend priced as its own line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimumConfig {
    /// Minimum amount, as a decimal string.
    pub minimum_amount: String,
    /// Whether the minimum is prorated for partial periods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prorated: Option<bool>,
}

/// A percentage of other charges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentConfig {
    /// Percentage, between 0 and 1.
    pub percent: f64,
}

/// Rates read from a property of each event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOutputConfig {
    /// Event property holding the unit rate.
    pub unit_rating_key: String,
    /// Rate used when the property is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_unit_rate: Option<String>,
    /// Event property to group results by.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouping_key: Option<String>,
}

validate_fields!(UnitConfig {});
validate_fields!(PackageConfig {});
validate_fields!(MatrixValue {});
validate_fields!(MatrixConfig { matrix_values });
validate_fields!(MatrixWithAllocationConfig { matrix_values });
validate_fields!(Tier {});
validate_fields!(TieredConfig { tiers });
validate_fields!(BulkTier {});
validate_fields!(BulkConfig { tiers });
validate_fields!(MinimumConfig {});
validate_fields!(PercentConfig {});
validate_fields!(EventOutputConfig {});

model_union! {
    /// A price, keyed by `model_type`.
    pub enum Price: PriceCommon {
        /// Unit pricing.
        "unit" => Unit(UnitPrice) as as_unit {
            model_type: model_type::Unit,
            unit_config: UnitConfig,
        }
        /// Package pricing.
        "package" => Package(PackagePrice) as as_package {
            model_type: model_type::Package,
            package_config: PackageConfig,
        }
        /// Matrix pricing.
        "matrix" => Matrix(MatrixPrice) as as_matrix {
            model_type: model_type::Matrix,
            matrix_config: MatrixConfig,
        }
        /// Tiered pricing.
        "tiered" => Tiered(TieredPrice) as as_tiered {
            model_type: model_type::Tiered,
            tiered_config: TieredConfig,
        }
        /// Bulk pricing.
        "bulk" => Bulk(BulkPrice) as as_bulk {
            model_type: model_type::Bulk,
            bulk_config: BulkConfig,
        }
        /// Threshold total amount pricing.
        "threshold_total_amount" => ThresholdTotalAmount(ThresholdTotalAmountPrice) as as_threshold_total_amount {
            model_type: model_type::ThresholdTotalAmount,
            threshold_total_amount_config: CustomConfig,
        }
        /// Tiered package pricing.
        "tiered_package" => TieredPackage(TieredPackagePrice) as as_tiered_package {
            model_type: model_type::TieredPackage,
            tiered_package_config: CustomConfig,
        }
        /// Grouped tiered pricing.
        "grouped_tiered" => GroupedTiered(GroupedTieredPrice) as as_grouped_tiered {
            model_type: model_type::GroupedTiered,
            grouped_tiered_config: CustomConfig,
        }
        /// Tiered with minimum pricing.
        "tiered_with_minimum" => TieredWithMinimum(TieredWithMinimumPrice) as as_tiered_with_minimum {
            model_type: model_type::TieredWithMinimum,
            tiered_with_minimum_config: CustomConfig,
        }
        /// Tiered package with minimum pricing.
        "tiered_package_with_minimum" => TieredPackageWithMinimum(TieredPackageWithMinimumPrice) as as_tiered_package_with_minimum {
            model_type: model_type::TieredPackageWithMinimum,
            tiered_package_with_minimum_config: CustomConfig,
        }
        /// Package with allocation pricing.
        "package_with_allocation" => PackageWithAllocation(PackageWithAllocationPrice) as as_package_with_allocation {
            model_type: model_type::PackageWithAllocation,
            package_with_allocation_config: CustomConfig,
        }
        /// Unit with percent pricing.
        "unit_with_percent" => UnitWithPercent(UnitWithPercentPrice) as as_unit_with_percent {
            model_type: model_type::UnitWithPercent,
            unit_with_percent_config: CustomConfig,
        }
        /// Matrix with allocation pricing.
        "matrix_with_allocation" => MatrixWithAllocation(MatrixWithAllocationPrice) as as_matrix_with_allocation {
            model_type: model_type::MatrixWithAllocation,
            matrix_with_allocation_config: MatrixWithAllocationConfig,
        }
        /// Tiered with proration pricing.
        "tiered_with_proration" => TieredWithProration(TieredWithProrationPrice) as as_tiered_with_proration {
            model_type: model_type::TieredWithProration,
            tiered_with_proration_config: CustomConfig,
        }
        /// Unit with proration pricing.
        "unit_with_proration" => UnitWithProration(UnitWithProrationPrice) as as_unit_with_proration {
            model_type: model_type::UnitWithProration,
            unit_with_proration_config: CustomConfig,
        }
        /// Grouped allocation pricing.
        "grouped_allocation" => GroupedAllocation(GroupedAllocationPrice) as as_grouped_allocation {
            model_type: model_type::GroupedAllocation,
            grouped_allocation_config: CustomConfig,
        }
        /// Bulk with proration pricing.
        "bulk_with_proration" => BulkWithProration(BulkWithProrationPrice) as as_bulk_with_proration {
            model_type: model_type::BulkWithProration,
            bulk_with_proration_config: CustomConfig,
        }
        /// Grouped with prorated minimum pricing.
        "grouped_with_prorated_minimum" => GroupedWithProratedMinimum(GroupedWithProratedMinimumPrice) as as_grouped_with_prorated_minimum {
            model_type: model_type::GroupedWithProratedMinimum,
            grouped_with_prorated_minimum_config: CustomConfig,
        }
        /// Grouped with metered minimum pricing.
        "grouped_with_metered_minimum" => GroupedWithMeteredMinimum(GroupedWithMeteredMinimumPrice) as as_grouped_with_metered_minimum {
            model_type: model_type::GroupedWithMeteredMinimum,
            grouped_with_metered_minimum_config: CustomConfig,
        }
        /// Grouped with min max thresholds pricing.
        "grouped_with_min_max_thresholds" => GroupedWithMinMaxThresholds(GroupedWithMinMaxThresholdsPrice) as as_grouped_with_min_max_thresholds {
            model_type: model_type::GroupedWithMinMaxThresholds,
            grouped_with_min_max_thresholds_config: CustomConfig,
        }
        /// Matrix with display name pricing.
        "matrix_with_display_name" => MatrixWithDisplayName(MatrixWithDisplayNamePrice) as as_matrix_with_display_name {
            model_type: model_type::MatrixWithDisplayName,
            matrix_with_display_name_config: CustomConfig,
        }
        /// Grouped tiered package pricing.
        "grouped_tiered_package" => GroupedTieredPackage(GroupedTieredPackagePrice) as as_grouped_tiered_package {
            model_type: model_type::GroupedTieredPackage,
            grouped_tiered_package_config: CustomConfig,
        }
        /// Max group tiered package pricing.
        "max_group_tiered_package" => MaxGroupTieredPackage(MaxGroupTieredPackagePrice) as as_max_group_tiered_package {
            model_type: model_type::MaxGroupTieredPackage,
            max_group_tiered_package_config: CustomConfig,
        }
        /// Scalable matrix with unit pricing pricing.
        "scalable_matrix_with_unit_pricing" => ScalableMatrixWithUnitPricing(ScalableMatrixWithUnitPricingPrice) as as_scalable_matrix_with_unit_pricing {
            model_type: model_type::ScalableMatrixWithUnitPricing,
            scalable_matrix_with_unit_pricing_config: CustomConfig,
        }
        /// Scalable matrix with tiered pricing pricing.
        "scalable_matrix_with_tiered_pricing" => ScalableMatrixWithTieredPricing(ScalableMatrixWithTieredPricingPrice) as as_scalable_matrix_with_tiered_pricing {
            model_type: model_type::ScalableMatrixWithTieredPricing,
            scalable_matrix_with_tiered_pricing_config: CustomConfig,
        }
        /// Cumulative grouped bulk pricing.
        "cumulative_grouped_bulk" => CumulativeGroupedBulk(CumulativeGroupedBulkPrice) as as_cumulative_grouped_bulk {
            model_type: model_type::CumulativeGroupedBulk,
            cumulative_grouped_bulk_config: CustomConfig,
        }
        /// Minimum pricing.
        "minimum" => Minimum(MinimumPrice) as as_minimum {
            model_type: model_type::Minimum,
            minimum_config: MinimumConfig,
        }
        /// Minimum composite pricing.
        "minimum_composite" => MinimumComposite(MinimumCompositePrice) as as_minimum_composite {
            model_type: model_type::MinimumComposite,
            minimum_composite_config: MinimumConfig,
        }
        /// Percent pricing.
        "percent" => Percent(PercentPrice) as as_percent {
            model_type: model_type::Percent,
            percent_config: PercentConfig,
        }
        /// Event output pricing.
        "event_output" => EventOutput(EventOutputPrice) as as_event_output {
            model_type: model_type::EventOutput,
            event_output_config: EventOutputConfig,
        }
    }
}

/// A price together with the quantity evaluated for one grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatePriceGroup {
    /// Amount, as a decimal string.
    pub amount: String,
    /// Values of the requested grouping keys, in request order.
    pub grouping_values: Vec<crate::dates::GroupingValue>,
    /// Quantity rated in this group.
    pub quantity: f64,
}

/// Result of evaluating a price over a timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEvaluateResponse {
    /// One entry per grouping.
    pub data: Vec<EvaluatePriceGroup>,
}

validate_fields!(EvaluatePriceGroup { grouping_values });
validate_fields!(PriceEvaluateResponse { data });

/// A valid configuration object for the given `model_type`.
#[cfg(test)]
pub(crate) fn sample_config(model_type: &str) -> serde_json::Value {
    use serde_json::json;

    let matrix = json!({
        "default_unit_amount": "1.00",
        "dimensions": ["region", null],
        "matrix_values": [{"dimension_values": ["eu", null], "unit_amount": "2.00"}]
    });
    match model_type {
        "unit" => json!({"unit_amount": "0.50"}),
        "package" => json!({"package_amount": "5.00", "package_size": 100}),
        "matrix" => matrix,
        "matrix_with_allocation" => {
            let mut config = matrix;
            config["allocation"] = json!(250.0);
            config
        }
        "tiered" => json!({"tiers": [
            {"first_unit": 0.0, "last_unit": 1000.0, "unit_amount": "1.00"},
            {"first_unit": 1000.0, "unit_amount": "0.75"}
        ]}),
        "bulk" => json!({"tiers": [
            {"maximum_units": 1000.0, "unit_amount": "1.00"},
            {"unit_amount": "0.75"}
        ]}),
        "minimum" | "minimum_composite" => json!({"minimum_amount": "100.00", "prorated": true}),
        "percent" => json!({"percent": 0.1}),
        "event_output" => json!({"unit_rating_key": "rate", "grouping_key": "region"}),
        _ => json!({
            "grouping_key": "region",
            "tiers": [{"tier_lower_bound": "0", "unit_amount": "1.00"}]
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::error::UnionError;
    use crate::union::{assert_every_variant_round_trips, Discriminated};
    use crate::validate::Validate;

    fn unit_price_json() -> Value {
        json!({
            "id": "price_1",
            "billable_metric": {"id": "bm_1"},
            "billing_cycle_configuration": {"duration": 1, "duration_unit": "month"},
            "cadence": "monthly",
            "conversion_rate": null,
            "created_at": "2024-01-01T00:00:00Z",
            "credit_allocation": null,
            "currency": "USD",
            "discount": null,
            "external_price_id": null,
            "fixed_price_quantity": null,
            "invoicing_cycle_configuration": null,
            "item": {"id": "item_1", "name": "API calls"},
            "maximum": null,
            "maximum_amount": null,
            "metadata": {},
            "minimum": null,
            "minimum_amount": null,
            "model_type": "unit",
            "name": "API calls",
            "plan_phase_order": null,
            "price_type": "usage_price",
            "replaces_price_id": null,
            "unit_config": {"unit_amount": "0.50"}
        })
    }

    #[test]
    fn decodes_unit_price() {
        let price = Price::decode(unit_price_json()).unwrap();
        assert_eq!(price.variant_name(), "unit");
        assert_eq!(price.common().id, "price_1");
        assert_eq!(price.as_unit().unwrap().unit_config.unit_amount, "0.50");
        assert!(price.validate().is_ok());
    }

    #[test]
    fn every_model_type_round_trips() {
        assert_eq!(Price::VARIANTS.len(), 30);
        assert_every_variant_round_trips::<Price>(|model_type| {
            let mut value = unit_price_json();
            let object = value.as_object_mut().unwrap();
            object.remove("unit_config");
            object.insert(format!("{model_type}_config"), sample_config(model_type));
            value
        });
    }

    #[test]
    fn encode_keeps_discriminator_and_config() {
        let price = Price::decode(unit_price_json()).unwrap();
        let encoded = serde_json::to_value(&price).unwrap();
        assert_eq!(encoded["model_type"], "unit");
        assert_eq!(encoded["unit_config"]["unit_amount"], "0.50");
        assert_eq!(encoded["item"]["name"], "API calls");
    }

    #[test]
    fn custom_configs_are_kept_as_objects() {
        let mut value = unit_price_json();
        let object = value.as_object_mut().unwrap();
        object.remove("unit_config");
        object.insert("model_type".into(), json!("tiered_package"));
        object.insert(
            "tiered_package_config".into(),
            json!({"package_size": 10, "tiers": []}),
        );

        let price = Price::decode(value).unwrap();
        let config = &price.as_tiered_package().unwrap().tiered_package_config;
        assert_eq!(config["package_size"], 10);
    }

    #[test]
    fn unknown_model_type_lists_expected_values() {
        let mut value = unit_price_json();
        value["model_type"] = json!("quantum");
        match Price::decode(value).unwrap_err() {
            UnionError::UnknownVariant { value, expected, .. } => {
                assert_eq!(value, "quantum");
                assert_eq!(expected.len(), 30);
                assert!(expected.contains(&"event_output"));
            }
            other => panic!("expected UnknownVariant, got {other:?}"),
        }
    }

    #[test]
    fn missing_config_is_a_variant_mismatch() {
        let mut value = unit_price_json();
        value.as_object_mut().unwrap().remove("unit_config");
        assert!(matches!(
            Price::decode(value).unwrap_err(),
            UnionError::VariantMismatch { variant: "unit", .. }
        ));
    }

    #[test]
    fn validation_reaches_nested_enums() {
        let mut value = unit_price_json();
        value["cadence"] = json!("fortnightly");
        let price = Price::decode(value).unwrap();
        assert!(price.validate().is_err());
    }
}
