//! Price definitions sent in create requests.
//!
//! [`NewPlanPrice`] is used inside plans and plan versions, where the
//! currency is inherited from the plan. [`NewFloatingPrice`] creates a price
//! outside any plan and must name its currency.

use serde::{Deserialize, Serialize};

use crate::price::{
    model_type, model_union, BulkConfig, EventOutputConfig, MatrixConfig,
    MatrixWithAllocationConfig, MinimumConfig, PackageConfig, PercentConfig, TieredConfig,
    UnitConfig,
};
use crate::shared::{BillingCycleConfiguration, Cadence, CustomConfig, Metadata};
use crate::validate::validate_fields;

/// Fields shared by every price defined inside a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlanPriceCommon {
    /// Billing cadence.
    pub cadence: Cadence,
    /// Item the price is attached to.
    pub item_id: String,
    /// Display name.
    pub name: String,
    /// Metric rated by usage prices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billable_metric_id: Option<String>,
    /// Bill at the start of the period instead of the end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billed_in_advance: Option<bool>,
    /// Billing cycle, when it differs from the plan's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_cycle_configuration: Option<BillingCycleConfiguration>,
    /// Conversion rate into the invoicing currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversion_rate: Option<f64>,
    /// Currency override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// The caller's own ID for the price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_price_id: Option<String>,
    /// Fixed quantity for fixed-fee prices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_price_quantity: Option<f64>,
    /// Property used to group this price's line items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_grouping_key: Option<String>,
    /// Invoicing cycle, when it differs from the billing cycle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoicing_cycle_configuration: Option<BillingCycleConfiguration>,
    /// User-defined metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Reference other entries in the same request can use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
}

impl NewPlanPriceCommon {
    /// Start a price definition with its required fields.
    pub fn new(name: impl Into<String>, item_id: impl Into<String>, cadence: Cadence) -> Self {
        Self {
            cadence,
            item_id: item_id.into(),
            name: name.into(),
            billable_metric_id: None,
            billed_in_advance: None,
            billing_cycle_configuration: None,
            conversion_rate: None,
            currency: None,
            external_price_id: None,
            fixed_price_quantity: None,
            invoice_grouping_key: None,
            invoicing_cycle_configuration: None,
            metadata: None,
            reference_id: None,
        }
    }

    /// Set the metric rated by this price.
    #[must_use]
    pub fn with_billable_metric(mut self, billable_metric_id: impl Into<String>) -> Self {
        self.billable_metric_id = Some(billable_metric_id.into());
        self
    }

    /// Set the caller's own ID for this price.
    #[must_use]
    pub fn with_external_price_id(mut self, external_price_id: impl Into<String>) -> Self {
        self.external_price_id = Some(external_price_id.into());
        self
    }
}

/// Fields shared by every price created outside a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFloatingPriceCommon {
    /// Billing cadence.
    pub cadence: Cadence,
    /// Currency of the price.
    pub currency: String,
    /// Item the price is attached to.
    pub item_id: String,
    /// Display name.
    pub name: String,
    /// Metric rated by usage prices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billable_metric_id: Option<String>,
    /// Bill at the start of the period instead of the end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billed_in_advance: Option<bool>,
    /// Billing cycle of the price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_cycle_configuration: Option<BillingCycleConfiguration>,
    /// Conversion rate into the invoicing currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversion_rate: Option<f64>,
    /// The caller's own ID for the price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_price_id: Option<String>,
    /// Fixed quantity for fixed-fee prices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_price_quantity: Option<f64>,
    /// Property used to group this price's line items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_grouping_key: Option<String>,
    /// Invoicing cycle, when it differs from the billing cycle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoicing_cycle_configuration: Option<BillingCycleConfiguration>,
    /// User-defined metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl NewFloatingPriceCommon {
    /// Start a price definition with its required fields.
    pub fn new(
        name: impl Into<String>,
        item_id: impl Into<String>,
        cadence: Cadence,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            cadence,
            currency: currency.into(),
            item_id: item_id.into(),
            name: name.into(),
            billable_metric_id: None,
            billed_in_advance: None,
            billing_cycle_configuration: None,
            conversion_rate: None,
            external_price_id: None,
            fixed_price_quantity: None,
            invoice_grouping_key: None,
            invoicing_cycle_configuration: None,
            metadata: None,
        }
    }
}

validate_fields!(NewPlanPriceCommon {
    cadence,
    billing_cycle_configuration,
    invoicing_cycle_configuration,
});
validate_fields!(NewFloatingPriceCommon {
    cadence,
    billing_cycle_configuration,
    invoicing_cycle_configuration,
});

model_union! {
    /// A price defined inline in a plan, keyed by `model_type`.
    pub enum NewPlanPrice: NewPlanPriceCommon {
        /// Unit pricing.
        "unit" => Unit(NewPlanUnitPrice) as as_unit {
            model_type: model_type::Unit,
            unit_config: UnitConfig,
        }
        /// Package pricing.
        "package" => Package(NewPlanPackagePrice) as as_package {
            model_type: model_type::Package,
            package_config: PackageConfig,
        }
        /// Matrix pricing.
        "matrix" => Matrix(NewPlanMatrixPrice) as as_matrix {
            model_type: model_type::Matrix,
            matrix_config: MatrixConfig,
        }
        /// Tiered pricing.
        "tiered" => Tiered(NewPlanTieredPrice) as as_tiered {
            model_type: model_type::Tiered,
            tiered_config: TieredConfig,
        }
        /// Bulk pricing.
        "bulk" => Bulk(NewPlanBulkPrice) as as_bulk {
            model_type: model_type::Bulk,
            bulk_config: BulkConfig,
        }
        /// Threshold total amount pricing.
        "threshold_total_amount" => ThresholdTotalAmount(NewPlanThresholdTotalAmountPrice) as as_threshold_total_amount {
            model_type: model_type::ThresholdTotalAmount,
            threshold_total_amount_config: CustomConfig,
        }
        /// Tiered package pricing.
        "tiered_package" => TieredPackage(NewPlanTieredPackagePrice) as as_tiered_package {
            model_type: model_type::TieredPackage,
            tiered_package_config: CustomConfig,
        }
        /// Grouped tiered pricing.
        "grouped_tiered" => GroupedTiered(NewPlanGroupedTieredPrice) as as_grouped_tiered {
            model_type: model_type::GroupedTiered,
            grouped_tiered_config: CustomConfig,
        }
        /// Tiered with minimum pricing.
        "tiered_with_minimum" => TieredWithMinimum(NewPlanTieredWithMinimumPrice) as as_tiered_with_minimum {
            model_type: model_type::TieredWithMinimum,
            tiered_with_minimum_config: CustomConfig,
        }
        /// Tiered package with minimum pricing.
        "tiered_package_with_minimum" => TieredPackageWithMinimum(NewPlanTieredPackageWithMinimumPrice) as as_tiered_package_with_minimum {
            model_type: model_type::TieredPackageWithMinimum,
            tiered_package_with_minimum_config: CustomConfig,
        }
        /// Package with allocation pricing.
        "package_with_allocation" => PackageWithAllocation(NewPlanPackageWithAllocationPrice) as as_package_with_allocation {
            model_type: model_type::PackageWithAllocation,
            package_with_allocation_config: CustomConfig,
        }
        /// Unit with percent pricing.
        "unit_with_percent" => UnitWithPercent(NewPlanUnitWithPercentPrice) as as_unit_with_percent {
            model_type: model_type::UnitWithPercent,
            unit_with_percent_config: CustomConfig,
        }
        /// Matrix with allocation pricing.
        "matrix_with_allocation" => MatrixWithAllocation(NewPlanMatrixWithAllocationPrice) as as_matrix_with_allocation {
            model_type: model_type::MatrixWithAllocation,
            matrix_with_allocation_config: MatrixWithAllocationConfig,
        }
        /// Tiered with proration pricing.
        "tiered_with_proration" => TieredWithProration(NewPlanTieredWithProrationPrice) as as_tiered_with_proration {
            model_type: model_type::TieredWithProration,
            tiered_with_proration_config: CustomConfig,
        }
        /// Unit with proration pricing.
        "unit_with_proration" => UnitWithProration(NewPlanUnitWithProrationPrice) as as_unit_with_proration {
            model_type: model_type::UnitWithProration,
            unit_with_proration_config: CustomConfig,
        }
        /// Grouped allocation pricing.
        "grouped_allocation" => GroupedAllocation(NewPlanGroupedAllocationPrice) as as_grouped_allocation {
            model_type: model_type::GroupedAllocation,
            grouped_allocation_config: CustomConfig,
        }
        /// Bulk with proration pricing.
        "bulk_with_proration" => BulkWithProration(NewPlanBulkWithProrationPrice) as as_bulk_with_proration {
            model_type: model_type::BulkWithProration,
            bulk_with_proration_config: CustomConfig,
        }
        /// Grouped with prorated minimum pricing.
        "grouped_with_prorated_minimum" => GroupedWithProratedMinimum(NewPlanGroupedWithProratedMinimumPrice) as as_grouped_with_prorated_minimum {
            model_type: model_type::GroupedWithProratedMinimum,
            grouped_with_prorated_minimum_config: CustomConfig,
        }
        /// Grouped with metered minimum pricing.
        "grouped_with_metered_minimum" => GroupedWithMeteredMinimum(NewPlanGroupedWithMeteredMinimumPrice) as as_grouped_with_metered_minimum {
            model_type: model_type::GroupedWithMeteredMinimum,
            grouped_with_metered_minimum_config: CustomConfig,
        }
        /// Grouped with min max thresholds pricing.
        "grouped_with_min_max_thresholds" => GroupedWithMinMaxThresholds(NewPlanGroupedWithMinMaxThresholdsPrice) as as_grouped_with_min_max_thresholds {
            model_type: model_type::GroupedWithMinMaxThresholds,
            grouped_with_min_max_thresholds_config: CustomConfig,
        }
        /// Matrix with display name pricing.
        "matrix_with_display_name" => MatrixWithDisplayName(NewPlanMatrixWithDisplayNamePrice) as as_matrix_with_display_name {
            model_type: model_type::MatrixWithDisplayName,
            matrix_with_display_name_config: CustomConfig,
        }
        /// Grouped tiered package pricing.
        "grouped_tiered_package" => GroupedTieredPackage(NewPlanGroupedTieredPackagePrice) as as_grouped_tiered_package {
            model_type: model_type::GroupedTieredPackage,
            grouped_tiered_package_config: CustomConfig,
        }
        /// Max group tiered package pricing.
        "max_group_tiered_package" => MaxGroupTieredPackage(NewPlanMaxGroupTieredPackagePrice) as as_max_group_tiered_package {
            model_type: model_type::MaxGroupTieredPackage,
            max_group_tiered_package_config: CustomConfig,
        }
        /// Scalable matrix with unit pricing pricing.
        "scalable_matrix_with_unit_pricing" => ScalableMatrixWithUnitPricing(NewPlanScalableMatrixWithUnitPricingPrice) as as_scalable_matrix_with_unit_pricing {
            model_type: model_type::ScalableMatrixWithUnitPricing,
            scalable_matrix_with_unit_pricing_config: CustomConfig,
        }
        /// Scalable matrix with tiered pricing pricing.
        "scalable_matrix_with_tiered_pricing" => ScalableMatrixWithTieredPricing(NewPlanScalableMatrixWithTieredPricingPrice) as as_scalable_matrix_with_tiered_pricing {
            model_type: model_type::ScalableMatrixWithTieredPricing,
            scalable_matrix_with_tiered_pricing_config: CustomConfig,
        }
        /// Cumulative grouped bulk pricing.
        "cumulative_grouped_bulk" => CumulativeGroupedBulk(NewPlanCumulativeGroupedBulkPrice) as as_cumulative_grouped_bulk {
            model_type: model_type::CumulativeGroupedBulk,
            cumulative_grouped_bulk_config: CustomConfig,
        }
        /// Minimum pricing.
        "minimum" => Minimum(NewPlanMinimumPrice) as as_minimum {
            model_type: model_type::Minimum,
            minimum_config: MinimumConfig,
        }
        /// Minimum composite pricing.
        "minimum_composite" => MinimumComposite(NewPlanMinimumCompositePrice) as as_minimum_composite {
            model_type: model_type::MinimumComposite,
            minimum_composite_config: MinimumConfig,
        }
        /// Percent pricing.
        "percent" => Percent(NewPlanPercentPrice) as as_percent {
            model_type: model_type::Percent,
            percent_config: PercentConfig,
        }
        /// Event output pricing.
        "event_output" => EventOutput(NewPlanEventOutputPrice) as as_event_output {
            model_type: model_type::EventOutput,
            event_output_config: EventOutputConfig,
        }
    }
}

model_union! {
    /// A price created on its own, keyed by `model_type`.
    pub enum NewFloatingPrice: NewFloatingPriceCommon {
        /// Unit pricing.
        "unit" => Unit(NewFloatingUnitPrice) as as_unit {
            model_type: model_type::Unit,
            unit_config: UnitConfig,
        }
        /// Package pricing.
        "package" => Package(NewFloatingPackagePrice) as as_package {
            model_type: model_type::Package,
            package_config: PackageConfig,
        }
        /// Matrix pricing.
        "matrix" => Matrix(NewFloatingMatrixPrice) as as_matrix {
            model_type: model_type::Matrix,
            matrix_config: MatrixConfig,
        }
        /// Tiered pricing.
        "tiered" => Tiered(NewFloatingTieredPrice) as as_tiered {
            model_type: model_type::Tiered,
            tiered_config: TieredConfig,
        }
        /// Bulk pricing.
        "bulk" => Bulk(NewFloatingBulkPrice) as as_bulk {
            model_type: model_type::Bulk,
            bulk_config: BulkConfig,
        }
        /// Threshold total amount pricing.
        "threshold_total_amount" => ThresholdTotalAmount(NewFloatingThresholdTotalAmountPrice) as as_threshold_total_amount {
            model_type: model_type::ThresholdTotalAmount,
            threshold_total_amount_config: CustomConfig,
        }
        /// Tiered package pricing.
        "tiered_package" => TieredPackage(NewFloatingTieredPackagePrice) as as_tiered_package {
            model_type: model_type::TieredPackage,
            tiered_package_config: CustomConfig,
        }
        /// Grouped tiered pricing.
        "grouped_tiered" => GroupedTiered(NewFloatingGroupedTieredPrice) as as_grouped_tiered {
            model_type: model_type::GroupedTiered,
            grouped_tiered_config: CustomConfig,
        }
        /// Tiered with minimum pricing.
        "tiered_with_minimum" => TieredWithMinimum(NewFloatingTieredWithMinimumPrice) as as_tiered_with_minimum {
            model_type: model_type::TieredWithMinimum,
            tiered_with_minimum_config: CustomConfig,
        }
        /// Tiered package with minimum pricing.
        "tiered_package_with_minimum" => TieredPackageWithMinimum(NewFloatingTieredPackageWithMinimumPrice) as as_tiered_package_with_minimum {
            model_type: model_type::TieredPackageWithMinimum,
            tiered_package_with_minimum_config: CustomConfig,
        }
        /// Package with allocation pricing.
        "package_with_allocation" => PackageWithAllocation(NewFloatingPackageWithAllocationPrice) as as_package_with_allocation {
            model_type: model_type::PackageWithAllocation,
            package_with_allocation_config: CustomConfig,
        }
        /// Unit with percent pricing.
        "unit_with_percent" => UnitWithPercent(NewFloatingUnitWithPercentPrice) as as_unit_with_percent {
            model_type: model_type::UnitWithPercent,
            unit_with_percent_config: CustomConfig,
        }
        /// Matrix with allocation pricing.
        "matrix_with_allocation" => MatrixWithAllocation(NewFloatingMatrixWithAllocationPrice) as as_matrix_with_allocation {
            model_type: model_type::MatrixWithAllocation,
            matrix_with_allocation_config: MatrixWithAllocationConfig,
        }
        /// Tiered with proration pricing.
        "tiered_with_proration" => TieredWithProration(NewFloatingTieredWithProrationPrice) as as_tiered_with_proration {
            model_type: model_type::TieredWithProration,
            tiered_with_proration_config: CustomConfig,
        }
        /// Unit with proration pricing.
        "unit_with_proration" => UnitWithProration(NewFloatingUnitWithProrationPrice) as as_unit_with_proration {
            model_type: model_type::UnitWithProration,
            unit_with_proration_config: CustomConfig,
        }
        /// Grouped allocation pricing.
        "grouped_allocation" => GroupedAllocation(NewFloatingGroupedAllocationPrice) as as_grouped_allocation {
            model_type: model_type::GroupedAllocation,
            grouped_allocation_config: CustomConfig,
        }
        /// Bulk with proration pricing.
        "bulk_with_proration" => BulkWithProration(NewFloatingBulkWithProrationPrice) as as_bulk_with_proration {
            model_type: model_type::BulkWithProration,
            bulk_with_proration_config: CustomConfig,
        }
        /// Grouped with prorated minimum pricing.
        "grouped_with_prorated_minimum" => GroupedWithProratedMinimum(NewFloatingGroupedWithProratedMinimumPrice) as as_grouped_with_prorated_minimum {
            model_type: model_type::GroupedWithProratedMinimum,
            grouped_with_prorated_minimum_config: CustomConfig,
        }
        /// Grouped with metered minimum pricing.
        "grouped_with_metered_minimum" => GroupedWithMeteredMinimum(NewFloatingGroupedWithMeteredMinimumPrice) as as_grouped_with_metered_minimum {
            model_type: model_type::GroupedWithMeteredMinimum,
            grouped_with_metered_minimum_config: CustomConfig,
        }
        /// Grouped with min max thresholds pricing.
        "grouped_with_min_max_thresholds" => GroupedWithMinMaxThresholds(NewFloatingGroupedWithMinMaxThresholdsPrice) as as_grouped_with_min_max_thresholds {
            model_type: model_type::GroupedWithMinMaxThresholds,
            grouped_with_min_max_thresholds_config: CustomConfig,
        }
        /// Matrix with display name pricing.
        "matrix_with_display_name" => MatrixWithDisplayName(NewFloatingMatrixWithDisplayNamePrice) as as_matrix_with_display_name {
            model_type: model_type::MatrixWithDisplayName,
            matrix_with_display_name_config: CustomConfig,
        }
        /// Grouped tiered package pricing.
        "grouped_tiered_package" => GroupedTieredPackage(NewFloatingGroupedTieredPackagePrice) as as_grouped_tiered_package {
            model_type: model_type::GroupedTieredPackage,
            grouped_tiered_package_config: CustomConfig,
        }
        /// Max group tiered package pricing.
        "max_group_tiered_package" => MaxGroupTieredPackage(NewFloatingMaxGroupTieredPackagePrice) as as_max_group_tiered_package {
            model_type: model_type::MaxGroupTieredPackage,
            max_group_tiered_package_config: CustomConfig,
        }
        /// Scalable matrix with unit pricing pricing.
        "scalable_matrix_with_unit_pricing" => ScalableMatrixWithUnitPricing(NewFloatingScalableMatrixWithUnitPricingPrice) as as_scalable_matrix_with_unit_pricing {
            model_type: model_type::ScalableMatrixWithUnitPricing,
            scalable_matrix_with_unit_pricing_config: CustomConfig,
        }
        /// Scalable matrix with tiered pricing pricing.
        "scalable_matrix_with_tiered_pricing" => ScalableMatrixWithTieredPricing(NewFloatingScalableMatrixWithTieredPricingPrice) as as_scalable_matrix_with_tiered_pricing {
            model_type: model_type::ScalableMatrixWithTieredPricing,
            scalable_matrix_with_tiered_pricing_config: CustomConfig,
        }
        /// Cumulative grouped bulk pricing.
        "cumulative_grouped_bulk" => CumulativeGroupedBulk(NewFloatingCumulativeGroupedBulkPrice) as as_cumulative_grouped_bulk {
            model_type: model_type::CumulativeGroupedBulk,
            cumulative_grouped_bulk_config: CustomConfig,
        }
        /// Minimum pricing.
        "minimum" => Minimum(NewFloatingMinimumPrice) as as_minimum {
            model_type: model_type::Minimum,
            minimum_config: MinimumConfig,
        }
        /// Minimum composite pricing.
        "minimum_composite" => MinimumComposite(NewFloatingMinimumCompositePrice) as as_minimum_composite {
            model_type: model_type::MinimumComposite,
            minimum_composite_config: MinimumConfig,
        }
        /// Percent pricing.
        "percent" => Percent(NewFloatingPercentPrice) as as_percent {
            model_type: model_type::Percent,
            percent_config: PercentConfig,
        }
        /// Event output pricing.
        "event_output" => EventOutput(NewFloatingEventOutputPrice) as as_event_output {
            model_type: model_type::EventOutput,
            event_output_config: EventOutputConfig,
        }
    }
}

impl NewPlanPrice {
    /// A unit price charging `unit_amount` per unit.
    pub fn unit(common: NewPlanPriceCommon, unit_amount: impl Into<String>) -> Self {
        Self::Unit(NewPlanUnitPrice {
            common,
            model_type: model_type::Unit,
            unit_config: UnitConfig {
                unit_amount: unit_amount.into(),
            },
        })
    }
}

impl NewFloatingPrice {
    /// A unit price charging `unit_amount` per unit.
    pub fn unit(common: NewFloatingPriceCommon, unit_amount: impl Into<String>) -> Self {
        Self::Unit(NewFloatingUnitPrice {
            common,
            model_type: model_type::Unit,
            unit_config: UnitConfig {
                unit_amount: unit_amount.into(),
            },
        })
    }
}
