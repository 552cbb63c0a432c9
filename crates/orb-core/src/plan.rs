//! Plans, plan versions and the building blocks of version changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adjustment::{Adjustment, NewAdjustment};
use crate::discount::Discount;
use crate::enums::string_enum;
use crate::new_price::NewPlanPrice;
use crate::price::Price;
use crate::shared::{Cadence, Maximum, Metadata, Minimum};
use crate::validate::validate_fields;

string_enum! {
    /// Lifecycle state of a plan.
    pub enum PlanStatus {
        /// Available for new subscriptions.
        Active = "active",
        /// No longer offered.
        Archived = "archived",
        /// Not yet published.
        Draft = "draft",
    }
}

string_enum! {
    /// Unit of a plan phase duration.
    pub enum PhaseDurationUnit {
        /// Days.
        Daily = "daily",
        /// Months.
        Monthly = "monthly",
        /// Quarters.
        Quarterly = "quarterly",
        /// Half years.
        SemiAnnual = "semi_annual",
        /// Years.
        Annual = "annual",
    }
}

string_enum! {
    /// Unit of a plan trial period.
    pub enum TrialPeriodUnit {
        /// Days.
        Days = "days",
    }
}

/// A reference to the plan another plan was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasePlan {
    /// Orb-assigned plan ID.
    #[serde(default)]
    pub id: Option<String>,
    /// The caller's own plan ID.
    #[serde(default)]
    pub external_plan_id: Option<String>,
    /// Plan name.
    #[serde(default)]
    pub name: Option<String>,
}

/// The product a plan belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanProduct {
    /// Orb-assigned product ID.
    pub id: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Product name.
    pub name: String,
}

/// Free trial attached to a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialConfig {
    /// Trial length, if any.
    #[serde(default)]
    pub trial_period: Option<i64>,
    /// Unit of `trial_period`.
    pub trial_period_unit: TrialPeriodUnit,
}

/// One phase of a phased plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanPhase {
    /// Orb-assigned phase ID.
    pub id: String,
    /// Phase description.
    #[serde(default)]
    pub description: Option<String>,
    /// Discount applied during the phase.
    #[serde(default)]
    pub discount: Option<Discount>,
    /// Phase length; `None` for the final open-ended phase.
    #[serde(default)]
    pub duration: Option<i64>,
    /// Unit of `duration`.
    #[serde(default)]
    pub duration_unit: Option<PhaseDurationUnit>,
    /// Maximum spend during the phase.
    #[serde(default)]
    pub maximum: Option<Maximum>,
    /// Maximum amount, as a decimal string.
    #[serde(default)]
    pub maximum_amount: Option<String>,
    /// Minimum spend during the phase.
    #[serde(default)]
    pub minimum: Option<Minimum>,
    /// Minimum amount, as a decimal string.
    #[serde(default)]
    pub minimum_amount: Option<String>,
    /// Phase name.
    pub name: String,
    /// Position of the phase, starting at 1.
    pub order: i64,
}

/// A plan: the template subscriptions are created from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Orb-assigned plan ID.
    pub id: String,
    /// Adjustments of the current version.
    pub adjustments: Vec<Adjustment>,
    /// Plan this one was derived from.
    #[serde(default)]
    pub base_plan: Option<BasePlan>,
    /// ID of the plan this one was derived from.
    #[serde(default)]
    pub base_plan_id: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Currency symbol or code.
    pub currency: String,
    /// Memo printed on invoices.
    #[serde(default)]
    pub default_invoice_memo: Option<String>,
    /// Plan description.
    pub description: String,
    /// Plan-level discount.
    #[serde(default)]
    pub discount: Option<Discount>,
    /// The caller's own plan ID.
    #[serde(default)]
    pub external_plan_id: Option<String>,
    /// ISO 4217 currency invoices are issued in.
    pub invoicing_currency: String,
    /// Plan-level maximum spend.
    #[serde(default)]
    pub maximum: Option<Maximum>,
    /// Maximum amount, as a decimal string.
    #[serde(default)]
    pub maximum_amount: Option<String>,
    /// User-defined metadata.
    #[serde(default)]
    pub metadata: Metadata,
    /// Plan-level minimum spend.
    #[serde(default)]
    pub minimum: Option<Minimum>,
    /// Minimum amount, as a decimal string.
    #[serde(default)]
    pub minimum_amount: Option<String>,
    /// Plan name.
    pub name: String,
    /// Days until an invoice is due.
    #[serde(default)]
    pub net_terms: Option<i64>,
    /// Phases, for phased plans.
    #[serde(default)]
    pub plan_phases: Option<Vec<PlanPhase>>,
    /// Prices of the current version.
    pub prices: Vec<Price>,
    /// Product the plan belongs to.
    pub product: PlanProduct,
    /// Lifecycle state.
    pub status: PlanStatus,
    /// Free trial configuration.
    pub trial_config: TrialConfig,
    /// Current version number.
    pub version: i64,
}

/// A phase as recorded on a plan version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanVersionPhase {
    /// Orb-assigned phase ID.
    pub id: String,
    /// Phase description.
    #[serde(default)]
    pub description: Option<String>,
    /// Phase length; `None` for the final open-ended phase.
    #[serde(default)]
    pub duration: Option<i64>,
    /// Unit of `duration`.
    #[serde(default)]
    pub duration_unit: Option<PhaseDurationUnit>,
    /// Phase name.
    pub name: String,
    /// Position of the phase, starting at 1.
    pub order: i64,
}

/// One version of a plan's prices and adjustments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanVersion {
    /// Adjustments in this version.
    pub adjustments: Vec<Adjustment>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Phases in this version.
    #[serde(default)]
    pub plan_phases: Option<Vec<PlanVersionPhase>>,
    /// Prices in this version.
    pub prices: Vec<Price>,
    /// Version number.
    pub version: i64,
}

/// A credit allocation granted as a price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAllocationPrice {
    /// Credits granted per cadence, as a decimal string.
    pub amount: String,
    /// Cadence of the grant.
    pub cadence: Cadence,
    /// Currency of the credits.
    pub currency: String,
    /// Whether the credits expire at the end of each cadence period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at_end_of_cadence: Option<bool>,
}

/// A price to add in a new plan version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddPrice {
    /// The price to add.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<NewPlanPrice>,
    /// A credit allocation to add.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocation_price: Option<NewAllocationPrice>,
    /// Phase the price is added to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_phase_order: Option<i64>,
}

impl AddPrice {
    /// Add `price` to the plan.
    #[must_use]
    pub fn new(price: NewPlanPrice) -> Self {
        Self {
            price: Some(price),
            allocation_price: None,
            plan_phase_order: None,
        }
    }
}

/// A price replacing an existing one in a new plan version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplacePrice {
    /// ID of the price being replaced.
    pub replaces_price_id: String,
    /// The replacement price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<NewPlanPrice>,
    /// A replacement credit allocation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocation_price: Option<NewAllocationPrice>,
    /// Phase the replacement applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_phase_order: Option<i64>,
}

/// A price removed in a new plan version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovePrice {
    /// ID of the price to remove.
    pub price_id: String,
    /// Phase the price is removed from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_phase_order: Option<i64>,
}

/// An adjustment to add in a new plan version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddAdjustment {
    /// The adjustment to add.
    pub adjustment: NewAdjustment,
    /// Phase the adjustment is added to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_phase_order: Option<i64>,
}

/// An adjustment replacing an existing one in a new plan version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaceAdjustment {
    /// The replacement adjustment.
    pub adjustment: NewAdjustment,
    /// ID of the adjustment being replaced.
    pub replaces_adjustment_id: String,
    /// Phase the replacement applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_phase_order: Option<i64>,
}

/// An adjustment removed in a new plan version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveAdjustment {
    /// ID of the adjustment to remove.
    pub adjustment_id: String,
    /// Phase the adjustment is removed from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_phase_order: Option<i64>,
}

validate_fields!(BasePlan {});
validate_fields!(PlanProduct {});
validate_fields!(TrialConfig { trial_period_unit });
validate_fields!(PlanPhase {
    discount,
    duration_unit,
    maximum,
    minimum,
});
validate_fields!(Plan {
    adjustments,
    base_plan,
    discount,
    maximum,
    minimum,
    plan_phases,
    prices,
    product,
    status,
    trial_config,
});
validate_fields!(PlanVersionPhase { duration_unit });
validate_fields!(PlanVersion {
    adjustments,
    plan_phases,
    prices,
});
validate_fields!(NewAllocationPrice { cadence });
validate_fields!(AddPrice {
    price,
    allocation_price,
});
validate_fields!(ReplacePrice {
    price,
    allocation_price,
});
validate_fields!(RemovePrice {});
validate_fields!(AddAdjustment { adjustment });
validate_fields!(ReplaceAdjustment { adjustment });
validate_fields!(RemoveAdjustment {});
