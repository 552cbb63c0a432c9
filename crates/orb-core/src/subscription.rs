//! Subscriptions and their price and adjustment intervals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adjustment::Adjustment;
use crate::customer::Customer;
use crate::dates::DateTimeOrRelative;
use crate::enums::string_enum;
use crate::new_price::NewFloatingPrice;
use crate::plan::Plan;
use crate::price::Price;
use crate::shared::Metadata;
use crate::validate::validate_fields;

string_enum! {
    /// Lifecycle state of a subscription.
    pub enum SubscriptionStatus {
        /// Currently billing.
        Active = "active",
        /// Past its end date.
        Ended = "ended",
        /// Starts in the future.
        Upcoming = "upcoming",
    }
}

string_enum! {
    /// When a cancellation takes effect.
    pub enum CancelOption {
        /// At the end of the current term.
        EndOfSubscriptionTerm = "end_of_subscription_term",
        /// Right away.
        Immediate = "immediate",
        /// On the date given in the request.
        RequestedDate = "requested_date",
    }
}

/// Day of month (and optionally month and year) billing periods start on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingCycleAnchorConfiguration {
    /// Day of the month, 1 to 31.
    pub day: i64,
    /// Month of the year, for cycles longer than a month.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<i64>,
    /// Year, for cycles longer than a year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
}

/// One entry in a fixed fee quantity schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedFeeQuantitySchedule {
    /// Price the quantity applies to.
    pub price_id: String,
    /// Quantity billed.
    pub quantity: f64,
    /// Start of the entry.
    pub start_date: DateTime<Utc>,
    /// End of the entry; `None` when open-ended.
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

/// A scheduled change of a fixed fee quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedFeeQuantityTransition {
    /// When the new quantity takes effect.
    pub effective_date: DateTime<Utc>,
    /// Price the quantity applies to.
    pub price_id: String,
    /// New quantity.
    pub quantity: i64,
}

/// A price active on a subscription for a span of time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceInterval {
    /// Orb-assigned interval ID.
    pub id: String,
    /// Day of the month the interval bills on.
    pub billing_cycle_day: i64,
    /// End of the current billing period.
    #[serde(default)]
    pub current_billing_period_end_date: Option<DateTime<Utc>>,
    /// Start of the current billing period.
    #[serde(default)]
    pub current_billing_period_start_date: Option<DateTime<Utc>>,
    /// End of the interval; `None` when open-ended.
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    /// Event filter restricting which usage is billed.
    #[serde(default)]
    pub filter: Option<String>,
    /// Scheduled quantity changes.
    #[serde(default)]
    pub fixed_fee_quantity_transitions: Option<Vec<FixedFeeQuantityTransition>>,
    /// The price billed during the interval.
    pub price: Price,
    /// Start of the interval.
    pub start_date: DateTime<Utc>,
    /// Customers whose usage counts toward this interval.
    #[serde(default)]
    pub usage_customer_ids: Option<Vec<String>>,
}

/// An adjustment active on a subscription for a span of time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentInterval {
    /// Orb-assigned interval ID.
    pub id: String,
    /// The adjustment applied.
    pub adjustment: Adjustment,
    /// Price intervals the adjustment applies to.
    pub applies_to_price_interval_ids: Vec<String>,
    /// Start of the interval.
    pub start_date: DateTime<Utc>,
    /// End of the interval; `None` when open-ended.
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

/// Trial state of a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialInfo {
    /// End of the trial, if one is running.
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

/// A customer's subscription to a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Orb-assigned subscription ID.
    pub id: String,
    /// Current plan phase, for phased plans.
    #[serde(default)]
    pub active_plan_phase_order: Option<i64>,
    /// Adjustments over time.
    pub adjustment_intervals: Vec<AdjustmentInterval>,
    /// Whether invoices are charged automatically.
    #[serde(default)]
    pub auto_collection: Option<bool>,
    /// Anchor of the billing cycle.
    pub billing_cycle_anchor_configuration: BillingCycleAnchorConfiguration,
    /// Day of the month billing periods start on.
    pub billing_cycle_day: i64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// End of the current billing period.
    #[serde(default)]
    pub current_billing_period_end_date: Option<DateTime<Utc>>,
    /// Start of the current billing period.
    #[serde(default)]
    pub current_billing_period_start_date: Option<DateTime<Utc>>,
    /// The subscribed customer.
    pub customer: Customer,
    /// Memo printed on invoices.
    #[serde(default)]
    pub default_invoice_memo: Option<String>,
    /// End of the subscription; `None` when open-ended.
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    /// Fixed fee quantities over time.
    pub fixed_fee_quantity_schedule: Vec<FixedFeeQuantitySchedule>,
    /// Amount that triggers an early invoice.
    #[serde(default)]
    pub invoicing_threshold: Option<String>,
    /// User-defined metadata.
    #[serde(default)]
    pub metadata: Metadata,
    /// Days until an invoice is due.
    pub net_terms: i64,
    /// The plan subscribed to.
    pub plan: Plan,
    /// Prices over time.
    pub price_intervals: Vec<PriceInterval>,
    /// Start of the subscription.
    pub start_date: DateTime<Utc>,
    /// Lifecycle state.
    pub status: SubscriptionStatus,
    /// Trial state.
    pub trial_info: TrialInfo,
}

/// A price interval to add to a subscription.
///
/// Exactly one of `price_id` and `price` should be set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddPriceInterval {
    /// Start of the interval.
    pub start_date: DateTimeOrRelative,
    /// End of the interval; open-ended when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTimeOrRelative>,
    /// An existing price to bill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_id: Option<String>,
    /// An existing price to bill, by external ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_price_id: Option<String>,
    /// A new price to create and bill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<NewFloatingPrice>,
    /// Event filter restricting which usage is billed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl AddPriceInterval {
    /// Bill an existing price from `start_date` onwards.
    pub fn for_price(price_id: impl Into<String>, start_date: DateTimeOrRelative) -> Self {
        Self {
            start_date,
            end_date: None,
            price_id: Some(price_id.into()),
            external_price_id: None,
            price: None,
            filter: None,
        }
    }
}

/// A change to an existing price interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditPriceInterval {
    /// Interval to edit.
    pub price_interval_id: String,
    /// New start of the interval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTimeOrRelative>,
    /// New end of the interval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTimeOrRelative>,
    /// New event filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

validate_fields!(BillingCycleAnchorConfiguration {});
validate_fields!(FixedFeeQuantitySchedule {});
validate_fields!(FixedFeeQuantityTransition {});
validate_fields!(PriceInterval { price });
validate_fields!(AdjustmentInterval { adjustment });
validate_fields!(TrialInfo {});
validate_fields!(Subscription {
    adjustment_intervals,
    billing_cycle_anchor_configuration,
    customer,
    fixed_fee_quantity_schedule,
    plan,
    price_intervals,
    status,
    trial_info,
});
validate_fields!(AddPriceInterval {
    start_date,
    end_date,
    price,
});
validate_fields!(EditPriceInterval {
    start_date,
    end_date,
});

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::dates::BillingCycleRelativeDate;

    #[test]
    fn add_interval_accepts_relative_dates() {
        let add = AddPriceInterval::for_price(
            "price_1",
            BillingCycleRelativeDate::StartOfTerm.into(),
        );
        assert_eq!(
            serde_json::to_value(&add).unwrap(),
            json!({"start_date": "start_of_term", "price_id": "price_1"})
        );
    }

    #[test]
    fn edit_interval_decodes_timestamps() {
        let edit: EditPriceInterval = serde_json::from_value(json!({
            "price_interval_id": "pi_1",
            "end_date": "2024-06-30T00:00:00Z"
        }))
        .unwrap();
        assert!(matches!(edit.end_date, Some(DateTimeOrRelative::DateTime(_))));
        assert!(edit.start_date.is_none());
    }

    #[test]
    fn cancel_option_wire_values() {
        assert_eq!(
            serde_json::to_value(CancelOption::EndOfSubscriptionTerm).unwrap(),
            json!("end_of_subscription_term")
        );
    }
}
