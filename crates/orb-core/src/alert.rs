//! Alerts on usage, cost and credit balances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::string_enum;
use crate::shared::{CustomerMinified, IdRef};
use crate::validate::validate_fields;

string_enum! {
    /// What an alert watches.
    pub enum AlertType {
        /// Usage crossed a threshold.
        UsageExceeded = "usage_exceeded",
        /// Cost crossed a threshold.
        CostExceeded = "cost_exceeded",
        /// Credit balance reached zero.
        CreditBalanceDepleted = "credit_balance_depleted",
        /// Credit balance fell below a threshold.
        CreditBalanceDropped = "credit_balance_dropped",
        /// Credit balance rose above zero again.
        CreditBalanceRecovered = "credit_balance_recovered",
    }
}

/// A value that triggers an alert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    /// The threshold value.
    pub value: f64,
}

/// The plan an alert is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertPlan {
    /// Orb-assigned plan ID.
    #[serde(default)]
    pub id: Option<String>,
    /// The caller's own plan ID.
    #[serde(default)]
    pub external_plan_id: Option<String>,
    /// Plan name.
    #[serde(default)]
    pub name: Option<String>,
    /// Plan version.
    pub plan_version: String,
}

/// An alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Orb-assigned alert ID.
    pub id: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Currency watched, for cost and credit alerts.
    #[serde(default)]
    pub currency: Option<String>,
    /// Customer the alert is scoped to.
    #[serde(default)]
    pub customer: Option<CustomerMinified>,
    /// Whether the alert fires.
    pub enabled: bool,
    /// Metric watched, for usage alerts.
    #[serde(default)]
    pub metric: Option<IdRef>,
    /// Plan the alert is scoped to.
    #[serde(default)]
    pub plan: Option<AlertPlan>,
    /// Subscription the alert is scoped to.
    #[serde(default)]
    pub subscription: Option<IdRef>,
    /// Trigger values.
    #[serde(default)]
    pub thresholds: Option<Vec<Threshold>>,
    /// What the alert watches.
    #[serde(rename = "type")]
    pub kind: AlertType,
}

validate_fields!(Threshold {});
validate_fields!(AlertPlan {});
validate_fields!(Alert {
    customer,
    metric,
    plan,
    subscription,
    thresholds,
    kind,
});

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validate::Validate;

    #[test]
    fn decodes_alert_with_thresholds() {
        let alert: Alert = serde_json::from_value(json!({
            "id": "al_1",
            "created_at": "2024-01-01T00:00:00Z",
            "currency": "USD",
            "customer": {"id": "cus_1", "external_customer_id": "acme"},
            "enabled": true,
            "metric": null,
            "plan": null,
            "subscription": null,
            "thresholds": [{"value": 100.0}],
            "type": "cost_exceeded"
        }))
        .unwrap();
        assert_eq!(alert.kind, AlertType::CostExceeded);
        assert_eq!(alert.thresholds.as_deref(), Some(&[Threshold { value: 100.0 }][..]));
        assert!(alert.validate().is_ok());
    }

    #[test]
    fn unknown_alert_type_decodes_leniently() {
        let alert: Alert = serde_json::from_value(json!({
            "id": "al_1",
            "created_at": "2024-01-01T00:00:00Z",
            "enabled": false,
            "type": "latency_exceeded"
        }))
        .unwrap();
        assert_eq!(alert.kind.as_str(), "latency_exceeded");
        assert!(alert.validate().is_err());
    }
}
