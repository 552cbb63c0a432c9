//! Shape-probing unions for fields that accept more than one scalar shape.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::enums::string_enum;
use crate::error::{ModelError, UnionError};
use crate::union::{probe, Candidate};
use crate::validate::Validate;

string_enum! {
    /// A date expressed relative to the current billing cycle.
    pub enum BillingCycleRelativeDate {
        /// Start of the current billing term.
        StartOfTerm = "start_of_term",
        /// End of the current billing term.
        EndOfTerm = "end_of_term",
    }
}

/// A calendar date or a full timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrDateTime {
    /// An RFC 3339 timestamp.
    DateTime(DateTime<Utc>),
    /// A calendar date (`YYYY-MM-DD`).
    Date(NaiveDate),
}

impl DateOrDateTime {
    /// Decode by trying a timestamp first, then a date.
    ///
    /// # Errors
    ///
    /// Returns [`UnionError::NoVariantMatched`] when neither shape fits.
    pub fn decode(value: &Value) -> Result<Self, UnionError> {
        let candidates: [Candidate<Self>; 2] = [
            ("date_time", |value| timestamp(value).map(Self::DateTime)),
            ("date", |value| date(value).map(Self::Date)),
        ];
        probe("DateOrDateTime", value, &candidates)
    }
}

impl From<NaiveDate> for DateOrDateTime {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<DateTime<Utc>> for DateOrDateTime {
    fn from(timestamp: DateTime<Utc>) -> Self {
        Self::DateTime(timestamp)
    }
}

impl Serialize for DateOrDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::DateTime(timestamp) => timestamp.serialize(serializer),
            Self::Date(date) => date.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for DateOrDateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::decode(&value).map_err(serde::de::Error::custom)
    }
}

impl Validate for DateOrDateTime {
    fn validate(&self) -> Result<(), ModelError> {
        Ok(())
    }
}

/// A timestamp or a date relative to the billing cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateTimeOrRelative {
    /// An RFC 3339 timestamp.
    DateTime(DateTime<Utc>),
    /// A billing-cycle relative date.
    Relative(BillingCycleRelativeDate),
}

impl DateTimeOrRelative {
    /// Decode by trying a timestamp first, then a relative date.
    ///
    /// # Errors
    ///
    /// Returns [`UnionError::NoVariantMatched`] when neither shape fits.
    pub fn decode(value: &Value) -> Result<Self, UnionError> {
        let candidates: [Candidate<Self>; 2] = [
            ("date_time", |value| timestamp(value).map(Self::DateTime)),
            ("billing_cycle_relative", |value| {
                relative_date(value).map(Self::Relative)
            }),
        ];
        probe("DateTimeOrRelative", value, &candidates)
    }
}

impl From<DateTime<Utc>> for DateTimeOrRelative {
    fn from(timestamp: DateTime<Utc>) -> Self {
        Self::DateTime(timestamp)
    }
}

impl From<BillingCycleRelativeDate> for DateTimeOrRelative {
    fn from(relative: BillingCycleRelativeDate) -> Self {
        Self::Relative(relative)
    }
}

impl Serialize for DateTimeOrRelative {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::DateTime(timestamp) => timestamp.serialize(serializer),
            Self::Relative(relative) => relative.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for DateTimeOrRelative {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::decode(&value).map_err(serde::de::Error::custom)
    }
}

impl Validate for DateTimeOrRelative {
    fn validate(&self) -> Result<(), ModelError> {
        match self {
            Self::DateTime(_) => Ok(()),
            Self::Relative(relative) => relative.validate(),
        }
    }
}

/// One value of a grouping key in a price evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupingValue {
    /// A string value.
    String(String),
    /// A numeric value.
    Number(f64),
    /// A boolean value.
    Bool(bool),
}

impl GroupingValue {
    /// Decode by trying string, number, then boolean.
    ///
    /// # Errors
    ///
    /// Returns [`UnionError::NoVariantMatched`] for any other JSON value.
    pub fn decode(value: &Value) -> Result<Self, UnionError> {
        let candidates: [Candidate<Self>; 3] = [
            ("string", |value| {
                value
                    .as_str()
                    .map(|s| Self::String(s.to_owned()))
                    .ok_or_else(|| format!("expected a string, got {value}"))
            }),
            ("number", |value| {
                value
                    .as_f64()
                    .map(Self::Number)
                    .ok_or_else(|| format!("expected a number, got {value}"))
            }),
            ("bool", |value| {
                value
                    .as_bool()
                    .map(Self::Bool)
                    .ok_or_else(|| format!("expected a boolean, got {value}"))
            }),
        ];
        probe("GroupingValue", value, &candidates)
    }
}

impl Serialize for GroupingValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl<'de> Deserialize<'de> for GroupingValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::decode(&value).map_err(serde::de::Error::custom)
    }
}

impl Validate for GroupingValue {
    fn validate(&self) -> Result<(), ModelError> {
        Ok(())
    }
}

fn timestamp(value: &Value) -> Result<DateTime<Utc>, String> {
    DateTime::<Utc>::deserialize(value).map_err(|e| e.to_string())
}

fn date(value: &Value) -> Result<NaiveDate, String> {
    NaiveDate::deserialize(value).map_err(|e| e.to_string())
}

// The relative enum decodes any string, so an unknown value counts as a
// failed attempt.
fn relative_date(value: &Value) -> Result<BillingCycleRelativeDate, String> {
    let relative = BillingCycleRelativeDate::deserialize(value).map_err(|e| e.to_string())?;
    relative.validate().map_err(|e| e.to_string())?;
    Ok(relative)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn timestamp_wins_over_date() {
        let value = DateOrDateTime::decode(&json!("2024-03-01T12:00:00Z")).unwrap();
        assert_eq!(
            value,
            DateOrDateTime::DateTime(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn bare_date_falls_through_to_date() {
        let value = DateOrDateTime::decode(&json!("2024-03-01")).unwrap();
        assert_eq!(
            value,
            DateOrDateTime::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );
        assert_eq!(serde_json::to_value(value).unwrap(), json!("2024-03-01"));
    }

    #[test]
    fn neither_shape_lists_both_attempts() {
        match DateOrDateTime::decode(&json!("yesterday")).unwrap_err() {
            UnionError::NoVariantMatched { union, attempts } => {
                assert_eq!(union, "DateOrDateTime");
                assert_eq!(attempts.len(), 2);
                assert!(attempts[0].starts_with("date_time:"));
                assert!(attempts[1].starts_with("date:"));
            }
            other => panic!("expected NoVariantMatched, got {other:?}"),
        }
    }

    #[test]
    fn relative_dates_must_be_known() {
        let value = DateTimeOrRelative::decode(&json!("end_of_term")).unwrap();
        assert_eq!(
            value,
            DateTimeOrRelative::Relative(BillingCycleRelativeDate::EndOfTerm)
        );

        // Structurally a string, but not a known relative date.
        let err = DateTimeOrRelative::decode(&json!("middle_of_term")).unwrap_err();
        match err {
            UnionError::NoVariantMatched { attempts, .. } => {
                assert!(attempts[1].contains("middle_of_term"));
            }
            other => panic!("expected NoVariantMatched, got {other:?}"),
        }
    }

    #[test]
    fn grouping_values_probe_in_order() {
        assert_eq!(
            GroupingValue::decode(&json!("us-east")).unwrap(),
            GroupingValue::String("us-east".into())
        );
        assert_eq!(
            GroupingValue::decode(&json!(2)).unwrap(),
            GroupingValue::Number(2.0)
        );
        assert_eq!(
            GroupingValue::decode(&json!(true)).unwrap(),
            GroupingValue::Bool(true)
        );
        assert!(GroupingValue::decode(&json!(null)).is_err());
    }
}
