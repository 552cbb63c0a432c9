//! Route table entries and the `Params` trait every endpoint implements.
//!
//! A params value holds everything one request needs. Required values are
//! checked lazily: building a params value never fails, and a missing
//! required value surfaces as [`ClientError::MissingArgument`] when the URL
//! or body is asked for.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use orb_core::Validate;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ClientError;

/// HTTP method of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl Method {
    /// The matching `reqwest` method.
    #[must_use]
    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        })
    }
}

/// One entry of the route table: a method and a path template.
///
/// Templates name their placeholders, as in `/plans/{plan_id}/versions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// HTTP method.
    pub method: Method,
    /// Path template, relative to the base URL.
    pub path: &'static str,
}

impl Route {
    /// A `GET` route.
    #[must_use]
    pub const fn get(path: &'static str) -> Self {
        Self {
            method: Method::Get,
            path,
        }
    }

    /// A `POST` route.
    #[must_use]
    pub const fn post(path: &'static str) -> Self {
        Self {
            method: Method::Post,
            path,
        }
    }

    /// A `PUT` route.
    #[must_use]
    pub const fn put(path: &'static str) -> Self {
        Self {
            method: Method::Put,
            path,
        }
    }

    /// A `PATCH` route.
    #[must_use]
    pub const fn patch(path: &'static str) -> Self {
        Self {
            method: Method::Patch,
            path,
        }
    }

    /// A `DELETE` route.
    #[must_use]
    pub const fn delete(path: &'static str) -> Self {
        Self {
            method: Method::Delete,
            path,
        }
    }

    /// Build the request URL under `base`.
    ///
    /// Each `{name}` placeholder is replaced by the matching value from
    /// `path_params` as one percent-encoded segment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingArgument`] for a placeholder with no
    /// value and [`ClientError::InvalidUrl`] for an unusable base URL.
    pub fn url(&self, base: &str, path_params: &[(&'static str, String)]) -> Result<Url, ClientError> {
        let mut url = Url::parse(base).map_err(|e| ClientError::InvalidUrl(format!("{base}: {e}")))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ClientError::InvalidUrl(format!("{base}: cannot be a base")))?;
            segments.pop_if_empty();
            for segment in self.path.split('/').filter(|s| !s.is_empty()) {
                match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) => {
                        let value = path_params
                            .iter()
                            .find(|(key, _)| *key == name)
                            .map(|(_, value)| value.as_str())
                            .ok_or(ClientError::MissingArgument { name })?;
                        segments.push(value);
                    }
                    None => {
                        segments.push(segment);
                    }
                }
            }
        }
        Ok(url)
    }
}

/// Everything needed to issue one request.
pub trait Params {
    /// Decoded response type.
    type Response: DeserializeOwned + Validate;

    /// Method and path template.
    const ROUTE: Route;

    /// Values for the path placeholders.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingArgument`] when a required value is
    /// unset.
    fn path_params(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        Ok(Vec::new())
    }

    /// Query string pairs.
    fn query(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// JSON body, for routes that send one.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingArgument`] when a required value is
    /// unset.
    fn body(&self) -> Result<Option<serde_json::Value>, ClientError> {
        Ok(None)
    }

    /// Value of the `Idempotency-Key` header.
    fn idempotency_key(&self) -> Option<&str> {
        None
    }

    /// Full request URL under `base`, query string included.
    ///
    /// # Errors
    ///
    /// Fails when a required path value is unset or the base URL is unusable.
    fn url(&self, base: &str) -> Result<Url, ClientError> {
        let mut url = Self::ROUTE.url(base, &self.path_params()?)?;
        let query = self.query();
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

/// A list endpoint that can be walked page by page.
///
/// Implementors answer with `orb_core::Page<Self::Item>`.
pub trait Paginated: Params {
    /// Item type of each page.
    type Item: DeserializeOwned + Validate;

    /// Set the cursor the next request starts from.
    fn set_cursor(&mut self, cursor: Option<String>);
}

/// Read a required value.
///
/// # Errors
///
/// Returns [`ClientError::MissingArgument`] naming the value when unset.
pub fn required<'a, T>(value: &'a Option<T>, name: &'static str) -> Result<&'a T, ClientError> {
    value.as_ref().ok_or(ClientError::MissingArgument { name })
}

/// Serialize a body after its required fields have been checked.
pub(crate) fn json_body<T: Serialize>(body: &T) -> Result<Option<serde_json::Value>, ClientError> {
    Ok(Some(serde_json::to_value(body)?))
}

/// A fresh random value for the `Idempotency-Key` header.
#[must_use]
pub fn new_idempotency_key() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Format a timestamp the way the API expects in query strings.
pub(crate) fn query_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Cursor and page size shared by every list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorParams {
    /// Cursor returned by the previous page.
    pub cursor: Option<String>,
    /// Page size.
    pub limit: Option<u32>,
}

impl CursorParams {
    /// Append `cursor` and `limit` when set.
    pub fn push_query(&self, out: &mut Vec<(String, String)>) {
        if let Some(cursor) = &self.cursor {
            out.push(("cursor".to_string(), cursor.clone()));
        }
        if let Some(limit) = self.limit {
            out.push(("limit".to_string(), limit.to_string()));
        }
    }
}

/// Range filter on a timestamp field, rendered as `field[gt]` and friends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeRange {
    /// Strictly after.
    pub gt: Option<DateTime<Utc>>,
    /// At or after.
    pub gte: Option<DateTime<Utc>>,
    /// Strictly before.
    pub lt: Option<DateTime<Utc>>,
    /// At or before.
    pub lte: Option<DateTime<Utc>>,
}

impl TimeRange {
    /// Append the set bounds under `field`.
    pub fn push_query(&self, field: &str, out: &mut Vec<(String, String)>) {
        let bounds = [
            ("gt", &self.gt),
            ("gte", &self.gte),
            ("lt", &self.lt),
            ("lte", &self.lte),
        ];
        for (op, bound) in bounds {
            if let Some(timestamp) = bound {
                out.push((format!("{field}[{op}]"), query_timestamp(timestamp)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_route_substitutes_and_encodes() {
        let route = Route::get("/plans/external_plan_id/{external_plan_id}/versions");
        let url = route
            .url(
                "https://api.withorb.com/v1",
                &[("external_plan_id", "pro plan/2024".to_string())],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.withorb.com/v1/plans/external_plan_id/pro%20plan%2F2024/versions"
        );
    }

    #[test]
    fn test_route_tolerates_trailing_slash_on_base() {
        let url = Route::get("/plans").url("http://localhost:8080/v1/", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v1/plans");
    }

    #[test]
    fn test_missing_placeholder_names_it() {
        let err = Route::get("/plans/{plan_id}").url("http://localhost", &[]).unwrap_err();
        assert!(matches!(err, ClientError::MissingArgument { name: "plan_id" }));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = Route::get("/plans").url("not a url", &[]).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_idempotency_keys_are_unique() {
        let first = new_idempotency_key();
        assert_eq!(first.len(), 36);
        assert_ne!(first, new_idempotency_key());
    }

    #[test]
    fn test_time_range_renders_brackets() {
        let range = TimeRange {
            gte: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            lt: Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
            ..TimeRange::default()
        };
        let mut query = Vec::new();
        range.push_query("created_at", &mut query);
        assert_eq!(
            query,
            vec![
                ("created_at[gte]".to_string(), "2024-01-01T00:00:00Z".to_string()),
                ("created_at[lt]".to_string(), "2024-02-01T00:00:00Z".to_string()),
            ]
        );
    }

    #[test]
    fn test_required_reports_name() {
        let value: Option<String> = None;
        let err = required(&value, "price_id").unwrap_err();
        assert_eq!(err.to_string(), "missing required argument: price_id");
    }
}
