//! Orb HTTP client implementation.

use std::time::Duration;

use futures::stream::{self, Stream, TryStreamExt};
use orb_core::{Page, Validate};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Url};
use serde_json::Value;

use crate::config::{ClientOptions, EnvConfig};
use crate::error::ClientError;
use crate::request::{Paginated, Params};
use crate::resources::{
    alerts::Alerts, credits::Credits, customers::Customers, events::Events, invoices::Invoices,
    plans::Plans, prices::Prices, subscriptions::Subscriptions,
};
use crate::retry::{with_retry, RetryConfig};

/// Orb API client.
///
/// Cheap to clone; clones share one connection pool. Each call is an
/// independent future, and dropping it aborts the request in flight.
#[derive(Debug, Clone)]
pub struct OrbClient {
    client: Client,
    base_url: String,
    api_key: String,
    options: ClientOptions,
}

impl OrbClient {
    /// Create a client for the production API.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(api_key, ClientOptions::default())
    }

    /// Create a client with custom options.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_options(
        api_key: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .user_agent(options.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            options,
        })
    }

    /// Create a client from `.secrets/orb.json` and `ORB_*` variables.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] when no API key is found.
    pub fn from_env() -> Result<Self, ClientError> {
        let EnvConfig { api_key, options } = EnvConfig::from_env()?;
        Self::with_options(api_key, options)
    }

    /// Base URL requests are sent under.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Options the client was built with.
    #[must_use]
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Plans and plan versions.
    #[must_use]
    pub fn plans(&self) -> Plans<'_> {
        Plans::new(self)
    }

    /// Prices.
    #[must_use]
    pub fn prices(&self) -> Prices<'_> {
        Prices::new(self)
    }

    /// Subscriptions.
    #[must_use]
    pub fn subscriptions(&self) -> Subscriptions<'_> {
        Subscriptions::new(self)
    }

    /// Invoices.
    #[must_use]
    pub fn invoices(&self) -> Invoices<'_> {
        Invoices::new(self)
    }

    /// Customers and balance transactions.
    #[must_use]
    pub fn customers(&self) -> Customers<'_> {
        Customers::new(self)
    }

    /// Customer credit blocks and ledgers.
    #[must_use]
    pub fn credits(&self) -> Credits<'_> {
        Credits::new(self)
    }

    /// Alerts.
    #[must_use]
    pub fn alerts(&self) -> Alerts<'_> {
        Alerts::new(self)
    }

    /// Events and backfills.
    #[must_use]
    pub fn events(&self) -> Events<'_> {
        Events::new(self)
    }

    /// Issue one request described by `params`.
    ///
    /// Missing required values fail here, before any I/O.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingArgument`] for unset required values,
    /// [`ClientError::Api`] for non-2xx responses, [`ClientError::Decode`]
    /// when the body does not match `P::Response`, and
    /// [`ClientError::Validation`] when response validation is enabled and
    /// fails.
    pub async fn execute<P: Params>(&self, params: &P) -> Result<P::Response, ClientError> {
        let url = params.url(&self.base_url)?;
        let body = params.body()?;
        let retry = RetryConfig::default().with_max_retries(self.options.max_retries);

        with_retry(&retry, || {
            self.send::<P::Response>(
                P::ROUTE.method.as_reqwest(),
                url.clone(),
                body.as_ref(),
                params.idempotency_key(),
            )
        })
        .await
    }

    /// Walk every page of a list endpoint, starting from `params`.
    ///
    /// The stream re-issues the list call with each `next_cursor` until the
    /// server reports no more pages.
    pub fn paginate<'a, P>(
        &'a self,
        params: P,
    ) -> impl Stream<Item = Result<P::Item, ClientError>> + 'a
    where
        P: Paginated + Params<Response = Page<<P as Paginated>::Item>> + 'a,
    {
        stream::try_unfold(Some(params), move |state| async move {
            let Some(mut params) = state else {
                return Ok::<_, ClientError>(None);
            };
            let page = self.execute(&params).await?;
            let next = match page.pagination_metadata.next_cursor {
                Some(ref cursor) if page.pagination_metadata.has_more => {
                    params.set_cursor(Some(cursor.clone()));
                    Some(params)
                }
                _ => None,
            };
            let items = stream::iter(page.data.into_iter().map(Ok::<_, ClientError>));
            Ok(Some((items, next)))
        })
        .try_flatten()
    }

    async fn send<T>(
        &self,
        method: reqwest::Method,
        url: Url,
        body: Option<&Value>,
        idempotency_key: Option<&str>,
    ) -> Result<T, ClientError>
    where
        T: serde::de::DeserializeOwned + Validate,
    {
        tracing::debug!(method = %method, path = url.path(), "sending request");

        let mut request = self.client.request(method, url).bearer_auth(&self.api_key);
        if let Some(key) = idempotency_key {
            request = request.header("Idempotency-Key", key);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T>(&self, response: reqwest::Response) -> Result<T, ClientError>
    where
        T: serde::de::DeserializeOwned + Validate,
    {
        let status = response.status();

        if !status.is_success() {
            let retry_after = retry_after(response.headers());
            let body = response.text().await?;
            tracing::debug!(status = status.as_u16(), "request failed");
            return Err(ClientError::api(status.as_u16(), body, retry_after));
        }

        let bytes = response.bytes().await?;
        let value = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            orb_core::from_slice::<Value>(&bytes).map_err(ClientError::Decode)?
        };
        let decoded: T = orb_core::from_value(value).map_err(ClientError::Decode)?;

        if self.options.response_validation {
            decoded.validate().map_err(ClientError::Validation)?;
        }
        Ok(decoded)
    }
}

/// Parse a `Retry-After` header given in seconds.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(Duration::from_secs_f64)
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    #[test]
    fn client_creation() {
        let client = OrbClient::new("test-api-key").unwrap();
        assert_eq!(client.base_url(), "https://api.withorb.com/v1");
    }

    #[test]
    fn client_trims_trailing_slash() {
        let options = ClientOptions::default().with_base_url("http://localhost:8080/v1/");
        let client = OrbClient::with_options("test-api-key", options).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/v1");
    }

    #[test]
    fn retry_after_seconds_are_parsed() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after(&headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static("2"));
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(2)));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(retry_after(&headers), None);
    }
}
