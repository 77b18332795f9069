//! Cart API client.
//!
//! # Architecture
//!
//! - JSON over HTTP with `reqwest`
//! - The server is the source of truth: every call returns a full
//!   [`CartSnapshot`] and nothing is cached between calls
//! - No retries and no client-side timeout; the caller decides what a failure
//!   means for the surface that triggered it
//!
//! # Endpoints
//!
//! - `GET /api/cart` - current snapshot
//! - `POST /api/cart/update` - `{item_id, quantity}`, snapshot or `{error}`
//! - `POST /api/cart/remove` - `{item_id}`, snapshot or `{error}`
//! - add-to-cart form action - form-encoded, any 2xx is success

pub mod types;

use std::future::Future;
use std::sync::Arc;

use acadshop_core::CartLineId;
use reqwest::header::{CONTENT_TYPE, COOKIE};
use tracing::{debug, instrument};
use url::Url;

use crate::config::CartClientConfig;
use crate::error::{CartError, Result};

pub use types::{
    AddToCartForm, CartLine, CartSnapshot, ProductRef, RemoveItemRequest, UpdateItemRequest,
};

const CART_PATH: &str = "/api/cart";
const UPDATE_PATH: &str = "/api/cart/update";
const REMOVE_PATH: &str = "/api/cart/remove";

/// Longest slice of a response body kept in logs and errors.
const BODY_EXCERPT_CHARS: usize = 200;

/// Remote cart operations.
///
/// [`CartApiClient`] is the HTTP implementation; the sync controller only
/// depends on this trait.
pub trait CartApi {
    /// Fetch the current cart.
    fn read_cart(&self) -> impl Future<Output = Result<CartSnapshot>>;

    /// Set a line's quantity. Callers route non-positive quantities to
    /// [`CartApi::remove_item`] instead.
    fn update_item(
        &self,
        item_id: CartLineId,
        quantity: u32,
    ) -> impl Future<Output = Result<CartSnapshot>>;

    /// Remove a line.
    fn remove_item(&self, item_id: CartLineId) -> impl Future<Output = Result<CartSnapshot>>;

    /// Submit the add-to-cart form to its declared action.
    fn submit_add_form(
        &self,
        action: &str,
        form: &AddToCartForm,
    ) -> impl Future<Output = Result<()>>;
}

// =============================================================================
// CartApiClient
// =============================================================================

/// HTTP client for the cart API.
#[derive(Clone)]
pub struct CartApiClient {
    inner: Arc<CartApiClientInner>,
}

struct CartApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cookie: Option<String>,
}

impl CartApiClient {
    /// Create a new cart API client.
    #[must_use]
    pub fn new(config: &CartClientConfig) -> Self {
        Self {
            inner: Arc::new(CartApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                cookie: config.cookie_header().map(str::to_string),
            }),
        }
    }

    /// Resolve a path (or absolute form action) against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| CartError::InvalidEndpoint(format!("{path}: {e}")))
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.inner.client.request(method, url);
        match &self.inner.cookie {
            Some(cookie) => builder.header(COOKIE, cookie),
            None => builder,
        }
    }

    /// POST a JSON body to a mutation endpoint and decode the answer.
    ///
    /// An `error` field wins over the HTTP status: the server reports stock
    /// and lookup failures as 4xx with a JSON body, and those must reach the
    /// user as business errors.
    async fn mutate<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<CartSnapshot> {
        let response = self
            .request(reqwest::Method::POST, self.endpoint(path)?)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if let Ok(serde_json::Value::Object(fields)) =
            serde_json::from_str::<serde_json::Value>(&text)
            && let Some(error) = fields.get("error").filter(|e| !e.is_null())
        {
            let message = error
                .as_str()
                .map_or_else(|| error.to_string(), str::to_string);
            debug!(path, %status, error = %message, "Cart API rejected mutation");
            return Err(CartError::Api(message));
        }

        if !status.is_success() {
            return Err(status_error(status, &text));
        }

        decode_snapshot(&text)
    }
}

impl CartApi for CartApiClient {
    #[instrument(skip(self))]
    async fn read_cart(&self) -> Result<CartSnapshot> {
        let response = self
            .request(reqwest::Method::GET, self.endpoint(CART_PATH)?)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(status_error(status, &text));
        }

        decode_snapshot(&text)
    }

    #[instrument(skip(self))]
    async fn update_item(&self, item_id: CartLineId, quantity: u32) -> Result<CartSnapshot> {
        self.mutate(UPDATE_PATH, &UpdateItemRequest { item_id, quantity }).await
    }

    #[instrument(skip(self))]
    async fn remove_item(&self, item_id: CartLineId) -> Result<CartSnapshot> {
        self.mutate(REMOVE_PATH, &RemoveItemRequest { item_id }).await
    }

    #[instrument(skip(self, form), fields(product_id = %form.product_id))]
    async fn submit_add_form(&self, action: &str, form: &AddToCartForm) -> Result<()> {
        let response = self
            .request(reqwest::Method::POST, self.endpoint(action)?)
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &text));
        }

        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

fn status_error(status: reqwest::StatusCode, body: &str) -> CartError {
    debug!(
        status = %status,
        body = %excerpt(body),
        "Cart API returned non-success status"
    );
    CartError::Status {
        status,
        body: excerpt(body),
    }
}

fn decode_snapshot(text: &str) -> Result<CartSnapshot> {
    serde_json::from_str(text).map_err(|e| {
        debug!(
            error = %e,
            body = %excerpt(text),
            "Failed to decode cart snapshot"
        );
        CartError::Decode(e)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> CartApiClient {
        CartApiClient::new(&CartClientConfig::new(Url::parse(base).unwrap()))
    }

    #[test]
    fn test_endpoint_joins_against_base() {
        let client = client("http://shop.local:5000/");
        assert_eq!(
            client.endpoint(UPDATE_PATH).unwrap().as_str(),
            "http://shop.local:5000/api/cart/update"
        );
        assert_eq!(
            client.endpoint("/carrinho/adicionar/3").unwrap().as_str(),
            "http://shop.local:5000/carrinho/adicionar/3"
        );
    }

    #[test]
    fn test_endpoint_keeps_absolute_action() {
        let client = client("http://shop.local:5000/");
        assert_eq!(
            client.endpoint("https://other.local/add").unwrap().as_str(),
            "https://other.local/add"
        );
    }

    #[test]
    fn test_decode_snapshot_rejects_wrong_shape() {
        let err = decode_snapshot(r#"{"items": "nope"}"#).unwrap_err();
        assert!(matches!(err, CartError::Decode(_)));
    }

    #[test]
    fn test_excerpt_truncates_long_bodies() {
        let body = "x".repeat(1000);
        assert_eq!(excerpt(&body).len(), BODY_EXCERPT_CHARS);
    }
}
