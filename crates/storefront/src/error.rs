//! Cart error taxonomy with Sentry integration.
//!
//! Every failure a cart operation can hit is one of three kinds: the request
//! never produced a usable response (network), the response was not a cart
//! (decode), or the server refused the change (API). All of them are terminal
//! for the action that triggered them; nothing is retried.

use reqwest::StatusCode;
use thiserror::Error;

/// Target of the log line written after an error was captured to Sentry.
///
/// The Sentry tracing layer keeps events on this target as breadcrumbs so a
/// failure is reported once.
pub const REPORTED_TARGET: &str = "acadshop_storefront::reported";

/// Error type for cart API calls and surface rendering.
#[derive(Debug, Error)]
pub enum CartError {
    /// HTTP request failed at the transport level.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request URL could not be built from the base URL.
    #[error("Invalid endpoint {0}")]
    InvalidEndpoint(String),

    /// Server answered with a non-success status and no business error.
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Response body was not a well-formed cart payload.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Server reported a business error (e.g. insufficient stock).
    #[error("API error: {0}")]
    Api(String),

    /// A surface template failed to render.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Coarse classification of a [`CartError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Decode,
    Api,
    Render,
}

impl CartError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(_) | Self::InvalidEndpoint(_) | Self::Status { .. } => ErrorKind::Network,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Api(_) => ErrorKind::Api,
            Self::Template(_) => ErrorKind::Render,
        }
    }

    /// Text shown to the user when this error ends an action.
    ///
    /// Business errors carry the server's own wording; everything else falls
    /// back to the action-specific message.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api(message) => format!("Erro: {message}"),
            _ => fallback.to_string(),
        }
    }

    /// Log the error and, for anything other than a business error, capture
    /// it to Sentry.
    ///
    /// Business errors are expected outcomes (stock, unknown line) and only
    /// leave a breadcrumb.
    pub fn report(&self, action: &str) {
        if matches!(self, Self::Api(_)) {
            tracing::info!(action, error = %self, "Cart action rejected by server");
            return;
        }

        let event_id = sentry::capture_error(self);
        tracing::error!(
            target: REPORTED_TARGET,
            action,
            error = %self,
            sentry_event_id = %event_id,
            "Cart action failed"
        );
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of cart
/// actions leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Quantity changed", Some(&[("item_id", "7")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
