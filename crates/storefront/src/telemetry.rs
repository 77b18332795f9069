//! Tracing and Sentry setup for binaries embedding the cart layer.

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{CartClientConfig, LogFormat};
use crate::error::REPORTED_TARGET;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "acadshop_storefront=info,acadshop_cli=info";

/// Initialize Sentry error tracking and return guard that must be kept alive.
#[must_use]
pub fn init_sentry(config: &CartClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    sentry_filter_for(metadata.level(), metadata.target())
}

/// Errors already captured by `CartError::report` stay breadcrumbs.
fn sentry_filter_for(level: &tracing::Level, target: &str) -> sentry_tracing::EventFilter {
    if target == REPORTED_TARGET {
        return sentry_tracing::EventFilter::Breadcrumb;
    }
    match *level {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Install the global tracing subscriber.
///
/// Sentry must already be initialized for its layer to forward anything.
pub fn init_tracing(config: &CartClientConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    // The Sentry layer is typed by the subscriber it wraps, so each format
    // builds its own.
    match config.log_format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .with(sentry_tracing::layer().event_filter(sentry_event_filter))
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .with(sentry_tracing::layer().event_filter(sentry_event_filter))
            .init(),
    }
}

/// Initialize Sentry, then tracing. Keep the returned guard alive for the
/// life of the process.
#[must_use]
pub fn init(config: &CartClientConfig) -> Option<sentry::ClientInitGuard> {
    let guard = init_sentry(config);
    init_tracing(config);
    guard
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sentry_tracing::EventFilter;
    use tracing::Level;
    use url::Url;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }

    #[test]
    fn test_reported_errors_are_breadcrumbs() {
        assert_eq!(
            sentry_filter_for(&Level::ERROR, REPORTED_TARGET).bits(),
            EventFilter::Breadcrumb.bits()
        );
        assert_eq!(
            sentry_filter_for(&Level::ERROR, "acadshop_storefront::sync").bits(),
            EventFilter::Event.bits()
        );
        assert_eq!(
            sentry_filter_for(&Level::INFO, "acadshop_storefront::error").bits(),
            EventFilter::Breadcrumb.bits()
        );
        assert_eq!(
            sentry_filter_for(&Level::TRACE, "acadshop_storefront::api").bits(),
            EventFilter::Ignore.bits()
        );
    }

    // The only test in this crate that installs the global subscriber.
    #[test]
    fn test_json_subscriber_installs() {
        let mut config = CartClientConfig::new(Url::parse("http://localhost:5000").unwrap());
        config.log_format = LogFormat::Json;

        init_tracing(&config);
        tracing::error!(target: REPORTED_TARGET, "json subscriber accepts events");
    }
}
