use std::time::Duration;

use acelab_domain::AcelabError;
use acelab_infra::config::env_bool;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// Filter comes from `RUST_LOG` (default `info`); `ACELAB_LOG_JSON`
/// switches to JSON lines. Calling twice is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if env_bool("ACELAB_LOG_JSON", false) {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Log the outcome of a route handler with structured fields.
///
/// `route` should be a stable identifier (e.g. `"google::connect"`), never
/// a raw path carrying ids or query strings.
#[inline]
pub fn log_request_outcome(route: &str, elapsed: Duration, error: Option<&AcelabError>) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match error {
        None => info!(route, duration_ms, "request_success"),
        Some(err) => {
            warn!(route, duration_ms, error_type = error_label(err), error = %err, "request_failure");
        }
    }
}

/// Convert an `AcelabError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &AcelabError) -> &'static str {
    match error {
        AcelabError::InvalidState(_) => "invalid_state",
        AcelabError::TokenExchange(_) => "token_exchange",
        AcelabError::NotConnected(_) => "not_connected",
        AcelabError::ReauthRequired(_) => "reauth_required",
        AcelabError::ProviderApi(_) => "provider_api",
        AcelabError::Database(_) => "database",
        AcelabError::Config(_) => "config",
        AcelabError::Network(_) => "network",
        AcelabError::Auth(_) => "auth",
        AcelabError::Security(_) => "security",
        AcelabError::NotFound(_) => "not_found",
        AcelabError::InvalidInput(_) => "invalid_input",
        AcelabError::Internal(_) => "internal",
    }
}
