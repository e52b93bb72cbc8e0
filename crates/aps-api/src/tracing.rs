//! Log output for the study planner service
//!
//! Events carry structured fields that the handlers attach (`request_id`,
//! `user_id`, `lesson_id`, `plan_status`). How they are rendered depends on
//! the deployment environment.

use tracing_subscriber::{
    EnvFilter, Layer, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt,
    util::TryInitError,
};

use crate::config::Environment;

/// Filter used when `RUST_LOG` is unset
///
/// Development logs the service crates at `debug`. Production keeps
/// everything at `info`. Query logging from `sqlx` stays at `warn` in both,
/// since every plan build issues several statements.
pub fn default_directives(env: &Environment) -> &'static str {
    match env {
        Environment::Development => "info,aps_api=debug,aps_db=debug,aps_plan=debug,tower_http=debug,sqlx=warn",
        Environment::Production => "info,tower_http=info,sqlx=warn",
    }
}

/// Build the event filter
///
/// # Arguments
/// * `env` - Selects the fallback directives
/// * `override_directives` - Value of `RUST_LOG`, if set. Wins over the fallback.
pub fn build_filter(env: &Environment, override_directives: Option<&str>) -> EnvFilter {
    match override_directives {
        Some(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::new(default_directives(env)),
    }
}

/// Install the global subscriber
///
/// Development renders pretty multi-line events with file and line. Production
/// writes one flattened JSON object per event, with the enclosing request span
/// included so `request_id` lands on every line.
///
/// Fails if a global subscriber was already set.
pub fn init_tracing(env: &Environment) -> Result<(), TryInitError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = build_filter(env, rust_log.as_deref());

    tracing_subscriber::registry()
        .with(output_layer(env).with_filter(filter))
        .try_init()?;

    tracing::info!(environment = ?env, "Logging initialized");
    Ok(())
}

fn output_layer<S>(env: &Environment) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    match env {
        Environment::Development => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .boxed(),
        Environment::Production => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .boxed(),
    }
}
