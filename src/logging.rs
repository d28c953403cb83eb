use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::filter::{EnvFilter, LevelFilter, Targets};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::es::ES_TRACE_TARGET;

pub const APP_LOG_PATH: &str = "demostat.log";
pub const ES_TRACE_LOG_PATH: &str = "tmp/es_trace.log";

/// Installs the two process-wide log streams: a timestamped application log
/// and a separate transport-trace log receiving only the search client's
/// request/response events. Called exactly once at startup.
pub fn init(verbose: bool) -> Result<()> {
    let app_log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(APP_LOG_PATH)
        .with_context(|| format!("Failed to open application log {}", APP_LOG_PATH))?;

    let trace_path = Path::new(ES_TRACE_LOG_PATH);
    if let Some(parent) = trace_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {:?}", parent))?;
    }
    let trace_log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(trace_path)
        .with_context(|| format!("Failed to open trace log {}", ES_TRACE_LOG_PATH))?;

    let timer = fmt::time::LocalTime::new(time::macros::format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ));

    let default_directives = if verbose {
        "debug,es_trace=off"
    } else {
        "info,es_trace=off"
    };
    let app_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    let app_layer = fmt::layer()
        .with_ansi(false)
        .with_timer(timer.clone())
        .with_writer(Mutex::new(app_log))
        .with_filter(app_filter);

    let trace_layer = fmt::layer()
        .with_ansi(false)
        .with_timer(timer)
        .with_writer(Mutex::new(trace_log))
        .with_filter(Targets::new().with_target(ES_TRACE_TARGET, LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(app_layer)
        .with(trace_layer)
        .init();

    Ok(())
}
