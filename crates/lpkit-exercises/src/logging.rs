//! Structured logging for the `lpkit` binary.
//!
//! `LPKIT_TRACE` holds an `EnvFilter` directive (default `off`),
//! `LPKIT_LOG_FORMAT` picks `pretty` or `json` and `LPKIT_LOG_FILE` adds an
//! append-only file sink next to stderr.

use std::env;
use std::error::Error;
use std::fs::{File, OpenOptions};
use std::io;

use tracing::Subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, Box<dyn Error>> {
        if value.eq_ignore_ascii_case("pretty") {
            Ok(LogFormat::Pretty)
        } else if value.eq_ignore_ascii_case("json") {
            Ok(LogFormat::Json)
        } else {
            Err(format!("Invalid LPKIT_LOG_FORMAT '{value}' (expected 'json' or 'pretty')").into())
        }
    }
}

fn open_log_file(path: &str) -> Result<File, Box<dyn Error>> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| format!("Failed to open log file '{path}': {err}").into())
}

fn build_filter(level: &str) -> Result<EnvFilter, Box<dyn Error>> {
    if level.eq_ignore_ascii_case("off") {
        Ok(EnvFilter::default().add_directive(LevelFilter::OFF.into()))
    } else {
        EnvFilter::try_new(level).map_err(|err| format!("Invalid LPKIT_TRACE filter: {err}").into())
    }
}

fn fmt_layer<S, W>(writer: W, format: LogFormat, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span> + 'static,
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi);
    match format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

/// Install the global subscriber from the environment.
///
/// `level` overrides `LPKIT_TRACE`. Returns `false` when a subscriber is
/// already installed.
pub fn init_logging(level: Option<&str>) -> Result<bool, Box<dyn Error>> {
    if tracing::dispatcher::has_been_set() {
        return Ok(false);
    }

    let level_value = level
        .map(str::to_string)
        .or_else(|| env::var("LPKIT_TRACE").ok())
        .unwrap_or_else(|| "off".to_string());
    let filter = build_filter(&level_value)?;
    let format = match env::var("LPKIT_LOG_FORMAT") {
        Ok(value) => LogFormat::parse(&value)?,
        Err(_) => LogFormat::Pretty,
    };
    let log_file = match env::var("LPKIT_LOG_FILE") {
        Ok(path) => Some(open_log_file(&path)?),
        Err(_) => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer(io::stderr, format, true))
        .with(log_file.map(|file| fmt_layer(file, format, false)))
        .try_init()
        .map_err(|err| format!("Failed to initialize logging: {err}"))?;

    Ok(true)
}
