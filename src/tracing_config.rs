//! Tracing configuration for debugging override resolution.
//!
//! Output format is controlled by `OSPREY_LOG_FORMAT`:
//!
//! - `text` (default): standard `tracing-subscriber` flat output
//! - `json`: one JSON object per event
//!
//! ```bash
//! OSPREY_LOG=debug cargo test
//! OSPREY_LOG="osprey_compiler::passes::overrides=trace" OSPREY_LOG_FORMAT=json cargo test
//! ```
//!
//! The subscriber is only installed when `OSPREY_LOG` (or `RUST_LOG`) is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Flat text lines (default).
    Text,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a format name. Unknown names fall back to [`LogFormat::Text`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("OSPREY_LOG_FORMAT").unwrap_or_default())
    }
}

/// Build an `EnvFilter` from `OSPREY_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    match std::env::var("OSPREY_LOG") {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install the global tracing subscriber.
///
/// Does nothing when neither `OSPREY_LOG` nor `RUST_LOG` is set. Calling it
/// again, or after another subscriber was installed, is harmless. Output
/// goes to stderr.
pub fn init_tracing() {
    if std::env::var_os("OSPREY_LOG").is_none() && std::env::var_os("RUST_LOG").is_none() {
        return;
    }

    let filter = build_filter();

    // A subscriber may already be set (tests, embedding applications)
    let _ = match LogFormat::from_env() {
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).try_init()
        }
        LogFormat::Text => {
            let text_layer = fmt::layer().with_writer(std::io::stderr);
            Registry::default().with(filter).with(text_layer).try_init()
        }
    };
}
