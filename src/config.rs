use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::screen::{client, FilterMode, InvocationDefaults};

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Only the
/// filter path has a meaningful default; the overlay config and mode are
/// passed through to the executable only when set.
pub struct Config {
    /// Path to the filter executable (FIREBREAK_FILTER, default ./ai-filter).
    pub filter_path: PathBuf,
    /// Optional overlay config file handed to the filter via --config.
    /// Opaque to us — its schema belongs to the executable.
    pub config_path: Option<PathBuf>,
    /// Optional strictness preset (FIREBREAK_MODE: strict/moderate/loose).
    pub mode: Option<FilterMode>,
    /// Per-check timeout (FIREBREAK_TIMEOUT_SECS, default 5).
    pub timeout: Duration,
    /// Replacement text for blocked content (FIREBREAK_REPLACEMENT).
    pub replacement: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let filter_path = env::var("FIREBREAK_FILTER")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./ai-filter"));

        let config_path = env::var("FIREBREAK_CONFIG").ok().map(PathBuf::from);

        let mode = match env::var("FIREBREAK_MODE") {
            Ok(raw) => Some(
                raw.parse::<FilterMode>()
                    .context("invalid FIREBREAK_MODE")?,
            ),
            Err(_) => None,
        };

        let timeout = match env::var("FIREBREAK_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw
                    .parse()
                    .context("invalid FIREBREAK_TIMEOUT_SECS (expected whole seconds)")?;
                Duration::from_secs(secs)
            }
            Err(_) => client::DEFAULT_TIMEOUT,
        };

        let replacement = env::var("FIREBREAK_REPLACEMENT")
            .unwrap_or_else(|_| client::DEFAULT_REPLACEMENT.to_string());

        Ok(Self {
            filter_path,
            config_path,
            mode,
            timeout,
            replacement,
        })
    }

    /// The invocation defaults this configuration implies.
    pub fn invocation_defaults(&self) -> InvocationDefaults {
        InvocationDefaults {
            config_path: self.config_path.clone(),
            mode: self.mode,
        }
    }
}
