// Invocation building — one pure argument-list construction shared by the
// blocking and concurrent execution paths.
//
// The external filter parses positionally-then-by-flag: the `check` verb and
// the text payload are positional, `--config` and `--mode` are appended only
// when set. The text is always a single argument value — no shell is
// involved anywhere, so quotes, semicolons and backticks in the payload are
// inert.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Filter strictness presets understood by the external executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Strict,
    Moderate,
    Loose,
}

impl FilterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::Strict => "strict",
            FilterMode::Moderate => "moderate",
            FilterMode::Loose => "loose",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(FilterMode::Strict),
            "moderate" => Ok(FilterMode::Moderate),
            "loose" => Ok(FilterMode::Loose),
            other => anyhow::bail!(
                "unknown filter mode '{other}' (expected strict, moderate, or loose)"
            ),
        }
    }
}

/// Per-client overrides captured once at construction and passed into every
/// invocation build. Immutable — there is no way to mutate these between
/// calls, so two checks against the same client always agree on flags.
#[derive(Debug, Clone, Default)]
pub struct InvocationDefaults {
    /// Path to an overlay config file, passed through opaquely via `--config`.
    /// The schema of that file is the executable's business, not ours.
    pub config_path: Option<PathBuf>,
    /// Strictness preset passed via `--mode`.
    pub mode: Option<FilterMode>,
}

/// The immutable description of one call to the external filter executable.
/// Built once per check, consumed by one execution attempt, then discarded.
#[derive(Debug, Clone)]
pub struct Invocation {
    text: String,
    defaults: InvocationDefaults,
}

impl Invocation {
    pub fn new(text: impl Into<String>, defaults: &InvocationDefaults) -> Self {
        Self {
            text: text.into(),
            defaults: defaults.clone(),
        }
    }

    /// The ordered argument vector for the executable. Order matters: the
    /// verb and text are positional, flags follow. An empty config path is
    /// treated the same as an absent one.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["check".to_string(), self.text.clone()];

        if let Some(config) = &self.defaults.config_path {
            if !config.as_os_str().is_empty() {
                args.push("--config".to_string());
                args.push(config.to_string_lossy().into_owned());
            }
        }
        if let Some(mode) = self.defaults.mode {
            args.push("--mode".to_string());
            args.push(mode.as_str().to_string());
        }

        args
    }
}
