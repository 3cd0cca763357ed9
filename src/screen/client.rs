// The filter client — the caller-facing surface over invocation building,
// process execution, and verdict normalization.
//
// A client is immutable after construction: executable path, flag defaults,
// timeout and replacement text are captured once, so concurrent checks can
// share one client freely and no call can perturb another.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::debug;

use super::engine;
use super::invocation::{Invocation, InvocationDefaults};
use super::traits::ContentScreen;
use super::verdict::FilterResult;

/// Replacement shown for blocked content when the filter offers no
/// sanitized rendition of its own.
pub const DEFAULT_REPLACEMENT: &str = "[Content filtered for safety]";

/// How long one check may run before the process is killed.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for an external content-filter executable.
pub struct FilterClient {
    executable: PathBuf,
    defaults: InvocationDefaults,
    timeout: Duration,
    replacement: String,
}

impl FilterClient {
    /// Create a client for the filter at `executable`.
    ///
    /// The path is validated here, once — a missing executable is a
    /// configuration error and fails construction rather than surfacing
    /// on the first check.
    pub fn new(executable: impl Into<PathBuf>, defaults: InvocationDefaults) -> Result<Self> {
        let executable = executable.into();
        if !executable.exists() {
            anyhow::bail!(
                "filter executable not found at {}",
                executable.display()
            );
        }
        debug!(executable = %executable.display(), "filter client ready");
        Ok(Self {
            executable,
            defaults,
            timeout: DEFAULT_TIMEOUT,
            replacement: DEFAULT_REPLACEMENT.to_string(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = replacement.into();
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Check one text, blocking the calling thread until the filter exits
    /// or times out.
    pub fn check(&self, text: &str) -> FilterResult {
        let invocation = Invocation::new(text, &self.defaults);
        FilterResult::normalize(engine::run_blocking(
            &self.executable,
            &invocation,
            self.timeout,
        ))
    }

    /// Check one text without blocking. Dropping the returned future kills
    /// the spawned process, so an abandoned check never leaks.
    pub async fn check_async(&self, text: &str) -> FilterResult {
        let invocation = Invocation::new(text, &self.defaults);
        FilterResult::normalize(engine::run_async(&self.executable, &invocation, self.timeout).await)
    }

    /// Check and resolve to displayable text in one step (blocking).
    /// Blocked content and tool failures both yield the configured
    /// replacement — see [`FilterResult::resolve_text`] for the policy.
    pub fn filter_text(&self, text: &str) -> String {
        self.check(text).resolve_text(text, &self.replacement).to_string()
    }

    /// Async counterpart of [`filter_text`](Self::filter_text).
    pub async fn filter_text_async(&self, text: &str) -> String {
        self.check_async(text)
            .await
            .resolve_text(text, &self.replacement)
            .to_string()
    }

    /// Check many texts as independent concurrent calls, at most
    /// `concurrency` in flight at once. Results come back index-aligned
    /// with the input regardless of completion order; one item's tool
    /// failure leaves the others untouched.
    pub async fn check_batch(&self, texts: &[String], concurrency: usize) -> Vec<FilterResult> {
        let checks: Vec<_> = texts.iter().map(|text| self.check_async(text)).collect();
        stream::iter(checks)
            .buffered(concurrency.max(1))
            .collect()
            .await
    }
}

#[async_trait]
impl ContentScreen for FilterClient {
    async fn screen(&self, text: &str) -> FilterResult {
        self.check_async(text).await
    }

    async fn screen_batch(&self, texts: &[String]) -> Vec<FilterResult> {
        self.check_batch(texts, 8).await
    }
}
