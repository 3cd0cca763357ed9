// Content screening trait — the swap-ready abstraction.
//
// FilterClient implements this by shelling out to the external filter
// executable. An HTTP moderation API or an in-process model would be
// alternative implementations behind the same interface.

use async_trait::async_trait;

use super::verdict::FilterResult;

/// Trait for screening text content. Methods are async because the default
/// backend waits on an external process.
#[async_trait]
pub trait ContentScreen: Send + Sync {
    /// Screen a single text. Always produces exactly one FilterResult —
    /// backend failures surface as `ToolFailure`, never as a panic or a
    /// silently-unsafe verdict.
    async fn screen(&self, text: &str) -> FilterResult;

    /// Screen multiple texts, returning results index-aligned with the
    /// input. Default implementation screens sequentially — implementations
    /// can override to run checks concurrently.
    async fn screen_batch(&self, texts: &[String]) -> Vec<FilterResult> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.screen(text).await);
        }
        results
    }
}
