use crate::types::{ArticleDraft, ArticleSource, Result};
use async_trait::async_trait;

/// A self-contained fetch-and-normalize routine for one external content source.
///
/// Implementations may fail as a whole; the aggregator logs the error and
/// carries on with the other adapters.
#[async_trait]
pub trait ArticleAdapter: Send + Sync {
    /// Origin tag stamped on every article this adapter produces
    fn source(&self) -> ArticleSource;

    /// Human-readable name for logs
    fn source_name(&self) -> String;

    /// Fetch the current articles. `limit_hint` is the page size the caller
    /// asked for, for sources that can size their query by it.
    async fn pull(&self, limit_hint: Option<usize>) -> Result<Vec<ArticleDraft>>;
}
