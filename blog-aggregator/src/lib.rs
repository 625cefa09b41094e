pub mod aggregator;
pub mod fallback;
pub mod fetcher;
pub mod parser;
pub mod rss_utils;
pub mod sources;
pub mod traits;
pub mod types;

pub use aggregator::Aggregator;
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use traits::ArticleAdapter;
pub use types::*;
