pub mod devto;
pub mod hashnode;
pub mod medium;
pub mod rss_feed;

pub use devto::DevToSource;
pub use hashnode::HashnodeSource;
pub use medium::{medium_profile, MediumSource};
pub use rss_feed::{FeedProfile, RssFeedSource};
