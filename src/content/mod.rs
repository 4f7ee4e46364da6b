//! Content module - posts, projection, listing and post detail

mod detail;
mod listing;
mod post;
mod projection;
pub mod richtext;

pub use detail::{estimate_read_time, Adjacent, DetailAssembler, WORDS_PER_MINUTE};
pub use listing::ListingAggregator;
pub use post::{Banner, ContentBlock, Post};
pub use projection::project;
pub use richtext::RichTextBlock;

/// Custom type holding blog posts
pub const POST_TYPE: &str = "posts";
