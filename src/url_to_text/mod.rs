//! Content Fetcher: URL in, cleaned page text out.

pub mod fetchers;
pub mod html;

pub use fetchers::RequestFetcher;
pub use html::extract_text_from_html;
