use crate::error::PipelineError;
use crate::url_to_text::RequestFetcher;
use log::debug;

/// Upper bound on page text handed to the model
const MAX_PAGE_CHARS: usize = 60_000;

/// Fetch a page and reduce it to text the model can read
pub async fn page_text(fetcher: &RequestFetcher, url: &str) -> Result<String, PipelineError> {
    let url = url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(PipelineError::InvalidInput(format!(
            "Not an http(s) URL: {url}"
        )));
    }

    let text = fetcher.fetch_text(url).await?;
    if text.is_empty() {
        return Err(PipelineError::FetchError(format!(
            "{url} contained no readable text"
        )));
    }

    Ok(truncate_chars(text, MAX_PAGE_CHARS))
}

fn truncate_chars(mut text: String, max: usize) -> String {
    if let Some((cut, _)) = text.char_indices().nth(max) {
        debug!("Truncating page text from {} to {} bytes", text.len(), cut);
        text.truncate(cut);
    }
    text
}
