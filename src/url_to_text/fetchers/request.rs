use crate::config::FetchConfig;
use crate::error::PipelineError;
use crate::url_to_text::html::extract_text_from_html;
use log::debug;
use reqwest::Client;

/// Plain HTTP fetcher that presents itself as a desktop browser
pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| PipelineError::FetchError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// GET the page and return its raw HTML. No retries.
    pub async fn fetch(&self, url: &str) -> Result<String, PipelineError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::FetchError(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::FetchError(format!(
                "{url} returned status {status}"
            )));
        }

        response
            .text()
            .await
            .map_err(|e| PipelineError::FetchError(format!("{url}: {e}")))
    }

    /// Fetch the page and reduce it to readable text
    pub async fn fetch_text(&self, url: &str) -> Result<String, PipelineError> {
        let html = self.fetch(url).await?;
        let text = extract_text_from_html(&html);
        debug!("Fetched {} ({} bytes html, {} chars text)", url, html.len(), text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_fetch_text_sends_browser_user_agent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/recipe")
            .match_header("user-agent", mockito::Matcher::Regex("^Mozilla/5.0".into()))
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(
                "<html><body><nav>Home</nav><h1>Pancakes</h1>\n\n<p>Flour   and eggs</p></body></html>",
            )
            .create_async()
            .await;

        let fetcher = RequestFetcher::new(&FetchConfig::default()).unwrap();
        let text = fetcher
            .fetch_text(&format!("{}/recipe", server.url()))
            .await
            .unwrap();

        assert_eq!(text, "Pancakes Flour and eggs");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = RequestFetcher::new(&FetchConfig::default()).unwrap();
        let result = fetcher.fetch(&format!("{}/missing", server.url())).await;

        match result {
            Err(PipelineError::FetchError(msg)) => assert!(msg.contains("404")),
            other => panic!("expected FetchError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host() {
        let fetcher = RequestFetcher::new(&FetchConfig::default()).unwrap();
        let result = fetcher.fetch("http://127.0.0.1:1/recipe").await;
        assert!(matches!(result, Err(PipelineError::FetchError(_))));
    }
}
