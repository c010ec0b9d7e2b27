use crate::{Result, ScrapeError};
use scraper::Html;
use std::io::Read;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36";
const REQUEST_TIMEOUT_SECS: u64 = 25;

/// Builds the shared blocking agent used for every request in a run.
pub fn build_agent() -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(Some(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .user_agent(DEFAULT_USER_AGENT);
    config.build().into()
}

/// Fetches `url` and parses the body as an HTML document. Transport errors
/// and non-2xx statuses propagate; this layer never retries.
pub fn fetch_html(agent: &ureq::Agent, url: &str) -> Result<Html> {
    let bytes = fetch_bytes(agent, url)?;
    let html = String::from_utf8_lossy(&bytes).into_owned();
    Ok(Html::parse_document(&html))
}

/// Fetches `url` and returns the raw response body.
pub fn fetch_bytes(agent: &ureq::Agent, url: &str) -> Result<Vec<u8>> {
    let mut response = agent.get(url).call().map_err(|err| ScrapeError::Transport {
        url: url.to_string(),
        source: Box::new(err),
    })?;

    let status = response.status().as_u16();
    if !(200..300).contains(&status) {
        return Err(ScrapeError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }

    let mut body = Vec::new();
    response.body_mut().as_reader().read_to_end(&mut body)?;
    Ok(body)
}
