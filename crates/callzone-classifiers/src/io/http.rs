use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{CallzoneError, Result};

const USER_AGENT: &str = concat!("callzone/", env!("CARGO_PKG_VERSION"));

pub fn http_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| CallzoneError::Config(format!("failed to build http client: {}", e)))
}

/// GET `url` with `query` and return the body. Transport errors and
/// non-success statuses are reported as an unreachable provider.
pub fn get_text(client: &Client, url: &str, query: &[(&str, String)]) -> Result<String> {
    let unreachable = |reason: String| CallzoneError::ProviderUnreachable {
        url: url.to_string(),
        reason,
    };

    log::trace!("GET {} {:?}", url, query);
    let response = client
        .get(url)
        .query(query)
        .send()
        .map_err(|e| unreachable(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(unreachable(format!("HTTP {}", status)));
    }

    response.text().map_err(|e| unreachable(e.to_string()))
}
