use crate::error::ProviderError;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;

static HTTP_CLIENT: OnceLock<Client> = OnceLock::new();

pub fn create_http_client() -> Client {
    HTTP_CLIENT.get_or_init(|| {
        Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(concat!("recommend/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new())
    }).clone()
}

/// One GET attempt decoded as JSON. Non-2xx statuses are errors so the
/// caller's retry policy treats them like transport failures.
pub fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, ProviderError> {
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status(status));
    }
    let body = response.text()?;
    serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))
}
