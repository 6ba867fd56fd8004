//! Shared HTTP plumbing for the provider clients.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use waypoint_core::error::ProviderError;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("waypoint/", env!("CARGO_PKG_VERSION"));

/// Build the client shared by every provider.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based. A user
/// agent is always sent; Nominatim rejects anonymous requests.
pub fn build_client(timeout: Duration) -> Result<Client, ProviderError> {
  Client::builder()
    .timeout(timeout)
    .user_agent(USER_AGENT)
    .build()
    .map_err(|e| ProviderError::Http(format!("failed to build HTTP client: {e}")))
}

/// Send `req` and decode a JSON body.
///
/// Query strings are stripped from URLs in errors so API keys stay out of
/// logs.
pub(crate) async fn get_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, ProviderError> {
  let resp = req.send().await.map_err(|e| ProviderError::Http(e.without_url().to_string()))?;

  let status = resp.status();
  if !status.is_success() {
    let mut url = resp.url().clone();
    url.set_query(None);
    return Err(ProviderError::Status { status: status.as_u16(), url: url.to_string() });
  }

  resp.json().await.map_err(|e| ProviderError::Decode(e.without_url().to_string()))
}

/// `base` with `segments` appended as path segments. Each segment is
/// percent-encoded, so user input cannot add segments or a query.
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> Result<Url, ProviderError> {
  let mut url =
    Url::parse(base).map_err(|e| ProviderError::Http(format!("invalid base url {base}: {e}")))?;
  url
    .path_segments_mut()
    .map_err(|()| ProviderError::Http(format!("base url {base} cannot take a path")))?
    .pop_if_empty()
    .extend(segments);
  Ok(url)
}

/// Trimmed, non-empty credential.
pub(crate) fn credential(key: Option<String>) -> Option<String> {
  key.map(|k| k.trim().to_owned()).filter(|k| !k.is_empty())
}

/// Serve `router` on an ephemeral local port and return its base URL.
#[cfg(test)]
pub(crate) async fn stub_server(router: axum::Router) -> String {
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
  format!("http://{addr}")
}
