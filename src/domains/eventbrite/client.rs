//! Eventbrite REST client.
//!
//! One call is one outbound GET request: no retries and no caching. The
//! provider's rate limits are the caller's concern.

use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::{GatewayError, GatewayResult};
use crate::core::config::EventbriteConfig;

/// Query parameters for a gateway call. `None` values are left out of the URL.
pub type Query<'a> = [(&'a str, Option<&'a str>)];

/// Authenticated access to the ticketing provider.
#[async_trait]
pub trait EventGateway: Send + Sync {
    /// Issue a GET against `path` (relative to the API base) and return the
    /// parsed JSON body verbatim.
    async fn call(&self, path: &str, query: &Query<'_>) -> GatewayResult<Value>;
}

/// Build the request URL from the API base, a path and optional query pairs.
///
/// The path is appended to the base verbatim, so `/events/123/` keeps its
/// trailing slash as Eventbrite expects. Paths carrying a query, a fragment
/// or dot segments are refused so the result always stays under the base.
pub fn build_url(api_base: &str, path: &str, query: &Query<'_>) -> GatewayResult<Url> {
    if !is_plain_path(path) {
        return Err(GatewayError::InvalidUrl(format!("unsafe request path {:?}", path)));
    }

    let mut url = Url::parse(&format!("{}{}", api_base.trim_end_matches('/'), path))
        .map_err(|e| GatewayError::InvalidUrl(e.to_string()))?;

    let pairs: Vec<(&str, &str)> = query
        .iter()
        .filter_map(|(key, value)| value.map(|v| (*key, v)))
        .collect();

    if !pairs.is_empty() {
        let encoded = serde_urlencoded::to_string(&pairs)
            .map_err(|e| GatewayError::InvalidUrl(e.to_string()))?;
        let query = match url.query() {
            Some(existing) if !existing.is_empty() => format!("{}&{}", existing, encoded),
            _ => encoded,
        };
        url.set_query(Some(&query));
    }

    Ok(url)
}

fn is_plain_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.contains(['?', '#', '\\'])
        && path.split('/').all(|segment| {
            let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
            decoded != "." && decoded != ".."
        })
}

/// Gateway backed by the Eventbrite v3 REST API.
#[derive(Clone)]
pub struct EventbriteClient {
    http: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl EventbriteClient {
    /// Create a client from the Eventbrite configuration.
    pub fn new(config: &EventbriteConfig) -> Self {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    /// Create a client reusing an existing reqwest client.
    pub fn with_http_client(http: reqwest::Client, config: &EventbriteConfig) -> Self {
        Self {
            http,
            api_base: config.api_base.clone(),
            token: config.token.clone(),
        }
    }
}

/// Custom Debug implementation to keep the bearer token out of logs.
impl std::fmt::Debug for EventbriteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventbriteClient")
            .field("api_base", &self.api_base)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[async_trait]
impl EventGateway for EventbriteClient {
    async fn call(&self, path: &str, query: &Query<'_>) -> GatewayResult<Value> {
        let token = self
            .token
            .as_deref()
            .ok_or(GatewayError::Configuration("EVENTBRITE_TOKEN"))?;

        let url = build_url(&self.api_base, path, query)?;
        debug!("GET {}", url);

        let response = self.http.get(url).bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Eventbrite answered {} for {}", status, path);
            return Err(GatewayError::upstream(status, body));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};
    use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(api_base: &str, token: Option<&str>) -> EventbriteConfig {
        EventbriteConfig {
            api_base: api_base.to_string(),
            token: token.map(str::to_string),
            organization_id: Some("org-1".to_string()),
        }
    }

    #[test]
    fn test_build_url_skips_absent_values() {
        let url = build_url(
            "https://www.eventbriteapi.com/v3",
            "/organizations/42/events/",
            &[("status", Some("live")), ("page", None)],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.eventbriteapi.com/v3/organizations/42/events/?status=live"
        );
    }

    #[test]
    fn test_build_url_without_query() {
        let url = build_url("https://www.eventbriteapi.com/v3/", "/events/7/", &[]).unwrap();
        assert_eq!(url.as_str(), "https://www.eventbriteapi.com/v3/events/7/");
        assert!(url.query().is_none());
    }

    #[test]
    fn test_build_url_encodes_values() {
        let url = build_url("http://localhost", "/search/", &[("q", Some("a b&c"))]).unwrap();
        assert_eq!(url.query(), Some("q=a+b%26c"));
    }

    #[test]
    fn test_build_url_refuses_escaping_paths() {
        let base = "https://www.eventbriteapi.com/v3";
        for path in [
            "/events/1/../../users/me/",
            "/events/%2E%2E/users/me/",
            "/events/1/?expand=x",
            "/events/1/#x",
            "/events/./1/",
            "events/1/",
        ] {
            let result = build_url(base, path, &[]);
            assert!(matches!(result, Err(GatewayError::InvalidUrl(_))), "{path}");
        }
    }

    #[test]
    fn test_build_url_invalid_base() {
        let result = build_url("not a url", "/events/1/", &[]);
        assert!(matches!(result, Err(GatewayError::InvalidUrl(_))));
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = EventbriteClient::new(&config("http://localhost", Some("secret-token")));
        let debug_str = format!("{:?}", client);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("secret-token"));
    }

    #[tokio::test]
    async fn test_call_sends_bearer_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/organizations/org-1/events/"))
            .and(header("authorization", "Bearer tok"))
            .and(query_param("status", "live"))
            .and(query_param_is_missing("page"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "events": [{ "id": "1" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = EventbriteClient::new(&config(&server.uri(), Some("tok")));
        let body = assert_ok!(
            client
                .call(
                    "/organizations/org-1/events/",
                    &[("status", Some("live")), ("page", None)],
                )
                .await
        );
        assert_eq!(body["events"][0]["id"], "1");
    }

    #[tokio::test]
    async fn test_call_without_token_never_hits_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = EventbriteClient::new(&config(&server.uri(), None));
        let err = assert_err!(client.call("/events/1/", &[]).await);
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_call_maps_non_success_to_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events/missing/"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
            .mount(&server)
            .await;

        let client = EventbriteClient::new(&config(&server.uri(), Some("tok")));
        match client.call("/events/missing/", &[]).await {
            Err(GatewayError::Upstream {
                status,
                status_text,
                body,
            }) => {
                assert_eq!(status, 404);
                assert_eq!(status_text, "Not Found");
                assert_eq!(body, "not here");
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_call_rejects_non_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = EventbriteClient::new(&config(&server.uri(), Some("tok")));
        let err = assert_err!(client.call("/events/1/", &[]).await);
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[tokio::test]
    async fn test_call_unreachable_host_is_transport_error() {
        let client = EventbriteClient::new(&config("http://127.0.0.1:1", Some("tok")));
        let err = assert_err!(client.call("/events/1/", &[]).await);
        assert!(matches!(err, GatewayError::Transport(_)));
    }
}
