use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::api_endpoint;
use crate::error::ServiceError;

const RESULT_KEY: &str = "result";
const ARTIST_KEY: &str = "artist";
const ERROR_KEY: &str = "error";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request error: {0}")]
    RequestError(reqwest::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::RequestError(err)
    }
}

/// Response whose body already decoded as JSON.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub reason: String,
    pub body: Value,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, uri: &str) -> Result<RawResponse, TransportError>;
}

/// Transport over one long-lived reqwest connection pool.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, uri: &str) -> Result<RawResponse, TransportError> {
        let resp = self
            .client
            .get(api_endpoint!(self.base_url, "{uri}"))
            .send()
            .await?;
        let status = resp.status();
        log::info!(
            "Received {} - {} from {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
            uri
        );
        let body = resp.json::<Value>().await?;
        Ok(RawResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            body,
        })
    }
}

pub struct UpstreamClient {
    transport: Box<dyn Transport>,
}

impl UpstreamClient {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    /// GETs `uri` and unwraps the `result` envelope.
    pub async fn fetch(&self, uri: &str, not_found_message: &str) -> Result<Value, ServiceError> {
        log::info!("Fetching data from {} ...", uri);
        match self.transport.get(uri).await {
            Ok(response) => classify(uri, response, not_found_message),
            Err(err) => {
                let message = format!("Downloading JSON from {uri} failed");
                log::warn!("{}: {}", message, err);
                Err(ServiceError::internal(message))
            }
        }
    }

    /// Like [`fetch`](Self::fetch), but also requires an `artist` object and
    /// maps the HTTP 200 `{"artist": {"error": ...}}` reply to not found.
    pub async fn fetch_artist_data(
        &self,
        uri: &str,
        not_found_message: &str,
    ) -> Result<Value, ServiceError> {
        let result = self.fetch(uri, not_found_message).await?;
        let artist = match result.get(ARTIST_KEY) {
            Some(artist) if !artist.is_null() => artist,
            _ => {
                let message = format!("Response from {uri} does not contain key \"{ARTIST_KEY}\"");
                log::warn!("{}", message);
                return Err(ServiceError::internal(message));
            }
        };
        if artist.get(ERROR_KEY).map_or(false, is_truthy) {
            log::info!("Artist from {} not found", uri);
            return Err(ServiceError::not_found(not_found_message));
        }
        Ok(result)
    }
}

/// Maps one decoded upstream response onto the success / not found / internal split.
pub fn classify(
    uri: &str,
    response: RawResponse,
    not_found_message: &str,
) -> Result<Value, ServiceError> {
    let status = response.status;
    match status {
        200..=299 => {
            let RawResponse { body, .. } = response;
            match body {
                Value::Object(mut map) => match map.remove(RESULT_KEY) {
                    Some(result) if is_truthy(&result) => Ok(result),
                    _ => Err(missing_result(uri)),
                },
                _ => Err(missing_result(uri)),
            }
        }
        400..=499 => {
            log::info!("{} answered {}: {}", uri, status, not_found_message);
            Err(ServiceError::not_found(not_found_message))
        }
        status => {
            let message = format!(
                "Yandex Music API returned \"{} - {}\" from {}",
                status, response.reason, uri
            );
            log::warn!("{}", message);
            Err(ServiceError::internal(message))
        }
    }
}

fn missing_result(uri: &str) -> ServiceError {
    let message = format!("Key \"{RESULT_KEY}\" not found in response from {uri}");
    log::warn!("{}", message);
    ServiceError::internal(message)
}

/// Emptiness check used for upstream markers: null, false, zero, "" and
/// empty containers do not count.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{serve_once, FakeUpstream};
    use serde_json::json;

    fn response(status: u16, body: Value) -> RawResponse {
        RawResponse {
            status,
            reason: "Whatever".to_string(),
            body,
        }
    }

    #[test]
    fn success_unwraps_result() {
        let result = classify("/x", response(200, json!({"result": {"a": 1}})), "nope");
        assert_eq!(result, Ok(json!({"a": 1})));
    }

    #[test]
    fn success_without_result_is_internal() {
        for body in [json!({}), json!({"result": null}), json!({"result": {}}), json!([1])] {
            let result = classify("/x", response(204, body), "nope");
            assert!(matches!(result, Err(ServiceError::Internal(_))));
        }
    }

    #[test]
    fn client_errors_are_not_found_with_caller_message() {
        for status in [400, 404, 499] {
            let result = classify("/x", response(status, json!({"error": "x"})), "Artist 1 not found");
            assert_eq!(result, Err(ServiceError::not_found("Artist 1 not found")));
        }
    }

    #[test]
    fn other_statuses_are_internal_with_status_and_reason() {
        let result = classify("/x", response(503, json!({})), "nope");
        match result {
            Err(ServiceError::Internal(message)) => {
                assert!(message.contains("503"));
                assert!(message.contains("Whatever"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            classify("/x", response(302, json!({})), "nope"),
            Err(ServiceError::Internal(_))
        ));
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!([])));
        assert!(is_truthy(&json!("not-found")));
        assert!(is_truthy(&json!({"k": null})));
    }

    #[tokio::test]
    async fn transport_failure_is_internal() {
        let upstream = FakeUpstream::new().failing("/artists/1");
        let client = UpstreamClient::new(upstream);
        let result = client.fetch("/artists/1", "nope").await;
        assert_eq!(
            result,
            Err(ServiceError::internal("Downloading JSON from /artists/1 failed"))
        );
    }

    #[tokio::test]
    async fn artist_data_requires_artist_key() {
        let upstream = FakeUpstream::new().respond("/artists/1", 200, json!({"result": {"x": 1}}));
        let client = UpstreamClient::new(upstream);
        let result = client.fetch_artist_data("/artists/1", "nope").await;
        assert!(matches!(result, Err(ServiceError::Internal(_))));
    }

    #[tokio::test]
    async fn artist_with_error_marker_is_not_found() {
        let upstream = FakeUpstream::new().respond(
            "/artists/1",
            200,
            json!({"result": {"artist": {"error": "not-found"}}}),
        );
        let client = UpstreamClient::new(upstream);
        let result = client.fetch_artist_data("/artists/1", "Artist 1 not found").await;
        assert_eq!(result, Err(ServiceError::not_found("Artist 1 not found")));
    }

    #[tokio::test]
    async fn artist_with_empty_error_marker_passes() {
        let upstream = FakeUpstream::new().respond(
            "/artists/1",
            200,
            json!({"result": {"artist": {"id": 1, "name": "A", "error": ""}}}),
        );
        let client = UpstreamClient::new(upstream);
        let result = client.fetch_artist_data("/artists/1", "nope").await.unwrap();
        assert_eq!(result["artist"]["name"], "A");
    }

    #[tokio::test]
    async fn http_transport_joins_base_and_unwraps_envelope() {
        let (base_url, requests) = serve_once(
            "200 OK",
            "application/json",
            r#"{"result": {"artist": {}}}"#,
        );
        let transport = HttpTransport::new(base_url, Duration::from_secs(5)).unwrap();
        let client = UpstreamClient::new(transport);
        let result = client.fetch("/artists/41191", "nope").await;
        assert_eq!(result, Ok(json!({"artist": {}})));
        assert_eq!(requests.recv().unwrap(), "GET /artists/41191 HTTP/1.1");
    }

    #[tokio::test]
    async fn http_transport_non_json_404_is_internal() {
        let (base_url, _requests) = serve_once(
            "404 Not Found",
            "text/html",
            "<html><body>Not Found</body></html>",
        );
        let transport = HttpTransport::new(base_url, Duration::from_secs(5)).unwrap();
        let client = UpstreamClient::new(transport);
        let result = client.fetch("/albums/1", "Album 1 not found").await;
        assert_eq!(
            result,
            Err(ServiceError::internal("Downloading JSON from /albums/1 failed"))
        );
    }

    #[tokio::test]
    async fn http_transport_keeps_reason_phrase() {
        let (base_url, _requests) = serve_once("503 Service Unavailable", "application/json", "{}");
        let transport = HttpTransport::new(base_url, Duration::from_secs(5)).unwrap();
        let response = transport.get("/artists/1").await.unwrap();
        assert_eq!(response.status, 503);
        assert_eq!(response.reason, "Service Unavailable");
        assert_eq!(response.body, json!({}));
    }
}
