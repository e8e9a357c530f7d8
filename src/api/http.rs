//! HTTP utilities for the studio REST backend

use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging customer data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.chars().count() > MAX_LOG_BODY_LENGTH {
        let head: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Failure talking to the backend, kept typed so callers can match on the
/// status code instead of the message text
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status
    #[error("API request failed: {0}")]
    Status(StatusCode),
    /// The request never got a complete answer
    #[error("Failed to send request: {0}")]
    Transport(#[source] reqwest::Error),
    /// The answer was not JSON
    #[error("Failed to parse response JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Thin reqwest wrapper that speaks JSON and turns non-2xx into errors
#[derive(Clone)]
pub struct ApiHttpClient {
    client: Client,
}

impl ApiHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("lenscraft/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// GET a JSON document
    pub async fn get(&self, url: &str, token: Option<&str>) -> Result<Value> {
        self.send(Method::GET, url, token, None).await
    }

    /// POST a JSON body
    pub async fn post(&self, url: &str, token: Option<&str>, body: &Value) -> Result<Value> {
        self.send(Method::POST, url, token, Some(body)).await
    }

    /// PUT a JSON body
    pub async fn put(&self, url: &str, token: Option<&str>, body: &Value) -> Result<Value> {
        self.send(Method::PUT, url, token, Some(body)).await
    }

    /// DELETE a resource
    pub async fn delete(&self, url: &str, token: Option<&str>) -> Result<Value> {
        self.send(Method::DELETE, url, token, None).await
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> Result<Value> {
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method, url);
        request = with_token(request, token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ApiError::Transport)?;

        let status = response.status();
        let response_body = response.text().await.map_err(ApiError::Transport)?;

        if !status.is_success() {
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&response_body));
            return Err(ApiError::Status(status).into());
        }

        // Handle empty response (204, or an empty 200 from PUT/DELETE)
        if response_body.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&response_body).map_err(ApiError::Decode)?)
    }
}

fn with_token(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) if !token.is_empty() => request.bearer_auth(token),
        _ => request,
    }
}

/// Format a backend error for the status bar
/// Keeps the message short and avoids echoing raw server bodies
pub fn format_api_error(error: &anyhow::Error) -> String {
    let api_error = error.chain().find_map(|e| e.downcast_ref::<ApiError>());

    match api_error {
        Some(ApiError::Status(status)) => match status.as_u16() {
            401 | 403 => {
                "Backend refused the request. Check the API token in config.json.".to_string()
            },
            404 => "Record not found on the server.".to_string(),
            409 => "Conflict: the record was changed on the server.".to_string(),
            429 => "Rate limit exceeded. Please try again later.".to_string(),
            400 | 422 => "The server rejected the data. Check the form fields.".to_string(),
            500..=599 => "Backend temporarily unavailable. Please try again.".to_string(),
            _ => format!("Backend answered {}", status),
        },
        Some(ApiError::Transport(e)) if e.is_timeout() => {
            "The backend took too long to answer.".to_string()
        },
        Some(ApiError::Transport(_)) => {
            "Could not reach the backend. Check your network connection.".to_string()
        },
        Some(ApiError::Decode(_)) => "The backend returned an unreadable response.".to_string(),
        None => short_message(&format!("{:#}", error)),
    }
}

fn short_message(error_str: &str) -> String {
    let sanitized = error_str
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(80)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{bearer_token, body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let out = sanitize_for_log(&body);
        assert!(out.starts_with(&"x".repeat(MAX_LOG_BODY_LENGTH)));
        assert!(out.contains("500 bytes total"));
    }

    #[test]
    fn test_format_api_error_maps_status_codes() {
        let err = anyhow::Error::from(ApiError::Status(StatusCode::NOT_FOUND));
        assert_eq!(format_api_error(&err), "Record not found on the server.");

        let err = anyhow::Error::from(ApiError::Status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(format_api_error(&err).contains("temporarily unavailable"));
    }

    #[test]
    fn test_format_api_error_sees_through_context() {
        let err = anyhow::Error::from(ApiError::Status(StatusCode::UNAUTHORIZED))
            .context("Failed to save booking");
        assert!(format_api_error(&err).contains("API token"));
    }

    #[test]
    fn test_status_digits_in_plain_messages_are_not_status_codes() {
        let err = anyhow::anyhow!("Invoice 500 has no customer");
        assert_eq!(format_api_error(&err), "Invoice 500 has no customer");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_not_reported_by_url_digits() {
        let client = ApiHttpClient::new().unwrap();
        // Nothing listens on port 1; the URL itself ends in a status-like number
        let err = client
            .get("http://127.0.0.1:1/api/Booking/500", None)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::Transport(_))
        ));
        assert_eq!(
            format_api_error(&err),
            "Could not reach the backend. Check your network connection."
        );
    }

    #[tokio::test]
    async fn test_get_sends_token_when_present() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/Contact"))
            .and(bearer_token("secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "1"}])))
            .mount(&server)
            .await;

        let client = ApiHttpClient::new().unwrap();
        let url = format!("{}/api/Contact", server.uri());
        let value = client.get(&url, Some("secret")).await.unwrap();

        assert_eq!(value[0]["id"], "1");
    }

    #[tokio::test]
    async fn test_put_with_empty_body_returns_null() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/Other/7"))
            .and(body_json(json!({"id": "7", "name": "Note"})))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = ApiHttpClient::new().unwrap();
        let url = format!("{}/api/Other/7", server.uri());
        let value = client
            .put(&url, None, &json!({"id": "7", "name": "Note"}))
            .await
            .unwrap();

        assert!(value.is_null());
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/Photo/9"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = ApiHttpClient::new().unwrap();
        let url = format!("{}/api/Photo/9", server.uri());
        let err = client.delete(&url, None).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::Status(StatusCode::INTERNAL_SERVER_ERROR))
        ));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_non_json_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/Photo"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = ApiHttpClient::new().unwrap();
        let url = format!("{}/api/Photo", server.uri());
        let err = client.get(&url, None).await.unwrap_err();

        assert_eq!(
            format_api_error(&err),
            "The backend returned an unreadable response."
        );
    }
}
