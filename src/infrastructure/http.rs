//! Blocking HTTP implementation of [`Backend`].

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::domain::{ApiReply, ApiRequest, Method};
use crate::infrastructure::traits::{ApiError, Backend};

/// Talks to the REST backend at `base_url`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: Client,
}

impl HttpBackend {
    /// Build a client with `timeout` applied to every request.
    ///
    /// Fails when the TLS backend cannot be initialised.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mechtree/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport(format!("build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Join `path` onto the base URL with exactly one slash.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn build(&self, request: &ApiRequest, token: Option<&str>) -> RequestBuilder {
        let url = self.url_for(&request.path());
        let mut builder = match request.method() {
            Method::Get => self.client.get(&url),
            Method::Post => {
                let builder = self.client.post(&url);
                match request.body() {
                    Some(body) => builder.json(&body),
                    None => builder,
                }
            }
        };
        builder = builder.header(ACCEPT, "application/json");
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder
    }
}

impl Backend for HttpBackend {
    #[instrument(level = "debug", skip(self, request, token), fields(request = request.name()))]
    fn execute(&self, request: &ApiRequest, token: Option<&str>) -> Result<ApiReply, ApiError> {
        debug!(
            "{:?} {} (auth: {})",
            request.method(),
            request.path(),
            token.is_some()
        );
        let response = self
            .build(request, token)
            .send()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = error_detail(response);
            warn!("{} rejected: HTTP {}", request.name(), status.as_u16());
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let body: Value = response
            .json()
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        request
            .parse_reply(body)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Pull a readable message out of an error body.
///
/// FastAPI answers `{"detail": "..."}`, or a list of validation entries for 422.
fn error_detail(response: Response) -> Option<String> {
    let text = response.text().ok()?;
    parse_detail(&text)
}

pub(crate) fn parse_detail(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(obj)) => match obj.get("detail") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Array(items)) => {
                let msgs: Vec<String> = items
                    .iter()
                    .filter_map(|i| i.get("msg").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect();
                (!msgs.is_empty()).then(|| msgs.join("; "))
            }
            Some(other) => Some(other.to_string()),
            None => None,
        },
        Ok(_) => None,
        Err(_) => Some(trimmed.chars().take(200).collect()),
    }
}
