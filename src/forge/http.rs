//! forge::http
//!
//! Paged JSON client shared by the hosting providers.
//!
//! # Design
//!
//! The client is auth-agnostic. Each provider configures a [`Transport`]
//! (base URL, basic/bearer credentials) plus the per-provider quirks as data:
//! extra query parameters (GitLab's `private_token`), the page parameter name,
//! and the field that wraps result lists (Bitbucket's `values`).
//!
//! `get` returns a lazy [`Pages`] iterator: exactly one request per pull,
//! stopping at the first empty page. Nothing is retried.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::StatusCode;
use serde_json::Value;

use super::traits::ForgeError;

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "releasegate-cli";

/// HTTP method used by the paged client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One request as seen by a [`Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path appended to the transport's base URL
    pub path: String,
    /// Query parameters in insertion order
    pub query: Vec<(String, String)>,
    /// JSON body (POST only)
    pub body: Option<Value>,
}

/// Sends one request and decodes the JSON response.
///
/// Implemented by [`HttpTransport`] for real traffic and by test fakes.
pub trait Transport {
    /// Send the request and return the decoded JSON body.
    ///
    /// # Errors
    ///
    /// - `Transport` for network failures and non-JSON bodies
    /// - `AuthFailed` / `NotFound` / `RateLimited` / `ApiError` for error statuses
    fn send(&self, request: &ApiRequest) -> Result<Value, ForgeError>;
}

/// Credentials attached by [`HttpTransport`].
#[derive(Clone, Default)]
pub enum Credentials {
    /// No credentials
    #[default]
    None,
    /// `user:password` basic auth, the equivalent of credentials in the URL
    Basic { username: String, password: String },
    /// `Authorization: Bearer <token>`
    Bearer(String),
}

// Custom Debug to avoid exposing secrets
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::None => write!(f, "None"),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            Credentials::Bearer(_) => write!(f, "Bearer(..)"),
        }
    }
}

/// Blocking reqwest transport against a fixed base URL.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    api_base: String,
    credentials: Credentials,
}

impl HttpTransport {
    /// Create a transport for `api_base` (e.g. `https://api.github.com`).
    pub fn new(api_base: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Get the API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn build(&self, request: &ApiRequest) -> RequestBuilder {
        let url = format!("{}{}", self.api_base, request.path);
        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };

        let builder = builder
            .header(USER_AGENT, USER_AGENT_VALUE)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .query(&request.query);

        let builder = match &self.credentials {
            Credentials::None => builder,
            Credentials::Basic { username, password } => {
                builder.basic_auth(username, Some(password))
            }
            Credentials::Bearer(token) => builder.bearer_auth(token),
        };

        match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        }
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<Value, ForgeError> {
        let response = self
            .build(request)
            .send()
            .map_err(|e| ForgeError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| ForgeError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(error_for_status(status, &text));
        }

        serde_json::from_str(&text).map_err(|e| {
            ForgeError::Transport(format!("response from {} is not JSON: {}", request.path, e))
        })
    }
}

/// Map a non-success status to a `ForgeError`.
fn error_for_status(status: StatusCode, body: &str) -> ForgeError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("message")
                .or_else(|| json.get("error"))
                .map(|m| match m {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
        })
        .unwrap_or_else(|| "Unknown error".to_string());

    match status {
        StatusCode::UNAUTHORIZED => ForgeError::AuthFailed("Invalid or expired token".into()),
        StatusCode::FORBIDDEN => ForgeError::AuthFailed(format!("Permission denied: {}", message)),
        StatusCode::NOT_FOUND => ForgeError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
        _ => ForgeError::ApiError {
            status: status.as_u16(),
            message,
        },
    }
}

/// Paged JSON client with provider quirks configured as data.
pub struct PagedHttpClient {
    transport: Box<dyn Transport>,
    /// Appended to every request (e.g. GitLab `private_token`)
    auth_query: Vec<(String, String)>,
    /// Query parameter carrying the page number
    page_param: &'static str,
    /// Field wrapping result lists, `None` for bare arrays
    values_field: Option<&'static str>,
}

impl std::fmt::Debug for PagedHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedHttpClient")
            .field("has_auth_query", &!self.auth_query.is_empty())
            .field("page_param", &self.page_param)
            .field("values_field", &self.values_field)
            .finish()
    }
}

impl PagedHttpClient {
    /// Create a client returning bare JSON arrays, paged with `page`.
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            auth_query: Vec::new(),
            page_param: "page",
            values_field: None,
        }
    }

    /// Add a query parameter sent with every request.
    pub fn with_auth_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.auth_query.push((name.into(), value.into()));
        self
    }

    /// Read page contents from `field` instead of the top-level array.
    pub fn with_values_field(mut self, field: &'static str) -> Self {
        self.values_field = Some(field);
        self
    }

    /// Use `param` instead of `page` for the page number.
    pub fn with_page_param(mut self, param: &'static str) -> Self {
        self.page_param = param;
        self
    }

    /// Lazily page through a GET endpoint.
    ///
    /// Each call to `next()` issues one request. The iterator ends on the
    /// first empty page, or after yielding an error.
    pub fn get(&self, path: impl Into<String>, query: &[(&str, &str)]) -> Pages<'_> {
        Pages {
            client: self,
            path: path.into(),
            query: to_owned_pairs(query),
            page: 1,
            done: false,
        }
    }

    /// Issue a single POST with a JSON body.
    ///
    /// # Errors
    ///
    /// Propagates the transport error unchanged.
    pub fn post(
        &self,
        path: impl Into<String>,
        query: &[(&str, &str)],
        body: Value,
    ) -> Result<Value, ForgeError> {
        let request = ApiRequest {
            method: Method::Post,
            path: path.into(),
            query: self.with_auth(to_owned_pairs(query)),
            body: Some(body),
        };
        self.transport.send(&request)
    }

    fn with_auth(&self, mut query: Vec<(String, String)>) -> Vec<(String, String)> {
        query.extend(self.auth_query.iter().cloned());
        query
    }

    /// Extract the item list of one page; `None` means the page is empty.
    fn page_values(&self, json: Value) -> Option<Vec<Value>> {
        let list = match self.values_field {
            Some(field) => match json {
                Value::Object(mut map) => map.remove(field)?,
                _ => return None,
            },
            None => json,
        };
        match list {
            Value::Array(items) if !items.is_empty() => Some(items),
            _ => None,
        }
    }
}

/// Lazy page iterator returned by [`PagedHttpClient::get`].
///
/// Not restartable; consume it once.
pub struct Pages<'a> {
    client: &'a PagedHttpClient,
    path: String,
    query: Vec<(String, String)>,
    page: u32,
    done: bool,
}

impl Iterator for Pages<'_> {
    type Item = Result<Vec<Value>, ForgeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut query = self.query.clone();
        query.push((self.client.page_param.to_string(), self.page.to_string()));
        let request = ApiRequest {
            method: Method::Get,
            path: self.path.clone(),
            query: self.client.with_auth(query),
            body: None,
        };

        match self.client.transport.send(&request) {
            Ok(json) => match self.client.page_values(json) {
                Some(items) => {
                    self.page += 1;
                    Some(Ok(items))
                }
                None => {
                    self.done = true;
                    None
                }
            },
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Decode one JSON item into a provider-specific payload type.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(item: Value) -> Result<T, ForgeError> {
    serde_json::from_value(item)
        .map_err(|e| ForgeError::Transport(format!("unexpected payload: {}", e)))
}

fn to_owned_pairs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
