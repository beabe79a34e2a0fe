// Transport capability - send a request, get a response, nothing more
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, StatusCode, Url};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request has no destination")]
    MissingDestination,

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// An outgoing request before it has been routed anywhere
///
/// Callers only fill in the method and body. Destination and headers are
/// usually left to a wrapping client such as [`crate::AuthenticationClient`].
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Option<Url>,
    pub headers: HeaderMap,
    pub body: String,
}

impl ApiRequest {
    pub fn new(method: Method, body: impl Into<String>) -> Self {
        Self {
            method,
            url: None,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn post(body: impl Into<String>) -> Self {
        Self::new(Method::POST, body)
    }
}

/// A fully received response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

/// The single capability the search reader depends on
///
/// Implemented by the real reqwest client and by wrappers that decorate
/// requests before delegating, so they stack freely.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// HttpClient backed by reqwest
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("toolfinder/", env!("CARGO_PKG_VERSION"))),
        );

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = request.url.ok_or(ApiError::MissingDestination)?;
        debug!("{} {}", request.method, url);

        let response = self
            .client
            .request(request.method, url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        debug!("Received {} ({} bytes)", status, body.len());

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}
