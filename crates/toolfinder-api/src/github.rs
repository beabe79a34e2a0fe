// GitHub GraphQL transport - routes and authenticates requests for the reader
use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;

use crate::http::{ApiError, ApiRequest, ApiResponse, HttpClient, Result};

pub const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Wraps another client and points every request at the GraphQL endpoint
///
/// Whatever destination the caller set is overwritten. The bearer token is
/// only attached when one was configured and it isn't empty.
pub struct AuthenticationClient<C> {
    inner: C,
    endpoint: Url,
    token: Option<String>,
}

impl<C: HttpClient> AuthenticationClient<C> {
    pub fn new(inner: C, token: Option<String>) -> Result<Self> {
        Self::with_endpoint(inner, token, GITHUB_GRAPHQL_URL)
    }

    /// For GitHub Enterprise or a local test server
    pub fn with_endpoint(inner: C, token: Option<String>, endpoint: &str) -> Result<Self> {
        let endpoint =
            Url::parse(endpoint).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", endpoint, e)))?;

        Ok(Self {
            inner,
            endpoint,
            token: token.filter(|t| !t.is_empty()),
        })
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for AuthenticationClient<C> {
    async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        request.url = Some(self.endpoint.clone());
        request
            .headers
            .insert(ACCEPT, HeaderValue::from_static("application/json"));
        request
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.token {
            let mut value = HeaderValue::from_str(&format!("bearer {}", token))?;
            value.set_sensitive(true);
            request.headers.insert(AUTHORIZATION, value);
        }

        self.inner.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockHttpClient;
    use reqwest::StatusCode;

    fn header<'a>(request: &'a ApiRequest, name: reqwest::header::HeaderName) -> Option<&'a str> {
        request.headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[tokio::test]
    async fn test_connection_information_added_before_send() {
        let mut inner = MockHttpClient::new();
        inner
            .expect_send()
            .withf(|request| {
                request.url.as_ref().map(Url::as_str) == Some("https://api.github.com/graphql")
                    && header(request, ACCEPT) == Some("application/json")
                    && header(request, CONTENT_TYPE) == Some("application/json")
                    && header(request, AUTHORIZATION) == Some("bearer authtoken")
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::new(StatusCode::OK, "{}")));

        let client = AuthenticationClient::new(inner, Some("authtoken".to_string())).unwrap();
        let response = client.send(ApiRequest::post("{}")).await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_caller_destination_is_overwritten() {
        let mut inner = MockHttpClient::new();
        inner
            .expect_send()
            .withf(|request| {
                request.url.as_ref().map(Url::as_str) == Some("http://localhost:8080/api/graphql")
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::new(StatusCode::OK, "")));

        let client = AuthenticationClient::with_endpoint(
            inner,
            None,
            "http://localhost:8080/api/graphql",
        )
        .unwrap();

        let mut request = ApiRequest::post("{}");
        request.url = Some(Url::parse("https://example.com/elsewhere").unwrap());
        client.send(request).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_token_sends_no_authorization() {
        for token in [None, Some(String::new())] {
            let mut inner = MockHttpClient::new();
            inner
                .expect_send()
                .withf(|request| {
                    request.headers.get(AUTHORIZATION).is_none()
                        && header(request, ACCEPT) == Some("application/json")
                })
                .times(1)
                .returning(|_| Ok(ApiResponse::new(StatusCode::OK, "")));

            let client = AuthenticationClient::new(inner, token).unwrap();
            client.send(ApiRequest::post("{}")).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_inner_response_and_error_returned() {
        let mut inner = MockHttpClient::new();
        inner
            .expect_send()
            .times(1)
            .returning(|_| Ok(ApiResponse::new(StatusCode::IM_A_TEAPOT, "")));
        let client = AuthenticationClient::new(inner, None).unwrap();
        let response = client.send(ApiRequest::post("")).await.unwrap();
        assert_eq!(response.status, StatusCode::IM_A_TEAPOT);

        let mut inner = MockHttpClient::new();
        inner
            .expect_send()
            .times(1)
            .returning(|_| Err(ApiError::MissingDestination));
        let client = AuthenticationClient::new(inner, None).unwrap();
        let err = client.send(ApiRequest::post("")).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingDestination));
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let result = AuthenticationClient::with_endpoint(MockHttpClient::new(), None, "not a url");
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }
}
