// Shared fixtures for unit tests
use async_trait::async_trait;
use mockall::mock;
use serde_json::json;
use toolfinder_api::{ApiError, ApiRequest, ApiResponse, HttpClient, StatusCode};

mock! {
    pub Client {}

    #[async_trait]
    impl HttpClient for Client {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
    }
}

pub fn node(n: usize) -> serde_json::Value {
    json!({
        "description": format!("Description{}", n),
        "name": format!("Name{}", n),
        "nameWithOwner": format!("Owner{}/Name{}", n, n),
        "url": format!("https://github.com/Owner{}/Name{}", n, n),
        "owner": {"login": format!("Owner{}", n)},
        "forkCount": 2,
        "stargazers": {"totalCount": 3},
        "watchers": {"totalCount": 4},
        "homepageUrl": "",
        "licenseInfo": {"name": "MIT License"},
        "mentionableUsers": {"totalCount": 5},
        "mirrorUrl": null,
        "isMirror": false,
        "primaryLanguage": {"name": "Go"},
        "parent": null,
        "createdAt": "2020-04-15T20:01:25Z",
        "updatedAt": "2020-05-15T20:01:25Z"
    })
}

/// A successful page holding nodes for `numbers`, cursors `cursor:<n>`
pub fn page(numbers: std::ops::Range<usize>) -> String {
    let edges: Vec<_> = numbers
        .map(|n| json!({"cursor": format!("cursor:{}", n), "node": node(n)}))
        .collect();
    json!({"data": {"search": {"repositoryCount": 1000, "edges": edges}}}).to_string()
}

pub fn ok(
    body: String,
) -> impl FnMut(ApiRequest) -> Result<ApiResponse, ApiError> + Send + 'static {
    move |_| Ok(ApiResponse::new(StatusCode::OK, body.clone()))
}

pub fn document(request: &ApiRequest) -> String {
    let value: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    value["query"].as_str().unwrap().to_string()
}

/// Whether the request asks for `limit` results after `cursor`
pub fn is_page(request: &ApiRequest, limit: usize, cursor: Option<&str>) -> bool {
    let after = cursor
        .map(|c| format!(", after: \"{}\"", c))
        .unwrap_or_default();
    document(request).contains(&format!("first:{}{}){{", limit, after))
}
