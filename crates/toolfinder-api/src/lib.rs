// Transport for the GitHub GraphQL search API
pub mod github;
pub mod http;

// Re-export common types
pub use github::{AuthenticationClient, GITHUB_GRAPHQL_URL};
pub use http::{ApiError, ApiRequest, ApiResponse, HttpClient, ReqwestClient};

// Re-exported so downstream crates don't need a direct reqwest dependency
pub use reqwest::{header, Method, StatusCode, Url};
