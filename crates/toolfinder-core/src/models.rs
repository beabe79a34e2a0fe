use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Repository model - one search hit, flattened
///
/// The GraphQL node nests most counts and names one level deep
/// (`stargazers.totalCount`, `owner.login`, ...). We flatten those on decode
/// so consumers only ever see scalars. Anything GitHub leaves out decodes to
/// its empty value instead of failing the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RepositoryNode")]
pub struct Repository {
    pub description: Option<String>,
    pub name: String,
    pub owner: String,
    pub full_name: String,
    pub url: String,
    pub forks: u64,
    pub stars: u64,
    pub watchers: u64,
    pub homepage_url: Option<String>,
    pub license: Option<String>,
    pub mentionable_users: u64,
    pub mirror_url: Option<String>,
    pub is_mirror: bool,
    pub language: Option<String>,
    pub parent: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Search response envelope for one page
///
/// GitHub sends `data` on success, a bare `message` for request-level
/// failures (bad credentials, malformed body) and an `errors` list for
/// query-level failures.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub data: Option<SearchData>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<ResponseError>,
}

impl SearchResponse {
    /// Envelope standing in for a body that couldn't be decoded
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn edges(&self) -> &[SearchEdge] {
        self.data
            .as_ref()
            .and_then(|d| d.search.as_ref())
            .map(|s| s.edges.as_slice())
            .unwrap_or(&[])
    }

    pub fn into_edges(self) -> Vec<SearchEdge> {
        self.data
            .and_then(|d| d.search)
            .map(|s| s.edges)
            .unwrap_or_default()
    }

    pub fn repository_count(&self) -> u64 {
        self.data
            .as_ref()
            .and_then(|d| d.search.as_ref())
            .map(|s| s.repository_count)
            .unwrap_or(0)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchData {
    #[serde(default)]
    pub search: Option<SearchResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(default)]
    pub repository_count: u64,
    #[serde(default)]
    pub edges: Vec<SearchEdge>,
}

#[derive(Debug, Deserialize)]
pub struct SearchEdge {
    #[serde(default)]
    pub cursor: String,
    /// `null` for hits GitHub won't show, e.g. taken-down repositories
    #[serde(default)]
    pub node: Option<Repository>,
}

/// One entry of a GraphQL `errors` list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResponseError {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

// Wire shape of a repository node, only used to build Repository
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    description: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    name_with_owner: String,
    #[serde(default)]
    url: String,
    owner: Option<Login>,
    #[serde(default)]
    fork_count: u64,
    stargazers: Option<TotalCount>,
    watchers: Option<TotalCount>,
    homepage_url: Option<String>,
    license_info: Option<Named>,
    mentionable_users: Option<TotalCount>,
    mirror_url: Option<String>,
    #[serde(default)]
    is_mirror: bool,
    primary_language: Option<Named>,
    parent: Option<Named>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct Login {
    #[serde(default)]
    login: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalCount {
    #[serde(default)]
    total_count: u64,
}

#[derive(Deserialize)]
struct Named {
    #[serde(default)]
    name: String,
}

impl From<RepositoryNode> for Repository {
    fn from(node: RepositoryNode) -> Self {
        Repository {
            description: node.description,
            name: node.name,
            owner: node.owner.map(|o| o.login).unwrap_or_default(),
            full_name: node.name_with_owner,
            url: node.url,
            forks: node.fork_count,
            stars: node.stargazers.map(|c| c.total_count).unwrap_or(0),
            watchers: node.watchers.map(|c| c.total_count).unwrap_or(0),
            homepage_url: node.homepage_url,
            license: node.license_info.map(|l| l.name),
            mentionable_users: node.mentionable_users.map(|c| c.total_count).unwrap_or(0),
            mirror_url: node.mirror_url,
            is_mirror: node.is_mirror,
            language: node.primary_language.map(|l| l.name),
            parent: node.parent.map(|p| p.name),
            created_at: node.created_at,
            updated_at: node.updated_at,
        }
    }
}
