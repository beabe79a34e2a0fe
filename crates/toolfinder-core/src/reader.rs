// Paginated repository reader - pulls search pages and streams the hits
use tokio::sync::mpsc;
use toolfinder_api::{ApiRequest, HttpClient};
use tracing::{debug, info, warn};

use crate::error::ReadError;
use crate::models::{Repository, SearchResponse};
use crate::query::build_search_body;
use crate::Result;

/// GitHub caps `first` at 100 per search page
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Reads `total` repositories for a query, one page at a time
///
/// Every decoded repository is pushed onto `output` in the order the API
/// returned it. The reader owns the only sender, and [`handle`] consumes the
/// reader, so the stream is closed exactly once however the run ends.
///
/// [`handle`]: RepositoryReader::handle
pub struct RepositoryReader<C> {
    query: String,
    total: usize,
    page_size: usize,
    cursor: Option<String>,
    client: C,
    output: mpsc::Sender<Repository>,
}

impl<C: HttpClient> RepositoryReader<C> {
    pub fn new(
        query: impl Into<String>,
        total: usize,
        output: mpsc::Sender<Repository>,
        client: C,
    ) -> Self {
        Self {
            query: query.into(),
            total,
            page_size: DEFAULT_PAGE_SIZE,
            cursor: None,
            client,
            output,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Never ask for more per page than we want in total
    pub fn adjust_page_size(&mut self) {
        if self.page_size > self.total {
            self.page_size = self.total;
        }
    }

    /// Run the whole search, closing the output stream when done
    pub async fn handle(mut self) -> Result<()> {
        self.adjust_page_size();
        info!(
            "Searching '{}' for {} repositories ({} per page)",
            self.query, self.total, self.page_size
        );

        let result = self.paginated_read().await;
        match &result {
            Ok(published) => info!("Search finished, {} repositories read", published),
            Err(e) => warn!("Search aborted: {}", e),
        }

        result.map(|_| ())
    }

    async fn paginated_read(&mut self) -> Result<usize> {
        let mut published = 0;
        let mut index = 0;

        while index < self.total {
            let limit = self.calculate_limit(index);
            let response = self.read_page(limit).await?;
            check_errors(&response)?;

            debug!(
                "Page at {} returned {} of {} matching repositories",
                index,
                response.edges().len(),
                response.repository_count()
            );

            let edges = response.into_edges();
            let Some(last) = edges.last() else {
                debug!("Empty page, no more results for '{}'", self.query);
                break;
            };
            self.cursor = Some(last.cursor.clone());

            for edge in edges {
                let repository = edge.node.unwrap_or_else(|| {
                    debug!("Edge {} has no repository, publishing an empty record", edge.cursor);
                    Repository::default()
                });
                self.output
                    .send(repository)
                    .await
                    .map_err(|_| ReadError::OutputClosed)?;
                published += 1;
            }

            index += self.page_size;
        }

        Ok(published)
    }

    fn calculate_limit(&self, read_index: usize) -> usize {
        self.page_size.min(self.total - read_index)
    }

    async fn read_page(&self, limit: usize) -> Result<SearchResponse> {
        let body = build_search_body(&self.query, limit, self.cursor.as_deref())?;
        debug!(
            "Requesting {} repositories after {:?}",
            limit,
            self.cursor.as_deref().unwrap_or("<start>")
        );

        let response = self
            .client
            .send(ApiRequest::post(body))
            .await
            .map_err(ReadError::from)?;
        debug!("Search page responded with {}", response.status);

        // The body is dropped here whether or not it decoded
        Ok(decode_response(&response.body))
    }
}

/// Decode one page, folding JSON failures into the envelope's message
fn decode_response(body: &[u8]) -> SearchResponse {
    serde_json::from_slice(body).unwrap_or_else(|e| SearchResponse::from_message(e.to_string()))
}

fn check_errors(response: &SearchResponse) -> std::result::Result<(), ReadError> {
    if let Some(message) = response.message.as_deref().filter(|m| !m.is_empty()) {
        return Err(ReadError::message(message));
    }

    if !response.errors.is_empty() {
        return Err(ReadError::from_entries(&response.errors));
    }

    Ok(())
}
