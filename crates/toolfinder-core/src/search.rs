use std::io::Write;

use tokio::sync::mpsc;
use toolfinder_api::HttpClient;
use tracing::debug;

use crate::error::ReadError;
use crate::export::CsvWriter;
use crate::reader::{RepositoryReader, DEFAULT_PAGE_SIZE};
use crate::{Error, Result};

/// How many decoded repositories may wait for the writer
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub page_size: usize,
    pub channel_capacity: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Search and stream the results into `output` as CSV
///
/// The reader runs on the current task while the writer drains the channel
/// on a blocking thread. A reader failure wins over a writer failure, except
/// when the reader only stopped because the writer went away.
pub async fn search_to_csv<C, W>(
    client: C,
    query: &str,
    total: usize,
    output: W,
    options: SearchOptions,
) -> Result<W>
where
    C: HttpClient,
    W: Write + Send + 'static,
{
    let (tx, rx) = mpsc::channel(options.channel_capacity.max(1));
    let sink = tokio::task::spawn_blocking(move || CsvWriter::new(rx, output)?.handle());

    let read_result = RepositoryReader::new(query, total, tx, client)
        .with_page_size(options.page_size)
        .handle()
        .await;

    let sink_result = sink
        .await
        .map_err(|e| Error::TaskFailed(format!("CSV writer: {}", e)))
        .and_then(|result| result);
    debug!("Reader and writer both finished");

    match (read_result, sink_result) {
        (Err(Error::Read(ReadError::OutputClosed)), Err(sink_err)) => Err(sink_err),
        (Err(e), _) => Err(e),
        (Ok(()), sink) => sink,
    }
}
