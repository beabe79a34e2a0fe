use std::io::Write;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::debug;

use crate::{models::Repository, Result};

pub const CSV_HEADER: [&str; 17] = [
    "Name",
    "NameWithOwner",
    "Owner",
    "Description",
    "URL",
    "ForkCount",
    "Stargazers",
    "Watchers",
    "HomepageURL",
    "LicenseInfo",
    "MentionableUsers",
    "MirrorURL",
    "IsMirror",
    "PrimaryLanguage",
    "Parent",
    "CreatedAt",
    "UpdatedAt",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z UTC";

/// CSV sink draining a repository stream
///
/// The header goes out as soon as the writer is created, so an empty stream
/// still produces a valid file. `handle` blocks on the channel and is meant
/// to run on a blocking task.
pub struct CsvWriter<W: Write> {
    input: mpsc::Receiver<Repository>,
    writer: W,
    written: usize,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(input: mpsc::Receiver<Repository>, output: W) -> Result<Self> {
        let mut this = Self {
            input,
            writer: output,
            written: 0,
        };
        this.write_values(CSV_HEADER.iter().copied())?;

        Ok(this)
    }

    /// Write every record until the stream closes, then flush
    ///
    /// Hands the writer back so the caller decides when it is released.
    pub fn handle(mut self) -> Result<W> {
        while let Some(repository) = self.input.blocking_recv() {
            self.write_repository(&repository)?;
        }

        self.writer.flush()?;
        debug!("CSV output flushed, {} rows written", self.written);

        Ok(self.writer)
    }

    fn write_repository(&mut self, repository: &Repository) -> Result<()> {
        let record = csv_record(repository);
        self.write_values(record.iter().map(String::as_str))?;
        self.written += 1;
        Ok(())
    }

    fn write_values<'a>(&mut self, values: impl Iterator<Item = &'a str>) -> Result<()> {
        let line = values.map(escape_csv).collect::<Vec<_>>().join(",");
        writeln!(self.writer, "{}", line)?;
        Ok(())
    }
}

/// Textual fields of one row, in header order
pub fn csv_record(repo: &Repository) -> [String; 17] {
    [
        repo.name.clone(),
        repo.full_name.clone(),
        repo.owner.clone(),
        repo.description.clone().unwrap_or_default(),
        repo.url.clone(),
        repo.forks.to_string(),
        repo.stars.to_string(),
        repo.watchers.to_string(),
        repo.homepage_url.clone().unwrap_or_default(),
        repo.license.clone().unwrap_or_default(),
        repo.mentionable_users.to_string(),
        repo.mirror_url.clone().unwrap_or_default(),
        repo.is_mirror.to_string(),
        repo.language.clone().unwrap_or_default(),
        repo.parent.clone().unwrap_or_default(),
        format_timestamp(repo.created_at),
        format_timestamp(repo.updated_at),
    ]
}

fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp
        .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

/// Escape CSV special characters
fn escape_csv(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) || s.starts_with(' ') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
