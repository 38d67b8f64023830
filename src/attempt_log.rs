//! Per-attempt log sink.
//!
//! Every attempt of every call can be appended to a human-readable log. The
//! sink is a collaborator behind the [`AttemptLogger`] trait rather than part
//! of the core flow: logging failures are reported through `tracing` and
//! never fail the call.

use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use tracing::warn;

/// What happened on one attempt, as seen by the log sink.
#[derive(Debug, Clone)]
pub struct AttemptRecord<'a> {
    /// 1-based attempt number.
    pub attempt: u32,
    /// Attempt budget for the call.
    pub max_attempts: u32,
    /// HTTP status, when the attempt got far enough to observe one.
    pub status: Option<u16>,
    /// Raw response body, or the transport error text when there is none.
    pub response: &'a str,
    /// Duration of this attempt.
    pub response_time: Duration,
    /// Time elapsed since the call started.
    pub total_time: Duration,
}

/// Sink receiving one record per attempt.
pub trait AttemptLogger: Send + Sync {
    /// Records one attempt. Must not fail the call: implementations swallow
    /// their own errors.
    fn record(&self, record: &AttemptRecord<'_>);
}

/// Sink that discards every record. Used when no log path is configured.
#[derive(Debug, Default)]
pub struct NoopAttemptLogger;

impl AttemptLogger for NoopAttemptLogger {
    fn record(&self, _record: &AttemptRecord<'_>) {}
}

/// Sink appending human-readable records to a file.
#[derive(Debug)]
pub struct FileAttemptLogger {
    path: PathBuf,
}

impl FileAttemptLogger {
    /// Creates a logger appending to `path`. The file is created on first
    /// write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AttemptLogger for FileAttemptLogger {
    fn record(&self, record: &AttemptRecord<'_>) {
        let timestamp = Local::now().format("%m/%d/%Y - %I:%M:%S %p").to_string();
        let text = format_record(&timestamp, record);
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(text.as_bytes()));
        if let Err(e) = result {
            warn!(path = %self.path.display(), error = %e, "failed to append attempt log");
        }
    }
}

fn format_record(timestamp: &str, record: &AttemptRecord<'_>) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "Date: {timestamp}");
    let _ = writeln!(text, "Attempt: {} of {}", record.attempt, record.max_attempts);
    if let Some(status) = record.status {
        let _ = writeln!(text, "Status: {status}");
    }
    let _ = writeln!(
        text,
        "API Response Time: {:.5} seconds",
        record.response_time.as_secs_f64()
    );
    let _ = writeln!(
        text,
        "Total Time: {:.5} seconds",
        record.total_time.as_secs_f64()
    );
    let _ = writeln!(text, "Response: {}", record.response);
    let _ = writeln!(text, "-----------------------------------------------");
    text
}
