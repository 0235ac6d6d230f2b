//! The run log (`controller.log`): the product record of a provisioning run.
//!
//! # Separation of Concerns
//!
//! - **Run log (this module)**: timestamped INFO/ERROR records appended to a
//!   file. Always written, unaffected by `RUST_LOG`.
//!
//! - **Tracing (`logging`)**: developer diagnostics on stderr, not persisted.
//!
//! Each record is `YYYY-MM-DD HH:MM:SS,mmm LEVEL: message`. A multi-line
//! message keeps its extra lines as tab-indented continuation lines of the same
//! record, so script output shaped like a header cannot start a new record.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";
/// Length of a rendered `TIMESTAMP_FORMAT` value.
const TIMESTAMP_LEN: usize = 23;
const CONTINUATION_PREFIX: &str = "\t";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Error => "ERROR",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "INFO" => Some(Level::Info),
            "ERROR" => Some(Level::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only record sink handed to the orchestrator.
pub struct RunLog<W: Write> {
    writer: W,
}

impl RunLog<File> {
    /// Open (or create) `path` for appending.
    pub fn append(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create log dir {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open run log {}", path.display()))?;
        Ok(Self::new(file))
    }
}

impl<W: Write> RunLog<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn info(&mut self, message: &str) -> Result<()> {
        self.record(Level::Info, message)
    }

    pub fn error(&mut self, message: &str) -> Result<()> {
        self.record(Level::Error, message)
    }

    /// Write one record and flush it before returning.
    pub fn record(&mut self, level: Level, message: &str) -> Result<()> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        let message = message.replace('\n', &format!("\n{CONTINUATION_PREFIX}"));
        writeln!(self.writer, "{timestamp} {level}: {message}").context("write run log")?;
        self.writer.flush().context("flush run log")
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }
}

/// A record read back from run log text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub timestamp: String,
    pub level: Level,
    pub message: String,
}

/// Split run log text into records, folding continuation lines into their record.
///
/// Continuation lines lose their indent. Lines that are neither a header nor
/// indented, and lines before the first header, are ignored.
pub fn parse_records(text: &str) -> Vec<Record> {
    let mut records: Vec<Record> = Vec::new();
    for line in text.lines() {
        if let Some(continuation) = line.strip_prefix(CONTINUATION_PREFIX) {
            if let Some(last) = records.last_mut() {
                last.message.push('\n');
                last.message.push_str(continuation);
            }
        } else if let Some(record) = parse_header(line) {
            records.push(record);
        }
    }
    records
}

fn parse_header(line: &str) -> Option<Record> {
    let timestamp = line.get(..TIMESTAMP_LEN)?;
    if !looks_like_timestamp(timestamp) {
        return None;
    }
    let rest = line[TIMESTAMP_LEN..].strip_prefix(' ')?;
    let (level, message) = rest.split_once(": ")?;
    Some(Record {
        timestamp: timestamp.to_string(),
        level: Level::parse(level)?,
        message: message.to_string(),
    })
}

fn looks_like_timestamp(s: &str) -> bool {
    // 2026-10-19 08:15:02,417
    s.bytes().enumerate().all(|(i, b)| match i {
        4 | 7 => b == b'-',
        10 => b == b' ',
        13 | 16 => b == b':',
        19 => b == b',',
        _ => b.is_ascii_digit(),
    })
}
