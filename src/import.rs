//! Bulk loading of roots and templates from line oriented text.
//!
//! Root files hold one spelling per line, template files one `name|rule`
//! pair per line. Blank lines and lines starting with `#` are skipped without
//! being reported. A line that cannot be used is recorded with its reason and
//! the import carries on with the next one.
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use crate::engine::{Engine, Insertion};
use crate::error::{Result, SarfError};

lazy_static! {
    static ref SCHEME_LINE: Regex = Regex::new(r"^\s*([^|]+?)\s*\|\s*([^|]+?)\s*$").unwrap();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    Added,
    Duplicate,
    Invalid,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LineOutcome {
    /// One-based line number in the source.
    pub line: usize,
    pub text: String,
    pub status: LineStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub added: usize,
    pub skipped: usize,
    pub lines: Vec<LineOutcome>,
}

impl ImportReport {
    fn record(&mut self, line: usize, text: &str, status: LineStatus, reason: Option<String>) {
        match status {
            LineStatus::Added => self.added += 1,
            LineStatus::Duplicate | LineStatus::Invalid => self.skipped += 1,
        }
        self.lines.push(LineOutcome {
            line,
            text: text.to_string(),
            status,
            reason,
        });
    }
    pub fn invalid(&self) -> impl Iterator<Item = &LineOutcome> {
        self.lines.iter().filter(|l| l.status == LineStatus::Invalid)
    }
}

pub fn import_roots<R: BufRead>(engine: &Engine, reader: R) -> Result<ImportReport> {
    let report = import_lines(reader, |text| match engine.register_root(text) {
        Ok(outcome) => Ok(Ok(outcome)),
        Err(e @ SarfError::InvalidRoot { .. }) => Ok(Err(e.to_string())),
        Err(e) => Err(e),
    })?;
    info!(added = report.added, skipped = report.skipped, "roots imported");
    Ok(report)
}

pub fn import_schemes<R: BufRead>(engine: &Engine, reader: R) -> Result<ImportReport> {
    let report = import_lines(reader, |text| {
        let Some(caps) = SCHEME_LINE.captures(text) else {
            return Ok(Err("expected name|rule".to_string()));
        };
        match engine.register_scheme(&caps[1], &caps[2]) {
            Ok(outcome) => Ok(Ok(outcome)),
            Err(e @ SarfError::InvalidTemplate { .. }) => Ok(Err(e.to_string())),
            Err(e) => Err(e),
        }
    })?;
    info!(added = report.added, skipped = report.skipped, "schemes imported");
    Ok(report)
}

pub fn import_roots_file<P: AsRef<Path>>(engine: &Engine, path: P) -> Result<ImportReport> {
    import_roots(engine, BufReader::new(File::open(path)?))
}

pub fn import_schemes_file<P: AsRef<Path>>(engine: &Engine, path: P) -> Result<ImportReport> {
    import_schemes(engine, BufReader::new(File::open(path)?))
}

/// Feeds every meaningful line to `register`. The inner result separates a
/// rejected line (reported, import continues) from a failure of the engine
/// itself (import stops).
fn import_lines<R, F>(reader: R, mut register: F) -> Result<ImportReport>
where
    R: BufRead,
    F: FnMut(&str) -> Result<std::result::Result<Insertion, String>>,
{
    let mut report = ImportReport::default();
    for (index, line) in reader.lines().enumerate() {
        let number = index + 1;
        let line = match line {
            Ok(line) => line,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!(line = number, "line is not valid UTF-8");
                report.record(number, "", LineStatus::Invalid, Some("line is not valid UTF-8".to_string()));
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        let text = line.trim().trim_start_matches('\u{FEFF}').trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        match register(text)? {
            Ok(Insertion::Added) => report.record(number, text, LineStatus::Added, None),
            Ok(Insertion::AlreadyExists) => {
                report.record(number, text, LineStatus::Duplicate, Some("already registered".to_string()))
            }
            Err(reason) => {
                warn!(line = number, %text, %reason, "line rejected");
                report.record(number, text, LineStatus::Invalid, Some(reason));
            }
        }
    }
    Ok(report)
}
