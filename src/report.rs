//! Dated CSV report emission for resolved account records.
//!
//! The report is a two-column CSV (`Account Name,Active Agents`) named by
//! the run's calendar date: `accountsS1_<YYYY-MM-DD>.csv`. One file per day;
//! a same-day rerun overwrites the previous file rather than appending.
//!
//! After writing, the file is re-read in full so the caller can attach the
//! exact on-disk content to the action result.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

/// Default directory for report files. Deployments with sandboxed or
/// multi-tenant filesystems should override it via the `Output Directory`
/// action parameter.
pub const DEFAULT_OUTPUT_DIR: &str = "/tmp";

/// MIME type used when attaching the report to the action result.
pub const REPORT_MIME_TYPE: &str = "text/csv";

/// One resolved account: the exported name paired with its active-agent
/// count. Serialized as one report row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    /// Account name as it appeared in the export column.
    pub name: String,
    /// Active-agent count from the account details, 0 when the API
    /// omitted the field.
    pub active_agents: u64,
}

/// A written report: where it landed and what it contains.
#[derive(Debug)]
pub struct Report {
    /// Absolute path of the report file. This becomes the run's result
    /// value.
    pub path: PathBuf,
    /// Bare filename (`accountsS1_<date>.csv`), used as the attachment
    /// name.
    pub filename: String,
    /// Full file content as re-read from disk after writing.
    pub content: String,
}

/// Returns the report filename for the given date.
pub fn report_filename(date: NaiveDate) -> String {
    format!("accountsS1_{}.csv", date.format("%Y-%m-%d"))
}

/// Writes the dated report into `dir` and returns its path, name, and
/// content.
///
/// The header row `Account Name,Active Agents` is followed by one row per
/// record in input order. Standard CSV quoting applies: names containing
/// commas or quotes are quoted, integer counts never are. The file handle
/// is flushed and closed before the content is re-read, so the returned
/// `content` is exactly what a later reader of the file will see.
///
/// # Errors
///
/// - `S1Error::Csv` — a record failed to serialize.
/// - `S1Error::Io` — the file could not be created, flushed, or re-read
///   (e.g. the directory does not exist or is not writable).
pub fn write_report(
    dir: &Path,
    date: NaiveDate,
    records: &[AccountRecord],
) -> crate::error::Result<Report> {
    let filename = report_filename(date);
    let path = dir.join(&filename);

    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(["Account Name", "Active Agents"])?;
    for record in records {
        writer.write_record([record.name.as_str(), &record.active_agents.to_string()])?;
    }
    writer.flush()?;
    drop(writer);

    let content = fs::read_to_string(&path)?;

    Ok(Report {
        path,
        filename,
        content,
    })
}
