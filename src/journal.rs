//! Shared append path for the file-backed journals.

use crate::error::Result;
use crate::loader::sniff_delimiter;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Whether an accepted record also reached disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    Persisted,
    /// The record was confirmed to the caller but the write failed
    NotPersisted { reason: String },
}

impl Persistence {
    pub fn is_persisted(&self) -> bool {
        matches!(self, Persistence::Persisted)
    }
}

/// Append one record, writing `header` first when the file is new or empty.
/// An existing file keeps the delimiter its header uses, so rows read back
/// with [`crate::loader::load_quoted_table`] split the same way.
pub fn append_record<R>(path: &Path, header: &[&str], record: &R) -> Result<()>
where
    R: Serialize + ?Sized,
{
    let len = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    let needs_header = len == 0;
    let needs_newline = len > 0 && !ends_with_newline(path)?;
    let delimiter = if needs_header {
        b','
    } else {
        sniff_delimiter(&read_header(path)?)
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if needs_newline {
        file.write_all(b"\n")?;
    }
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .from_writer(file);

    if needs_header {
        writer.write_record(header)?;
    }
    writer.serialize(record)?;
    writer.flush()?;
    Ok(())
}

fn read_header(path: &Path) -> Result<String> {
    let mut line = Vec::new();
    BufReader::new(File::open(path)?).read_until(b'\n', &mut line)?;
    Ok(String::from_utf8_lossy(&line).into_owned())
}

fn ends_with_newline(path: &Path) -> Result<bool> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_header_written_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("journal.csv");

        append_record(&path, &["id", "status"], &["LR100", "Open"]).unwrap();
        append_record(&path, &["id", "status"], &["LR101", "Open"]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "id,status\nLR100,Open\nLR101,Open\n");
    }

    #[test]
    fn test_existing_file_keeps_its_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("journal.csv");
        std::fs::write(&path, "request_id,status\n").unwrap();

        append_record(&path, &["id", "status"], &["LR100", "Open"]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "request_id,status\nLR100,Open\n");
    }

    #[test]
    fn test_missing_trailing_newline_is_repaired() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("journal.csv");
        std::fs::write(&path, "id,status\nLR100,Open").unwrap();

        append_record(&path, &["id", "status"], &["LR101", "Open"]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "id,status\nLR100,Open\nLR101,Open\n");
    }

    #[test]
    fn test_tab_journal_keeps_tabs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("journal.csv");
        std::fs::write(&path, "id\tstatus\n").unwrap();

        append_record(&path, &["id", "status"], &["LR100", "Open, pending"]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "id\tstatus\nLR100\tOpen, pending\n");
    }

    #[test]
    fn test_delimiter_inside_field_is_quoted() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("journal.csv");

        append_record(&path, &["id", "type"], &["LR100", "Annual, Paid"]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "id,type\nLR100,\"Annual, Paid\"\n");
    }
}
