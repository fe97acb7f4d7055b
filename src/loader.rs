//! Tabular Loader
//!
//! Reads comma- or tab-delimited flat files into ordered rows. The first
//! line is always treated as a header and discarded. Rows shorter than the
//! caller's minimum are dropped whole, and so are lines that are not valid
//! UTF-8. A file that cannot be opened yields an empty table and a warning,
//! never an error.
//!
//! Journals written by this crate go through [`load_quoted_table`], which
//! honours CSV quoting so a field holding a delimiter stays one field.

use csv::{ByteRecord, ReaderBuilder, Trim};
use lazy_static::lazy_static;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

lazy_static! {
    static ref DELIMITER: Regex = Regex::new(r"[,\t]").expect("delimiter pattern is valid");
}

/// Rows read from one flat file, in file order
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
    /// Data lines dropped for having too few fields or bad encoding
    pub skipped: usize,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Split one line on the delimiter set, trimming every field
pub fn split_line(line: &str) -> Vec<String> {
    DELIMITER
        .split(line)
        .map(|field| field.trim().to_string())
        .collect()
}

/// Parse already-read text, header first
pub fn parse_table(text: &str, min_fields: usize) -> Table {
    let mut table = Table::default();
    for line in text.lines().skip(1) {
        push_row(&mut table, line, min_fields);
    }
    table
}

/// Load a table from disk; I/O failure is logged and yields an empty table
pub fn load_table(path: &Path, min_fields: usize) -> Table {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            warn!("Error loading {}: {}", path.display(), e);
            return Table::default();
        }
    };

    let mut reader = BufReader::new(file);
    let mut table = Table::default();
    let mut buf = Vec::new();
    let mut line_no = 0;
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => line_no += 1,
            Err(e) => {
                warn!("Error reading {} after line {}: {}", path.display(), line_no, e);
                break;
            }
        }
        if line_no == 1 {
            continue;
        }
        match std::str::from_utf8(&buf) {
            Ok(line) => push_row(&mut table, line.trim_end_matches(&['\r', '\n'][..]), min_fields),
            Err(e) => {
                warn!("Skipping line {} of {}: {}", line_no, path.display(), e);
                table.skipped += 1;
            }
        }
    }

    log_loaded(path, &table);
    table
}

/// Delimiter for a journal file: tab when the header has tabs and no
/// commas, comma otherwise
pub fn sniff_delimiter(header: &str) -> u8 {
    if header.contains('\t') && !header.contains(',') {
        b'\t'
    } else {
        b','
    }
}

/// Load a journal with CSV quoting honoured. The delimiter is sniffed from
/// the header line, which is then discarded like in [`load_table`].
pub fn load_quoted_table(path: &Path, min_fields: usize) -> Table {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            warn!("Error loading {}: {}", path.display(), e);
            return Table::default();
        }
    };
    let header_end = bytes.iter().position(|&b| b == b'\n').unwrap_or(bytes.len());
    let delimiter = sniff_delimiter(&String::from_utf8_lossy(&bytes[..header_end]));

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(bytes.as_slice());

    let mut table = Table::default();
    for (idx, record) in reader.byte_records().enumerate() {
        let fields = match record.map_err(|e| e.to_string()).and_then(|r| decode(&r)) {
            Ok(fields) => fields,
            Err(e) => {
                warn!("Skipping record {} of {}: {}", idx + 1, path.display(), e);
                table.skipped += 1;
                continue;
            }
        };
        push_fields(&mut table, fields, min_fields);
    }

    log_loaded(path, &table);
    table
}

fn decode(record: &ByteRecord) -> std::result::Result<Vec<String>, String> {
    record
        .iter()
        .map(|field| {
            std::str::from_utf8(field)
                .map(str::to_string)
                .map_err(|e| e.to_string())
        })
        .collect()
}

fn log_loaded(path: &Path, table: &Table) {
    info!(
        "Loaded {} rows from {} ({} skipped)",
        table.rows.len(),
        path.display(),
        table.skipped
    );
}

fn push_row(table: &mut Table, line: &str, min_fields: usize) {
    push_fields(table, split_line(line), min_fields);
}

fn push_fields(table: &mut Table, fields: Vec<String>, min_fields: usize) {
    if fields.len() < min_fields {
        table.skipped += 1;
        return;
    }
    table.rows.push(fields);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_split_line_accepts_commas_and_tabs() {
        assert_eq!(split_line("E1, Rina\tEngineer"), vec!["E1", "Rina", "Engineer"]);
    }

    #[test]
    fn test_parse_table_skips_header_and_short_rows() {
        let text = "id,name,email\nE1,Rina,rina@x.com\nE2,Budi\n";
        let table = parse_table(text, 3);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0][1], "Rina");
        assert_eq!(table.skipped, 1);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let table = load_table(&temp_dir.path().join("missing.csv"), 3);
        assert!(table.is_empty());
        assert_eq!(table.skipped, 0);
    }

    #[test]
    fn test_load_table_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("balances.csv");
        std::fs::write(&path, "employee_id\tleave_type\tdays\nE1\tannual\t12\n").unwrap();

        let table = load_table(&path, 3);
        assert_eq!(table.rows, vec![vec!["E1", "annual", "12"]]);
    }

    #[test]
    fn test_badly_encoded_line_skips_only_itself() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("employees.csv");
        std::fs::write(&path, b"id,name,email\nE1,Jos\xe9,jose@x.com\nE2,Rina,rina@x.com\n").unwrap();

        let table = load_table(&path, 3);
        assert_eq!(table.rows, vec![vec!["E2", "Rina", "rina@x.com"]]);
        assert_eq!(table.skipped, 1);
    }

    #[test]
    fn test_crlf_line_endings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("balances.csv");
        std::fs::write(&path, "employee_id,leave_type,days\r\nE1,annual,12\r\n").unwrap();

        let table = load_table(&path, 3);
        assert_eq!(table.rows, vec![vec!["E1", "annual", "12"]]);
    }

    #[test]
    fn test_quoted_table_keeps_delimiters_inside_quotes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("leave_requests.csv");
        std::fs::write(
            &path,
            "request_id,employee_id,leave_type,start_date,end_date,status\n\
             LR100,E1,\"Annual, Paid\",10/3/2025,10/5/2025,Awaiting Approval\n\
             LR101,E1\n",
        )
        .unwrap();

        let table = load_quoted_table(&path, 6);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0][2], "Annual, Paid");
        assert_eq!(table.rows[0][5], "Awaiting Approval");
        assert_eq!(table.skipped, 1);
    }

    #[test]
    fn test_quoted_table_sniffs_tabs_and_skips_bad_encoding() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("leave_requests.csv");
        std::fs::write(
            &path,
            b"request_id\temployee_id\tstatus\nLR100\tE1\tOn\xe9\nLR101\tE2\tApproved, late\n",
        )
        .unwrap();

        let table = load_quoted_table(&path, 3);
        assert_eq!(table.rows, vec![vec!["LR101", "E2", "Approved, late"]]);
        assert_eq!(table.skipped, 1);
    }

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter("id\tname"), b'\t');
        assert_eq!(sniff_delimiter("id,name"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }
}
