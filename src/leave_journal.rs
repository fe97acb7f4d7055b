//! Leave Request Journal
//!
//! Append-only CSV log of leave requests plus an in-memory index of the
//! latest status per employee. The index is rebuilt from the whole file after
//! every append, so a status query issued right after an application sees it.

use crate::dates::{journal_date, long_date};
use crate::directory::EmployeeDirectory;
use crate::error::Result;
use crate::ids::IdGenerator;
use crate::journal::{append_record, Persistence};
use crate::loader::load_quoted_table;
use crate::resolver::first_match_entry;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const LEAVE_REQUEST_MIN_FIELDS: usize = 6;
pub const LEAVE_REQUEST_PREFIX: &str = "LR";
pub const STATUS_AWAITING_APPROVAL: &str = "Awaiting Approval";
/// Employee ID written when the name does not resolve
pub const UNRESOLVED_EMPLOYEE_ID: &str = "-";

const HEADER: [&str; 6] = [
    "request_id",
    "employee_id",
    "leave_type",
    "start_date",
    "end_date",
    "status",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveRequest {
    pub request_id: String,
    pub employee_id: String,
    pub leave_type: String,
    /// `M/D/YYYY`
    pub start_date: String,
    /// `M/D/YYYY`
    pub end_date: String,
    pub status: String,
}

/// Result of a leave application
#[derive(Debug, Clone)]
pub struct LeaveApplication {
    pub request: LeaveRequest,
    pub confirmation: String,
    pub persistence: Persistence,
}

pub struct LeaveRequestJournal {
    path: PathBuf,
    latest_status: BTreeMap<String, String>,
    ids: IdGenerator,
}

impl LeaveRequestJournal {
    pub fn open(path: impl Into<PathBuf>, directory: &EmployeeDirectory) -> Self {
        Self::with_ids(path, directory, IdGenerator::new(LEAVE_REQUEST_PREFIX))
    }

    pub fn with_ids(
        path: impl Into<PathBuf>,
        directory: &EmployeeDirectory,
        ids: IdGenerator,
    ) -> Self {
        let mut journal = Self {
            path: path.into(),
            latest_status: BTreeMap::new(),
            ids,
        };
        journal.reload(directory);
        journal
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replay the whole journal into the latest-status index. Later rows
    /// overwrite earlier ones for the same employee, in file order. Rows whose
    /// employee ID is unknown are not indexed.
    pub fn reload(&mut self, directory: &EmployeeDirectory) {
        let table = load_quoted_table(&self.path, LEAVE_REQUEST_MIN_FIELDS);
        self.latest_status.clear();

        for row in &table.rows {
            self.ids.reserve([row[0].clone()]);
            if let Some(name) = directory.name_for_id(&row[1]) {
                self.latest_status.insert(name.to_string(), row[5].clone());
            }
        }
        info!(
            "Leave request index holds {} employees",
            self.latest_status.len()
        );
    }

    /// Latest status for the first indexed employee whose name contains
    /// `query`, together with that employee's name
    pub fn status_for(&self, query: &str) -> Option<(&str, &str)> {
        first_match_entry(query, &self.latest_status).map(|(name, status)| (name, status.as_str()))
    }

    /// Record a new leave request. An unresolved name still produces a row,
    /// with `-` as employee ID. A failed write is logged and reported through
    /// `persistence`; the confirmation is returned either way.
    pub fn append(
        &mut self,
        directory: &EmployeeDirectory,
        employee_query: &str,
        leave_type: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<LeaveApplication> {
        let employee_id = directory
            .find_id_by_partial_name(employee_query)
            .unwrap_or(UNRESOLVED_EMPLOYEE_ID)
            .to_string();
        if employee_id == UNRESOLVED_EMPLOYEE_ID {
            warn!("Leave request for unknown employee '{}'", employee_query);
        }

        let request = LeaveRequest {
            request_id: self.ids.next_id()?,
            employee_id,
            leave_type: leave_type.to_string(),
            start_date: journal_date(start),
            end_date: journal_date(end),
            status: STATUS_AWAITING_APPROVAL.to_string(),
        };

        let persistence = match append_record(&self.path, &HEADER, &request) {
            Ok(()) => Persistence::Persisted,
            Err(e) => {
                warn!("Failed to save leave request {}: {}", request.request_id, e);
                Persistence::NotPersisted {
                    reason: e.to_string(),
                }
            }
        };
        self.reload(directory);

        let confirmation = format!(
            "CONFIRMED: Leave request for {} (type: {}) from {} to {} has been recorded.",
            employee_query,
            leave_type,
            long_date(start),
            long_date(end)
        );

        Ok(LeaveApplication {
            request,
            confirmation,
            persistence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::EMPLOYEE_MIN_FIELDS;
    use crate::loader::parse_table;
    use tempfile::TempDir;

    fn directory() -> EmployeeDirectory {
        EmployeeDirectory::from_table(&parse_table(
            "id,name,email,title,department,manager_id,join_date\n\
             E1,Rina,rina@x.com,Engineer,Eng,E2,2020-01-01\n\
             E2,Budi,budi@x.com,Lead,Eng,,2019-03-01\n",
            EMPLOYEE_MIN_FIELDS,
        ))
    }

    fn date(s: &str) -> NaiveDate {
        crate::dates::parse_iso(s).unwrap()
    }

    #[test]
    fn test_latest_row_in_file_order_wins() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("leave_requests.csv");
        std::fs::write(
            &path,
            "request_id,employee_id,leave_type,start_date,end_date,status\n\
             LR100,E1,annual,1/2/2025,1/3/2025,Approved\n\
             LR101,E1,sick,2/2/2025,2/3/2025,Rejected\n\
             LR102,E9,sick,2/2/2025,2/3/2025,Approved\n",
        )
        .unwrap();

        let journal = LeaveRequestJournal::open(&path, &directory());
        assert_eq!(journal.status_for("rina"), Some(("rina", "Rejected")));
        assert_eq!(journal.status_for("budi"), None);
    }

    #[test]
    fn test_append_is_visible_immediately() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("leave_requests.csv");
        let dir = directory();
        let mut journal =
            LeaveRequestJournal::with_ids(&path, &dir, IdGenerator::with_seed(LEAVE_REQUEST_PREFIX, 9));

        let application = journal
            .append(&dir, "Budi", "Sick", date("2025-10-03"), date("2025-10-05"))
            .unwrap();

        assert!(application.persistence.is_persisted());
        assert_eq!(application.request.employee_id, "E2");
        assert_eq!(application.request.start_date, "10/3/2025");
        assert_eq!(
            application.confirmation,
            "CONFIRMED: Leave request for Budi (type: Sick) from 3 October 2025 to 5 October 2025 has been recorded."
        );
        assert_eq!(journal.status_for("budi"), Some(("budi", STATUS_AWAITING_APPROVAL)));

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some(HEADER.join(",").as_str()));
        assert_eq!(
            lines.next().unwrap(),
            format!("{},E2,Sick,10/3/2025,10/5/2025,Awaiting Approval", application.request.request_id)
        );
    }

    #[test]
    fn test_unknown_employee_still_writes_row() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("leave_requests.csv");
        let dir = directory();
        let mut journal = LeaveRequestJournal::open(&path, &dir);

        let application = journal
            .append(&dir, "Nobody", "Annual", date("2025-10-03"), date("2025-10-03"))
            .unwrap();

        assert_eq!(application.request.employee_id, UNRESOLVED_EMPLOYEE_ID);
        assert!(application.persistence.is_persisted());
        assert_eq!(journal.status_for("nobody"), None);
    }

    #[test]
    fn test_write_failure_still_confirms() {
        let temp_dir = TempDir::new().unwrap();
        // A directory where the file should be makes the open fail
        let path = temp_dir.path().join("leave_requests.csv");
        std::fs::create_dir(&path).unwrap();
        let dir = directory();
        let mut journal = LeaveRequestJournal::open(&path, &dir);

        let application = journal
            .append(&dir, "Rina", "Annual", date("2025-10-03"), date("2025-10-04"))
            .unwrap();

        assert!(!application.persistence.is_persisted());
        assert!(application.confirmation.starts_with("CONFIRMED"));
        assert_eq!(journal.status_for("rina"), None);
    }

    #[test]
    fn test_loaded_ids_are_not_reissued() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("leave_requests.csv");
        let mut content = String::from("request_id,employee_id,leave_type,start_date,end_date,status\n");
        for n in 101..=999 {
            content.push_str(&format!("LR{},E1,annual,1/2/2025,1/3/2025,Approved\n", n));
        }
        std::fs::write(&path, content).unwrap();
        let dir = directory();
        let mut journal = LeaveRequestJournal::open(&path, &dir);

        let application = journal
            .append(&dir, "Rina", "Annual", date("2025-10-03"), date("2025-10-04"))
            .unwrap();
        assert_eq!(application.request.request_id, "LR100");
    }

    #[test]
    fn test_leave_type_with_comma_keeps_status_column() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("leave_requests.csv");
        let dir = directory();
        let mut journal = LeaveRequestJournal::open(&path, &dir);

        let application = journal
            .append(&dir, "Rina", "Annual, Paid", date("2025-10-03"), date("2025-10-05"))
            .unwrap();
        assert!(application.persistence.is_persisted());
        assert_eq!(journal.status_for("rina"), Some(("rina", STATUS_AWAITING_APPROVAL)));

        let reopened = LeaveRequestJournal::open(&path, &dir);
        assert_eq!(reopened.status_for("rina"), Some(("rina", STATUS_AWAITING_APPROVAL)));
    }

    #[test]
    fn test_tab_delimited_journal_stays_tab_delimited() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("leave_requests.csv");
        std::fs::write(
            &path,
            "request_id\temployee_id\tleave_type\tstart_date\tend_date\tstatus\n\
             LR100\tE2\tannual\t1/2/2025\t1/3/2025\tApproved\n",
        )
        .unwrap();
        let dir = directory();
        let mut journal = LeaveRequestJournal::open(&path, &dir);
        assert_eq!(journal.status_for("budi"), Some(("budi", "Approved")));

        journal
            .append(&dir, "Budi", "Sick", date("2025-10-03"), date("2025-10-05"))
            .unwrap();
        assert_eq!(journal.status_for("budi"), Some(("budi", STATUS_AWAITING_APPROVAL)));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content
            .lines()
            .last()
            .unwrap()
            .ends_with("\tE2\tSick\t10/3/2025\t10/5/2025\tAwaiting Approval"));
    }
}
