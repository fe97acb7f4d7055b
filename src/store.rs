//! Owned HR store: every table loaded once, in dependency order.

use crate::balances::{LeaveBalanceStore, BALANCE_MIN_FIELDS};
use crate::config::HrConfig;
use crate::directory::{EmployeeDirectory, EMPLOYEE_MIN_FIELDS};
use crate::leave_journal::LeaveRequestJournal;
use crate::loader::load_table;
use crate::review_journal::PerformanceReviewJournal;
use tracing::info;

pub struct HrStore {
    pub directory: EmployeeDirectory,
    pub balances: LeaveBalanceStore,
    pub leave_requests: LeaveRequestJournal,
    pub reviews: PerformanceReviewJournal,
}

impl HrStore {
    /// Loader → Directory → Balance Store → Leave Journal → Review Journal.
    /// Missing files leave the matching store empty.
    pub fn open(config: &HrConfig) -> Self {
        info!("Opening HR store in {}", config.data_dir.display());

        let employees = load_table(&config.employees_path(), EMPLOYEE_MIN_FIELDS);
        let directory = EmployeeDirectory::from_table(&employees);

        let balance_rows = load_table(&config.leave_balances_path(), BALANCE_MIN_FIELDS);
        let balances = LeaveBalanceStore::from_table(&balance_rows, &directory);

        let leave_requests = LeaveRequestJournal::open(config.leave_requests_path(), &directory);
        let reviews = PerformanceReviewJournal::open(config.performance_reviews_path());

        Self {
            directory,
            balances,
            leave_requests,
            reviews,
        }
    }

    pub fn from_parts(
        directory: EmployeeDirectory,
        balances: LeaveBalanceStore,
        leave_requests: LeaveRequestJournal,
        reviews: PerformanceReviewJournal,
    ) -> Self {
        Self {
            directory,
            balances,
            leave_requests,
            reviews,
        }
    }
}
