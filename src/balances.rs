//! Leave Balance Store
//!
//! Remaining leave days per employee and leave type. Rows are joined to the
//! directory by employee ID and indexed by name; rows whose ID is unknown
//! are dropped. Balances are never decremented by leave requests.

use crate::directory::EmployeeDirectory;
use crate::loader::Table;
use crate::resolver::{first_match_entry, normalize};
use std::collections::BTreeMap;
use tracing::{debug, info};

pub const BALANCE_MIN_FIELDS: usize = 3;

/// Leave type → days remaining
pub type Balances = BTreeMap<String, i64>;

#[derive(Debug, Clone, Default)]
pub struct LeaveBalanceStore {
    by_name: BTreeMap<String, Balances>,
}

impl LeaveBalanceStore {
    pub fn from_table(table: &Table, directory: &EmployeeDirectory) -> Self {
        let mut store = Self::default();
        store.load_from_table(table, directory);
        store
    }

    pub fn load_from_table(&mut self, table: &Table, directory: &EmployeeDirectory) {
        let mut orphaned = 0;
        for row in &table.rows {
            if row.len() < BALANCE_MIN_FIELDS {
                continue;
            }
            let Some(name) = directory.name_for_id(&row[0]) else {
                orphaned += 1;
                debug!("Dropping leave balance for unknown employee ID {}", row[0]);
                continue;
            };
            let days = row[2].trim().parse::<i64>().unwrap_or(0);
            self.by_name
                .entry(name.to_string())
                .or_default()
                .insert(normalize(&row[1]), days);
        }
        info!(
            "Leave balances loaded for {} employees ({} orphaned rows)",
            self.by_name.len(),
            orphaned
        );
    }

    /// All balances for the first employee whose name contains `query`,
    /// together with that employee's name
    pub fn balances_for(&self, query: &str) -> Option<(&str, &Balances)> {
        first_match_entry(query, &self.by_name)
    }

    /// Days for one leave type; the type is matched exactly, ignoring case
    pub fn balance_for_type(&self, query: &str, leave_type: &str) -> Option<i64> {
        let (_, balances) = self.balances_for(query)?;
        balances.get(&normalize(leave_type)).copied()
    }
}
