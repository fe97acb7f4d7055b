//! Employee Directory
//!
//! Built once from the employee table. Holds ID↔name indices, the attribute
//! record per employee, and the manager name derived from each manager ID.

use crate::loader::Table;
use crate::resolver::{self, first_match, first_match_entry, normalize};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Minimum fields an employee row needs; `status` is optional
pub const EMPLOYEE_MIN_FIELDS: usize = 7;

/// Manager name used when the manager ID does not resolve
pub const UNKNOWN_MANAGER: &str = "unknown";

pub const DEFAULT_STATUS: &str = "active";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub id: String,
    /// Lower-cased display name
    pub name: String,
    pub email: String,
    pub title: String,
    pub department: String,
    pub manager_id: Option<String>,
    /// Free text, not validated
    pub join_date: String,
    pub status: String,
}

impl Employee {
    /// Build from a split row; `None` when the row is too short
    pub fn from_row(row: &[String]) -> Option<Self> {
        if row.len() < EMPLOYEE_MIN_FIELDS {
            return None;
        }
        let manager_id = Some(row[5].clone()).filter(|id| !id.is_empty());
        let status = row
            .get(7)
            .filter(|s| !s.is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_STATUS.to_string());

        Some(Self {
            id: row[0].clone(),
            name: normalize(&row[1]),
            email: row[2].clone(),
            title: row[3].clone(),
            department: row[4].clone(),
            manager_id,
            join_date: row[6].clone(),
            status,
        })
    }
}

/// Employee attributes joined with the cached manager name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeInfo<'a> {
    pub employee: &'a Employee,
    pub manager_name: &'a str,
}

#[derive(Debug, Clone, Default)]
pub struct EmployeeDirectory {
    id_to_name: BTreeMap<String, String>,
    name_to_id: BTreeMap<String, String>,
    employees: BTreeMap<String, Employee>,
    manager_names: BTreeMap<String, String>,
}

impl EmployeeDirectory {
    pub fn from_table(table: &Table) -> Self {
        let mut directory = Self::default();
        directory.load_from_table(table);
        directory
    }

    /// Index every well-formed row. A repeated ID replaces the earlier
    /// employee (last write wins). Manager names are resolved afterwards.
    pub fn load_from_table(&mut self, table: &Table) {
        for row in &table.rows {
            let Some(employee) = Employee::from_row(row) else {
                warn!("Skipping short employee row: {:?}", row);
                continue;
            };
            self.insert(employee);
        }
        self.resolve_manager_names();
        info!("Employee directory holds {} employees", self.employees.len());
    }

    fn insert(&mut self, employee: Employee) {
        if let Some(previous) = self.id_to_name.insert(employee.id.clone(), employee.name.clone()) {
            if previous != employee.name {
                warn!(
                    "Duplicate employee ID {}: '{}' replaces '{}'",
                    employee.id, employee.name, previous
                );
                // The old name may since have been claimed by another ID
                if self.name_to_id.get(&previous) == Some(&employee.id) {
                    self.name_to_id.remove(&previous);
                    self.employees.remove(&previous);
                }
            }
        }
        self.name_to_id.insert(employee.name.clone(), employee.id.clone());
        self.employees.insert(employee.name.clone(), employee);
    }

    fn resolve_manager_names(&mut self) {
        self.manager_names = self
            .employees
            .iter()
            .map(|(name, employee)| {
                let manager = employee
                    .manager_id
                    .as_ref()
                    .and_then(|id| self.id_to_name.get(id))
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_MANAGER.to_string());
                (name.clone(), manager)
            })
            .collect();
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn name_for_id(&self, id: &str) -> Option<&str> {
        self.id_to_name.get(id).map(String::as_str)
    }

    /// First employee whose name contains `query`
    pub fn find_by_partial_name(&self, query: &str) -> Option<&Employee> {
        first_match_entry(query, &self.employees).map(|(_, employee)| employee)
    }

    pub fn find_id_by_partial_name(&self, query: &str) -> Option<&str> {
        let name = first_match(query, self.name_to_id.keys().map(String::as_str))?;
        self.name_to_id.get(name).map(String::as_str)
    }

    /// Returns the matched employee's name and its manager's name
    pub fn resolve_manager_name(&self, query: &str) -> Option<(&str, &str)> {
        first_match_entry(query, &self.manager_names)
            .map(|(name, manager)| (name, manager.as_str()))
    }

    /// Exact lookup by lower-cased name
    pub fn attributes(&self, name: &str) -> Option<&Employee> {
        self.employees.get(&normalize(name))
    }

    pub fn employee_info(&self, query: &str) -> Option<EmployeeInfo<'_>> {
        let employee = self.find_by_partial_name(query)?;
        let manager_name = self
            .manager_names
            .get(&employee.name)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_MANAGER);
        Some(EmployeeInfo {
            employee,
            manager_name,
        })
    }

    /// All employee names, ascending
    pub fn all_names(&self) -> Vec<&str> {
        self.employees.keys().map(String::as_str).collect()
    }

    pub fn display_name(&self, id: &str) -> Option<String> {
        self.name_for_id(id).map(resolver::title_case)
    }
}
