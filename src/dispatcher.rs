//! Command Dispatcher
//!
//! Routes a classified intent to the store operation it names and renders
//! the outcome as a reply. This is the only component aware of intent labels.

use crate::dates::parse_iso;
use crate::error::{HrError, Result};
use crate::intent::{slots, ClassifiedIntent, IntentKind};
use crate::journal::Persistence;
use crate::resolver::title_case;
use crate::review_journal::ReviewOutcome;
use crate::store::HrStore;
use serde::Serialize;
use tracing::{debug, warn};

pub const DEFAULT_LEAVE_TYPE: &str = "annual";
pub const DEFAULT_REVIEWER: &str = "Manager";
pub const DEFAULT_EXPENSE_CATEGORY: &str = "other";

const INVALID_DATE_MESSAGE: &str = "Invalid date format. Use YYYY-MM-DD.";
const INVALID_AMOUNT_MESSAGE: &str = "Invalid expense amount.";
const UNRECOGNIZED_MESSAGE: &str = "Sorry, I don't know how to handle that request yet.";

const HELP_TEXT: &str = "HR Agent requests:
- who is the manager of <name>
- leave balance <name>
- <type> leave balance <name>
- info <name>
- apply <type> leave for <name> from <YYYY-MM-DD> to <YYYY-MM-DD>
- leave status <name>
- schedule performance review for <name> with <reviewer> on <YYYY-MM-DD>
- submit expense <name> <category> <amount>
- colleague info <name>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    Answer,
    NotFound,
    /// Input failed validation or a required record could not be resolved
    Rejected,
    /// A journal record was created; `persisted` is false when the write failed
    Confirmed { persisted: bool },
    /// Accepted without any record being written
    Acknowledged,
    Help,
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub kind: ReplyKind,
    pub text: String,
}

impl Reply {
    fn new(kind: ReplyKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    fn answer(text: impl Into<String>) -> Self {
        Self::new(ReplyKind::Answer, text)
    }

    fn not_found(text: impl Into<String>) -> Self {
        Self::new(ReplyKind::NotFound, text)
    }

    fn rejected(text: impl Into<String>) -> Self {
        Self::new(ReplyKind::Rejected, text)
    }

    fn confirmed(persistence: &Persistence, text: impl Into<String>) -> Self {
        Self::new(
            ReplyKind::Confirmed {
                persisted: persistence.is_persisted(),
            },
            text,
        )
    }
}

pub struct CommandDispatcher {
    store: HrStore,
}

impl CommandDispatcher {
    pub fn new(store: HrStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &HrStore {
        &self.store
    }

    pub fn execute(&mut self, intent: &ClassifiedIntent) -> Reply {
        debug!("Dispatching {} with {:?}", intent.kind.as_label(), intent.slots);
        let name = intent.slot_or(slots::NAME, "");

        match intent.kind {
            IntentKind::GetManager => self.get_manager(name),
            IntentKind::GetLeaveBalance => match intent.slot(slots::TYPE) {
                Some(leave_type) => self.get_leave_by_type(name, leave_type),
                None => self.get_leave_balance(name),
            },
            IntentKind::GetEmployeeInfo => self.get_employee_info(name),
            IntentKind::ApplyLeave => self.apply_leave(intent),
            IntentKind::CheckLeaveStatus => self.check_leave_status(name),
            IntentKind::ScheduleReview => self.schedule_review(intent),
            IntentKind::SubmitExpense => self.submit_expense(intent),
            IntentKind::LookupColleague => self.lookup_colleague(name),
            IntentKind::Help => Reply::new(ReplyKind::Help, HELP_TEXT),
            IntentKind::Unknown => Reply::new(ReplyKind::Unrecognized, UNRECOGNIZED_MESSAGE),
        }
    }

    fn get_manager(&self, name: &str) -> Reply {
        match self.store.directory.resolve_manager_name(name) {
            Some((employee, manager)) => Reply::answer(format!(
                "The manager of {} is {}.",
                title_case(employee),
                title_case(manager)
            )),
            None => Reply::not_found(format!("No manager data found for {}.", display(name))),
        }
    }

    fn get_leave_balance(&self, name: &str) -> Reply {
        let Some((employee, balances)) = self.store.balances.balances_for(name) else {
            return Reply::not_found(format!("Leave data for {} was not found.", display(name)));
        };

        let mut text = format!("Remaining leave for {}:", title_case(employee));
        for (leave_type, days) in balances {
            text.push_str(&format!("\n- {} leave: {} days", title_case(leave_type), days));
        }
        Reply::answer(text)
    }

    fn get_leave_by_type(&self, name: &str, leave_type: &str) -> Reply {
        let Some((employee, _)) = self.store.balances.balances_for(name) else {
            return Reply::not_found(format!("Employee named {} was not found.", display(name)));
        };

        match self.store.balances.balance_for_type(name, leave_type) {
            Some(days) => Reply::answer(format!(
                "Remaining {} leave for {} is {} days.",
                title_case(leave_type),
                title_case(employee),
                days
            )),
            None => Reply::not_found(format!(
                "No {} leave data found for {}.",
                title_case(leave_type),
                title_case(employee)
            )),
        }
    }

    fn employee_card(&self, name: &str) -> Option<String> {
        let info = self.store.directory.employee_info(name)?;
        let employee = info.employee;
        Some(format!(
            "Employee information:\n\
             Name: {}\n\
             Title: {}\n\
             Department: {}\n\
             Email: {}\n\
             Status: {}\n\
             Join date: {}\n\
             Manager: {}",
            title_case(&employee.name),
            or_dash(&employee.title),
            or_dash(&employee.department),
            or_dash(&employee.email),
            or_dash(&employee.status),
            or_dash(&employee.join_date),
            title_case(info.manager_name)
        ))
    }

    fn get_employee_info(&self, name: &str) -> Reply {
        match self.employee_card(name) {
            Some(card) => Reply::answer(card),
            None => Reply::not_found(format!("Employee named {} was not found.", display(name))),
        }
    }

    fn lookup_colleague(&self, name: &str) -> Reply {
        match self.employee_card(name) {
            Some(card) => Reply::answer(card),
            None => Reply::not_found(format!(
                "Colleague named {} was not found in the directory.",
                display(name)
            )),
        }
    }

    fn check_leave_status(&self, name: &str) -> Reply {
        match self.store.leave_requests.status_for(name) {
            Some((employee, status)) => Reply::answer(format!(
                "The latest leave request status for {} is: {}.",
                title_case(employee),
                status
            )),
            None => Reply::not_found(format!("No leave request data for {}.", display(name))),
        }
    }

    fn apply_leave(&mut self, intent: &ClassifiedIntent) -> Reply {
        let Some(name) = intent.slot(slots::NAME) else {
            return Reply::rejected("Please provide the name of the employee applying for leave.");
        };
        let leave_type = intent.slot_or(slots::TYPE, DEFAULT_LEAVE_TYPE);

        let dates = parse_iso(intent.slot_or(slots::START_DATE, ""))
            .and_then(|start| Ok((start, parse_iso(intent.slot_or(slots::END_DATE, ""))?)));
        let (start, end) = match dates {
            Ok(dates) => dates,
            Err(e) => {
                debug!("Rejecting leave application: {}", e);
                return Reply::rejected(INVALID_DATE_MESSAGE);
            }
        };
        if end < start {
            return Reply::rejected("The end date must not be before the start date.");
        }

        let store = &mut self.store;
        match store.leave_requests.append(
            &store.directory,
            &title_case(name),
            &title_case(leave_type),
            start,
            end,
        ) {
            Ok(application) => Reply::confirmed(&application.persistence, application.confirmation),
            Err(e) => {
                warn!("Leave application failed: {}", e);
                Reply::rejected(format!("Could not record the leave request: {}.", e))
            }
        }
    }

    fn schedule_review(&mut self, intent: &ClassifiedIntent) -> Reply {
        let Some(name) = intent.slot(slots::NAME) else {
            return Reply::rejected("Please provide the name of the employee to review.");
        };
        let reviewer = intent.slot_or(slots::REVIEWER, DEFAULT_REVIEWER);
        let date = match parse_iso(intent.slot_or(slots::DATE, "")) {
            Ok(date) => date,
            Err(_) => return Reply::rejected(INVALID_DATE_MESSAGE),
        };

        let store = &mut self.store;
        match store
            .reviews
            .append(&store.directory, &title_case(name), &title_case(reviewer), date)
        {
            Ok(ReviewOutcome::Scheduled(scheduled)) => {
                Reply::confirmed(&scheduled.persistence, scheduled.confirmation)
            }
            Ok(ReviewOutcome::EmployeeNotFound) => {
                Reply::rejected("Could not schedule the review: employee not found.")
            }
            Ok(ReviewOutcome::ReviewerNotFound) => {
                Reply::rejected("Could not schedule the review: reviewer not found.")
            }
            Err(e) => {
                warn!("Review scheduling failed: {}", e);
                Reply::rejected(format!("Could not schedule the review: {}.", e))
            }
        }
    }

    fn submit_expense(&self, intent: &ClassifiedIntent) -> Reply {
        let name = intent.slot_or(slots::NAME, "");
        let category = intent.slot_or(slots::CATEGORY, DEFAULT_EXPENSE_CATEGORY);
        let amount = match parse_amount(intent.slot_or(slots::AMOUNT, "0")) {
            Ok(amount) => amount,
            Err(_) => return Reply::rejected(INVALID_AMOUNT_MESSAGE),
        };

        Reply::new(
            ReplyKind::Acknowledged,
            format!(
                "CONFIRMED: Expense report for {} of {:.2} (category: {}) has been submitted.",
                display(name),
                amount,
                category
            ),
        )
    }
}

/// Non-negative, finite amount
pub fn parse_amount(s: &str) -> Result<f64> {
    match s.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
        _ => Err(HrError::InvalidAmount(s.to_string())),
    }
}

fn display(name: &str) -> String {
    let name = title_case(name);
    if name.is_empty() {
        "-".to_string()
    } else {
        name
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
