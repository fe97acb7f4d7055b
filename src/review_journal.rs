//! Performance Review Journal
//!
//! Append-only CSV log of scheduled reviews. Nothing is indexed in memory;
//! only the existing review IDs are read back so new ones do not collide.

use crate::dates::{journal_date, weekday_long_date};
use crate::directory::EmployeeDirectory;
use crate::error::Result;
use crate::ids::IdGenerator;
use crate::journal::{append_record, Persistence};
use crate::loader::load_quoted_table;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const PERFORMANCE_REVIEW_PREFIX: &str = "PR";
pub const STATUS_SCHEDULED: &str = "Scheduled";
/// Fixed value of the unused numeric column
pub const SCORE_PLACEHOLDER: &str = "0";

const HEADER: [&str; 6] = ["review_id", "employee_id", "reviewer_id", "date", "score", "status"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerformanceReview {
    pub review_id: String,
    pub employee_id: String,
    pub reviewer_id: String,
    /// `M/D/YYYY`
    pub date: String,
    pub score: String,
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct ScheduledReview {
    pub review: PerformanceReview,
    pub confirmation: String,
    pub persistence: Persistence,
}

/// Scheduling outcome; the two unresolved sides stay distinguishable
#[derive(Debug, Clone)]
pub enum ReviewOutcome {
    Scheduled(ScheduledReview),
    EmployeeNotFound,
    ReviewerNotFound,
}

pub struct PerformanceReviewJournal {
    path: PathBuf,
    ids: IdGenerator,
}

impl PerformanceReviewJournal {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_ids(path, IdGenerator::new(PERFORMANCE_REVIEW_PREFIX))
    }

    pub fn with_ids(path: impl Into<PathBuf>, mut ids: IdGenerator) -> Self {
        let path = path.into();
        if path.exists() {
            let table = load_quoted_table(&path, 1);
            ids.reserve(table.rows.into_iter().filter_map(|row| row.into_iter().next()));
        }
        Self { path, ids }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Schedule a review. Both names must resolve; the employee is checked
    /// first. A failed write is logged and reported through `persistence`.
    pub fn append(
        &mut self,
        directory: &EmployeeDirectory,
        employee_query: &str,
        reviewer_query: &str,
        date: NaiveDate,
    ) -> Result<ReviewOutcome> {
        let Some(employee_id) = directory.find_id_by_partial_name(employee_query) else {
            warn!("Review requested for unknown employee '{}'", employee_query);
            return Ok(ReviewOutcome::EmployeeNotFound);
        };
        let Some(reviewer_id) = directory.find_id_by_partial_name(reviewer_query) else {
            warn!("Review requested with unknown reviewer '{}'", reviewer_query);
            return Ok(ReviewOutcome::ReviewerNotFound);
        };

        let review = PerformanceReview {
            review_id: self.ids.next_id()?,
            employee_id: employee_id.to_string(),
            reviewer_id: reviewer_id.to_string(),
            date: journal_date(date),
            score: SCORE_PLACEHOLDER.to_string(),
            status: STATUS_SCHEDULED.to_string(),
        };

        let persistence = match append_record(&self.path, &HEADER, &review) {
            Ok(()) => Persistence::Persisted,
            Err(e) => {
                warn!("Failed to save performance review {}: {}", review.review_id, e);
                Persistence::NotPersisted {
                    reason: e.to_string(),
                }
            }
        };

        let confirmation = format!(
            "CONFIRMED: Performance review for {} with {} has been scheduled on {}.",
            employee_query,
            reviewer_query,
            weekday_long_date(date)
        );

        Ok(ReviewOutcome::Scheduled(ScheduledReview {
            review,
            confirmation,
            persistence,
        }))
    }
}
