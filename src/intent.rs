//! Classified intent boundary
//!
//! The text classifier is an external service; this module only turns its
//! output into an (intent label, slot map) pair the dispatcher can route.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    GetManager,
    GetLeaveBalance,
    GetEmployeeInfo,
    ApplyLeave,
    CheckLeaveStatus,
    ScheduleReview,
    SubmitExpense,
    LookupColleague,
    Help,
    #[serde(other)]
    Unknown,
}

impl IntentKind {
    pub fn from_label(label: &str) -> Self {
        serde_json::from_value(Value::String(label.trim().to_lowercase()))
            .unwrap_or(IntentKind::Unknown)
    }

    pub fn as_label(&self) -> &'static str {
        match self {
            IntentKind::GetManager => "get_manager",
            IntentKind::GetLeaveBalance => "get_leave_balance",
            IntentKind::GetEmployeeInfo => "get_employee_info",
            IntentKind::ApplyLeave => "apply_leave",
            IntentKind::CheckLeaveStatus => "check_leave_status",
            IntentKind::ScheduleReview => "schedule_review",
            IntentKind::SubmitExpense => "submit_expense",
            IntentKind::LookupColleague => "lookup_colleague",
            IntentKind::Help => "help",
            IntentKind::Unknown => "unknown",
        }
    }
}

/// Slot names the classifier may fill
pub mod slots {
    pub const NAME: &str = "name";
    pub const TYPE: &str = "type";
    pub const START_DATE: &str = "start_date";
    pub const END_DATE: &str = "end_date";
    pub const REVIEWER: &str = "reviewer";
    pub const DATE: &str = "date";
    pub const CATEGORY: &str = "category";
    pub const AMOUNT: &str = "amount";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedIntent {
    pub kind: IntentKind,
    pub slots: HashMap<String, String>,
}

impl ClassifiedIntent {
    pub fn new(kind: IntentKind) -> Self {
        Self {
            kind,
            slots: HashMap::new(),
        }
    }

    pub fn with_slot(mut self, key: &str, value: impl Into<String>) -> Self {
        self.slots.insert(key.to_string(), value.into());
        self
    }

    pub fn unknown() -> Self {
        Self::new(IntentKind::Unknown)
    }

    /// Slot value, with empty strings treated as absent
    pub fn slot(&self, key: &str) -> Option<&str> {
        self.slots
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn slot_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.slot(key).unwrap_or(default)
    }

    /// Parse raw classifier text. Markdown fences and prose around the JSON
    /// object are tolerated; anything unparsable becomes `unknown`.
    pub fn from_classifier_output(text: &str) -> Self {
        let Some(json) = extract_json_object(text) else {
            warn!("No JSON object found in classifier output");
            return Self::unknown();
        };

        let object = match serde_json::from_str::<Value>(json) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!("Classifier output is not a JSON object");
                return Self::unknown();
            }
            Err(e) => {
                warn!("Failed to parse classifier output: {}", e);
                return Self::unknown();
            }
        };

        let kind = object
            .get("intent")
            .and_then(Value::as_str)
            .map(IntentKind::from_label)
            .unwrap_or(IntentKind::Unknown);

        let slots = object
            .into_iter()
            .filter(|(key, _)| key != "intent")
            .filter_map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s,
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    Value::Null => return None,
                    other => other.to_string(),
                };
                Some((key, value))
            })
            .collect();

        Self { kind, slots }
    }
}

fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        assert_eq!(IntentKind::from_label("apply_leave"), IntentKind::ApplyLeave);
        assert_eq!(IntentKind::from_label(" HELP "), IntentKind::Help);
        assert_eq!(IntentKind::from_label("book_flight"), IntentKind::Unknown);
        assert_eq!(IntentKind::ScheduleReview.as_label(), "schedule_review");
    }

    #[test]
    fn test_parse_fenced_output() {
        let raw = "```json\n{\"intent\":\"apply_leave\",\"name\":\"budi\",\"type\":\"sick\",\
                   \"start_date\":\"2025-10-03\",\"end_date\":\"2025-10-05\"}\n```";
        let intent = ClassifiedIntent::from_classifier_output(raw);
        assert_eq!(intent.kind, IntentKind::ApplyLeave);
        assert_eq!(intent.slot(slots::NAME), Some("budi"));
        assert_eq!(intent.slot(slots::END_DATE), Some("2025-10-05"));
        assert!(!intent.slots.contains_key("intent"));
    }

    #[test]
    fn test_numbers_become_strings_and_nulls_drop() {
        let raw = "Sure: {\"intent\":\"submit_expense\",\"amount\":150000,\"category\":null}";
        let intent = ClassifiedIntent::from_classifier_output(raw);
        assert_eq!(intent.kind, IntentKind::SubmitExpense);
        assert_eq!(intent.slot(slots::AMOUNT), Some("150000"));
        assert_eq!(intent.slot(slots::CATEGORY), None);
    }

    #[test]
    fn test_garbage_is_unknown() {
        assert_eq!(ClassifiedIntent::from_classifier_output("no json here"), ClassifiedIntent::unknown());
        assert_eq!(ClassifiedIntent::from_classifier_output("{not json}"), ClassifiedIntent::unknown());
    }

    #[test]
    fn test_empty_slot_uses_default() {
        let intent = ClassifiedIntent::new(IntentKind::ApplyLeave).with_slot(slots::TYPE, "  ");
        assert_eq!(intent.slot_or(slots::TYPE, "annual"), "annual");
    }
}
