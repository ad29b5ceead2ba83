//! Month-scoped planner overrides.
//!
//! A planner document pins individual calendar dates to a specific workout
//! day, nutrition day type or supplement day type:
//!
//! ```json
//! {
//!   "version": 2,
//!   "month": "2025-11",
//!   "label": "November block",
//!   "days": {
//!     "2025-11-05": {
//!       "weekday": "wednesday",
//!       "day_role": "training",
//!       "workout": { "planned": true, "day_key": "monday" },
//!       "nutrition": { "day_type_id": "training_heavy" },
//!       "supplements": { "day_type_id": "training" }
//!     }
//!   }
//! }
//! ```
//!
//! The document only applies when its `version` is 2 and its `month` equals
//! the target date's `YYYY-MM`; otherwise it is ignored entirely.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::calendar::{iso_date, month_key};
use crate::json::{Object, get_object, get_or_null, get_str, get_text, is_set, version};

/// The only planner schema version the engine understands.
pub const PLANNER_VERSION: u64 = 2;

/// What the planner says about today's workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkoutDirective<'a> {
    /// Train using the workout template day stored under `day_key`.
    Train { day_key: &'a str },
    /// Explicit rest/off day; weekday fallback is suppressed.
    Rest,
    /// The planner has no usable workout instruction.
    Unspecified,
}

/// The planner entry for one date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerDay<'a> {
    entry: &'a Object,
}

impl<'a> PlannerDay<'a> {
    pub fn new(entry: &'a Object) -> Self {
        Self { entry }
    }

    pub fn entry(&self) -> &'a Object {
        self.entry
    }

    /// Interpret the entry's `workout` block.
    ///
    /// `planned: true` only counts with a non-empty `day_key`; `planned:
    /// false` must be the literal boolean to force a rest day.
    pub fn workout(&self) -> WorkoutDirective<'a> {
        let Some(workout) = get_object(self.entry, "workout") else {
            return WorkoutDirective::Unspecified;
        };
        match workout.get("planned") {
            Some(Value::Bool(false)) => WorkoutDirective::Rest,
            Some(planned) if is_set(planned) => match get_str(workout, "day_key") {
                Some(day_key) => WorkoutDirective::Train { day_key },
                None => WorkoutDirective::Unspecified,
            },
            _ => WorkoutDirective::Unspecified,
        }
    }

    /// Forced nutrition day type id, if any.
    pub fn nutrition_day_type(&self) -> Option<&'a str> {
        self.forced_day_type("nutrition")
    }

    /// Forced supplement day type id, if any.
    pub fn supplement_day_type(&self) -> Option<&'a str> {
        self.forced_day_type("supplements")
    }

    fn forced_day_type(&self, section: &str) -> Option<&'a str> {
        get_str(get_object(self.entry, section)?, "day_type_id")
    }
}

/// Return the planner entry for `date`, or `None` when the planner does
/// not apply to that date.
///
/// Requires `version == 2`, `month` equal to the date's `YYYY-MM`, and an
/// object stored under the exact ISO date key.
pub fn load_planner_entry(planner: &Object, date: NaiveDate) -> Option<PlannerDay<'_>> {
    if version(planner) != Some(PLANNER_VERSION) {
        debug!(version = ?planner.get("version"), "planner version not supported, ignoring");
        return None;
    }

    let month = month_key(date);
    if get_str(planner, "month") != Some(month.as_str()) {
        debug!(
            planner_month = ?planner.get("month"),
            target_month = %month,
            "planner covers a different month, ignoring"
        );
        return None;
    }

    let entry = get_object(planner, "days")?
        .get(&iso_date(date))?
        .as_object()?;
    Some(PlannerDay::new(entry))
}

/// Planner section of the daily plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannerSummary {
    pub label: Option<String>,
    pub day_role: Value,
    pub notes: Value,
    pub workout: Value,
    pub nutrition: Value,
    pub supplements: Value,
}

/// Summarize today's planner entry, labelled from the planner document.
pub fn summarize_planner(day: &PlannerDay<'_>, planner: &Object) -> PlannerSummary {
    let entry = day.entry();
    PlannerSummary {
        label: get_text(planner, "label").or_else(|| get_text(planner, "profile_name")),
        day_role: get_or_null(entry, "day_role"),
        notes: get_or_null(entry, "notes"),
        workout: get_or_null(entry, "workout"),
        nutrition: get_or_null(entry, "nutrition"),
        supplements: get_or_null(entry, "supplements"),
    }
}
