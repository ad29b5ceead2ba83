//! Workout day resolution.
//!
//! Priority for today's workout:
//! 1. Planner `planned: true` with a `day_key`: that template day.
//! 2. Planner `planned: false`: forced rest, no weekday fallback.
//! 3. Otherwise the template day stored under today's weekday.
//!
//! A weekday missing from the template's `days` is an implicit rest day.

use chrono::Weekday;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::calendar::weekday_key;
use crate::json::{Object, get_object, get_or};
use crate::lookup::{DayLookup, DayMatch, MatchMode};
use crate::planner::{PlannerDay, WorkoutDirective};
use crate::section::Section;

/// Source label reported for a planner-forced rest day.
pub const PLANNER_REST_SOURCE: &str = "Planner marked rest/off";

pub const NO_WORKOUT_DOCUMENT: &str = "No workout.json found or it's empty.";
pub const PLANNER_REST_MESSAGE: &str = "Planner marked today as rest/off.";
pub const REST_DAY_MESSAGE: &str = "No workout scheduled for today (likely a rest day).";

/// Workout section of the daily plan.
///
/// Serializes as `{"planned": true, "focus", "exercises", "source"}`,
/// `{"planned": false, "source": "Planner marked rest/off"}` or
/// `{"planned": false}`.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkoutSummary {
    Scheduled {
        focus: Value,
        exercises: Value,
        /// Key of the template day used, or `Planner (<key>)` when the
        /// planner picked it.
        source: Option<String>,
    },
    PlannerRest,
    Rest,
}

impl WorkoutSummary {
    pub fn is_planned(&self) -> bool {
        matches!(self, Self::Scheduled { .. })
    }

    pub fn source(&self) -> Option<&str> {
        match self {
            Self::Scheduled { source, .. } => source.as_deref(),
            Self::PlannerRest => Some(PLANNER_REST_SOURCE),
            Self::Rest => None,
        }
    }
}

impl Serialize for WorkoutSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scheduled {
                focus,
                exercises,
                source,
            } => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("planned", &true)?;
                map.serialize_entry("focus", focus)?;
                map.serialize_entry("exercises", exercises)?;
                map.serialize_entry("source", source)?;
                map.end()
            }
            Self::PlannerRest => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("planned", &false)?;
                map.serialize_entry("source", PLANNER_REST_SOURCE)?;
                map.end()
            }
            Self::Rest => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("planned", &false)?;
                map.end()
            }
        }
    }
}

/// Resolve today's workout from the template, honoring planner overrides.
pub fn resolve_workout(
    workout: Option<&Object>,
    planner: Option<&PlannerDay<'_>>,
    weekday: Weekday,
) -> Section<WorkoutSummary> {
    let Some(workout) = workout.filter(|doc| !doc.is_empty()) else {
        return Section::absent(NO_WORKOUT_DOCUMENT);
    };
    let days = get_object(workout, "days").map(DayLookup::new);

    let directive = planner.map_or(WorkoutDirective::Unspecified, PlannerDay::workout);
    let mut picked: Option<(DayMatch<'_>, String)> = None;

    match directive {
        WorkoutDirective::Rest => {
            debug!("planner forces rest day");
            return Section::noted(WorkoutSummary::PlannerRest, PLANNER_REST_MESSAGE);
        }
        WorkoutDirective::Train { day_key } => {
            match days.and_then(|d| d.find(day_key, MatchMode::Key)) {
                Some(found) => picked = Some((found, format!("Planner ({})", found.key))),
                None => warn!(
                    day_key,
                    "planner workout day_key not found in template, using weekday"
                ),
            }
        }
        WorkoutDirective::Unspecified => {}
    }

    if picked.is_none() {
        picked = days
            .and_then(|d| d.find(weekday_key(weekday), MatchMode::Key))
            .map(|found| (found, found.key.to_owned()));
    }

    match picked.and_then(|(found, source)| Some((found.non_empty_object()?, source))) {
        Some((entry, source)) => Section::resolved(WorkoutSummary::Scheduled {
            focus: get_or(entry, "focus", json!("Unknown")),
            exercises: get_or(entry, "exercises", json!([])),
            source: Some(source),
        }),
        None => Section::noted(WorkoutSummary::Rest, REST_DAY_MESSAGE),
    }
}
