//! Supplement day resolution.
//!
//! Two stored layouts exist. The current one keys a weekly protocol by
//! weekday, each entry tagged with a `day_type`:
//!
//! ```json
//! { "template_name": "Base stack",
//!   "days": { "monday": { "day_type": "training", "on": true, "protocol": [...] } } }
//! ```
//!
//! The legacy layout is a single flat `protocol` list used every day.

use std::fmt;

use chrono::Weekday;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::calendar::weekday_key;
use crate::json::{Object, get_object, get_or, get_or_null, get_text, is_set};
use crate::lookup::{DayLookup, MatchMode};
use crate::planner::PlannerDay;
use crate::section::Section;

pub const NO_SUPPLEMENTS_DOCUMENT: &str = "No supplements.json found or it's empty.";
pub const NO_DAY_ENTRY_MESSAGE: &str =
    "No specific supplement plan defined for this weekday in 'days'.";
pub const NO_PROTOCOL_MESSAGE: &str = "No protocol entries found.";

const UNNAMED_TEMPLATE: &str = "Unnamed template";

/// Supplements section of the daily plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplementSummary {
    pub template_name: String,
    pub day_type: Value,
    pub on: Value,
    pub protocol: Value,
    pub notes: Value,
}

/// Stored layout of a supplements document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SupplementLayout<'a> {
    /// Weekly protocol keyed by weekday.
    ByDay(&'a Object),
    /// Single `protocol` list applied every day.
    Flat,
}

impl<'a> SupplementLayout<'a> {
    pub fn detect(doc: &'a Object) -> Self {
        match get_object(doc, "days") {
            Some(days) => Self::ByDay(days),
            None => Self::Flat,
        }
    }
}

impl fmt::Display for SupplementLayout<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByDay(days) => write!(f, "weekly protocol ({} days)", days.len()),
            Self::Flat => f.write_str("flat protocol"),
        }
    }
}

/// Resolve today's supplement protocol.
///
/// With a by-day layout, the planner's forced day type is tried first (it
/// may match a key or an entry's `day_type`), then today's weekday.
pub fn resolve_supplements(
    supplements: Option<&Object>,
    planner: Option<&PlannerDay<'_>>,
    weekday: Weekday,
) -> Section<SupplementSummary> {
    let Some(doc) = supplements.filter(|doc| !doc.is_empty()) else {
        return Section::absent(NO_SUPPLEMENTS_DOCUMENT);
    };
    let template_name = get_text(doc, "template_name").unwrap_or_else(|| UNNAMED_TEMPLATE.into());
    let forced = planner.and_then(PlannerDay::supplement_day_type);

    match SupplementLayout::detect(doc) {
        SupplementLayout::ByDay(days) => {
            let lookup = DayLookup::new(days);
            let forced_entry = forced
                .and_then(|id| lookup.find(id, MatchMode::KeyOrDayType))
                .and_then(|found| found.non_empty_object());
            if forced.is_some() && forced_entry.is_none() {
                debug!(day_type = ?forced, "planner supplement day type not matched, using weekday");
            }
            let entry = forced_entry.or_else(|| {
                lookup
                    .find(weekday_key(weekday), MatchMode::Key)
                    .and_then(|found| found.non_empty_object())
            });

            match entry {
                Some(entry) => Section::resolved(SupplementSummary {
                    template_name,
                    day_type: get_or(entry, "day_type", json!(forced.unwrap_or("unknown"))),
                    on: get_or(entry, "on", json!(true)),
                    protocol: get_or(entry, "protocol", json!([])),
                    notes: get_or_null(entry, "notes"),
                }),
                None => Section::noted(
                    SupplementSummary {
                        template_name,
                        day_type: Value::Null,
                        on: Value::Null,
                        protocol: json!([]),
                        notes: Value::Null,
                    },
                    NO_DAY_ENTRY_MESSAGE,
                ),
            }
        }
        SupplementLayout::Flat => {
            let protocol = get_or(doc, "protocol", json!([]));
            let summary = SupplementSummary {
                template_name,
                day_type: Value::Null,
                on: Value::Null,
                notes: get_or_null(doc, "notes"),
                protocol,
            };
            if is_set(&summary.protocol) {
                Section::resolved(summary)
            } else {
                Section::noted(summary, NO_PROTOCOL_MESSAGE)
            }
        }
    }
}
