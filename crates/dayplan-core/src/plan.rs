//! Daily plan assembly.
//!
//! Each section is resolved independently from its own document; a missing
//! or malformed document only nulls its own section and leaves a message
//! explaining why.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::biometrics::{BiometricsSummary, summarize_biometrics};
use crate::calendar::weekday_key;
use crate::document::{DocumentKind, DocumentLoader, DocumentSet};
use crate::nutrition::{NutritionSummary, summarize_nutrition};
use crate::planner::{PlannerSummary, load_planner_entry, summarize_planner};
use crate::supplements::{SupplementSummary, resolve_supplements};
use crate::workout::{WorkoutSummary, resolve_workout};

pub const NO_PLANNER_ENTRY_MESSAGE: &str =
    "No planner entry for this date or planner.json missing.";

/// Why each section is null or carries a caveat.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Messages {
    pub planner: Option<String>,
    pub biometrics: Option<String>,
    pub workout: Option<String>,
    pub nutrition: Option<String>,
    pub supplements: Option<String>,
}

impl Messages {
    /// Messages in section order, skipping sections without one.
    pub fn iter(&self) -> impl Iterator<Item = (DocumentKind, &str)> {
        [
            (DocumentKind::Planner, &self.planner),
            (DocumentKind::Biometrics, &self.biometrics),
            (DocumentKind::Workout, &self.workout),
            (DocumentKind::Nutrition, &self.nutrition),
            (DocumentKind::Supplements, &self.supplements),
        ]
        .into_iter()
        .filter_map(|(kind, message)| Some((kind, message.as_deref()?)))
    }
}

/// Everything scheduled for one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPlan {
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub planner: Option<PlannerSummary>,
    pub biometrics: Option<BiometricsSummary>,
    pub workout: Option<WorkoutSummary>,
    pub nutrition: Option<NutritionSummary>,
    pub supplements: Option<SupplementSummary>,
    pub messages: Messages,
}

/// Resolve the plan for `date` from already-loaded documents.
pub fn daily_plan(documents: &DocumentSet, date: NaiveDate) -> DailyPlan {
    let weekday = date.weekday();
    let planner_doc = documents.get(DocumentKind::Planner);
    let planner_day = planner_doc.and_then(|doc| load_planner_entry(doc, date));
    debug!(%date, planner = planner_day.is_some(), "assembling daily plan");

    let mut messages = Messages::default();

    let planner = match (planner_day.as_ref(), planner_doc) {
        (Some(day), Some(doc)) => Some(summarize_planner(day, doc)),
        _ => {
            messages.planner = Some(NO_PLANNER_ENTRY_MESSAGE.to_owned());
            None
        }
    };

    let (biometrics, message) =
        summarize_biometrics(documents.get(DocumentKind::Biometrics)).into_parts();
    messages.biometrics = message;

    let (workout, message) = resolve_workout(
        documents.get(DocumentKind::Workout),
        planner_day.as_ref(),
        weekday,
    )
    .into_parts();
    messages.workout = message;

    let (nutrition, message) = summarize_nutrition(
        documents.get(DocumentKind::Nutrition),
        planner_day.as_ref(),
        weekday,
        date,
    )
    .into_parts();
    messages.nutrition = message;

    let (supplements, message) = resolve_supplements(
        documents.get(DocumentKind::Supplements),
        planner_day.as_ref(),
        weekday,
    )
    .into_parts();
    messages.supplements = message;

    DailyPlan {
        date,
        weekday: weekday_key(weekday),
        planner,
        biometrics,
        workout,
        nutrition,
        supplements,
        messages,
    }
}

/// Load whatever documents `loader` can supply and resolve the plan.
pub fn daily_plan_from<L: DocumentLoader + ?Sized>(loader: &L, date: NaiveDate) -> DailyPlan {
    daily_plan(&loader.load_available(), date)
}
