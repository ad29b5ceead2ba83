//! Biometrics profile pass-through.

use serde::Serialize;
use serde_json::Value;

use crate::json::{Object, get_object, get_or_null};
use crate::section::Section;

pub const NO_BIOMETRICS_DOCUMENT: &str = "No biometrics.json found or it's empty.";

/// Biometrics section of the daily plan, renamed from the stored profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BiometricsSummary {
    pub sex: Value,
    pub age: Value,
    pub height_cm: Value,
    pub weight_kg: Value,
    pub goal: Value,
    pub weekly_change_target: Value,
    pub activity_level: Value,
    pub training_days_per_week: Value,
    pub notes: Value,
}

pub fn summarize_biometrics(biometrics: Option<&Object>) -> Section<BiometricsSummary> {
    let Some(doc) = biometrics.filter(|doc| !doc.is_empty()) else {
        return Section::absent(NO_BIOMETRICS_DOCUMENT);
    };
    let activity = get_object(doc, "activity_pattern");
    let activity_field =
        |key: &str| activity.map_or(Value::Null, |activity| get_or_null(activity, key));

    Section::resolved(BiometricsSummary {
        sex: get_or_null(doc, "sex"),
        age: get_or_null(doc, "age"),
        height_cm: get_or_null(doc, "height_cm"),
        weight_kg: get_or_null(doc, "current_weight_kg"),
        goal: get_or_null(doc, "goal"),
        weekly_change_target: get_or_null(doc, "weekly_weight_change_target_kg"),
        activity_level: activity_field("job_activity"),
        training_days_per_week: activity_field("training_days_per_week"),
        notes: get_or_null(doc, "notes"),
    })
}
