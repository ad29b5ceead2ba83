//! Nutrition section: schema detection, template resolution and schema
//! migrations.

mod migrate;
mod resolve;
mod schema;

pub use migrate::{MigrationError, TargetVersion, migrate_to_v2, migrate_to_v3, slugify};
pub use resolve::{
    PLANNER_OVERRIDE_LABEL, ResolvedTemplate, resolve_nutrition, resolve_nutrition_for_date,
};
pub use schema::{NutritionSchema, SchemaGeneration};

use chrono::{NaiveDate, Weekday};
use serde::Serialize;
use serde_json::Value;

use crate::json::Object;
use crate::planner::PlannerDay;
use crate::section::Section;

pub const NO_NUTRITION_DOCUMENT: &str = "No nutrition.json found or it's empty.";
pub const UNRESOLVED_NUTRITION_MESSAGE: &str = "Nutrition data could not be parsed for today.";

/// Nutrition section of the daily plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionSummary {
    pub profile_name: String,
    pub plan_label: Option<String>,
    pub day_type_label: Option<String>,
    pub role: Value,
    pub calories: Value,
    pub macros: Value,
    pub meals: Value,
    pub notes: Value,
}

impl From<ResolvedTemplate> for NutritionSummary {
    fn from(template: ResolvedTemplate) -> Self {
        Self {
            profile_name: template.profile_name,
            plan_label: template.plan_label,
            day_type_label: template.day_type_label,
            role: template.role,
            calories: template.calories,
            macros: template.macros,
            meals: template.meals,
            notes: template.notes,
        }
    }
}

/// Resolve the nutrition section, honoring the planner's forced day type.
pub fn summarize_nutrition(
    nutrition: Option<&Object>,
    planner: Option<&PlannerDay<'_>>,
    weekday: Weekday,
    date: NaiveDate,
) -> Section<NutritionSummary> {
    let Some(doc) = nutrition.filter(|doc| !doc.is_empty()) else {
        return Section::absent(NO_NUTRITION_DOCUMENT);
    };
    let forced = planner.and_then(PlannerDay::nutrition_day_type);
    match resolve_nutrition(doc, weekday, date, forced) {
        Some(template) => Section::resolved(template.into()),
        None => Section::absent(UNRESOLVED_NUTRITION_MESSAGE),
    }
}
