//! Resolve today's nutrition template from any schema generation.
//!
//! Resolution order, first match wins:
//! 1. A planner-forced day type present in `day_types`.
//! 2. v3: active monthly plan date entry, then that month's base weekly
//!    plan, then the active weekly plan.
//! 3. v2: `weekly_pattern` entry for the weekday.
//! 4. Legacy per-weekday `days` entry.
//! 5. Legacy single template at the document root.
//!
//! Broken references (a pattern naming a day type that does not exist)
//! resolve to a template with empty numbers and a note naming the missing
//! id, so callers can point at the exact data problem.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::calendar::{iso_date, month_key, weekday_key, weekday_label};
use crate::json::{Object, get_object, get_or, get_or_null, get_set, get_str, get_text, is_set};
use crate::lookup::{DayLookup, MatchMode};

use super::schema::NutritionSchema;

/// Plan label reported when the planner forced the day type.
pub const PLANNER_OVERRIDE_LABEL: &str = "Planner override";

const DEFAULT_PROFILE_NAME: &str = "Nutrition plan";

/// Today's nutrition template, fully dereferenced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedTemplate {
    pub profile_name: String,
    pub plan_label: Option<String>,
    pub day_type_label: Option<String>,
    pub day_type_id: Option<String>,
    pub role: Value,
    pub calories: Value,
    pub macros: Value,
    pub meals: Value,
    pub notes: Value,
}

/// Resolve the nutrition template for `date`.
///
/// `weekday` is passed separately from `date` so callers can resolve a
/// weekday rotation independently of the calendar. Returns `None` only when
/// the document is empty or a v3 document has no plan covering the day.
pub fn resolve_nutrition(
    doc: &Object,
    weekday: Weekday,
    date: NaiveDate,
    forced_day_type_id: Option<&str>,
) -> Option<ResolvedTemplate> {
    if doc.is_empty() {
        return None;
    }
    let ctx = Resolver::new(doc, weekday, date);

    if let Some(forced) = forced_day_type_id {
        match get_object(doc, "day_types").and_then(|day_types| find_template(day_types, forced)) {
            Some((id, template)) => {
                debug!(day_type = id, "nutrition day type forced by planner");
                return Some(ctx.from_template(
                    template,
                    id,
                    Some(PLANNER_OVERRIDE_LABEL.to_owned()),
                ));
            }
            None => warn!(
                day_type = forced,
                "planner nutrition day type not found under day_types, ignoring"
            ),
        }
    }

    let schema = NutritionSchema::detect(doc);
    debug!(generation = %schema.generation(), "resolving nutrition template");
    match schema {
        NutritionSchema::DayTypePlans { day_types } => ctx.day_type_plans(day_types),
        NutritionSchema::WeeklyPattern {
            day_types,
            weekly_pattern,
        } => Some(ctx.weekly_pattern(day_types, weekly_pattern)),
        NutritionSchema::LegacyWeekdays { days } => Some(ctx.legacy_weekdays(days)),
        NutritionSchema::LegacySingle => Some(ctx.legacy_single()),
    }
}

/// Find a day type by id: exact key first, then case-insensitively.
/// Any object counts as a template, including `{}`.
fn find_template<'a>(day_types: &'a Object, id: &str) -> Option<(&'a str, &'a Object)> {
    let found = DayLookup::new(day_types).find(id, MatchMode::Key)?;
    Some((found.key, found.entry.as_object()?))
}

/// The day type id referenced by a pattern entry: `{"day_type": "id"}`, or
/// a bare `"id"` string.
fn day_type_ref(entry: &Value) -> Option<&str> {
    match entry {
        Value::String(id) if !id.is_empty() => Some(id),
        Value::Object(entry) => get_str(entry, "day_type"),
        _ => None,
    }
}

struct Resolver<'a> {
    doc: &'a Object,
    weekday: Weekday,
    date: NaiveDate,
    profile_name: String,
}

impl<'a> Resolver<'a> {
    fn new(doc: &'a Object, weekday: Weekday, date: NaiveDate) -> Self {
        let profile_name = get_text(doc, "profile_name")
            .or_else(|| get_text(doc, "template_name"))
            .unwrap_or_else(|| DEFAULT_PROFILE_NAME.to_owned());
        Self {
            doc,
            weekday,
            date,
            profile_name,
        }
    }

    fn from_template(&self, template: &Object, id: &str, plan_label: Option<String>) -> ResolvedTemplate {
        ResolvedTemplate {
            profile_name: self.profile_name.clone(),
            plan_label,
            day_type_label: get_text(template, "label").or_else(|| Some(id.to_owned())),
            day_type_id: Some(id.to_owned()),
            role: get_or_null(template, "role"),
            calories: get_or_null(template, "calories"),
            macros: get_or(template, "macros", json!({})),
            meals: get_or(template, "meals", json!([])),
            notes: get_or_null(self.doc, "notes"),
        }
    }

    /// A template with no numbers, explaining why.
    fn blank(&self, id: Option<&str>, plan_label: Option<String>, note: String) -> ResolvedTemplate {
        ResolvedTemplate {
            profile_name: self.profile_name.clone(),
            plan_label,
            day_type_label: id.map(str::to_owned),
            day_type_id: id.map(str::to_owned),
            role: Value::Null,
            calories: Value::Null,
            macros: json!({}),
            meals: json!([]),
            notes: Value::String(note),
        }
    }

    fn weekday_key(&self) -> &'static str {
        weekday_key(self.weekday)
    }

    // -------------------------------------------------------------------
    // v3
    // -------------------------------------------------------------------

    fn day_type_plans(&self, day_types: &Object) -> Option<ResolvedTemplate> {
        let (id, plan_label) = self
            .monthly_day_type()
            .or_else(|| {
                let active = get_str(self.doc, "active_weekly_plan");
                self.weekly_plan_day_type(active)
            })?;

        match find_template(day_types, &id) {
            Some((key, template)) => Some(self.from_template(template, key, Some(plan_label))),
            None => {
                warn!(day_type = %id, "plan references a day type missing from day_types");
                Some(self.blank(
                    Some(&id),
                    Some(plan_label),
                    format!("Plan references '{id}' but it was not found under day_types."),
                ))
            }
        }
    }

    /// Day type from the active monthly plan: the exact date entry, then
    /// the month's base weekly plan. The label is always the month's.
    fn monthly_day_type(&self) -> Option<(String, String)> {
        let month = month_key(self.date);
        if get_str(self.doc, "active_monthly_plan") != Some(month.as_str()) {
            return None;
        }
        let monthly = get_object(self.doc, "monthly_plans")
            .and_then(|plans| get_object(plans, &month))?;
        let label = get_text(monthly, "label").unwrap_or_else(|| format!("Monthly plan {month}"));

        let dated = get_object(monthly, "days")
            .and_then(|days| days.get(&iso_date(self.date)))
            .and_then(day_type_ref)
            .map(str::to_owned);
        let id = dated.or_else(|| {
            debug!(month = %month, "no dated entry, trying the month's base weekly plan");
            self.weekly_plan_day_type(get_str(monthly, "base_weekly_plan"))
                .map(|(id, _)| id)
        })?;
        Some((id, label))
    }

    /// Day type for today's weekday in `weekly_plans[plan_id].pattern`,
    /// labelled with the plan's label or id.
    fn weekly_plan_day_type(&self, plan_id: Option<&str>) -> Option<(String, String)> {
        let plan_id = plan_id?;
        let plan = get_object(self.doc, "weekly_plans").and_then(|plans| get_object(plans, plan_id))?;
        let pattern = get_object(plan, "pattern")?;
        let entry = DayLookup::new(pattern).find(self.weekday_key(), MatchMode::Key)?;
        let id = day_type_ref(entry.entry)?;
        let label = get_text(plan, "label").unwrap_or_else(|| plan_id.to_owned());
        Some((id.to_owned(), label))
    }

    // -------------------------------------------------------------------
    // v2
    // -------------------------------------------------------------------

    fn weekly_pattern(&self, day_types: &Object, pattern: &Object) -> ResolvedTemplate {
        let Some(entry) = DayLookup::new(pattern)
            .find(self.weekday_key(), MatchMode::Key)
            .map(|found| found.entry)
            .filter(|entry| is_set(entry))
        else {
            return self.blank(None, None, "No weekly pattern entry for this weekday.".into());
        };

        let Some(id) = day_type_ref(entry) else {
            return self.blank(
                None,
                None,
                format!(
                    "Weekly pattern entry for {} has no day_type.",
                    weekday_label(self.weekday)
                ),
            );
        };

        // An empty v2 template is as good as missing.
        match find_template(day_types, id).filter(|(_, template)| !template.is_empty()) {
            Some((key, template)) => self.from_template(template, key, None),
            None => {
                warn!(day_type = id, "weekly pattern references a day type missing from day_types");
                self.blank(
                    Some(id),
                    None,
                    format!("Weekly pattern references '{id}' but it was not found under day_types."),
                )
            }
        }
    }

    // -------------------------------------------------------------------
    // Legacy
    // -------------------------------------------------------------------

    fn legacy_weekdays(&self, days: &Object) -> ResolvedTemplate {
        let entry = DayLookup::new(days)
            .find(self.weekday_key(), MatchMode::Key)
            .and_then(|found| found.non_empty_object());
        let Some(entry) = entry else {
            return self.blank(
                None,
                None,
                format!(
                    "No specific nutrition defined for {} in 'days'.",
                    weekday_label(self.weekday)
                ),
            );
        };

        let day_type = get_text(entry, "day_type");
        ResolvedTemplate {
            profile_name: self.profile_name.clone(),
            plan_label: None,
            day_type_label: day_type
                .clone()
                .or_else(|| get_text(entry, "label"))
                .or_else(|| Some(weekday_label(self.weekday).to_owned())),
            day_type_id: day_type,
            role: get_or_null(entry, "role"),
            calories: get_set(entry, "calories")
                .cloned()
                .unwrap_or_else(|| get_or_null(self.doc, "default_calories")),
            macros: entry
                .get("macros")
                .cloned()
                .unwrap_or_else(|| get_or(self.doc, "default_macros", json!({}))),
            meals: get_or(entry, "meals", json!([])),
            notes: get_or_null(self.doc, "notes"),
        }
    }

    fn legacy_single(&self) -> ResolvedTemplate {
        ResolvedTemplate {
            profile_name: self.profile_name.clone(),
            plan_label: None,
            day_type_label: get_text(self.doc, "template_name")
                .or_else(|| Some(weekday_label(self.weekday).to_owned())),
            day_type_id: Some("default".to_owned()),
            role: get_or_null(self.doc, "role"),
            calories: get_or_null(self.doc, "calories"),
            macros: get_or(self.doc, "macros", json!({})),
            meals: get_or(self.doc, "meals", json!([])),
            notes: get_or_null(self.doc, "notes"),
        }
    }
}

/// Resolve using the weekday of `date` itself.
pub fn resolve_nutrition_for_date(
    doc: &Object,
    date: NaiveDate,
    forced_day_type_id: Option<&str>,
) -> Option<ResolvedTemplate> {
    resolve_nutrition(doc, date.weekday(), date, forced_day_type_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(value: Value) -> Object {
        value.as_object().cloned().unwrap()
    }

    fn nov(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, day).unwrap()
    }

    fn v3() -> Object {
        obj(json!({
            "version": 3,
            "profile_name": "Recomp",
            "notes": "Hydrate",
            "day_types": {
                "training_a": {"label": "Training A", "role": "training", "calories": 2800,
                               "macros": {"protein_g": 180, "carbs_g": 320, "fat_g": 70},
                               "meals": [{"time": "12:00", "name": "Lunch"}]},
                "rest_a": {"label": "Rest A", "role": "rest", "calories": 2200,
                           "macros": {"protein_g": 180, "carbs_g": 180, "fat_g": 80}, "meals": []}
            },
            "weekly_plans": {
                "base": {"label": "Base week", "pattern": {
                    "monday": {"day_type": "training_a"},
                    "tuesday": {"day_type": "rest_a"},
                    "wednesday": {"day_type": "training_a"}
                }},
                "deload": {"pattern": {"wednesday": {"day_type": "rest_a"}}}
            },
            "active_weekly_plan": "base",
            "monthly_plans": {
                "2025-11": {
                    "days": {"2025-11-05": {"day_type": "rest_a"}, "2025-11-12": {"day_type": "ghost"}},
                    "base_weekly_plan": "deload"
                }
            },
            "active_monthly_plan": "2025-11"
        }))
    }

    #[test]
    fn monthly_date_entry_beats_weekly_pattern() {
        let doc = v3();
        let resolved = resolve_nutrition(&doc, Weekday::Wed, nov(5), None).unwrap();
        assert_eq!(resolved.day_type_id.as_deref(), Some("rest_a"));
        assert_eq!(resolved.day_type_label.as_deref(), Some("Rest A"));
        assert_eq!(resolved.plan_label.as_deref(), Some("Monthly plan 2025-11"));
        assert_eq!(resolved.role, json!("rest"));
        assert_eq!(resolved.notes, json!("Hydrate"));
    }

    #[test]
    fn monthly_base_weekly_plan_fills_undated_days() {
        let doc = v3();
        let resolved = resolve_nutrition(&doc, Weekday::Wed, nov(19), None).unwrap();
        assert_eq!(resolved.day_type_id.as_deref(), Some("rest_a"));
        assert_eq!(resolved.plan_label.as_deref(), Some("Monthly plan 2025-11"));
    }

    #[test]
    fn active_weekly_plan_used_outside_active_month() {
        let doc = v3();
        let date = NaiveDate::from_ymd_opt(2025, 12, 3).unwrap();
        let resolved = resolve_nutrition(&doc, Weekday::Wed, date, None).unwrap();
        assert_eq!(resolved.day_type_id.as_deref(), Some("training_a"));
        assert_eq!(resolved.plan_label.as_deref(), Some("Base week"));
        assert_eq!(resolved.calories, json!(2800));
    }

    #[test]
    fn float_version_still_resolves_as_v3() {
        let mut doc = v3();
        doc.insert("version".into(), json!(3.0));
        let date = NaiveDate::from_ymd_opt(2025, 12, 3).unwrap();
        let resolved = resolve_nutrition(&doc, Weekday::Wed, date, None).unwrap();
        assert_eq!(resolved.day_type_id.as_deref(), Some("training_a"));
        assert_eq!(resolved.calories, json!(2800));
    }

    #[test]
    fn v3_without_plan_for_the_day_is_none() {
        let doc = v3();
        let date = NaiveDate::from_ymd_opt(2025, 12, 7).unwrap();
        assert!(resolve_nutrition(&doc, Weekday::Sun, date, None).is_none());
    }

    #[test]
    fn v3_dangling_reference_carries_note() {
        let doc = v3();
        let resolved = resolve_nutrition(&doc, Weekday::Wed, nov(12), None).unwrap();
        assert_eq!(resolved.day_type_label.as_deref(), Some("ghost"));
        assert_eq!(resolved.calories, Value::Null);
        assert!(resolved.notes.as_str().unwrap().contains("not found"));
    }

    #[test]
    fn planner_override_wins() {
        let doc = v3();
        let resolved = resolve_nutrition(&doc, Weekday::Wed, nov(5), Some("training_a")).unwrap();
        assert_eq!(resolved.day_type_id.as_deref(), Some("training_a"));
        assert_eq!(resolved.plan_label.as_deref(), Some(PLANNER_OVERRIDE_LABEL));
    }

    #[test]
    fn unknown_planner_override_is_ignored() {
        let doc = v3();
        let resolved = resolve_nutrition(&doc, Weekday::Wed, nov(5), Some("nope")).unwrap();
        assert_eq!(resolved.day_type_id.as_deref(), Some("rest_a"));
    }

    #[test]
    fn planner_override_accepts_empty_template() {
        let doc = obj(json!({
            "version": 2,
            "day_types": {"rest": {}, "lift": {"calories": 3000}},
            "weekly_pattern": {"monday": "lift"}
        }));
        let resolved = resolve_nutrition(&doc, Weekday::Mon, nov(3), Some("rest")).unwrap();
        assert_eq!(resolved.day_type_id.as_deref(), Some("rest"));
        assert_eq!(resolved.plan_label.as_deref(), Some(PLANNER_OVERRIDE_LABEL));
        assert_eq!(resolved.calories, Value::Null);
    }

    #[test]
    fn v3_plan_accepts_empty_template() {
        let doc = obj(json!({
            "version": 3,
            "day_types": {"off": {}},
            "weekly_plans": {"w": {"pattern": {"monday": "off"}}},
            "active_weekly_plan": "w"
        }));
        let resolved = resolve_nutrition(&doc, Weekday::Mon, nov(3), None).unwrap();
        assert_eq!(resolved.day_type_id.as_deref(), Some("off"));
        assert_eq!(resolved.notes, Value::Null);
    }

    #[test]
    fn v2_empty_template_counts_as_missing() {
        let doc = obj(json!({
            "version": 2,
            "day_types": {"rest": {}},
            "weekly_pattern": {"monday": "rest"}
        }));
        let resolved = resolve_nutrition(&doc, Weekday::Mon, nov(3), None).unwrap();
        let note = resolved.notes.as_str().unwrap();
        assert!(note.contains("'rest' but it was not found"), "{note}");
    }

    #[test]
    fn v2_resolves_weekly_pattern() {
        let doc = obj(json!({
            "version": 2,
            "profile_name": "Lean bulk",
            "day_types": {"lift": {"label": "Lift day", "calories": 3000, "macros": {}, "meals": []}},
            "weekly_pattern": {"Monday": {"day_type": "lift"}, "tuesday": "lift"}
        }));
        let monday = resolve_nutrition(&doc, Weekday::Mon, nov(3), None).unwrap();
        assert_eq!(monday.day_type_label.as_deref(), Some("Lift day"));
        assert_eq!(monday.calories, json!(3000));
        assert_eq!(monday.plan_label, None);

        let tuesday = resolve_nutrition(&doc, Weekday::Tue, nov(4), None).unwrap();
        assert_eq!(tuesday.day_type_id.as_deref(), Some("lift"));
    }

    #[test]
    fn v2_dangling_reference_names_missing_id() {
        let doc = obj(json!({
            "version": 2,
            "day_types": {"lift": {"calories": 3000}},
            "weekly_pattern": {"monday": {"day_type": "ghost"}}
        }));
        let resolved = resolve_nutrition(&doc, Weekday::Mon, nov(3), None).unwrap();
        assert_eq!(resolved.day_type_label.as_deref(), Some("ghost"));
        assert_eq!(resolved.calories, Value::Null);
        let note = resolved.notes.as_str().unwrap();
        assert!(note.contains("not found") && note.contains("ghost"), "{note}");
    }

    #[test]
    fn v2_missing_weekday_is_blank() {
        let doc = obj(json!({
            "version": 2,
            "day_types": {"lift": {"calories": 3000}},
            "weekly_pattern": {"monday": {"day_type": "lift"}}
        }));
        let resolved = resolve_nutrition(&doc, Weekday::Fri, nov(7), None).unwrap();
        assert_eq!(resolved.day_type_label, None);
        assert_eq!(resolved.macros, json!({}));
        assert_eq!(resolved.notes, json!("No weekly pattern entry for this weekday."));
    }

    #[test]
    fn legacy_weekdays_use_document_defaults() {
        let doc = obj(json!({
            "template_name": "Old plan",
            "default_calories": 2400,
            "default_macros": {"protein_g": 160},
            "days": {
                "Monday": {"day_type": "high", "calories": 2900, "meals": [{"name": "Oats"}]},
                "Tuesday": {"label": "Easy"}
            }
        }));
        let monday = resolve_nutrition(&doc, Weekday::Mon, nov(3), None).unwrap();
        assert_eq!(monday.profile_name, "Old plan");
        assert_eq!(monday.day_type_label.as_deref(), Some("high"));
        assert_eq!(monday.calories, json!(2900));
        assert_eq!(monday.macros, json!({"protein_g": 160}));

        let tuesday = resolve_nutrition(&doc, Weekday::Tue, nov(4), None).unwrap();
        assert_eq!(tuesday.day_type_label.as_deref(), Some("Easy"));
        assert_eq!(tuesday.day_type_id, None);
        assert_eq!(tuesday.calories, json!(2400));

        let sunday = resolve_nutrition(&doc, Weekday::Sun, nov(9), None).unwrap();
        assert_eq!(sunday.day_type_label, None);
        assert_eq!(sunday.notes, json!("No specific nutrition defined for Sunday in 'days'."));
    }

    #[test]
    fn legacy_single_template() {
        let doc = obj(json!({"calories": 2100, "macros": {"protein_g": 150}, "meals": []}));
        let resolved = resolve_nutrition_for_date(&doc, nov(3), None).unwrap();
        assert_eq!(resolved.profile_name, "Nutrition plan");
        assert_eq!(resolved.day_type_id.as_deref(), Some("default"));
        assert_eq!(resolved.day_type_label.as_deref(), Some("Monday"));
        assert_eq!(resolved.calories, json!(2100));
    }

    #[test]
    fn malformed_documents_never_panic() {
        let shapes = [
            json!({"version": 3, "day_types": {"a": 1}, "weekly_plans": [], "active_weekly_plan": 5}),
            json!({"version": 3, "day_types": {}, "monthly_plans": {"2025-11": []}, "active_monthly_plan": "2025-11"}),
            json!({"version": 3, "day_types": {"a": {}}, "weekly_plans": {"w": {"pattern": {"monday": 3}}}, "active_weekly_plan": "w"}),
            json!({"version": 2, "day_types": {"a": "x"}, "weekly_pattern": {"monday": {"day_type": "a"}}}),
            json!({"version": 2, "day_types": {}, "weekly_pattern": {"monday": [1, 2]}}),
            json!({"days": {"monday": "high"}}),
            json!({"days": {"monday": null}, "macros": 4}),
            json!({"version": "3", "calories": "lots"}),
        ];
        for shape in shapes {
            let doc = obj(shape);
            for day in 1..=30 {
                let date = nov(day);
                let _ = resolve_nutrition(&doc, date.weekday(), date, Some("a"));
                let _ = resolve_nutrition(&doc, date.weekday(), date, None);
            }
        }
    }

    #[test]
    fn empty_document_is_none() {
        assert!(resolve_nutrition(&Object::new(), Weekday::Mon, nov(3), None).is_none());
    }
}
