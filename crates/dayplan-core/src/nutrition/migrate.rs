//! Upgrade legacy nutrition documents to the day-type schemas.
//!
//! Migrations never touch the source document; they return a new one for
//! the caller to review and store alongside it.

use serde_json::{Value, json};
use thiserror::Error;

use crate::calendar::{WEEKDAYS, weekday_key};
use crate::json::{Object, get_object, get_set, get_text, version};
use crate::lookup::normalize_key;

const DEFAULT_PROFILE_NAME: &str = "Default Profile";
const DEFAULT_TEMPLATE_LABEL: &str = "Daily template";
const DEFAULT_DAY_LABEL: &str = "Default Day";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MigrationError {
    #[error("nutrition document is already version {0}")]
    AlreadyMigrated(u64),
}

/// Target schema of a migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetVersion {
    V2,
    V3,
}

impl TargetVersion {
    pub fn number(self) -> u64 {
        match self {
            Self::V2 => 2,
            Self::V3 => 3,
        }
    }

    /// Run the migration to this version.
    pub fn migrate(self, doc: &Object) -> Result<Value, MigrationError> {
        match self {
            Self::V2 => migrate_to_v2(doc),
            Self::V3 => migrate_to_v3(doc),
        }
    }
}

/// Snake-case identifier from a label: runs of anything but `[a-z0-9]`
/// collapse to `_`, leading and trailing `_` are dropped.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_sep = false;
    for c in label.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
    }
    slug
}

/// Template payload stored under a v2 day type.
fn template_payload(day: &Object, root: &Object) -> Value {
    let calories = day
        .get("calories")
        .filter(|v| !v.is_null())
        .or_else(|| get_set(root, "default_calories"))
        .or_else(|| root.get("calories"))
        .cloned()
        .unwrap_or(Value::Null);
    let macros = get_set(day, "macros")
        .or_else(|| get_set(root, "default_macros"))
        .or_else(|| get_set(root, "macros"))
        .cloned()
        .unwrap_or_else(|| json!({}));
    let meals = day
        .get("meals")
        .filter(|v| !v.is_null())
        .or_else(|| root.get("meals"))
        .cloned()
        .unwrap_or_else(|| json!([]));
    let label = get_set(day, "label")
        .or_else(|| get_set(day, "day_type"))
        .or_else(|| get_set(root, "template_name"))
        .cloned()
        .unwrap_or_else(|| json!(DEFAULT_TEMPLATE_LABEL));

    json!({
        "label": label,
        "calories": calories,
        "macros": macros,
        "meals": meals,
    })
}

fn profile_name(doc: &Object) -> Value {
    get_set(doc, "profile_name")
        .or_else(|| get_set(doc, "template_name"))
        .cloned()
        .unwrap_or_else(|| json!(DEFAULT_PROFILE_NAME))
}

fn label_hint(entry: &Object, weekday: &str) -> String {
    ["day_type", "label"]
        .iter()
        .find_map(|key| get_set(entry, key))
        .map(|hint| match hint {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| weekday.to_owned())
}

fn unique_id(base: String, taken: &Object) -> String {
    if !taken.contains_key(&base) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}_{n}");
        if !taken.contains_key(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Convert a legacy flat or per-weekday document into the v2 weekly
/// pattern schema.
///
/// Every weekday gets a pattern entry; weekdays missing from `days` reuse
/// the first stored entry. Weekdays with identical templates share one
/// day type.
pub fn migrate_to_v2(doc: &Object) -> Result<Value, MigrationError> {
    if version(doc) == Some(2) {
        return Err(MigrationError::AlreadyMigrated(2));
    }

    let mut days = Object::new();
    if let Some(stored) = get_object(doc, "days") {
        for (key, entry) in stored {
            if entry.is_object() {
                days.insert(normalize_key(key), entry.clone());
            }
        }
    }

    let mut day_types = Object::new();
    let mut weekly_pattern = Object::new();
    let fallback = days.values().next().and_then(Value::as_object);

    match fallback {
        Some(fallback) => {
            let mut seen: Vec<(Value, String)> = Vec::new();
            for weekday in WEEKDAYS.map(weekday_key) {
                let source = days
                    .get(weekday)
                    .and_then(Value::as_object)
                    .unwrap_or(fallback);
                let payload = template_payload(source, doc);

                let id = match seen.iter().find(|(known, _)| *known == payload) {
                    Some((_, id)) => id.clone(),
                    None => {
                        let mut base = slugify(&label_hint(source, weekday));
                        if base.is_empty() {
                            base = slugify(weekday);
                        }
                        let id = unique_id(base, &day_types);
                        day_types.insert(id.clone(), payload.clone());
                        seen.push((payload, id.clone()));
                        id
                    }
                };
                weekly_pattern.insert(weekday.to_owned(), json!({ "day_type": id }));
            }
        }
        None => {
            day_types.insert("default".into(), template_payload(doc, doc));
            for weekday in WEEKDAYS.map(weekday_key) {
                weekly_pattern.insert(weekday.to_owned(), json!({ "day_type": "default" }));
            }
        }
    }

    let mut converted = Object::new();
    converted.insert("version".into(), json!(2));
    converted.insert("profile_name".into(), profile_name(doc));
    converted.insert("day_types".into(), Value::Object(day_types));
    converted.insert("weekly_pattern".into(), Value::Object(weekly_pattern));
    if let Some(notes) = get_set(doc, "notes") {
        converted.insert("notes".into(), notes.clone());
    }
    Ok(Value::Object(converted))
}

/// Convert a legacy document into a v3 skeleton with one `default_day`
/// day type and no active plans.
pub fn migrate_to_v3(doc: &Object) -> Result<Value, MigrationError> {
    if version(doc) == Some(3) {
        return Err(MigrationError::AlreadyMigrated(3));
    }

    let label = get_text(doc, "template_name").unwrap_or_else(|| DEFAULT_DAY_LABEL.to_owned());
    let calories = get_set(doc, "calories")
        .or_else(|| doc.get("default_calories"))
        .cloned()
        .unwrap_or(Value::Null);
    let macros = get_set(doc, "macros")
        .or_else(|| get_set(doc, "default_macros"))
        .cloned()
        .unwrap_or_else(|| json!({}));
    let meals = doc.get("meals").cloned().unwrap_or_else(|| json!([]));

    let mut converted = Object::new();
    converted.insert("version".into(), json!(3));
    converted.insert("profile_name".into(), profile_name(doc));
    converted.insert(
        "day_types".into(),
        json!({
            "default_day": {
                "label": label,
                "role": "other",
                "calories": calories,
                "macros": macros,
                "meals": meals,
            }
        }),
    );
    converted.insert("weekly_plans".into(), json!({}));
    converted.insert("monthly_plans".into(), json!({}));
    converted.insert("active_weekly_plan".into(), Value::Null);
    converted.insert("active_monthly_plan".into(), Value::Null);
    if let Some(notes) = get_set(doc, "notes") {
        converted.insert("notes".into(), notes.clone());
    }
    Ok(Value::Object(converted))
}
