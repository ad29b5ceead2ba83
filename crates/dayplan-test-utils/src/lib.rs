//! Shared test utilities for dayplan integration tests.
//!
//! Provides sample documents for every schema generation and a temporary
//! data directory to write them into. Fixture dates are anchored on
//! November 2025, where 2025-11-03 is a Monday.

use std::fs;
use std::path::{Path, PathBuf};

use dayplan_core::DocumentKind;
use serde_json::{Value, json};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn biometrics() -> Value {
    json!({
        "sex": "female",
        "age": 31,
        "height_cm": 168,
        "current_weight_kg": 63.5,
        "goal": "recomp",
        "weekly_weight_change_target_kg": -0.2,
        "activity_pattern": {"job_activity": "desk", "training_days_per_week": 4},
        "notes": "Left knee is sensitive to deep squats"
    })
}

pub fn workout() -> Value {
    json!({
        "template_name": "Upper/Lower",
        "days_per_week": 4,
        "days": {
            "Monday": {
                "focus": "Upper A",
                "exercises": [
                    {"name": "Bench press", "sets": 4, "reps": "6-8"},
                    {"name": "Row", "sets": 3, "reps": 10}
                ]
            },
            "Tuesday": {
                "focus": "Lower A",
                "exercises": [{"name": "Squat", "sets": 4, "reps": 5}]
            },
            "Thursday": {
                "focus": "Upper B",
                "exercises": [{"name": "Overhead press", "sets": 3, "reps": 8}]
            },
            "Saturday": {
                "focus": "Conditioning",
                "exercises": [{"name": "Bike intervals", "duration": "20 min"}]
            }
        }
    })
}

/// v3 nutrition: day types, weekly plans and an active November plan that
/// pins 2025-11-05 (a Wednesday) to a rest day.
pub fn nutrition_v3() -> Value {
    json!({
        "version": 3,
        "profile_name": "Recomp 2025",
        "notes": "Protein first at every meal.",
        "day_types": {
            "training_a": {
                "label": "Training A",
                "role": "training",
                "calories": 2450,
                "macros": {"protein_g": 150, "carbs_g": 280, "fat_g": 70},
                "meals": [
                    {"time": "07:30", "name": "Oats and whey"},
                    {"time": "13:00", "name": "Chicken rice bowl"}
                ]
            },
            "rest_a": {
                "label": "Rest A",
                "role": "rest",
                "calories": 2000,
                "macros": {"protein_g": 150, "carbs_g": 170, "fat_g": 75},
                "meals": [{"time": "12:00", "name": "Big salad"}]
            }
        },
        "weekly_plans": {
            "standard": {
                "label": "Standard week",
                "pattern": {
                    "monday": {"day_type": "training_a"},
                    "tuesday": {"day_type": "training_a"},
                    "wednesday": {"day_type": "training_a"},
                    "thursday": {"day_type": "training_a"},
                    "friday": {"day_type": "rest_a"},
                    "saturday": {"day_type": "training_a"},
                    "sunday": {"day_type": "rest_a"}
                }
            }
        },
        "active_weekly_plan": "standard",
        "monthly_plans": {
            "2025-11": {
                "label": "November focus",
                "base_weekly_plan": "standard",
                "days": {"2025-11-05": {"day_type": "rest_a"}}
            }
        },
        "active_monthly_plan": "2025-11"
    })
}

/// v2 nutrition with a Friday entry pointing at a missing day type.
pub fn nutrition_v2() -> Value {
    json!({
        "version": 2,
        "profile_name": "Lean bulk",
        "day_types": {
            "high": {"label": "High carb", "calories": 3000, "macros": {"carbs_g": 400}, "meals": []},
            "low": {"label": "Low carb", "calories": 2400, "macros": {"carbs_g": 150}, "meals": []}
        },
        "weekly_pattern": {
            "monday": {"day_type": "high"},
            "tuesday": {"day_type": "low"},
            "wednesday": {"day_type": "high"},
            "friday": {"day_type": "ghost"}
        }
    })
}

/// Legacy per-weekday nutrition with document-level defaults.
pub fn nutrition_legacy_days() -> Value {
    json!({
        "template_name": "Old weekly plan",
        "default_calories": 2300,
        "default_macros": {"protein_g": 140},
        "days": {
            "Monday": {"day_type": "training", "calories": 2600, "meals": [{"name": "Eggs"}]},
            "Tuesday": {"day_type": "rest"}
        }
    })
}

/// Legacy single-template nutrition.
pub fn nutrition_legacy_single() -> Value {
    json!({
        "template_name": "Maintenance",
        "calories": 2200,
        "macros": {"protein_g": 130, "carbs_g": 240, "fat_g": 70},
        "meals": [{"time": "08:00", "name": "Yogurt"}]
    })
}

pub fn supplements() -> Value {
    json!({
        "template_name": "Base stack",
        "days": {
            "monday": {
                "day_type": "training",
                "on": true,
                "protocol": [
                    {"time": "07:30", "items": [{"name": "Creatine", "dose_g": 5}]},
                    {"time": "21:00", "items": [{"name": "Magnesium", "dose_mg": 300}]}
                ]
            },
            "wednesday": {"day_type": "rest", "on": false, "protocol": []}
        }
    })
}

/// Planner for November 2025: Tuesday the 4th trains Monday's session,
/// Thursday the 6th is forced rest.
pub fn planner() -> Value {
    json!({
        "version": 2,
        "month": "2025-11",
        "label": "November block",
        "days": {
            "2025-11-04": {
                "weekday": "tuesday",
                "day_role": "training",
                "workout": {"planned": true, "day_key": "monday"},
                "nutrition": {"day_type_id": "rest_a"},
                "supplements": {"day_type_id": "rest"}
            },
            "2025-11-06": {
                "weekday": "thursday",
                "day_role": "rest",
                "notes": "Travel day",
                "workout": {"planned": false}
            }
        }
    })
}

/// The full set of current-schema fixtures, keyed by kind.
pub fn all_documents() -> Vec<(DocumentKind, Value)> {
    vec![
        (DocumentKind::Biometrics, biometrics()),
        (DocumentKind::Workout, workout()),
        (DocumentKind::Nutrition, nutrition_v3()),
        (DocumentKind::Supplements, supplements()),
        (DocumentKind::Planner, planner()),
    ]
}

// ---------------------------------------------------------------------------
// TempDataDir
// ---------------------------------------------------------------------------

/// A temporary data directory, removed on drop.
pub struct TempDataDir {
    dir: TempDir,
}

impl TempDataDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp data dir"),
        }
    }

    /// A directory pre-populated with [`all_documents`].
    pub fn with_all_documents() -> Self {
        let data = Self::new();
        for (kind, value) in all_documents() {
            data.write(kind, &value);
        }
        data
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `value` as the `kind` document, pretty-printed.
    pub fn write(&self, kind: DocumentKind, value: &Value) -> PathBuf {
        let body = serde_json::to_string_pretty(value).expect("fixture serializes");
        self.write_raw(kind.file_name(), &body)
    }

    /// Write arbitrary contents to `file_name` inside the directory.
    pub fn write_raw(&self, file_name: &str, contents: &str) -> PathBuf {
        let path = self.path().join(file_name);
        fs::write(&path, contents).expect("failed to write fixture file");
        path
    }
}

impl Default for TempDataDir {
    fn default() -> Self {
        Self::new()
    }
}
