//! Nutrition document schema detection.
//!
//! Four generations of nutrition documents are in circulation:
//!
//! | generation          | marker                                        |
//! |---------------------|-----------------------------------------------|
//! | v3 day-type plans   | `version: 3` + `day_types`                    |
//! | v2 weekly pattern   | `version: 2` + `day_types` + `weekly_pattern` |
//! | legacy per-weekday  | non-empty `days` mapping                      |
//! | legacy single       | anything else (template at the root)          |
//!
//! An unknown or inconsistent `version` never fails; the document simply
//! falls through to the legacy shapes.

use std::fmt;

use crate::json::{Object, get_object, version};

/// Which schema generation a nutrition document was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaGeneration {
    DayTypePlans,
    WeeklyPattern,
    LegacyWeekdays,
    LegacySingle,
}

impl fmt::Display for SchemaGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::DayTypePlans => "v3 day-type plans",
            Self::WeeklyPattern => "v2 weekly pattern",
            Self::LegacyWeekdays => "legacy per-weekday",
            Self::LegacySingle => "legacy single template",
        };
        f.write_str(s)
    }
}

/// A nutrition document viewed through its detected schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NutritionSchema<'a> {
    DayTypePlans {
        day_types: &'a Object,
    },
    WeeklyPattern {
        day_types: &'a Object,
        weekly_pattern: &'a Object,
    },
    LegacyWeekdays {
        days: &'a Object,
    },
    LegacySingle,
}

impl<'a> NutritionSchema<'a> {
    pub fn detect(doc: &'a Object) -> Self {
        let days = get_object(doc, "days").filter(|days| !days.is_empty());
        let shape = (
            version(doc),
            get_object(doc, "day_types"),
            get_object(doc, "weekly_pattern"),
            days,
        );
        match shape {
            (Some(3), Some(day_types), _, _) => Self::DayTypePlans { day_types },
            (Some(2), Some(day_types), Some(weekly_pattern), _) => Self::WeeklyPattern {
                day_types,
                weekly_pattern,
            },
            (_, _, _, Some(days)) => Self::LegacyWeekdays { days },
            _ => Self::LegacySingle,
        }
    }

    pub fn generation(&self) -> SchemaGeneration {
        match self {
            Self::DayTypePlans { .. } => SchemaGeneration::DayTypePlans,
            Self::WeeklyPattern { .. } => SchemaGeneration::WeeklyPattern,
            Self::LegacyWeekdays { .. } => SchemaGeneration::LegacyWeekdays,
            Self::LegacySingle => SchemaGeneration::LegacySingle,
        }
    }
}
