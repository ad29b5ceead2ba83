//! Case-insensitive lookup over weekday- or day-type-keyed mappings.
//!
//! Documents have been written with `"Monday"`, `"monday"` and `" MONDAY "`
//! style keys over their lifetime. Every key comparison in the engine goes
//! through [`normalize_key`] so that policy lives in exactly one place.
//!
//! Matching order for [`DayLookup::find`]:
//! 1. The exact key.
//! 2. Any key equal after normalization.
//! 3. With [`MatchMode::KeyOrDayType`] only: any entry whose own `day_type`
//!    field is equal after normalization.
//!
//! Each step is a full pass over the mapping, so a key match always beats a
//! `day_type` match regardless of entry order.

use serde_json::Value;

use crate::json::Object;

/// Trim and lowercase a key for comparison.
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// How [`DayLookup::find`] is allowed to match an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Match on the mapping key only.
    Key,
    /// Match on the key, then fall back to the entry's `day_type` field.
    KeyOrDayType,
}

/// A matched entry together with the key it is stored under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayMatch<'a> {
    pub key: &'a str,
    pub entry: &'a Value,
}

impl<'a> DayMatch<'a> {
    /// The entry as a non-empty object.
    pub fn non_empty_object(&self) -> Option<&'a Object> {
        self.entry.as_object().filter(|o| !o.is_empty())
    }
}

/// Borrowed view over a `days`-style mapping.
#[derive(Debug, Clone, Copy)]
pub struct DayLookup<'a> {
    days: &'a Object,
}

impl<'a> DayLookup<'a> {
    pub fn new(days: &'a Object) -> Self {
        Self { days }
    }

    /// View over `value` if it is an object; anything else has no entries.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        value.as_object().map(Self::new)
    }

    /// Find the entry for `target`. Blank targets never match.
    pub fn find(&self, target: &str, mode: MatchMode) -> Option<DayMatch<'a>> {
        let normalized = normalize_key(target);
        if normalized.is_empty() {
            return None;
        }

        if let Some((key, entry)) = self.days.iter().find(|(key, _)| key.as_str() == target) {
            return Some(DayMatch { key, entry });
        }

        self.find_by_key(&normalized).or_else(|| match mode {
            MatchMode::Key => None,
            MatchMode::KeyOrDayType => self.find_by_day_type(&normalized),
        })
    }

    fn find_by_key(&self, normalized: &str) -> Option<DayMatch<'a>> {
        self.days
            .iter()
            .find(|(key, _)| normalize_key(key) == normalized)
            .map(|(key, entry)| DayMatch { key, entry })
    }

    fn find_by_day_type(&self, normalized: &str) -> Option<DayMatch<'a>> {
        self.days
            .iter()
            .find(|(_, entry)| {
                entry
                    .get("day_type")
                    .and_then(Value::as_str)
                    .is_some_and(|day_type| normalize_key(day_type) == normalized)
            })
            .map(|(key, entry)| DayMatch { key, entry })
    }
}

/// Look up `target` in `days`, tolerating a `days` value that is not a
/// mapping at all.
pub fn lookup_day<'a>(
    days: &'a Value,
    target: &str,
    match_by_day_type_field: bool,
) -> Option<DayMatch<'a>> {
    let mode = if match_by_day_type_field {
        MatchMode::KeyOrDayType
    } else {
        MatchMode::Key
    };
    DayLookup::from_value(days)?.find(target, mode)
}
