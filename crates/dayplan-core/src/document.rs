//! The document register handed to the resolution engine.
//!
//! The engine never reads files itself. A [`DocumentLoader`] supplies the
//! five documents as decoded JSON; [`DocumentSet`] holds whichever of them
//! were available.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::json::{Object, type_name};

// ---------------------------------------------------------------------------
// DocumentKind
// ---------------------------------------------------------------------------

/// One of the plan documents the engine reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Biometrics,
    Workout,
    Nutrition,
    Supplements,
    Planner,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 5] = [
        Self::Biometrics,
        Self::Workout,
        Self::Nutrition,
        Self::Supplements,
        Self::Planner,
    ];

    /// File name the document is conventionally stored under.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Biometrics => "biometrics.json",
            Self::Workout => "workout.json",
            Self::Nutrition => "nutrition.json",
            Self::Supplements => "supplements.json",
            Self::Planner => "planner.json",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Biometrics => "biometrics",
            Self::Workout => "workout",
            Self::Nutrition => "nutrition",
            Self::Supplements => "supplements",
            Self::Planner => "planner",
        };
        f.write_str(s)
    }
}

impl FromStr for DocumentKind {
    type Err = DocumentKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "biometrics" => Ok(Self::Biometrics),
            "workout" => Ok(Self::Workout),
            "nutrition" => Ok(Self::Nutrition),
            "supplements" => Ok(Self::Supplements),
            "planner" => Ok(Self::Planner),
            other => Err(DocumentKindParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`DocumentKind`] string.
#[derive(Debug, Clone)]
pub struct DocumentKindParseError(pub String);

impl fmt::Display for DocumentKindParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid document kind: {:?}", self.0)
    }
}

impl std::error::Error for DocumentKindParseError {}

// ---------------------------------------------------------------------------
// DocumentSet
// ---------------------------------------------------------------------------

/// Misuse of the document register, as opposed to bad data inside a
/// document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("{kind} document must be a JSON object, got {found}")]
    NotAnObject {
        kind: DocumentKind,
        found: &'static str,
    },
}

/// The documents available for one resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentSet {
    biometrics: Option<Object>,
    workout: Option<Object>,
    nutrition: Option<Object>,
    supplements: Option<Object>,
    planner: Option<Object>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from decoded documents. Every value must be an object.
    pub fn from_values(
        values: impl IntoIterator<Item = (DocumentKind, Value)>,
    ) -> Result<Self, DocumentError> {
        let mut set = Self::new();
        for (kind, value) in values {
            set.insert(kind, value)?;
        }
        Ok(set)
    }

    /// Store `value` as the `kind` document, replacing any previous one.
    pub fn insert(&mut self, kind: DocumentKind, value: Value) -> Result<(), DocumentError> {
        match value {
            Value::Object(doc) => {
                *self.slot_mut(kind) = Some(doc);
                Ok(())
            }
            other => Err(DocumentError::NotAnObject {
                kind,
                found: type_name(&other),
            }),
        }
    }

    /// Builder form of [`DocumentSet::insert`].
    pub fn with(mut self, kind: DocumentKind, value: Value) -> Result<Self, DocumentError> {
        self.insert(kind, value)?;
        Ok(self)
    }

    /// The `kind` document; an empty object counts as absent.
    pub fn get(&self, kind: DocumentKind) -> Option<&Object> {
        self.slot(kind).as_ref().filter(|doc| !doc.is_empty())
    }

    pub fn contains(&self, kind: DocumentKind) -> bool {
        self.get(kind).is_some()
    }

    fn slot(&self, kind: DocumentKind) -> &Option<Object> {
        match kind {
            DocumentKind::Biometrics => &self.biometrics,
            DocumentKind::Workout => &self.workout,
            DocumentKind::Nutrition => &self.nutrition,
            DocumentKind::Supplements => &self.supplements,
            DocumentKind::Planner => &self.planner,
        }
    }

    fn slot_mut(&mut self, kind: DocumentKind) -> &mut Option<Object> {
        match kind {
            DocumentKind::Biometrics => &mut self.biometrics,
            DocumentKind::Workout => &mut self.workout,
            DocumentKind::Nutrition => &mut self.nutrition,
            DocumentKind::Supplements => &mut self.supplements,
            DocumentKind::Planner => &mut self.planner,
        }
    }
}

// ---------------------------------------------------------------------------
// DocumentLoader
// ---------------------------------------------------------------------------

/// Source of plan documents (a directory of JSON files, a database, ...).
pub trait DocumentLoader {
    type Error: std::error::Error + From<DocumentError>;

    /// Load one document. `Ok(None)` means the document does not exist.
    fn load(&self, kind: DocumentKind) -> Result<Option<Value>, Self::Error>;

    /// Load every document, failing on the first error.
    fn load_set(&self) -> Result<DocumentSet, Self::Error> {
        let mut set = DocumentSet::new();
        for kind in DocumentKind::ALL {
            if let Some(value) = self.load(kind)? {
                set.insert(kind, value)?;
            }
        }
        Ok(set)
    }

    /// Load every document that can be loaded. Failures are logged and the
    /// document is treated as missing, so one bad file cannot block the
    /// other sections.
    fn load_available(&self) -> DocumentSet {
        let mut set = DocumentSet::new();
        for kind in DocumentKind::ALL {
            let loaded = self
                .load(kind)
                .and_then(|value| match value {
                    Some(value) => set.insert(kind, value).map_err(Into::into),
                    None => Ok(()),
                });
            if let Err(e) = loaded {
                warn!(document = %kind, error = %e, "document unavailable, treating as missing");
            }
        }
        set
    }
}
