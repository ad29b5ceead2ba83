//! `dayplan inspect` command: report what each plan document looks like.

use anyhow::Result;
use serde_json::Value;

use dayplan_core::DocumentKind;
use dayplan_core::json::{Object, get_object, get_text, version};
use dayplan_core::nutrition::NutritionSchema;
use dayplan_core::planner::PLANNER_VERSION;
use dayplan_core::supplements::SupplementLayout;
use dayplan_store::{DataConfig, JsonDir};

/// What was found for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStatus {
    Missing,
    Empty,
    Unreadable(String),
    Loaded(String),
}

impl DocumentStatus {
    fn icon(&self) -> &'static str {
        match self {
            Self::Missing => ".",
            Self::Empty => "-",
            Self::Unreadable(_) => "!",
            Self::Loaded(_) => "+",
        }
    }

    fn detail(&self) -> &str {
        match self {
            Self::Missing => "missing",
            Self::Empty => "empty",
            Self::Unreadable(reason) | Self::Loaded(reason) => reason,
        }
    }
}

/// Inspect every document in the data directory.
pub fn inspect_documents(store: &JsonDir) -> Vec<(DocumentKind, DocumentStatus)> {
    DocumentKind::ALL
        .into_iter()
        .map(|kind| {
            let status = match store.load_document(kind) {
                Ok(None) => DocumentStatus::Missing,
                Ok(Some(Value::Object(doc))) if doc.is_empty() => DocumentStatus::Empty,
                Ok(Some(Value::Object(doc))) => DocumentStatus::Loaded(describe(kind, &doc)),
                Ok(Some(_)) => DocumentStatus::Unreadable("not a JSON object".into()),
                Err(e) => DocumentStatus::Unreadable(e.to_string()),
            };
            (kind, status)
        })
        .collect()
}

fn count(doc: &Object, key: &str) -> usize {
    get_object(doc, key).map_or(0, Object::len)
}

fn describe(kind: DocumentKind, doc: &Object) -> String {
    match kind {
        DocumentKind::Biometrics => match get_text(doc, "goal") {
            Some(goal) => format!("profile, goal {goal}"),
            None => "profile".to_owned(),
        },
        DocumentKind::Workout => {
            let name = get_text(doc, "template_name").unwrap_or_else(|| "unnamed".into());
            format!("{name}, {} days", count(doc, "days"))
        }
        DocumentKind::Nutrition => {
            let schema = NutritionSchema::detect(doc);
            match schema {
                NutritionSchema::DayTypePlans { day_types }
                | NutritionSchema::WeeklyPattern { day_types, .. } => {
                    format!("{}, {} day types", schema.generation(), day_types.len())
                }
                _ => schema.generation().to_string(),
            }
        }
        DocumentKind::Supplements => SupplementLayout::detect(doc).to_string(),
        DocumentKind::Planner => {
            let month = get_text(doc, "month").unwrap_or_else(|| "?".into());
            let mut detail = format!("month {month}, {} dated entries", count(doc, "days"));
            if version(doc) != Some(PLANNER_VERSION) {
                detail.push_str(", unsupported version (ignored)");
            }
            detail
        }
    }
}

/// Run the inspect command.
pub fn run_inspect(data: &DataConfig) -> Result<()> {
    let store = JsonDir::new(data.clone());
    println!("Data directory: {}", data.data_dir.display());
    for (kind, status) in inspect_documents(&store) {
        println!(
            "  [{}] {:<18} {}",
            status.icon(),
            kind.file_name(),
            status.detail()
        );
    }
    Ok(())
}
