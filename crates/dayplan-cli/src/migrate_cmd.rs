//! `dayplan migrate-nutrition` command: write an upgraded copy of
//! `nutrition.json` next to the original.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::ValueEnum;

use dayplan_core::DocumentKind;
use dayplan_core::nutrition::TargetVersion;
use dayplan_store::{DataConfig, JsonDir};

/// Schema version to migrate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MigrationTarget {
    V2,
    V3,
}

impl MigrationTarget {
    fn version(self) -> TargetVersion {
        match self {
            Self::V2 => TargetVersion::V2,
            Self::V3 => TargetVersion::V3,
        }
    }

    /// Default output file name for this target.
    pub fn file_name(self) -> String {
        format!("nutrition_v{}.json", self.version().number())
    }
}

/// Migrate `nutrition.json` in the data directory and write the result to
/// `output` (default: `nutrition_v2.json` / `nutrition_v3.json` beside it).
/// Returns the path written.
pub fn migrate_nutrition(
    data: &DataConfig,
    target: MigrationTarget,
    output: Option<&Path>,
) -> Result<PathBuf> {
    let source = data.path_for(DocumentKind::Nutrition);
    let store = JsonDir::new(data.clone());
    let Some(doc) = store
        .load_document(DocumentKind::Nutrition)
        .with_context(|| format!("cannot migrate {}", source.display()))?
    else {
        bail!("{} does not exist; nothing to migrate", source.display());
    };
    let Some(doc) = doc.as_object() else {
        bail!("{} is not a JSON object", source.display());
    };

    let migrated = target
        .version()
        .migrate(doc)
        .with_context(|| format!("no new file created from {}", source.display()))?;

    let written = match output {
        Some(path) => {
            JsonDir::write_new_path(path, &migrated)?;
            path.to_path_buf()
        }
        None => store.write_new(&target.file_name(), &migrated)?,
    };
    Ok(written)
}

/// Run the migrate-nutrition command.
pub fn run_migrate(data: &DataConfig, target: MigrationTarget, output: Option<&Path>) -> Result<()> {
    let written = migrate_nutrition(data, target, output)?;
    println!(
        "Created {} from {}.",
        written.display(),
        data.path_for(DocumentKind::Nutrition).display()
    );
    println!("Review the new file and replace nutrition.json manually when ready.");
    Ok(())
}
