//! `dayplan show` command: resolve and print the plan for one date.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use dayplan_store::load_daily_plan;

use crate::config::{DayplanConfig, OutputFormat};
use crate::render::render_plan;

/// Run the show command for `date`, defaulting to today in local time.
pub fn run_show(config: &DayplanConfig, date: Option<NaiveDate>) -> Result<()> {
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    tracing::debug!(%date, dir = %config.data.data_dir.display(), "showing daily plan");

    let plan = load_daily_plan(&config.data, date);
    match config.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&plan).context("failed to serialize plan")?;
            println!("{json}");
        }
        OutputFormat::Text => print!("{}", render_plan(&plan)),
    }
    Ok(())
}
