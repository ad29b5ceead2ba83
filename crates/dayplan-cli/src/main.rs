mod config;
mod inspect_cmd;
mod migrate_cmd;
mod render;
mod show_cmd;
#[cfg(test)]
mod test_util;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};

use config::DayplanConfig;
use migrate_cmd::MigrationTarget;

#[derive(Parser)]
#[command(name = "dayplan", about = "Resolve the daily fitness plan from JSON documents")]
struct Cli {
    /// Data directory (overrides DAYPLAN_DATA_DIR env var)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a dayplan config file
    Init {
        /// Directory holding the plan documents
        #[arg(long = "dir", default_value = "data")]
        dir: PathBuf,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Show the resolved plan for a date (default: today)
    Show {
        /// Date to resolve, as YYYY-MM-DD
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Report which documents exist and which schema each uses
    Inspect,
    /// Write an upgraded copy of nutrition.json
    MigrateNutrition {
        /// Target schema version
        #[arg(long, value_enum, default_value = "v3")]
        to: MigrationTarget,
        /// Output file (default: nutrition_v2.json / nutrition_v3.json in the data directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Read or change the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set a value (data.dir or display.format)
    Set { key: String, value: String },
    /// Print the config file path and contents
    Show,
}

/// Execute the `dayplan init` command: write the config file.
fn cmd_init(dir: &Path, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        data: config::DataSection {
            dir: Some(dir.to_path_buf()),
        },
        display: config::DisplaySection::default(),
    };
    config::save_config_to(&path, &cfg)?;

    println!("Config written to {}", path.display());
    println!("  data.dir = {}", dir.display());
    println!();
    println!("Next: run `dayplan inspect` to check the documents in that directory.");
    Ok(())
}

fn cmd_config(command: ConfigCommands) -> anyhow::Result<()> {
    let path = config::config_path();
    match command {
        ConfigCommands::Set { key, value } => {
            config::set_config_value(&path, &key, &value)?;
            println!("{key} = {value}");
        }
        ConfigCommands::Show => {
            println!("# {}", path.display());
            if path.exists() {
                let cfg = config::load_config()?;
                print!("{}", toml::to_string_pretty(&cfg)?);
            } else {
                println!("# (not found; run `dayplan init`)");
            }
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { dir, force } => cmd_init(&dir, force)?,
        Commands::Show { date, json } => {
            let resolved = DayplanConfig::resolve(cli.data_dir.as_deref(), json)?;
            show_cmd::run_show(&resolved, date)?;
        }
        Commands::Inspect => {
            let resolved = DayplanConfig::resolve(cli.data_dir.as_deref(), false)?;
            inspect_cmd::run_inspect(&resolved.data)?;
        }
        Commands::MigrateNutrition { to, output } => {
            let resolved = DayplanConfig::resolve(cli.data_dir.as_deref(), false)?;
            migrate_cmd::run_migrate(&resolved.data, to, output.as_deref())?;
        }
        Commands::Config { command } => cmd_config(command)?,
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "dayplan", &mut std::io::stdout());
        }
    }

    Ok(())
}
