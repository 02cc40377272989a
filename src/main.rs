use std::path::Path;

use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::info;

use portion_optimizer_rs::cli::{Cli, Command};
use portion_optimizer_rs::config::{load_options, load_settings, SettingsFile, SolveOptions};
use portion_optimizer_rs::error::{PortionError, Result};
use portion_optimizer_rs::interface::{
    display_result, display_target, prompt_yes_no, resolve_item_name,
};
use portion_optimizer_rs::logging::init_logging;
use portion_optimizer_rs::models::MacroTarget;
use portion_optimizer_rs::planner::{resolve_target_from, solve};
use portion_optimizer_rs::state::{
    apply_portions, load_records, save_records, to_items, write_portions_csv,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let command = cli.command.unwrap_or_default();

    match command {
        Command::Solve {
            records,
            settings,
            date,
            options,
            lock,
            csv,
            save,
        } => cmd_solve(
            &records,
            settings.as_deref(),
            date.as_deref(),
            options.as_deref(),
            &lock,
            csv.as_deref(),
            save,
        ),
        Command::Target { settings, date } => cmd_target(settings.as_deref(), date.as_deref()),
    }
}

fn parse_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => Ok(NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?),
        None => Ok(Local::now().date_naive()),
    }
}

fn resolve(settings: Option<&Path>, date: NaiveDate) -> Result<MacroTarget> {
    let file = match settings {
        Some(path) => load_settings(path)?,
        None => SettingsFile::default(),
    };
    Ok(resolve_target_from(date, &file.settings, &file.overrides))
}

/// Print the resolved target for a day.
fn cmd_target(settings: Option<&Path>, date: Option<&str>) -> Result<()> {
    let date = parse_date(date)?;
    let target = resolve(settings, date)?;
    display_target(date, &target);
    Ok(())
}

/// Solve the day's portions and optionally save them.
fn cmd_solve(
    records_path: &Path,
    settings: Option<&Path>,
    date: Option<&str>,
    options: Option<&Path>,
    lock: &[String],
    csv: Option<&Path>,
    save: bool,
) -> Result<()> {
    if !records_path.exists() {
        eprintln!("Records file not found: {}", records_path.display());
        eprintln!("Pass --records with the path to your meal items JSON.");
        return Ok(());
    }

    let mut records = load_records(records_path)?;
    if records.is_empty() {
        return Err(PortionError::NoItems);
    }
    println!("Loaded {} meal items", records.len());

    for name in lock {
        let id = resolve_item_name(&records, name)?;
        if let Some(record) = records.iter_mut().find(|r| r.id == id) {
            record.meal.locked = true;
            println!("Locked: {}", record.product.name);
        }
    }

    let date = parse_date(date)?;
    let target = resolve(settings, date)?;
    display_target(date, &target);

    let options = match options {
        Some(path) => load_options(path)?,
        None => SolveOptions::default(),
    };

    let items = to_items(&records);
    let result = solve(&items, &target, &options);
    display_result(&result, &items, &target);

    if let Some(path) = csv {
        write_portions_csv(path, &items, result.portions())?;
        println!("Portions written to {}", path.display());
    }

    if save && result.is_success() {
        let confirm = prompt_yes_no("Save solved portions to the records file?", true)?;
        if confirm {
            let changed = apply_portions(&mut records, result.portions());
            save_records(records_path, &records)?;
            info!(changed, path = %records_path.display(), "records saved");
            println!("Saved {} updated portions.", changed);
        }
    } else if save {
        println!("Not saving: no plan within tolerance.");
    }

    Ok(())
}
