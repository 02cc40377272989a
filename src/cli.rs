use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// portion_optimizer: fits meal gram quantities to daily macro targets.
#[derive(Parser, Debug)]
#[command(name = "portion_optimizer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Increase log detail (-v info, -vv debug). PORTION_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Solve portions for the day's meal items.
    Solve {
        /// Path to the meal item records JSON file.
        #[arg(short, long, default_value = "meal_items.json")]
        records: PathBuf,

        /// Nutrition settings JSON file. Defaults apply when omitted.
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Day to plan (YYYY-MM-DD). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,

        /// Solve options JSON file.
        #[arg(short, long)]
        options: Option<PathBuf>,

        /// Lock an item at its stored quantity (fuzzy name match). Repeatable.
        #[arg(long)]
        lock: Vec<String>,

        /// Also write the portions to a CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Offer to write solved grams back to the records file.
        #[arg(long)]
        save: bool,
    },

    /// Print the resolved macro target for a day.
    Target {
        /// Nutrition settings JSON file. Defaults apply when omitted.
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Day to resolve (YYYY-MM-DD). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Solve {
            records: PathBuf::from("meal_items.json"),
            settings: None,
            date: None,
            options: None,
            lock: Vec::new(),
            csv: None,
            save: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_solve_with_locks() {
        let cli = Cli::parse_from([
            "portion_optimizer",
            "-vv",
            "solve",
            "--records",
            "day.json",
            "--lock",
            "rice",
            "--lock",
            "broccoli",
            "--date",
            "2026-10-19",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Command::Solve {
                records, lock, date, save, ..
            }) => {
                assert_eq!(records, PathBuf::from("day.json"));
                assert_eq!(lock, vec!["rice", "broccoli"]);
                assert_eq!(date.as_deref(), Some("2026-10-19"));
                assert!(!save);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_no_subcommand_defaults_to_solve() {
        let cli = Cli::parse_from(["portion_optimizer"]);
        assert!(matches!(
            cli.command.unwrap_or_default(),
            Command::Solve { .. }
        ));
    }
}
