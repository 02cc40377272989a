use std::path::PathBuf;

use clap::Parser;

use portion_optimizer_rs::config::{load_options, SolveOptions};
use portion_optimizer_rs::logging::init_logging;
use portion_optimizer_rs::sweep::{print_summary, run_sweep, write_csv, ScenarioConfig, SweepConfig};

#[derive(Parser, Debug)]
#[command(name = "sweep")]
#[command(about = "Measure solver success rate over generated feasible scenarios")]
struct Args {
    /// Number of scenarios to generate
    #[arg(long, default_value = "200")]
    scenarios: usize,

    /// Random seed for reproducibility
    #[arg(long, default_value = "123")]
    seed: u64,

    /// Solve options JSON file
    #[arg(long)]
    options: Option<PathBuf>,

    /// Override the iteration budget
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Chance each extra item is locked
    #[arg(long, default_value = "0.2")]
    lock_probability: f64,

    /// Most items per scenario beyond the first
    #[arg(long, default_value = "4")]
    max_extra_items: usize,

    /// Output CSV file for per-scenario outcomes
    #[arg(long, default_value = "sweep_results.csv")]
    csv: PathBuf,

    /// Increase log detail (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut options = match &args.options {
        Some(path) => match load_options(path) {
            Ok(options) => options,
            Err(e) => {
                eprintln!("Error reading options file {:?}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => SolveOptions::default(),
    };
    if let Some(max) = args.max_iterations {
        options.max_iterations = max;
    }

    let config = SweepConfig {
        scenarios: args.scenarios,
        seed: args.seed,
        scenario: ScenarioConfig {
            max_extra_items: args.max_extra_items,
            lock_probability: args.lock_probability,
            ..Default::default()
        },
        options,
    };

    println!(
        "Solving {} scenarios (seed {}, budget {})...",
        config.scenarios, config.seed, config.options.max_iterations
    );
    let results = run_sweep(&config);
    print_summary(&results.summary);

    if let Err(e) = write_csv(&results.outcomes, &args.csv) {
        eprintln!("Error writing CSV: {}", e);
    } else {
        println!("Wrote per-scenario outcomes to {:?}", args.csv);
    }
}
