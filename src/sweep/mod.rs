//! Solver-quality sweep over generated feasible scenarios.

pub mod evaluation;
pub mod output;
pub mod scenarios;

pub use evaluation::{
    evaluate_scenario, run_sweep, summarize, ScenarioOutcome, SweepConfig, SweepResults,
    SweepSummary,
};
pub use output::{print_summary, write_csv};
pub use scenarios::{generate_scenario, generate_scenarios, Scenario, ScenarioConfig, CATALOG};
