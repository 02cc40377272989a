use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::SolveOptions;
use crate::models::{FailureReason, SolveResult};
use crate::planner::solve;
use crate::sweep::scenarios::{generate_scenarios, Scenario, ScenarioConfig};

/// What `solve` did with one scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioOutcome {
    pub index: usize,
    pub items: usize,
    pub locked: usize,
    pub success: bool,
    pub reason: Option<FailureReason>,
    pub iterations: usize,
    /// Score on success; weighted delta of the best effort otherwise.
    pub score: f64,
}

/// Aggregate over a sweep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepSummary {
    pub runs: usize,
    pub successes: usize,
    pub success_rate: f64,
    pub mean_iterations: f64,
    /// Mean score over successful runs.
    pub mean_score: f64,
    pub failures_by_reason: Vec<(FailureReason, usize)>,
}

/// Configuration for a sweep run.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub scenarios: usize,
    pub seed: u64,
    pub scenario: ScenarioConfig,
    pub options: SolveOptions,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            scenarios: 200,
            seed: 123,
            scenario: ScenarioConfig::default(),
            options: SolveOptions::default(),
        }
    }
}

pub struct SweepResults {
    pub outcomes: Vec<ScenarioOutcome>,
    pub summary: SweepSummary,
}

/// Solve one scenario and record the outcome.
pub fn evaluate_scenario(scenario: &Scenario, options: &SolveOptions) -> ScenarioOutcome {
    let options = SolveOptions {
        debug_mode: true,
        ..options.clone()
    };
    let result = solve(&scenario.items, &scenario.target, &options);

    let iterations = match &result {
        SolveResult::Success { iterations, .. } => *iterations,
        SolveResult::Failure { .. } => result
            .diagnostics()
            .map(|d| d.attempts.iter().map(|a| a.iterations).sum())
            .unwrap_or(0),
    };
    let score = match &result {
        SolveResult::Success { score, .. } => *score,
        SolveResult::Failure { target_delta, .. } => target_delta.weighted_magnitude(),
    };

    ScenarioOutcome {
        index: scenario.index,
        items: scenario.items.len(),
        locked: scenario.locked_count(),
        success: result.is_success(),
        reason: result.reason(),
        iterations,
        score,
    }
}

pub fn summarize(outcomes: &[ScenarioOutcome]) -> SweepSummary {
    let runs = outcomes.len();
    if runs == 0 {
        return SweepSummary::default();
    }

    let successes: Vec<&ScenarioOutcome> = outcomes.iter().filter(|o| o.success).collect();
    let mean_score = if successes.is_empty() {
        0.0
    } else {
        successes.iter().map(|o| o.score).sum::<f64>() / successes.len() as f64
    };

    let mut failures_by_reason: Vec<(FailureReason, usize)> = Vec::new();
    for reason in outcomes.iter().filter_map(|o| o.reason) {
        match failures_by_reason.iter_mut().find(|(r, _)| *r == reason) {
            Some((_, count)) => *count += 1,
            None => failures_by_reason.push((reason, 1)),
        }
    }

    SweepSummary {
        runs,
        successes: successes.len(),
        success_rate: successes.len() as f64 / runs as f64,
        mean_iterations: outcomes.iter().map(|o| o.iterations).sum::<usize>() as f64
            / runs as f64,
        mean_score,
        failures_by_reason,
    }
}

/// Generate seeded scenarios and solve each one.
pub fn run_sweep(config: &SweepConfig) -> SweepResults {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let scenarios = generate_scenarios(&mut rng, config.scenarios, &config.scenario);

    let mut outcomes = Vec::with_capacity(scenarios.len());
    for (i, scenario) in scenarios.iter().enumerate() {
        let outcome = evaluate_scenario(scenario, &config.options);
        if !outcome.success {
            debug!(index = outcome.index, reason = ?outcome.reason, "scenario failed");
        }
        outcomes.push(outcome);

        // Progress indicator every 10%
        if (i + 1) % (scenarios.len() / 10).max(1) == 0 {
            let pct = ((i + 1) as f64 / scenarios.len() as f64) * 100.0;
            eprint!("\r{:.0}% complete", pct);
        }
    }
    eprintln!();

    let summary = summarize(&outcomes);
    info!(
        runs = summary.runs,
        success_rate = summary.success_rate,
        "sweep finished"
    );
    SweepResults { outcomes, summary }
}
