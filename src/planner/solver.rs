//! Multi-start solve and result assembly.

use tracing::{debug, info, instrument, warn};

use crate::config::SolveOptions;
use crate::models::{
    AttemptOutcome, AttemptSummary, Blocker, BlockerKind, FailureReason, Macro, MacroTarget,
    Macros, PortionableItem, SolveDiagnostics, SolveResult, Strategy,
};
use crate::planner::attempt::{AttemptReport, Candidate, GradientAttempt};
use crate::planner::constants::{GREEDY_BUDGET_PERCENT, MEAL_MIN_CALORIES};
use crate::planner::feasibility::{analyze, FeasibilityReport};
use crate::planner::greedy::hill_climb;
use crate::planner::init::{initial_grams, midpoint};
use crate::planner::meal_floor::{check_meal_floor, MealFloorViolation};
use crate::planner::scoring::Problem;
use crate::planner::seasoning::rescale;
use crate::planner::validation::validate_items;

/// The gradient strategies, in run order.
pub const GRADIENT_STRATEGIES: [Strategy; 3] = [
    Strategy::MacroBalance,
    Strategy::Midpoint,
    Strategy::CurrentValue,
];

/// Iteration budget of each strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyBudgets {
    pub macro_balance: usize,
    pub midpoint: usize,
    pub current_value: usize,
    pub greedy: usize,
}

impl StrategyBudgets {
    /// Greedy gets a fixed percentage; the rest is split 2:1:1.
    pub fn split(total: usize) -> Self {
        let greedy = total * GREEDY_BUDGET_PERCENT / 100;
        let gradient = total - greedy;
        let macro_balance = gradient / 2;
        let midpoint = gradient / 4;
        Self {
            macro_balance,
            midpoint,
            current_value: gradient - macro_balance - midpoint,
            greedy,
        }
    }

    pub fn for_strategy(&self, strategy: Strategy) -> usize {
        match strategy {
            Strategy::MacroBalance => self.macro_balance,
            Strategy::Midpoint => self.midpoint,
            Strategy::CurrentValue => self.current_value,
            Strategy::Greedy => self.greedy,
        }
    }
}

/// A finished attempt and whether its plan passed the meal floor.
struct Finished {
    strategy: Strategy,
    report: AttemptReport,
    floor_violations: Vec<MealFloorViolation>,
}

impl Finished {
    fn new(problem: &Problem, strategy: Strategy, report: AttemptReport) -> Self {
        let floor_violations = check_meal_floor(
            problem.items,
            &report.best().grams,
            problem.options.seasonings_count_macros,
        );
        Self {
            strategy,
            report,
            floor_violations,
        }
    }

    /// The accepted plan, if this attempt produced one.
    fn accepted(&self) -> Option<&Candidate> {
        self.report
            .best_valid
            .as_ref()
            .filter(|_| self.floor_violations.is_empty())
    }

    fn summary(&self) -> AttemptSummary {
        let best = self.report.best();
        AttemptSummary {
            strategy: self.strategy,
            outcome: self.report.outcome,
            iterations: self.report.iterations,
            weighted_delta: best.evaluation.weighted_delta,
            found_valid: self.report.best_valid.is_some(),
            meal_floor_violations: self
                .floor_violations
                .iter()
                .map(|v| (v.slot, v.calories))
                .collect(),
        }
    }
}

/// Compute portions that hit `target` within tolerance, or explain why not.
///
/// Pure and deterministic: the same inputs always give the same result.
#[instrument(skip_all, fields(items = items.len(), max_iterations = options.max_iterations))]
pub fn solve(
    items: &[PortionableItem],
    target: &MacroTarget,
    options: &SolveOptions,
) -> SolveResult {
    let problem = Problem::new(items, target, options);

    let invalid = validate_items(items);
    if !invalid.is_empty() {
        warn!(blockers = invalid.len(), "rejected items with invalid nutrition");
        let grams = non_degenerate(&problem, problem.input_grams());
        return failure(
            &problem,
            FailureReason::InvalidProductNutrition,
            invalid,
            &grams,
            None,
            None,
        );
    }

    let feasibility = analyze(items, target, options);
    if !feasibility.is_feasible() {
        warn!(
            blockers = feasibility.blockers.len(),
            "target lies outside the achievable envelope"
        );
    }

    if problem.adjustable().is_empty() {
        return solve_fixed(&problem, feasibility);
    }

    let budgets = StrategyBudgets::split(options.max_iterations);
    let mut finished: Vec<Finished> = Vec::new();
    let mut iterations = 0;

    for strategy in GRADIENT_STRATEGIES {
        let start = initial_grams(&problem, strategy);
        let report =
            GradientAttempt::new(&problem, start, budgets.for_strategy(strategy)).run();
        iterations += report.iterations;
        debug!(
            ?strategy,
            outcome = ?report.outcome,
            iterations = report.iterations,
            weighted_delta = report.best().evaluation.weighted_delta,
            "strategy finished"
        );

        let attempt = Finished::new(&problem, strategy, report);
        if attempt.report.best_valid.is_some() && !attempt.floor_violations.is_empty() {
            debug!(?strategy, "valid plan rejected by the meal floor");
        }
        finished.push(attempt);

        if let Some(result) = success(&problem, &finished, iterations, &feasibility) {
            return result;
        }
    }

    let start = least_wrong(&finished)
        .map(|attempt| attempt.report.best().grams.clone())
        .unwrap_or_else(|| initial_grams(&problem, Strategy::Greedy));
    let report = hill_climb(&problem, start, budgets.greedy);
    iterations += report.iterations;
    debug!(
        outcome = ?report.outcome,
        iterations = report.iterations,
        "greedy fallback finished"
    );
    finished.push(Finished::new(&problem, Strategy::Greedy, report));

    if let Some(result) = success(&problem, &finished, iterations, &feasibility) {
        return result;
    }

    assemble_failure(&problem, &finished, feasibility)
}

/// Success from the newest attempt, if it produced an accepted plan.
fn success(
    problem: &Problem,
    finished: &[Finished],
    iterations: usize,
    feasibility: &FeasibilityReport,
) -> Option<SolveResult> {
    let attempt = finished.last()?;
    let candidate = attempt.accepted()?;

    if !feasibility.is_feasible() {
        warn!("found a valid plan although the envelope check failed");
    }

    let mut grams = candidate.grams.clone();
    rescale(problem.items, &mut grams);
    let evaluation = problem.evaluate(&grams);
    info!(
        strategy = ?attempt.strategy,
        iterations,
        score = evaluation.score,
        "solve succeeded"
    );

    Some(SolveResult::Success {
        portions: problem.portions(&grams),
        totals: evaluation.rounded,
        score: evaluation.score,
        iterations,
        diagnostics: diagnostics(problem, finished),
    })
}

/// Only locked items and seasonings: evaluate the single fixed allocation.
fn solve_fixed(problem: &Problem, feasibility: FeasibilityReport) -> SolveResult {
    let mut grams = problem.input_grams();
    rescale(problem.items, &mut grams);
    let evaluation = problem.evaluate(&grams);
    let violations = check_meal_floor(
        problem.items,
        &grams,
        problem.options.seasonings_count_macros,
    );

    if evaluation.valid && violations.is_empty() && feasibility.is_feasible() {
        info!("fixed allocation already meets the target");
        return SolveResult::Success {
            portions: problem.portions(&grams),
            totals: evaluation.rounded,
            score: evaluation.score,
            iterations: 0,
            diagnostics: problem
                .options
                .debug_mode
                .then(SolveDiagnostics::default),
        };
    }

    let (reason, blockers, envelope_max) = if !feasibility.is_feasible() {
        (
            FailureReason::ImpossibleTargets,
            feasibility.blockers,
            Some(feasibility.envelope.max_totals),
        )
    } else {
        let mut blockers = meal_floor_blockers(&violations);
        blockers.extend(tolerance_blockers(problem, &evaluation.rounded));
        (FailureReason::NoAdjustableItems, blockers, None)
    };
    info!(%reason, "solve failed");
    failure(problem, reason, blockers, &grams, envelope_max, None)
}

/// The attempt with the smallest weighted delta; first wins ties.
fn least_wrong(finished: &[Finished]) -> Option<&Finished> {
    finished.iter().fold(None, |best: Option<&Finished>, attempt| {
        match best {
            Some(b)
                if b.report.best().evaluation.weighted_delta
                    <= attempt.report.best().evaluation.weighted_delta =>
            {
                Some(b)
            }
            _ => Some(attempt),
        }
    })
}

fn assemble_failure(
    problem: &Problem,
    finished: &[Finished],
    feasibility: FeasibilityReport,
) -> SolveResult {
    let Some(best) = least_wrong(finished) else {
        let grams = non_degenerate(problem, problem.input_grams());
        return failure(
            problem,
            FailureReason::Stagnation,
            Vec::new(),
            &grams,
            None,
            None,
        );
    };

    let mut grams = best.report.best().grams.clone();
    rescale(problem.items, &mut grams);
    let grams = non_degenerate(problem, grams);
    let rounded = problem.evaluate(&grams).rounded;

    let floor_rejected = best.report.best_valid.is_some() && !best.floor_violations.is_empty();
    let (reason, blockers, envelope_max) = if !feasibility.is_feasible() {
        (
            FailureReason::ImpossibleTargets,
            feasibility.blockers,
            Some(feasibility.envelope.max_totals),
        )
    } else if floor_rejected {
        (
            FailureReason::ImpossibleTargets,
            meal_floor_blockers(&best.floor_violations),
            None,
        )
    } else {
        let reason = match best.report.outcome {
            AttemptOutcome::BudgetExhausted => FailureReason::MaxIterationsExceeded,
            AttemptOutcome::Converged | AttemptOutcome::Stagnant => FailureReason::Stagnation,
        };
        (reason, tolerance_blockers(problem, &rounded), None)
    };

    info!(
        %reason,
        strategy = ?best.strategy,
        weighted_delta = best.report.best().evaluation.weighted_delta,
        "solve failed"
    );
    failure(
        problem,
        reason,
        blockers,
        &grams,
        envelope_max,
        diagnostics(problem, finished),
    )
}

fn failure(
    problem: &Problem,
    reason: FailureReason,
    blockers: Vec<Blocker>,
    grams: &[u32],
    envelope_max: Option<Macros>,
    diagnostics: Option<SolveDiagnostics>,
) -> SolveResult {
    let best_effort_totals = problem.evaluate(grams).rounded;
    let closest_totals = envelope_max.map_or(best_effort_totals, |m| m.rounded());
    SolveResult::Failure {
        reason,
        blockers,
        closest_totals,
        target_delta: closest_totals.minus(problem.target),
        best_effort_portions: problem.portions(grams),
        best_effort_totals,
        diagnostics: diagnostics.or_else(|| {
            problem
                .options
                .debug_mode
                .then(SolveDiagnostics::default)
        }),
    }
}

fn diagnostics(problem: &Problem, finished: &[Finished]) -> Option<SolveDiagnostics> {
    problem.options.debug_mode.then(|| SolveDiagnostics {
        attempts: finished.iter().map(Finished::summary).collect(),
    })
}

/// Replace an all-zero adjustable allocation with range midpoints.
fn non_degenerate(problem: &Problem, mut grams: Vec<u32>) -> Vec<u32> {
    let all_zero = !problem.adjustable().is_empty()
        && problem.adjustable().iter().all(|&i| grams[i] == 0);
    if all_zero {
        midpoint(problem, &mut grams);
    }
    rescale(problem.items, &mut grams);
    grams
}

fn meal_floor_blockers(violations: &[MealFloorViolation]) -> Vec<Blocker> {
    violations
        .iter()
        .map(|v| {
            Blocker::new(
                v.slot.as_str(),
                BlockerKind::MealBelowMinimum,
                v.calories,
                format!(
                    "{} has {:.0} kcal, below the {:.0} kcal meal minimum",
                    v.slot, v.calories, MEAL_MIN_CALORIES
                ),
            )
        })
        .collect()
}

/// One blocker per macro whose rounded total sits outside its window.
fn tolerance_blockers(problem: &Problem, rounded: &Macros) -> Vec<Blocker> {
    Macro::ALL
        .into_iter()
        .filter(|&m| {
            !problem
                .options
                .tolerances
                .get(m)
                .contains(problem.target.get(m), rounded.get(m))
        })
        .map(|m| {
            Blocker::new(
                "total",
                BlockerKind::OutOfTolerance(m),
                rounded.get(m),
                format!(
                    "{} reached {:.1}{}, target {:.1}{}",
                    m,
                    rounded.get(m),
                    m.unit(),
                    problem.target.get(m),
                    m.unit()
                ),
            )
        })
        .collect()
}
