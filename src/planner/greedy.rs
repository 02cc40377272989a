//! Last-resort hill climbing, run only when every gradient attempt failed.

use tracing::debug;

use crate::models::AttemptOutcome;
use crate::planner::attempt::{shifted, signed_moves, AttemptReport, Tracker};
use crate::planner::constants::{GREEDY_STEP_MULTIPLES, IMPROVEMENT_EPSILON};
use crate::planner::scoring::Problem;
use crate::planner::seasoning::rescale;

/// Best single-item move from `grams`, if any lowers fitness below `current`.
fn best_move(problem: &Problem, grams: &[u32], current: f64) -> Option<(Vec<u32>, f64)> {
    let mut best: Option<(Vec<u32>, f64)> = None;

    for &i in problem.adjustable() {
        let item = &problem.items[i];
        let Some(range) = item.adjustable_range() else {
            continue;
        };
        let step = item.step_grams() as i64;
        let moves = signed_moves(GREEDY_STEP_MULTIPLES.iter().map(|&k| k as i64 * step));

        for delta in moves {
            let Some(g) = shifted(&range, item.rounding(), grams[i], delta) else {
                continue;
            };
            let mut trial = grams.to_vec();
            trial[i] = g;
            rescale(problem.items, &mut trial);
            let fitness = problem.evaluate(&trial).fitness;
            let bar = best
                .as_ref()
                .map_or(current - IMPROVEMENT_EPSILON, |(_, f)| *f);
            if fitness < bar {
                best = Some((trial, fitness));
            }
        }
    }

    best
}

/// Apply the single best move per iteration until nothing improves, the
/// valid-candidate quota is met, or `budget` runs out.
pub fn hill_climb(problem: &Problem, start: Vec<u32>, budget: usize) -> AttemptReport {
    let mut grams = start;
    rescale(problem.items, &mut grams);
    let evaluation = problem.evaluate(&grams);
    let mut current = evaluation.fitness;
    let mut tracker = Tracker::new(grams.clone(), evaluation);
    let mut iterations = 0;

    let outcome = loop {
        if tracker.quota_met() {
            break AttemptOutcome::Converged;
        }
        if iterations >= budget {
            break AttemptOutcome::BudgetExhausted;
        }
        iterations += 1;

        match best_move(problem, &grams, current) {
            Some((trial, fitness)) => {
                grams = trial;
                current = fitness;
                tracker.record(&grams, problem.evaluate(&grams));
            }
            None => break tracker.settled(),
        }
    };

    debug!(?outcome, iterations, "greedy fallback finished");
    AttemptReport::from_tracker(tracker, outcome, iterations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolveOptions;
    use crate::models::{Category, GramRange, MacroTarget, Macros, MealSlot, PortionableItem};

    fn oats() -> Vec<PortionableItem> {
        vec![
            PortionableItem::adjustable(
                "oats",
                "Oats",
                Category::Carb,
                MealSlot::Breakfast,
                Macros::new(389.0, 16.9, 66.3, 6.9),
                GramRange::new(20, 150),
            )
            .with_step(5),
        ]
    }

    #[test]
    fn test_climbs_to_valid_plan() {
        let items = oats();
        // Exactly 60g of oats.
        let target = MacroTarget::new(233.4, 10.14, 39.78, 4.14);
        let options = SolveOptions::default();
        let problem = Problem::new(&items, &target, &options);

        let report = hill_climb(&problem, vec![20], 100);
        let best = report.best_valid.expect("valid plan");
        assert_eq!(best.grams, vec![60]);
        assert_eq!(report.outcome, AttemptOutcome::Converged);
    }

    #[test]
    fn test_budget_bounds_iterations() {
        let items = oats();
        let target = MacroTarget::new(233.4, 10.14, 39.78, 4.14);
        let options = SolveOptions::default();
        let problem = Problem::new(&items, &target, &options);

        let report = hill_climb(&problem, vec![20], 2);
        assert_eq!(report.iterations, 2);
        assert_eq!(report.outcome, AttemptOutcome::BudgetExhausted);
    }

    #[test]
    fn test_unreachable_target_stagnates() {
        let items = oats();
        let target = MacroTarget::new(2000.0, 150.0, 200.0, 67.0);
        let options = SolveOptions::default();
        let problem = Problem::new(&items, &target, &options);

        let report = hill_climb(&problem, vec![20], 100);
        assert_eq!(report.outcome, AttemptOutcome::Stagnant);
        assert_eq!(report.closest.grams, vec![150]);
    }
}
