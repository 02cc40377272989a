use rand::rngs::StdRng;
use rand::SeedableRng;

use portion_optimizer_rs::models::{Macros, PortionableItem, SolveResult};
use portion_optimizer_rs::planner::check_meal_floor;
use portion_optimizer_rs::sweep::{generate_scenarios, Scenario, ScenarioConfig};
use portion_optimizer_rs::{solve, SolveOptions};

fn scenarios(seed: u64, count: usize) -> Vec<Scenario> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_scenarios(&mut rng, count, &ScenarioConfig::default())
}

fn grams_of(items: &[PortionableItem], result: &SolveResult) -> Vec<u32> {
    items.iter().map(|i| result.portions()[&i.id]).collect()
}

fn totals_of(items: &[PortionableItem], grams: &[u32]) -> Macros {
    let mut totals = Macros::default();
    for (item, &g) in items.iter().zip(grams) {
        if item.counts(false) {
            totals.add_scaled(&item.per_gram(), g as f64);
        }
    }
    totals.rounded()
}

#[test]
fn test_success_is_within_tolerance() {
    let options = SolveOptions::default();
    let mut successes = 0;

    for scenario in scenarios(11, 30) {
        let result = solve(&scenario.items, &scenario.target, &options);
        if !result.is_success() {
            continue;
        }
        successes += 1;

        let grams = grams_of(&scenario.items, &result);
        let recomputed = totals_of(&scenario.items, &grams);
        assert_eq!(&recomputed, result.totals(), "scenario {}", scenario.index);
        assert!(
            options.tolerances.accepts(&scenario.target, result.totals()),
            "scenario {}: {:?} vs {:?}",
            scenario.index,
            result.totals(),
            scenario.target
        );
        assert!(check_meal_floor(&scenario.items, &grams, false).is_empty());
    }

    // Every target was built from a real allocation.
    assert!(successes > 0);
}

#[test]
fn test_portions_respect_constraints() {
    let options = SolveOptions::default();

    for scenario in scenarios(23, 30) {
        let result = solve(&scenario.items, &scenario.target, &options);
        assert_eq!(result.portions().len(), scenario.items.len());

        for (item, &planted) in scenario.items.iter().zip(&scenario.planted) {
            let grams = result.portions()[&item.id];
            if item.is_adjustable() {
                let (lo, hi) = item.interval();
                assert!(
                    grams >= lo && grams <= hi,
                    "{} at {}g outside [{}, {}]",
                    item.name,
                    grams,
                    lo,
                    hi
                );
                assert!(item.rounding().is_aligned(grams));
            } else {
                assert_eq!(grams, planted, "locked {} moved", item.name);
            }
        }
    }
}

#[test]
fn test_best_effort_never_degenerate() {
    let options = SolveOptions {
        max_iterations: 20,
        ..Default::default()
    };

    for scenario in scenarios(31, 20) {
        let result = solve(&scenario.items, &scenario.target, &options);
        if result.is_success() {
            continue;
        }
        let adjustable: Vec<u32> = scenario
            .items
            .iter()
            .filter(|i| i.is_adjustable())
            .map(|i| result.portions()[&i.id])
            .collect();
        assert!(adjustable.iter().any(|&g| g > 0));
    }
}

#[test]
fn test_solve_is_deterministic() {
    let options = SolveOptions {
        debug_mode: true,
        ..Default::default()
    };

    for scenario in scenarios(47, 10) {
        let a = serde_json::to_string(&solve(&scenario.items, &scenario.target, &options)).unwrap();
        let b = serde_json::to_string(&solve(&scenario.items, &scenario.target, &options)).unwrap();
        assert_eq!(a, b, "scenario {}", scenario.index);
    }
}

#[test]
fn test_iterations_bounded_by_budget() {
    let options = SolveOptions {
        max_iterations: 60,
        debug_mode: true,
        ..Default::default()
    };

    for scenario in scenarios(53, 15) {
        let result = solve(&scenario.items, &scenario.target, &options);
        let spent: usize = result
            .diagnostics()
            .map(|d| d.attempts.iter().map(|a| a.iterations).sum())
            .unwrap_or(0);
        assert!(spent <= 60, "scenario {} spent {}", scenario.index, spent);
    }
}
