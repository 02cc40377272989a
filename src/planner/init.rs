//! Starting allocations for the gradient strategies.

use crate::models::{Macro, Macros, Strategy};
use crate::planner::scoring::Problem;
use crate::planner::seasoning::rescale;

/// Starting grams for `strategy`. Non-adjustable items keep their input grams;
/// seasonings are rescaled to match.
pub fn initial_grams(problem: &Problem, strategy: Strategy) -> Vec<u32> {
    let mut grams = problem.input_grams();
    match strategy {
        Strategy::MacroBalance => macro_balance(problem, &mut grams),
        Strategy::Midpoint | Strategy::Greedy => midpoint(problem, &mut grams),
        Strategy::CurrentValue => current_value(problem, &mut grams),
    }
    rescale(problem.items, &mut grams);
    grams
}

/// Every adjustable item at its range midpoint.
pub fn midpoint(problem: &Problem, grams: &mut [u32]) {
    for &i in problem.adjustable() {
        let item = &problem.items[i];
        if let Some(range) = item.adjustable_range() {
            grams[i] = range.snap(item.rounding(), range.midpoint());
        }
    }
}

fn current_value(problem: &Problem, grams: &mut [u32]) {
    for &i in problem.adjustable() {
        let item = &problem.items[i];
        if let Some(range) = item.adjustable_range() {
            grams[i] = range.snap(item.rounding(), item.current_grams as f64);
        }
    }
}

/// The nutrient an item carries most of, relative to its target.
fn dominant_macro(per_gram: &Macros, target: &Macros) -> Option<Macro> {
    let mut best: Option<(Macro, f64)> = None;
    for m in Macro::NUTRIENTS {
        let wanted = target.get(m);
        if wanted <= 0.0 || per_gram.get(m) <= 0.0 {
            continue;
        }
        let ratio = per_gram.get(m) / wanted;
        if best.is_none_or(|(_, r)| ratio > r) {
            best = Some((m, ratio));
        }
    }
    best.map(|(m, _)| m)
}

/// Group adjustable items by dominant macro and size each group so it alone
/// covers what the fixed items leave of that macro.
fn macro_balance(problem: &Problem, grams: &mut [u32]) {
    let mut fixed = Macros::default();
    for (i, &g) in grams.iter().enumerate() {
        if !problem.items[i].is_adjustable() {
            fixed.add_scaled(problem.per_gram(i), g as f64);
        }
    }

    let mut remaining = Macros::default();
    for m in Macro::ALL {
        *remaining.get_mut(m) = (problem.target.get(m) - fixed.get(m)).max(0.0);
    }

    let dominant: Vec<Option<Macro>> = problem
        .adjustable()
        .iter()
        .map(|&i| dominant_macro(problem.per_gram(i), problem.target))
        .collect();

    let mut group_density = Macros::default();
    for (&i, m) in problem.adjustable().iter().zip(&dominant) {
        if let Some(m) = m {
            *group_density.get_mut(*m) += problem.per_gram(i).get(*m);
        }
    }

    for (&i, m) in problem.adjustable().iter().zip(&dominant) {
        let item = &problem.items[i];
        let Some(range) = item.adjustable_range() else {
            continue;
        };
        let wanted = match m {
            Some(m) if group_density.get(*m) > 0.0 => remaining.get(*m) / group_density.get(*m),
            _ => range.midpoint(),
        };
        grams[i] = range.snap(item.rounding(), wanted);
    }
}
