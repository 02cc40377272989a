//! One gradient attempt: coordinate-descent sweeps, fine-tuning at fixed
//! points, and the bookkeeping shared with the greedy fallback.

use tracing::debug;

use crate::models::{AttemptOutcome, GramRange, Macro, Macros, RoundingRule};
use crate::planner::constants::*;
use crate::planner::scoring::{Evaluation, Problem};
use crate::planner::seasoning::{rescale, seasoning_grams};

/// An allocation together with its evaluation.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub grams: Vec<u32>,
    pub evaluation: Evaluation,
}

/// Best-so-far tracking for one attempt.
#[derive(Debug, Clone)]
pub struct Tracker {
    /// Lowest-score valid allocation seen.
    pub best_valid: Option<Candidate>,
    /// Lowest-fitness allocation seen, valid or not.
    pub closest: Candidate,
    /// Valid allocations evaluated so far.
    pub valid_count: usize,
    /// Consecutive records without improvement.
    pub stall: usize,
}

impl Tracker {
    pub fn new(grams: Vec<u32>, evaluation: Evaluation) -> Self {
        let valid = evaluation.valid;
        let start = Candidate { grams, evaluation };
        Self {
            best_valid: valid.then(|| start.clone()),
            closest: start,
            valid_count: usize::from(valid),
            stall: 0,
        }
    }

    /// Record an evaluated allocation. Returns true if it improved anything.
    pub fn record(&mut self, grams: &[u32], evaluation: Evaluation) -> bool {
        let mut improved = false;

        if evaluation.valid {
            self.valid_count += 1;
            let better = self
                .best_valid
                .as_ref()
                .is_none_or(|best| evaluation.score < best.evaluation.score - IMPROVEMENT_EPSILON);
            if better {
                self.best_valid = Some(Candidate {
                    grams: grams.to_vec(),
                    evaluation: evaluation.clone(),
                });
                improved = true;
            }
        }

        if evaluation.fitness < self.closest.evaluation.fitness - IMPROVEMENT_EPSILON {
            self.closest = Candidate {
                grams: grams.to_vec(),
                evaluation,
            };
            improved = true;
        }

        self.stall = if improved { 0 } else { self.stall + 1 };
        improved
    }

    pub fn quota_met(&self) -> bool {
        self.valid_count >= SUCCESS_QUOTA
    }

    /// Outcome for an attempt that can make no further progress.
    pub fn settled(&self) -> AttemptOutcome {
        if self.best_valid.is_some() {
            AttemptOutcome::Converged
        } else {
            AttemptOutcome::Stagnant
        }
    }
}

/// What one attempt produced.
#[derive(Debug, Clone)]
pub struct AttemptReport {
    pub outcome: AttemptOutcome,
    pub iterations: usize,
    pub best_valid: Option<Candidate>,
    pub closest: Candidate,
}

impl AttemptReport {
    pub fn from_tracker(tracker: Tracker, outcome: AttemptOutcome, iterations: usize) -> Self {
        Self {
            outcome,
            iterations,
            best_valid: tracker.best_valid,
            closest: tracker.closest,
        }
    }

    /// The valid allocation if one was found, otherwise the closest.
    pub fn best(&self) -> &Candidate {
        self.best_valid.as_ref().unwrap_or(&self.closest)
    }
}

/// Move `grams` by `delta`, snapped and kept inside `range`.
/// `None` when the move lands back on `grams`.
pub fn shifted(range: &GramRange, rounding: RoundingRule, grams: u32, delta: i64) -> Option<u32> {
    let moved = (grams as i64 + delta).max(0);
    let snapped = range.snap(rounding, moved as f64);
    (snapped != grams).then_some(snapped)
}

/// Signed moves in run order: `+a, -a` for each magnitude.
pub fn signed_moves(magnitudes: impl IntoIterator<Item = i64>) -> Vec<i64> {
    magnitudes.into_iter().flat_map(|m| [m, -m]).collect()
}

/// One Gauss-Seidel sweep over the adjustable items.
///
/// Each item takes the weighted least-squares step toward the remaining
/// need. Seasonings are rescaled after every step, and totals take both
/// changes before the next item is visited. Returns true if any gram changed.
pub fn gradient_sweep(problem: &Problem, grams: &mut [u32]) -> bool {
    let mut totals = problem.totals(grams);
    let mut changed = false;

    for &i in problem.adjustable() {
        let item = &problem.items[i];
        let Some(range) = item.adjustable_range() else {
            continue;
        };
        let d = problem.per_gram(i);

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for m in Macro::ALL {
            let w = GRADIENT_WEIGHTS.get(m);
            let need = problem.target.get(m) - totals.get(m);
            numerator += w * need * d.get(m);
            denominator += w * d.get(m) * d.get(m);
        }
        if denominator <= 0.0 {
            continue;
        }

        let old = grams[i];
        let new = range.snap(item.rounding(), old as f64 + numerator / denominator);
        if new != old {
            totals.add_scaled(d, new as f64 - old as f64);
            grams[i] = new;
            rescale_into(problem, grams, &mut totals);
            changed = true;
        }
    }

    rescale_into(problem, grams, &mut totals) || changed
}

/// Rescale seasonings in place and carry their gram changes into `totals`.
fn rescale_into(problem: &Problem, grams: &mut [u32], totals: &mut Macros) -> bool {
    let mut changed = false;
    for s in 0..problem.items.len() {
        if !problem.items[s].is_seasoning() {
            continue;
        }
        let updated = seasoning_grams(problem.items, grams, s);
        if updated != grams[s] {
            totals.add_scaled(problem.per_gram(s), updated as f64 - grams[s] as f64);
            grams[s] = updated;
            changed = true;
        }
    }
    changed
}

/// Local search around a fixed point of the sweep.
///
/// Each pass visits the adjustable items in order and gives every one its
/// best move among ±1..3 g and ±1..3 steps, judged by fitness and applied
/// before the next item is tried. Passes repeat until one changes nothing,
/// up to a fixed number. Returns true if any pass changed the allocation.
pub fn fine_tune(problem: &Problem, grams: &mut [u32]) -> bool {
    let mut current = problem.evaluate(grams).fitness;
    let mut changed = false;

    for _ in 0..FINE_TUNE_MAX_PASSES {
        let mut pass_changed = false;

        for &i in problem.adjustable() {
            let item = &problem.items[i];
            let Some(range) = item.adjustable_range() else {
                continue;
            };
            let step = item.step_grams() as i64;
            let moves = signed_moves(
                FINE_TUNE_GRAM_OFFSETS
                    .iter()
                    .map(|&g| g as i64)
                    .chain(FINE_TUNE_STEP_MULTIPLES.iter().map(|&k| k as i64 * step)),
            );

            let mut best: Option<(Vec<u32>, f64)> = None;
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

            if let Some((trial, fitness)) = best {
                grams.copy_from_slice(&trial);
                current = fitness;
                pass_changed = true;
            }
        }

        if !pass_changed {
            break;
        }
        changed = true;
    }

    changed
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Searching,
    Done(AttemptOutcome),
}

/// A single gradient attempt from one starting allocation.
pub struct GradientAttempt<'p, 'a> {
    problem: &'p Problem<'a>,
    grams: Vec<u32>,
    tracker: Tracker,
    budget: usize,
    iterations: usize,
    phase: Phase,
}

impl<'p, 'a> GradientAttempt<'p, 'a> {
    pub fn new(problem: &'p Problem<'a>, start: Vec<u32>, budget: usize) -> Self {
        let evaluation = problem.evaluate(&start);
        Self {
            problem,
            tracker: Tracker::new(start.clone(), evaluation),
            grams: start,
            budget,
            iterations: 0,
            phase: Phase::Searching,
        }
    }

    pub fn is_done(&self) -> bool {
        self.phase != Phase::Searching
    }

    /// Advance by one sweep and return the terminal outcome once reached.
    pub fn step(&mut self) -> Option<AttemptOutcome> {
        if let Phase::Done(outcome) = self.phase {
            return Some(outcome);
        }
        if self.iterations >= self.budget {
            return self.finish(AttemptOutcome::BudgetExhausted);
        }

        self.iterations += 1;
        let mut moved = gradient_sweep(self.problem, &mut self.grams);
        if !moved {
            moved = fine_tune(self.problem, &mut self.grams);
        }

        let evaluation = self.problem.evaluate(&self.grams);
        let squared_error = evaluation.squared_error;
        self.tracker.record(&self.grams, evaluation);

        if self.tracker.quota_met() || squared_error < CONVERGENCE_EPSILON {
            self.finish(AttemptOutcome::Converged)
        } else if !moved {
            let outcome = self.tracker.settled();
            self.finish(outcome)
        } else if self.tracker.stall >= STAGNATION_PATIENCE {
            self.finish(AttemptOutcome::Stagnant)
        } else {
            None
        }
    }

    fn finish(&mut self, outcome: AttemptOutcome) -> Option<AttemptOutcome> {
        debug!(
            ?outcome,
            iterations = self.iterations,
            valid = self.tracker.valid_count,
            "gradient attempt finished"
        );
        self.phase = Phase::Done(outcome);
        Some(outcome)
    }

    pub fn run(mut self) -> AttemptReport {
        let outcome = loop {
            if let Some(outcome) = self.step() {
                break outcome;
            }
        };
        AttemptReport::from_tracker(self.tracker, outcome, self.iterations)
    }
}
