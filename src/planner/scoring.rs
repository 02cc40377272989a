use crate::config::SolveOptions;
use crate::models::{EditableMode, Macro, MacroTarget, Macros, PortionableItem, Portions};
use crate::planner::constants::*;

/// Score breakdown of one allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Raw achieved totals.
    pub totals: Macros,
    /// Totals at reporting precision; tolerance is judged on these.
    pub rounded: Macros,
    /// Every macro inside its tolerance window.
    pub valid: bool,
    /// Weighted |delta| plus naturalness penalties; lower is better.
    pub score: f64,
    /// Score plus a steep penalty for leaving the tolerance window.
    pub fitness: f64,
    /// Weighted |delta| only.
    pub weighted_delta: f64,
    /// Gradient-weighted squared error.
    pub squared_error: f64,
}

/// One solve call's immutable inputs with per-item data precomputed.
pub struct Problem<'a> {
    pub items: &'a [PortionableItem],
    pub target: &'a MacroTarget,
    pub options: &'a SolveOptions,
    adjustable: Vec<usize>,
    per_gram: Vec<Macros>,
}

impl<'a> Problem<'a> {
    pub fn new(
        items: &'a [PortionableItem],
        target: &'a MacroTarget,
        options: &'a SolveOptions,
    ) -> Self {
        let adjustable = items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_adjustable())
            .map(|(i, _)| i)
            .collect();
        let per_gram = items
            .iter()
            .map(|item| {
                if item.counts(options.seasonings_count_macros) {
                    item.per_gram()
                } else {
                    Macros::default()
                }
            })
            .collect();

        Self {
            items,
            target,
            options,
            adjustable,
            per_gram,
        }
    }

    /// Indices of the direct optimization variables.
    #[inline]
    pub fn adjustable(&self) -> &[usize] {
        &self.adjustable
    }

    /// Per-gram contribution to totals; zero for items that don't count.
    #[inline]
    pub fn per_gram(&self, index: usize) -> &Macros {
        &self.per_gram[index]
    }

    /// The input grams of every item.
    pub fn input_grams(&self) -> Vec<u32> {
        self.items.iter().map(|item| item.current_grams).collect()
    }

    pub fn totals(&self, grams: &[u32]) -> Macros {
        let mut totals = Macros::default();
        for (per_gram, &g) in self.per_gram.iter().zip(grams) {
            totals.add_scaled(per_gram, g as f64);
        }
        totals
    }

    pub fn evaluate(&self, grams: &[u32]) -> Evaluation {
        let totals = self.totals(grams);
        let rounded = totals.rounded();
        let delta = totals.minus(self.target);
        let weighted_delta = delta.weighted_magnitude();
        let score = weighted_delta + naturalness_penalty(self.items, grams);
        let excess = tolerance_excess(&rounded, self.target, self.options);

        Evaluation {
            totals,
            rounded,
            valid: self.options.tolerances.accepts(self.target, &rounded),
            score,
            fitness: score + OUT_OF_TOLERANCE_PENALTY * excess,
            weighted_delta,
            squared_error: squared_error(&delta),
        }
    }

    /// Grams keyed by item id.
    pub fn portions(&self, grams: &[u32]) -> Portions {
        self.items
            .iter()
            .zip(grams)
            .map(|(item, &g)| (item.id.clone(), g))
            .collect()
    }
}

/// Secondary "naturalness" terms of the score.
///
/// FREE items off a multiple of 5 cost 0.5 each; every adjustable item costs
/// 0.1 × its normalized distance from the range midpoint.
pub fn naturalness_penalty(items: &[PortionableItem], grams: &[u32]) -> f64 {
    let mut penalty = 0.0;
    for (item, &g) in items.iter().zip(grams) {
        let Some(range) = item.adjustable_range() else {
            continue;
        };
        if item.editable_mode() == EditableMode::Free && g % ALIGNMENT_GRAMS != 0 {
            penalty += UNALIGNED_FREE_PENALTY;
        }
        let half = range.half_span();
        if half > 0.0 {
            penalty += MIDPOINT_DISTANCE_WEIGHT * (g as f64 - range.midpoint()).abs() / half;
        }
    }
    penalty
}

/// Score-weighted distance of `achieved` outside the tolerance windows.
pub fn tolerance_excess(achieved: &Macros, target: &MacroTarget, options: &SolveOptions) -> f64 {
    Macro::ALL
        .iter()
        .map(|&m| {
            SCORE_WEIGHTS.get(m)
                * options
                    .tolerances
                    .get(m)
                    .excess(target.get(m), achieved.get(m))
        })
        .sum()
}

/// Gradient-weighted squared error of a delta.
pub fn squared_error(delta: &Macros) -> f64 {
    Macro::ALL
        .iter()
        .map(|&m| GRADIENT_WEIGHTS.get(m) * delta.get(m).powi(2))
        .sum()
}
