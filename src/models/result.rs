use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::models::item::MealSlot;
use crate::models::macros::{Macro, Macros};

/// Solved grams keyed by item id, in id order.
pub type Portions = BTreeMap<String, u32>;

/// Closed taxonomy of solve failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    InvalidProductNutrition,
    NoAdjustableItems,
    ImpossibleTargets,
    Stagnation,
    MaxIterationsExceeded,
}

impl FailureReason {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureReason::InvalidProductNutrition => "invalid_product_nutrition",
            FailureReason::NoAdjustableItems => "no_adjustable_items",
            FailureReason::ImpossibleTargets => "impossible_targets",
            FailureReason::Stagnation => "stagnation",
            FailureReason::MaxIterationsExceeded => "max_iterations_exceeded",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which constraint a blocker reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockerKind {
    InvalidNutrition,
    InvalidRange,
    MaxAchievable(Macro),
    MinAchievable(Macro),
    AtMaximum,
    AtMinimum,
    LockedContribution,
    MealBelowMinimum,
    OutOfTolerance(Macro),
}

impl std::fmt::Display for BlockerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockerKind::InvalidNutrition => f.write_str("invalid_nutrition"),
            BlockerKind::InvalidRange => f.write_str("invalid_range"),
            BlockerKind::MaxAchievable(m) => write!(f, "max_achievable_{}", m),
            BlockerKind::MinAchievable(m) => write!(f, "min_achievable_{}", m),
            BlockerKind::AtMaximum => f.write_str("at_maximum"),
            BlockerKind::AtMinimum => f.write_str("at_minimum"),
            BlockerKind::LockedContribution => f.write_str("locked"),
            BlockerKind::MealBelowMinimum => f.write_str("meal_below_minimum"),
            BlockerKind::OutOfTolerance(m) => write!(f, "out_of_tolerance_{}", m),
        }
    }
}

impl Serialize for BlockerKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Structured explanation of why a plan cannot be met.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Blocker {
    /// Item (or meal slot, or "total") the blocker is about.
    pub item_name: String,
    pub constraint: BlockerKind,
    pub value: f64,
    pub detail: String,
}

impl Blocker {
    pub fn new(item_name: &str, constraint: BlockerKind, value: f64, detail: String) -> Self {
        Self {
            item_name: item_name.to_string(),
            constraint,
            value,
            detail,
        }
    }
}

/// Initialization strategy of one solver attempt, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    MacroBalance,
    Midpoint,
    CurrentValue,
    Greedy,
}

/// Terminal state of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Converged,
    Stagnant,
    BudgetExhausted,
}

/// Per-attempt record kept when `debug_mode` is on.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptSummary {
    pub strategy: Strategy,
    pub outcome: AttemptOutcome,
    pub iterations: usize,
    /// Weighted delta of the attempt's best allocation.
    pub weighted_delta: f64,
    pub found_valid: bool,
    /// Slots that broke the meal floor, with their calories.
    pub meal_floor_violations: Vec<(MealSlot, f64)>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SolveDiagnostics {
    pub attempts: Vec<AttemptSummary>,
}

/// Outcome of one `solve` call.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SolveResult {
    Success {
        portions: Portions,
        totals: Macros,
        score: f64,
        iterations: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        diagnostics: Option<SolveDiagnostics>,
    },
    Failure {
        reason: FailureReason,
        blockers: Vec<Blocker>,
        closest_totals: Macros,
        target_delta: Macros,
        /// Always present, never all-zero for adjustable items.
        best_effort_portions: Portions,
        best_effort_totals: Macros,
        #[serde(skip_serializing_if = "Option::is_none")]
        diagnostics: Option<SolveDiagnostics>,
    },
}

impl SolveResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SolveResult::Success { .. })
    }

    /// Accepted portions on success, best-effort portions on failure.
    pub fn portions(&self) -> &Portions {
        match self {
            SolveResult::Success { portions, .. } => portions,
            SolveResult::Failure {
                best_effort_portions,
                ..
            } => best_effort_portions,
        }
    }

    /// Totals of `portions()`.
    pub fn totals(&self) -> &Macros {
        match self {
            SolveResult::Success { totals, .. } => totals,
            SolveResult::Failure {
                best_effort_totals, ..
            } => best_effort_totals,
        }
    }

    pub fn reason(&self) -> Option<FailureReason> {
        match self {
            SolveResult::Success { .. } => None,
            SolveResult::Failure { reason, .. } => Some(*reason),
        }
    }

    pub fn blockers(&self) -> &[Blocker] {
        match self {
            SolveResult::Success { .. } => &[],
            SolveResult::Failure { blockers, .. } => blockers,
        }
    }

    pub fn diagnostics(&self) -> Option<&SolveDiagnostics> {
        match self {
            SolveResult::Success { diagnostics, .. } | SolveResult::Failure { diagnostics, .. } => {
                diagnostics.as_ref()
            }
        }
    }
}
