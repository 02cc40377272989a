use crate::models::macros::Macros;

// ─────────────────────────────────────────────────────────────────────────────
// Item model
// ─────────────────────────────────────────────────────────────────────────────

/// Ceiling used when an item's maximum is 0 (unbounded).
pub const DEFAULT_MAX_GRAMS: u32 = 500;

/// Hard cap on any seasoning, regardless of per-item configuration.
pub const SEASONING_CAP_GRAMS: u32 = 15;

/// Seasoning grams when no scaling rate is known.
pub const SEASONING_FALLBACK_GRAMS: u32 = 5;

/// Upper bound for protein, carbs and fat per 100 g.
pub const MAX_NUTRIENT_PER_100G: f64 = 100.0;

/// Upper bound for calories per 100 g (pure fat is ~900).
pub const MAX_CALORIES_PER_100G: f64 = 900.0;

/// Protein + carbs + fat per 100 g may exceed 100 by label rounding slack.
pub const MAX_MACRO_SUM_PER_100G: f64 = 102.0;

// ─────────────────────────────────────────────────────────────────────────────
// Tolerances and options
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_CALORIE_TOLERANCE: f64 = 50.0;
pub const DEFAULT_MACRO_TOLERANCE: f64 = 1.0;

/// Total iteration budget across every strategy.
pub const DEFAULT_MAX_ITERATIONS: usize = 1500;

// ─────────────────────────────────────────────────────────────────────────────
// Solver
// ─────────────────────────────────────────────────────────────────────────────

/// Squared-error weights for the coordinate step. Macros sit far above
/// calories because their tolerance is ±1 g against ±50 kcal.
pub const GRADIENT_WEIGHTS: Macros = Macros::new(1.0, 10.0, 8.0, 10.0);

/// Absolute-error weights for the acceptance score.
pub const SCORE_WEIGHTS: Macros = Macros::new(1.0, 10.0, 10.0, 10.0);

/// Score penalty for a FREE item whose grams are not a multiple of 5.
pub const UNALIGNED_FREE_PENALTY: f64 = 0.5;
pub const ALIGNMENT_GRAMS: u32 = 5;

/// Score weight of the normalized distance from the range midpoint.
pub const MIDPOINT_DISTANCE_WEIGHT: f64 = 0.1;

/// Fitness multiplier for weighted excess beyond the tolerance window.
pub const OUT_OF_TOLERANCE_PENALTY: f64 = 100.0;

/// Share of the budget reserved for the greedy fallback, in percent.
pub const GREEDY_BUDGET_PERCENT: usize = 15;

/// Valid candidates collected before an attempt stops improving.
pub const SUCCESS_QUOTA: usize = 5;

/// Iterations without fitness improvement before an attempt is stagnant.
pub const STAGNATION_PATIENCE: usize = 20;

/// Weighted squared error treated as an exact hit.
pub const CONVERGENCE_EPSILON: f64 = 1e-6;

/// Minimum fitness decrease that counts as an improvement.
pub const IMPROVEMENT_EPSILON: f64 = 1e-9;

pub const FINE_TUNE_MAX_PASSES: usize = 5;
pub const FINE_TUNE_GRAM_OFFSETS: [u32; 3] = [1, 2, 3];
pub const FINE_TUNE_STEP_MULTIPLES: [u32; 3] = [1, 2, 3];

pub const GREEDY_STEP_MULTIPLES: [u32; 4] = [1, 2, 5, 10];

// ─────────────────────────────────────────────────────────────────────────────
// Meal floor
// ─────────────────────────────────────────────────────────────────────────────

/// Minimum calories for any non-snack slot that has food in it.
pub const MEAL_MIN_CALORIES: f64 = 100.0;

// ─────────────────────────────────────────────────────────────────────────────
// Daily targets
// ─────────────────────────────────────────────────────────────────────────────

pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Derived fat never drops below this, so targets stay plannable.
pub const FAT_FLOOR_GRAMS: f64 = 30.0;

pub const DEFAULT_DAILY_CALORIES: f64 = 2000.0;
pub const DEFAULT_DAILY_PROTEIN: f64 = 150.0;
pub const DEFAULT_DAILY_CARBS: f64 = 200.0;

/// Largest allowed gap between `4p + 4c + 9f` and calories for a resolved target.
pub const MAX_ENERGY_GAP_KCAL: f64 = 8.0;

// ─────────────────────────────────────────────────────────────────────────────
// Record conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Step used when a record sets none.
pub const DEFAULT_STEP_GRAMS: u32 = 5;

/// Name tokens that mark an otherwise unclassified item as a seasoning.
pub const SEASONING_NAME_PATTERNS: [&str; 12] = [
    "salt",
    "pepper",
    "sauce",
    "ketchup",
    "mustard",
    "mayo",
    "mayonnaise",
    "dressing",
    "spice",
    "seasoning",
    "vinegar",
    "soy",
];
