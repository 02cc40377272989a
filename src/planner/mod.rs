pub mod attempt;
pub mod constants;
pub mod feasibility;
pub mod greedy;
pub mod init;
pub mod meal_floor;
pub mod scoring;
pub mod seasoning;
pub mod solver;
pub mod targets;
pub mod validation;

pub use feasibility::{analyze, envelope, Envelope, FeasibilityReport};
pub use meal_floor::{check_meal_floor, meal_calories, MealFloorViolation};
pub use scoring::{Evaluation, Problem};
pub use seasoning::rescale;
pub use solver::{solve, StrategyBudgets};
pub use targets::{
    derive_fat, resolve_target, resolve_target_from, week_start, DayTargets, NutritionSettings,
    WeeklyOverride,
};
pub use validation::validate_items;
