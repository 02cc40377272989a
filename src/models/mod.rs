pub mod item;
pub mod macros;
pub mod record;
pub mod result;

pub use item::{
    AdjustMode, Category, EditableMode, GramRange, MealSlot, PortionConstraint, PortionableItem,
    RoundingRule, SeasoningRule,
};
pub use macros::{Macro, MacroTarget, Macros, Tolerance, ToleranceWindow};
pub use record::{ItemRecord, MealContext, ProductRecord};
pub use result::{
    AttemptOutcome, AttemptSummary, Blocker, BlockerKind, FailureReason, Portions,
    SolveDiagnostics, SolveResult, Strategy,
};
