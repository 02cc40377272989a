use serde::{Deserialize, Serialize};

use crate::models::macros::Macros;
use crate::planner::constants::{DEFAULT_MAX_GRAMS, SEASONING_CAP_GRAMS};

/// Closed set of food categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Protein,
    Carb,
    Vegetable,
    Dairy,
    Fruit,
    Snack,
    Seasoning,
    Premade,
    Fat,
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Protein => "protein",
            Category::Carb => "carb",
            Category::Vegetable => "vegetable",
            Category::Dairy => "dairy",
            Category::Fruit => "fruit",
            Category::Snack => "snack",
            Category::Seasoning => "seasoning",
            Category::Premade => "premade",
            Category::Fat => "fat",
            Category::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snack,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snack => "snack",
        }
    }
}

impl std::fmt::Display for MealSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much freedom the solver has over an item's grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EditableMode {
    Locked,
    Bounded,
    Free,
}

/// The two solver-adjustable modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustMode {
    #[default]
    Bounded,
    Free,
}

/// Snap granularity applied to every solver-chosen gram value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingRule {
    #[default]
    Nearest1,
    Nearest5,
    Nearest10,
    /// Multiples of a whole unit, e.g. 50 for one egg.
    WholeUnit(u32),
}

impl RoundingRule {
    #[inline]
    pub fn granularity(self) -> u32 {
        match self {
            RoundingRule::Nearest1 => 1,
            RoundingRule::Nearest5 => 5,
            RoundingRule::Nearest10 => 10,
            RoundingRule::WholeUnit(unit) => unit.max(1),
        }
    }

    /// Round a non-negative gram value to the nearest multiple.
    pub fn snap(self, grams: f64) -> u32 {
        let g = self.granularity() as f64;
        ((grams.max(0.0) / g).round() * g) as u32
    }

    pub fn is_aligned(self, grams: u32) -> bool {
        grams % self.granularity() == 0
    }
}

/// Inclusive gram interval. `max == 0` means unbounded (default ceiling).
///
/// Deserialization goes through [`GramRange::new`], so a stored minimum above
/// the ceiling is pulled down to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "GramRangeRepr")]
pub struct GramRange {
    pub min: u32,
    pub max: u32,
}

#[derive(Deserialize)]
struct GramRangeRepr {
    min: u32,
    #[serde(default)]
    max: u32,
}

impl From<GramRangeRepr> for GramRange {
    fn from(repr: GramRangeRepr) -> Self {
        GramRange::new(repr.min, repr.max)
    }
}

impl GramRange {
    pub fn new(min: u32, max: u32) -> Self {
        let range = Self { min, max };
        Self {
            min: min.min(range.ceiling()),
            max,
        }
    }

    /// Effective upper bound.
    #[inline]
    pub fn ceiling(&self) -> u32 {
        if self.max == 0 {
            DEFAULT_MAX_GRAMS
        } else {
            self.max
        }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min as f64 + self.ceiling() as f64) / 2.0
    }

    pub fn half_span(&self) -> f64 {
        (self.ceiling() as f64 - self.min as f64) / 2.0
    }

    pub fn contains(&self, grams: u32) -> bool {
        grams >= self.min && grams <= self.ceiling()
    }

    /// False when the minimum sits above the effective ceiling.
    pub fn is_ordered(&self) -> bool {
        self.min <= self.ceiling()
    }

    /// Clamp `grams` into range and snap it to `rule`, staying inside the range.
    ///
    /// When no multiple of the rule fits in the range, falls back to the
    /// nearest whole gram. An inverted range collapses onto its ceiling.
    pub fn snap(&self, rule: RoundingRule, grams: f64) -> u32 {
        let hi = self.ceiling();
        let lo = self.min.min(hi);
        let clamped = grams.clamp(lo as f64, hi as f64);
        let snapped = rule.snap(clamped);
        if (lo..=hi).contains(&snapped) {
            return snapped;
        }

        let g = rule.granularity();
        let candidate = if snapped > hi {
            hi / g * g
        } else {
            lo.div_ceil(g) * g
        };
        if (lo..=hi).contains(&candidate) {
            candidate
        } else {
            clamped.round() as u32
        }
    }
}

/// Seasoning scaling rule: grams of this item per 100 g of its basis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasoningRule {
    #[serde(default)]
    pub rate: Option<f64>,
    /// Lookup-only reference to the paired item's id.
    #[serde(default)]
    pub paired_item_id: Option<String>,
}

/// What the solver may do with an item's grams.
///
/// Seasonings carry no range at all: their cap is fixed, so an oversized
/// seasoning maximum has no representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PortionConstraint {
    Locked,
    Adjustable {
        #[serde(default)]
        adjust: AdjustMode,
        range: GramRange,
        #[serde(default = "default_step")]
        step_grams: u32,
        #[serde(default)]
        rounding: RoundingRule,
    },
    Derived(SeasoningRule),
}

fn default_step() -> u32 {
    1
}

/// One ingredient instance within a single solve call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortionableItem {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub meal_slot: MealSlot,
    /// Nutrients per 100 g.
    pub density: Macros,
    pub constraint: PortionConstraint,
    /// Fraction of nominal mass counted toward totals, in (0, 1].
    pub eaten_factor: f64,
    pub current_grams: u32,
    pub counts_toward_totals: bool,
}

impl PortionableItem {
    /// An adjustable (BOUNDED) item starting at its range minimum.
    ///
    /// A seasoning-category item becomes a derived seasoning instead.
    pub fn adjustable(
        id: &str,
        name: &str,
        category: Category,
        meal_slot: MealSlot,
        density: Macros,
        range: GramRange,
    ) -> Self {
        let item = Self {
            id: id.to_string(),
            name: name.to_string(),
            category,
            meal_slot,
            density,
            constraint: PortionConstraint::Adjustable {
                adjust: AdjustMode::Bounded,
                range,
                step_grams: 1,
                rounding: RoundingRule::Nearest1,
            },
            eaten_factor: 1.0,
            current_grams: range.min,
            counts_toward_totals: true,
        };
        if category == Category::Seasoning {
            item.into_seasoning(SeasoningRule::default())
        } else {
            item
        }
    }

    /// An item the solver must never change.
    pub fn locked(
        id: &str,
        name: &str,
        category: Category,
        meal_slot: MealSlot,
        density: Macros,
        grams: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category,
            meal_slot,
            density,
            constraint: PortionConstraint::Locked,
            eaten_factor: 1.0,
            current_grams: grams,
            counts_toward_totals: true,
        }
    }

    /// A seasoning whose grams are derived from its basis.
    pub fn seasoning(
        id: &str,
        name: &str,
        meal_slot: MealSlot,
        density: Macros,
        rule: SeasoningRule,
    ) -> Self {
        Self::locked(id, name, Category::Seasoning, meal_slot, density, 0).into_seasoning(rule)
    }

    fn into_seasoning(mut self, rule: SeasoningRule) -> Self {
        self.category = Category::Seasoning;
        self.constraint = PortionConstraint::Derived(rule);
        self.counts_toward_totals = false;
        self.current_grams = self.current_grams.min(SEASONING_CAP_GRAMS);
        self
    }

    pub fn with_step(mut self, step: u32) -> Self {
        if let PortionConstraint::Adjustable { step_grams, .. } = &mut self.constraint {
            *step_grams = step.max(1);
        }
        self
    }

    pub fn with_rounding(mut self, rule: RoundingRule) -> Self {
        if let PortionConstraint::Adjustable { rounding, .. } = &mut self.constraint {
            *rounding = rule;
        }
        self
    }

    pub fn with_mode(mut self, mode: AdjustMode) -> Self {
        if let PortionConstraint::Adjustable { adjust, .. } = &mut self.constraint {
            *adjust = mode;
        }
        self
    }

    pub fn with_current_grams(mut self, grams: u32) -> Self {
        self.current_grams = grams;
        self
    }

    pub fn with_eaten_factor(mut self, factor: f64) -> Self {
        self.eaten_factor = factor;
        self
    }

    pub fn counting(mut self, counts: bool) -> Self {
        self.counts_toward_totals = counts;
        self
    }

    pub fn editable_mode(&self) -> EditableMode {
        match &self.constraint {
            PortionConstraint::Adjustable { adjust, .. } if !self.is_seasoning() => match adjust {
                AdjustMode::Bounded => EditableMode::Bounded,
                AdjustMode::Free => EditableMode::Free,
            },
            _ => EditableMode::Locked,
        }
    }

    #[inline]
    pub fn is_seasoning(&self) -> bool {
        self.category == Category::Seasoning
            || matches!(self.constraint, PortionConstraint::Derived(_))
    }

    /// Direct optimization variable: adjustable and not a seasoning.
    #[inline]
    pub fn is_adjustable(&self) -> bool {
        self.editable_mode() != EditableMode::Locked
    }

    pub fn seasoning_rule(&self) -> Option<&SeasoningRule> {
        match &self.constraint {
            PortionConstraint::Derived(rule) => Some(rule),
            _ => None,
        }
    }

    /// Achievable `(min, max)` grams: a point for locked items, the capped
    /// interval for seasonings, the configured range otherwise.
    pub fn interval(&self) -> (u32, u32) {
        if self.is_seasoning() {
            return (0, SEASONING_CAP_GRAMS);
        }
        match &self.constraint {
            PortionConstraint::Adjustable { range, .. } => (range.min, range.ceiling()),
            _ => (self.current_grams, self.current_grams),
        }
    }

    /// The solver's search range, for adjustable items only.
    pub fn adjustable_range(&self) -> Option<GramRange> {
        match &self.constraint {
            PortionConstraint::Adjustable { range, .. } if self.is_adjustable() => Some(*range),
            _ => None,
        }
    }

    pub fn step_grams(&self) -> u32 {
        match &self.constraint {
            PortionConstraint::Adjustable { step_grams, .. } => (*step_grams).max(1),
            _ => 1,
        }
    }

    pub fn rounding(&self) -> RoundingRule {
        match &self.constraint {
            PortionConstraint::Adjustable { rounding, .. } => *rounding,
            _ => RoundingRule::Nearest1,
        }
    }

    /// Nutrients contributed per gram, eaten factor applied.
    pub fn per_gram(&self) -> Macros {
        self.density.scale(self.eaten_factor / 100.0)
    }

    /// Nutrients contributed by `grams` of this item.
    pub fn contribution(&self, grams: u32) -> Macros {
        self.per_gram().scale(grams as f64)
    }

    /// Whether this item's nutrients are summed, given the caller's seasoning flag.
    pub fn counts(&self, seasonings_count_macros: bool) -> bool {
        if self.is_seasoning() {
            seasonings_count_macros
        } else {
            self.counts_toward_totals
        }
    }

    /// Debug string for logging.
    pub fn debug_string(&self) -> String {
        format!(
            "{} [{}] {}g: {} kcal, P:{} C:{} F:{} per 100g",
            self.name,
            self.category.as_str(),
            self.current_grams,
            self.density.calories,
            self.density.protein,
            self.density.carbs,
            self.density.fat
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chicken() -> PortionableItem {
        PortionableItem::adjustable(
            "chicken",
            "Chicken breast",
            Category::Protein,
            MealSlot::Lunch,
            Macros::new(165.0, 31.0, 0.0, 3.6),
            GramRange::new(100, 300),
        )
        .with_step(10)
    }

    #[test]
    fn test_range_unbounded_ceiling() {
        let range = GramRange::new(20, 0);
        assert_eq!(range.ceiling(), DEFAULT_MAX_GRAMS);
        assert!(range.contains(500));
        assert!(!range.contains(501));
        assert_eq!(range.midpoint(), 260.0);
    }

    #[test]
    fn test_snap_respects_rule_and_range() {
        let range = GramRange::new(80, 250);
        assert_eq!(range.snap(RoundingRule::Nearest10, 134.0), 130);
        assert_eq!(range.snap(RoundingRule::Nearest10, 999.0), 250);
        assert_eq!(range.snap(RoundingRule::Nearest5, 10.0), 80);
        assert_eq!(range.snap(RoundingRule::Nearest1, 133.4), 133);
        // No multiple of 50 fits in [80, 95]: fall back to whole grams.
        let narrow = GramRange::new(80, 95);
        assert_eq!(narrow.snap(RoundingRule::WholeUnit(50), 90.2), 90);
    }

    #[test]
    fn test_snap_moves_inward_when_rounding_leaves_range() {
        let range = GramRange::new(12, 48);
        assert_eq!(range.snap(RoundingRule::Nearest10, 12.0), 20);
        assert_eq!(range.snap(RoundingRule::Nearest10, 48.0), 40);
    }

    #[test]
    fn test_inverted_range_normalized_on_load() {
        let range: GramRange = serde_json::from_str(r#"{"min": 600, "max": 0}"#).unwrap();
        assert_eq!(range, GramRange { min: 500, max: 0 });
        assert!(range.is_ordered());

        let item: PortionableItem = serde_json::from_str(
            r#"{
                "id": "lasagna", "name": "Lasagna", "category": "premade",
                "meal_slot": "dinner",
                "density": {"calories": 160, "protein": 9, "carbs": 15, "fat": 7},
                "constraint": {"mode": "adjustable", "range": {"min": 600, "max": 0}},
                "eaten_factor": 1.0, "current_grams": 600, "counts_toward_totals": true
            }"#,
        )
        .unwrap();
        assert_eq!(item.interval(), (500, 500));
    }

    #[test]
    fn test_snap_on_inverted_literal_range() {
        let inverted = GramRange { min: 600, max: 0 };
        assert!(!inverted.is_ordered());
        assert_eq!(inverted.snap(RoundingRule::Nearest10, 250.0), 500);
        assert_eq!(inverted.snap(RoundingRule::Nearest1, 900.0), 500);
    }

    #[test]
    fn test_seasoning_category_forced_to_derived() {
        let item = PortionableItem::adjustable(
            "salt",
            "Salt",
            Category::Seasoning,
            MealSlot::Dinner,
            Macros::default(),
            GramRange::new(0, 300),
        );
        assert!(item.is_seasoning());
        assert_eq!(item.editable_mode(), EditableMode::Locked);
        assert_eq!(item.interval(), (0, SEASONING_CAP_GRAMS));
        assert!(item.adjustable_range().is_none());
        assert!(!item.counts_toward_totals);
        assert!(item.counts(true));
        assert!(!item.counts(false));
    }

    #[test]
    fn test_contribution_applies_eaten_factor() {
        let item = chicken().with_eaten_factor(0.5);
        let c = item.contribution(200);
        assert!((c.calories - 165.0).abs() < 1e-9);
        assert!((c.protein - 31.0).abs() < 1e-9);
    }

    #[test]
    fn test_editable_modes() {
        assert_eq!(chicken().editable_mode(), EditableMode::Bounded);
        assert_eq!(
            chicken().with_mode(AdjustMode::Free).editable_mode(),
            EditableMode::Free
        );
        let locked = PortionableItem::locked(
            "broccoli",
            "Broccoli",
            Category::Vegetable,
            MealSlot::Dinner,
            Macros::new(34.0, 2.8, 7.0, 0.4),
            200,
        );
        assert_eq!(locked.editable_mode(), EditableMode::Locked);
        assert_eq!(locked.interval(), (200, 200));
    }
}
