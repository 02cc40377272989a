use std::collections::BTreeMap;

use crate::models::{MealSlot, PortionableItem};
use crate::planner::constants::MEAL_MIN_CALORIES;

/// A non-snack meal whose calories fell below the floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MealFloorViolation {
    pub slot: MealSlot,
    pub calories: f64,
}

/// Calories per slot, for slots holding at least one counting item with
/// nonzero grams.
pub fn meal_calories(
    items: &[PortionableItem],
    grams: &[u32],
    seasonings_count_macros: bool,
) -> BTreeMap<MealSlot, f64> {
    let mut meals = BTreeMap::new();
    for (item, &g) in items.iter().zip(grams) {
        if g == 0 || !item.counts(seasonings_count_macros) {
            continue;
        }
        *meals.entry(item.meal_slot).or_insert(0.0) += item.contribution(g).calories;
    }
    meals
}

/// Slots other than snack with food but fewer than the minimum calories.
pub fn check_meal_floor(
    items: &[PortionableItem],
    grams: &[u32],
    seasonings_count_macros: bool,
) -> Vec<MealFloorViolation> {
    meal_calories(items, grams, seasonings_count_macros)
        .into_iter()
        .filter(|(slot, calories)| *slot != MealSlot::Snack && *calories < MEAL_MIN_CALORIES)
        .map(|(slot, calories)| MealFloorViolation { slot, calories })
        .collect()
}
