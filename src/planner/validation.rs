use crate::models::{Blocker, BlockerKind, Macro, PortionableItem};
use crate::planner::constants::{
    MAX_CALORIES_PER_100G, MAX_MACRO_SUM_PER_100G, MAX_NUTRIENT_PER_100G,
};

/// Physically impossible nutrition on a single item.
pub fn nutrition_violations(item: &PortionableItem) -> Vec<Blocker> {
    let mut blockers = Vec::new();
    let d = &item.density;

    for m in Macro::ALL {
        let value = d.get(m);
        let limit = match m {
            Macro::Calories => MAX_CALORIES_PER_100G,
            _ => MAX_NUTRIENT_PER_100G,
        };
        if !value.is_finite() || !(0.0..=limit).contains(&value) {
            blockers.push(Blocker::new(
                &item.name,
                BlockerKind::InvalidNutrition,
                value,
                format!(
                    "{} has {} {}{} per 100g, allowed 0-{}",
                    item.name,
                    value,
                    m.unit(),
                    if m == Macro::Calories {
                        String::new()
                    } else {
                        format!(" {}", m)
                    },
                    limit
                ),
            ));
        }
    }

    let macro_sum = d.protein + d.carbs + d.fat;
    if macro_sum > MAX_MACRO_SUM_PER_100G {
        blockers.push(Blocker::new(
            &item.name,
            BlockerKind::InvalidNutrition,
            macro_sum,
            format!(
                "{} has {:.1}g protein+carbs+fat per 100g, more than {}g",
                item.name, macro_sum, MAX_MACRO_SUM_PER_100G
            ),
        ));
    }

    if !(item.eaten_factor > 0.0 && item.eaten_factor <= 1.0) {
        blockers.push(Blocker::new(
            &item.name,
            BlockerKind::InvalidNutrition,
            item.eaten_factor,
            format!(
                "{} has eaten factor {}, must be in (0, 1]",
                item.name, item.eaten_factor
            ),
        ));
    }

    blockers
}

/// An adjustable range whose minimum lies above its ceiling.
pub fn range_violation(item: &PortionableItem) -> Option<Blocker> {
    let range = item.adjustable_range()?;
    if range.is_ordered() {
        return None;
    }
    Some(Blocker::new(
        &item.name,
        BlockerKind::InvalidRange,
        range.min as f64,
        format!(
            "{} has minimum {}g above its maximum {}g",
            item.name,
            range.min,
            range.ceiling()
        ),
    ))
}

/// Validate every item before any optimization is attempted.
pub fn validate_items(items: &[PortionableItem]) -> Vec<Blocker> {
    items
        .iter()
        .flat_map(|item| nutrition_violations(item).into_iter().chain(range_violation(item)))
        .collect()
}
