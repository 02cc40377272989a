//! Daily macro targets from global settings and weekly overrides.
//!
//! Fat is never stored: it is derived from calories, protein and carbs so
//! that every resolved target is internally consistent.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::MacroTarget;
use crate::planner::constants::*;

/// Calorie/protein/carb settings for one kind of day. Unset fields fall
/// through to the next source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayTargets {
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionSettings {
    pub weekday: DayTargets,
    /// Saturday and Sunday.
    pub weekend: DayTargets,
}

/// Targets for one week, keyed by the Monday the week starts on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyOverride {
    pub week_start: NaiveDate,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub carbs: Option<f64>,
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Fat grams implied by the energy left after protein and carbs.
///
/// `max(0, round((calories - 4p - 4c) / 9))`, floored at 30 g.
pub fn derive_fat(calories: f64, protein: f64, carbs: f64) -> f64 {
    let remaining = calories - protein * KCAL_PER_GRAM_PROTEIN - carbs * KCAL_PER_GRAM_CARBS;
    let fat = (remaining / KCAL_PER_GRAM_FAT).round().max(0.0);
    fat.max(FAT_FLOOR_GRAMS)
}

/// `|4p + 4c + 9f - calories|` for a target.
pub fn energy_gap(target: &MacroTarget) -> f64 {
    (target.atwater_calories() - target.calories).abs()
}

/// Resolve the target for `date`.
///
/// Calories, protein and carbs come from the override (only when it is keyed
/// by this date's Monday), then the weekday/weekend setting, then the hard
/// default. When the fat floor binds, calories are raised to match the
/// macros.
pub fn resolve_target(
    date: NaiveDate,
    settings: &NutritionSettings,
    weekly: Option<&WeeklyOverride>,
) -> MacroTarget {
    let weekly = weekly.filter(|o| o.week_start == week_start(date));
    let day = if is_weekend(date) {
        &settings.weekend
    } else {
        &settings.weekday
    };

    let pick = |from_override: Option<f64>, from_day: Option<f64>, default: f64| {
        from_override.or(from_day).unwrap_or(default).max(0.0)
    };

    let mut calories = pick(
        weekly.and_then(|o| o.calories),
        day.calories,
        DEFAULT_DAILY_CALORIES,
    );
    let protein = pick(
        weekly.and_then(|o| o.protein),
        day.protein,
        DEFAULT_DAILY_PROTEIN,
    );
    let carbs = pick(weekly.and_then(|o| o.carbs), day.carbs, DEFAULT_DAILY_CARBS);
    let fat = derive_fat(calories, protein, carbs);

    let target = MacroTarget::new(calories, protein, carbs, fat);
    if energy_gap(&target) > MAX_ENERGY_GAP_KCAL {
        calories = target.atwater_calories();
        debug!(
            %date,
            calories, "fat floor binds; calories reconciled to the macro energy"
        );
    }

    MacroTarget::new(calories, protein, carbs, fat)
}

/// Resolve using whichever override (if any) belongs to `date`'s week.
pub fn resolve_target_from(
    date: NaiveDate,
    settings: &NutritionSettings,
    overrides: &[WeeklyOverride],
) -> MacroTarget {
    let monday = week_start(date);
    let weekly = overrides.iter().find(|o| o.week_start == monday);
    resolve_target(date, settings, weekly)
}
