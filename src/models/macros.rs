use serde::{Deserialize, Serialize};

use crate::planner::constants::SCORE_WEIGHTS;

/// One of the four tracked quantities: energy plus the three macronutrients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Macro {
    Calories,
    Protein,
    Carbs,
    Fat,
}

impl Macro {
    pub const ALL: [Macro; 4] = [Macro::Calories, Macro::Protein, Macro::Carbs, Macro::Fat];

    /// The three gram-based macronutrients, in classification order.
    pub const NUTRIENTS: [Macro; 3] = [Macro::Protein, Macro::Carbs, Macro::Fat];

    pub fn as_str(self) -> &'static str {
        match self {
            Macro::Calories => "calories",
            Macro::Protein => "protein",
            Macro::Carbs => "carbs",
            Macro::Fat => "fat",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Macro::Calories => "kcal",
            _ => "g",
        }
    }
}

impl std::fmt::Display for Macro {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calories plus protein/carbs/fat grams.
///
/// The same shape serves as a per-100g nutrient density, a daily target,
/// achieved totals and a target delta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Daily macro target. Every field is non-negative.
pub type MacroTarget = Macros;

impl Macros {
    pub const fn new(calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fat,
        }
    }

    #[inline]
    pub fn get(&self, m: Macro) -> f64 {
        match m {
            Macro::Calories => self.calories,
            Macro::Protein => self.protein,
            Macro::Carbs => self.carbs,
            Macro::Fat => self.fat,
        }
    }

    #[inline]
    pub fn get_mut(&mut self, m: Macro) -> &mut f64 {
        match m {
            Macro::Calories => &mut self.calories,
            Macro::Protein => &mut self.protein,
            Macro::Carbs => &mut self.carbs,
            Macro::Fat => &mut self.fat,
        }
    }

    /// Multiply every field by `factor`.
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein: self.protein * factor,
            carbs: self.carbs * factor,
            fat: self.fat * factor,
        }
    }

    /// Add `other * factor` into self.
    #[inline]
    pub fn add_scaled(&mut self, other: &Macros, factor: f64) {
        self.calories += other.calories * factor;
        self.protein += other.protein * factor;
        self.carbs += other.carbs * factor;
        self.fat += other.fat * factor;
    }

    /// Field-wise `self - other`.
    pub fn minus(&self, other: &Macros) -> Self {
        Self {
            calories: self.calories - other.calories,
            protein: self.protein - other.protein,
            carbs: self.carbs - other.carbs,
            fat: self.fat - other.fat,
        }
    }

    /// Reporting precision: whole kcal, tenth of a gram.
    pub fn rounded(&self) -> Self {
        Self {
            calories: self.calories.round(),
            protein: round_tenth(self.protein),
            carbs: round_tenth(self.carbs),
            fat: round_tenth(self.fat),
        }
    }

    /// Weighted L1 magnitude, using the score weights.
    pub fn weighted_magnitude(&self) -> f64 {
        Macro::ALL
            .iter()
            .map(|&m| SCORE_WEIGHTS.get(m) * self.get(m).abs())
            .sum()
    }

    /// Energy implied by the macronutrients (4/4/9 kcal per gram).
    pub fn atwater_calories(&self) -> f64 {
        self.protein * 4.0 + self.carbs * 4.0 + self.fat * 9.0
    }

    pub fn is_finite(&self) -> bool {
        Macro::ALL.iter().all(|&m| self.get(m).is_finite())
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Allowed deviation below (`min`) and above (`max`) a target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ToleranceRepr")]
pub struct Tolerance {
    pub min: f64,
    pub max: f64,
}

/// Accepts either a bare number (symmetric) or an explicit `{min, max}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ToleranceRepr {
    Symmetric(f64),
    Window { min: f64, max: f64 },
}

impl From<ToleranceRepr> for Tolerance {
    fn from(repr: ToleranceRepr) -> Self {
        match repr {
            ToleranceRepr::Symmetric(v) => Tolerance::symmetric(v),
            ToleranceRepr::Window { min, max } => Tolerance { min, max },
        }
    }
}

const BOUNDARY_EPSILON: f64 = 1e-9;

impl Tolerance {
    pub const fn symmetric(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn contains(&self, target: f64, achieved: f64) -> bool {
        achieved >= target - self.min - BOUNDARY_EPSILON
            && achieved <= target + self.max + BOUNDARY_EPSILON
    }

    /// True when even `max_total` falls short of the window around `target`.
    pub fn out_of_reach(&self, target: f64, max_total: f64) -> bool {
        max_total < target - self.min - BOUNDARY_EPSILON
    }

    /// True when `min_total` already overshoots the window around `target`.
    pub fn overshot(&self, target: f64, min_total: f64) -> bool {
        min_total > target + self.max + BOUNDARY_EPSILON
    }

    /// Distance outside the window; zero when inside.
    pub fn excess(&self, target: f64, achieved: f64) -> f64 {
        let low = target - self.min;
        let high = target + self.max;
        if achieved < low {
            low - achieved
        } else if achieved > high {
            achieved - high
        } else {
            0.0
        }
    }
}

/// Per-macro tolerance. Defaults: calories ±50, protein/carbs/fat ±1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceWindow {
    pub calories: Tolerance,
    pub protein: Tolerance,
    pub carbs: Tolerance,
    pub fat: Tolerance,
}

impl Default for ToleranceWindow {
    fn default() -> Self {
        use crate::planner::constants::{DEFAULT_CALORIE_TOLERANCE, DEFAULT_MACRO_TOLERANCE};
        Self {
            calories: Tolerance::symmetric(DEFAULT_CALORIE_TOLERANCE),
            protein: Tolerance::symmetric(DEFAULT_MACRO_TOLERANCE),
            carbs: Tolerance::symmetric(DEFAULT_MACRO_TOLERANCE),
            fat: Tolerance::symmetric(DEFAULT_MACRO_TOLERANCE),
        }
    }
}

impl ToleranceWindow {
    pub fn get(&self, m: Macro) -> Tolerance {
        match m {
            Macro::Calories => self.calories,
            Macro::Protein => self.protein,
            Macro::Carbs => self.carbs,
            Macro::Fat => self.fat,
        }
    }

    /// True when every macro of `achieved` sits inside its window around `target`.
    pub fn accepts(&self, target: &Macros, achieved: &Macros) -> bool {
        Macro::ALL
            .iter()
            .all(|&m| self.get(m).contains(target.get(m), achieved.get(m)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounded_precision() {
        let m = Macros::new(429.6, 50.54, 38.649, 5.85);
        let r = m.rounded();
        assert_eq!(r.calories, 430.0);
        assert!((r.protein - 50.5).abs() < 1e-9);
        assert!((r.carbs - 38.6).abs() < 1e-9);
        assert!((r.fat - 5.9).abs() < 1e-9);
    }

    #[test]
    fn test_tolerance_boundaries_inclusive() {
        let tol = Tolerance::symmetric(1.0);
        assert!(tol.contains(50.0, 51.0));
        assert!(tol.contains(50.0, 49.0));
        assert!(!tol.contains(50.0, 51.1));
        assert_eq!(tol.excess(50.0, 52.5), 1.5);
        assert_eq!(tol.excess(50.0, 50.3), 0.0);
        assert!(!tol.out_of_reach(50.0, 49.0));
        assert!(tol.out_of_reach(50.0, 48.9));
        assert!(!tol.overshot(50.0, 51.0));
        assert!(tol.overshot(50.0, 51.1));
    }

    #[test]
    fn test_tolerance_deserializes_scalar_and_window() {
        let window: ToleranceWindow =
            serde_json::from_str(r#"{"calories": 40, "protein": {"min": 2, "max": 0.5}}"#)
                .unwrap();
        assert_eq!(window.calories, Tolerance::symmetric(40.0));
        assert_eq!(window.protein.min, 2.0);
        assert_eq!(window.protein.max, 0.5);
        // Missing fields keep the defaults.
        assert_eq!(window.fat, Tolerance::symmetric(1.0));
    }

    #[test]
    fn test_weighted_magnitude() {
        let delta = Macros::new(-20.0, 1.0, -2.0, 0.5);
        assert!((delta.weighted_magnitude() - (20.0 + 10.0 + 20.0 + 5.0)).abs() < 1e-9);
    }
}
