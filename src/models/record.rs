use serde::{Deserialize, Serialize};

use crate::models::item::{MealSlot, RoundingRule};
use crate::models::macros::Macros;

/// Product data as stored alongside a planned meal item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub name: String,
    /// Free-form food type label, e.g. "meat" or "Grain".
    #[serde(default)]
    pub food_type: String,
    /// Nutrients per 100 g.
    pub per100: Macros,
    /// Typical serving, used when a locked item has no stored quantity.
    #[serde(default)]
    pub fixed_portion_grams: Option<u32>,
    /// Grams of seasoning per 100 g of its basis.
    #[serde(default)]
    pub seasoning_rate: Option<f64>,
    #[serde(default = "default_eaten_factor")]
    pub eaten_factor: f64,
}

fn default_eaten_factor() -> f64 {
    1.0
}

/// Where and how the item appears in the day's plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MealContext {
    pub slot: Option<MealSlot>,
    pub locked: bool,
    /// Unconstrained by the naturalness of round numbers.
    pub free: bool,
    pub paired_item_id: Option<String>,
    pub min_grams: Option<u32>,
    pub max_grams: Option<u32>,
    pub step_grams: Option<u32>,
    pub rounding: Option<RoundingRule>,
}

/// One planned meal item as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub id: String,
    pub product: ProductRecord,
    #[serde(default)]
    pub meal: MealContext,
    #[serde(default)]
    pub quantity_grams: u32,
}

impl ItemRecord {
    /// Debug string for logging.
    pub fn debug_string(&self) -> String {
        format!(
            "{} ({}) {}g{}",
            self.product.name,
            self.id,
            self.quantity_grams,
            if self.meal.locked { " locked" } else { "" }
        )
    }
}
