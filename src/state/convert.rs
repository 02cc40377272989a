//! Stored meal records to solver items.

use tracing::debug;

use crate::models::{
    AdjustMode, Category, GramRange, ItemRecord, MealSlot, PortionableItem, SeasoningRule,
};
use crate::planner::constants::{DEFAULT_STEP_GRAMS, SEASONING_NAME_PATTERNS};

/// Map a free-form food type label to a category. Unknown labels map to `Other`.
pub fn map_food_type(label: &str) -> Category {
    match label.trim().to_lowercase().as_str() {
        "protein" | "meat" | "fish" | "poultry" | "seafood" | "egg" | "eggs" | "tofu"
        | "legume" | "legumes" => Category::Protein,
        "carb" | "carbs" | "grain" | "grains" | "bread" | "pasta" | "rice" | "cereal"
        | "starch" => Category::Carb,
        "vegetable" | "vegetables" | "veg" | "veggie" | "greens" | "salad" => {
            Category::Vegetable
        }
        "dairy" | "milk" | "cheese" | "yogurt" => Category::Dairy,
        "fruit" | "fruits" | "berry" | "berries" => Category::Fruit,
        "snack" | "snacks" | "sweet" | "sweets" | "dessert" => Category::Snack,
        "seasoning" | "sauce" | "spice" | "spices" | "condiment" | "condiments" | "herb"
        | "herbs" | "dressing" => Category::Seasoning,
        "premade" | "ready meal" | "ready_meal" | "prepared" | "meal" => Category::Premade,
        "fat" | "fats" | "oil" | "oils" | "nut" | "nuts" | "butter" => Category::Fat,
        _ => Category::Other,
    }
}

/// Whether a product name reads like a seasoning ("Soy sauce", "Sea salt").
pub fn looks_like_seasoning(name: &str) -> bool {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .any(|token| {
            let singular = token.strip_suffix('s').unwrap_or(token);
            SEASONING_NAME_PATTERNS
                .iter()
                .any(|&p| token == p || singular == p)
        })
}

/// Category from the food type label, falling back to the product name.
pub fn classify(record: &ItemRecord) -> Category {
    match map_food_type(&record.product.food_type) {
        Category::Other if looks_like_seasoning(&record.product.name) => Category::Seasoning,
        category => category,
    }
}

/// Default search range per category.
pub fn default_range(category: Category) -> GramRange {
    match category {
        Category::Protein => GramRange::new(50, 300),
        Category::Carb => GramRange::new(40, 300),
        Category::Vegetable => GramRange::new(30, 400),
        Category::Dairy => GramRange::new(20, 300),
        Category::Fruit => GramRange::new(50, 300),
        Category::Snack => GramRange::new(10, 150),
        Category::Premade => GramRange::new(100, 500),
        Category::Fat => GramRange::new(5, 50),
        Category::Seasoning => GramRange::new(0, 15),
        Category::Other => GramRange::new(10, 300),
    }
}

/// Grams for a locked item: the stored quantity, else the product's fixed
/// portion, else zero.
pub fn locked_quantity(record: &ItemRecord) -> u32 {
    if record.quantity_grams > 0 {
        record.quantity_grams
    } else {
        record.product.fixed_portion_grams.unwrap_or(0)
    }
}

/// Convert one record into a solver item.
pub fn to_item(record: &ItemRecord) -> PortionableItem {
    let category = classify(record);
    let product = &record.product;
    let meal = &record.meal;
    let slot = meal.slot.unwrap_or(MealSlot::Lunch);

    let item = if category == Category::Seasoning {
        PortionableItem::seasoning(
            &record.id,
            &product.name,
            slot,
            product.per100,
            SeasoningRule {
                rate: product.seasoning_rate,
                paired_item_id: meal.paired_item_id.clone(),
            },
        )
    } else if meal.locked {
        PortionableItem::locked(
            &record.id,
            &product.name,
            category,
            slot,
            product.per100,
            locked_quantity(record),
        )
    } else {
        let defaults = default_range(category);
        let range = GramRange::new(
            meal.min_grams.unwrap_or(defaults.min),
            meal.max_grams.unwrap_or(defaults.max),
        );
        let mode = if meal.free {
            AdjustMode::Free
        } else {
            AdjustMode::Bounded
        };
        PortionableItem::adjustable(&record.id, &product.name, category, slot, product.per100, range)
            .with_mode(mode)
            .with_step(meal.step_grams.unwrap_or(DEFAULT_STEP_GRAMS))
            .with_rounding(meal.rounding.unwrap_or_default())
            .with_current_grams(record.quantity_grams)
    };

    let item = item.with_eaten_factor(product.eaten_factor);
    debug!(item = %item.debug_string(), "converted record");
    item
}

/// Convert every record, in order.
pub fn to_items(records: &[ItemRecord]) -> Vec<PortionableItem> {
    records.iter().map(to_item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EditableMode, Macros, MealContext, ProductRecord, RoundingRule};

    fn record(name: &str, food_type: &str) -> ItemRecord {
        ItemRecord {
            id: name.to_lowercase(),
            product: ProductRecord {
                name: name.to_string(),
                food_type: food_type.to_string(),
                per100: Macros::new(100.0, 5.0, 10.0, 2.0),
                fixed_portion_grams: None,
                seasoning_rate: None,
                eaten_factor: 1.0,
            },
            meal: MealContext::default(),
            quantity_grams: 0,
        }
    }

    #[test]
    fn test_food_type_aliases() {
        assert_eq!(map_food_type("Meat"), Category::Protein);
        assert_eq!(map_food_type(" grain "), Category::Carb);
        assert_eq!(map_food_type("condiment"), Category::Seasoning);
        assert_eq!(map_food_type("Nuts"), Category::Fat);
        assert_eq!(map_food_type("mystery"), Category::Other);
    }

    #[test]
    fn test_name_pattern_fallback() {
        assert!(looks_like_seasoning("Soy Sauce"));
        assert!(looks_like_seasoning("sea-salt"));
        assert!(looks_like_seasoning("Spices"));
        assert!(!looks_like_seasoning("Saltine crackers"));
        assert_eq!(classify(&record("Dijon mustard", "")), Category::Seasoning);
        // A known food type wins over the name.
        assert_eq!(classify(&record("Pepper steak", "meat")), Category::Protein);
    }

    #[test]
    fn test_locked_quantity_fallbacks() {
        let mut r = record("Bread", "bread");
        assert_eq!(locked_quantity(&r), 0);
        r.product.fixed_portion_grams = Some(40);
        assert_eq!(locked_quantity(&r), 40);
        r.quantity_grams = 60;
        assert_eq!(locked_quantity(&r), 60);
    }

    #[test]
    fn test_adjustable_record_uses_overrides() {
        let mut r = record("Rice", "grain");
        r.meal.slot = Some(MealSlot::Dinner);
        r.meal.min_grams = Some(80);
        r.meal.free = true;
        r.meal.rounding = Some(RoundingRule::Nearest10);
        r.quantity_grams = 150;

        let item = to_item(&r);
        assert_eq!(item.editable_mode(), EditableMode::Free);
        assert_eq!(item.interval(), (80, 300));
        assert_eq!(item.step_grams(), DEFAULT_STEP_GRAMS);
        assert_eq!(item.rounding(), RoundingRule::Nearest10);
        assert_eq!(item.current_grams, 150);
        assert_eq!(item.meal_slot, MealSlot::Dinner);
    }

    #[test]
    fn test_locked_record() {
        let mut r = record("Broccoli", "vegetable");
        r.meal.locked = true;
        r.product.fixed_portion_grams = Some(200);
        let item = to_item(&r);
        assert_eq!(item.editable_mode(), EditableMode::Locked);
        assert_eq!(item.current_grams, 200);
    }

    #[test]
    fn test_seasoning_record_ignores_range_overrides() {
        let mut r = record("Teriyaki sauce", "");
        r.meal.max_grams = Some(300);
        r.meal.paired_item_id = Some("chicken".to_string());
        r.product.seasoning_rate = Some(5.0);
        let item = to_item(&r);
        assert!(item.is_seasoning());
        assert_eq!(item.interval(), (0, 15));
        let rule = item.seasoning_rule().unwrap();
        assert_eq!(rule.paired_item_id.as_deref(), Some("chicken"));
    }
}
