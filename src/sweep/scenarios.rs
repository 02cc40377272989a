use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Category, GramRange, MacroTarget, Macros, MealSlot, PortionableItem};

/// A food the generator can draw from.
#[derive(Debug, Clone, Copy)]
pub struct CatalogFood {
    pub name: &'static str,
    pub category: Category,
    /// Nutrients per 100 g.
    pub density: Macros,
    pub min_grams: u32,
    pub max_grams: u32,
}

const fn food(
    name: &'static str,
    category: Category,
    density: Macros,
    min_grams: u32,
    max_grams: u32,
) -> CatalogFood {
    CatalogFood {
        name,
        category,
        density,
        min_grams,
        max_grams,
    }
}

/// Common foods with realistic per-100g values and serving ranges.
pub const CATALOG: [CatalogFood; 18] = [
    food("Chicken breast", Category::Protein, Macros::new(165.0, 31.0, 0.0, 3.6), 100, 300),
    food("Salmon", Category::Protein, Macros::new(208.0, 20.0, 0.0, 13.0), 80, 250),
    food("Eggs", Category::Protein, Macros::new(155.0, 13.0, 1.1, 11.0), 100, 200),
    food("Firm tofu", Category::Protein, Macros::new(144.0, 17.0, 3.0, 9.0), 100, 300),
    food("Lean beef", Category::Protein, Macros::new(250.0, 26.0, 0.0, 15.0), 80, 250),
    food("Rice", Category::Carb, Macros::new(130.0, 2.7, 28.0, 0.3), 80, 300),
    food("Pasta", Category::Carb, Macros::new(158.0, 5.8, 31.0, 0.9), 80, 300),
    food("Oats", Category::Carb, Macros::new(389.0, 16.9, 66.3, 6.9), 30, 120),
    food("Potato", Category::Carb, Macros::new(77.0, 2.0, 17.0, 0.1), 100, 400),
    food("Bread", Category::Carb, Macros::new(265.0, 9.0, 49.0, 3.2), 30, 150),
    food("Broccoli", Category::Vegetable, Macros::new(34.0, 2.8, 7.0, 0.4), 50, 300),
    food("Spinach", Category::Vegetable, Macros::new(23.0, 2.9, 3.6, 0.4), 30, 200),
    food("Carrot", Category::Vegetable, Macros::new(41.0, 0.9, 10.0, 0.2), 50, 250),
    food("Olive oil", Category::Fat, Macros::new(884.0, 0.0, 0.0, 100.0), 5, 30),
    food("Almonds", Category::Fat, Macros::new(579.0, 21.0, 22.0, 50.0), 10, 60),
    food("Greek yogurt", Category::Dairy, Macros::new(59.0, 10.0, 3.6, 0.4), 100, 300),
    food("Cheddar", Category::Dairy, Macros::new(403.0, 25.0, 1.3, 33.0), 20, 80),
    food("Banana", Category::Fruit, Macros::new(89.0, 1.1, 23.0, 0.3), 80, 200),
];

/// Shape of generated scenarios.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Items beyond the guaranteed protein.
    pub min_extra_items: usize,
    pub max_extra_items: usize,
    /// Chance each extra item is locked at its planted grams.
    pub lock_probability: f64,
    pub step_grams: u32,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            min_extra_items: 1,
            max_extra_items: 4,
            lock_probability: 0.2,
            step_grams: 5,
        }
    }
}

/// A feasible problem: the target is the totals of a planted allocation.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub index: usize,
    pub items: Vec<PortionableItem>,
    pub target: MacroTarget,
    /// The allocation the target was built from.
    pub planted: Vec<u32>,
}

impl Scenario {
    pub fn locked_count(&self) -> usize {
        self.items.iter().filter(|i| !i.is_adjustable()).count()
    }
}

fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Generate one scenario. Every scenario has at least one adjustable protein
/// item, so the single lunch meal always clears the meal floor.
pub fn generate_scenario(rng: &mut impl Rng, index: usize, config: &ScenarioConfig) -> Scenario {
    let proteins: Vec<usize> = CATALOG
        .iter()
        .enumerate()
        .filter(|(_, f)| f.category == Category::Protein)
        .map(|(i, _)| i)
        .collect();
    let first = proteins[rng.gen_range(0..proteins.len())];

    let mut others: Vec<usize> = (0..CATALOG.len()).filter(|&i| i != first).collect();
    others.shuffle(rng);
    let max_extra = config.max_extra_items.max(config.min_extra_items);
    let extra = rng.gen_range(config.min_extra_items..=max_extra);

    let mut items = Vec::with_capacity(extra + 1);
    let mut planted = Vec::with_capacity(extra + 1);
    let mut target = Macros::default();

    for (n, i) in std::iter::once(first)
        .chain(others.into_iter().take(extra))
        .enumerate()
    {
        let food = &CATALOG[i];
        let id = format!("{}-{}", slug(food.name), n);
        let grams = rng.gen_range(food.min_grams..=food.max_grams);
        let locked = n > 0 && rng.gen_bool(config.lock_probability.clamp(0.0, 1.0));

        let item = if locked {
            PortionableItem::locked(
                &id,
                food.name,
                food.category,
                MealSlot::Lunch,
                food.density,
                grams,
            )
        } else {
            PortionableItem::adjustable(
                &id,
                food.name,
                food.category,
                MealSlot::Lunch,
                food.density,
                GramRange::new(food.min_grams, food.max_grams),
            )
            .with_step(config.step_grams)
        };

        target.add_scaled(&item.per_gram(), grams as f64);
        items.push(item);
        planted.push(grams);
    }

    Scenario {
        index,
        items,
        target: target.rounded(),
        planted,
    }
}

/// Generate `count` scenarios from one seeded generator.
pub fn generate_scenarios(
    rng: &mut impl Rng,
    count: usize,
    config: &ScenarioConfig,
) -> Vec<Scenario> {
    (0..count)
        .map(|index| generate_scenario(rng, index, config))
        .collect()
}
