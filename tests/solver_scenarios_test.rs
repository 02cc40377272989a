use assert_float_eq::assert_float_absolute_eq;

use portion_optimizer_rs::models::{
    BlockerKind, Category, FailureReason, GramRange, Macro, MacroTarget, Macros, MealSlot,
    PortionConstraint, PortionableItem, RoundingRule, SeasoningRule,
};
use portion_optimizer_rs::{solve, SolveOptions};

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

fn rice() -> PortionableItem {
    PortionableItem::adjustable(
        "rice",
        "Rice",
        Category::Carb,
        MealSlot::Lunch,
        Macros::new(130.0, 2.7, 28.0, 0.3),
        GramRange::new(80, 250),
    )
    .with_step(10)
}

fn broccoli_locked() -> PortionableItem {
    PortionableItem::locked(
        "broccoli",
        "Broccoli",
        Category::Vegetable,
        MealSlot::Lunch,
        Macros::new(34.0, 2.8, 7.0, 0.4),
        200,
    )
}

fn lunch_target() -> MacroTarget {
    MacroTarget::new(430.0, 50.0, 38.0, 5.0)
}

#[test]
fn test_chicken_and_rice_meets_target() {
    let items = vec![chicken(), rice()];
    let target = lunch_target();
    let options = SolveOptions::default();

    let result = solve(&items, &target, &options);
    assert!(result.is_success(), "{:?}", result);

    let portions = result.portions();
    assert!((140..=160).contains(&portions["chicken"]), "{:?}", portions);
    assert!((125..=145).contains(&portions["rice"]), "{:?}", portions);

    let totals = result.totals();
    assert!(options.tolerances.accepts(&target, totals), "{:?}", totals);
    assert_float_absolute_eq!(totals.protein, 50.0, 1.0);
    assert_float_absolute_eq!(totals.carbs, 38.0, 1.0);
}

#[test]
fn test_carb_only_item_cannot_reach_protein() {
    let items = vec![rice()];
    let target = MacroTarget::new(2000.0, 150.0, 200.0, 67.0);

    let result = solve(&items, &target, &SolveOptions::default());
    assert_eq!(result.reason(), Some(FailureReason::ImpossibleTargets));

    let protein = result
        .blockers()
        .iter()
        .find(|b| b.constraint == BlockerKind::MaxAchievable(Macro::Protein))
        .expect("protein blocker");
    assert_eq!(protein.item_name, "total");
    assert_float_absolute_eq!(protein.value, 6.75, 1e-9);
    assert!(result
        .blockers()
        .iter()
        .any(|b| b.constraint == BlockerKind::AtMaximum && b.item_name == "Rice"));

    // Best effort is still a real allocation.
    let grams = result.portions()["rice"];
    assert!((80..=250).contains(&grams));
}

#[test]
fn test_locked_vegetable_dominates_low_target() {
    let items = vec![broccoli_locked(), chicken()];
    let target = MacroTarget::new(300.0, 2.0, 5.0, 10.0);

    let result = solve(&items, &target, &SolveOptions::default());
    assert_eq!(result.reason(), Some(FailureReason::ImpossibleTargets));

    let locked = result
        .blockers()
        .iter()
        .find(|b| b.constraint == BlockerKind::LockedContribution)
        .expect("locked blocker");
    assert_eq!(locked.item_name, "Broccoli");
    assert!(result
        .blockers()
        .iter()
        .any(|b| b.detail == "Broccoli locked at 200g, contributes 14.0g carbs"));
    assert_eq!(result.portions()["broccoli"], 200);
}

#[test]
fn test_identical_inputs_identical_results() {
    let items = vec![chicken(), rice(), broccoli_locked()];
    let target = MacroTarget::new(500.0, 56.0, 52.0, 6.0);
    let options = SolveOptions {
        debug_mode: true,
        ..Default::default()
    };

    let first = serde_json::to_string(&solve(&items, &target, &options)).unwrap();
    let second = serde_json::to_string(&solve(&items, &target, &options)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_locked_items_keep_their_grams() {
    let items = vec![chicken(), rice(), broccoli_locked()];
    let target = MacroTarget::new(500.0, 56.0, 52.0, 6.0);

    let result = solve(&items, &target, &SolveOptions::default());
    assert!(result.is_success(), "{:?}", result);
    assert_eq!(result.portions()["broccoli"], 200);
}

#[test]
fn test_seasoning_follows_pairing_and_cap() {
    let sauce = PortionableItem::seasoning(
        "teriyaki",
        "Teriyaki sauce",
        MealSlot::Lunch,
        Macros::new(89.0, 6.0, 16.0, 0.0),
        SeasoningRule {
            rate: Some(20.0),
            paired_item_id: Some("chicken".to_string()),
        },
    );
    let items = vec![chicken(), rice(), sauce];

    let result = solve(&items, &lunch_target(), &SolveOptions::default());
    assert!(result.is_success(), "{:?}", result);
    // 20% of ~150g chicken would be 30g; the cap holds it at 15.
    assert_eq!(result.portions()["teriyaki"], 15);
}

#[test]
fn test_small_breakfast_rejected_by_meal_floor() {
    let apple = PortionableItem::locked(
        "apple",
        "Apple",
        Category::Fruit,
        MealSlot::Breakfast,
        Macros::new(52.0, 0.3, 14.0, 0.2),
        100,
    );
    let items = vec![chicken(), rice(), apple];
    let target = MacroTarget::new(482.0, 50.3, 52.0, 5.2);

    let result = solve(&items, &target, &SolveOptions::default());
    assert_eq!(result.reason(), Some(FailureReason::ImpossibleTargets));
    let floor = &result.blockers()[0];
    assert_eq!(floor.constraint, BlockerKind::MealBelowMinimum);
    assert_eq!(floor.item_name, "breakfast");
    assert_float_absolute_eq!(floor.value, 52.0, 1e-9);
}

#[test]
fn test_small_snack_is_fine() {
    let apple = PortionableItem::locked(
        "apple",
        "Apple",
        Category::Fruit,
        MealSlot::Snack,
        Macros::new(52.0, 0.3, 14.0, 0.2),
        100,
    );
    let items = vec![chicken(), rice(), apple];
    let target = MacroTarget::new(482.0, 50.3, 52.0, 5.2);

    let result = solve(&items, &target, &SolveOptions::default());
    assert!(result.is_success(), "{:?}", result);
}

#[test]
fn test_invalid_nutrition_skips_optimization() {
    let bogus = PortionableItem::adjustable(
        "bogus",
        "Protein powder (typo)",
        Category::Protein,
        MealSlot::Lunch,
        Macros::new(380.0, 800.0, 5.0, 2.0),
        GramRange::new(0, 100),
    )
    .with_current_grams(0);
    let items = vec![bogus];

    let result = solve(&items, &lunch_target(), &SolveOptions::default());
    assert_eq!(result.reason(), Some(FailureReason::InvalidProductNutrition));
    assert_eq!(result.blockers()[0].constraint, BlockerKind::InvalidNutrition);
    assert_eq!(result.blockers()[0].item_name, "Protein powder (typo)");
    // An all-zero best effort falls back to the range midpoint.
    assert_eq!(result.portions()["bogus"], 50);
}

#[test]
fn test_rounding_rule_respected() {
    let items = vec![
        chicken().with_rounding(RoundingRule::Nearest5),
        rice().with_rounding(RoundingRule::Nearest5),
    ];
    let result = solve(&items, &lunch_target(), &SolveOptions::default());
    for (id, grams) in result.portions() {
        assert_eq!(grams % 5, 0, "{} at {}g", id, grams);
    }
}

#[test]
fn test_no_adjustable_items() {
    let items = vec![broccoli_locked()];
    let result = solve(&items, &lunch_target(), &SolveOptions::default());
    assert_eq!(result.reason(), Some(FailureReason::ImpossibleTargets));
    assert_eq!(result.portions()["broccoli"], 200);
}

#[test]
fn test_failure_json_shape() {
    let items = vec![rice()];
    let target = MacroTarget::new(2000.0, 150.0, 200.0, 67.0);
    let result = solve(&items, &target, &SolveOptions::default());

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["status"], "failure");
    assert_eq!(json["reason"], "impossible_targets");
    assert!(json["best_effort_portions"]["rice"].as_u64().unwrap() >= 80);
    assert!(json["closest_totals"]["protein"].as_f64().unwrap() < 7.0);
}

#[test]
fn test_seasoning_cap_holds_on_failure() {
    let sauce = PortionableItem::seasoning(
        "sauce",
        "Teriyaki sauce",
        MealSlot::Lunch,
        Macros::new(89.0, 6.0, 16.0, 0.0),
        SeasoningRule {
            rate: Some(20.0),
            paired_item_id: Some("chicken".to_string()),
        },
    );
    let items = vec![chicken(), rice(), sauce];
    let target = MacroTarget::new(2500.0, 300.0, 200.0, 80.0);

    let result = solve(&items, &target, &SolveOptions::default());
    assert!(result.reason().is_some(), "{:?}", result);
    // Chicken never drops below 100g, so 20% of it is always past the cap.
    assert_eq!(result.portions()["sauce"], 15);
}

#[test]
fn test_inverted_range_is_rejected_not_solved() {
    let mut lasagna = PortionableItem::adjustable(
        "lasagna",
        "Lasagna",
        Category::Premade,
        MealSlot::Dinner,
        Macros::new(160.0, 9.0, 15.0, 7.0),
        GramRange::new(100, 400),
    )
    .with_current_grams(0);
    if let PortionConstraint::Adjustable { range, .. } = &mut lasagna.constraint {
        *range = GramRange { min: 600, max: 0 };
    }
    let items = vec![chicken(), lasagna];

    let result = solve(&items, &lunch_target(), &SolveOptions::default());
    assert_eq!(result.reason(), Some(FailureReason::InvalidProductNutrition));
    let blocker = &result.blockers()[0];
    assert_eq!(blocker.constraint, BlockerKind::InvalidRange);
    assert_eq!(blocker.item_name, "Lasagna");
    assert_eq!(result.portions()["lasagna"], 0);
}
