use chrono::NaiveDate;

use crate::models::{Macro, MacroTarget, Macros, PortionableItem, SolveResult};

/// Signed value with its unit, e.g. "+12 kcal" or "-0.4g".
pub fn format_delta(m: Macro, value: f64) -> String {
    let sign = if value >= 0.0 { "+" } else { "" };
    match m {
        Macro::Calories => format!("{}{:.0} kcal", sign, value),
        _ => format!("{}{:.1}g", sign, value),
    }
}

fn display_totals_line(label: &str, totals: &Macros) {
    println!(
        "{:<10} {:>6.0} kcal | P {:>6.1}g | C {:>6.1}g | F {:>6.1}g",
        label, totals.calories, totals.protein, totals.carbs, totals.fat
    );
}

/// Display the resolved target for a date.
pub fn display_target(date: NaiveDate, target: &MacroTarget) {
    println!();
    println!("=== Target for {} ===", date.format("%A %Y-%m-%d"));
    display_totals_line("Target", target);
    println!();
}

/// Display a solve result as a portion table with totals.
pub fn display_result(result: &SolveResult, items: &[PortionableItem], target: &MacroTarget) {
    println!();
    match result {
        SolveResult::Success {
            score, iterations, ..
        } => {
            println!("=== Portions (score {:.2}, {} iterations) ===", score, iterations);
        }
        SolveResult::Failure { reason, .. } => {
            println!("=== No plan within tolerance: {} ===", reason);
            println!("Best effort portions:");
        }
    }
    println!();

    let portions = result.portions();
    let max_name_len = items.iter().map(|i| i.name.len()).max().unwrap_or(10);

    let mut rows: Vec<&PortionableItem> = items.iter().collect();
    rows.sort_by_key(|i| i.meal_slot);

    for item in rows {
        let grams = portions.get(&item.id).copied().unwrap_or(item.current_grams);
        let c = item.contribution(grams);
        let tag = if item.is_seasoning() {
            "  [seasoning]"
        } else if !item.is_adjustable() {
            "  [locked]"
        } else {
            ""
        };
        println!(
            "  {:<9} {:<width$} {:>5}g  {:>5.0} kcal  P:{:.1} C:{:.1} F:{:.1}{}",
            item.meal_slot.as_str(),
            item.name,
            grams,
            c.calories,
            c.protein,
            c.carbs,
            c.fat,
            tag,
            width = max_name_len
        );
    }

    println!();
    println!("--- Summary ---");
    display_totals_line("Achieved", result.totals());
    display_totals_line("Target", target);
    let delta = result.totals().minus(target);
    println!(
        "Delta      {}",
        Macro::ALL
            .iter()
            .map(|&m| format!("{} {}", m, format_delta(m, delta.get(m))))
            .collect::<Vec<_>>()
            .join(", ")
    );

    if !result.blockers().is_empty() {
        println!();
        println!("--- Blockers ---");
        for blocker in result.blockers() {
            println!(
                "  [{}] {}: {}",
                blocker.constraint, blocker.item_name, blocker.detail
            );
        }
    }

    if let Some(diagnostics) = result.diagnostics() {
        println!();
        println!("--- Attempts ---");
        for attempt in &diagnostics.attempts {
            println!(
                "  {:?}: {:?} after {} iterations, weighted delta {:.2}{}",
                attempt.strategy,
                attempt.outcome,
                attempt.iterations,
                attempt.weighted_delta,
                if attempt.found_valid { ", valid" } else { "" }
            );
        }
    }
    println!();
}
