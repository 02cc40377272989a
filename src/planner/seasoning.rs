//! Seasoning grams are a function of other items' grams, never searched.

use crate::models::{Category, PortionableItem};
use crate::planner::constants::{SEASONING_CAP_GRAMS, SEASONING_FALLBACK_GRAMS};

/// Total grams of non-seasoning protein items.
fn protein_basis(items: &[PortionableItem], grams: &[u32]) -> f64 {
    items
        .iter()
        .zip(grams)
        .filter(|(item, _)| item.category == Category::Protein && !item.is_seasoning())
        .map(|(_, &g)| g as f64)
        .sum()
}

/// Grams for the seasoning at `index`, given the current allocation.
///
/// - rate + paired item: `round(paired × rate / 100)`
/// - rate without a resolvable pairing: protein-category grams as the basis
/// - no rate: fixed fallback
///
/// Always clamped to the seasoning cap.
pub fn seasoning_grams(items: &[PortionableItem], grams: &[u32], index: usize) -> u32 {
    let rule = items[index].seasoning_rule();
    let derived = match rule.and_then(|r| r.rate) {
        Some(rate) => {
            let paired = rule
                .and_then(|r| r.paired_item_id.as_deref())
                .and_then(|id| items.iter().position(|item| item.id == id))
                .filter(|&pos| pos != index);
            let basis = match paired {
                Some(pos) => grams[pos] as f64,
                None => protein_basis(items, grams),
            };
            (basis * rate.max(0.0) / 100.0).round() as u32
        }
        None => SEASONING_FALLBACK_GRAMS,
    };
    derived.min(SEASONING_CAP_GRAMS)
}

/// Recompute every seasoning's grams in place. Returns true if any changed.
///
/// Runs after every trial change and once more over the final allocation, so
/// the cap holds whatever the seasoning was configured with.
pub fn rescale(items: &[PortionableItem], grams: &mut [u32]) -> bool {
    let mut changed = false;
    for index in 0..items.len() {
        if !items[index].is_seasoning() {
            continue;
        }
        let updated = seasoning_grams(items, grams, index);
        if grams[index] != updated {
            grams[index] = updated;
            changed = true;
        }
    }
    changed
}
