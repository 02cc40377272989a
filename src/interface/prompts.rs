use dialoguer::{Confirm, Select};
use strsim::jaro_winkler;

use crate::error::{PortionError, Result};
use crate::models::ItemRecord;

/// Similarity a fuzzy match must exceed to be offered.
const FUZZY_THRESHOLD: f64 = 0.7;

/// Most fuzzy matches shown in a selection list.
const MAX_SUGGESTIONS: usize = 5;

/// Records whose product name resembles `query`, best match first.
pub fn fuzzy_candidates<'r>(records: &'r [ItemRecord], query: &str) -> Vec<(&'r ItemRecord, f64)> {
    let query = query.trim().to_lowercase();
    let mut candidates: Vec<(&ItemRecord, f64)> = records
        .iter()
        .map(|r| (r, jaro_winkler(&r.product.name.to_lowercase(), &query)))
        .filter(|(_, score)| *score > FUZZY_THRESHOLD)
        .collect();

    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    candidates
}

/// Find the record a user meant by `query` and return its id.
///
/// Exact (case-insensitive) name or id matches resolve silently; otherwise the
/// user confirms a single fuzzy match or picks from several.
pub fn resolve_item_name(records: &[ItemRecord], query: &str) -> Result<String> {
    let wanted = query.trim().to_lowercase();
    if let Some(record) = records
        .iter()
        .find(|r| r.id.to_lowercase() == wanted || r.product.name.to_lowercase() == wanted)
    {
        return Ok(record.id.clone());
    }

    let candidates = fuzzy_candidates(records, query);
    match candidates.as_slice() {
        [] => Err(PortionError::ItemNotFound(query.to_string())),
        [(record, _)] => {
            let confirm = prompt_yes_no(&format!("Did you mean '{}'?", record.product.name), true)?;
            if confirm {
                Ok(record.id.clone())
            } else {
                Err(PortionError::ItemNotFound(query.to_string()))
            }
        }
        _ => {
            let options: Vec<&ItemRecord> = candidates
                .iter()
                .take(MAX_SUGGESTIONS)
                .map(|(r, _)| *r)
                .collect();

            let mut labels: Vec<String> = options
                .iter()
                .map(|r| format!("{} ({})", r.product.name, r.id))
                .collect();
            labels.push("None of these".to_string());

            let selection = Select::new()
                .with_prompt(format!("Which item did you mean by '{}'?", query))
                .items(&labels)
                .default(0)
                .interact()?;

            options
                .get(selection)
                .map(|r| r.id.clone())
                .ok_or_else(|| PortionError::ItemNotFound(query.to_string()))
        }
    }
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
