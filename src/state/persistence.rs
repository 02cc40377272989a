use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::models::{ItemRecord, PortionableItem, Portions};

/// Keep one record per id: the last occurrence, at the position of the first.
fn dedup(records: Vec<ItemRecord>) -> Vec<ItemRecord> {
    let mut position: HashMap<String, usize> = HashMap::new();
    let mut deduped: Vec<ItemRecord> = Vec::with_capacity(records.len());
    for record in records {
        match position.get(&record.id) {
            Some(&i) => deduped[i] = record,
            None => {
                position.insert(record.id.clone(), deduped.len());
                deduped.push(record);
            }
        }
    }
    deduped
}

/// Load meal item records from a JSON file.
///
/// Deduplicates by id (last occurrence wins).
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<ItemRecord>> {
    let content = fs::read_to_string(path)?;
    let records: Vec<ItemRecord> = serde_json::from_str(&content)?;
    Ok(dedup(records))
}

/// Save meal item records to a JSON file.
///
/// Deduplicates by id before saving.
pub fn save_records<P: AsRef<Path>>(path: P, records: &[ItemRecord]) -> Result<()> {
    let deduped = dedup(records.to_vec());
    let json = serde_json::to_string_pretty(&deduped)?;
    fs::write(path, json)?;
    Ok(())
}

/// Write solved grams back into the records. Returns how many changed.
pub fn apply_portions(records: &mut [ItemRecord], portions: &Portions) -> usize {
    let mut changed = 0;
    for record in records.iter_mut() {
        if let Some(&grams) = portions.get(&record.id) {
            if record.quantity_grams != grams {
                record.quantity_grams = grams;
                changed += 1;
            }
        }
    }
    changed
}

/// Write solved portions to a CSV file, one row per item.
pub fn write_portions_csv<P: AsRef<Path>>(
    path: P,
    items: &[PortionableItem],
    portions: &Portions,
) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["id", "name", "meal", "grams", "calories", "protein", "carbs", "fat"])?;

    for item in items {
        let grams = portions.get(&item.id).copied().unwrap_or(item.current_grams);
        let c = item.contribution(grams);
        wtr.write_record([
            item.id.clone(),
            item.name.clone(),
            item.meal_slot.to_string(),
            grams.to_string(),
            format!("{:.0}", c.calories),
            format!("{:.1}", c.protein),
            format!("{:.1}", c.carbs),
            format!("{:.1}", c.fat),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
