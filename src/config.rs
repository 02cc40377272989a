use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::ToleranceWindow;
use crate::planner::constants::DEFAULT_MAX_ITERATIONS;
use crate::planner::targets::{NutritionSettings, WeeklyOverride};

/// Options recognized by `solve`. Missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SolveOptions {
    /// Total iteration budget across all strategies.
    pub max_iterations: usize,
    pub tolerances: ToleranceWindow,
    /// Count seasoning nutrients toward totals.
    pub seasonings_count_macros: bool,
    /// Attach per-attempt diagnostics to the result.
    pub debug_mode: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerances: ToleranceWindow::default(),
            seasonings_count_macros: false,
            debug_mode: false,
        }
    }
}

/// Global nutrition settings plus any weekly overrides, as stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsFile {
    pub settings: NutritionSettings,
    pub overrides: Vec<WeeklyOverride>,
}

/// Load solve options from a JSON file.
pub fn load_options<P: AsRef<Path>>(path: P) -> Result<SolveOptions> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Load nutrition settings from a JSON file.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<SettingsFile> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
