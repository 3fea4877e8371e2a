use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{DataIntegrityWarning, NutritionCatalog, validate_catalog};
use crate::error::Result;
use crate::state::{MealHistory, PreferenceStats};

/// Variety and preference state carried between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerState {
    #[serde(default)]
    pub history: MealHistory,
    #[serde(default)]
    pub stats: PreferenceStats,
}

/// Load a nutrition catalog from a JSON file.
///
/// Template ids are deduplicated, last occurrence wins.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<NutritionCatalog> {
    let content = fs::read_to_string(path)?;
    let mut catalog: NutritionCatalog = serde_json::from_str(&content)?;

    let mut seen = std::collections::HashSet::new();
    let mut deduped: Vec<_> = catalog
        .templates
        .into_iter()
        .rev()
        .filter(|t| seen.insert(t.id.clone()))
        .collect();
    deduped.reverse();
    catalog.templates = deduped;

    Ok(catalog)
}

/// Load a catalog and run the integrity checks on it.
///
/// Findings are logged and returned; none of them stop loading.
pub fn load_checked_catalog<P: AsRef<Path>>(
    path: P,
) -> Result<(NutritionCatalog, Vec<DataIntegrityWarning>)> {
    let catalog = load_catalog(path)?;
    let warnings = validate_catalog(&catalog);
    Ok((catalog, warnings))
}

/// Load planner state, or a fresh state if the file does not exist.
pub fn load_state<P: AsRef<Path>>(path: P) -> Result<PlannerState> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(PlannerState::default());
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_state<P: AsRef<Path>>(path: P, state: &PlannerState) -> Result<()> {
    let json = serde_json::to_string_pretty(state)?;
    fs::write(path, json)?;
    Ok(())
}
