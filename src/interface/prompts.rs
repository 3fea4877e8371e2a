use std::collections::BTreeSet;

use dialoguer::{Confirm, Input, MultiSelect, Select};

use crate::catalog::{NutritionCatalog, closest_match};
use crate::error::{PlannerError, Result};
use crate::models::{ALL_OPTION, MeasurementSystem, Preferences};

fn sorted_keys<'a>(keys: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut keys: Vec<String> = keys.cloned().collect();
    keys.sort();
    keys
}

/// Pick one id from a list.
fn prompt_choice(prompt: &str, options: &[String], default: &str) -> Result<String> {
    if options.is_empty() {
        return Err(PlannerError::InvalidInput(format!("no options for '{}'", prompt)));
    }
    let default_idx = options.iter().position(|o| o == default).unwrap_or(0);
    let selection = Select::new()
        .with_prompt(prompt)
        .items(options)
        .default(default_idx)
        .interact()?;
    Ok(options[selection].clone())
}

/// Prompt for the daily calorie target.
pub fn prompt_target_calories() -> Result<f64> {
    let input: String = Input::new()
        .with_prompt("Daily calorie target")
        .default("2000".to_string())
        .interact_text()?;

    let calories: f64 = input
        .trim()
        .parse()
        .map_err(|_| PlannerError::InvalidInput("Invalid number".to_string()))?;
    if calories <= 0.0 {
        return Err(PlannerError::InvalidInput(
            "Calorie target must be positive".to_string(),
        ));
    }
    Ok(calories)
}

/// Prompt for preferred cuisines with fuzzy matching against the catalog.
///
/// An empty answer means every cuisine.
pub fn prompt_cuisines(known: &[String]) -> Result<Vec<String>> {
    let input: String = Input::new()
        .with_prompt("Preferred cuisines, comma separated (Enter for all)")
        .allow_empty(true)
        .interact_text()?;

    let mut cuisines = Vec::new();
    for raw in input.split(',') {
        let wanted = raw.trim().to_lowercase();
        if wanted.is_empty() {
            continue;
        }
        if wanted == ALL_OPTION || known.contains(&wanted) {
            cuisines.push(wanted);
            continue;
        }

        match closest_match(&wanted, known.iter().map(String::as_str)) {
            Some(suggestion) => {
                let confirm = Confirm::new()
                    .with_prompt(format!("Did you mean '{}'?", suggestion))
                    .default(true)
                    .interact()?;
                if confirm {
                    cuisines.push(suggestion.to_string());
                }
            }
            None => println!("No matching cuisine found for '{}'", wanted),
        }
    }
    Ok(cuisines)
}

/// Pick any number of options; nothing picked means none.
fn prompt_many(prompt: &str, options: &[String]) -> Result<Vec<String>> {
    if options.is_empty() {
        return Ok(Vec::new());
    }
    let picked = MultiSelect::new()
        .with_prompt(prompt)
        .items(options)
        .interact()?;
    Ok(picked.into_iter().map(|i| options[i].clone()).collect())
}

pub fn prompt_measurement_system() -> Result<MeasurementSystem> {
    let selection = Select::new()
        .with_prompt("Units")
        .items(&["metric (g, kg)", "imperial (oz, lb)"])
        .default(0)
        .interact()?;
    Ok(match selection {
        1 => MeasurementSystem::Imperial,
        _ => MeasurementSystem::Metric,
    })
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Collect all planning preferences interactively.
pub fn collect_preferences(catalog: &NutritionCatalog) -> Result<Preferences> {
    let diets = sorted_keys(catalog.diets.keys());
    let patterns = sorted_keys(catalog.patterns.keys());
    let restrictions = sorted_keys(catalog.allergens.keys());
    let cuisines: Vec<String> = catalog
        .templates
        .iter()
        .map(|t| t.cuisine.to_lowercase())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let methods: Vec<String> = catalog
        .templates
        .iter()
        .map(|t| t.cooking_method.to_lowercase())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let diet = prompt_choice("Diet", &diets, "balanced")?;
    let calories = prompt_target_calories()?;
    let pattern = prompt_choice("Meal pattern", &patterns, "standard")?;
    let chosen_restrictions = prompt_many("Restrictions (space to toggle)", &restrictions)?;
    let chosen_cuisines = prompt_cuisines(&cuisines)?;
    let chosen_methods = prompt_many("Cooking methods (none selected means all)", &methods)?;
    let system = prompt_measurement_system()?;
    let substitutions = prompt_yes_no("Allow ingredient substitutions?", true)?;

    let mut preferences = Preferences::new(&diet, calories, &pattern)
        .with_measurement_system(system)
        .with_substitutions(substitutions);
    preferences.restrictions = chosen_restrictions;
    preferences.cuisines = chosen_cuisines;
    preferences.cooking_methods = chosen_methods;
    Ok(preferences)
}
