//! Read-only nutrition catalog injected into the planner.
//!
//! Holds ingredients, templates, diets, meal patterns, and the lookup tables
//! the nutrition calculator and filters consult. Loaded from JSON or built in
//! code with the `with_*` methods.

mod validator;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

use crate::models::{DietProfile, Ingredient, MealPattern, MealTemplate};

pub use validator::{DataIntegrityWarning, validate_catalog};

/// Minimum similarity for an id suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.7;

/// Nutrient multipliers applied by a cooking method.
///
/// Carbohydrates are left unscaled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CookingMultiplier {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }

    /// Northern-hemisphere season for a month number (1-12).
    pub fn from_month(month: u32) -> Option<Season> {
        match month {
            3..=5 => Some(Season::Spring),
            6..=8 => Some(Season::Summer),
            9..=11 => Some(Season::Autumn),
            12 | 1 | 2 => Some(Season::Winter),
            _ => None,
        }
    }
}

impl std::str::FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "autumn" | "fall" => Ok(Season::Autumn),
            "winter" => Ok(Season::Winter),
            other => Err(format!("unknown season: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionCatalog {
    pub ingredients: HashMap<String, Ingredient>,
    pub templates: Vec<MealTemplate>,
    pub diets: HashMap<String, DietProfile>,
    pub patterns: HashMap<String, MealPattern>,
    /// Generic unit -> grams.
    pub unit_conversions: HashMap<String, f64>,
    /// Ingredient id -> unit -> grams; overrides the generic table.
    pub ingredient_conversions: HashMap<String, HashMap<String, f64>>,
    /// Restriction id (allergen) -> banned ingredient ids.
    pub allergens: HashMap<String, HashSet<String>>,
    /// Ingredient id -> ordered substitute ids.
    pub substitutes: HashMap<String, Vec<String>>,
    pub cooking_multipliers: HashMap<String, CookingMultiplier>,
    /// Ingredient id -> cooked/raw mass ratio.
    pub cooking_yields: HashMap<String, f64>,
    /// Season name -> ingredient ids in season.
    pub seasonal: HashMap<String, Vec<String>>,
}

impl NutritionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ingredient(mut self, ingredient: Ingredient) -> Self {
        self.ingredients.insert(ingredient.id.clone(), ingredient);
        self
    }

    pub fn with_template(mut self, template: MealTemplate) -> Self {
        self.templates.push(template);
        self
    }

    pub fn with_diet(mut self, diet: DietProfile) -> Self {
        self.diets.insert(diet.id.clone(), diet);
        self
    }

    pub fn with_pattern(mut self, pattern: MealPattern) -> Self {
        self.patterns.insert(pattern.id.clone(), pattern);
        self
    }

    pub fn with_unit(mut self, unit: &str, grams: f64) -> Self {
        self.unit_conversions.insert(normalize_unit(unit), grams);
        self
    }

    pub fn with_ingredient_unit(mut self, ingredient_id: &str, unit: &str, grams: f64) -> Self {
        self.ingredient_conversions
            .entry(ingredient_id.to_string())
            .or_default()
            .insert(normalize_unit(unit), grams);
        self
    }

    pub fn with_allergen(mut self, restriction: &str, ingredient_ids: &[&str]) -> Self {
        self.allergens.insert(
            restriction.to_lowercase(),
            ingredient_ids.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn with_substitutes(mut self, ingredient_id: &str, substitutes: &[&str]) -> Self {
        self.substitutes.insert(
            ingredient_id.to_string(),
            substitutes.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn with_cooking_multiplier(mut self, method: &str, multiplier: CookingMultiplier) -> Self {
        self.cooking_multipliers.insert(method.to_lowercase(), multiplier);
        self
    }

    pub fn with_yield(mut self, ingredient_id: &str, factor: f64) -> Self {
        self.cooking_yields.insert(ingredient_id.to_string(), factor);
        self
    }

    pub fn with_seasonal(mut self, season: Season, ingredient_ids: &[&str]) -> Self {
        self.seasonal.insert(
            season.as_str().to_string(),
            ingredient_ids.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn ingredient(&self, id: &str) -> Option<&Ingredient> {
        self.ingredients.get(id)
    }

    pub fn diet(&self, id: &str) -> Option<&DietProfile> {
        self.diets.get(id)
    }

    pub fn pattern(&self, id: &str) -> Option<&MealPattern> {
        self.patterns.get(id)
    }

    /// Templates serving a slot type, in catalog order.
    pub fn templates_for_slot(&self, meal_type: &str) -> Vec<&MealTemplate> {
        self.templates
            .iter()
            .filter(|t| t.meal_type.eq_ignore_ascii_case(meal_type))
            .collect()
    }

    /// Grams per unit, preferring the ingredient-specific table.
    pub fn grams_per_unit(&self, ingredient_id: &str, unit: &str) -> Option<f64> {
        let unit = normalize_unit(unit);
        self.ingredient_conversions
            .get(ingredient_id)
            .and_then(|table| table.get(&unit))
            .or_else(|| self.unit_conversions.get(&unit))
            .copied()
    }

    /// Ingredient ids banned by a restriction. Unknown restrictions ban nothing.
    pub fn allergen_ingredients(&self, restriction: &str) -> Option<&HashSet<String>> {
        self.allergens.get(&restriction.to_lowercase())
    }

    /// True if any of the given restrictions bans the ingredient.
    pub fn restricted(&self, ingredient_id: &str, restrictions: &[String]) -> bool {
        restrictions.iter().any(|r| {
            self.allergen_ingredients(r)
                .is_some_and(|ids| ids.contains(ingredient_id))
        })
    }

    pub fn substitutes_for(&self, ingredient_id: &str) -> &[String] {
        self.substitutes
            .get(ingredient_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn cooking_multiplier(&self, method: &str) -> Option<&CookingMultiplier> {
        self.cooking_multipliers.get(&method.to_lowercase())
    }

    pub fn cooking_yield(&self, ingredient_id: &str) -> Option<f64> {
        self.cooking_yields.get(ingredient_id).copied()
    }

    pub fn seasonal_ingredients(&self, season: Season) -> HashSet<&str> {
        self.seasonal
            .get(season.as_str())
            .map(|ids| ids.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn closest_diet(&self, input: &str) -> Option<&str> {
        closest_match(input, self.diets.keys().map(String::as_str))
    }

    pub fn closest_pattern(&self, input: &str) -> Option<&str> {
        closest_match(input, self.patterns.keys().map(String::as_str))
    }

    pub fn closest_restriction(&self, input: &str) -> Option<&str> {
        closest_match(input, self.allergens.keys().map(String::as_str))
    }
}

/// Best fuzzy match for `input` among `options`, if similar enough.
pub fn closest_match<'a>(input: &str, options: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let needle = input.to_lowercase();
    options
        .map(|o| (o, jaro_winkler(&o.to_lowercase(), &needle)))
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(o, _)| o)
}

/// Units compare case-insensitively without surrounding whitespace.
pub fn normalize_unit(unit: &str) -> String {
    unit.trim().to_lowercase()
}
