use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::NutritionCatalog;
use crate::planner::nutrition::{ValidationScope, validate_nutrition};

/// Tolerance for diet macro percentages around 100.
const MACRO_SUM_TOLERANCE: f64 = 2.0;

/// A non-fatal catalog inconsistency found at startup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataIntegrityWarning {
    #[error("ingredient '{id}' has implausible nutrition facts")]
    InvalidNutrition { id: String },

    #[error("diet '{id}' macro percentages sum to {sum:.1}")]
    MacroSum { id: String, sum: f64 },

    #[error("pattern '{id}' slot shares sum to {sum:.1}")]
    PatternShares { id: String, sum: f64 },

    #[error("template '{template}' references unknown ingredient '{ingredient}'")]
    UnknownTemplateIngredient { template: String, ingredient: String },

    #[error("template '{template}' has non-positive amount for '{ingredient}'")]
    InvalidAmount { template: String, ingredient: String },

    #[error("substitute '{substitute}' for '{ingredient}' is not in the catalog")]
    UnknownSubstitute { ingredient: String, substitute: String },

    #[error("allergen '{allergen}' lists unknown ingredient '{ingredient}'")]
    UnknownAllergenIngredient { allergen: String, ingredient: String },

    #[error("cooking yield {factor} for '{id}' is outside the plausible range")]
    ImplausibleYield { id: String, factor: f64 },

    #[error("no templates serve slot '{slot}' of pattern '{pattern}'")]
    EmptySlot { pattern: String, slot: String },
}

/// Sanity pass over a catalog. Findings are logged and returned, never fatal.
pub fn validate_catalog(catalog: &NutritionCatalog) -> Vec<DataIntegrityWarning> {
    let mut warnings = Vec::new();

    for ingredient in catalog.ingredients.values() {
        if validate_nutrition(&ingredient.per_100g, ValidationScope::Ingredient).is_err() {
            warnings.push(DataIntegrityWarning::InvalidNutrition {
                id: ingredient.id.clone(),
            });
        }
    }

    for diet in catalog.diets.values() {
        let sum = diet.macros.sum();
        if (sum - 100.0).abs() > MACRO_SUM_TOLERANCE {
            warnings.push(DataIntegrityWarning::MacroSum {
                id: diet.id.clone(),
                sum,
            });
        }
    }

    for pattern in catalog.patterns.values() {
        if !pattern.shares_valid() {
            warnings.push(DataIntegrityWarning::PatternShares {
                id: pattern.id.clone(),
                sum: pattern.total_share(),
            });
        }
        for slot in &pattern.slots {
            if catalog.templates_for_slot(slot.meal_type()).is_empty() {
                warnings.push(DataIntegrityWarning::EmptySlot {
                    pattern: pattern.id.clone(),
                    slot: slot.name.clone(),
                });
            }
        }
    }

    for template in &catalog.templates {
        for line in &template.ingredients {
            if catalog.ingredient(&line.ingredient_id).is_none() {
                warnings.push(DataIntegrityWarning::UnknownTemplateIngredient {
                    template: template.id.clone(),
                    ingredient: line.ingredient_id.clone(),
                });
            }
            if !(line.amount.is_finite() && line.amount > 0.0) {
                warnings.push(DataIntegrityWarning::InvalidAmount {
                    template: template.id.clone(),
                    ingredient: line.ingredient_id.clone(),
                });
            }
        }
    }

    for (ingredient, substitutes) in &catalog.substitutes {
        for substitute in substitutes {
            if catalog.ingredient(substitute).is_none() {
                warnings.push(DataIntegrityWarning::UnknownSubstitute {
                    ingredient: ingredient.clone(),
                    substitute: substitute.clone(),
                });
            }
        }
    }

    for (allergen, ids) in &catalog.allergens {
        for id in ids {
            if catalog.ingredient(id).is_none() {
                warnings.push(DataIntegrityWarning::UnknownAllergenIngredient {
                    allergen: allergen.clone(),
                    ingredient: id.clone(),
                });
            }
        }
    }

    for (id, factor) in &catalog.cooking_yields {
        if !crate::planner::constants::YIELD_RANGE.contains(factor) {
            warnings.push(DataIntegrityWarning::ImplausibleYield {
                id: id.clone(),
                factor: *factor,
            });
        }
    }

    for warning in &warnings {
        warn!(%warning, "catalog integrity");
    }
    debug!(
        ingredients = catalog.ingredients.len(),
        templates = catalog.templates.len(),
        findings = warnings.len(),
        "catalog validated"
    );

    warnings
}
