//! Guaranteed meal for slots no template could fill.

use tracing::{debug, warn};

use crate::models::{
    AlgorithmMetrics, GeneratedMeal, MealSlot, MealTemplate, Nutrition, ScaledIngredient,
};
use crate::planner::assembler::build_meal;
use crate::planner::nutrition::NutritionCalculator;
use crate::planner::substitution::SubstitutionResolver;

/// Template id carried by the built-in minimal meal.
pub const FALLBACK_TEMPLATE_ID: &str = "fallback";

/// A built-in ingredient with fixed nutrition per 100 g.
struct BasicFood {
    id: &'static str,
    name: &'static str,
    grams: f64,
    per_100g: Nutrition,
}

fn starches() -> [BasicFood; 2] {
    [
        BasicFood {
            id: "oats",
            name: "Rolled Oats",
            grams: 40.0,
            per_100g: Nutrition::new(389.0, 16.9, 6.9, 66.3),
        },
        BasicFood {
            id: "rice",
            name: "Cooked Rice",
            grams: 115.0,
            per_100g: Nutrition::new(130.0, 2.7, 0.3, 28.0),
        },
    ]
}

fn liquids() -> [BasicFood; 3] {
    [
        BasicFood {
            id: "milk",
            name: "Milk",
            grams: 250.0,
            per_100g: Nutrition::new(61.0, 3.2, 3.3, 4.8),
        },
        BasicFood {
            id: "soy_milk",
            name: "Soy Milk",
            grams: 250.0,
            per_100g: Nutrition::new(54.0, 3.3, 1.8, 6.0),
        },
        BasicFood {
            id: "almond_milk",
            name: "Almond Milk",
            grams: 250.0,
            per_100g: Nutrition::new(17.0, 0.6, 1.1, 0.6),
        },
    ]
}

/// The minimal starch plus milk meal (about 300 kcal) for a slot.
///
/// Needs nothing from the catalog beyond the ban lists: the first starch and
/// the first milk the diet and restrictions allow are used.
pub fn minimal_meal(slot: &MealSlot, resolver: &SubstitutionResolver) -> GeneratedMeal {
    let mut ingredients = Vec::new();
    let mut nutrition = Nutrition::default();

    let starches = starches();
    let liquids = liquids();
    for group in [&starches[..], &liquids[..]] {
        match group.iter().find(|food| resolver.is_allowed(food.id)) {
            Some(food) => {
                nutrition += food.per_100g.scaled(food.grams / 100.0);
                ingredients.push(ScaledIngredient {
                    ingredient_id: food.id.to_string(),
                    name: food.name.to_string(),
                    amount: food.grams,
                    unit: "g".to_string(),
                    grams: food.grams,
                    substituted_for: None,
                });
            }
            None => warn!(slot = %slot.name, "every built-in fallback ingredient is banned"),
        }
    }

    GeneratedMeal {
        slot: slot.name.clone(),
        template_id: FALLBACK_TEMPLATE_ID.to_string(),
        name: format!("Simple {}", slot.meal_type()),
        meal_type: slot.meal_type().to_string(),
        ingredients,
        nutrition,
        cuisine: "standard".to_string(),
        cooking_method: "raw".to_string(),
        prep_time_minutes: 5,
        scale: 1.0,
        is_fallback: true,
    }
}

/// Meal for a slot whose candidates all failed.
///
/// Uses the first diet-compatible template that still computes at 1.0x,
/// after removing banned ingredients; otherwise the minimal meal.
pub fn fallback_meal(
    slot: &MealSlot,
    compatible: &[&MealTemplate],
    resolver: &SubstitutionResolver,
    calculator: &NutritionCalculator,
    allow_substitutions: bool,
    metrics: &mut AlgorithmMetrics,
) -> GeneratedMeal {
    metrics.record_fallback();

    for template in compatible {
        let resolved = resolver.resolve(&template.ingredients, allow_substitutions);
        if resolved.lines.is_empty() {
            continue;
        }
        match calculator.breakdown(&resolved.lines, &template.cooking_method, 1.0) {
            Ok(breakdown) => {
                debug!(slot = %slot.name, template = %template.id, "fallback to unscaled template");
                metrics.substitutions_made += resolved.substituted;
                metrics.ingredients_dropped += resolved.dropped;
                return build_meal(slot, template, breakdown, 1.0, true);
            }
            Err(_) => metrics.validation_errors += 1,
        }
    }

    debug!(slot = %slot.name, "fallback to minimal meal");
    minimal_meal(slot, resolver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NutritionCatalog;
    use crate::models::{DietProfile, Ingredient, IngredientLine, MacroSplit};

    fn diet() -> DietProfile {
        DietProfile::new("balanced", "Balanced", MacroSplit::new(30.0, 30.0, 40.0)).unwrap()
    }

    #[test]
    fn test_minimal_meal_is_about_300_kcal() {
        let catalog = NutritionCatalog::new();
        let diet = diet();
        let resolver = SubstitutionResolver::new(&catalog, &diet, &[]);
        let slot = MealSlot::new("snack", "15:00", 10.0);

        let meal = minimal_meal(&slot, &resolver);
        assert!(meal.is_fallback);
        assert_eq!(meal.meal_type, "snack");
        assert_eq!(meal.ingredients.len(), 2);
        assert!((250.0..=350.0).contains(&meal.nutrition.calories));
    }

    #[test]
    fn test_minimal_meal_respects_bans() {
        let catalog = NutritionCatalog::new().with_allergen("dairy", &["milk"]);
        let diet = diet().with_banned(&["oats"]);
        let restrictions = vec!["dairy".to_string()];
        let resolver = SubstitutionResolver::new(&catalog, &diet, &restrictions);

        let meal = minimal_meal(&MealSlot::new("breakfast", "08:00", 30.0), &resolver);
        let ids: Vec<&str> = meal.ingredients.iter().map(|i| i.ingredient_id.as_str()).collect();
        assert_eq!(ids, vec!["rice", "soy_milk"]);
    }

    #[test]
    fn test_prefers_compatible_template() {
        let catalog = NutritionCatalog::new().with_ingredient(
            Ingredient::new("egg", "Egg", "protein", Nutrition::new(155.0, 13.0, 11.0, 1.1)).unwrap(),
        );
        let diet = diet();
        let resolver = SubstitutionResolver::new(&catalog, &diet, &[]);
        let calc = NutritionCalculator::new(&catalog);
        let template =
            MealTemplate::new("eggs", "Eggs", "breakfast", vec![IngredientLine::new("egg", 200.0, "g")])
                .unwrap();
        let mut metrics = AlgorithmMetrics::default();

        let meal = fallback_meal(
            &MealSlot::new("breakfast", "08:00", 30.0),
            &[&template],
            &resolver,
            &calc,
            true,
            &mut metrics,
        );
        assert_eq!(meal.template_id, "eggs");
        assert_eq!(meal.scale, 1.0);
        assert!(meal.is_fallback);
        assert!(metrics.fallback_used);
        assert!((meal.nutrition.calories - 310.0).abs() < 1e-9);
    }
}
