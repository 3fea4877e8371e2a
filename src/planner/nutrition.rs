//! Nutrition calculator: recipe lines to per-meal totals.

use thiserror::Error;
use tracing::debug;

use crate::catalog::NutritionCatalog;
use crate::models::{IngredientLine, MealTemplate, Nutrition, ScaledIngredient};
use crate::planner::constants::*;

/// Which plausibility limits [`validate_nutrition`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationScope {
    /// Per-100 g catalog facts of a single ingredient.
    Ingredient,
    /// Totals of a whole meal, including calorie consistency.
    Meal,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NutritionError {
    #[error("nutrition values are negative or not finite")]
    NegativeOrNonFinite,

    #[error("{calories:.0} kcal exceeds the plausible maximum")]
    TooManyCalories { calories: f64 },

    #[error("{grams:.0} g protein exceeds the plausible maximum")]
    TooMuchProtein { grams: f64 },

    #[error("{grams:.0} g of a single macro per 100 g is impossible")]
    ImpossibleMacro { grams: f64 },

    #[error("stated {stated:.0} kcal vs {computed:.0} kcal from macros")]
    InconsistentCalories { stated: f64, computed: f64 },

    #[error("meal has no nutrition")]
    Empty,
}

/// Check nutrition values against the limits for `scope`.
pub fn validate_nutrition(n: &Nutrition, scope: ValidationScope) -> Result<(), NutritionError> {
    if !n.is_finite() || n.has_negative() {
        return Err(NutritionError::NegativeOrNonFinite);
    }

    match scope {
        ValidationScope::Ingredient => {
            if n.calories > MAX_INGREDIENT_CALORIES {
                return Err(NutritionError::TooManyCalories {
                    calories: n.calories,
                });
            }
            let largest = n.protein.max(n.fat).max(n.carbs);
            if largest > MAX_INGREDIENT_MACRO {
                return Err(NutritionError::ImpossibleMacro { grams: largest });
            }
        }
        ValidationScope::Meal => {
            if n.calories > MAX_MEAL_CALORIES {
                return Err(NutritionError::TooManyCalories {
                    calories: n.calories,
                });
            }
            if n.protein > MAX_MEAL_PROTEIN {
                return Err(NutritionError::TooMuchProtein { grams: n.protein });
            }
            let computed = n.macro_calories();
            if n.calories > 0.0 || computed > 0.0 {
                let ratio = if computed > 0.0 {
                    n.calories / computed
                } else {
                    f64::INFINITY
                };
                if !CALORIE_CONSISTENCY_RANGE.contains(&ratio) {
                    return Err(NutritionError::InconsistentCalories {
                        stated: n.calories,
                        computed,
                    });
                }
            }
        }
    }
    Ok(())
}

/// Scaled ingredient lines plus their summed nutrition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MealBreakdown {
    pub ingredients: Vec<ScaledIngredient>,
    pub totals: Nutrition,
}

/// Converts recipe lines into nutrition using the catalog's tables.
#[derive(Debug, Clone, Copy)]
pub struct NutritionCalculator<'a> {
    catalog: &'a NutritionCatalog,
    scale_bounds: (f64, f64),
}

impl<'a> NutritionCalculator<'a> {
    pub fn new(catalog: &'a NutritionCatalog) -> Self {
        Self {
            catalog,
            scale_bounds: (SCALE_MIN, SCALE_MAX),
        }
    }

    pub fn with_scale_bounds(mut self, min: f64, max: f64) -> Self {
        self.scale_bounds = (min, max);
        self
    }

    /// Total nutrition of a template at `scale`, or all zeros if the result is invalid.
    pub fn calculate(&self, template: &MealTemplate, scale: f64) -> Nutrition {
        self.breakdown(&template.ingredients, &template.cooking_method, scale)
            .map(|b| b.totals)
            .unwrap_or_default()
    }

    /// Canonical grams for an amount: ingredient table, then generic table, else as given.
    pub fn to_grams(&self, ingredient_id: &str, amount: f64, unit: &str) -> f64 {
        match self.catalog.grams_per_unit(ingredient_id, unit) {
            Some(grams_per_unit) => amount * grams_per_unit,
            None => amount,
        }
    }

    /// Scale every line, convert, and sum. Invalid ingredients are skipped;
    /// an invalid meal total is an error.
    pub fn breakdown(
        &self,
        lines: &[IngredientLine],
        cooking_method: &str,
        scale: f64,
    ) -> Result<MealBreakdown, NutritionError> {
        let scale = if scale.is_finite() {
            scale.clamp(self.scale_bounds.0, self.scale_bounds.1)
        } else {
            1.0
        };
        let multiplier = if cooking_method.eq_ignore_ascii_case("raw") {
            None
        } else {
            self.catalog.cooking_multiplier(cooking_method)
        };

        let mut breakdown = MealBreakdown::default();
        for line in lines {
            let Some(ingredient) = self.catalog.ingredient(&line.ingredient_id) else {
                debug!(ingredient = %line.ingredient_id, "skipping ingredient missing from catalog");
                continue;
            };
            if validate_nutrition(&ingredient.per_100g, ValidationScope::Ingredient).is_err() {
                debug!(ingredient = %ingredient.id, "skipping ingredient with invalid nutrition");
                continue;
            }

            let amount = line.amount * scale;
            let grams = self.to_grams(&ingredient.id, amount, &line.unit);

            let mut mass = grams;
            if let Some(factor) = self.catalog.cooking_yield(&ingredient.id) {
                if YIELD_RANGE.contains(&factor) {
                    mass *= factor;
                }
            }

            let mut contribution = ingredient.nutrition_for(mass);
            if let Some(m) = multiplier {
                contribution.calories *= m.calories;
                contribution.protein *= m.protein;
                contribution.fat *= m.fat;
            }
            if contribution.has_negative() || !contribution.is_finite() {
                debug!(ingredient = %ingredient.id, "discarding negative contribution");
                continue;
            }

            breakdown.totals += contribution;
            breakdown.ingredients.push(ScaledIngredient {
                ingredient_id: ingredient.id.clone(),
                name: ingredient.name.clone(),
                amount,
                unit: line.unit.clone(),
                grams,
                substituted_for: line.substituted_for.clone(),
            });
        }

        validate_nutrition(&breakdown.totals, ValidationScope::Meal)?;
        if breakdown.totals.is_zero() {
            return Err(NutritionError::Empty);
        }
        Ok(breakdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CookingMultiplier;
    use crate::models::Ingredient;

    fn catalog() -> NutritionCatalog {
        NutritionCatalog::new()
            .with_ingredient(
                Ingredient::new("rice", "Rice", "grains", Nutrition::new(130.0, 2.7, 0.3, 28.0))
                    .unwrap(),
            )
            .with_ingredient(
                Ingredient::new("chicken", "Chicken", "protein", Nutrition::new(165.0, 31.0, 3.6, 0.0))
                    .unwrap(),
            )
            .with_ingredient(
                Ingredient::new("oil", "Olive Oil", "oils", Nutrition::new(884.0, 0.0, 100.0, 0.0))
                    .unwrap(),
            )
            .with_unit("cup", 240.0)
            .with_unit("tbsp", 15.0)
            .with_ingredient_unit("rice", "cup", 185.0)
            .with_yield("rice", 2.0)
            .with_cooking_multiplier(
                "fried",
                CookingMultiplier {
                    calories: 1.2,
                    protein: 0.9,
                    fat: 1.5,
                },
            )
    }

    fn template(method: &str) -> MealTemplate {
        MealTemplate::new(
            "bowl",
            "Chicken Rice Bowl",
            "lunch",
            vec![
                IngredientLine::new("rice", 0.5, "cup"),
                IngredientLine::new("chicken", 150.0, "g"),
                IngredientLine::new("oil", 1.0, "tbsp"),
            ],
        )
        .unwrap()
        .with_cooking_method(method)
    }

    #[test]
    fn test_conversion_order() {
        let catalog = catalog();
        let calc = NutritionCalculator::new(&catalog);
        assert_eq!(calc.to_grams("rice", 1.0, "cup"), 185.0);
        assert_eq!(calc.to_grams("chicken", 1.0, "cup"), 240.0);
        assert_eq!(calc.to_grams("chicken", 150.0, "g"), 150.0);
    }

    #[test]
    fn test_calculate_raw() {
        let catalog = catalog();
        let calc = NutritionCalculator::new(&catalog);
        let n = calc.calculate(&template("raw"), 1.0);

        // rice: 92.5 g * yield 2.0 = 185 g; chicken 150 g; oil 15 g
        let expected = 185.0 * 1.30 + 150.0 * 1.65 + 15.0 * 8.84;
        assert!((n.calories - expected).abs() < 1e-6);
    }

    #[test]
    fn test_cooking_multiplier_leaves_carbs() {
        let catalog = catalog();
        let calc = NutritionCalculator::new(&catalog);
        let raw = calc.calculate(&template("raw"), 1.0);
        let fried = calc.calculate(&template("fried"), 1.0);

        assert!((fried.calories - raw.calories * 1.2).abs() < 1e-6);
        assert!((fried.fat - raw.fat * 1.5).abs() < 1e-6);
        assert!((fried.carbs - raw.carbs).abs() < 1e-9);
    }

    #[test]
    fn test_deterministic_and_monotonic() {
        let catalog = catalog();
        let calc = NutritionCalculator::new(&catalog);
        let t = template("raw");
        assert_eq!(calc.calculate(&t, 1.0), calc.calculate(&t, 1.0));

        let mut previous = 0.0;
        for step in 1..=20 {
            let n = calc.calculate(&t, step as f64 * 0.25);
            assert!(n.calories >= previous);
            previous = n.calories;
        }
    }

    #[test]
    fn test_scale_is_clamped() {
        let catalog = catalog();
        let calc = NutritionCalculator::new(&catalog);
        let t = template("raw");
        assert_eq!(calc.calculate(&t, 50.0), calc.calculate(&t, SCALE_MAX));
        assert_eq!(calc.calculate(&t, 0.0), calc.calculate(&t, SCALE_MIN));
    }

    #[test]
    fn test_skips_unknown_and_invalid_ingredients() {
        let mut catalog = catalog().with_ingredient(
            Ingredient::new("junk", "Junk", "other", Nutrition::new(100.0, 0.0, 0.0, 25.0)).unwrap(),
        );
        catalog.ingredients.get_mut("junk").unwrap().per_100g.calories = 2000.0;
        let calc = NutritionCalculator::new(&catalog);

        let lines = vec![
            IngredientLine::new("chicken", 100.0, "g"),
            IngredientLine::new("junk", 100.0, "g"),
            IngredientLine::new("ghost", 100.0, "g"),
        ];
        let b = calc.breakdown(&lines, "raw", 1.0).unwrap();
        assert_eq!(b.ingredients.len(), 1);
        assert!((b.totals.calories - 165.0).abs() < 1e-9);
    }

    #[test]
    fn test_inconsistent_meal_is_zero() {
        let mut catalog = catalog();
        // Stated calories far above what the macros explain.
        catalog.ingredients.get_mut("chicken").unwrap().per_100g = Nutrition::new(800.0, 10.0, 1.0, 0.0);
        let calc = NutritionCalculator::new(&catalog);
        let t = MealTemplate::new("c", "C", "lunch", vec![IngredientLine::new("chicken", 100.0, "g")])
            .unwrap();
        assert_eq!(calc.calculate(&t, 1.0), Nutrition::default());
    }

    #[test]
    fn test_validate_meal_scope() {
        let ok = Nutrition::new(500.0, 30.0, 20.0, 50.0);
        assert!(validate_nutrition(&ok, ValidationScope::Meal).is_ok());
        let huge = Nutrition::new(6000.0, 300.0, 200.0, 600.0);
        assert!(matches!(
            validate_nutrition(&huge, ValidationScope::Meal),
            Err(NutritionError::TooManyCalories { .. })
        ));
        // Ingredient scope never checks calorie consistency.
        let odd = Nutrition::new(400.0, 1.0, 1.0, 1.0);
        assert!(validate_nutrition(&odd, ValidationScope::Ingredient).is_ok());
        assert!(validate_nutrition(&odd, ValidationScope::Meal).is_err());
    }
}
