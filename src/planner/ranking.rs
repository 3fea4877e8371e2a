use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::{MacroSplit, MealTemplate};
use crate::planner::nutrition::NutritionCalculator;
use crate::planner::substitution::SubstitutionResolver;

/// Candidate template with its ranking distance (lower is better).
#[derive(Debug, Clone, Copy)]
pub struct RankedTemplate<'t> {
    pub template: &'t MealTemplate,
    pub distance: f64,
}

/// Everything needed to turn a candidate into the portion it would be served as.
pub struct RankContext<'a> {
    pub calculator: &'a NutritionCalculator<'a>,
    pub resolver: &'a SubstitutionResolver<'a>,
    pub allow_substitutions: bool,
}

/// Macro distance of a template from the target split at base scale.
///
/// Computed on the lines left after substitution, so a swapped ingredient
/// counts with its replacement's macros. Mean absolute percentage-point
/// difference over protein, fat and carbs. Templates with no computable
/// nutrition rank last.
pub fn macro_distance(template: &MealTemplate, ctx: &RankContext, target: &MacroSplit) -> f64 {
    let resolved = ctx.resolver.resolve(&template.ingredients, ctx.allow_substitutions);
    let nutrition = ctx
        .calculator
        .breakdown(&resolved.lines, &template.cooking_method, 1.0)
        .map(|b| b.totals)
        .unwrap_or_default();
    if nutrition.is_zero() {
        return f64::INFINITY;
    }
    nutrition.macro_split().mean_abs_diff(target)
}

/// Rank candidates by macro distance ascending, with a flat bonus subtracted
/// for cuisines not yet used today. Ties keep filter order.
pub fn rank_templates<'t>(
    candidates: &[&'t MealTemplate],
    ctx: &RankContext,
    target: &MacroSplit,
    used_cuisines: &HashSet<String>,
    novelty_bonus: f64,
) -> Vec<RankedTemplate<'t>> {
    let mut ranked: Vec<RankedTemplate> = candidates
        .iter()
        .map(|&template| {
            let mut distance = macro_distance(template, ctx, target);
            if !used_cuisines.contains(&template.cuisine.to_lowercase()) {
                distance -= novelty_bonus;
            }
            RankedTemplate { template, distance }
        })
        .collect();

    ranked.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NutritionCatalog;
    use crate::models::{DietProfile, Ingredient, IngredientLine, Nutrition};

    fn catalog() -> NutritionCatalog {
        NutritionCatalog::new()
            .with_ingredient(
                Ingredient::new("chicken", "Chicken", "protein", Nutrition::new(165.0, 31.0, 3.6, 0.0))
                    .unwrap(),
            )
            .with_ingredient(
                Ingredient::new("rice", "Rice", "grains", Nutrition::new(130.0, 2.7, 0.3, 28.0)).unwrap(),
            )
    }

    fn balanced() -> DietProfile {
        DietProfile::new("balanced", "Balanced", MacroSplit::new(30.0, 30.0, 40.0)).unwrap()
    }

    fn template(id: &str, lines: Vec<IngredientLine>, cuisine: &str) -> MealTemplate {
        MealTemplate::new(id, id, "lunch", lines).unwrap().with_cuisine(cuisine)
    }

    #[test]
    fn test_closest_split_first() {
        let catalog = catalog();
        let calc = NutritionCalculator::new(&catalog);
        let diet = balanced();
        let resolver = SubstitutionResolver::new(&catalog, &diet, &[]);
        let ctx = RankContext {
            calculator: &calc,
            resolver: &resolver,
            allow_substitutions: true,
        };
        let templates = vec![
            template("rice", vec![IngredientLine::new("rice", 200.0, "g")], "standard"),
            template(
                "bowl",
                vec![
                    IngredientLine::new("chicken", 150.0, "g"),
                    IngredientLine::new("rice", 200.0, "g"),
                ],
                "standard",
            ),
        ];
        let refs: Vec<&MealTemplate> = templates.iter().collect();
        let target = MacroSplit::new(35.0, 15.0, 50.0);

        let ranked = rank_templates(&refs, &ctx, &target, &HashSet::new(), 5.0);
        assert_eq!(ranked[0].template.id, "bowl");
    }

    #[test]
    fn test_novelty_bonus() {
        let catalog = catalog();
        let calc = NutritionCalculator::new(&catalog);
        let diet = balanced();
        let resolver = SubstitutionResolver::new(&catalog, &diet, &[]);
        let ctx = RankContext {
            calculator: &calc,
            resolver: &resolver,
            allow_substitutions: true,
        };
        let lines = || vec![IngredientLine::new("chicken", 100.0, "g")];
        let templates = vec![template("a", lines(), "italian"), template("b", lines(), "mexican")];
        let refs: Vec<&MealTemplate> = templates.iter().collect();
        let target = MacroSplit::new(30.0, 30.0, 40.0);
        let used: HashSet<String> = ["italian".to_string()].into_iter().collect();

        let ranked = rank_templates(&refs, &ctx, &target, &used, 5.0);
        assert_eq!(ranked[0].template.id, "b");
        assert!((ranked[1].distance - ranked[0].distance - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_ingredients_rank_last() {
        let catalog = catalog();
        let calc = NutritionCalculator::new(&catalog);
        let diet = balanced();
        let resolver = SubstitutionResolver::new(&catalog, &diet, &[]);
        let ctx = RankContext {
            calculator: &calc,
            resolver: &resolver,
            allow_substitutions: true,
        };
        let templates = vec![
            template("ghost", vec![IngredientLine::new("ghost", 100.0, "g")], "standard"),
            template("rice", vec![IngredientLine::new("rice", 100.0, "g")], "standard"),
        ];
        let refs: Vec<&MealTemplate> = templates.iter().collect();
        let ranked = rank_templates(&refs, &ctx, &MacroSplit::new(30.0, 30.0, 40.0), &HashSet::new(), 5.0);
        assert_eq!(ranked[0].template.id, "rice");
        assert!(ranked[1].distance.is_infinite());
    }

    #[test]
    fn test_ranks_on_substituted_lines() {
        let catalog = catalog()
            .with_ingredient(
                Ingredient::new("lard", "Lard", "oils", Nutrition::new(900.0, 0.0, 100.0, 0.0)).unwrap(),
            )
            .with_substitutes("rice", &["lard"]);
        let calc = NutritionCalculator::new(&catalog);
        let diet = balanced().with_banned(&["rice"]);
        let resolver = SubstitutionResolver::new(&catalog, &diet, &[]);
        let ctx = RankContext {
            calculator: &calc,
            resolver: &resolver,
            allow_substitutions: true,
        };
        let templates = vec![
            template("starchy", vec![IngredientLine::new("rice", 200.0, "g")], "standard"),
            template("lean", vec![IngredientLine::new("chicken", 150.0, "g")], "standard"),
        ];
        let refs: Vec<&MealTemplate> = templates.iter().collect();

        // Served with lard in place of rice, "starchy" is pure fat.
        let target = MacroSplit::new(10.0, 5.0, 85.0);
        let ranked = rank_templates(&refs, &ctx, &target, &HashSet::new(), 0.0);
        assert_eq!(ranked[0].template.id, "lean");
        assert!((ranked[1].distance - 190.0 / 3.0).abs() < 1e-6);
    }
}
