use tracing::{debug, warn};

use crate::catalog::NutritionCatalog;
use crate::models::{DietProfile, IngredientLine};

/// Lines after substitution, with counts of what changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedLines {
    pub lines: Vec<IngredientLine>,
    pub substituted: u64,
    pub dropped: u64,
}

/// Replaces ingredients a diet or restriction forbids.
#[derive(Debug, Clone, Copy)]
pub struct SubstitutionResolver<'a> {
    catalog: &'a NutritionCatalog,
    diet: &'a DietProfile,
    restrictions: &'a [String],
}

impl<'a> SubstitutionResolver<'a> {
    pub fn new(catalog: &'a NutritionCatalog, diet: &'a DietProfile, restrictions: &'a [String]) -> Self {
        Self {
            catalog,
            diet,
            restrictions,
        }
    }

    /// True if neither the diet nor any active restriction bans the ingredient.
    pub fn is_allowed(&self, ingredient_id: &str) -> bool {
        !self.diet.bans(ingredient_id) && !self.catalog.restricted(ingredient_id, self.restrictions)
    }

    /// First catalog-listed substitute that exists and is itself allowed.
    pub fn find_substitute(&self, ingredient_id: &str) -> Option<&'a str> {
        self.catalog
            .substitutes_for(ingredient_id)
            .iter()
            .map(String::as_str)
            .find(|candidate| self.catalog.ingredient(candidate).is_some() && self.is_allowed(candidate))
    }

    /// True if every disallowed line has a qualifying substitute.
    pub fn can_repair(&self, lines: &[IngredientLine]) -> bool {
        lines
            .iter()
            .filter(|l| !self.is_allowed(&l.ingredient_id))
            .all(|l| self.find_substitute(&l.ingredient_id).is_some())
    }

    /// Swap disallowed lines for substitutes, dropping those with none.
    ///
    /// With `allow_substitutions` off every disallowed line is dropped.
    pub fn resolve(&self, lines: &[IngredientLine], allow_substitutions: bool) -> ResolvedLines {
        let mut resolved = ResolvedLines::default();
        for line in lines {
            if self.is_allowed(&line.ingredient_id) {
                resolved.lines.push(line.clone());
                continue;
            }

            let substitute = if allow_substitutions {
                self.find_substitute(&line.ingredient_id)
            } else {
                None
            };
            match substitute {
                Some(id) => {
                    debug!(from = %line.ingredient_id, to = id, "substituted ingredient");
                    resolved.lines.push(IngredientLine {
                        ingredient_id: id.to_string(),
                        amount: line.amount,
                        unit: line.unit.clone(),
                        substituted_for: Some(line.ingredient_id.clone()),
                    });
                    resolved.substituted += 1;
                }
                None => {
                    warn!(ingredient = %line.ingredient_id, "no qualifying substitute, dropping ingredient");
                    resolved.dropped += 1;
                }
            }
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ingredient, MacroSplit, Nutrition};

    fn catalog() -> NutritionCatalog {
        let n = Nutrition::new(250.0, 9.0, 3.0, 48.0);
        NutritionCatalog::new()
            .with_ingredient(Ingredient::new("bread", "Bread", "grains", n).unwrap())
            .with_ingredient(Ingredient::new("rye_bread", "Rye Bread", "grains", n).unwrap())
            .with_ingredient(Ingredient::new("gf_bread", "Gluten-free Bread", "grains", n).unwrap())
            .with_ingredient(Ingredient::new("butter", "Butter", "dairy", Nutrition::new(717.0, 0.9, 81.0, 0.1)).unwrap())
            .with_allergen("gluten", &["bread", "rye_bread"])
            .with_substitutes("bread", &["missing_bread", "rye_bread", "gf_bread"])
    }

    fn diet() -> DietProfile {
        DietProfile::new("balanced", "Balanced", MacroSplit::new(30.0, 30.0, 40.0)).unwrap()
    }

    #[test]
    fn test_skips_missing_and_restricted_candidates() {
        let catalog = catalog();
        let diet = diet();
        let restrictions = vec!["gluten".to_string()];
        let resolver = SubstitutionResolver::new(&catalog, &diet, &restrictions);
        assert_eq!(resolver.find_substitute("bread"), Some("gf_bread"));
    }

    #[test]
    fn test_diet_ban_applies_to_candidates() {
        let catalog = catalog();
        let diet = diet().with_banned(&["gf_bread"]);
        let restrictions = vec!["gluten".to_string()];
        let resolver = SubstitutionResolver::new(&catalog, &diet, &restrictions);
        assert_eq!(resolver.find_substitute("bread"), None);
    }

    #[test]
    fn test_resolve_substitutes_and_drops() {
        let catalog = catalog();
        let diet = diet().with_banned(&["butter"]);
        let restrictions = vec!["gluten".to_string()];
        let resolver = SubstitutionResolver::new(&catalog, &diet, &restrictions);

        let lines = vec![
            IngredientLine::new("bread", 2.0, "slice"),
            IngredientLine::new("butter", 10.0, "g"),
        ];
        assert!(!resolver.can_repair(&lines));

        let resolved = resolver.resolve(&lines, true);
        assert_eq!(resolved.substituted, 1);
        assert_eq!(resolved.dropped, 1);
        assert_eq!(resolved.lines.len(), 1);
        assert_eq!(resolved.lines[0].ingredient_id, "gf_bread");
        assert_eq!(resolved.lines[0].substituted_for.as_deref(), Some("bread"));
        assert_eq!(resolved.lines[0].amount, 2.0);
    }

    #[test]
    fn test_resolve_without_substitutions_drops() {
        let catalog = catalog();
        let diet = diet();
        let restrictions = vec!["gluten".to_string()];
        let resolver = SubstitutionResolver::new(&catalog, &diet, &restrictions);
        let resolved = resolver.resolve(&[IngredientLine::new("bread", 50.0, "g")], false);
        assert!(resolved.lines.is_empty());
        assert_eq!(resolved.dropped, 1);
    }
}
