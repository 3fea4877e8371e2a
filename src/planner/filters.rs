//! Template filter pipeline for a single meal slot.
//!
//! Stages, in order:
//! 1. Diet compatibility (tags and banned ingredients)
//! 2. Allergen/restriction exclusion
//! 3. Recency-based variety with adaptive cooldown relaxation
//! 4. Cuisine preference with "standard" backfill
//! 5. Cooking-method preference
//! 6. Seasonal and learned-preference reordering
//!
//! Stages 1-2 are hard constraints and may empty the list. Stages 3-6 never
//! empty a non-empty list.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::debug;

use crate::catalog::{NutritionCatalog, Season};
use crate::config::FilterConfig;
use crate::models::{DietProfile, MealTemplate, Preferences};
use crate::planner::constants::STANDARD_TAG;
use crate::planner::substitution::SubstitutionResolver;
use crate::state::{MealHistory, PreferenceStats};

/// Keep templates tagged for the diet whose banned ingredients (if any) can be repaired.
pub fn filter_by_diet<'t>(
    templates: &[&'t MealTemplate],
    diet: &DietProfile,
    repair: Option<&SubstitutionResolver>,
) -> Vec<&'t MealTemplate> {
    templates
        .iter()
        .copied()
        .filter(|t| diet.is_unrestricted() || t.tags.iter().any(|tag| diet.accepts_tag(tag)))
        .filter(|t| {
            t.ingredient_ids()
                .filter(|id| diet.bans(id))
                .all(|id| repair.is_some_and(|r| r.find_substitute(id).is_some()))
        })
        .collect()
}

/// Drop templates containing an ingredient any active restriction bans, unless repairable.
pub fn filter_by_restrictions<'t>(
    templates: &[&'t MealTemplate],
    catalog: &NutritionCatalog,
    restrictions: &[String],
    repair: Option<&SubstitutionResolver>,
) -> Vec<&'t MealTemplate> {
    if restrictions.is_empty() {
        return templates.to_vec();
    }
    templates
        .iter()
        .copied()
        .filter(|t| {
            t.ingredient_ids()
                .filter(|id| catalog.restricted(id, restrictions))
                .all(|id| repair.is_some_and(|r| r.find_substitute(id).is_some()))
        })
        .collect()
}

/// Exclude templates used within `cooldown_days`.
///
/// Relaxes the cooldown one day at a time while fewer than the minimum
/// survive; returns the input unchanged if nothing survives at all.
pub fn filter_by_recency<'t>(
    templates: &[&'t MealTemplate],
    history: &MealHistory,
    cooldown_days: u32,
    config: &FilterConfig,
) -> Vec<&'t MealTemplate> {
    let fresh: Vec<&MealTemplate> = templates
        .iter()
        .copied()
        .filter(|t| !history.is_cooling_down(&t.name, cooldown_days))
        .collect();

    if fresh.len() < config.min_recency_candidates && cooldown_days > config.min_cooldown_days {
        debug!(cooldown_days, survivors = fresh.len(), "relaxing variety cooldown");
        return filter_by_recency(templates, history, cooldown_days - 1, config);
    }
    if fresh.is_empty() {
        return templates.to_vec();
    }
    fresh
}

fn matches_cuisine(template: &MealTemplate, cuisine: &str) -> bool {
    template.cuisine.eq_ignore_ascii_case(cuisine)
        || template.has_tag(cuisine)
        || template
            .name
            .to_lowercase()
            .contains(&cuisine.to_lowercase())
}

fn is_standard(template: &MealTemplate) -> bool {
    template.has_tag(STANDARD_TAG) || template.cuisine.eq_ignore_ascii_case(STANDARD_TAG)
}

/// Keep preferred cuisines, backfilling with standard templates up to `min_candidates`.
pub fn filter_by_cuisine<'t>(
    templates: &[&'t MealTemplate],
    cuisines: &[String],
    all_cuisines: bool,
    min_candidates: usize,
) -> Vec<&'t MealTemplate> {
    if all_cuisines {
        return templates.to_vec();
    }

    let mut kept: Vec<&MealTemplate> = templates
        .iter()
        .copied()
        .filter(|t| cuisines.iter().any(|c| matches_cuisine(t, c)))
        .collect();

    if kept.len() < min_candidates {
        for template in templates.iter().copied().filter(|t| is_standard(t)) {
            if kept.len() >= min_candidates {
                break;
            }
            if !kept.iter().any(|k| k.id == template.id) {
                kept.push(template);
            }
        }
    }

    if kept.is_empty() {
        return templates.to_vec();
    }
    kept
}

/// Keep preferred cooking methods unless that leaves fewer than `min_candidates`.
pub fn filter_by_cooking_method<'t>(
    templates: &[&'t MealTemplate],
    methods: &[String],
    all_methods: bool,
    min_candidates: usize,
) -> Vec<&'t MealTemplate> {
    if all_methods {
        return templates.to_vec();
    }
    let kept: Vec<&MealTemplate> = templates
        .iter()
        .copied()
        .filter(|t| methods.iter().any(|m| t.cooking_method.eq_ignore_ascii_case(m)))
        .collect();
    if kept.len() < min_candidates {
        return templates.to_vec();
    }
    kept
}

/// Move in-season and historically successful templates earlier. Stable.
pub fn reorder_by_affinity<'t>(
    mut templates: Vec<&'t MealTemplate>,
    seasonal: &HashSet<&str>,
    stats: &PreferenceStats,
) -> Vec<&'t MealTemplate> {
    let in_season = |t: &MealTemplate| t.ingredient_ids().any(|id| seasonal.contains(id));
    templates.sort_by(|a, b| {
        in_season(b).cmp(&in_season(a)).then_with(|| {
            stats
                .score(&b.name)
                .partial_cmp(&stats.score(&a.name))
                .unwrap_or(Ordering::Equal)
        })
    });
    templates
}

/// Everything the pipeline consults for one planning call.
pub struct TemplateFilter<'a> {
    pub catalog: &'a NutritionCatalog,
    pub diet: &'a DietProfile,
    pub preferences: &'a Preferences,
    pub resolver: SubstitutionResolver<'a>,
    pub stats: &'a PreferenceStats,
    pub season: Option<Season>,
    pub config: &'a FilterConfig,
}

impl<'a> TemplateFilter<'a> {
    fn repair(&self) -> Option<&SubstitutionResolver<'a>> {
        self.preferences.allow_substitutions.then_some(&self.resolver)
    }

    /// Templates for the slot type that pass the diet filter.
    pub fn diet_compatible(&self, meal_type: &str) -> Vec<&'a MealTemplate> {
        let all = self.catalog.templates_for_slot(meal_type);
        filter_by_diet(&all, self.diet, self.repair())
    }

    /// Run the full pipeline. `checks` counts per-template constraint checks.
    pub fn candidates(
        &self,
        meal_type: &str,
        history: &MealHistory,
        checks: &mut u64,
    ) -> Vec<&'a MealTemplate> {
        let all = self.catalog.templates_for_slot(meal_type);
        if all.is_empty() {
            debug!(meal_type, "no templates for slot type");
            return Vec::new();
        }

        *checks += all.len() as u64;
        let diet_ok = filter_by_diet(&all, self.diet, self.repair());

        *checks += diet_ok.len() as u64;
        let allowed = filter_by_restrictions(
            &diet_ok,
            self.catalog,
            &self.preferences.restrictions,
            self.repair(),
        );
        if allowed.is_empty() {
            debug!(meal_type, "no template passes diet and restrictions");
            return Vec::new();
        }

        *checks += allowed.len() as u64;
        let fresh = filter_by_recency(&allowed, history, self.config.cooldown_days, self.config);

        *checks += fresh.len() as u64;
        let by_cuisine = filter_by_cuisine(
            &fresh,
            &self.preferences.cuisines,
            self.preferences.all_cuisines(),
            self.config.min_cuisine_candidates,
        );

        *checks += by_cuisine.len() as u64;
        let by_method = filter_by_cooking_method(
            &by_cuisine,
            &self.preferences.cooking_methods,
            self.preferences.all_cooking_methods(),
            self.config.min_method_candidates,
        );

        let seasonal = self
            .season
            .map(|s| self.catalog.seasonal_ingredients(s))
            .unwrap_or_default();
        let ordered = reorder_by_affinity(by_method, &seasonal, self.stats);

        debug!(
            meal_type,
            total = all.len(),
            survivors = ordered.len(),
            "filtered templates"
        );
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IngredientLine, MacroSplit};

    fn template(id: &str, ingredient: &str) -> MealTemplate {
        MealTemplate::new(id, id, "lunch", vec![IngredientLine::new(ingredient, 100.0, "g")]).unwrap()
    }

    fn refs(templates: &[MealTemplate]) -> Vec<&MealTemplate> {
        templates.iter().collect()
    }

    fn ids(templates: &[&MealTemplate]) -> Vec<String> {
        templates.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_diet_filter_tags_and_bans() {
        let templates = vec![
            template("a", "tofu").with_tags(&["vegan"]),
            template("b", "beef").with_tags(&["vegan"]),
            template("c", "tofu").with_tags(&["paleo"]),
        ];
        let diet = DietProfile::new("vegan", "Vegan", MacroSplit::new(20.0, 30.0, 50.0))
            .unwrap()
            .with_accepted_tags(&["vegan"])
            .with_banned(&["beef"]);

        let kept = filter_by_diet(&refs(&templates), &diet, None);
        assert_eq!(ids(&kept), vec!["a"]);
    }

    #[test]
    fn test_unrestricted_diet_accepts_any_tag() {
        let templates = vec![template("a", "tofu").with_tags(&["anything"])];
        let diet = DietProfile::new("balanced", "Balanced", MacroSplit::new(30.0, 30.0, 40.0)).unwrap();
        assert_eq!(filter_by_diet(&refs(&templates), &diet, None).len(), 1);
    }

    #[test]
    fn test_restriction_filter() {
        let templates = vec![template("a", "bread"), template("b", "rice")];
        let catalog = NutritionCatalog::new().with_allergen("gluten", &["bread"]);
        let kept = filter_by_restrictions(&refs(&templates), &catalog, &["gluten".to_string()], None);
        assert_eq!(ids(&kept), vec!["b"]);
    }

    #[test]
    fn test_recency_relaxes_cooldown() {
        let templates: Vec<MealTemplate> =
            ["a", "b", "c", "d"].iter().map(|id| template(id, "rice")).collect();
        let config = FilterConfig::default();

        let mut history = MealHistory::new();
        for (day, id) in ["a", "b", "c"].iter().enumerate() {
            history.set_current_day(day as u32);
            history.record(id);
        }
        history.set_current_day(5);

        // Cooldown 5 leaves "a" (5 days ago) and "d"; relaxing to 4 adds "b".
        let kept = filter_by_recency(&refs(&templates), &history, 5, &config);
        assert_eq!(ids(&kept), vec!["a", "b", "d"]);
    }

    #[test]
    fn test_recency_never_empties() {
        let templates = vec![template("a", "rice")];
        let mut history = MealHistory::new();
        history.record("a");
        let kept = filter_by_recency(&refs(&templates), &history, 5, &FilterConfig::default());
        assert_eq!(ids(&kept), vec!["a"]);
    }

    #[test]
    fn test_cuisine_backfills_with_standard() {
        let templates = vec![
            template("pasta", "pasta").with_cuisine("italian"),
            template("taco", "beef").with_cuisine("mexican"),
            template("plain", "rice").with_tags(&["standard"]),
            template("toast", "bread"),
        ];
        let kept = filter_by_cuisine(&refs(&templates), &["italian".to_string()], false, 5);
        // "toast" has the default "standard" cuisine and is backfilled too.
        assert_eq!(ids(&kept), vec!["pasta", "plain", "toast"]);

        let all = filter_by_cuisine(&refs(&templates), &[], true, 5);
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn test_cuisine_matches_name() {
        let templates = vec![template("Thai Curry", "rice").with_cuisine("asian")];
        let kept = filter_by_cuisine(&refs(&templates), &["thai".to_string()], false, 1);
        assert_eq!(kept.len(), 1);

        // Preferences loaded from JSON keep the caller's casing.
        let kept = filter_by_cuisine(&refs(&templates), &["Thai".to_string()], false, 1);
        assert_eq!(ids(&kept), vec!["Thai Curry"]);
    }

    #[test]
    fn test_cooking_method_skips_when_too_few() {
        let templates = vec![
            template("a", "rice").with_cooking_method("grilled"),
            template("b", "rice").with_cooking_method("baked"),
            template("c", "rice").with_cooking_method("baked"),
            template("d", "rice").with_cooking_method("baked"),
        ];
        let grilled = filter_by_cooking_method(&refs(&templates), &["grilled".to_string()], false, 3);
        assert_eq!(grilled.len(), 4);

        let baked = filter_by_cooking_method(&refs(&templates), &["baked".to_string()], false, 3);
        assert_eq!(ids(&baked), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_reorder_by_affinity() {
        let templates = vec![
            template("a", "rice"),
            template("b", "asparagus"),
            template("c", "rice"),
        ];
        let seasonal: HashSet<&str> = ["asparagus"].into_iter().collect();
        let mut stats = PreferenceStats::new();
        stats.record("c", 90.0);

        let ordered = reorder_by_affinity(refs(&templates), &seasonal, &stats);
        assert_eq!(ids(&ordered), vec!["b", "c", "a"]);
    }
}
