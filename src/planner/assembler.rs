//! Day assembler: fills every slot of a pattern, retrying whole days until
//! the day's nutrition score is acceptable or the attempt cap is reached.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::config::PlannerConfig;
use crate::models::{
    AlgorithmMetrics, DayPlan, DietRules, GeneratedMeal, MealPattern, MealSlot, MealTemplate,
    Nutrition,
};
use crate::planner::fallback::fallback_meal;
use crate::planner::filters::TemplateFilter;
use crate::planner::nutrition::{MealBreakdown, NutritionCalculator};
use crate::planner::ranking::{RankContext, rank_templates};
use crate::planner::scale::optimize_scale;
use crate::planner::scoring::{NutritionTarget, nutrition_score};
use crate::state::MealHistory;

/// Turn a template and its computed breakdown into a meal for `slot`.
pub fn build_meal(
    slot: &MealSlot,
    template: &MealTemplate,
    breakdown: MealBreakdown,
    scale: f64,
    is_fallback: bool,
) -> GeneratedMeal {
    GeneratedMeal {
        slot: slot.name.clone(),
        template_id: template.id.clone(),
        name: template.name.clone(),
        meal_type: slot.meal_type().to_string(),
        ingredients: breakdown.ingredients,
        nutrition: breakdown.totals,
        cuisine: template.cuisine.clone(),
        cooking_method: template.cooking_method.clone(),
        prep_time_minutes: template.prep_time_minutes,
        scale,
        is_fallback,
    }
}

/// Outcome of one assembled day, before refinement.
#[derive(Debug, Clone)]
pub struct AssembledDay {
    pub plan: DayPlan,
    /// Nutrition score of the whole day.
    pub score: f64,
    /// Score of each meal against its slot target, in slot order.
    pub slot_scores: Vec<f64>,
    /// History including this day's meals, to commit on acceptance.
    pub history: MealHistory,
    pub attempts: usize,
}

struct SlotChoice {
    meal: GeneratedMeal,
    score: f64,
    dropped: u64,
}

pub struct DayAssembler<'a> {
    filter: TemplateFilter<'a>,
    calculator: NutritionCalculator<'a>,
    pattern: &'a MealPattern,
    target: NutritionTarget,
    config: &'a PlannerConfig,
}

impl<'a> DayAssembler<'a> {
    pub fn new(
        filter: TemplateFilter<'a>,
        calculator: NutritionCalculator<'a>,
        pattern: &'a MealPattern,
        target: NutritionTarget,
        config: &'a PlannerConfig,
    ) -> Self {
        Self {
            filter,
            calculator,
            pattern,
            target,
            config,
        }
    }

    /// Assemble days until one scores at least the acceptance threshold.
    ///
    /// The last attempt is returned as-is once the attempt cap is reached.
    pub fn assemble<R: Rng>(
        &self,
        history: &MealHistory,
        rng: &mut R,
        metrics: &mut AlgorithmMetrics,
    ) -> AssembledDay {
        let max_attempts = self.config.max_day_attempts.max(1);
        let mut attempt = 1;
        loop {
            metrics.day_attempts += 1;
            let day = self.assemble_once(attempt, history, rng, metrics);

            if day.score >= self.config.score.accept_score {
                info!(attempt, score = day.score, "accepted day");
                return day;
            }
            if attempt >= max_attempts {
                info!(attempt, score = day.score, "attempt limit reached, keeping last day");
                return day;
            }
            debug!(attempt, score = day.score, "retrying day");
            attempt += 1;
        }
    }

    fn assemble_once<R: Rng>(
        &self,
        attempt: usize,
        history: &MealHistory,
        rng: &mut R,
        metrics: &mut AlgorithmMetrics,
    ) -> AssembledDay {
        let mut scratch = history.clone();
        let mut used_cuisines: HashSet<String> = HashSet::new();
        let mut meals = Vec::with_capacity(self.pattern.slots.len());
        let mut slot_scores = Vec::with_capacity(self.pattern.slots.len());

        for slot in &self.pattern.slots {
            let slot_target = self.target.share(slot.calorie_share);
            let candidates = self.filter.candidates(
                slot.meal_type(),
                &scratch,
                &mut metrics.constraints_checked,
            );

            let shuffle = attempt > 1;
            let choice = self.choose(
                slot,
                &candidates,
                &slot_target,
                &used_cuisines,
                shuffle,
                rng,
                metrics,
            );
            let (meal, score) = match choice {
                Some(choice) => {
                    metrics.substitutions_made += choice
                        .meal
                        .ingredients
                        .iter()
                        .filter(|i| i.substituted_for.is_some())
                        .count() as u64;
                    metrics.ingredients_dropped += choice.dropped;
                    (choice.meal, choice.score)
                }
                None => {
                    let compatible = self.filter.diet_compatible(slot.meal_type());
                    let meal = fallback_meal(
                        slot,
                        &compatible,
                        &self.filter.resolver,
                        &self.calculator,
                        self.filter.preferences.allow_substitutions,
                        metrics,
                    );
                    let score = nutrition_score(&meal.nutrition, &slot_target, &self.config.score);
                    (meal, score)
                }
            };

            used_cuisines.insert(meal.cuisine.to_lowercase());
            scratch.record(&meal.name);
            slot_scores.push(score);
            meals.push(meal);
        }

        let plan = DayPlan::new(meals);
        let score = nutrition_score(&plan.totals(), &self.target, &self.config.score);
        AssembledDay {
            plan,
            score,
            slot_scores,
            history: scratch,
            attempts: attempt,
        }
    }

    /// Best-scoring ranked candidate that passes the portion checks.
    #[allow(clippy::too_many_arguments)]
    fn choose<R: Rng>(
        &self,
        slot: &MealSlot,
        candidates: &[&'a MealTemplate],
        target: &NutritionTarget,
        used_cuisines: &HashSet<String>,
        shuffle: bool,
        rng: &mut R,
        metrics: &mut AlgorithmMetrics,
    ) -> Option<SlotChoice> {
        if candidates.is_empty() {
            return None;
        }

        let per_slot = self.config.candidates_per_slot;
        let ctx = RankContext {
            calculator: &self.calculator,
            resolver: &self.filter.resolver,
            allow_substitutions: self.filter.preferences.allow_substitutions,
        };
        let mut ranked = rank_templates(
            candidates,
            &ctx,
            &target.macros,
            used_cuisines,
            self.config.filters.cuisine_novelty_bonus,
        );
        if shuffle {
            let head = ranked.len().min(per_slot * 2);
            ranked[..head].shuffle(rng);
        }

        let mut best: Option<SlotChoice> = None;
        for candidate in ranked.iter().take(per_slot) {
            metrics.templates_evaluated += 1;
            let template = candidate.template;

            let resolved = self
                .filter
                .resolver
                .resolve(&template.ingredients, self.filter.preferences.allow_substitutions);
            if resolved.lines.is_empty() {
                continue;
            }

            let outcome = optimize_scale(
                &self.calculator,
                &resolved.lines,
                &template.cooking_method,
                target,
                &self.config.scale,
                &self.config.score,
            );
            metrics.iterations += outcome.iterations as u64;

            let breakdown = match self
                .calculator
                .breakdown(&resolved.lines, &template.cooking_method, outcome.scale)
            {
                Ok(b) => b,
                Err(e) => {
                    debug!(template = %template.id, error = %e, "scaled meal failed validation");
                    metrics.validation_errors += 1;
                    continue;
                }
            };
            if !self.portion_ok(&breakdown.totals) {
                debug!(template = %template.id, scale = outcome.scale, "portion outside sanity bounds");
                metrics.validation_errors += 1;
                continue;
            }

            if best.as_ref().is_none_or(|b| outcome.score > b.score) {
                best = Some(SlotChoice {
                    meal: build_meal(slot, template, breakdown, outcome.scale, false),
                    score: outcome.score,
                    dropped: resolved.dropped,
                });
            }
        }
        best
    }

    fn portion_ok(&self, n: &Nutrition) -> bool {
        let bounds = &self.config.portions;
        let within = |value: f64, (lo, hi): (f64, f64)| (lo..=hi).contains(&value);
        within(n.protein, bounds.protein)
            && within(n.carbs, bounds.carbs)
            && within(n.fat, bounds.fat)
            && rules_ok(&self.filter.diet.rules, n)
    }
}

fn rules_ok(rules: &DietRules, n: &Nutrition) -> bool {
    rules.min_protein_per_meal.is_none_or(|min| n.protein >= min)
        && rules.max_carbs_per_meal.is_none_or(|max| n.carbs <= max)
}
