//! The meal planner: one instance per user/session.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::catalog::{NutritionCatalog, Season};
use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};
use crate::models::{AlgorithmMetrics, DayPlan, Preferences, WeekPlan};
use crate::planner::assembler::DayAssembler;
use crate::planner::filters::TemplateFilter;
use crate::planner::nutrition::NutritionCalculator;
use crate::planner::refiner::DayRefiner;
use crate::planner::scoring::NutritionTarget;
use crate::planner::substitution::SubstitutionResolver;
use crate::state::{MealHistory, PlannerState, PreferenceStats};

pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Generates day and week plans from an injected, read-only catalog.
///
/// Variety history and learned preference statistics are owned by the
/// instance; share them between sessions only through [`PlannerState`].
pub struct MealPlanner<'c, R = StdRng> {
    catalog: &'c NutritionCatalog,
    config: PlannerConfig,
    history: MealHistory,
    stats: PreferenceStats,
    season: Option<Season>,
    rng: R,
}

impl<'c> MealPlanner<'c, StdRng> {
    /// Planner seeded from `config.seed`, or from entropy when unset.
    pub fn new(catalog: &'c NutritionCatalog, config: PlannerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(catalog, config, rng)
    }
}

impl<'c, R: Rng> MealPlanner<'c, R> {
    pub fn with_rng(catalog: &'c NutritionCatalog, config: PlannerConfig, rng: R) -> Self {
        let season = config.season;
        Self {
            catalog,
            config,
            history: MealHistory::new(),
            stats: PreferenceStats::new(),
            season,
            rng,
        }
    }

    pub fn with_season(mut self, season: Season) -> Self {
        self.season = Some(season);
        self
    }

    /// Resume from previously saved history and statistics.
    pub fn with_state(mut self, state: PlannerState) -> Self {
        self.history = state.history;
        self.stats = state.stats;
        self
    }

    pub fn history(&self) -> &MealHistory {
        &self.history
    }

    pub fn stats(&self) -> &PreferenceStats {
        &self.stats
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Snapshot of history and statistics for persistence.
    pub fn state(&self) -> PlannerState {
        PlannerState {
            history: self.history.clone(),
            stats: self.stats.clone(),
        }
    }

    /// Plan one day on the planner's own history, then advance it a day.
    ///
    /// Fails only for an unknown diet or pattern id or invalid preferences;
    /// every other problem degrades into the returned plan and metrics.
    pub fn generate_day(&mut self, preferences: &Preferences) -> Result<(DayPlan, AlgorithmMetrics)> {
        let mut history = std::mem::take(&mut self.history);
        let result = self.plan_day(preferences, &mut history);
        self.history = history;
        result
    }

    /// Plan Monday to Sunday of `week_index` against a caller-owned history.
    ///
    /// Day `d` of the week is planned as absolute day `week_index * 7 + d`.
    pub fn generate_week(
        &mut self,
        preferences: &Preferences,
        week_index: u32,
        history: &mut MealHistory,
    ) -> Result<(WeekPlan, AlgorithmMetrics)> {
        let days = WEEKDAYS.len() as u32;
        let first_day = week_index
            .checked_mul(days)
            .filter(|first| first.checked_add(days).is_some())
            .ok_or_else(|| {
                PlannerError::InvalidInput(format!("week index {} is out of range", week_index))
            })?;

        let mut week = WeekPlan {
            week_index,
            days: Vec::with_capacity(WEEKDAYS.len()),
        };
        let mut metrics = AlgorithmMetrics::default();

        for (offset, day_name) in WEEKDAYS.iter().enumerate() {
            history.set_current_day(first_day + offset as u32);
            let (plan, day_metrics) = self.plan_day(preferences, history)?;
            metrics.merge(&day_metrics, offset);
            week.days.push((day_name.to_string(), plan));
        }

        info!(
            week_index,
            accuracy = metrics.final_accuracy,
            fallbacks = metrics.fallbacks,
            "planned week"
        );
        Ok((week, metrics))
    }

    fn plan_day(
        &mut self,
        preferences: &Preferences,
        history: &mut MealHistory,
    ) -> Result<(DayPlan, AlgorithmMetrics)> {
        preferences.validate()?;
        self.config.validate()?;
        let catalog = self.catalog;
        let diet = catalog
            .diet(&preferences.diet_id)
            .ok_or_else(|| PlannerError::UnknownDiet(preferences.diet_id.clone()))?;
        let pattern = catalog
            .pattern(&preferences.pattern_id)
            .ok_or_else(|| PlannerError::UnknownPattern(preferences.pattern_id.clone()))?;

        let target = NutritionTarget::new(preferences.target_calories, diet.macros);
        let calculator = NutritionCalculator::new(catalog)
            .with_scale_bounds(self.config.scale.min, self.config.scale.max);
        let filter = TemplateFilter {
            catalog,
            diet,
            preferences,
            resolver: SubstitutionResolver::new(catalog, diet, &preferences.restrictions),
            stats: &self.stats,
            season: self.season,
            config: &self.config.filters,
        };

        let mut metrics = AlgorithmMetrics::default();
        let assembler = DayAssembler::new(filter, calculator, pattern, target, &self.config);
        let day = assembler.assemble(history, &mut self.rng, &mut metrics);

        let mut plan = day.plan;
        let refiner = DayRefiner::new(
            &self.config.refiner,
            &self.config.score,
            (self.config.scale.min, self.config.scale.max),
        );
        let outcome = refiner.refine(&mut plan, &target, &mut self.rng);
        metrics.iterations += outcome.iterations;
        metrics.final_accuracy = outcome.score;
        metrics.convergence_achieved = outcome.score >= self.config.score.accept_score;

        for (meal, score) in plan.meals().iter().zip(&day.slot_scores) {
            if !meal.is_fallback {
                self.stats.record(&meal.name, *score);
            }
        }
        *history = day.history;
        history.advance_day();

        info!(
            diet = %diet.id,
            pattern = %pattern.id,
            attempts = day.attempts,
            score = outcome.score,
            fallback = metrics.fallback_used,
            "planned day"
        );
        Ok((plan, metrics))
    }
}
