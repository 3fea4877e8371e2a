//! Runtime-tunable planner settings.
//!
//! Every field defaults to the matching constant in [`crate::planner::constants`];
//! a JSON file only needs to name the values it overrides.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::Season;
use crate::error::{PlannerError, Result};
use crate::planner::constants::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub calorie_weight: f64,
    pub macro_weight: f64,
    pub accept_score: f64,
    pub converge_score: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            calorie_weight: CALORIE_WEIGHT,
            macro_weight: MACRO_WEIGHT,
            accept_score: ACCEPT_SCORE,
            converge_score: CONVERGE_SCORE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    pub min: f64,
    pub max: f64,
    pub max_iterations: usize,
    pub stagnation_rounds: usize,
    pub learning_rate: f64,
    pub momentum: f64,
    pub diff_step: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            min: SCALE_MIN,
            max: SCALE_MAX,
            max_iterations: SCALE_MAX_ITERATIONS,
            stagnation_rounds: SCALE_STAGNATION_ROUNDS,
            learning_rate: SCALE_LEARNING_RATE,
            momentum: SCALE_MOMENTUM,
            diff_step: SCALE_DIFF_STEP,
        }
    }
}

impl ScaleConfig {
    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinerConfig {
    pub local_iterations: usize,
    pub local_step: f64,
    pub local_bounds: (f64, f64),
    pub rebalance_iterations: usize,
    pub rebalance_sigma: f64,
    pub rebalance_bounds: (f64, f64),
}

impl Default for RefinerConfig {
    fn default() -> Self {
        Self {
            local_iterations: LOCAL_SEARCH_ITERATIONS,
            local_step: LOCAL_SEARCH_STEP,
            local_bounds: LOCAL_SEARCH_BOUNDS,
            rebalance_iterations: REBALANCE_ITERATIONS,
            rebalance_sigma: REBALANCE_SIGMA,
            rebalance_bounds: REBALANCE_BOUNDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub cooldown_days: u32,
    pub min_recency_candidates: usize,
    pub min_cooldown_days: u32,
    pub min_cuisine_candidates: usize,
    pub min_method_candidates: usize,
    pub cuisine_novelty_bonus: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            cooldown_days: COOLDOWN_DAYS,
            min_recency_candidates: MIN_RECENCY_CANDIDATES,
            min_cooldown_days: MIN_COOLDOWN_DAYS,
            min_cuisine_candidates: MIN_CUISINE_CANDIDATES,
            min_method_candidates: MIN_METHOD_CANDIDATES,
            cuisine_novelty_bonus: CUISINE_NOVELTY_BONUS,
        }
    }
}

/// Gram ranges a single meal's macros must fall in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortionBounds {
    pub protein: (f64, f64),
    pub carbs: (f64, f64),
    pub fat: (f64, f64),
}

impl Default for PortionBounds {
    fn default() -> Self {
        Self {
            protein: PROTEIN_BOUNDS,
            carbs: CARB_BOUNDS,
            fat: FAT_BOUNDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShoppingConfig {
    pub default_ceiling_grams: f64,
    /// Category -> ceiling override in grams.
    pub category_ceilings: HashMap<String, f64>,
}

impl Default for ShoppingConfig {
    fn default() -> Self {
        let mut category_ceilings = HashMap::new();
        category_ceilings.insert("spices".to_string(), 250.0);
        category_ceilings.insert("oils".to_string(), 1000.0);
        Self {
            default_ceiling_grams: SHOPPING_CEILING_GRAMS,
            category_ceilings,
        }
    }
}

impl ShoppingConfig {
    pub fn ceiling_for(&self, category: &str) -> f64 {
        self.category_ceilings
            .get(category)
            .copied()
            .unwrap_or(self.default_ceiling_grams)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub score: ScoreConfig,
    pub scale: ScaleConfig,
    pub refiner: RefinerConfig,
    pub filters: FilterConfig,
    pub portions: PortionBounds,
    pub shopping: ShoppingConfig,
    pub max_day_attempts: usize,
    pub candidates_per_slot: usize,
    /// Seed for the planner's random source; entropy when unset.
    pub seed: Option<u64>,
    /// Season used for ingredient affinity; no seasonal reordering when unset.
    pub season: Option<Season>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            score: ScoreConfig::default(),
            scale: ScaleConfig::default(),
            refiner: RefinerConfig::default(),
            filters: FilterConfig::default(),
            portions: PortionBounds::default(),
            shopping: ShoppingConfig::default(),
            max_day_attempts: MAX_DAY_ATTEMPTS,
            candidates_per_slot: CANDIDATES_PER_SLOT,
            seed: None,
            season: None,
        }
    }
}

fn invalid(field: &str, reason: impl std::fmt::Display) -> PlannerError {
    PlannerError::InvalidInput(format!("config {}: {}", field, reason))
}

fn check_range(field: &str, (lo, hi): (f64, f64)) -> Result<()> {
    if !(lo.is_finite() && hi.is_finite()) || lo > hi {
        return Err(invalid(field, format!("invalid range [{}, {}]", lo, hi)));
    }
    Ok(())
}

/// Factor bounds must be positive and admit the unchanged factor 1.0.
fn check_factor_bounds(field: &str, bounds: (f64, f64)) -> Result<()> {
    check_range(field, bounds)?;
    if bounds.0 <= 0.0 || bounds.0 > 1.0 || bounds.1 < 1.0 {
        return Err(invalid(field, "must satisfy 0 < min <= 1 <= max"));
    }
    Ok(())
}

fn check_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(field, format!("must be finite and non-negative, got {}", value)));
    }
    Ok(())
}

impl PlannerConfig {
    /// Reject settings the planner cannot run with, such as inverted bounds.
    pub fn validate(&self) -> Result<()> {
        let score = &self.score;
        check_non_negative("score.calorie_weight", score.calorie_weight)?;
        check_non_negative("score.macro_weight", score.macro_weight)?;
        check_range("score thresholds", (0.0, score.accept_score))?;
        check_range("score thresholds", (0.0, score.converge_score))?;

        let scale = &self.scale;
        check_range("scale bounds", (scale.min, scale.max))?;
        if scale.min <= 0.0 {
            return Err(invalid("scale.min", "must be positive"));
        }
        if !(scale.learning_rate.is_finite() && scale.learning_rate > 0.0) {
            return Err(invalid("scale.learning_rate", "must be positive"));
        }
        if !(0.0..1.0).contains(&scale.momentum) {
            return Err(invalid("scale.momentum", "must be in [0, 1)"));
        }
        if !(scale.diff_step.is_finite() && scale.diff_step > 0.0) {
            return Err(invalid("scale.diff_step", "must be positive"));
        }

        let refiner = &self.refiner;
        check_non_negative("refiner.local_step", refiner.local_step)?;
        check_non_negative("refiner.rebalance_sigma", refiner.rebalance_sigma)?;
        check_factor_bounds("refiner.local_bounds", refiner.local_bounds)?;
        check_factor_bounds("refiner.rebalance_bounds", refiner.rebalance_bounds)?;

        check_range("portions.protein", self.portions.protein)?;
        check_range("portions.carbs", self.portions.carbs)?;
        check_range("portions.fat", self.portions.fat)?;

        check_non_negative("filters.cuisine_novelty_bonus", self.filters.cuisine_novelty_bonus)?;
        check_non_negative("shopping.default_ceiling_grams", self.shopping.default_ceiling_grams)?;
        for (category, ceiling) in &self.shopping.category_ceilings {
            check_non_negative(&format!("shopping ceiling for '{}'", category), *ceiling)?;
        }

        if self.candidates_per_slot == 0 {
            return Err(invalid("candidates_per_slot", "must be at least 1"));
        }
        Ok(())
    }
}

/// Load and validate a planner config from JSON. Missing fields keep their defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PlannerConfig> {
    let content = fs::read_to_string(path)?;
    let config: PlannerConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
