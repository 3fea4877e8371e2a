//! Day refiner: two bounded random searches over per-meal portion factors.
//!
//! Pass A walks every meal's factor by up to ±5% per step and keeps the
//! configuration with the best nutrition score. Pass B perturbs all factors
//! jointly with Gaussian noise and keeps the vector with the smallest squared
//! error against the day's [calories, protein, fat, carbs] target. Pass B is
//! a hill-climb, not a least-squares solve.

use rand::Rng;
use rand_distr::StandardNormal;
use tracing::debug;

use crate::config::{RefinerConfig, ScoreConfig};
use crate::models::{DayPlan, Nutrition};
use crate::planner::scoring::{NutritionTarget, nutrition_score, squared_deviation};

/// Final score and iterations spent by [`DayRefiner::refine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefineOutcome {
    pub score: f64,
    pub iterations: u64,
}

pub struct DayRefiner<'a> {
    config: &'a RefinerConfig,
    weights: &'a ScoreConfig,
    scale_bounds: (f64, f64),
}

impl<'a> DayRefiner<'a> {
    pub fn new(config: &'a RefinerConfig, weights: &'a ScoreConfig, scale_bounds: (f64, f64)) -> Self {
        Self {
            config,
            weights,
            scale_bounds,
        }
    }

    /// Rescale the plan's non-fallback meals toward `target` in place.
    pub fn refine<R: Rng>(&self, plan: &mut DayPlan, target: &NutritionTarget, rng: &mut R) -> RefineOutcome {
        let adjustable: Vec<usize> = plan
            .meals()
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.is_fallback)
            .map(|(i, _)| i)
            .collect();
        if adjustable.is_empty() {
            return RefineOutcome {
                score: nutrition_score(&plan.totals(), target, self.weights),
                iterations: 0,
            };
        }

        let base: Vec<Nutrition> = plan.meals().iter().map(|m| m.nutrition).collect();
        let scales: Vec<f64> = plan.meals().iter().map(|m| m.scale).collect();
        let totals = |factors: &[f64]| -> Nutrition {
            base.iter().zip(factors).map(|(n, f)| n.scaled(*f)).sum()
        };
        // A meal's factor must also keep its overall scale within the template bounds.
        let limits = |(lo, hi): (f64, f64)| -> Vec<(f64, f64)> {
            scales
                .iter()
                .map(|s| (lo.max(self.scale_bounds.0 / s), hi.min(self.scale_bounds.1 / s)))
                .collect()
        };

        let mut iterations = 0;

        // Pass A: local scale search.
        let local_limits = limits(self.config.local_bounds);
        let mut best = vec![1.0; base.len()];
        let mut best_score = nutrition_score(&totals(&best), target, self.weights);
        if best_score < self.weights.converge_score {
            let mut current = best.clone();
            for _ in 0..self.config.local_iterations {
                iterations += 1;
                for &i in &adjustable {
                    let step = rng.gen_range(-self.config.local_step..=self.config.local_step);
                    let (lo, hi) = local_limits[i];
                    current[i] = (current[i] * (1.0 + step)).clamp(lo, hi);
                }
                let score = nutrition_score(&totals(&current), target, self.weights);
                if score > best_score {
                    best_score = score;
                    best.clone_from(&current);
                }
                if best_score >= self.weights.converge_score {
                    break;
                }
            }
        }
        debug!(score = best_score, "local scale search finished");

        // Pass B: joint rebalancing.
        let rebalance_limits = limits(self.config.rebalance_bounds);
        let goal = target.as_vector();
        for &i in &adjustable {
            let (lo, hi) = rebalance_limits[i];
            best[i] = best[i].clamp(lo, hi);
        }
        let mut best_error = squared_deviation(&totals(&best), &goal);
        for _ in 0..self.config.rebalance_iterations {
            iterations += 1;
            let mut candidate = best.clone();
            for &i in &adjustable {
                let noise: f64 = rng.sample(StandardNormal);
                let (lo, hi) = rebalance_limits[i];
                candidate[i] = (candidate[i] + noise * self.config.rebalance_sigma).clamp(lo, hi);
            }
            let error = squared_deviation(&totals(&candidate), &goal);
            if error < best_error {
                best_error = error;
                best = candidate;
            }
        }

        for &i in &adjustable {
            plan.meals_mut()[i].rescale(best[i]);
        }
        plan.recompute_totals();

        let score = nutrition_score(&plan.totals(), target, self.weights);
        debug!(score, error = best_error, iterations, "day refined");
        RefineOutcome { score, iterations }
    }
}
