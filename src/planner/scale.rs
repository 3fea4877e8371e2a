//! Meal scale optimizer: momentum gradient ascent on the nutrition score.

use tracing::debug;

use crate::config::{ScaleConfig, ScoreConfig};
use crate::models::IngredientLine;
use crate::planner::constants::{
    SCALE_MIN_PROGRESS, SCALE_PROGRESS_WINDOW, SCALE_RATE_BOOST, SCALE_RATE_CEILING,
};
use crate::planner::nutrition::NutritionCalculator;
use crate::planner::scoring::{NutritionTarget, nutrition_score};

/// Best scale found for one recipe and the score it reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleOutcome {
    pub scale: f64,
    pub score: f64,
    pub iterations: usize,
    pub converged: bool,
}

impl ScaleOutcome {
    fn unscaled() -> Self {
        Self {
            scale: 1.0,
            score: 0.0,
            iterations: 0,
            converged: false,
        }
    }
}

/// Find the scale factor for `lines` that maximizes the nutrition score
/// against `target`.
///
/// Starts from `target calories / base calories`, then follows a
/// finite-difference gradient with momentum. The step rate halves after a
/// failed step and is boosted when progress stalls. Every scale tried stays
/// within the configured bounds; 1.0 is returned if the recipe has no
/// computable nutrition.
pub fn optimize_scale(
    calculator: &NutritionCalculator,
    lines: &[IngredientLine],
    cooking_method: &str,
    target: &NutritionTarget,
    config: &ScaleConfig,
    weights: &ScoreConfig,
) -> ScaleOutcome {
    let evaluate = |scale: f64| {
        calculator
            .breakdown(lines, cooking_method, scale)
            .map(|b| nutrition_score(&b.totals, target, weights))
            .unwrap_or(0.0)
    };

    let base_calories = match calculator.breakdown(lines, cooking_method, 1.0) {
        Ok(b) if b.totals.calories > 0.0 => b.totals.calories,
        _ => return ScaleOutcome::unscaled(),
    };
    let start = target.calories / base_calories;
    if !start.is_finite() || start <= 0.0 {
        return ScaleOutcome::unscaled();
    }

    let mut scale = config.clamp(start);
    let initial_score = evaluate(scale);
    let mut best_scale = scale;
    let mut best_score = f64::NEG_INFINITY;
    let mut previous_score = f64::NEG_INFINITY;
    let mut learning_rate = config.learning_rate;
    let mut velocity = 0.0;
    let mut stale_rounds = 0;
    let mut iterations = 0;

    for round in 0..config.max_iterations {
        iterations += 1;
        let score = evaluate(scale);

        if score > best_score {
            best_score = score;
            best_scale = scale;
            stale_rounds = 0;
        } else {
            stale_rounds += 1;
        }
        if best_score >= weights.converge_score || stale_rounds >= config.stagnation_rounds {
            break;
        }

        if round > 0 && score <= previous_score {
            learning_rate *= 0.5;
            velocity = 0.0;
            scale = best_scale;
        }
        if (round + 1) % SCALE_PROGRESS_WINDOW == 0 && best_score - initial_score < SCALE_MIN_PROGRESS {
            learning_rate = (learning_rate * SCALE_RATE_BOOST).min(SCALE_RATE_CEILING);
        }
        previous_score = score;

        let h = scale * config.diff_step;
        let up = config.clamp(scale + h);
        let down = config.clamp(scale - h);
        let gradient = if up > down {
            (evaluate(up) - evaluate(down)) / (up - down)
        } else {
            0.0
        };

        // Score points per 100% scale change, bounded to one full step.
        let step = (gradient * scale / 100.0).clamp(-1.0, 1.0);
        velocity = config.momentum * velocity + learning_rate * step;
        scale = config.clamp(scale * (1.0 + velocity));
    }

    if !best_score.is_finite() {
        best_score = initial_score;
    }
    if !best_scale.is_finite() {
        return ScaleOutcome::unscaled();
    }

    debug!(
        scale = best_scale,
        score = best_score,
        iterations,
        "scale search finished"
    );
    ScaleOutcome {
        scale: best_scale,
        score: best_score,
        iterations,
        converged: best_score >= weights.converge_score,
    }
}
