use crate::config::ScoreConfig;
use crate::models::{MacroSplit, Nutrition};

/// Calorie level and macro split a meal or day should hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutritionTarget {
    pub calories: f64,
    pub macros: MacroSplit,
}

impl NutritionTarget {
    pub fn new(calories: f64, macros: MacroSplit) -> Self {
        Self { calories, macros }
    }

    /// Target for a slot receiving `share_pct` percent of the day.
    pub fn share(&self, share_pct: f64) -> Self {
        Self {
            calories: self.calories * share_pct / 100.0,
            macros: self.macros,
        }
    }

    /// Target as [calories, protein g, fat g, carbs g].
    pub fn as_vector(&self) -> [f64; 4] {
        let grams = self.macros.grams_at(self.calories);
        [grams.calories, grams.protein, grams.fat, grams.carbs]
    }
}

/// Weighted 0-100 accuracy of `actual` against `target`.
///
/// `weights.calorie_weight * max(0, 100 - calorie error %)` plus
/// `weights.macro_weight * max(0, 100 - mean macro percentage-point error)`.
/// Empty nutrition or a non-positive target scores 0.
pub fn nutrition_score(actual: &Nutrition, target: &NutritionTarget, weights: &ScoreConfig) -> f64 {
    if target.calories <= 0.0 || actual.calories <= 0.0 || !actual.is_finite() {
        return 0.0;
    }

    let calorie_error = (actual.calories - target.calories).abs() / target.calories * 100.0;
    let calorie_score = (100.0 - calorie_error).max(0.0);

    let macro_error = actual.macro_split().mean_abs_diff(&target.macros);
    let macro_score = (100.0 - macro_error).max(0.0);

    (weights.calorie_weight * calorie_score + weights.macro_weight * macro_score).clamp(0.0, 100.0)
}

/// Sum of squared deviations of [calories, protein, fat, carbs] from a target vector.
pub fn squared_deviation(actual: &Nutrition, target: &[f64; 4]) -> f64 {
    let actual = [actual.calories, actual.protein, actual.fat, actual.carbs];
    actual
        .iter()
        .zip(target.iter())
        .map(|(a, t)| (a - t).powi(2))
        .sum()
}
