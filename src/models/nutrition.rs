use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Energy density of protein and carbohydrate (kcal per gram).
pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
/// Energy density of fat (kcal per gram).
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Calories and macronutrient grams for a quantity of food.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    #[serde(default)]
    pub fiber: f64,
}

impl Nutrition {
    pub fn new(calories: f64, protein: f64, fat: f64, carbs: f64) -> Self {
        Self {
            calories,
            protein,
            fat,
            carbs,
            fiber: 0.0,
        }
    }

    pub fn with_fiber(mut self, fiber: f64) -> Self {
        self.fiber = fiber;
        self
    }

    /// Every field multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein: self.protein * factor,
            fat: self.fat * factor,
            carbs: self.carbs * factor,
            fiber: self.fiber * factor,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.calories == 0.0 && self.protein == 0.0 && self.fat == 0.0 && self.carbs == 0.0
    }

    pub fn has_negative(&self) -> bool {
        self.calories < 0.0
            || self.protein < 0.0
            || self.fat < 0.0
            || self.carbs < 0.0
            || self.fiber < 0.0
    }

    pub fn is_finite(&self) -> bool {
        [self.calories, self.protein, self.fat, self.carbs, self.fiber]
            .into_iter()
            .all(f64::is_finite)
    }

    /// Calories implied by the macronutrient grams (4/9/4 kcal per gram).
    pub fn macro_calories(&self) -> f64 {
        self.protein * KCAL_PER_GRAM_PROTEIN
            + self.fat * KCAL_PER_GRAM_FAT
            + self.carbs * KCAL_PER_GRAM_CARBS
    }

    /// Share of stated calories coming from each macronutrient, in percent.
    ///
    /// Returns all zeros when there are no calories.
    pub fn macro_split(&self) -> MacroSplit {
        if self.calories <= 0.0 {
            return MacroSplit::default();
        }
        MacroSplit {
            protein: self.protein * KCAL_PER_GRAM_PROTEIN / self.calories * 100.0,
            fat: self.fat * KCAL_PER_GRAM_FAT / self.calories * 100.0,
            carbs: self.carbs * KCAL_PER_GRAM_CARBS / self.calories * 100.0,
        }
    }
}

impl Add for Nutrition {
    type Output = Nutrition;

    fn add(self, rhs: Nutrition) -> Nutrition {
        Nutrition {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            fat: self.fat + rhs.fat,
            carbs: self.carbs + rhs.carbs,
            fiber: self.fiber + rhs.fiber,
        }
    }
}

impl AddAssign for Nutrition {
    fn add_assign(&mut self, rhs: Nutrition) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for Nutrition {
    fn sum<I: Iterator<Item = Nutrition>>(iter: I) -> Nutrition {
        iter.fold(Nutrition::default(), |acc, n| acc + n)
    }
}

/// Protein/fat/carb percentages of total calories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroSplit {
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

impl MacroSplit {
    pub fn new(protein: f64, fat: f64, carbs: f64) -> Self {
        Self {
            protein,
            fat,
            carbs,
        }
    }

    pub fn sum(&self) -> f64 {
        self.protein + self.fat + self.carbs
    }

    /// Mean absolute percentage-point difference across the three macros.
    pub fn mean_abs_diff(&self, other: &MacroSplit) -> f64 {
        ((self.protein - other.protein).abs()
            + (self.fat - other.fat).abs()
            + (self.carbs - other.carbs).abs())
            / 3.0
    }

    /// Gram targets implied by this split at a calorie level.
    pub fn grams_at(&self, calories: f64) -> Nutrition {
        Nutrition::new(
            calories,
            calories * self.protein / 100.0 / KCAL_PER_GRAM_PROTEIN,
            calories * self.fat / 100.0 / KCAL_PER_GRAM_FAT,
            calories * self.carbs / 100.0 / KCAL_PER_GRAM_CARBS,
        )
    }
}
