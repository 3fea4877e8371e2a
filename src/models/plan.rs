use serde::{Deserialize, Serialize};

use crate::models::Nutrition;

/// One ingredient of a generated meal, after scaling and substitution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledIngredient {
    pub ingredient_id: String,
    pub name: String,
    /// Amount in the recipe's own unit.
    pub amount: f64,
    pub unit: String,
    /// Canonical mass in grams.
    pub grams: f64,
    /// Ingredient this one replaced, if substituted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substituted_for: Option<String>,
}

/// A template resolved to a concrete portion for one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedMeal {
    pub slot: String,
    pub template_id: String,
    pub name: String,
    pub meal_type: String,
    pub ingredients: Vec<ScaledIngredient>,
    pub nutrition: Nutrition,
    pub cuisine: String,
    pub cooking_method: String,
    pub prep_time_minutes: u32,
    /// Scale factor applied to the template's base amounts.
    pub scale: f64,
    pub is_fallback: bool,
}

impl GeneratedMeal {
    /// Multiply the portion in place: nutrition, amounts, grams and scale.
    pub fn rescale(&mut self, factor: f64) {
        self.nutrition = self.nutrition.scaled(factor);
        for item in &mut self.ingredients {
            item.amount *= factor;
            item.grams *= factor;
        }
        self.scale *= factor;
    }

    pub fn contains_ingredient(&self, ingredient_id: &str) -> bool {
        self.ingredients.iter().any(|i| i.ingredient_id == ingredient_id)
    }
}

/// Meals for every slot of a pattern plus the day's totals.
///
/// Totals are always recomputed from the meals; mutate meals through
/// [`DayPlan::meals_mut`] followed by [`DayPlan::recompute_totals`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    meals: Vec<GeneratedMeal>,
    totals: Nutrition,
}

impl DayPlan {
    pub fn new(meals: Vec<GeneratedMeal>) -> Self {
        let mut plan = Self {
            meals,
            totals: Nutrition::default(),
        };
        plan.recompute_totals();
        plan
    }

    pub fn meals(&self) -> &[GeneratedMeal] {
        &self.meals
    }

    pub fn meals_mut(&mut self) -> &mut [GeneratedMeal] {
        &mut self.meals
    }

    /// Meal assigned to a slot name.
    pub fn meal(&self, slot: &str) -> Option<&GeneratedMeal> {
        self.meals.iter().find(|m| m.slot == slot)
    }

    pub fn totals(&self) -> Nutrition {
        self.totals
    }

    pub fn recompute_totals(&mut self) {
        self.totals = self.meals.iter().map(|m| m.nutrition).sum();
    }

    pub fn len(&self) -> usize {
        self.meals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }
}

/// Day plans keyed by weekday name, in calendar order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekPlan {
    pub week_index: u32,
    pub days: Vec<(String, DayPlan)>,
}

impl WeekPlan {
    pub fn day(&self, name: &str) -> Option<&DayPlan> {
        self.days
            .iter()
            .find(|(day, _)| day.eq_ignore_ascii_case(name))
            .map(|(_, plan)| plan)
    }

    pub fn plans(&self) -> impl Iterator<Item = &DayPlan> {
        self.days.iter().map(|(_, plan)| plan)
    }
}
