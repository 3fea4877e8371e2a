use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// One ingredient line of a recipe: an amount in some unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientLine {
    pub ingredient_id: String,
    pub amount: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    /// Original ingredient id when this line was substituted in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substituted_for: Option<String>,
}

fn default_unit() -> String {
    "g".to_string()
}

impl IngredientLine {
    pub fn new(ingredient_id: &str, amount: f64, unit: &str) -> Self {
        Self {
            ingredient_id: ingredient_id.to_string(),
            amount,
            unit: unit.to_string(),
            substituted_for: None,
        }
    }
}

/// A reusable recipe skeleton, not yet scaled to a calorie target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealTemplate {
    pub id: String,
    pub name: String,
    pub ingredients: Vec<IngredientLine>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Slot type this template serves (breakfast, lunch, dinner, snack).
    pub meal_type: String,
    #[serde(default = "default_cuisine")]
    pub cuisine: String,
    #[serde(default = "default_method")]
    pub cooking_method: String,
    #[serde(default)]
    pub prep_time_minutes: u32,
}

fn default_cuisine() -> String {
    "standard".to_string()
}

fn default_method() -> String {
    "raw".to_string()
}

impl MealTemplate {
    /// Build a template, rejecting empty recipes and non-positive amounts.
    pub fn new(id: &str, name: &str, meal_type: &str, ingredients: Vec<IngredientLine>) -> Result<Self> {
        if ingredients.is_empty() {
            return Err(PlannerError::invalid_record("template", id, "no ingredients"));
        }
        if let Some(line) = ingredients
            .iter()
            .find(|l| !(l.amount.is_finite() && l.amount > 0.0))
        {
            return Err(PlannerError::invalid_record(
                "template",
                id,
                format!("non-positive amount for {}", line.ingredient_id),
            ));
        }
        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            ingredients,
            tags: Vec::new(),
            meal_type: meal_type.to_string(),
            cuisine: default_cuisine(),
            cooking_method: default_method(),
            prep_time_minutes: 0,
        })
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_cuisine(mut self, cuisine: &str) -> Self {
        self.cuisine = cuisine.to_string();
        self
    }

    pub fn with_cooking_method(mut self, method: &str) -> Self {
        self.cooking_method = method.to_string();
        self
    }

    pub fn with_prep_time(mut self, minutes: u32) -> Self {
        self.prep_time_minutes = minutes;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn ingredient_ids(&self) -> impl Iterator<Item = &str> {
        self.ingredients.iter().map(|l| l.ingredient_id.as_str())
    }
}
