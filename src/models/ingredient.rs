use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::models::Nutrition;

/// A catalog ingredient with nutrition facts per 100 g as eaten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub per_100g: Nutrition,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_category() -> String {
    "other".to_string()
}

impl Ingredient {
    /// Build an ingredient, rejecting negative or non-finite nutrition facts.
    pub fn new(id: &str, name: &str, category: &str, per_100g: Nutrition) -> Result<Self> {
        if id.trim().is_empty() {
            return Err(PlannerError::invalid_record("ingredient", id, "empty id"));
        }
        if !per_100g.is_finite() || per_100g.has_negative() {
            return Err(PlannerError::invalid_record(
                "ingredient",
                id,
                "nutrition facts must be finite and non-negative",
            ));
        }
        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            per_100g,
            tags: Vec::new(),
        })
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Nutrition for a mass in grams.
    pub fn nutrition_for(&self, grams: f64) -> Nutrition {
        self.per_100g.scaled(grams / 100.0)
    }
}
