use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::models::MacroSplit;

/// Id of the diet that accepts every template tag.
pub const UNRESTRICTED_DIET_ID: &str = "balanced";

/// Per-meal rules a diet imposes on top of its macro split.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DietRules {
    #[serde(default)]
    pub min_protein_per_meal: Option<f64>,
    #[serde(default)]
    pub max_carbs_per_meal: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietProfile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub macros: MacroSplit,
    #[serde(default)]
    pub banned_ingredients: HashSet<String>,
    #[serde(default)]
    pub accepted_tags: HashSet<String>,
    #[serde(default)]
    pub rules: DietRules,
}

impl DietProfile {
    /// Build a diet, rejecting macro splits that do not sum to roughly 100%.
    pub fn new(id: &str, name: &str, macros: MacroSplit) -> Result<Self> {
        let sum = macros.sum();
        if !(98.0..=102.0).contains(&sum) {
            return Err(PlannerError::invalid_record(
                "diet",
                id,
                format!("macro percentages sum to {:.1}", sum),
            ));
        }
        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            macros,
            banned_ingredients: HashSet::new(),
            accepted_tags: HashSet::new(),
            rules: DietRules::default(),
        })
    }

    pub fn with_banned(mut self, ids: &[&str]) -> Self {
        self.banned_ingredients = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_accepted_tags(mut self, tags: &[&str]) -> Self {
        self.accepted_tags = tags.iter().map(|s| s.to_lowercase()).collect();
        self
    }

    pub fn with_rules(mut self, rules: DietRules) -> Self {
        self.rules = rules;
        self
    }

    /// True for the baseline diet, which accepts any template tag.
    pub fn is_unrestricted(&self) -> bool {
        self.id == UNRESTRICTED_DIET_ID || self.accepted_tags.is_empty()
    }

    pub fn bans(&self, ingredient_id: &str) -> bool {
        self.banned_ingredients.contains(ingredient_id)
    }

    pub fn accepts_tag(&self, tag: &str) -> bool {
        self.accepted_tags.contains(&tag.to_lowercase())
    }
}
