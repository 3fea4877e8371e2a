use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Allowed distance of slot shares from 100%.
const SHARE_TOLERANCE: f64 = 0.5;

/// A named meal occasion within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSlot {
    pub name: String,
    #[serde(default)]
    pub time: String,
    /// Percentage of daily calories assigned to this slot.
    pub calorie_share: f64,
    /// Template type served in this slot. Defaults to the slot name.
    #[serde(default)]
    pub meal_type: Option<String>,
}

impl MealSlot {
    pub fn new(name: &str, time: &str, calorie_share: f64) -> Self {
        Self {
            name: name.to_string(),
            time: time.to_string(),
            calorie_share,
            meal_type: None,
        }
    }

    pub fn with_meal_type(mut self, meal_type: &str) -> Self {
        self.meal_type = Some(meal_type.to_string());
        self
    }

    pub fn meal_type(&self) -> &str {
        self.meal_type.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPattern {
    pub id: String,
    pub slots: Vec<MealSlot>,
}

impl MealPattern {
    /// Build a pattern whose slot shares sum to 100.
    pub fn new(id: &str, slots: Vec<MealSlot>) -> Result<Self> {
        if slots.is_empty() {
            return Err(PlannerError::invalid_record("pattern", id, "no slots"));
        }
        let pattern = Self {
            id: id.to_string(),
            slots,
        };
        let total = pattern.total_share();
        if (total - 100.0).abs() > SHARE_TOLERANCE {
            return Err(PlannerError::invalid_record(
                "pattern",
                id,
                format!("slot shares sum to {:.1}", total),
            ));
        }
        Ok(pattern)
    }

    pub fn total_share(&self) -> f64 {
        self.slots.iter().map(|s| s.calorie_share).sum()
    }

    pub fn shares_valid(&self) -> bool {
        (self.total_share() - 100.0).abs() <= SHARE_TOLERANCE
    }
}
