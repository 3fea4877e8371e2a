use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Sentinel preference value that disables a cuisine or cooking-method filter.
pub const ALL_OPTION: &str = "all";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    #[default]
    Metric,
    Imperial,
}

/// Per-call planning request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub diet_id: String,
    pub target_calories: f64,
    pub pattern_id: String,
    #[serde(default)]
    pub restrictions: Vec<String>,
    #[serde(default)]
    pub cuisines: Vec<String>,
    #[serde(default)]
    pub cooking_methods: Vec<String>,
    #[serde(default)]
    pub measurement_system: MeasurementSystem,
    #[serde(default = "default_true")]
    pub allow_substitutions: bool,
}

fn default_true() -> bool {
    true
}

impl Preferences {
    pub fn new(diet_id: &str, target_calories: f64, pattern_id: &str) -> Self {
        Self {
            diet_id: diet_id.to_string(),
            target_calories,
            pattern_id: pattern_id.to_string(),
            restrictions: Vec::new(),
            cuisines: Vec::new(),
            cooking_methods: Vec::new(),
            measurement_system: MeasurementSystem::Metric,
            allow_substitutions: true,
        }
    }

    pub fn with_restrictions(mut self, restrictions: &[&str]) -> Self {
        self.restrictions = restrictions.iter().map(|s| s.to_lowercase()).collect();
        self
    }

    pub fn with_cuisines(mut self, cuisines: &[&str]) -> Self {
        self.cuisines = cuisines.iter().map(|s| s.to_lowercase()).collect();
        self
    }

    pub fn with_cooking_methods(mut self, methods: &[&str]) -> Self {
        self.cooking_methods = methods.iter().map(|s| s.to_lowercase()).collect();
        self
    }

    pub fn with_measurement_system(mut self, system: MeasurementSystem) -> Self {
        self.measurement_system = system;
        self
    }

    pub fn with_substitutions(mut self, allowed: bool) -> Self {
        self.allow_substitutions = allowed;
        self
    }

    /// Reject values no plan could be built for.
    pub fn validate(&self) -> Result<()> {
        if !self.target_calories.is_finite() || self.target_calories <= 0.0 {
            return Err(PlannerError::InvalidInput(format!(
                "target calories must be positive, got {}",
                self.target_calories
            )));
        }
        Ok(())
    }

    pub fn all_cuisines(&self) -> bool {
        is_all(&self.cuisines)
    }

    pub fn all_cooking_methods(&self) -> bool {
        is_all(&self.cooking_methods)
    }
}

fn is_all(values: &[String]) -> bool {
    values.is_empty() || values.iter().any(|v| v.eq_ignore_ascii_case(ALL_OPTION))
}
