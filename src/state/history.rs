use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Last day each template (by display name) was used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealHistory {
    last_used: HashMap<String, u32>,
    current_day: u32,
}

impl MealHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(day: u32) -> Self {
        Self {
            last_used: HashMap::new(),
            current_day: day,
        }
    }

    pub fn current_day(&self) -> u32 {
        self.current_day
    }

    pub fn set_current_day(&mut self, day: u32) {
        self.current_day = day;
    }

    pub fn advance_day(&mut self) {
        self.current_day = self.current_day.saturating_add(1);
    }

    /// Mark a template as used on the current day.
    pub fn record(&mut self, template_name: &str) {
        self.last_used
            .insert(template_name.to_string(), self.current_day);
    }

    pub fn last_used(&self, template_name: &str) -> Option<u32> {
        self.last_used.get(template_name).copied()
    }

    /// Days since last use, or `None` if never used.
    pub fn days_since(&self, template_name: &str) -> Option<u32> {
        self.last_used(template_name)
            .map(|day| self.current_day.saturating_sub(day))
    }

    /// True if the template was used less than `cooldown_days` ago.
    pub fn is_cooling_down(&self, template_name: &str, cooldown_days: u32) -> bool {
        self.days_since(template_name)
            .is_some_and(|days| days < cooldown_days)
    }

    pub fn len(&self) -> usize {
        self.last_used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_used.is_empty()
    }
}

/// Running score statistics for one template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateStats {
    pub uses: u32,
    pub mean_score: f64,
}

/// Learned per-template success scores, accumulated across calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceStats {
    templates: HashMap<String, TemplateStats>,
}

impl PreferenceStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one observed score into the template's running mean.
    pub fn record(&mut self, template_name: &str, score: f64) {
        let stats = self
            .templates
            .entry(template_name.to_string())
            .or_default();
        stats.uses += 1;
        stats.mean_score += (score - stats.mean_score) / stats.uses as f64;
    }

    /// Mean score, or 0.0 for unseen templates.
    pub fn score(&self, template_name: &str) -> f64 {
        self.templates
            .get(template_name)
            .map(|s| s.mean_score)
            .unwrap_or(0.0)
    }

    pub fn get(&self, template_name: &str) -> Option<&TemplateStats> {
        self.templates.get(template_name)
    }
}
