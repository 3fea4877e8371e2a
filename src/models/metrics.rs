use serde::{Deserialize, Serialize};

/// Running counters for one planning call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmMetrics {
    /// Optimizer iterations across scale search and both refiner passes.
    pub iterations: u64,
    pub constraints_checked: u64,
    pub templates_evaluated: u64,
    pub substitutions_made: u64,
    pub ingredients_dropped: u64,
    pub day_attempts: u64,
    pub fallbacks: u64,
    pub validation_errors: u64,
    pub convergence_achieved: bool,
    pub fallback_used: bool,
    /// Nutrition score of the returned plan (0-100).
    pub final_accuracy: f64,
}

impl AlgorithmMetrics {
    pub fn record_fallback(&mut self) {
        self.fallbacks += 1;
        self.fallback_used = true;
    }

    /// Fold another call's counters into this one.
    ///
    /// Flags are OR-ed except convergence, which must hold for every call;
    /// accuracy becomes the running mean over merged calls.
    pub fn merge(&mut self, other: &AlgorithmMetrics, calls_so_far: usize) {
        self.iterations += other.iterations;
        self.constraints_checked += other.constraints_checked;
        self.templates_evaluated += other.templates_evaluated;
        self.substitutions_made += other.substitutions_made;
        self.ingredients_dropped += other.ingredients_dropped;
        self.day_attempts += other.day_attempts;
        self.fallbacks += other.fallbacks;
        self.validation_errors += other.validation_errors;
        self.fallback_used |= other.fallback_used;

        if calls_so_far == 0 {
            self.convergence_achieved = other.convergence_achieved;
            self.final_accuracy = other.final_accuracy;
        } else {
            self.convergence_achieved &= other.convergence_achieved;
            let n = calls_so_far as f64;
            self.final_accuracy = (self.final_accuracy * n + other.final_accuracy) / (n + 1.0);
        }
    }
}
