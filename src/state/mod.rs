mod history;
mod persistence;

pub use history::{MealHistory, PreferenceStats, TemplateStats};
pub use persistence::{PlannerState, load_catalog, load_checked_catalog, load_state, save_state};
