pub mod diet;
pub mod ingredient;
pub mod metrics;
pub mod nutrition;
pub mod pattern;
pub mod plan;
pub mod preferences;
pub mod template;

pub use diet::{DietProfile, DietRules, UNRESTRICTED_DIET_ID};
pub use ingredient::Ingredient;
pub use metrics::AlgorithmMetrics;
pub use nutrition::{MacroSplit, Nutrition};
pub use pattern::{MealPattern, MealSlot};
pub use plan::{DayPlan, GeneratedMeal, ScaledIngredient, WeekPlan};
pub use preferences::{ALL_OPTION, MeasurementSystem, Preferences};
pub use template::{IngredientLine, MealTemplate};
