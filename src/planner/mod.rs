pub mod assembler;
pub mod constants;
pub mod engine;
pub mod fallback;
pub mod filters;
pub mod nutrition;
pub mod ranking;
pub mod refiner;
pub mod scale;
pub mod scoring;
pub mod substitution;

pub use assembler::{AssembledDay, DayAssembler};
pub use constants::*;
pub use engine::{MealPlanner, WEEKDAYS};
pub use fallback::{FALLBACK_TEMPLATE_ID, fallback_meal, minimal_meal};
pub use filters::TemplateFilter;
pub use nutrition::{MealBreakdown, NutritionCalculator, NutritionError, ValidationScope, validate_nutrition};
pub use ranking::{RankContext, RankedTemplate, rank_templates};
pub use refiner::{DayRefiner, RefineOutcome};
pub use scale::{ScaleOutcome, optimize_scale};
pub use scoring::{NutritionTarget, nutrition_score, squared_deviation};
pub use substitution::{ResolvedLines, SubstitutionResolver};
