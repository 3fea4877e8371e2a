pub mod prompts;
pub mod render;

pub use prompts::{
    collect_preferences, prompt_cuisines, prompt_measurement_system, prompt_target_calories,
    prompt_yes_no,
};
pub use render::{
    display_day_plan, display_metrics, display_shopping_list, display_warnings, display_week,
};
