use clap::{Args, Parser, Subcommand};

/// meal-planner: builds day and week meal plans that hit calorie and macro targets.
#[derive(Parser, Debug)]
#[command(name = "meal-planner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the nutrition catalog JSON file.
    #[arg(short, long, default_value = "catalog.json")]
    pub catalog: String,

    /// Optional planner config JSON file.
    #[arg(long)]
    pub config: Option<String>,

    /// Path to the variety history and preference state file.
    #[arg(short, long, default_value = "planner_state.json")]
    pub state: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Planning preferences shared by the planning subcommands.
#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Diet profile id.
    #[arg(short, long, default_value = "balanced")]
    pub diet: String,

    /// Daily calorie target.
    #[arg(long, default_value_t = 2000.0)]
    pub calories: f64,

    /// Meal pattern id.
    #[arg(short, long, default_value = "standard")]
    pub pattern: String,

    /// Allergen or restriction to exclude (repeatable or comma separated).
    #[arg(short, long = "restrict", value_delimiter = ',')]
    pub restrictions: Vec<String>,

    /// Preferred cuisine (repeatable or comma separated; omit for all).
    #[arg(long = "cuisine", value_delimiter = ',')]
    pub cuisines: Vec<String>,

    /// Preferred cooking method (repeatable or comma separated; omit for all).
    #[arg(long = "method", value_delimiter = ',')]
    pub methods: Vec<String>,

    /// Show amounts in ounces and pounds.
    #[arg(long)]
    pub imperial: bool,

    /// Drop banned ingredients instead of substituting them.
    #[arg(long)]
    pub no_substitutions: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Plan a single day.
    Plan {
        #[command(flatten)]
        prefs: PlanArgs,

        /// Ask for preferences interactively instead of using flags.
        #[arg(short, long)]
        interactive: bool,

        /// Do not update the state file.
        #[arg(long)]
        no_save: bool,
    },

    /// Plan a full week (Monday to Sunday).
    Week {
        #[command(flatten)]
        prefs: PlanArgs,

        /// Week number, starting at 0.
        #[arg(short, long, default_value_t = 0)]
        week: u32,

        /// Do not update the state file.
        #[arg(long)]
        no_save: bool,
    },

    /// Check the catalog for inconsistencies.
    Validate,

    /// Plan a week and print its shopping list.
    Shopping {
        #[command(flatten)]
        prefs: PlanArgs,

        /// Week number, starting at 0.
        #[arg(short, long, default_value_t = 0)]
        week: u32,

        /// Also write the list to this CSV file.
        #[arg(long)]
        csv: Option<String>,
    },
}
