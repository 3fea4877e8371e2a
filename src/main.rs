use clap::Parser;
use std::path::Path;
use tracing::{Level, warn};

use meal_plan_engine::catalog::{DataIntegrityWarning, NutritionCatalog};
use meal_plan_engine::cli::{Cli, Command, PlanArgs};
use meal_plan_engine::config::{PlannerConfig, load_config};
use meal_plan_engine::error::{PlannerError, Result};
use meal_plan_engine::interface::{
    collect_preferences, display_day_plan, display_metrics, display_shopping_list, display_warnings,
    display_week, prompt_yes_no,
};
use meal_plan_engine::models::{MeasurementSystem, Preferences};
use meal_plan_engine::planner::MealPlanner;
use meal_plan_engine::shopping::{aggregate_shopping_list, write_shopping_csv};
use meal_plan_engine::state::{load_checked_catalog, load_state, save_state};

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::WARN);
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let (catalog, warnings) = load_checked_catalog(&cli.catalog)?;
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => PlannerConfig::default(),
    };

    match cli.command {
        Command::Plan {
            prefs,
            interactive,
            no_save,
        } => cmd_plan(&catalog, config, &cli.state, &prefs, interactive, no_save),
        Command::Week {
            prefs,
            week,
            no_save,
        } => cmd_week(&catalog, config, &cli.state, &prefs, week, no_save),
        Command::Validate => cmd_validate(&catalog, &warnings),
        Command::Shopping { prefs, week, csv } => {
            cmd_shopping(&catalog, config, &cli.state, &prefs, week, csv.as_deref())
        }
    }
}

/// Build preferences from flags.
fn preferences_from_args(args: &PlanArgs) -> Preferences {
    let normalize =
        |v: &[String]| -> Vec<String> { v.iter().map(|s| s.trim().to_lowercase()).collect() };
    let system = if args.imperial {
        MeasurementSystem::Imperial
    } else {
        MeasurementSystem::Metric
    };
    let mut prefs = Preferences::new(&args.diet, args.calories, &args.pattern)
        .with_measurement_system(system)
        .with_substitutions(!args.no_substitutions);
    prefs.restrictions = normalize(&args.restrictions);
    prefs.cuisines = normalize(&args.cuisines);
    prefs.cooking_methods = normalize(&args.methods);
    prefs
}

/// Reject unknown ids up front with a suggestion, and warn on unknown restrictions.
fn check_ids(catalog: &NutritionCatalog, prefs: &Preferences) -> Result<()> {
    let hint = |suggestion: Option<&str>| match suggestion {
        Some(s) => format!(" (did you mean '{}'?)", s),
        None => String::new(),
    };

    if catalog.diet(&prefs.diet_id).is_none() {
        return Err(PlannerError::UnknownDiet(format!(
            "{}{}",
            prefs.diet_id,
            hint(catalog.closest_diet(&prefs.diet_id))
        )));
    }
    if catalog.pattern(&prefs.pattern_id).is_none() {
        return Err(PlannerError::UnknownPattern(format!(
            "{}{}",
            prefs.pattern_id,
            hint(catalog.closest_pattern(&prefs.pattern_id))
        )));
    }
    for restriction in &prefs.restrictions {
        if catalog.allergen_ingredients(restriction).is_none() {
            warn!(
                restriction = %restriction,
                "unknown restriction bans nothing{}",
                hint(catalog.closest_restriction(restriction))
            );
        }
    }
    Ok(())
}

/// Plan one day and optionally save the updated state.
fn cmd_plan(
    catalog: &NutritionCatalog,
    config: PlannerConfig,
    state_path: &str,
    args: &PlanArgs,
    interactive: bool,
    no_save: bool,
) -> Result<()> {
    let prefs = if interactive {
        collect_preferences(catalog)?
    } else {
        preferences_from_args(args)
    };
    check_ids(catalog, &prefs)?;

    let state = load_state(state_path)?;
    let mut planner = MealPlanner::new(catalog, config).with_state(state);

    println!(
        "Planning {:.0} kcal ({} diet, {} pattern)...",
        prefs.target_calories, prefs.diet_id, prefs.pattern_id
    );
    println!();

    let (plan, metrics) = planner.generate_day(&prefs)?;
    display_day_plan(&plan, prefs.measurement_system);
    display_metrics(&metrics);

    let save = if no_save {
        false
    } else if interactive {
        prompt_yes_no("Save updated planner state?", true)?
    } else {
        true
    };
    if save {
        save_state(state_path, &planner.state())?;
        println!("Planner state saved.");
    }

    Ok(())
}

/// Plan a week against the saved history.
fn cmd_week(
    catalog: &NutritionCatalog,
    config: PlannerConfig,
    state_path: &str,
    args: &PlanArgs,
    week: u32,
    no_save: bool,
) -> Result<()> {
    let prefs = preferences_from_args(args);
    check_ids(catalog, &prefs)?;

    let mut state = load_state(state_path)?;
    let mut history = std::mem::take(&mut state.history);
    let mut planner = MealPlanner::new(catalog, config).with_state(state);

    let (week_plan, metrics) = planner.generate_week(&prefs, week, &mut history)?;
    display_week(&week_plan, prefs.measurement_system);
    display_metrics(&metrics);

    if !no_save {
        let mut state = planner.state();
        state.history = history;
        save_state(state_path, &state)?;
        println!("Planner state saved.");
    }

    Ok(())
}

fn cmd_validate(catalog: &NutritionCatalog, warnings: &[DataIntegrityWarning]) -> Result<()> {
    println!(
        "Loaded {} ingredients, {} templates, {} diets, {} patterns",
        catalog.ingredients.len(),
        catalog.templates.len(),
        catalog.diets.len(),
        catalog.patterns.len()
    );
    display_warnings(warnings);
    Ok(())
}

/// Plan a week without saving and print what to buy.
fn cmd_shopping(
    catalog: &NutritionCatalog,
    config: PlannerConfig,
    state_path: &str,
    args: &PlanArgs,
    week: u32,
    csv_path: Option<&str>,
) -> Result<()> {
    let prefs = preferences_from_args(args);
    check_ids(catalog, &prefs)?;

    let mut state = load_state(state_path)?;
    let mut history = std::mem::take(&mut state.history);
    let shopping_config = config.shopping.clone();
    let mut planner = MealPlanner::new(catalog, config).with_state(state);

    let (week_plan, _) = planner.generate_week(&prefs, week, &mut history)?;
    let list = aggregate_shopping_list(
        week_plan.plans(),
        catalog,
        &shopping_config,
        prefs.measurement_system,
    );
    display_shopping_list(&list);

    if let Some(path) = csv_path {
        write_shopping_csv(&list, Path::new(path))?;
        println!("Shopping list written to {}", path);
    }

    Ok(())
}
