use crate::catalog::DataIntegrityWarning;
use crate::models::{AlgorithmMetrics, DayPlan, MeasurementSystem, WeekPlan};
use crate::shopping::{ShoppingList, format_amount};

/// Display one day's meals in a formatted table.
pub fn display_day_plan(plan: &DayPlan, system: MeasurementSystem) {
    if plan.is_empty() {
        println!("No meals planned.");
        return;
    }

    // Find max meal name length for alignment
    let max_name_len = plan.meals().iter().map(|m| m.name.len()).max().unwrap_or(10);

    for meal in plan.meals() {
        let mut tags = Vec::new();
        if meal.is_fallback {
            tags.push("[Fallback]".to_string());
        }
        if (meal.scale - 1.0).abs() > 0.005 {
            tags.push(format!("x{:.2}", meal.scale));
        }
        let tags_str = if tags.is_empty() {
            String::new()
        } else {
            format!("  {}", tags.join(" "))
        };

        println!(
            "{:>10}: {:<width$} - {:>4.0} cal | P {:>5.1}g F {:>5.1}g C {:>5.1}g{}",
            meal.slot,
            meal.name,
            meal.nutrition.calories,
            meal.nutrition.protein,
            meal.nutrition.fat,
            meal.nutrition.carbs,
            tags_str,
            width = max_name_len
        );

        for item in &meal.ingredients {
            let swapped = match &item.substituted_for {
                Some(original) => format!(" (instead of {})", original),
                None => String::new(),
            };
            println!(
                "{:>14}{} {}{}",
                "",
                format_amount(item.grams, system),
                item.name,
                swapped
            );
        }
    }

    let totals = plan.totals();
    let split = totals.macro_split();
    println!();
    println!(
        "Total: {:.0} cal | P {:.0}% F {:.0}% C {:.0}%",
        totals.calories, split.protein, split.fat, split.carbs
    );
}

/// Display every day of a week plan.
pub fn display_week(week: &WeekPlan, system: MeasurementSystem) {
    println!();
    println!("=== Week {} ===", week.week_index + 1);

    for (day, plan) in &week.days {
        println!();
        println!("--- {} ---", day);
        display_day_plan(plan, system);
    }
    println!();
}

pub fn display_metrics(metrics: &AlgorithmMetrics) {
    println!();
    println!("--- Metrics ---");
    println!("Accuracy: {:.1}", metrics.final_accuracy);
    println!(
        "Converged: {}",
        if metrics.convergence_achieved { "yes" } else { "no" }
    );
    println!("Day attempts: {}", metrics.day_attempts);
    println!("Optimizer iterations: {}", metrics.iterations);
    println!("Templates evaluated: {}", metrics.templates_evaluated);
    println!("Constraints checked: {}", metrics.constraints_checked);
    println!("Substitutions: {}", metrics.substitutions_made);
    if metrics.ingredients_dropped > 0 {
        println!("Ingredients dropped: {}", metrics.ingredients_dropped);
    }
    if metrics.fallback_used {
        println!("Fallback meals: {}", metrics.fallbacks);
    }
    println!();
}

pub fn display_shopping_list(list: &ShoppingList) {
    if list.is_empty() {
        println!("Shopping list is empty.");
        return;
    }

    println!();
    println!("=== Shopping List ===");

    for (category, items) in list {
        println!();
        println!("{} ({} items)", category, items.len());
        for item in items.values() {
            let mark = if item.capped { " (capped)" } else { "" };
            println!("  {:<24} {:>10}{}", item.name, item.display, mark);
        }
    }
    println!();
}

pub fn display_warnings(warnings: &[DataIntegrityWarning]) {
    if warnings.is_empty() {
        println!("Catalog OK.");
        return;
    }

    println!("{} catalog warning(s):", warnings.len());
    for warning in warnings {
        println!("  - {}", warning);
    }
}
