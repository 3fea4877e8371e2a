//! Shopping list aggregation across one or more day plans.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tracing::warn;

use crate::catalog::NutritionCatalog;
use crate::config::ShoppingConfig;
use crate::error::Result;
use crate::models::{DayPlan, MeasurementSystem};
use crate::planner::constants::{GRAMS_PER_OUNCE, GRAMS_PER_POUND};

/// Category used for ingredients the catalog does not know.
pub const UNCATEGORIZED: &str = "other";

/// Total purchase amount for one ingredient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingItem {
    pub name: String,
    /// Canonical mass after applying the category ceiling.
    pub grams: f64,
    /// `grams` formatted for the requested measurement system.
    pub display: String,
    /// True if the summed mass exceeded the ceiling.
    pub capped: bool,
}

/// Category -> ingredient id -> item, both levels sorted.
pub type ShoppingList = BTreeMap<String, BTreeMap<String, ShoppingItem>>;

/// Format a mass in grams as g/kg or oz/lb.
pub fn format_amount(grams: f64, system: MeasurementSystem) -> String {
    match system {
        MeasurementSystem::Metric if grams >= 1000.0 => format!("{:.2} kg", grams / 1000.0),
        MeasurementSystem::Metric => format!("{:.0} g", grams),
        MeasurementSystem::Imperial if grams >= GRAMS_PER_POUND => {
            format!("{:.2} lb", grams / GRAMS_PER_POUND)
        }
        MeasurementSystem::Imperial => format!("{:.1} oz", grams / GRAMS_PER_OUNCE),
    }
}

/// Sum canonical ingredient mass across `plans`, grouped by catalog category.
///
/// Each ingredient total is capped at its category's ceiling.
pub fn aggregate_shopping_list<'p>(
    plans: impl IntoIterator<Item = &'p DayPlan>,
    catalog: &NutritionCatalog,
    config: &ShoppingConfig,
    system: MeasurementSystem,
) -> ShoppingList {
    let mut totals: BTreeMap<(String, String), (String, f64)> = BTreeMap::new();
    for plan in plans {
        for meal in plan.meals() {
            for item in &meal.ingredients {
                let category = catalog
                    .ingredient(&item.ingredient_id)
                    .map(|i| i.category.clone())
                    .unwrap_or_else(|| UNCATEGORIZED.to_string());
                let entry = totals
                    .entry((category, item.ingredient_id.clone()))
                    .or_insert_with(|| (item.name.clone(), 0.0));
                entry.1 += item.grams;
            }
        }
    }

    let mut list = ShoppingList::new();
    for ((category, id), (name, grams)) in totals {
        let ceiling = config.ceiling_for(&category);
        let capped = grams > ceiling;
        if capped {
            warn!(ingredient = %id, grams, ceiling, "shopping amount capped");
        }
        let grams = grams.min(ceiling);
        list.entry(category).or_default().insert(
            id,
            ShoppingItem {
                name,
                grams,
                display: format_amount(grams, system),
                capped,
            },
        );
    }
    list
}

/// Write a shopping list to a CSV file.
pub fn write_shopping_csv(list: &ShoppingList, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["category", "ingredient_id", "name", "grams", "amount", "capped"])?;
    for (category, items) in list {
        for (id, item) in items {
            wtr.write_record([
                category.clone(),
                id.clone(),
                item.name.clone(),
                format!("{:.1}", item.grams),
                item.display.clone(),
                item.capped.to_string(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeneratedMeal, Ingredient, Nutrition, ScaledIngredient};

    fn item(id: &str, grams: f64) -> ScaledIngredient {
        ScaledIngredient {
            ingredient_id: id.to_string(),
            name: id.to_string(),
            amount: grams,
            unit: "g".to_string(),
            grams,
            substituted_for: None,
        }
    }

    fn day(items: Vec<ScaledIngredient>) -> DayPlan {
        DayPlan::new(vec![GeneratedMeal {
            slot: "lunch".to_string(),
            template_id: "t".to_string(),
            name: "T".to_string(),
            meal_type: "lunch".to_string(),
            ingredients: items,
            nutrition: Nutrition::default(),
            cuisine: "standard".to_string(),
            cooking_method: "raw".to_string(),
            prep_time_minutes: 0,
            scale: 1.0,
            is_fallback: false,
        }])
    }

    fn catalog() -> NutritionCatalog {
        let n = Nutrition::new(100.0, 5.0, 5.0, 8.0);
        NutritionCatalog::new()
            .with_ingredient(Ingredient::new("rice", "Rice", "grains", n).unwrap())
            .with_ingredient(Ingredient::new("cumin", "Cumin", "spices", n).unwrap())
    }

    #[test]
    fn test_sums_across_days() {
        let plans = vec![day(vec![item("rice", 300.0)]), day(vec![item("rice", 900.0)])];
        let list = aggregate_shopping_list(
            &plans,
            &catalog(),
            &ShoppingConfig::default(),
            MeasurementSystem::Metric,
        );
        let rice = &list["grains"]["rice"];
        assert_eq!(rice.grams, 1200.0);
        assert_eq!(rice.display, "1.20 kg");
        assert!(!rice.capped);
    }

    #[test]
    fn test_category_ceiling() {
        let plans = vec![day(vec![item("cumin", 400.0), item("mystery", 6000.0)])];
        let list = aggregate_shopping_list(
            &plans,
            &catalog(),
            &ShoppingConfig::default(),
            MeasurementSystem::Metric,
        );
        assert_eq!(list["spices"]["cumin"].grams, 250.0);
        assert!(list["spices"]["cumin"].capped);
        assert_eq!(list[UNCATEGORIZED]["mystery"].grams, 5000.0);
    }

    #[test]
    fn test_imperial_display() {
        assert_eq!(format_amount(GRAMS_PER_OUNCE * 4.0, MeasurementSystem::Imperial), "4.0 oz");
        assert_eq!(format_amount(GRAMS_PER_POUND * 2.0, MeasurementSystem::Imperial), "2.00 lb");
        assert_eq!(format_amount(250.0, MeasurementSystem::Metric), "250 g");
    }

    #[test]
    fn test_write_csv() {
        let plans = vec![day(vec![item("rice", 300.0)])];
        let list = aggregate_shopping_list(
            &plans,
            &catalog(),
            &ShoppingConfig::default(),
            MeasurementSystem::Metric,
        );
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shopping.csv");
        write_shopping_csv(&list, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("category,ingredient_id,name,grams,amount,capped"));
        assert_eq!(lines.next(), Some("grains,rice,rice,300.0,300 g,false"));
    }
}
