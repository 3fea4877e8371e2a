#![allow(dead_code)]

use meal_plan_engine::catalog::NutritionCatalog;
use meal_plan_engine::models::{
    DietProfile, GeneratedMeal, Ingredient, IngredientLine, MacroSplit, MealPattern, MealSlot,
    MealTemplate, Nutrition, WeekPlan,
};

pub const GLUTEN_INGREDIENTS: [&str; 3] = ["bread", "pasta", "oats"];

fn ingredient(id: &str, name: &str, category: &str, n: [f64; 4]) -> Ingredient {
    Ingredient::new(id, name, category, Nutrition::new(n[0], n[1], n[2], n[3])).unwrap()
}

fn template(id: &str, name: &str, meal_type: &str, lines: &[(&str, f64)]) -> MealTemplate {
    let lines = lines
        .iter()
        .map(|(ingredient, grams)| IngredientLine::new(ingredient, *grams, "g"))
        .collect();
    MealTemplate::new(id, name, meal_type, lines).unwrap()
}

/// Per-100 g facts: [kcal, protein, fat, carbs].
fn ingredients() -> Vec<Ingredient> {
    vec![
        ingredient("eggs", "Eggs", "dairy", [143.0, 12.6, 9.5, 0.7]),
        ingredient("bacon", "Bacon", "meat", [541.0, 37.0, 42.0, 1.4]),
        ingredient("butter", "Butter", "dairy", [717.0, 0.9, 81.0, 0.1]),
        ingredient("salmon", "Salmon", "fish", [208.0, 20.0, 13.0, 0.0]),
        ingredient("avocado", "Avocado", "produce", [160.0, 2.0, 15.0, 9.0]),
        ingredient("cheese", "Cheddar", "dairy", [403.0, 25.0, 33.0, 1.3]),
        ingredient("spinach", "Spinach", "produce", [23.0, 2.9, 0.4, 3.6]),
        ingredient("almonds", "Almonds", "pantry", [579.0, 21.0, 50.0, 22.0]),
        ingredient("olive_oil", "Olive Oil", "oils", [884.0, 0.0, 100.0, 0.0]),
        ingredient("chicken", "Chicken Breast", "meat", [165.0, 31.0, 3.6, 0.0]),
        ingredient("beef", "Lean Beef", "meat", [217.0, 26.0, 12.0, 0.0]),
        ingredient("tofu", "Firm Tofu", "protein", [144.0, 17.0, 9.0, 3.0]),
        ingredient("beans", "Black Beans", "pantry", [132.0, 8.9, 0.5, 23.7]),
        ingredient("rice", "Rice", "grains", [130.0, 2.7, 0.3, 28.0]),
        ingredient("potato", "Potato", "produce", [87.0, 1.9, 0.1, 20.1]),
        ingredient("broccoli", "Broccoli", "produce", [34.0, 2.8, 0.4, 6.6]),
        ingredient("berries", "Mixed Berries", "produce", [57.0, 0.7, 0.3, 14.5]),
        ingredient("yogurt", "Greek Yogurt", "dairy", [73.0, 10.0, 2.0, 3.9]),
        ingredient("milk", "Milk", "dairy", [61.0, 3.2, 3.3, 4.8]),
        ingredient("oats", "Rolled Oats", "grains", [389.0, 16.9, 6.9, 66.3]),
        ingredient("bread", "Wheat Bread", "grains", [265.0, 9.0, 3.2, 49.0]),
        ingredient("gf_bread", "Gluten-free Bread", "grains", [250.0, 4.0, 5.0, 47.0]),
        ingredient("pasta", "Cooked Pasta", "grains", [158.0, 5.8, 0.9, 31.0]),
        ingredient("gf_pasta", "Rice Pasta", "grains", [150.0, 3.0, 1.5, 31.0]),
    ]
}

fn templates() -> Vec<MealTemplate> {
    vec![
        // Keto, one per slot.
        template(
            "bacon_eggs",
            "Bacon and Eggs with Avocado",
            "breakfast",
            &[("eggs", 150.0), ("bacon", 30.0), ("avocado", 100.0), ("spinach", 60.0), ("butter", 10.0)],
        )
        .with_tags(&["keto", "low-carb"])
        .with_cooking_method("fried")
        .with_prep_time(15),
        template(
            "salmon_salad",
            "Salmon Avocado Salad",
            "lunch",
            &[("salmon", 200.0), ("avocado", 100.0), ("spinach", 100.0), ("olive_oil", 15.0), ("cheese", 20.0)],
        )
        .with_tags(&["keto"])
        .with_prep_time(10),
        template(
            "butter_salmon",
            "Butter Salmon with Spinach",
            "dinner",
            &[("salmon", 220.0), ("butter", 20.0), ("spinach", 200.0), ("almonds", 30.0), ("cheese", 20.0)],
        )
        .with_tags(&["keto"])
        .with_cooking_method("baked")
        .with_prep_time(25),
        // Everyday templates.
        template(
            "oatmeal",
            "Oatmeal with Berries",
            "breakfast",
            &[("oats", 80.0), ("milk", 250.0), ("berries", 100.0)],
        )
        .with_tags(&["vegetarian"])
        .with_cooking_method("boiled"),
        template(
            "toast_eggs",
            "Toast with Eggs",
            "breakfast",
            &[("bread", 100.0), ("eggs", 100.0), ("butter", 5.0)],
        )
        .with_tags(&["vegetarian"]),
        template(
            "yogurt_bowl",
            "Greek Yogurt Bowl",
            "breakfast",
            &[("yogurt", 250.0), ("berries", 100.0), ("almonds", 20.0)],
        )
        .with_tags(&["vegetarian"]),
        template(
            "chicken_rice",
            "Chicken Rice Bowl",
            "lunch",
            &[("chicken", 150.0), ("rice", 200.0), ("broccoli", 100.0), ("olive_oil", 10.0)],
        )
        .with_cooking_method("grilled"),
        template(
            "pasta_primavera",
            "Pasta Primavera",
            "lunch",
            &[("pasta", 250.0), ("chicken", 80.0), ("cheese", 20.0), ("spinach", 100.0), ("olive_oil", 10.0)],
        )
        .with_cuisine("italian")
        .with_cooking_method("boiled"),
        template(
            "burrito_bowl",
            "Bean Burrito Bowl",
            "lunch",
            &[("beans", 200.0), ("rice", 150.0), ("cheese", 30.0), ("avocado", 50.0)],
        )
        .with_tags(&["vegetarian"])
        .with_cuisine("mexican"),
        template(
            "salmon_potatoes",
            "Salmon with Potatoes",
            "dinner",
            &[("salmon", 150.0), ("potato", 250.0), ("broccoli", 100.0), ("butter", 10.0)],
        )
        .with_cooking_method("baked"),
        template(
            "beef_stir_fry",
            "Beef Stir Fry",
            "dinner",
            &[("beef", 150.0), ("rice", 200.0), ("broccoli", 100.0), ("olive_oil", 10.0)],
        )
        .with_cuisine("asian")
        .with_cooking_method("fried"),
        template(
            "tofu_curry",
            "Tofu Curry",
            "dinner",
            &[("tofu", 200.0), ("rice", 200.0), ("spinach", 100.0), ("olive_oil", 10.0)],
        )
        .with_tags(&["vegan", "vegetarian"])
        .with_cuisine("indian"),
    ]
}

/// Fixture catalog: keto and everyday templates for three slots, a gluten
/// allergen list with gluten-free substitutes, and no snack templates.
pub fn catalog() -> NutritionCatalog {
    let mut catalog = NutritionCatalog::new();
    for i in ingredients() {
        catalog = catalog.with_ingredient(i);
    }
    for t in templates() {
        catalog = catalog.with_template(t);
    }

    catalog
        .with_diet(
            DietProfile::new("balanced", "Balanced", MacroSplit::new(25.0, 30.0, 45.0)).unwrap(),
        )
        .with_diet(
            DietProfile::new("keto", "Ketogenic", MacroSplit::new(20.0, 75.0, 5.0))
                .unwrap()
                .with_accepted_tags(&["keto"])
                .with_banned(&["rice", "bread", "pasta", "oats", "potato", "beans"]),
        )
        .with_pattern(
            MealPattern::new(
                "standard",
                vec![
                    MealSlot::new("breakfast", "08:00", 30.0),
                    MealSlot::new("lunch", "12:30", 35.0),
                    MealSlot::new("dinner", "19:00", 35.0),
                ],
            )
            .unwrap(),
        )
        .with_pattern(
            MealPattern::new(
                "with_snack",
                vec![
                    MealSlot::new("breakfast", "08:00", 25.0),
                    MealSlot::new("lunch", "12:30", 30.0),
                    MealSlot::new("snack", "16:00", 15.0),
                    MealSlot::new("dinner", "19:00", 30.0),
                ],
            )
            .unwrap(),
        )
        .with_allergen("gluten", &GLUTEN_INGREDIENTS)
        .with_substitutes("bread", &["gf_bread"])
        .with_substitutes("pasta", &["gf_pasta"])
}

pub fn all_meals(week: &WeekPlan) -> Vec<&GeneratedMeal> {
    week.plans().flat_map(|p| p.meals().iter()).collect()
}
