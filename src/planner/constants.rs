use std::ops::RangeInclusive;

// ─────────────────────────────────────────────────────────────────────────────
// Nutrition score
// ─────────────────────────────────────────────────────────────────────────────

/// Weight of calorie accuracy in the nutrition score.
pub const CALORIE_WEIGHT: f64 = 0.4;

/// Weight of macro-percentage accuracy in the nutrition score.
pub const MACRO_WEIGHT: f64 = 0.6;

/// Day score at which the assembler stops retrying.
pub const ACCEPT_SCORE: f64 = 88.0;

/// Score at which the scale optimizer and local search stop early.
pub const CONVERGE_SCORE: f64 = 95.0;

// ─────────────────────────────────────────────────────────────────────────────
// Day assembly
// ─────────────────────────────────────────────────────────────────────────────

/// Maximum full-day attempts.
pub const MAX_DAY_ATTEMPTS: usize = 15;

/// Ranked candidates scaled per slot.
pub const CANDIDATES_PER_SLOT: usize = 5;

/// Flat ranking bonus for a cuisine not yet used today (percentage points).
pub const CUISINE_NOVELTY_BONUS: f64 = 5.0;

/// Per-meal portion sanity bounds in grams.
pub const PROTEIN_BOUNDS: (f64, f64) = (20.0, 300.0);
pub const CARB_BOUNDS: (f64, f64) = (10.0, 150.0);
pub const FAT_BOUNDS: (f64, f64) = (5.0, 100.0);

// ─────────────────────────────────────────────────────────────────────────────
// Meal scale optimizer
// ─────────────────────────────────────────────────────────────────────────────

/// Template-level scale bounds.
pub const SCALE_MIN: f64 = 0.1;
pub const SCALE_MAX: f64 = 10.0;

pub const SCALE_MAX_ITERATIONS: usize = 20;

/// Rounds without improvement before giving up.
pub const SCALE_STAGNATION_ROUNDS: usize = 5;

pub const SCALE_LEARNING_RATE: f64 = 0.1;
pub const SCALE_MOMENTUM: f64 = 0.9;

/// Relative perturbation for finite-difference gradients.
pub const SCALE_DIFF_STEP: f64 = 0.01;

/// Progress (score points) expected per check window before boosting the rate.
pub const SCALE_MIN_PROGRESS: f64 = 5.0;

/// Rounds between progress checks.
pub const SCALE_PROGRESS_WINDOW: usize = 5;

/// Learning-rate boost on poor progress, and its ceiling.
pub const SCALE_RATE_BOOST: f64 = 1.5;
pub const SCALE_RATE_CEILING: f64 = 0.5;

// ─────────────────────────────────────────────────────────────────────────────
// Day refiner
// ─────────────────────────────────────────────────────────────────────────────

pub const LOCAL_SEARCH_ITERATIONS: usize = 50;

/// Relative step of the local search (±5%).
pub const LOCAL_SEARCH_STEP: f64 = 0.05;

pub const LOCAL_SEARCH_BOUNDS: (f64, f64) = (0.7, 1.3);

pub const REBALANCE_ITERATIONS: usize = 100;

/// Standard deviation of the joint Gaussian perturbation.
pub const REBALANCE_SIGMA: f64 = 0.05;

pub const REBALANCE_BOUNDS: (f64, f64) = (0.6, 1.4);

// ─────────────────────────────────────────────────────────────────────────────
// Filters and variety
// ─────────────────────────────────────────────────────────────────────────────

/// Days before a template may be reused.
pub const COOLDOWN_DAYS: u32 = 5;

/// Candidates the recency filter tries to keep before relaxing.
pub const MIN_RECENCY_CANDIDATES: usize = 3;

/// Cooldown below which relaxation stops.
pub const MIN_COOLDOWN_DAYS: u32 = 2;

/// Candidates the cuisine filter backfills up to.
pub const MIN_CUISINE_CANDIDATES: usize = 5;

/// Tag (or cuisine) used to backfill the cuisine filter.
pub const STANDARD_TAG: &str = "standard";

/// Cooking-method filter is skipped below this many survivors.
pub const MIN_METHOD_CANDIDATES: usize = 3;

// ─────────────────────────────────────────────────────────────────────────────
// Nutrition validation
// ─────────────────────────────────────────────────────────────────────────────

/// Plausible cooked/raw mass ratio.
pub const YIELD_RANGE: RangeInclusive<f64> = 0.1..=5.0;

/// Per-100 g ceilings for a single ingredient.
pub const MAX_INGREDIENT_CALORIES: f64 = 900.0;
pub const MAX_INGREDIENT_MACRO: f64 = 100.0;

/// Ceilings for a whole meal.
pub const MAX_MEAL_CALORIES: f64 = 5000.0;
pub const MAX_MEAL_PROTEIN: f64 = 500.0;

/// Accepted ratio of stated to macro-derived calories for a meal.
pub const CALORIE_CONSISTENCY_RANGE: RangeInclusive<f64> = 0.5..=2.0;

// ─────────────────────────────────────────────────────────────────────────────
// Shopping list
// ─────────────────────────────────────────────────────────────────────────────

/// Default per-ingredient ceiling in grams.
pub const SHOPPING_CEILING_GRAMS: f64 = 5000.0;

pub const GRAMS_PER_OUNCE: f64 = 28.349_523_125;
pub const GRAMS_PER_POUND: f64 = 453.592_37;
