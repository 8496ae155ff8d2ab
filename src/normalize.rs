use crate::model::{AnalysisResult, Ingredient, Recipe};

/// Most recipes returned for one photo
pub const MAX_RECIPES: usize = 3;
pub const UNKNOWN_CATEGORY: &str = "unknown";
pub const DEFAULT_PREP_TIME: &str = "30 minutes";
pub const DEFAULT_DIFFICULTY: &str = "medium";

/// Enforce the result invariants: trimmed text, no nameless ingredients or
/// untitled recipes, defaults for blank optional fields, no blank steps and at
/// most [`MAX_RECIPES`] recipes. Idempotent.
///
/// Recipes without steps are kept as they are.
pub fn normalize(result: AnalysisResult) -> AnalysisResult {
    let ingredients = result
        .ingredients
        .into_iter()
        .filter_map(normalize_ingredient)
        .collect();

    let recipes = result
        .recipes
        .into_iter()
        .filter_map(normalize_recipe)
        .take(MAX_RECIPES)
        .collect();

    AnalysisResult {
        ingredients,
        recipes,
    }
}

fn normalize_ingredient(ingredient: Ingredient) -> Option<Ingredient> {
    let name = non_blank(&ingredient.name)?;
    Some(Ingredient {
        name,
        category: or_default(&ingredient.category, UNKNOWN_CATEGORY),
    })
}

fn normalize_recipe(recipe: Recipe) -> Option<Recipe> {
    let title = non_blank(&recipe.title)?;
    Some(Recipe {
        title,
        prep_time: or_default(&recipe.prep_time, DEFAULT_PREP_TIME),
        difficulty: or_default(&recipe.difficulty, DEFAULT_DIFFICULTY),
        steps: recipe.steps.iter().filter_map(|s| non_blank(s)).collect(),
    })
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn or_default(text: &str, default: &str) -> String {
    non_blank(text).unwrap_or_else(|| default.to_string())
}
