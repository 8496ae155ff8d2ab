use serde_json::{Map, Value};

use super::RawPayload;
use crate::model::{AnalysisResult, Ingredient, Recipe};
use crate::normalize::{DEFAULT_DIFFICULTY, DEFAULT_PREP_TIME, MAX_RECIPES, UNKNOWN_CATEGORY};

/// Build typed records from untyped JSON entries.
///
/// Entries that are not objects, ingredients without a `name` and recipes
/// without a `title` are skipped. Only the first [`MAX_RECIPES`] usable
/// recipes are kept.
pub(crate) fn extract_fields(payload: RawPayload) -> AnalysisResult {
    let ingredients = payload
        .ingredients
        .iter()
        .filter_map(ingredient_from)
        .collect();

    let recipes = payload
        .recipes
        .iter()
        .filter_map(recipe_from)
        .take(MAX_RECIPES)
        .collect();

    AnalysisResult {
        ingredients,
        recipes,
    }
}

fn ingredient_from(value: &Value) -> Option<Ingredient> {
    let entry = value.as_object()?;
    let name = text_field(entry, "name")?;

    Some(Ingredient {
        name,
        category: text_field(entry, "category").unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
    })
}

fn recipe_from(value: &Value) -> Option<Recipe> {
    let entry = value.as_object()?;
    let title = text_field(entry, "title")?;

    let steps = match entry.get("steps") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|step| !step.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    };

    Some(Recipe {
        title,
        prep_time: text_field(entry, "prep_time").unwrap_or_else(|| DEFAULT_PREP_TIME.to_string()),
        difficulty: text_field(entry, "difficulty")
            .unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string()),
        steps,
    })
}

/// Non-empty text of a scalar field.
///
/// Numbers and booleans are rendered as text, so `{"name": 0}` yields an
/// ingredient named "0". Arrays, objects and null count as missing.
fn text_field(entry: &Map<String, Value>, key: &str) -> Option<String> {
    let text = match entry.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
