use serde::{Deserialize, Serialize};

/// A food item the model reported as visible in the photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    /// Free-form grouping such as "vegetable" or "protein"
    pub category: String,
}

/// A recipe suggestion built from the detected ingredients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    pub prep_time: String,
    pub difficulty: String,
    /// Ordered cooking instructions. May be empty when the model gave none.
    pub steps: Vec<String>,
}

/// Outcome of analyzing one photo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
}

impl AnalysisResult {
    /// True when neither ingredients nor recipes were recovered
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty() && self.recipes.is_empty()
    }
}
