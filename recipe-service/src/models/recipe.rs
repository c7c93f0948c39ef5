use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /get-recipe`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecipeRequest {
    /// Ingredients the user has on hand, in the order they listed them.
    #[validate(length(min = 1, message = "ingredients must contain at least one item"))]
    pub ingredients: Vec<String>,

    /// Free-form preferences or constraints ("no nuts", "vegetarian").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeResponse {
    /// Markdown-formatted recipe text.
    pub recipe: String,
}
