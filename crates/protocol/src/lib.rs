//! Shared recipe types and validation used across the Grandma's Kitchen
//! workspace: the `Recipe` document itself, the regeneration style enum,
//! and the bounds every generated recipe must satisfy before it is served
//! or scored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecipeError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecipeError {
    #[error("Recipe.title is invalid")]
    InvalidTitle,

    #[error("Recipe.cuisine is invalid")]
    InvalidCuisine,

    #[error("Recipe.servings is invalid")]
    InvalidServings,

    #[error("Recipe.totalMinutes is invalid")]
    InvalidTotalMinutes,

    #[error("Recipe.ingredients are invalid")]
    InvalidIngredients,

    #[error("Recipe.steps are invalid")]
    InvalidSteps,

    #[error("Recipe.grandmaTips are invalid")]
    InvalidGrandmaTips,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub amount: String,
    pub item: String,
}

impl Ingredient {
    pub fn new(amount: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            item: item.into(),
        }
    }
}

/// A generated recipe. Field names stay camelCase on the wire so output is
/// interchangeable with the model API's JSON responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub title: String,
    pub cuisine: String,
    pub servings: u32,
    pub total_minutes: u32,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<String>,
    pub grandma_tips: Vec<String>,
}

impl Recipe {
    /// Bounds check for generated output. Model responses must pass this
    /// before they replace the deterministic fallback.
    pub fn validate(&self) -> Result<()> {
        if self.title.len() < 3 {
            return Err(RecipeError::InvalidTitle);
        }
        if self.cuisine.len() < 2 {
            return Err(RecipeError::InvalidCuisine);
        }
        if self.servings < 1 || self.servings > 20 {
            return Err(RecipeError::InvalidServings);
        }
        if self.total_minutes < 5 || self.total_minutes > 600 {
            return Err(RecipeError::InvalidTotalMinutes);
        }
        if self.ingredients.len() < 3
            || self.ingredients.len() > 30
            || self
                .ingredients
                .iter()
                .any(|i| i.amount.is_empty() || i.item.is_empty())
        {
            return Err(RecipeError::InvalidIngredients);
        }
        if self.steps.len() < 2 || self.steps.len() > 20 || self.steps.iter().any(String::is_empty)
        {
            return Err(RecipeError::InvalidSteps);
        }
        if self.grandma_tips.is_empty()
            || self.grandma_tips.len() > 8
            || self.grandma_tips.iter().any(String::is_empty)
        {
            return Err(RecipeError::InvalidGrandmaTips);
        }
        Ok(())
    }

    /// Parse and validate a raw JSON value, typically a model response body.
    pub fn from_json(raw: &serde_json::Value) -> Result<Self> {
        let recipe: Recipe =
            serde_json::from_value(raw.clone()).map_err(|_| RecipeError::InvalidTitle)?;
        recipe.validate()?;
        Ok(recipe)
    }
}

/// Fixed set of regeneration directions a user can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegenerationStyle {
    Faster,
    Traditional,
    Vegetarian,
}

impl RegenerationStyle {
    pub const ALL: [RegenerationStyle; 3] = [
        RegenerationStyle::Faster,
        RegenerationStyle::Traditional,
        RegenerationStyle::Vegetarian,
    ];

    /// Strict string parse; unknown values are `None` rather than an error
    /// so request plumbing can ignore them.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "faster" => Some(Self::Faster),
            "traditional" => Some(Self::Traditional),
            "vegetarian" => Some(Self::Vegetarian),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Faster => "faster",
            Self::Traditional => "traditional",
            Self::Vegetarian => "vegetarian",
        }
    }
}

impl std::fmt::Display for RegenerationStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_recipe() -> Recipe {
        Recipe {
            title: "Sunday Gravy Spaghetti".to_string(),
            cuisine: "Italian".to_string(),
            servings: 4,
            total_minutes: 45,
            ingredients: vec![
                Ingredient::new("2 tbsp", "extra-virgin olive oil"),
                Ingredient::new("1 cup", "onion and garlic"),
                Ingredient::new("1.5 cups", "crushed tomatoes"),
            ],
            steps: vec![
                "Build the soffritto slowly.".to_string(),
                "Simmer until cohesive.".to_string(),
            ],
            grandma_tips: vec!["Taste and adjust before serving.".to_string()],
        }
    }

    #[test]
    fn valid_recipe_passes() {
        assert_eq!(sample_recipe().validate(), Ok(()));
    }

    #[test]
    fn servings_out_of_range_rejected() {
        let mut recipe = sample_recipe();
        recipe.servings = 0;
        assert_eq!(recipe.validate(), Err(RecipeError::InvalidServings));
        recipe.servings = 21;
        assert_eq!(recipe.validate(), Err(RecipeError::InvalidServings));
    }

    #[test]
    fn minutes_out_of_range_rejected() {
        let mut recipe = sample_recipe();
        recipe.total_minutes = 4;
        assert_eq!(recipe.validate(), Err(RecipeError::InvalidTotalMinutes));
        recipe.total_minutes = 601;
        assert_eq!(recipe.validate(), Err(RecipeError::InvalidTotalMinutes));
    }

    #[test]
    fn too_few_ingredients_rejected() {
        let mut recipe = sample_recipe();
        recipe.ingredients.truncate(2);
        assert_eq!(recipe.validate(), Err(RecipeError::InvalidIngredients));
    }

    #[test]
    fn empty_tip_rejected() {
        let mut recipe = sample_recipe();
        recipe.grandma_tips = vec![String::new()];
        assert_eq!(recipe.validate(), Err(RecipeError::InvalidGrandmaTips));
    }

    #[test]
    fn regeneration_style_round_trips_lowercase() {
        for style in RegenerationStyle::ALL {
            assert_eq!(RegenerationStyle::parse(style.as_str()), Some(style));
        }
        assert_eq!(RegenerationStyle::parse("Faster"), None);
        assert_eq!(RegenerationStyle::parse("spicier"), None);
    }

    #[test]
    fn recipe_serializes_camel_case() {
        let json = serde_json::to_value(sample_recipe()).unwrap();
        assert!(json.get("totalMinutes").is_some());
        assert!(json.get("grandmaTips").is_some());
    }
}
