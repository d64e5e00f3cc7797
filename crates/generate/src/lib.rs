//! Recipe and guidance generation. A chat-completions client produces
//! recipes and coaching replies when an API key is configured; a
//! deterministic mock generator stands in everywhere else, including eval
//! runs, so output is reproducible offline.

mod llm;
mod mock;
mod snapshot;

pub use llm::{
    apply_regeneration_style, style_instruction, GenerationRequest, GuidanceRequest, RecipeClient,
};
pub use mock::{create_mock_recipe, MockRecipeRequest};
pub use snapshot::format_recipe_snapshot;
