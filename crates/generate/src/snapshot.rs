use kitchen_protocol::Recipe;

const SNAPSHOT_INGREDIENTS: usize = 10;
const SNAPSHOT_STEPS: usize = 4;

/// Compact recipe summary fed into guidance prompts so the coach can anchor
/// its replies to the dish actually being cooked.
pub fn format_recipe_snapshot(recipe: &Recipe) -> String {
    let ingredients = recipe
        .ingredients
        .iter()
        .take(SNAPSHOT_INGREDIENTS)
        .map(|item| format!("{} {}", item.amount, item.item))
        .collect::<Vec<_>>()
        .join(", ");
    let steps = recipe
        .steps
        .iter()
        .take(SNAPSHOT_STEPS)
        .cloned()
        .collect::<Vec<_>>()
        .join(" | ");

    [
        format!("Current recipe: {} ({})", recipe.title, recipe.cuisine),
        format!(
            "Servings: {}, Total minutes: {}",
            recipe.servings, recipe.total_minutes
        ),
        format!(
            "Ingredients: {}",
            if ingredients.is_empty() {
                "n/a"
            } else {
                ingredients.as_str()
            }
        ),
        format!(
            "Key steps: {}",
            if steps.is_empty() { "n/a" } else { steps.as_str() }
        ),
    ]
    .join("\n")
}
