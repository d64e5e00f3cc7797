use kitchen_protocol::Recipe;
use serde::{Deserialize, Serialize};

/// Per-dimension rubric result, each dimension 0..=100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricScore {
    pub total: f64,
    pub realism: f64,
    pub structure: f64,
    pub grandma: f64,
    pub speed_alignment: f64,
    pub notes: String,
}

const STRUCTURE_WEIGHT: f64 = 0.25;
const REALISM_WEIGHT: f64 = 0.3;
const GRANDMA_WEIGHT: f64 = 0.3;
const SPEED_WEIGHT: f64 = 0.15;

fn clamp(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Target cook time implied by the prompt, when it implies one.
fn speed_target(prompt: &str) -> Option<u32> {
    let text = prompt.to_lowercase();
    if text.contains("30-minute")
        || text.contains("30 minute")
        || text.contains("quick")
        || text.contains("weeknight")
    {
        return Some(30);
    }
    if text.contains("sunday") || text.contains("slow") || text.contains("comfort") {
        return Some(60);
    }
    None
}

fn regional_tokens(prompt: &str) -> Vec<&'static str> {
    let text = prompt.to_lowercase();
    let mut tokens = Vec::new();
    if text.contains("sicilian") {
        tokens.push("sicilian");
    }
    if text.contains("neapolitan") || text.contains("naples") {
        tokens.push("neapolitan");
    }
    if text.contains("italian-american") || text.contains("new york") {
        tokens.push("italian-american");
    }
    if text.contains("oaxacan") {
        tokens.push("oaxacan");
    }
    tokens
}

fn auth_tokens(cuisine: &str) -> Option<&'static [&'static str]> {
    let tokens: &'static [&'static str] = match cuisine {
        "italian" => &["soffritto", "ragu", "passata", "basil", "pecorino", "parmigiano", "olive oil"],
        "mexican" => &["chile", "cilantro", "lime", "beans", "tomato", "comal", "guisado"],
        "greek" => &["lemon", "oregano", "olive oil", "feta", "dill", "fasolada"],
        "spanish" => &["sofrito", "paprika", "saffron", "olive oil", "cocido", "paella"],
        "french" => &["shallot", "butter", "thyme", "ragout", "potage"],
        "lebanese" => &["lemon", "mint", "parsley", "chickpea", "lentil", "warm spices"],
        "persian" => &["saffron", "turmeric", "dried lime", "pomegranate", "walnut", "tahdig"],
        _ => return None,
    };
    Some(tokens)
}

const SCORED_CUISINES: [&str; 7] = [
    "italian", "mexican", "greek", "spanish", "french", "lebanese", "persian",
];

/// Score a recipe against the prompt that produced it.
pub fn score_recipe(prompt: &str, recipe: &Recipe) -> RubricScore {
    let mut notes: Vec<&'static str> = Vec::new();

    let mut structure = 100.0;
    if recipe.ingredients.len() < 5 {
        structure -= 20.0;
        notes.push("low ingredient count");
    }
    if recipe.steps.len() < 4 {
        structure -= 20.0;
        notes.push("few steps");
    }
    if recipe.grandma_tips.len() < 2 {
        structure -= 15.0;
        notes.push("few grandma tips");
    }

    let mut realism = 100.0;
    if recipe.total_minutes < 15 {
        realism -= 20.0;
        notes.push("time may be too short");
    }
    if recipe.total_minutes > 180 {
        realism -= 20.0;
        notes.push("time may be too long");
    }

    let mut grandma = 70.0;
    let tips_text = recipe.grandma_tips.join(" ").to_lowercase();
    let title_text = recipe.title.to_lowercase();
    let cuisine_text = recipe.cuisine.to_lowercase();
    let recipe_text = format!(
        "{} {} {}",
        recipe.title,
        recipe.steps.join(" "),
        recipe.grandma_tips.join(" ")
    )
    .to_lowercase();

    if tips_text.contains("taste") || tips_text.contains("season") {
        grandma += 10.0;
    }
    if tips_text.contains("slow") || tips_text.contains("aromatic") {
        grandma += 10.0;
    }
    if tips_text.contains("serve") || tips_text.contains("table") {
        grandma += 10.0;
    }
    if title_text.contains("family")
        || title_text.contains("sunday")
        || title_text.contains("village")
        || title_text.contains("rustic")
    {
        grandma += 8.0;
    }
    if title_text.contains("grandma kitchen skillet") {
        grandma -= 12.0;
        notes.push("generic title");
    }

    let prompt_regional = regional_tokens(prompt);
    if !prompt_regional.is_empty()
        && !prompt_regional
            .iter()
            .any(|token| recipe_text.contains(token))
    {
        realism -= 15.0;
        grandma -= 10.0;
        notes.push("regional cue missing");
    }

    if let Some(expected) = auth_tokens(&cuisine_text) {
        let matches = expected
            .iter()
            .filter(|token| recipe_text.contains(*token))
            .count();
        if matches < 2 {
            realism -= 12.0;
            grandma -= 8.0;
            notes.push("authenticity_weak");
        } else if matches >= 4 {
            grandma += 6.0;
        }
    }

    if cuisine_text.len() > 2 {
        let prompt_text = prompt.to_lowercase();
        let mentions_other = SCORED_CUISINES
            .iter()
            .any(|cuisine| prompt_text.contains(cuisine));
        if mentions_other && !prompt_text.contains(&cuisine_text) {
            realism -= 5.0;
            notes.push("cuisine mismatch risk");
        }
    }

    let mut speed = 85.0;
    if let Some(target) = speed_target(prompt) {
        let diff = (f64::from(recipe.total_minutes) - f64::from(target)).abs();
        speed = clamp(100.0 - diff * 2.0);
        if diff > 15.0 {
            notes.push("time misaligned with prompt");
        }
    }

    let structure = clamp(structure);
    let realism = clamp(realism);
    let grandma = clamp(grandma);
    let speed = clamp(speed);
    let total = clamp(
        structure * STRUCTURE_WEIGHT
            + realism * REALISM_WEIGHT
            + grandma * GRANDMA_WEIGHT
            + speed * SPEED_WEIGHT,
    );

    RubricScore {
        total: round2(total),
        realism: round2(realism),
        structure: round2(structure),
        grandma: round2(grandma),
        speed_alignment: round2(speed),
        notes: notes.join(", "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitchen_protocol::Ingredient;
    use pretty_assertions::assert_eq;

    fn recipe(title: &str, cuisine: &str, minutes: u32) -> Recipe {
        Recipe {
            title: title.to_string(),
            cuisine: cuisine.to_string(),
            servings: 4,
            total_minutes: minutes,
            ingredients: (0..5)
                .map(|i| Ingredient::new("1 cup", format!("item-{i}")))
                .collect(),
            steps: (0..4).map(|i| format!("Do the thing number {i}.")).collect(),
            grandma_tips: vec!["First tip.".to_string(), "Second tip.".to_string()],
        }
    }

    #[test]
    fn strong_italian_recipe_scores_full_marks() {
        let mut r = recipe("Family Pasta Sunday", "Italian", 30);
        r.steps = vec![
            "Build the soffritto slowly in olive oil.".to_string(),
            "Add the ragu base and tear in basil.".to_string(),
            "Simmer until thick.".to_string(),
            "Finish with parmigiano.".to_string(),
        ];
        r.grandma_tips = vec![
            "Taste as you go and cook the aromatics slow.".to_string(),
            "Serve family-style at the table.".to_string(),
        ];

        let score = score_recipe("quick weeknight dinner", &r);
        assert_eq!(score.structure, 100.0);
        assert_eq!(score.realism, 100.0);
        assert_eq!(score.grandma, 100.0);
        assert_eq!(score.speed_alignment, 100.0);
        assert_eq!(score.total, 100.0);
        assert_eq!(score.notes, "");
    }

    #[test]
    fn missing_authenticity_tokens_flag_the_recipe() {
        let score = score_recipe("dinner tonight", &recipe("Plain Dinner", "Italian", 35));
        assert!(score.notes.contains("authenticity_weak"));
        assert_eq!(score.realism, 88.0);
        assert_eq!(score.grandma, 62.0);
        assert_eq!(score.total, 82.75);
    }

    #[test]
    fn regional_cue_ignored_is_penalized() {
        let score = score_recipe(
            "sicilian pasta like my grandma made",
            &recipe("Plain Dinner", "Italian", 35),
        );
        assert!(score.notes.contains("regional cue missing"));
        // Regional and authenticity penalties stack.
        assert_eq!(score.realism, 73.0);
        assert_eq!(score.grandma, 52.0);
    }

    #[test]
    fn speed_alignment_tracks_prompt_target() {
        let quick = score_recipe("quick dinner", &recipe("Plain Dinner", "Home Style", 30));
        assert_eq!(quick.speed_alignment, 100.0);

        let slow = score_recipe("quick dinner", &recipe("Plain Dinner", "Home Style", 60));
        assert_eq!(slow.speed_alignment, 40.0);
        assert!(slow.notes.contains("time misaligned with prompt"));

        let untargeted = score_recipe("dinner", &recipe("Plain Dinner", "Home Style", 60));
        assert_eq!(untargeted.speed_alignment, 85.0);
    }

    #[test]
    fn generic_title_is_penalized() {
        let score = score_recipe("dinner", &recipe("Grandma Kitchen Skillet", "Home Style", 35));
        assert!(score.notes.contains("generic title"));
        assert_eq!(score.grandma, 58.0);
    }

    #[test]
    fn cuisine_mismatch_risk_noted() {
        let score = score_recipe(
            "I want greek flavors tonight",
            &recipe("Plain Dinner", "Italian", 35),
        );
        assert!(score.notes.contains("cuisine mismatch risk"));
    }

    #[test]
    fn sparse_recipes_lose_structure_points() {
        let mut r = recipe("Plain Dinner", "Home Style", 35);
        r.ingredients.truncate(3);
        r.steps.truncate(2);
        r.grandma_tips.truncate(1);
        let score = score_recipe("dinner", &r);
        assert_eq!(score.structure, 45.0);
        assert!(score.notes.contains("low ingredient count"));
        assert!(score.notes.contains("few steps"));
        assert!(score.notes.contains("few grandma tips"));
    }
}
