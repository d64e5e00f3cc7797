use crate::embeddings::{cosine_similarity, EmbeddingProvider};
use crate::pack::{CuisinePack, PackLibrary, Snippet};
use crate::tags::infer_tags;
use kitchen_protocol::RegenerationStyle;
use serde::Serialize;
use std::cmp::Ordering;

const SHORTLIST_SIZE: usize = 10;
const SELECTED_SNIPPETS: usize = 4;
const LEXICAL_BLEND: f32 = 0.55;
const SEMANTIC_BLEND: f32 = 0.45;

#[derive(Debug, Clone, Default)]
pub struct KnowledgeInput<'a> {
    pub cuisine: &'a str,
    pub persona_name: &'a str,
    pub prompt: &'a str,
    pub regional_style: Option<&'a str>,
    pub regeneration_style: Option<RegenerationStyle>,
}

/// Prompt-grounding context assembled from one cuisine pack plus the
/// snippets retrieval selected for this request.
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeContext {
    pub cuisine: String,
    pub persona_name: String,
    pub pack_id: String,
    pub pack_version: String,
    pub selected_snippets: Vec<String>,
    pub selected_snippet_ids: Vec<String>,
    pub pantry_anchors: Vec<String>,
    pub technique_rules: Vec<String>,
    pub flavor_pairings: Vec<String>,
    pub signature_dishes: Vec<String>,
    pub substitutions: Vec<String>,
    pub donts: Vec<String>,
}

/// Tag hits dominate the lexical score; prompt words of length >= 4 add a
/// point each when they appear in the snippet text.
fn score_snippet_lexical(snippet: &Snippet, tags: &[String], prompt: &str) -> f32 {
    let mut score = 0.0;
    for tag in tags {
        if snippet.tags.iter().any(|t| t == tag) {
            score += 3.0;
        }
    }

    let snippet_text = snippet.text.to_lowercase();
    for word in prompt
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| w.len() >= 4)
    {
        if snippet_text.contains(word) {
            score += 1.0;
        }
    }

    score
}

fn sort_by_score_desc<T>(items: &mut [(T, f32)]) {
    items.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
}

async fn rerank_by_embedding<'a>(
    embedder: &dyn EmbeddingProvider,
    query: &str,
    shortlist: Vec<(&'a Snippet, f32)>,
) -> Vec<&'a Snippet> {
    let Some(query_vector) = embedder.embed(query).await else {
        log::debug!("query embedding unavailable, keeping lexical order");
        let mut shortlist = shortlist;
        sort_by_score_desc(&mut shortlist);
        return shortlist.into_iter().map(|(s, _)| s).collect();
    };

    let max_lexical = shortlist
        .iter()
        .map(|(_, score)| *score)
        .fold(1.0_f32, f32::max);

    let mut scored = Vec::with_capacity(shortlist.len());
    for (snippet, lexical) in shortlist {
        let semantic = match embedder.embed(&snippet.text).await {
            Some(vector) => cosine_similarity(&query_vector, &vector).max(0.0),
            None => 0.0,
        };
        let blended = (lexical / max_lexical) * LEXICAL_BLEND + semantic * SEMANTIC_BLEND;
        scored.push((snippet, blended));
    }

    sort_by_score_desc(&mut scored);
    scored.into_iter().map(|(s, _)| s).collect()
}

/// Build the knowledge context for a generation request. With an embedder,
/// the lexical shortlist is reranked by blended lexical + semantic score;
/// without one the shortlist order stands.
pub async fn build_context(
    library: &PackLibrary,
    input: &KnowledgeInput<'_>,
    embedder: Option<&dyn EmbeddingProvider>,
) -> KnowledgeContext {
    let pack = library.resolve(input.cuisine);
    let tags = infer_tags(input.prompt, input.regional_style, input.regeneration_style);

    let mut candidates: Vec<(&Snippet, f32)> = pack
        .snippets
        .iter()
        .map(|snippet| (snippet, score_snippet_lexical(snippet, &tags, input.prompt)))
        .collect();
    sort_by_score_desc(&mut candidates);
    candidates.truncate(SHORTLIST_SIZE);

    let reranked: Vec<&Snippet> = match embedder {
        Some(embedder) => {
            let query = rerank_query(input, pack);
            rerank_by_embedding(embedder, &query, candidates).await
        }
        None => candidates.into_iter().map(|(s, _)| s).collect(),
    };

    let selected: Vec<&Snippet> = reranked.into_iter().take(SELECTED_SNIPPETS).collect();
    log::debug!(
        "selected {} snippets from pack {} for tags {:?}",
        selected.len(),
        pack.id,
        tags
    );

    KnowledgeContext {
        cuisine: pack.cuisine.clone(),
        persona_name: input.persona_name.to_string(),
        pack_id: pack.id.clone(),
        pack_version: pack.version.clone(),
        selected_snippets: selected.iter().map(|s| s.text.clone()).collect(),
        selected_snippet_ids: selected.iter().map(|s| s.id.clone()).collect(),
        pantry_anchors: pack.pantry_anchors.clone(),
        technique_rules: pack.technique_rules.clone(),
        flavor_pairings: pack.flavor_pairings.clone(),
        signature_dishes: pack.signature_dishes.clone(),
        substitutions: pack.substitutions.clone(),
        donts: pack.donts.clone(),
    }
}

fn rerank_query(input: &KnowledgeInput<'_>, pack: &CuisinePack) -> String {
    let mut parts = vec![input.prompt.to_string()];
    if let Some(style) = input.regional_style {
        parts.push(format!("Regional style: {style}"));
    }
    parts.push(format!("Cuisine: {}", pack.cuisine));
    parts.join("\n")
}

impl KnowledgeContext {
    /// Render the fixed prompt block the recipe generator feeds the model.
    pub fn format_for_prompt(&self) -> String {
        [
            format!("Cuisine knowledge pack id: {}", self.pack_id),
            format!("Cuisine knowledge pack version: {}", self.pack_version),
            format!("Cuisine knowledge pack: {}", self.cuisine),
            format!("Pantry anchors: {}", self.pantry_anchors.join("; ")),
            format!("Technique rules: {}", self.technique_rules.join("; ")),
            format!("Flavor pairings: {}", self.flavor_pairings.join("; ")),
            format!("Signature dishes: {}", self.signature_dishes.join("; ")),
            format!("Substitutions: {}", self.substitutions.join("; ")),
            format!("Avoid: {}", self.donts.join("; ")),
            format!(
                "Top matched memory snippets: {}",
                self.selected_snippets.join(" | ")
            ),
        ]
        .join("\n")
    }
}
