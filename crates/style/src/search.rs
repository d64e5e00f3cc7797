use crate::catalog::{StyleCatalog, StyleEntry};
use crate::signals::normalize_text;
use serde::Serialize;

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 50;

#[derive(Debug, Clone, Default)]
pub struct StyleQuery<'a> {
    pub query: Option<&'a str>,
    pub cuisine: Option<&'a str>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StyleMatch {
    pub id: String,
    pub label: String,
    pub cuisine: String,
    pub region: Option<String>,
    pub aliases: Vec<String>,
}

/// Lexical catalog lookup: prefix hits on label/region/cuisine/alias rank
/// above substring hits, ties fall back to cuisine then label order.
pub fn search_styles(catalog: &StyleCatalog, query: &StyleQuery) -> Vec<StyleMatch> {
    let q = query.query.map(normalize_text).filter(|q| !q.is_empty());
    let cuisine_filter = query
        .cuisine
        .map(normalize_text)
        .filter(|c| !c.is_empty());
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let mut scored: Vec<(i32, &StyleEntry)> = catalog
        .styles()
        .iter()
        .filter(|entry| match &cuisine_filter {
            Some(filter) => normalize_text(&entry.cuisine).contains(filter.as_str()),
            None => true,
        })
        .filter_map(|entry| match &q {
            None => Some((0, entry)),
            Some(q) => {
                let rank = rank_entry(entry, q);
                (rank > 0).then_some((rank, entry))
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| a.1.cuisine.cmp(&b.1.cuisine))
            .then_with(|| a.1.label.cmp(&b.1.label))
    });

    scored
        .into_iter()
        .take(limit)
        .map(|(_, entry)| StyleMatch {
            id: entry.id.clone(),
            label: entry.label.clone(),
            cuisine: entry.cuisine.clone(),
            region: entry.region.clone(),
            aliases: entry.aliases.clone(),
        })
        .collect()
}

fn rank_entry(entry: &StyleEntry, q: &str) -> i32 {
    let label = normalize_text(&entry.label);
    let region = normalize_text(entry.region.as_deref().unwrap_or(""));
    let cuisine = normalize_text(&entry.cuisine);

    let mut rank = 0;
    if label.starts_with(q) {
        rank += 5;
    }
    if !region.is_empty() && region.starts_with(q) {
        rank += 4;
    }
    if cuisine.starts_with(q) {
        rank += 3;
    }
    if entry
        .aliases
        .iter()
        .any(|alias| normalize_text(alias).starts_with(q))
    {
        rank += 2;
    }
    if label.contains(q) {
        rank += 1;
    }

    // Substring hits anywhere still qualify, at the lowest rank.
    if rank == 0
        && (region.contains(q)
            || cuisine.contains(q)
            || entry
                .aliases
                .iter()
                .any(|alias| normalize_text(alias).contains(q)))
    {
        rank = 1;
    }

    rank
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prefix_label_outranks_substring() {
        let catalog = StyleCatalog::builtin();
        let results = search_styles(
            &catalog,
            &StyleQuery {
                query: Some("sicilian"),
                ..Default::default()
            },
        );
        assert!(!results.is_empty());
        assert_eq!(results[0].id, "it-sicilian");
    }

    #[test]
    fn cuisine_filter_restricts_results() {
        let catalog = StyleCatalog::builtin();
        let results = search_styles(
            &catalog,
            &StyleQuery {
                cuisine: Some("mexican"),
                ..Default::default()
            },
        );
        assert!(!results.is_empty());
        assert!(results.iter().all(|m| m.cuisine == "Mexican"));
    }

    #[test]
    fn limit_clamps_to_bounds() {
        let catalog = StyleCatalog::builtin();
        let results = search_styles(
            &catalog,
            &StyleQuery {
                limit: Some(0),
                ..Default::default()
            },
        );
        assert_eq!(results.len(), 1);

        let results = search_styles(
            &catalog,
            &StyleQuery {
                limit: Some(500),
                ..Default::default()
            },
        );
        assert!(results.len() <= 50);
    }

    #[test]
    fn no_query_lists_catalog_order() {
        let catalog = StyleCatalog::builtin();
        let results = search_styles(&catalog, &StyleQuery::default());
        assert_eq!(results.len(), catalog.len().min(20));
        assert_eq!(results[0].cuisine, "Chinese");
    }

    #[test]
    fn alias_search_finds_paella() {
        let catalog = StyleCatalog::builtin();
        let results = search_styles(
            &catalog,
            &StyleQuery {
                query: Some("paella"),
                ..Default::default()
            },
        );
        assert!(results.iter().any(|m| m.id == "es-valencian"));
    }
}
