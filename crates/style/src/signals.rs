use once_cell::sync::Lazy;
use regex::Regex;

/// One keyword signal tying free text to a cuisine. Weights favor
/// family terms (nonna, abuelita) over bare cuisine names.
struct CuisineSignal {
    cuisine: &'static str,
    pattern: Regex,
    weight: f32,
    tag: &'static str,
}

fn signal(cuisine: &'static str, pattern: &str, weight: f32, tag: &'static str) -> CuisineSignal {
    CuisineSignal {
        cuisine,
        pattern: Regex::new(pattern).expect("static signal pattern"),
        weight,
        tag,
    }
}

static CUISINE_SIGNALS: Lazy<Vec<CuisineSignal>> = Lazy::new(|| {
    vec![
        signal("Italian", r"(?i)\bnonna\b", 10.0, "nonna"),
        signal("Italian", r"(?i)\bnonno\b", 8.0, "nonno"),
        signal("Italian", r"(?i)\bitalian\b", 5.0, "italian"),
        signal("Italian", r"(?i)\bragu\b", 5.0, "ragu"),
        signal("Italian", r"(?i)\bpasta\b", 4.0, "pasta"),
        signal("Spanish", r"(?i)\babuela\b", 9.0, "abuela"),
        signal("Spanish", r"(?i)\bpaella\b", 10.0, "paella"),
        signal("Spanish", r"(?i)\bspanish\b", 5.0, "spanish"),
        signal("Mexican", r"(?i)\babuelita\b", 10.0, "abuelita"),
        signal("Mexican", r"(?i)\bmole\b", 7.0, "mole"),
        signal("Mexican", r"(?i)\bpozole\b", 7.0, "pozole"),
        signal("Mexican", r"(?i)\bmexican\b", 5.0, "mexican"),
        signal("Greek", r"(?i)\byiayia\b", 10.0, "yiayia"),
        signal("Greek", r"(?i)\bmoussaka\b", 7.0, "moussaka"),
        signal("Greek", r"(?i)\bspanakopita\b", 7.0, "spanakopita"),
        signal("Greek", r"(?i)\bgreek\b", 5.0, "greek"),
        signal("French", r"(?i)\bmamie\b", 9.0, "mamie"),
        signal("French", r"(?i)\bcoq au vin\b", 8.0, "coq-au-vin"),
        signal("French", r"(?i)\bfrench\b", 5.0, "french"),
        signal("Lebanese", r"(?i)\bteta\b", 9.0, "teta"),
        signal("Lebanese", r"(?i)\blebanese\b", 5.0, "lebanese"),
        signal("Persian", r"(?i)\bmaman\b", 8.0, "maman"),
        signal("Persian", r"(?i)\bpersian\b", 5.0, "persian"),
        signal("Chinese", r"(?i)\bnai nai\b", 9.0, "nai-nai"),
        signal("Chinese", r"(?i)\bcantonese\b", 8.0, "cantonese"),
        signal("Chinese", r"(?i)\bchinese\b", 5.0, "chinese"),
        signal("Indian", r"(?i)\bdadi\b", 9.0, "dadi"),
        signal("Indian", r"(?i)\bindian\b", 5.0, "indian"),
        signal("Japanese", r"(?i)\bobaachan\b", 9.0, "obaachan"),
        signal("Japanese", r"(?i)\bjapanese\b", 5.0, "japanese"),
        signal("Jamaican", r"(?i)\bjerk\b", 7.0, "jerk"),
        signal("Jamaican", r"(?i)\bjamaican\b", 5.0, "jamaican"),
    ]
});

/// Outcome of keyword detection: the leading cuisine, its score lead over
/// the runner-up, and the matched tags.
#[derive(Debug, Clone, Default)]
pub struct CuisineSignalHit {
    pub cuisine: Option<String>,
    pub score_lead: f32,
    pub tags: Vec<String>,
}

pub fn detect_cuisine_signal(text: &str) -> CuisineSignalHit {
    let mut scores: Vec<(&str, f32)> = Vec::new();
    let mut tags: Vec<String> = Vec::new();

    for signal in CUISINE_SIGNALS.iter() {
        if signal.pattern.is_match(text) {
            match scores.iter_mut().find(|(c, _)| *c == signal.cuisine) {
                Some((_, score)) => *score += signal.weight,
                None => scores.push((signal.cuisine, signal.weight)),
            }
            if !tags.iter().any(|t| t == signal.tag) {
                tags.push(signal.tag.to_string());
            }
        }
    }

    if scores.is_empty() {
        return CuisineSignalHit::default();
    }

    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let lead = scores[0].1 - scores.get(1).map(|(_, s)| *s).unwrap_or(0.0);

    CuisineSignalHit {
        cuisine: Some(scores[0].0.to_string()),
        score_lead: lead,
        tags,
    }
}

/// A region mention strong enough to override plain cuisine matching.
#[derive(Debug, Clone)]
pub struct RegionalOverride {
    pub cuisine: &'static str,
    pub region_hints: &'static [&'static str],
    pub tag: &'static str,
}

static NEAPOLITAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(neapolitan|napoli|naples)\b").expect("static pattern"));
static SICILIAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(sicilian|sicily)\b").expect("static pattern"));
static OAXACAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(oaxacan|oaxaca)\b").expect("static pattern"));

pub fn detect_regional_override(text: &str) -> Option<RegionalOverride> {
    if NEAPOLITAN.is_match(text) {
        return Some(RegionalOverride {
            cuisine: "Italian",
            region_hints: &["neapolitan", "napoli", "naples"],
            tag: "neapolitan",
        });
    }
    if SICILIAN.is_match(text) {
        return Some(RegionalOverride {
            cuisine: "Italian",
            region_hints: &["sicilian", "sicily"],
            tag: "sicilian",
        });
    }
    if OAXACAN.is_match(text) {
        return Some(RegionalOverride {
            cuisine: "Mexican",
            region_hints: &["oaxacan", "oaxaca"],
            tag: "oaxacan",
        });
    }
    None
}

/// Lowercase, collapse whitespace.
pub fn normalize_text(input: &str) -> String {
    input
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Alphanumeric runs of length >= 3, lowercased.
pub fn tokenize(input: &str) -> Vec<String> {
    input
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| t.len() >= 3)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nonna_outscores_plain_italian() {
        let hit = detect_cuisine_signal("my nonna made this");
        assert_eq!(hit.cuisine.as_deref(), Some("Italian"));
        assert!(hit.score_lead >= 10.0);
        assert_eq!(hit.tags, vec!["nonna".to_string()]);
    }

    #[test]
    fn competing_cuisines_shrink_the_lead() {
        // Italian 5 vs Greek 5: lead is zero.
        let hit = detect_cuisine_signal("italian or greek tonight?");
        assert!(hit.cuisine.is_some());
        assert_eq!(hit.score_lead, 0.0);
    }

    #[test]
    fn no_signal_yields_empty_hit() {
        let hit = detect_cuisine_signal("something hearty for dinner");
        assert_eq!(hit.cuisine, None);
        assert!(hit.tags.is_empty());
    }

    #[test]
    fn regional_override_detects_naples() {
        let hit = detect_regional_override("like they make in Naples").expect("override");
        assert_eq!(hit.cuisine, "Italian");
        assert_eq!(hit.tag, "neapolitan");
    }

    #[test]
    fn tokenize_drops_short_tokens() {
        assert_eq!(
            tokenize("a 30-minute pasta w/ peas"),
            vec!["minute".to_string(), "pasta".to_string(), "peas".to_string()]
        );
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_text("  Sunday   Gravy \n dinner "), "sunday gravy dinner");
    }
}
