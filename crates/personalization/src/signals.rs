use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// A regional cooking signal recognized in user text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalSignal {
    pub key: String,
    pub label: String,
    pub cuisine: String,
    pub confidence: f32,
}

struct SignalRule {
    key: &'static str,
    label: &'static str,
    cuisine: &'static str,
    confidence: f32,
    patterns: Vec<Regex>,
}

fn rule(
    key: &'static str,
    label: &'static str,
    cuisine: &'static str,
    confidence: f32,
    patterns: &[&str],
) -> SignalRule {
    SignalRule {
        key,
        label,
        cuisine,
        confidence,
        patterns: patterns
            .iter()
            .map(|p| Regex::new(p).expect("static signal pattern"))
            .collect(),
    }
}

static SIGNAL_RULES: Lazy<Vec<SignalRule>> = Lazy::new(|| {
    vec![
        rule("it_sicilian", "Sicilian", "Italian", 0.95, &[r"(?i)\bsicilian\b", r"(?i)\bsicily\b"]),
        rule("it_neapolitan", "Neapolitan", "Italian", 0.95, &[r"(?i)\bneapolitan\b", r"(?i)\bnapoli\b", r"(?i)\bnaples\b"]),
        rule("it_ny_american", "Italian-American (New York)", "Italian", 0.95, &[r"(?i)\bitalian-?american\b", r"(?i)\bnew york\b", r"(?i)\bnyc\b", r"(?i)\bred sauce\b"]),
        rule("it_roman", "Roman", "Italian", 0.8, &[r"(?i)\broman\b", r"(?i)\broma\b"]),
        rule("mx_oaxacan", "Oaxacan", "Mexican", 0.95, &[r"(?i)\boaxacan\b", r"(?i)\boaxaca\b"]),
        rule("mx_yucatecan", "Yucatecan", "Mexican", 0.85, &[r"(?i)\byucatan\b", r"(?i)\byucatecan\b"]),
        rule("gr_cretan", "Cretan", "Greek", 0.8, &[r"(?i)\bcretan\b", r"(?i)\bcrete\b"]),
        rule("es_basque", "Basque", "Spanish", 0.85, &[r"(?i)\bbasque\b"]),
        rule("es_valencian", "Valencian", "Spanish", 0.85, &[r"(?i)\bvalencian\b", r"(?i)\bvalencia\b"]),
        rule("fr_provencal", "Provencal", "French", 0.85, &[r"(?i)\bprovencal\b", r"(?i)\bprovence\b"]),
        rule("lb_beirut", "Beirut-Style", "Lebanese", 0.8, &[r"(?i)\bbeirut\b"]),
        rule("ir_tehrani", "Tehrani", "Persian", 0.75, &[r"(?i)\btehran\b", r"(?i)\btehrani\b"]),
        rule("ir_shirazi", "Shirazi", "Persian", 0.8, &[r"(?i)\bshiraz\b", r"(?i)\bshirazi\b"]),
        rule("cn_sichuan", "Sichuan", "Chinese", 0.9, &[r"(?i)\bsichuan\b", r"(?i)\bszechuan\b", r"(?i)\bchengdu\b"]),
        rule("cn_cantonese", "Cantonese", "Chinese", 0.85, &[r"(?i)\bcantonese\b", r"(?i)\bguangdong\b"]),
        rule("in_punjabi", "Punjabi", "Indian", 0.85, &[r"(?i)\bpunjabi\b", r"(?i)\bpunjab\b"]),
        rule("in_south_indian", "South Indian", "Indian", 0.85, &[r"(?i)\bsouth indian\b", r"(?i)\bkerala\b", r"(?i)\btamil\b"]),
        rule("jp_kansai", "Kansai", "Japanese", 0.8, &[r"(?i)\bkansai\b", r"(?i)\bosaka\b", r"(?i)\bkyoto\b"]),
        rule("jm_jerk_house", "Jerk-House Style", "Jamaican", 0.85, &[r"(?i)\bjerk\b", r"(?i)\bscotch bonnet\b"]),
        rule("ru_pelmeni", "Russian Dumpling Comfort", "Russian", 0.9, &[r"(?i)\bpelmeni\b", r"(?i)\bbabushka\b"]),
        rule("pr_sofrito", "Puerto Rican Sofrito", "Puerto Rican", 0.9, &[r"(?i)\bboricua\b", r"(?i)\bsofrito\b", r"(?i)\barroz con gandules\b"]),
        rule("do_sancocho", "Dominican Sancocho", "Dominican", 0.9, &[r"(?i)\bsancocho\b", r"(?i)\bla bandera\b"]),
        rule("kr_jjigae", "Korean Jjigae Comfort", "Korean", 0.9, &[r"(?i)\bkimchi\b", r"(?i)\bjjigae\b", r"(?i)\bhalmeoni\b"]),
        rule("ph_adobo", "Filipino Adobo Home", "Filipino", 0.9, &[r"(?i)\badobo\b", r"(?i)\bsinigang\b", r"(?i)\blola\b"]),
        rule("jw_ashkenazi", "Jewish Family Comfort", "Jewish", 0.85, &[r"(?i)\bbubbe\b", r"(?i)\bmatzo\b", r"(?i)\bkugel\b"]),
        rule("wa_jollof", "West African Jollof Comfort", "West African", 0.9, &[r"(?i)\bjollof\b", r"(?i)\begusi\b", r"(?i)\bgroundnut\b"]),
    ]
});

/// Map loose cuisine names onto the canonical names the rule table uses.
/// Unrecognized names pass through unchanged.
pub fn normalize_cuisine(cuisine: &str) -> String {
    let lower = cuisine.trim().to_lowercase();
    let canonical = if lower.contains("ital") {
        "Italian"
    } else if lower.contains("mex") {
        "Mexican"
    } else if lower.contains("greek") {
        "Greek"
    } else if lower.contains("span") {
        "Spanish"
    } else if lower.contains("french") {
        "French"
    } else if lower.contains("leban") {
        "Lebanese"
    } else if lower.contains("pers") {
        "Persian"
    } else if lower.contains("chin") {
        "Chinese"
    } else if lower.contains("ind") {
        "Indian"
    } else if lower.contains("japan") {
        "Japanese"
    } else if lower.contains("jama") {
        "Jamaican"
    } else if lower.contains("russ") {
        "Russian"
    } else if lower.contains("puerto") {
        "Puerto Rican"
    } else if lower.contains("dominican") {
        "Dominican"
    } else if lower.contains("korean") {
        "Korean"
    } else if lower.contains("filip") {
        "Filipino"
    } else if lower.contains("jewish") || lower.contains("ashken") {
        "Jewish"
    } else if lower.contains("west african") || lower.contains("nigerian") || lower.contains("ghanaian") {
        "West African"
    } else {
        return cuisine.to_string();
    };
    canonical.to_string()
}

/// Extract regional signals from a prompt, restricted to the given cuisine.
pub fn extract_regional_signals(prompt: &str, cuisine: &str) -> Vec<RegionalSignal> {
    let normalized = normalize_cuisine(cuisine);
    SIGNAL_RULES
        .iter()
        .filter(|rule| rule.cuisine == normalized)
        .filter(|rule| rule.patterns.iter().any(|p| p.is_match(prompt)))
        .map(|rule| RegionalSignal {
            key: rule.key.to_string(),
            label: rule.label.to_string(),
            cuisine: rule.cuisine.to_string(),
            confidence: rule.confidence,
        })
        .collect()
}
