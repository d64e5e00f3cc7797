use crate::error::{KnowledgeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUILTIN_PACKS: &[&str] = &[
    include_str!("../../../packs/italian.v1.json"),
    include_str!("../../../packs/mexican.v1.json"),
    include_str!("../../../packs/greek.v1.json"),
    include_str!("../../../packs/spanish.v1.json"),
    include_str!("../../../packs/french.v1.json"),
    include_str!("../../../packs/lebanese.v1.json"),
    include_str!("../../../packs/persian.v1.json"),
    include_str!("../../../packs/chinese.v1.json"),
    include_str!("../../../packs/indian.v1.json"),
    include_str!("../../../packs/japanese.v1.json"),
    include_str!("../../../packs/jamaican.v1.json"),
    include_str!("../../../packs/russian.v1.json"),
    include_str!("../../../packs/puerto-rican.v1.json"),
    include_str!("../../../packs/dominican.v1.json"),
    include_str!("../../../packs/korean.v1.json"),
    include_str!("../../../packs/filipino.v1.json"),
    include_str!("../../../packs/jewish.v1.json"),
    include_str!("../../../packs/west-african.v1.json"),
];

const HOME_STYLE_PACK: &str = include_str!("../../../packs/home-style.v1.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub text: String,
}

/// Static grounding bundle for one cuisine: pantry anchors, technique rules,
/// and the memory snippets retrieval picks from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuisinePack {
    pub id: String,
    pub version: String,
    pub cuisine: String,
    #[serde(default)]
    pub personas: Vec<String>,
    #[serde(default)]
    pub pantry_anchors: Vec<String>,
    #[serde(default)]
    pub technique_rules: Vec<String>,
    #[serde(default)]
    pub flavor_pairings: Vec<String>,
    #[serde(default)]
    pub signature_dishes: Vec<String>,
    #[serde(default)]
    pub substitutions: Vec<String>,
    #[serde(default)]
    pub donts: Vec<String>,
    #[serde(default)]
    pub snippets: Vec<Snippet>,
}

impl CuisinePack {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let pack: CuisinePack = serde_json::from_slice(bytes)?;
        if pack.snippets.is_empty() {
            return Err(KnowledgeError::EmptyPack(pack.id));
        }
        Ok(pack)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

/// All loaded packs plus the Home Style fallback for cuisines we do not
/// carry a pack for.
#[derive(Debug, Clone)]
pub struct PackLibrary {
    packs: Vec<CuisinePack>,
    fallback: CuisinePack,
}

impl PackLibrary {
    pub fn builtin() -> Self {
        let packs = BUILTIN_PACKS
            .iter()
            .map(|raw| {
                CuisinePack::from_bytes(raw.as_bytes())
                    .unwrap_or_else(|e| panic!("builtin pack is invalid: {e}"))
            })
            .collect();
        let fallback = CuisinePack::from_bytes(HOME_STYLE_PACK.as_bytes())
            .unwrap_or_else(|e| panic!("home-style pack is invalid: {e}"));
        Self { packs, fallback }
    }

    /// Resolve a pack by loose cuisine name. Unknown cuisines fall back to
    /// the Home Style pack.
    pub fn resolve(&self, cuisine: &str) -> &CuisinePack {
        let normalized = normalize_cuisine(cuisine);
        self.packs
            .iter()
            .find(|pack| pack.cuisine == normalized)
            .unwrap_or(&self.fallback)
    }

    pub fn packs(&self) -> &[CuisinePack] {
        &self.packs
    }

    pub fn fallback(&self) -> &CuisinePack {
        &self.fallback
    }
}

/// Loose cuisine-name normalization: "ital", "Italiano", "italian food" all
/// map to Italian. Anything unrecognized becomes Home Style.
pub fn normalize_cuisine(cuisine: &str) -> &'static str {
    let lower = cuisine.trim().to_lowercase();
    if lower.contains("ital") {
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
    } else if lower.contains("west african")
        || lower.contains("nigerian")
        || lower.contains("ghanaian")
    {
        "West African"
    } else {
        "Home Style"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_library_loads_all_packs() {
        let library = PackLibrary::builtin();
        assert_eq!(library.packs().len(), 18);
        assert_eq!(library.fallback().cuisine, "Home Style");
    }

    #[test]
    fn every_scored_cuisine_has_its_own_pack() {
        let library = PackLibrary::builtin();
        for cuisine in [
            "Russian",
            "Puerto Rican",
            "Dominican",
            "Korean",
            "Filipino",
            "Jewish",
            "West African",
        ] {
            assert_eq!(normalize_cuisine(cuisine), cuisine);
            assert_eq!(library.resolve(cuisine).cuisine, cuisine);
        }
        assert_eq!(library.resolve("Ashkenazi").cuisine, "Jewish");
        assert_eq!(library.resolve("nigerian"), library.resolve("Ghanaian"));
    }

    #[test]
    fn loose_names_resolve() {
        let library = PackLibrary::builtin();
        assert_eq!(library.resolve("italiano").cuisine, "Italian");
        assert_eq!(library.resolve("  MEXICAN food ").cuisine, "Mexican");
        assert_eq!(library.resolve("klingon").cuisine, "Home Style");
    }

    #[test]
    fn pack_without_snippets_rejected() {
        let raw = br#"{"id": "x", "version": "1", "cuisine": "X", "snippets": []}"#;
        assert!(matches!(
            CuisinePack::from_bytes(raw),
            Err(KnowledgeError::EmptyPack(_))
        ));
    }

    #[test]
    fn normalize_handles_aliases() {
        assert_eq!(normalize_cuisine("ital"), "Italian");
        assert_eq!(normalize_cuisine("persian home"), "Persian");
        assert_eq!(normalize_cuisine(""), "Home Style");
    }
}
