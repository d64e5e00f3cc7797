//! Style inference for Grandma's Kitchen: maps free-form food memories to a
//! catalog of named regional cooking styles with confidence scores.
//!
//! Detection is layered: a keyword table ties text to a cuisine, regional
//! mentions (Sicilian, Neapolitan, Oaxacan) override plain cuisine matches,
//! and the catalog itself is scored on alias/label/region hits. Preference
//! weights from the personalization store fold into the ranking.

mod catalog;
mod error;
mod infer;
mod search;
mod signals;

pub use catalog::{StyleCatalog, StyleEntry};
pub use error::{Result, StyleError};
pub use infer::{infer_style, InferenceRequest, RankedStyle, StyleInference};
pub use search::{search_styles, StyleMatch, StyleQuery};
pub use signals::{
    detect_cuisine_signal, detect_regional_override, normalize_text, tokenize, CuisineSignalHit,
    RegionalOverride,
};
