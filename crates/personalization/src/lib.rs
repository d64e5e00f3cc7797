//! Lightweight taste personalization: regional cooking signals extracted
//! from prompts, a file-backed preference store, and the per-request
//! context that carries a user's regional leanings into generation.

mod error;
mod signals;
mod store;

pub use error::{PersonalizationError, Result};
pub use signals::{extract_regional_signals, normalize_cuisine, RegionalSignal};
pub use store::{
    personalization_context, PersonalizationContext, PreferenceStore, SignalEvent, TasteProfile,
};
