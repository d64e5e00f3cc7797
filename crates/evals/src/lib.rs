//! Offline quality evaluation for generated recipes: a scoring rubric, two
//! conversation-coaching probes, a fixed baseline case suite, and a harness
//! that aggregates results into a release-gate verdict. Run summaries
//! persist as JSON under a data directory.

mod cases;
mod conversation;
mod error;
mod harness;
mod rubric;
mod store;

pub use cases::{baseline_cases, load_cases, EvalCase};
pub use conversation::{
    evaluate_conversation_quality, parse_conversation_score, ConversationEvalInput,
    ConversationEvalResult,
};
pub use error::{EvalError, Result};
pub use harness::{
    run_harness, CaseDigest, CaseResult, ConversationQuality, CuisineBreakdown, Diagnostic,
    GateReport, RunInfo, RunSummary,
};
pub use rubric::{score_recipe, RubricScore};
pub use store::RunStore;
