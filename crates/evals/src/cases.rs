use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const CASES_SCHEMA_VERSION: u32 = 1;
const BUILTIN_CASES: &str = include_str!("../../../cases/baseline-cases.json");

/// One eval prompt case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalCase {
    pub slug: String,
    pub cuisine: String,
    pub persona_name: String,
    pub prompt: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CaseFile {
    schema_version: u32,
    cases: Vec<EvalCase>,
}

fn parse_cases(bytes: &str) -> Result<Vec<EvalCase>> {
    let file: CaseFile = serde_json::from_str(bytes).map_err(EvalError::CaseParse)?;
    if file.schema_version != CASES_SCHEMA_VERSION {
        return Err(EvalError::UnsupportedSchema(file.schema_version));
    }
    if file.cases.is_empty() {
        return Err(EvalError::NoCases);
    }
    for (index, case) in file.cases.iter().enumerate() {
        if case.slug.trim().is_empty() {
            return Err(EvalError::InvalidCase(
                format!("#{index}"),
                "slug is empty".to_string(),
            ));
        }
        if case.prompt.trim().is_empty() {
            return Err(EvalError::InvalidCase(
                case.slug.clone(),
                "prompt is empty".to_string(),
            ));
        }
    }

    let mut cases = file.cases;
    cases.sort_by(|a, b| a.slug.cmp(&b.slug));
    Ok(cases)
}

/// The fixed baseline suite, ordered by slug.
pub fn baseline_cases() -> Vec<EvalCase> {
    parse_cases(BUILTIN_CASES).expect("builtin baseline cases are valid")
}

/// Load a custom case file from disk.
pub fn load_cases(path: impl AsRef<Path>) -> Result<Vec<EvalCase>> {
    let bytes = std::fs::read_to_string(path).map_err(EvalError::CaseIo)?;
    parse_cases(&bytes)
}
