//! Recovery of structured results from free-form model replies.
//!
//! Models do not reliably emit well-formed JSON: replies arrive wrapped in
//! code fences, prefixed with prose, or cut off mid-array. [`recover`] runs a
//! cascade of increasingly lenient stages and degrades to an empty result
//! instead of failing:
//!
//! 1. strip code fences and surrounding prose ([`strip_wrapper`])
//! 2. parse the remainder as a JSON object
//! 3. salvage the `ingredients` and `recipes` arrays independently
//! 4. build typed records from whatever was found, then normalize them
//!
//! Nothing is ever invented: every ingredient and recipe in the result comes
//! from the reply text.

mod fields;
mod salvage;
mod wrapper;

pub use wrapper::strip_wrapper;

use log::{debug, warn};
use serde_json::Value;

use crate::model::AnalysisResult;
use crate::normalize::normalize;

/// Untyped `ingredients` and `recipes` entries found by a recovery stage
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct RawPayload {
    pub ingredients: Vec<Value>,
    pub recipes: Vec<Value>,
}

/// Turn a model reply into an [`AnalysisResult`]. Never fails.
pub fn recover(raw_text: &str) -> AnalysisResult {
    let cleaned = strip_wrapper(raw_text);

    let payload = parse_object(&cleaned)
        .or_else(|| salvage::salvage_fragments(&cleaned))
        .unwrap_or_else(|| {
            warn!("No usable JSON in model reply, returning empty result");
            RawPayload::default()
        });

    normalize(fields::extract_fields(payload))
}

fn parse_object(text: &str) -> Option<RawPayload> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(mut map)) => {
            debug!("Model reply parsed as a JSON object");
            Some(RawPayload {
                ingredients: take_array(map.remove("ingredients")),
                recipes: take_array(map.remove("recipes")),
            })
        }
        Ok(_) => {
            warn!("Model reply is JSON but not an object, attempting fragment salvage");
            None
        }
        Err(e) => {
            warn!("JSON parsing failed, attempting fragment salvage: {}", e);
            None
        }
    }
}

fn take_array(value: Option<Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}
