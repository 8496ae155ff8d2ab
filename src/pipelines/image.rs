use log::{debug, info};

use crate::admission::{admit, AdmissionPolicy};
use crate::error::AnalysisError;
use crate::model::AnalysisResult;
use crate::providers::{build_prompt, invoke, RetryPolicy, VisionProvider};
use crate::recovery::recover;

/// Run one photo through admission, invocation and recovery.
///
/// Only [`AnalysisError::InvalidImage`] and
/// [`AnalysisError::RemoteUnavailable`] are expected here; a malformed model
/// reply degrades to a partial or empty result.
pub async fn process(
    provider: &dyn VisionProvider,
    retry: &RetryPolicy,
    admission: AdmissionPolicy,
    image_bytes: Vec<u8>,
) -> Result<AnalysisResult, AnalysisError> {
    // Decoding and resampling are CPU-bound; keep them off the async workers
    let payload = tokio::task::spawn_blocking(move || {
        admit(&image_bytes, &admission)?.to_payload()
    })
    .await??;
    debug!("Prepared {} byte {} payload", payload.data.len(), payload.mime_type);

    let prompt = build_prompt();
    let reply = invoke(provider, &prompt, &payload, retry).await?;
    debug!("Model reply: {} characters", reply.len());

    let result = recover(&reply);
    info!(
        "Successfully analyzed image - found {} ingredients and {} recipes",
        result.ingredients.len(),
        result.recipes.len()
    );
    Ok(result)
}
