use axum::{
    extract::{Multipart, State},
    Json,
};
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::model::AnalysisResult;
use crate::providers::PROMPT_VERSION;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Envelope of a successful analysis
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub data: AnalysisResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "AI Recipes Backend",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Accept a single `file` multipart field, check it against the upload
/// limits and run it through the analyzer.
pub async fn analyze_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SuccessResponse>, ApiError> {
    let debug = state.debug();
    let upload = &state.config.upload;
    let mut file_data = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!("Failed to read multipart field: {}", e);
        ApiError::bad_request("Failed to read uploaded file").with_detail(debug, &e)
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("unnamed").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        info!("Received image analysis request: {}", filename);

        if !upload.is_allowed_type(&content_type) {
            return Err(ApiError::bad_request(format!(
                "Unsupported file type. Allowed types: {}",
                upload.allowed_file_types.join(", ")
            )));
        }

        let data = field.bytes().await.map_err(|e| {
            error!("Failed to read uploaded file: {}", e);
            ApiError::bad_request("Failed to read uploaded file").with_detail(debug, &e)
        })?;

        if data.len() > upload.max_file_size_bytes() {
            return Err(ApiError::bad_request(format!(
                "File too large. Maximum size: {}MB",
                upload.max_file_size_mb
            )));
        }

        if data.is_empty() {
            return Err(ApiError::bad_request("Empty file provided"));
        }

        file_data = Some(data);
        break;
    }

    let data = file_data.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    debug!("Analyzing image: {} bytes", data.len());

    let result = state.analyzer.analyze(data.to_vec()).await.map_err(|e| {
        error!("Error during analysis: {}", e);
        ApiError::from_analysis(&e, debug)
    })?;

    info!(
        "Analysis completed - Ingredients: {}, Recipes: {}",
        result.ingredients.len(),
        result.recipes.len()
    );

    Ok(Json(SuccessResponse {
        success: true,
        data: result,
        message: Some("Image analyzed successfully".to_string()),
    }))
}

/// Effective configuration, without secrets
pub async fn debug_config(State(state): State<AppState>) -> Json<Value> {
    let config = &state.config;
    Json(json!({
        "provider": state.analyzer.provider_name(),
        "model": state.analyzer.model(),
        "max_file_size_mb": config.upload.max_file_size_mb,
        "allowed_file_types": config.upload.allowed_file_types,
        "allowed_origins": config.server.allowed_origins,
        "request_timeout": config.ai.timeout,
        "max_attempts": config.ai.max_attempts,
        "prompt_version": PROMPT_VERSION
    }))
}

/// Round-trip a blank 1x1 photo through the model to check connectivity
pub async fn debug_test_model(State(state): State<AppState>) -> Json<Value> {
    let outcome = match blank_jpeg() {
        Ok(bytes) => state
            .analyzer
            .analyze(bytes)
            .await
            .map_err(|e| e.to_string()),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(result) => Json(json!({
            "status": "success",
            "model_responsive": true,
            "test_result": {
                "ingredients_found": result.ingredients.len(),
                "recipes_found": result.recipes.len()
            }
        })),
        Err(e) => Json(json!({
            "status": "error",
            "model_responsive": false,
            "error": e
        })),
    }
}

fn blank_jpeg() -> Result<Vec<u8>, String> {
    let pixel = RgbImage::from_pixel(1, 1, Rgb([255, 255, 255]));
    let mut buf = Vec::new();
    JpegEncoder::new(&mut buf)
        .encode_image(&pixel)
        .map_err(|e| format!("Failed to build test image: {}", e))?;
    Ok(buf)
}
