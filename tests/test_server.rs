use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use ai_recipes::providers::{ProviderError, VisionProvider};
use ai_recipes::server::{router, AppState, ErrorResponse, SuccessResponse};
use ai_recipes::{AppConfig, ImagePayload, RecipeAnalyzer};
use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::Value;

const KITCHEN_REPLY: &str = r#"{"ingredients":[{"name":"egg","category":"protein"},{"name":"spinach","category":"vegetable"}],"recipes":[{"title":"Spinach omelette","prep_time":"10 minutes","difficulty":"easy","steps":["Whisk eggs","Wilt spinach","Cook together"]}]}"#;

struct FixedProvider(Option<&'static str>);

#[async_trait]
impl VisionProvider for FixedProvider {
    fn provider_name(&self) -> &str {
        "fixed"
    }

    fn model(&self) -> &str {
        "fixed-1"
    }

    async fn generate(&self, _prompt: &str, _image: &ImagePayload) -> Result<String, ProviderError> {
        match self.0 {
            Some(reply) => Ok(reply.to_string()),
            None => Err(ProviderError::Api {
                status: 503,
                body: "model overloaded".to_string(),
            }),
        }
    }
}

fn test_server(reply: Option<&'static str>, debug: bool) -> TestServer {
    let mut config = AppConfig::default();
    config.server.debug = debug;

    let analyzer = RecipeAnalyzer::builder()
        .provider(Arc::new(FixedProvider(reply)))
        .max_attempts(2)
        .backoff_unit(Duration::from_millis(1))
        .build()
        .unwrap();

    TestServer::new(router(AppState::new(config, analyzer))).unwrap()
}

fn png_photo() -> Vec<u8> {
    let pixels = RgbImage::from_pixel(8, 8, Rgb([10, 200, 30]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(pixels)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

fn upload(bytes: Vec<u8>, mime_type: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(bytes)
            .file_name("fridge.png")
            .mime_type(mime_type),
    )
}

#[tokio::test]
async fn test_health() {
    let server = test_server(Some(KITCHEN_REPLY), false);

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "AI Recipes Backend");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_analyze_success_envelope() {
    let server = test_server(Some(KITCHEN_REPLY), false);

    let response = server
        .post("/analyze")
        .multipart(upload(png_photo(), "image/png"))
        .await;

    response.assert_status_ok();
    let body: SuccessResponse = response.json();
    assert!(body.success);
    assert_eq!(body.message.as_deref(), Some("Image analyzed successfully"));
    assert_eq!(body.data.ingredients.len(), 2);
    assert_eq!(body.data.recipes[0].title, "Spinach omelette");
    assert_eq!(body.data.recipes[0].steps.len(), 3);
}

#[tokio::test]
async fn test_unsupported_content_type() {
    let server = test_server(Some(KITCHEN_REPLY), false);

    let response = server
        .post("/analyze")
        .multipart(upload(png_photo(), "image/gif"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert!(body.error.starts_with("Unsupported file type"));
    assert_eq!(body.status_code, 400);
}

#[tokio::test]
async fn test_empty_file() {
    let server = test_server(Some(KITCHEN_REPLY), false);

    let response = server
        .post("/analyze")
        .multipart(upload(Vec::new(), "image/png"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, "Empty file provided");
}

#[tokio::test]
async fn test_missing_file_field() {
    let server = test_server(Some(KITCHEN_REPLY), false);
    let form = MultipartForm::new().add_text("note", "no photo here");

    let response = server.post("/analyze").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, "No file provided");
}

#[tokio::test]
async fn test_file_too_large() {
    let mut config = AppConfig::default();
    config.upload.max_file_size_mb = 1;
    let analyzer = RecipeAnalyzer::builder()
        .provider(Arc::new(FixedProvider(Some(KITCHEN_REPLY))))
        .build()
        .unwrap();
    let server = TestServer::new(router(AppState::new(config, analyzer))).unwrap();

    let oversized = vec![0u8; 1024 * 1024 + 1];
    let response = server
        .post("/analyze")
        .multipart(upload(oversized, "image/png"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, "File too large. Maximum size: 1MB");
}

#[tokio::test]
async fn test_undecodable_image() {
    let server = test_server(Some(KITCHEN_REPLY), false);

    let response = server
        .post("/analyze")
        .multipart(upload(b"not really a png".to_vec(), "image/png"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert!(body.error.starts_with("Invalid image"));
    assert!(body.detail.is_none());
}

#[tokio::test]
async fn test_unavailable_model() {
    let server = test_server(None, false);

    let response = server
        .post("/analyze")
        .multipart(upload(png_photo(), "image/png"))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: ErrorResponse = response.json();
    assert_eq!(body.status_code, 503);
    assert!(body.detail.is_none());
}

#[tokio::test]
async fn test_error_detail_in_debug_mode() {
    let server = test_server(None, true);

    let response = server
        .post("/analyze")
        .multipart(upload(png_photo(), "image/png"))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: ErrorResponse = response.json();
    assert!(body.detail.unwrap().contains("model overloaded"));
}

#[tokio::test]
async fn test_debug_routes_hidden_in_production() {
    let server = test_server(Some(KITCHEN_REPLY), false);

    let response = server.get("/debug/config").await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_debug_config_has_no_secrets() {
    let server = test_server(Some(KITCHEN_REPLY), true);

    let response = server.get("/debug/config").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["model"], "fixed-1");
    assert_eq!(body["max_file_size_mb"], 10);
    assert_eq!(body["max_attempts"], 3);
    assert!(!response.text().contains("api_key"));
}

#[tokio::test]
async fn test_debug_model_check() {
    let server = test_server(Some(KITCHEN_REPLY), true);

    let response = server.post("/debug/test-model").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["model_responsive"], true);
    assert_eq!(body["test_result"]["ingredients_found"], 2);
    assert_eq!(body["test_result"]["recipes_found"], 1);
}
