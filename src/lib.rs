//! Ingredient detection and recipe suggestions from a single food photo.
//!
//! A photo is admitted (decoded, converted to RGB, downsized when large),
//! sent to a multimodal model together with a fixed prompt under a bounded
//! retry policy, and the model's free-form reply is recovered into an
//! [`AnalysisResult`].
//!
//! ```no_run
//! # use ai_recipes::{AppConfig, RecipeAnalyzer};
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! let analyzer = RecipeAnalyzer::from_config(&config, None)?;
//! let result = analyzer.analyze(std::fs::read("fridge.jpg")?).await?;
//! println!("{} ingredients", result.ingredients.len());
//! # Ok(())
//! # }
//! ```

pub mod admission;
pub mod builder;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod pipelines;
pub mod providers;
pub mod recovery;
pub mod server;

pub use admission::{admit, AdmissionPolicy, ImagePayload, NormalizedImage};
pub use builder::{RecipeAnalyzer, RecipeAnalyzerBuilder};
pub use config::AppConfig;
pub use error::AnalysisError;
pub use model::{AnalysisResult, Ingredient, Recipe};
pub use normalize::normalize;
pub use providers::{build_prompt, RetryPolicy, VisionProvider};
pub use recovery::recover;
