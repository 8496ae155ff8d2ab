use std::path::PathBuf;

use ai_recipes::server::{self, AppState};
use ai_recipes::{AppConfig, RecipeAnalyzer};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{error, info};

#[derive(Debug, Parser)]
#[command(name = "ai-recipes", version, about = "Ingredient detection and recipe ideas from food photos")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP service (default)
    Serve {
        /// Address to bind, overrides server.host
        #[arg(long, env = "HOST")]
        host: Option<String>,
        /// Port to bind, overrides server.port
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },
    /// Analyze a single photo and print the result as JSON
    Analyze {
        path: PathBuf,
        /// Provider to use instead of ai.default_provider
        #[arg(long)]
        provider: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let mut config = AppConfig::load()?;

    let default_level = if config.server.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    match cli.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    }) {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let analyzer = RecipeAnalyzer::from_config(&config, None)?;
            server::serve(AppState::new(config, analyzer)).await?;
        }
        Command::Analyze { path, provider } => {
            let analyzer = RecipeAnalyzer::from_config(&config, provider.as_deref())?;
            info!(
                "Analyzing {} with {} ({})",
                path.display(),
                analyzer.provider_name(),
                analyzer.model()
            );

            let bytes = tokio::fs::read(&path).await?;
            match analyzer.analyze(bytes).await {
                Ok(result) => println!("{}", serde_json::to_string_pretty(&result)?),
                Err(e) => {
                    error!("Analysis failed: {}", e);
                    return Err(e.into());
                }
            }
        }
    }

    Ok(())
}
