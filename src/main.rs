//! Secret Snake CLI
//!
//! Command-line host for the page loader:
//! - Render the assignment and tips into a page template
//! - Manage the stored auth token
//! - Generate a default config file

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use secret_snake::config::{generate_default_config, Config, LoggingConfig};
use secret_snake::{
    read_token, Document, HttpBackend, KeyValueStore, LoadReport, PageDataLoader,
};

#[derive(Parser)]
#[command(name = "secret-snake")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Render your Secret Snake assignment and tips")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend URL, overrides the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "html", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Html,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the assignment and tips and render them
    Render {
        /// HTML page containing the containers (default: an empty page with both)
        #[arg(short, long)]
        page: Option<PathBuf>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage the stored auth token
    Token {
        #[command(subcommand)]
        action: TokenCommand,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum TokenCommand {
    /// Store a bearer token
    Set { token: String },
    /// Print the stored token
    Show,
    /// Remove the stored token
    Clear,
}

/// `render --format json` document
#[derive(Serialize)]
struct RenderOutput {
    load_id: Uuid,
    rendered_at: DateTime<Utc>,
    report: LoadReport,
    containers: BTreeMap<String, String>,
}

// Both operations share one thread, like a browser event loop.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, source) = match &cli.config {
        Some(path) => (
            Config::load_with_env(path)
                .with_context(|| format!("Failed to load config from {:?}", path))?,
            Some(path.clone()),
        ),
        None => Config::load_default().context("Failed to load config")?,
    };
    if let Some(url) = cli.api_url.clone() {
        config.api.base_url = url;
    }

    init_logging(&config.logging);

    match &source {
        Some(path) => tracing::debug!("Loaded config from {:?}", path),
        None => tracing::debug!("Using default config with environment overrides"),
    }

    match cli.command {
        Commands::Render { page, output } => {
            let rendered = render(&config, page, cli.format).await?;
            write_output(output, &rendered)?;
        }

        Commands::Token { action } => {
            let store = config.storage.store();
            let key = &config.storage.token_key;

            match action {
                TokenCommand::Set { token } => {
                    if token.trim().is_empty() {
                        bail!("Token must not be empty");
                    }
                    store.set_item(key, token.trim())?;
                    println!("Token stored in {:?}", store.path());
                }
                TokenCommand::Show => match read_token(&store, key)? {
                    Some(token) => println!("{}", token.as_str()),
                    None => bail!("No token stored in {:?}", store.path()),
                },
                TokenCommand::Clear => {
                    store.remove_item(key)?;
                    println!("Token removed");
                }
            }
        }

        Commands::Config { output } => {
            write_output(output, &generate_default_config())?;
        }
    }

    Ok(())
}

async fn render(
    config: &Config,
    page_path: Option<PathBuf>,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let load_id = Uuid::new_v4();
    let containers = config.containers();

    let page = match &page_path {
        Some(path) => {
            let template = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read page {:?}", path))?;
            Document::parse_html(&template, &[containers.assignment.as_str(), containers.tips.as_str()])
                .with_context(|| format!("Invalid page template {:?}", path))?
        }
        None => Document::with_containers([containers.assignment.clone(), containers.tips.clone()]),
    };

    let store = config.storage.store();
    let backend = HttpBackend::new(&config.api.base_url)?;
    let loader = PageDataLoader::from_store(backend, &store, &config.storage.token_key)
        .with_context(|| format!("Failed to read token from {:?}", store.path()))?
        .with_endpoints(config.endpoints())
        .with_containers(containers);

    tracing::info!(
        load_id = %load_id,
        base_url = %config.api.base_url,
        containers = ?page.container_ids(),
        "Page ready, loading data"
    );

    let report = loader.on_ready(&page).await;

    tracing::info!(
        load_id = %load_id,
        assignment = ?report.assignment,
        tips = ?report.tips,
        "Page load settled"
    );

    match format {
        OutputFormat::Html => Ok(page.to_html()),
        OutputFormat::Json => {
            let containers = page
                .container_ids()
                .into_iter()
                .filter_map(|id| page.inner_html(id).map(|html| (id.to_string(), html)))
                .collect();

            let output = RenderOutput {
                load_id,
                rendered_at: Utc::now(),
                report,
                containers,
            };
            Ok(serde_json::to_string_pretty(&output)?)
        }
    }
}

fn write_output(output: Option<PathBuf>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write {:?}", path))?;
            eprintln!("Written to {:?}", path);
        }
        None => println!("{}", content),
    }
    Ok(())
}

/// Logs go to stderr so stdout carries only the rendered output
fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("secret_snake={}", logging.level).into());
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Config pointing at a closed port with a token in a temp store
    fn offline_config(dir: &std::path::Path) -> Config {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut config = Config::default();
        config.api.base_url = format!("http://{}", addr);
        config.storage.path = Some(dir.join("storage.json").to_string_lossy().into_owned());
        config
            .storage
            .store()
            .set_item(&config.storage.token_key, "abc")
            .unwrap();
        config
    }

    #[tokio::test]
    async fn test_render_json_document() {
        let dir = tempfile::tempdir().unwrap();
        let config = offline_config(dir.path());

        let rendered = render(&config, None, OutputFormat::Json).await.unwrap();
        let output: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert!(Uuid::parse_str(output["load_id"].as_str().unwrap()).is_ok());
        assert!(DateTime::parse_from_rfc3339(output["rendered_at"].as_str().unwrap()).is_ok());
        assert_eq!(output["report"]["assignment"]["outcome"], "failed");
        assert_eq!(output["report"]["tips"]["outcome"], "failed");
        assert_eq!(output["containers"]["assignment-container"], "");
        assert_eq!(output["containers"]["tips-container"], "");
    }

    #[tokio::test]
    async fn test_render_page_template_to_html() {
        let dir = tempfile::tempdir().unwrap();
        let config = offline_config(dir.path());
        let page = dir.path().join("page.html");
        std::fs::write(
            &page,
            "<!DOCTYPE html><html><body><div id=tips-container>loading</div></body></html>",
        )
        .unwrap();

        let rendered = render(&config, Some(page), OutputFormat::Html).await.unwrap();

        assert!(rendered.starts_with("<!DOCTYPE html>"));
        assert!(rendered.contains(r#"<div id="tips-container">loading</div>"#));
    }

    #[tokio::test]
    async fn test_render_missing_page_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = offline_config(dir.path());

        let result = render(&config, Some(dir.path().join("nope.html")), OutputFormat::Html).await;
        assert!(result.is_err());
    }
}
