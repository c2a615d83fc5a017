use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod state;

use docsearch::config::{self, IndexMode};
use docsearch::indexer::Indexer;
use state::AppState;

fn parse_mode(s: &str) -> Result<IndexMode, String> {
    s.parse()
}

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "docsearch", version)]
#[command(about = "Document search with prefix autocomplete")]
struct Cli {
    /// Subcommand to execute, `serve` when omitted.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Corpus to serve: html or images
        #[arg(long, default_value = "html", value_parser = parse_mode)]
        mode: IndexMode,
    },
    /// Index a corpus directory
    Index {
        /// Directory holding the corpus
        dir: PathBuf,
        /// Corpus kind: html or images
        #[arg(long, default_value = "html", value_parser = parse_mode)]
        mode: IndexMode,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docsearch=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration / 加载配置
    config::init_config()?;
    let app_config = config::config();

    // Create data directory if not exists / 创建数据目录
    let data_dir = app_config.get_data_dir();
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        tracing::info!("Created data directory: {:?}", data_dir);
    }

    match cli.command.unwrap_or(Commands::Serve { mode: IndexMode::Html }) {
        Commands::Index { dir, mode } => {
            let report = Indexer::from_config(&app_config, mode).run(&dir).await?;
            println!(
                "Indexed {} documents ({} skipped), {} words",
                report.processed, report.skipped, report.words
            );
        }
        Commands::Serve { mode } => serve(app_config, mode).await?,
    }

    Ok(())
}

async fn serve(app_config: config::AppConfig, mode: IndexMode) -> anyhow::Result<()> {
    tracing::info!("Server will listen on {}", app_config.get_bind_address());

    // Stores are opened and the trie fully built before binding / 启动前完成加载
    let www_dir = PathBuf::from(&app_config.server.www_dir);
    let bind_addr = app_config.get_bind_address();
    let state = Arc::new(AppState::load(app_config, mode).await);

    let app = api::build_router(state, &www_dir);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server running at http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
