mod client;
mod config;
mod error;
mod handlers;
mod models;
mod services;
mod static_files;
mod storage;

use axum::{routing::get, Router};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::client::{DashboardClient, Poller};
use crate::config::Config;
use crate::storage::UploadDirectory;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub uploads: Arc<UploadDirectory>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let uploads = UploadDirectory::from_config(&config.inventory);
        Self {
            config: Arc::new(config),
            uploads: Arc::new(uploads),
        }
    }
}

#[derive(Parser)]
#[command(name = "vidboard")]
#[command(about = "Dashboard for a directory of uploaded videos", long_about = None)]
struct Cli {
    /// Configuration file to load instead of the default search path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dashboard HTTP server (default)
    Serve,

    /// Poll a running server and render the dashboard in the terminal
    Watch {
        #[arg(long)]
        base_url: Option<String>,

        #[arg(long)]
        interval_ms: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Watch {
            base_url,
            interval_ms,
        } => watch(config, base_url, interval_ms).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting vidboard...");

    if let Err(e) = tokio::fs::create_dir_all(&config.inventory.upload_dir).await {
        tracing::warn!(
            "Could not create upload directory {}: {}",
            config.inventory.upload_dir,
            e
        );
    }

    let addr = config.bind_addr();
    let app = create_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn watch(
    config: Config,
    base_url: Option<String>,
    interval_ms: Option<u64>,
) -> anyhow::Result<()> {
    let base_url = base_url.unwrap_or(config.client.base_url);
    let interval = Duration::from_millis(interval_ms.unwrap_or(config.client.interval_ms).max(1));

    let poller = Poller::new(
        DashboardClient::new(base_url),
        interval,
        config.client.single_flight,
    )
    .with_echo(true);

    let summary = poller.run_until(shutdown_signal()).await;
    tracing::info!(
        "Stopped polling after {} cycles ({} skipped)",
        summary.started,
        summary.skipped
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/statistics", get(handlers::inventory::get_statistics))
        .route("/videos", get(handlers::inventory::list_videos))
        .route("/queue", get(handlers::inventory::get_queue_status))
        .fallback(handlers::inventory::api_not_found);

    let prefix = state.config.inventory.url_prefix();
    let uploads = static_files::uploads_service(state.uploads.base_path());
    let frontend = static_files::frontend_service(&state.config.web.root);

    Router::new()
        .nest("/api", api_routes)
        .nest_service(&prefix, uploads)
        .fallback_service(frontend)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use crate::client::{refresh_cycle, DashboardView};
    use crate::models::{StatisticsSummary, VideoRecord};
    use tempfile::TempDir;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    struct Fixture {
        _uploads: TempDir,
        _web: TempDir,
        state: AppState,
    }

    fn fixture(files: &[(&str, usize)]) -> Fixture {
        let uploads = TempDir::new().unwrap();
        for (name, len) in files {
            std::fs::write(uploads.path().join(name), vec![1u8; *len]).unwrap();
        }
        let web = TempDir::new().unwrap();
        std::fs::write(web.path().join("index.html"), "<h1>dashboard</h1>").unwrap();

        let mut config = Config::default();
        config.inventory.upload_dir = uploads.path().to_string_lossy().into_owned();
        config.web.root = web.path().to_string_lossy().into_owned();

        Fixture {
            state: AppState::new(config),
            _uploads: uploads,
            _web: web,
        }
    }

    async fn request(state: &AppState, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = create_router(state.clone())
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header(header::ORIGIN, "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, body.to_vec())
    }

    async fn spawn_server(state: AppState) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, create_router(state)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_videos_endpoint() {
        let fx = fixture(&[("a.mp4", 1000), ("b.txt", 3)]);
        let (status, _, body) = request(&fx.state, "/api/videos").await;
        assert_eq!(status, StatusCode::OK);

        let videos: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0]["filename"], "a.mp4");
        assert_eq!(videos[0]["file_path"], "/uploaded_videos/a.mp4");
        assert_eq!(videos[0]["file_size"], 1000);
        assert_eq!(videos[0]["producer_id"], 1);
        assert_eq!(videos[0]["is_duplicate"], false);
        assert!(videos[0]["upload_timestamp"].is_number());
    }

    #[tokio::test]
    async fn test_statistics_endpoint() {
        let fx = fixture(&[("a.mp4", 1000), ("b.txt", 3)]);
        let (status, _, body) = request(&fx.state, "/api/statistics").await;
        assert_eq!(status, StatusCode::OK);

        let stats: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            stats,
            serde_json::json!({
                "total_received": 1,
                "total_processed": 1,
                "total_dropped": 0,
                "total_duplicates": 0,
                "success_rate": 100,
            })
        );
    }

    #[tokio::test]
    async fn test_missing_directory_still_answers_ok() {
        let mut config = Config::default();
        config.inventory.upload_dir = "/definitely/not/a/real/upload/dir".to_string();
        let state = AppState::new(config);

        let (status, _, body) = request(&state, "/api/videos").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"[]");

        let (status, _, body) = request(&state, "/api/statistics").await;
        assert_eq!(status, StatusCode::OK);
        let stats: StatisticsSummary = serde_json::from_slice(&body).unwrap();
        assert_eq!(stats, StatisticsSummary::default());
    }

    #[tokio::test]
    async fn test_queue_endpoint() {
        let fx = fixture(&[]);
        let (status, _, body) = request(&fx.state, "/api/queue").await;
        assert_eq!(status, StatusCode::OK);

        let queue: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            queue,
            serde_json::json!({
                "current_size": 0,
                "max_size": 10,
                "is_full": false,
                "available_slots": 10,
            })
        );
    }

    #[tokio::test]
    async fn test_unknown_api_path_is_json_404() {
        let fx = fixture(&[]);
        let (status, _, body) = request(&fx.state, "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(error, serde_json::json!({ "error": "Not found" }));
    }

    #[tokio::test]
    async fn test_serves_uploaded_file() {
        let fx = fixture(&[("clip1.mp4", 1000)]);
        let (status, headers, body) = request(&fx.state, "/uploaded_videos/clip1.mp4").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "video/mp4");
        assert_eq!(body.len(), 1000);

        let (status, _, _) = request(&fx.state, "/uploaded_videos/missing.mp4").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_serves_frontend_with_cors() {
        let fx = fixture(&[]);
        let (status, headers, body) = request(&fx.state, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<h1>dashboard</h1>");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_refresh_cycle_against_live_server() {
        let fx = fixture(&[("a.mp4", 10), ("b.mp4", 20), ("c.txt", 30)]);
        let base_url = spawn_server(fx.state.clone()).await;

        let client = DashboardClient::new(base_url);
        let view = Mutex::new(DashboardView::new());
        let report = refresh_cycle(&client, &view).await;
        assert!(report.statistics_ok);
        assert!(report.videos_ok);

        let view = view.lock().await;
        let stats = view.statistics().unwrap();
        let videos: &[VideoRecord] = view.videos().unwrap();
        assert_eq!(stats.total_processed as usize, videos.len());
        assert_eq!(videos.len(), 2);
        assert_eq!(stats.success_rate, 100);
    }

    #[tokio::test]
    async fn test_failed_cycle_keeps_previous_render() {
        let fx = fixture(&[("a.mp4", 10)]);
        let base_url = spawn_server(fx.state.clone()).await;
        let view = Mutex::new(DashboardView::new());
        refresh_cycle(&DashboardClient::new(base_url), &view).await;
        let before = view.lock().await.render();

        // Nothing listens on the discard port.
        let dead = DashboardClient::new("http://127.0.0.1:9");
        let report = refresh_cycle(&dead, &view).await;
        assert!(!report.statistics_ok);
        assert!(!report.videos_ok);
        assert_eq!(view.lock().await.render(), before);
    }

    #[tokio::test]
    async fn test_poller_fills_view() {
        let fx = fixture(&[("a.mp4", 10)]);
        let base_url = spawn_server(fx.state.clone()).await;

        let poller = Poller::new(
            DashboardClient::new(base_url),
            Duration::from_millis(20),
            true,
        );
        let summary = poller
            .run_until(tokio::time::sleep(Duration::from_millis(200)))
            .await;
        assert!(summary.started >= 1);

        let view = poller.view();
        let view = view.lock().await;
        assert_eq!(view.statistics().unwrap().total_processed, 1);
        assert_eq!(view.videos().unwrap()[0].filename, "a.mp4");
    }
}
