use crate::discovery::discover_images;
use crate::errors::Result;
use crate::page::{render_page, Row};
use crate::settings::Config;
use crate::task_scheduler::{Batch, CancelToken};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Bytes escaped inside one URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Clone)]
pub struct AppState {
    batch: Arc<Batch>,
    folder: PathBuf,
}

impl AppState {
    pub fn new(batch: Batch, folder: PathBuf) -> Self {
        Self {
            batch: Arc::new(batch),
            folder,
        }
    }
}

/// Percent-encoded `src` for the source image, relative to the served folder.
fn image_src(folder: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(folder).unwrap_or(path);
    relative
        .components()
        .map(|c| utf8_percent_encode(&c.as_os_str().to_string_lossy(), PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Discover, process and render the whole preview page.
pub fn build_page(folder: &Path, batch: &Batch, cancel: &CancelToken) -> Result<String> {
    let paths = discover_images(folder)?;
    let ids: Vec<String> = paths
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();

    let outcomes = batch.run(&ids, cancel);

    let rows: Vec<Row> = paths
        .iter()
        .zip(outcomes)
        .map(|(path, outcome)| Row {
            image_src: image_src(folder, path),
            plot: outcome
                .result
                .map(|artifact| artifact.data_uri)
                .map_err(|e| e.to_string()),
        })
        .collect();

    render_page(&rows)
}

async fn hist_page(State(state): State<AppState>) -> Response {
    let cancel = CancelToken::new();
    // Dropped with this future, so a client disconnect stops pending jobs.
    let _guard = cancel.guard();

    let task_cancel = cancel.clone();
    let task_state = state.clone();
    let joined = tokio::task::spawn_blocking(move || {
        build_page(&task_state.folder, &task_state.batch, &task_cancel)
    })
    .await;

    match joined {
        Ok(Ok(html)) => Html(html).into_response(),
        Ok(Err(e)) => {
            log::error!("[{}] {}", e.error_code(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
        Err(e) => {
            log::error!("Histogram task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "histogram task failed").into_response()
        }
    }
}

pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.folder);
    Router::new()
        .route("/hist", get(hist_page))
        .fallback_service(static_files)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Cannot listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}

/// Bind and serve until Ctrl-C. Only startup failures are returned.
pub async fn serve(config: &Config) -> Result<()> {
    config.validate()?;

    let batch = Batch::new(config.batch.clone())?;
    let state = AppState::new(batch, config.server.folder.clone());

    let addr = config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!(
        "Started at http://{}/hist serving {:?}",
        addr,
        config.server.folder
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
