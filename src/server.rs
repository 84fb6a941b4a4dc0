use crate::corpus::Corpus;
use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};

#[derive(Clone)]
struct ApiState {
    corpus: Arc<Corpus>,
    cache_control: HeaderValue,
}

pub fn router(corpus: Arc<Corpus>, cache_max_age: u64) -> Router {
    let cache_control = HeaderValue::from_str(&format!("public, max-age={}", cache_max_age))
        .unwrap_or_else(|_| HeaderValue::from_static("no-cache"));
    let state = ApiState {
        corpus,
        cache_control,
    };

    Router::new()
        .route("/quotes", get(list_quotes))
        .route("/quotes/byfile", get(quotes_by_file))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

async fn list_quotes(State(state): State<ApiState>) -> Response {
    cached(&state, Json(state.corpus.quotes()))
}

async fn quotes_by_file(State(state): State<ApiState>) -> Response {
    cached(&state, Json(state.corpus.categories()))
}

fn cached(state: &ApiState, body: impl IntoResponse) -> Response {
    (
        [(header::CACHE_CONTROL, state.cache_control.clone())],
        body,
    )
        .into_response()
}

pub async fn serve(corpus: Arc<Corpus>, addr: SocketAddr, cache_max_age: u64) -> Result<()> {
    let app = router(corpus, cache_max_age);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Could not bind {}", addr))?;
    info!(%addr, "serving quotes");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
