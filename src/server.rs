//! HTTP façade over the network registry and the visualization assets.

use crate::profile::{LoaderConfig, ProfileTable};
use crate::registry::{NetworkRegistry, SharedRegistry};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rust_embed::RustEmbed;
use serde_json::json;
use std::path::PathBuf;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

#[derive(RustEmbed)]
#[folder = "static/"]
struct Assets;

#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub data: PathBuf,
    pub loader: LoaderConfig,
    pub host: String,
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        ServeConfig {
            data: PathBuf::from("gemini_profesores.csv"),
            loader: LoaderConfig::default(),
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Where a reload reads profiles from.
#[derive(Debug, Clone)]
pub struct DataSource {
    pub path: PathBuf,
    pub loader: LoaderConfig,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: SharedRegistry,
    pub source: Option<DataSource>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/data/:attribute", get(network_handler))
        .route("/static/*path", get(asset_handler))
        .route("/api/status", get(status_handler))
        .route("/api/reload", post(reload_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Loads the table, precomputes every network and serves until shutdown.
pub async fn serve(config: ServeConfig) -> anyhow::Result<()> {
    let table = ProfileTable::from_path(&config.data, &config.loader)?;
    let registry = NetworkRegistry::build(&table);
    let state = AppState {
        registry: SharedRegistry::new(registry),
        source: Some(DataSource {
            path: config.data.clone(),
            loader: config.loader.clone(),
        }),
    };

    let listener = bind(&config.host, config.port).await?;
    info!("Visualization available at http://{}", listener.local_addr()?);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Binds a host name or IP literal, resolving names the way the OS does.
pub async fn bind(host: &str, port: u16) -> std::io::Result<tokio::net::TcpListener> {
    tokio::net::TcpListener::bind((host, port)).await
}

async fn index_handler() -> Response {
    match Assets::get("index.html") {
        Some(page) => Html(String::from_utf8_lossy(page.data.as_ref()).into_owned()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn asset_handler(Path(path): Path<String>) -> Response {
    match Assets::get(&path) {
        Some(asset) => (
            [(header::CONTENT_TYPE, asset.metadata.mimetype().to_string())],
            asset.data.into_owned(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn network_handler(
    State(state): State<AppState>,
    Path(attribute): Path<String>,
) -> Response {
    let registry = state.registry.snapshot();
    match registry.get(&attribute) {
        Ok(network) => Json(network).into_response(),
        Err(not_found) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": not_found.to_string() })),
        )
            .into_response(),
    }
}

fn status_body(registry: &NetworkRegistry) -> serde_json::Value {
    let networks: serde_json::Map<String, serde_json::Value> = registry
        .iter()
        .map(|(key, network)| {
            (
                key.as_str().to_string(),
                json!({ "nodes": network.nodes.len(), "links": network.links.len() }),
            )
        })
        .collect();
    json!({
        "status": "healthy",
        "version": crate::VERSION,
        "profiles": registry.profiles(),
        "networks": networks,
    })
}

async fn status_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(status_body(&state.registry.snapshot()))
}

async fn reload_handler(State(state): State<AppState>) -> Response {
    let Some(source) = state.source.clone() else {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "error": "no data source configured" })),
        )
            .into_response();
    };

    // Loading and centrality are CPU-bound
    let rebuilt = tokio::task::spawn_blocking(move || {
        ProfileTable::from_path(&source.path, &source.loader).map(|t| NetworkRegistry::build(&t))
    })
    .await;

    match rebuilt {
        Ok(Ok(registry)) => {
            let body = status_body(&registry);
            state.registry.replace(registry);
            info!("reloaded profile networks");
            Json(body).into_response()
        }
        Ok(Err(err)) => {
            error!(error = %err, "reload failed; keeping previous networks");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response()
        }
        Err(err) => {
            error!(error = %err, "reload task panicked");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "reload task failed" })),
            )
                .into_response()
        }
    }
}
