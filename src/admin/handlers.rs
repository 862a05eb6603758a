use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;
use crate::routing::{BaseDirectory, RequestKind};

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemStatus {
    pub version: String,
    pub status: String,
    pub origin: String,
    pub production_dir: String,
    pub index_document: String,
}

#[derive(Debug, Deserialize)]
pub struct RewriteQuery {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub uri: String,
}

/// What the edge would request from storage for a given host and URI.
#[derive(Debug, Serialize)]
pub struct RewritePreview {
    pub host: String,
    pub uri: String,
    pub rewritten: String,
    pub base_dir: BaseDirectory,
    pub kind: RequestKind,
    pub tenant: Option<String>,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let inner = state.inner.load();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "operational".to_string(),
        origin: inner.origin.to_string(),
        production_dir: inner.config.routing.production_dir.clone(),
        index_document: inner.config.routing.index_document.clone(),
    })
}

pub async fn get_rewrite(
    State(state): State<AppState>,
    Query(query): Query<RewriteQuery>,
) -> Json<RewritePreview> {
    let rewrite = state.inner.load().router.rewrite(&query.host, &query.uri);
    Json(RewritePreview {
        host: query.host,
        uri: query.uri,
        rewritten: rewrite.uri,
        base_dir: rewrite.base_dir,
        kind: rewrite.kind,
        tenant: rewrite.tenant,
    })
}
