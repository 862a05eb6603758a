//! Admin API.
//!
//! # Endpoints
//! - `GET /admin/status`: version, origin and routing settings
//! - `GET /admin/rewrite?host=..&uri=..`: dry-run of the edge router
//!
//! Every endpoint requires `Authorization: Bearer <admin.api_key>`.

pub mod auth;
pub mod handlers;

use axum::{middleware, routing::get, Router};

use crate::http::server::AppState;

/// Build the admin router over the same state as the edge server.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/admin/status", get(handlers::get_status))
        .route("/admin/rewrite", get(handlers::get_rewrite))
        .layer(middleware::from_fn_with_state(state.clone(), auth::admin_auth_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EdgeConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        let mut config = EdgeConfig::default();
        config.admin.enabled = true;
        config.admin.api_key = "secret".into();
        router(AppState::new(config).unwrap())
    }

    async fn get(app: Router, uri: &str, key: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut req = Request::builder().uri(uri);
        if let Some(key) = key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }
        let res = app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), 64 * 1024).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_requires_api_key() {
        let (status, _) = get(app(), "/admin/status", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = get(app(), "/admin/status", Some("wrong")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_status() {
        let (status, json) = get(app(), "/admin/status", Some("secret")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "operational");
        assert_eq!(json["origin"], "http://127.0.0.1:9000/");
        assert_eq!(json["production_dir"], "production");
    }

    #[tokio::test]
    async fn test_rewrite_preview() {
        let (status, json) = get(
            app(),
            "/admin/rewrite?host=acme.example.com&uri=/dashboard",
            Some("secret"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["rewritten"], "/acme/index.html");
        assert_eq!(json["base_dir"], "/acme");
        assert_eq!(json["kind"], "route");
        assert_eq!(json["tenant"], "acme");
    }

    #[tokio::test]
    async fn test_rewrite_preview_production() {
        let (_, json) = get(
            app(),
            "/admin/rewrite?host=www.example.com&uri=/style.css",
            Some("secret"),
        )
        .await;
        assert_eq!(json["rewritten"], "/production/style.css");
        assert_eq!(json["kind"], "file");
        assert!(json["tenant"].is_null());
    }
}
