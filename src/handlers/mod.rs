//! HTTP handler modules.
//! Used by: server.

pub mod items;
pub mod metrics;
pub mod synthetic;

#[cfg(test)]
pub(crate) mod testing {
    use axum::body::{Body, Bytes};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    use crate::server::build_router;
    use crate::state::{build_test_state, AppState};

    /// Router over a migrated SQLite file in a fresh temp dir.
    pub fn router() -> (tempfile::TempDir, AppState, Router) {
        router_with_db(true)
    }

    /// With `reachable = false` the database path sits in a missing directory,
    /// so every store call fails.
    pub fn router_with_db(reachable: bool) -> (tempfile::TempDir, AppState, Router) {
        let dir = tempfile::tempdir().unwrap();
        let path = if reachable {
            dir.path().join("rows.db")
        } else {
            dir.path().join("missing").join("rows.db")
        };
        let state = build_test_state(&path);
        if reachable {
            state.db.migrate().unwrap();
        }
        let app = build_router(state.clone());
        (dir, state, app)
    }

    pub async fn send(
        app: &Router,
        method: Method,
        path: &str,
        json: Option<serde_json::Value>,
    ) -> (StatusCode, Bytes) {
        let builder = Request::builder().method(method).uri(path);
        let request = match json {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body)
    }

    pub async fn get(app: &Router, path: &str) -> (StatusCode, Bytes) {
        send(app, Method::GET, path, None).await
    }

    pub fn json_body(body: &[u8]) -> serde_json::Value {
        serde_json::from_slice(body).unwrap()
    }
}
