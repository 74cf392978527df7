//! Row CRUD endpoints over the SQLite store.
//! Used by: server.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::outcome::RequestScope;
use crate::state::AppState;
use crate::store::sqlite::{Database, Row};

#[derive(Debug, Deserialize)]
pub struct AddRequest {
    pub item_id: i64,
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct PutRequest {
    pub data: String,
}

/// Runs one store call off the async workers.
async fn with_db<T, F>(state: &AppState, op: F) -> Result<T>
where
    F: FnOnce(&Database) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let db = state.db.clone();
    tokio::task::spawn_blocking(move || op(&db))
        .await
        .map_err(|e| Error::StoreTask(e.to_string()))?
}

/// Settles the scope on the result of a store call. `context` names the
/// operation in the log line; the cause never reaches the client.
fn settle<T>(scope: RequestScope, context: &str, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            scope.pass();
            Ok(value)
        }
        Err(e) => {
            tracing::error!(error = %e, "{}", context);
            Err(scope.fail(e))
        }
    }
}

fn body<T>(scope: RequestScope, payload: std::result::Result<Json<T>, JsonRejection>) -> Result<(RequestScope, T)> {
    match payload {
        Ok(Json(value)) => Ok((scope, value)),
        Err(rejection) => {
            tracing::warn!(reason = %rejection.body_text(), "rejected request body");
            Err(scope.fail(Error::InvalidBody(rejection.body_text())))
        }
    }
}

fn row_id(scope: RequestScope, path: std::result::Result<Path<i64>, PathRejection>) -> Result<(RequestScope, i64)> {
    match path {
        Ok(Path(id)) => Ok((scope, id)),
        Err(rejection) => {
            tracing::warn!(reason = %rejection.body_text(), "rejected row id");
            Err(scope.fail(Error::InvalidPath(rejection.body_text())))
        }
    }
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Row>>> {
    let scope = RequestScope::begin(&state.metrics);
    let result = with_db(&state, |db| db.fetch_all()).await;
    let rows = settle(scope, "error fetching data from database", result)?;
    Ok(Json(rows))
}

pub async fn add(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AddRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>)> {
    let (scope, req) = body(RequestScope::begin(&state.metrics), payload)?;
    let result = with_db(&state, move |db| db.insert(req.item_id, &req.data)).await;
    settle(scope, "error adding data to database", result)?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "Added" }))))
}

pub async fn modify(
    State(state): State<AppState>,
    path: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<PutRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let (scope, id) = row_id(RequestScope::begin(&state.metrics), path)?;
    let (scope, req) = body(scope, payload)?;
    let result = with_db(&state, move |db| db.update(id, &req.data)).await;
    settle(scope, "error modifying data in database", result)?;
    Ok(Json(json!({ "message": "Modified" })))
}

pub async fn delete(
    State(state): State<AppState>,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>> {
    let (scope, id) = row_id(RequestScope::begin(&state.metrics), path)?;
    let result = with_db(&state, move |db| db.delete(id)).await;
    settle(scope, "error deleting data from database", result)?;
    Ok(Json(json!({ "message": "Deleted" })))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::handlers::testing::{get, json_body, router, router_with_db, send};

    #[tokio::test]
    async fn add_then_get_round_trip() {
        let (_dir, state, app) = router();
        let (status, body) = send(&app, Method::POST, "/add", Some(json!({ "item_id": 1, "data": "x" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json_body(&body), json!({ "message": "Added" }));

        let (status, body) = get(&app, "/get").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body), json!([[1, 1, "x"]]));

        let s = state.metrics.snapshot();
        assert_eq!((s.request_count, s.pass_rate, s.error_rate), (2, 2, 0));
        assert_eq!(s.latency_count, 0);
    }

    #[tokio::test]
    async fn put_modifies_row() {
        let (_dir, state, app) = router();
        state.db.insert(16, "before").unwrap();

        let (status, body) = send(&app, Method::PUT, "/put/1", Some(json!({ "data": "test updated" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body), json!({ "message": "Modified" }));
        assert_eq!(state.db.fetch_all().unwrap()[0].data, "test updated");
        assert_eq!(state.metrics.snapshot().pass_rate, 1);
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let (_dir, state, app) = router();
        state.db.insert(1, "gone").unwrap();

        let (status, body) = send(&app, Method::DELETE, "/delete/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body), json!({ "message": "Deleted" }));
        assert!(state.db.fetch_all().unwrap().is_empty());
        assert_eq!(state.metrics.snapshot().pass_rate, 1);
    }

    #[tokio::test]
    async fn store_failure_takes_error_path() {
        let (_dir, state, app) = router_with_db(false);
        for (method, path, payload) in [
            (Method::GET, "/get", None),
            (Method::POST, "/add", Some(json!({ "item_id": 1, "data": "x" }))),
            (Method::PUT, "/put/1", Some(json!({ "data": "y" }))),
            (Method::DELETE, "/delete/1", None),
        ] {
            let (status, body) = send(&app, method, path, payload).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{path}");
            assert_eq!(json_body(&body), json!({ "error": "Database error occurred" }), "{path}");
        }
        let s = state.metrics.snapshot();
        assert_eq!((s.request_count, s.pass_rate, s.error_rate), (4, 0, 4));
    }

    #[tokio::test]
    async fn missing_key_is_client_error() {
        let (_dir, state, app) = router();
        let (status, body) = send(&app, Method::POST, "/add", Some(json!({ "item_id": 1 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_body(&body), json!({ "error": "Invalid request body" }));

        let s = state.metrics.snapshot();
        assert_eq!((s.request_count, s.pass_rate, s.error_rate), (1, 0, 1));
        assert!(state.db.fetch_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_numeric_id_is_counted_client_error() {
        let (_dir, state, app) = router();
        state.db.insert(1, "kept").unwrap();

        let (status, body) = send(&app, Method::DELETE, "/delete/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_body(&body), json!({ "error": "Invalid path parameter" }));

        let (status, body) = send(&app, Method::PUT, "/put/abc", Some(json!({ "data": "y" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_body(&body), json!({ "error": "Invalid path parameter" }));

        let s = state.metrics.snapshot();
        assert_eq!((s.request_count, s.pass_rate, s.error_rate), (2, 0, 2));
        assert_eq!(state.db.fetch_all().unwrap()[0].data, "kept");
    }

    #[tokio::test]
    async fn missing_body_is_client_error() {
        let (_dir, state, app) = router();
        let (status, _) = send(&app, Method::PUT, "/put/1", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(state.metrics.snapshot().error_rate, 1);
    }
}
