//! Shared application state.

use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::store::sqlite::Database;
use crate::telemetry::Metrics;

pub struct AppStateInner {
    pub metrics: Arc<Metrics>,
    pub db: Database,
}

pub type AppState = Arc<AppStateInner>;

pub fn build_state(db_path: &Path) -> Result<AppState> {
    let db = Database::new(db_path);
    // The store is consulted per request; an unreachable file only fails the CRUD calls.
    if let Err(e) = db.migrate() {
        tracing::warn!(error = %e, path = %db_path.display(), "could not prepare row table");
    }
    Ok(Arc::new(AppStateInner {
        metrics: Arc::new(Metrics::new()?),
        db,
    }))
}

#[cfg(test)]
pub fn build_test_state(db_path: &Path) -> AppState {
    Arc::new(AppStateInner {
        metrics: Arc::new(Metrics::new().unwrap()),
        db: Database::new(db_path),
    })
}
