//! Shared context for the API layer.

use std::path::PathBuf;
use std::sync::Arc;

use rusqlite::Connection;

use crate::db::{open_database, DatabaseError};
use crate::predictor::Predictor;
use crate::screening::Clock;

/// Shared context for all API routes and middleware.
///
/// Dependencies are constructed once at startup and injected; nothing in
/// the request path reaches for process-global state.
#[derive(Clone)]
pub struct ApiContext {
    db_path: Arc<PathBuf>,
    pub predictor: Arc<dyn Predictor>,
    pub clock: Arc<dyn Clock>,
}

impl ApiContext {
    pub fn new(db_path: PathBuf, predictor: Arc<dyn Predictor>, clock: Arc<dyn Clock>) -> Self {
        Self {
            db_path: Arc::new(db_path),
            predictor,
            clock,
        }
    }

    /// Open a connection for this request. Migrations were already run at
    /// startup, so the per-request version check is a no-op.
    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        open_database(&self.db_path)
    }
}
