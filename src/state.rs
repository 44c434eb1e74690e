use std::sync::Arc;

use sqlx::SqlitePool;

use crate::services::registry::ClientRegistry;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    /// Process-wide map of live Telegram clients, shared by every handler.
    pub registry: Arc<ClientRegistry>,
}

impl AppState {
    pub fn new(pool: SqlitePool, registry: Arc<ClientRegistry>) -> Self {
        Self { pool, registry }
    }
}
