use std::fmt;
use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::auth::revocation::{InMemoryRevocationStore, RevocationStore};
use crate::config::app::RuntimeEnv;
use crate::uploads::optimizer::{ImageOptimizer, RasterOptimizer};
use crate::uploads::storage::{InMemoryMediaStore, MediaStore};

/// Shared resources handed to every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection (absent in some unit tests)
    db: Option<DatabaseConnection>,
    pub security: SecurityConfig,
    pub revocations: Arc<dyn RevocationStore>,
    pub media: Arc<dyn MediaStore>,
    pub optimizer: Arc<dyn ImageOptimizer>,
    pub env: RuntimeEnv,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig) -> Self {
        Self {
            db: Some(db),
            ..Self::new_without_db(security)
        }
    }

    /// In-memory collaborators and no database.
    pub fn new_without_db(security: SecurityConfig) -> Self {
        Self {
            db: None,
            security,
            revocations: Arc::new(InMemoryRevocationStore::new()),
            media: Arc::new(InMemoryMediaStore::new()),
            optimizer: Arc::new(RasterOptimizer),
            env: RuntimeEnv::default(),
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db.is_some())
            .field("env", &self.env)
            .finish_non_exhaustive()
    }
}
