use std::sync::Arc;

use crate::auth::revocation::{InMemoryRevocationStore, RevocationStore};
use crate::config::app::RuntimeEnv;
use crate::config::db::DbProfile;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;
use crate::uploads::optimizer::{ImageOptimizer, RasterOptimizer};
use crate::uploads::storage::{InMemoryMediaStore, MediaStore};

/// Builder for `AppState`, used by both `main` and tests.
pub struct StateBuilder {
    security_config: SecurityConfig,
    db_profile: Option<DbProfile>,
    env: RuntimeEnv,
    revocations: Option<Arc<dyn RevocationStore>>,
    media: Option<Arc<dyn MediaStore>>,
    optimizer: Option<Arc<dyn ImageOptimizer>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::default(),
            db_profile: None,
            env: RuntimeEnv::default(),
            revocations: None,
            media: None,
            optimizer: None,
        }
    }
    pub fn with_db(mut self, profile: DbProfile) -> Self {
        self.db_profile = Some(profile);
        self
    }
    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }
    pub fn with_env(mut self, env: RuntimeEnv) -> Self {
        self.env = env;
        self
    }
    pub fn with_revocations(mut self, store: Arc<dyn RevocationStore>) -> Self {
        self.revocations = Some(store);
        self
    }
    pub fn with_media_store(mut self, store: Arc<dyn MediaStore>) -> Self {
        self.media = Some(store);
        self
    }
    pub fn with_optimizer(mut self, optimizer: Arc<dyn ImageOptimizer>) -> Self {
        self.optimizer = Some(optimizer);
        self
    }

    /// Connects and migrates when a DB profile was given.
    pub async fn build(self) -> Result<AppState, AppError> {
        let mut state = match &self.db_profile {
            Some(profile) => AppState::new(bootstrap_db(profile).await?, self.security_config),
            None => AppState::new_without_db(self.security_config),
        };

        state.env = self.env;
        state.revocations = self
            .revocations
            .unwrap_or_else(|| Arc::new(InMemoryRevocationStore::new()));
        state.media = self
            .media
            .unwrap_or_else(|| Arc::new(InMemoryMediaStore::new()));
        state.optimizer = self.optimizer.unwrap_or_else(|| Arc::new(RasterOptimizer));
        Ok(state)
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
