use std::sync::Arc;

use backend::config::{DbProfile, RuntimeEnv};
use backend::infra::state::build_state;
use backend::state::app_state::AppState;
use backend::state::security_config::SecurityConfig;
use backend::uploads::InMemoryMediaStore;

pub const TEST_JWT_SECRET: &[u8] = b"integration-test-secret";

/// Fresh in-memory SQLite with the schema applied. Each call is isolated.
pub async fn build_test_state() -> AppState {
    build_test_state_with_media(Arc::new(InMemoryMediaStore::new())).await
}

/// Same as [`build_test_state`] but with a media store the test can inspect.
pub async fn build_test_state_with_media(media: Arc<InMemoryMediaStore>) -> AppState {
    build_state()
        .with_db(DbProfile::InMemory)
        .with_env(RuntimeEnv::Test)
        .with_security(SecurityConfig::new(TEST_JWT_SECRET))
        .with_media_store(media)
        .build()
        .await
        .expect("test state should build")
}
