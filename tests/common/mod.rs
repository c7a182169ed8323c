// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use gym_planner::config::Config;
use gym_planner::db::FirestoreDb;
use gym_planner::middleware::auth::create_jwt;
use gym_planner::models::{Member, Role};
use gym_planner::routes::create_router;
use gym_planner::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::test_default(), test_db_offline()));
    (create_router(state.clone()), state)
}

/// Create a test app backed by the emulator.
#[allow(dead_code)]
pub async fn create_emulator_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::test_default(), test_db().await));
    (create_router(state.clone()), state)
}

/// Create a session token the auth middleware accepts.
#[allow(dead_code)]
pub fn create_test_jwt(member_id: &str, role: Role, signing_key: &[u8]) -> String {
    create_jwt(member_id, role, signing_key).expect("Failed to create JWT")
}

/// Build a member profile with a unique ID.
#[allow(dead_code)]
pub fn test_member(name: &str, role: Role) -> Member {
    Member::new(
        name.to_string(),
        format!("{}@example.com", name.to_lowercase()),
        role,
        &chrono::Utc::now().to_rfc3339(),
    )
}
