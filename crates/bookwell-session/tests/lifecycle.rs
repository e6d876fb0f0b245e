//! Integration tests for the session lifecycle across app launches.
//!
//! Each "launch" is a fresh `SessionManager` over the same store, which is
//! how the app sees persisted state after being killed and reopened.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use bookwell_session::{
    AuthHeader, AuthStatus, BusinessInfo, SessionConfig, SessionManager, UserProfile, token,
};
use bookwell_store::{JsonFileStore, KeyValueStore, MemoryStore};

// =========================================================================
// Helpers
// =========================================================================

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

fn token_with_exp(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"u1","exp":{exp}}}"#));
    format!("{header}.{payload}.signature")
}

fn launch<S: KeyValueStore>(store: S) -> SessionManager<S, AuthHeader> {
    SessionManager::new(store, AuthHeader::new(), SessionConfig::default())
}

fn owner() -> UserProfile {
    UserProfile {
        id: Some("u1".into()),
        email: Some("owner@studio.test".into()),
        business: BusinessInfo {
            id: Some("biz-7".into()),
            name: Some("Studio".into()),
            phone: Some("555-0100".into()),
            ..Default::default()
        },
        ..Default::default()
    }
}

// =========================================================================
// Token predicate
// =========================================================================

#[test]
fn test_token_expired_one_second_ago_is_invalid() {
    assert!(!token::is_valid(&token_with_exp(now_secs() - 1)));
}

#[test]
fn test_token_expiring_in_an_hour_is_valid() {
    assert!(token::is_valid(&token_with_exp(now_secs() + 3600)));
}

// =========================================================================
// Launch scenarios
// =========================================================================

#[tokio::test]
async fn test_launch_with_expired_token_clears_store_and_signs_out() {
    let store = MemoryStore::with_entries([("token", token_with_exp(now_secs() - 1))]);
    let mut mgr = launch(store.clone());

    let session = mgr.initialize().await;

    assert_eq!(session.status, AuthStatus::Unauthenticated);
    assert!(!session.is_loading());
    assert!(store.get("token").await.unwrap().is_none());
}

#[tokio::test]
async fn test_launch_with_live_token_is_authenticated_with_empty_user() {
    let store = MemoryStore::with_entries([("token", token_with_exp(now_secs() + 3600))]);
    let header = AuthHeader::new();
    let mut mgr = SessionManager::new(store, header.clone(), SessionConfig::default());

    let session = mgr.initialize().await;

    assert_eq!(session.status, AuthStatus::Authenticated);
    assert!(!session.is_loading());
    assert!(session.user.is_empty());
    assert!(header.is_attached(), "outbound requests should carry the token");
}

#[tokio::test]
async fn test_initialize_always_finishes_loading() {
    let offline = MemoryStore::new();
    offline.set_offline(true);
    let stores = [
        MemoryStore::new(),
        MemoryStore::with_entries([("token", "junk")]),
        MemoryStore::with_entries([("token", token_with_exp(now_secs() + 60))]),
        offline,
    ];

    for store in stores {
        let mut mgr = launch(store);
        assert!(!mgr.initialize().await.is_loading());
    }
}

// =========================================================================
// Login → relaunch → logout → relaunch
// =========================================================================

#[tokio::test]
async fn test_login_survives_relaunch_and_logout_does_not() {
    let store = MemoryStore::new();

    // First launch: nobody signed in, user logs in.
    let mut first = launch(store.clone());
    first.initialize().await;
    first
        .handle_auth_success(owner(), token_with_exp(now_secs() + 3600))
        .await
        .unwrap();
    first.remember_business_id("biz-7").await.unwrap();

    // Second launch: session restored from the persisted token.
    let mut second = launch(store.clone());
    assert!(second.initialize().await.is_authenticated());
    second.logout().await.unwrap();
    assert_eq!(second.session().user, UserProfile::default());

    // Third launch: signed out, but the business id is still there.
    let mut third = launch(store.clone());
    assert_eq!(third.initialize().await.status, AuthStatus::Unauthenticated);
    assert_eq!(third.last_business_id().await.as_deref(), Some("biz-7"));
}

#[tokio::test]
async fn test_logout_removes_every_other_key() {
    let store = MemoryStore::new();
    let mut mgr = launch(store.clone());
    mgr.initialize().await;
    mgr.handle_auth_success(owner(), token_with_exp(now_secs() + 3600))
        .await
        .unwrap();
    mgr.remember_business_id("biz-7").await.unwrap();
    mgr.store_subscription(&serde_json::json!({ "id": "sub_1" }))
        .await
        .unwrap();
    for key in ["onboardingDraft", "reminderTime", "theme"] {
        store.set(key, "x").await.unwrap();
    }

    mgr.logout().await.unwrap();

    for key in ["token", "subscription", "onboardingDraft", "reminderTime", "theme"] {
        assert!(store.get(key).await.unwrap().is_none(), "{key} should be gone");
    }
    assert_eq!(
        store.get("lastBusinessId").await.unwrap().as_deref(),
        Some("biz-7")
    );
}

#[tokio::test]
async fn test_file_store_round_trip_across_launches() {
    let mut path = std::env::temp_dir();
    path.push(format!("bookwell-lifecycle-{}.json", std::process::id()));

    let mut first = launch(JsonFileStore::new(&path));
    first.initialize().await;
    first
        .handle_auth_success(owner(), token_with_exp(now_secs() + 3600))
        .await
        .unwrap();

    let mut second = launch(JsonFileStore::new(&path));
    assert!(second.initialize().await.is_authenticated());

    second.logout().await.unwrap();
    assert!(!path.exists(), "logout with nothing preserved removes the file");
}

#[tokio::test]
async fn test_custom_keys_are_respected() {
    let config = SessionConfig {
        token_key: "auth.token".into(),
        preserved_key: "auth.lastBusiness".into(),
        subscription_key: "billing.snapshot".into(),
    };
    let store = MemoryStore::with_entries([("auth.lastBusiness", "biz-3")]);
    let mut mgr = SessionManager::new(store.clone(), AuthHeader::new(), config);
    mgr.initialize().await;

    mgr.handle_auth_success(owner(), token_with_exp(now_secs() + 3600))
        .await
        .unwrap();
    assert!(store.get("auth.token").await.unwrap().is_some());
    assert!(store.get("token").await.unwrap().is_none());

    mgr.logout().await.unwrap();
    assert_eq!(
        store.get("auth.lastBusiness").await.unwrap().as_deref(),
        Some("biz-3")
    );
}
