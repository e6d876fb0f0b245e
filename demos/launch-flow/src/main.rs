//! Walks one device through launch → sign-in → onboarding → sign-out →
//! relaunch, printing every route the shell would show.
//!
//! Run with `RUST_LOG=debug` to see the session layer's events too.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use bookwell::prelude::*;

// ---------------------------------------------------------------------------
// Stand-ins for the remote API
// ---------------------------------------------------------------------------

/// Pretends to be the auth endpoint: issues a one-hour token.
fn issue_token(user_id: &str) -> String {
    let exp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
        + 3600;
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"{user_id}","exp":{exp}}}"#));
    format!("{header}.{payload}.demo")
}

/// Pretends to be the profile endpoint. Reports a finished onboarding once
/// `paid` is flipped.
struct DemoProfiles {
    paid: AtomicBool,
}

impl ProfileSource for DemoProfiles {
    async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        Ok(UserProfile {
            id: Some("u-100".into()),
            email: Some("owner@studio.test".into()),
            first_name: Some("Sam".into()),
            business: BusinessInfo {
                id: Some("biz-100".into()),
                name: Some("Sam's Studio".into()),
                phone: Some("555-0100".into()),
                ..Default::default()
            },
            services: vec![Service {
                name: "Consultation".into(),
                duration_minutes: 45,
                price_cents: 6000,
                ..Default::default()
            }],
            subscription_active: self.paid.load(Ordering::SeqCst),
            ..Default::default()
        })
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), BookwellError> {
    let config = AppConfig::from_json(r#"{ "logFilter": "info" }"#)?;
    bookwell::logging::init(&config.log_filter);

    let mut path = std::env::temp_dir();
    path.push("bookwell-launch-flow.json");
    let store = JsonFileStore::new(&path);
    store.clear().await?;

    let header = AuthHeader::new();
    let mut app = App::builder()
        .config(config.clone())
        .build(store, header.clone());

    // A second reader, as a navigation container would hold.
    let mut gate = app.route_gate();
    let watcher = tokio::spawn(async move {
        while let Some(route) = gate.next_change().await {
            println!("  navigator → {route}");
        }
    });

    println!("launch #1");
    println!("  start → {}", app.start().await);

    println!("sign in");
    let profiles = DemoProfiles {
        paid: AtomicBool::new(false),
    };
    app.session_mut()
        .handle_auth_success(UserProfile::default(), issue_token("u-100"))
        .await?;
    println!("  header: {}", header.value().unwrap_or_default());

    let user = app.session_mut().refresh_profile(&profiles).await?;
    if let Some(business_id) = user.business.id.as_deref() {
        app.session_mut().remember_business_id(business_id).await?;
    }

    println!("checkout");
    let snapshot = app
        .session()
        .store_subscription(&serde_json::json!({
            "id": "sub_demo",
            "status": "active",
            "items": { "data": [{ "price": {
                "id": "price_monthly",
                "unit_amount": 2900,
                "currency": "usd",
                "recurring": { "interval": "month", "interval_count": 1 }
            }}]}
        }))
        .await?;
    println!(
        "  cached plan: {} {} / {}",
        snapshot.amount.unwrap_or_default(),
        snapshot.currency.as_deref().unwrap_or("?"),
        snapshot.interval.as_deref().unwrap_or("?")
    );
    profiles.paid.store(true, Ordering::SeqCst);
    app.session_mut().refresh_profile(&profiles).await?;

    println!("sign out");
    app.session_mut().logout().await?;
    println!(
        "  remembered business: {}",
        app.session().last_business_id().await.unwrap_or_default()
    );

    drop(app);
    if let Err(e) = watcher.await {
        tracing::warn!(error = %e, "route watcher stopped abnormally");
    }

    println!("launch #2");
    let mut relaunched = App::builder()
        .config(config)
        .build(JsonFileStore::new(&path), AuthHeader::new());
    println!("  start → {}", relaunched.start().await);
    println!(
        "  remembered business: {}",
        relaunched.session().last_business_id().await.unwrap_or_default()
    );

    relaunched.session().store().clear().await?;
    Ok(())
}
