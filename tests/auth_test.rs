// ==========================================
// Auth boundary tests
// ==========================================
// AuthApi over LocalAuthProvider + ConfigManager
// ==========================================

mod test_helpers;

use reagent_inventory::api::ApiError;
use reagent_inventory::auth::ProviderIdentity;
use reagent_inventory::config::config_keys;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use test_helpers::create_test_state;

#[tokio::test]
async fn test_sign_up_sign_out_sign_in() {
    let (_tmp, state) = create_test_state();
    let auth = &state.auth_api;

    let created = auth
        .sign_up("ana@lab.test", "secreto", Some("Ana Pérez"))
        .await
        .unwrap();
    assert!(auth.session().can_write());

    auth.sign_out().await.unwrap();
    assert!(auth.current_user().is_none());
    assert!(!auth.session().can_write());

    let user = auth.sign_in("ANA@lab.test", "secreto").await.unwrap();
    assert_eq!(user.uid, created.uid);
    assert_eq!(user.label(), "Ana Pérez");
}

#[tokio::test]
async fn test_bad_credentials_are_auth_failures() {
    let (_tmp, state) = create_test_state();
    state
        .auth_api
        .sign_up("ana@lab.test", "secreto", None)
        .await
        .unwrap();
    state.auth_api.sign_out().await.unwrap();

    let result = state.auth_api.sign_in("ana@lab.test", "incorrecta").await;
    assert!(matches!(result, Err(ApiError::AuthFailed(_))));
    assert!(state.auth_api.current_user().is_none());
}

#[tokio::test]
async fn test_sign_up_can_be_disabled() {
    let (_tmp, state) = create_test_state();
    state
        .config
        .set_global_config_value(config_keys::AUTH_ALLOW_SIGN_UP, "false")
        .unwrap();

    let result = state.auth_api.sign_up("ana@lab.test", "secreto", None).await;
    assert!(matches!(result, Err(ApiError::AuthFailed(_))));

    // provider sign-in is unaffected
    let user = state
        .auth_api
        .sign_in_with_provider(ProviderIdentity {
            provider: "google.com".to_string(),
            email: "ana@lab.test".to_string(),
            display_name: None,
        })
        .await
        .unwrap();
    assert_eq!(user.label(), "ana@lab.test");
}

#[tokio::test]
async fn test_current_user_listener() {
    let (_tmp, state) = create_test_state();
    let seen: Arc<Mutex<Vec<Option<String>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let handle = state
        .auth_api
        .on_current_user_changed(move |user| sink.lock().unwrap().push(user.map(|u| u.email)));
    tokio::time::sleep(Duration::from_millis(50)).await;

    state
        .auth_api
        .sign_up("ana@lab.test", "secreto", None)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    state.auth_api.sign_out().await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.unsubscribe();

    let seen = seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![None, Some("ana@lab.test".to_string()), None]
    );
}
