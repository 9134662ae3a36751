use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use khadamat::api::{self, ApiClient, ApiError, NoToken, SignInError};
use khadamat::i18n::{self, Locale, Message};
use khadamat::models::{AuthTokens, Credentials, MaidFilters, MaidId, User, UserRole};
use khadamat::session::SessionStore;
use khadamat::storage::{MemoryStore, ACCESS_TOKEN_KEY, LEGACY_TOKEN_KEY, USER_KEY};

#[derive(Default)]
struct Recorded {
    queries: Vec<HashMap<String, String>>,
    refresh_calls: usize,
}

type Shared = Arc<Mutex<Recorded>>;

fn user_json(role: &str) -> Value {
    json!({
        "id": "u-1",
        "email": "layla@example.ae",
        "fullName": "Layla Hassan",
        "phone": "+971501234567",
        "role": role,
    })
}

fn ok(data: Value) -> Response {
    Json(json!({ "success": true, "data": data })).into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    match body["email"].as_str().unwrap_or_default() {
        "admin@khadamat.ae" => ok(json!({
            "tokens": { "accessToken": "access-1", "refreshToken": "refresh-1" },
            "user": user_json("super_admin"),
        })),
        "office@khadamat.ae" => ok(json!({
            "tokens": { "accessToken": "office-token", "refreshToken": "office-refresh" },
            "user": user_json("office"),
        })),
        "legacy@khadamat.ae" => ok(json!({
            "token": "single-token",
            "user": user_json("customer"),
        })),
        "layla@example.ae" => ok(json!({
            "tokens": { "accessToken": "access-1", "refreshToken": "refresh-1" },
            "user": user_json("customer"),
        })),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "error": "Invalid email or password" })),
        )
            .into_response(),
    }
}

async fn me(headers: HeaderMap) -> Response {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if bearer == "Bearer access-1" || bearer == "Bearer access-2" {
        ok(user_json("customer"))
    } else {
        (StatusCode::UNAUTHORIZED, "").into_response()
    }
}

async fn refresh(State(shared): State<Shared>, Json(body): Json<Value>) -> Response {
    shared.lock().expect("recorder").refresh_calls += 1;
    if body["refreshToken"] == "refresh-1" {
        ok(json!({ "accessToken": "access-2", "refreshToken": "refresh-2" }))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Refresh token expired" })),
        )
            .into_response()
    }
}

async fn list_maids(
    State(shared): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    shared.lock().expect("recorder").queries.push(query);
    ok(json!({
        "items": [{
            "id": "m-1",
            "name": "Maria Santos",
            "nationality": "PH",
            "age": 31,
            "experienceYears": 6,
            "monthlySalary": 2200,
            "emirate": "DXB",
            "officeId": "o-1",
            "isAvailable": true,
        }],
        "total": 1,
        "page": 1,
        "limit": 20,
    }))
}

async fn show_maid(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "missing" => Json(json!({ "success": false, "error": "Maid not found" })).into_response(),
        "quiet" => Json(json!({ "success": false })).into_response(),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response(),
    }
}

async fn spawn_api() -> (String, Shared) {
    let shared = Shared::default();
    let router = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/maids", get(list_maids))
        .route("/api/maids/:id", get(show_maid))
        .with_state(shared.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fake api serves");
    });
    (format!("http://{addr}/api"), shared)
}

fn session_client(
    base_url: &str,
    store: &MemoryStore,
) -> (Arc<SessionStore<MemoryStore>>, ApiClient) {
    let session = Arc::new(SessionStore::new(Arc::new(store.clone())));
    session.initialize();
    let client = ApiClient::with_http(reqwest::Client::new(), base_url, session.clone());
    (session, client)
}

fn credentials(email: &str) -> Credentials {
    Credentials {
        email: email.to_string(),
        password: "correct horse".to_string(),
    }
}

#[tokio::test]
async fn sign_in_persists_the_pair_and_authenticates_later_calls() {
    let (base_url, _) = spawn_api().await;
    let store = MemoryStore::new();
    let (session, client) = session_client(&base_url, &store);

    let user = api::auth::sign_in(&client, session.as_ref(), &credentials("layla@example.ae"))
        .await
        .expect("sign in");
    assert_eq!(user.role, UserRole::Customer);
    assert!(session.is_authenticated());

    let me = api::auth::me(&client).await.expect("bearer accepted");
    assert_eq!(me.full_name, "Layla Hassan");

    let (restored, _) = session_client(&base_url, &store);
    let before = session.snapshot();
    let after = restored.snapshot();
    assert_eq!(after.access_token, before.access_token);
    assert_eq!(after.refresh_token.as_deref(), Some("refresh-1"));
    assert_eq!(after.user, before.user);
    assert!(!after.is_loading);
}

#[tokio::test]
async fn legacy_login_response_is_stored_as_access_token() {
    let (base_url, _) = spawn_api().await;
    let store = MemoryStore::new();
    let (session, client) = session_client(&base_url, &store);

    api::auth::sign_in(&client, session.as_ref(), &credentials("legacy@khadamat.ae"))
        .await
        .expect("legacy sign in");

    let snapshot = session.snapshot();
    assert_eq!(snapshot.access_token.as_deref(), Some("single-token"));
    assert_eq!(snapshot.refresh_token, None);
    assert!(!store.keys().contains(&LEGACY_TOKEN_KEY.to_string()));
}

#[tokio::test]
async fn legacy_storage_is_migrated_on_startup() {
    let user = serde_json::to_string(&user_json("customer")).expect("user json");
    let store =
        MemoryStore::with_entries([(LEGACY_TOKEN_KEY, "old-token"), (USER_KEY, user.as_str())]);

    let session = SessionStore::new(Arc::new(store.clone()));
    session.initialize();

    assert!(session.is_authenticated());
    assert_eq!(session.snapshot().access_token.as_deref(), Some("old-token"));
    assert_eq!(
        store.keys(),
        vec![ACCESS_TOKEN_KEY.to_string(), USER_KEY.to_string()]
    );
}

#[tokio::test]
async fn admin_login_refuses_other_roles_and_stores_nothing() {
    let (base_url, _) = spawn_api().await;
    let store = MemoryStore::new();
    let (session, client) = session_client(&base_url, &store);

    let err = api::auth::admin_sign_in(
        &client,
        session.as_ref(),
        &credentials("office@khadamat.ae"),
        Locale::En,
    )
    .await
    .expect_err("office accounts cannot open the dashboard");

    match err {
        SignInError::Api(ApiError::Denied(message)) => {
            assert_eq!(message, i18n::text(Locale::En, Message::AdminOnly));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(!session.is_authenticated());
    assert!(store.keys().is_empty());

    let admin = api::auth::admin_sign_in(
        &client,
        session.as_ref(),
        &credentials("admin@khadamat.ae"),
        Locale::En,
    )
    .await
    .expect("super admin accepted");
    assert_eq!(admin.role, UserRole::SuperAdmin);
}

#[tokio::test]
async fn server_messages_are_surfaced() {
    let (base_url, _) = spawn_api().await;
    let client = ApiClient::with_http(reqwest::Client::new(), &base_url, Arc::new(NoToken));

    let err = api::auth::login(&client, &credentials("nobody@example.ae"))
        .await
        .expect_err("bad credentials");
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "Invalid email or password");

    let err = api::maids::get(&client, &MaidId::new("missing"))
        .await
        .expect_err("envelope failure");
    assert!(matches!(
        &err,
        ApiError::Rejected { status: None, message } if message == "Maid not found"
    ));

    let err = api::maids::get(&client, &MaidId::new("quiet"))
        .await
        .expect_err("envelope failure without text");
    assert_eq!(err.to_string(), "Something went wrong. Please try again.");

    let err = api::maids::get(&client, &MaidId::new("boom"))
        .await
        .expect_err("server error");
    assert_eq!(err.to_string(), "Request failed with status 500");
    assert_eq!(err.user_message(Locale::En), "Request failed with status 500");
}

#[tokio::test]
async fn anonymous_calls_send_no_bearer() {
    let (base_url, _) = spawn_api().await;
    let client = ApiClient::with_http(reqwest::Client::new(), &base_url, Arc::new(NoToken));

    let err = api::auth::me(&client).await.expect_err("no token");
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn maid_filters_reach_the_query_string() {
    let (base_url, shared) = spawn_api().await;
    let client = ApiClient::with_http(reqwest::Client::new(), &base_url, Arc::new(NoToken));

    let filters = MaidFilters {
        nationality: Some("PH".to_string()),
        languages: vec!["en".to_string(), "ar".to_string()],
        min_salary: Some(1500),
        page: Some(2),
        ..MaidFilters::default()
    };
    let page = api::maids::list(&client, &filters).await.expect("page");
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].emirate.as_deref(), Some("DXB"));

    let recorded = shared.lock().expect("recorder");
    let query = &recorded.queries[0];
    assert_eq!(query.get("nationality").map(String::as_str), Some("PH"));
    assert_eq!(query.get("languages").map(String::as_str), Some("en,ar"));
    assert_eq!(query.get("minSalary").map(String::as_str), Some("1500"));
    assert_eq!(query.get("page").map(String::as_str), Some("2"));
    assert!(!query.contains_key("maxSalary"));
}

#[tokio::test]
async fn refresh_rotates_tokens_and_releases_the_flag() {
    let (base_url, shared) = spawn_api().await;
    let store = MemoryStore::new();
    let (session, client) = session_client(&base_url, &store);
    api::auth::sign_in(&client, session.as_ref(), &credentials("layla@example.ae"))
        .await
        .expect("sign in");

    let refreshed = api::auth::refresh_session(&client, session.as_ref(), Locale::En)
        .await
        .expect("refresh");
    assert!(refreshed);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.access_token.as_deref(), Some("access-2"));
    assert_eq!(snapshot.refresh_token.as_deref(), Some("refresh-2"));
    assert!(!snapshot.is_refreshing);
    assert_eq!(shared.lock().expect("recorder").refresh_calls, 1);

    api::auth::me(&client).await.expect("new token accepted");

    let err = api::auth::refresh_session(&client, session.as_ref(), Locale::En)
        .await
        .expect_err("rotated refresh token is no longer valid");
    assert!(matches!(err, SignInError::Api(ref api) if api.is_unauthorized()));
    assert!(!session.snapshot().is_refreshing);
    assert_eq!(session.snapshot().access_token.as_deref(), Some("access-2"));
}

/// Accepts connections and never writes a byte back.
async fn spawn_silent_api() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{addr}/api")
}

fn signed_in_session(store: &MemoryStore) -> Arc<SessionStore<MemoryStore>> {
    let session = Arc::new(SessionStore::new(Arc::new(store.clone())));
    session.initialize();
    let user: User = serde_json::from_value(user_json("customer")).expect("user decodes");
    session
        .login(
            AuthTokens {
                access_token: "access-1".to_string(),
                refresh_token: Some("refresh-1".to_string()),
            },
            user,
        )
        .expect("login persists");
    session
}

#[tokio::test]
async fn cancelled_refresh_releases_the_slot() {
    let silent_url = spawn_silent_api().await;
    let (base_url, shared) = spawn_api().await;
    let store = MemoryStore::new();
    let session = signed_in_session(&store);

    let stalled = ApiClient::with_http(reqwest::Client::new(), &silent_url, session.clone());
    let waited = tokio::time::timeout(
        Duration::from_millis(100),
        api::auth::refresh_session(&stalled, session.as_ref(), Locale::En),
    )
    .await;
    assert!(waited.is_err(), "silent server never answers");
    assert!(!session.snapshot().is_refreshing);

    let client = ApiClient::with_http(reqwest::Client::new(), &base_url, session.clone());
    let refreshed = api::auth::refresh_session(&client, session.as_ref(), Locale::En)
        .await
        .expect("refresh after cancellation");
    assert!(refreshed);
    assert_eq!(shared.lock().expect("recorder").refresh_calls, 1);
    assert_eq!(session.snapshot().access_token.as_deref(), Some("access-2"));
}

#[tokio::test]
async fn refresh_without_a_refresh_token_uses_the_callers_locale() {
    let (base_url, shared) = spawn_api().await;
    let store = MemoryStore::new();
    let (session, client) = session_client(&base_url, &store);

    let err = api::auth::refresh_session(&client, session.as_ref(), Locale::Ar)
        .await
        .expect_err("nothing to refresh with");
    match err {
        SignInError::Api(ApiError::Denied(message)) => {
            assert_eq!(message, i18n::text(Locale::Ar, Message::SessionExpired));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(!session.snapshot().is_refreshing);
    assert_eq!(shared.lock().expect("recorder").refresh_calls, 0);
}
