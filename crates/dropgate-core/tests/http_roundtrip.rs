//! Runs the real `ApiClient` against a local axum server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use dropgate_core::api::ApiClient;
use dropgate_core::auth::{Authenticator, INVALID_CREDENTIALS_MESSAGE};
use dropgate_core::store::{MemoryTokenStore, TokenStore};
use dropgate_core::upload::UploadSession;
use dropgate_core::{Credential, Outcome, Route, SessionToken, UploadPayload};

const GOOD_TOKEN: &str = "tok-ana";

#[derive(Clone, Default)]
struct ServerState {
    upload_hits: Arc<AtomicUsize>,
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["username"] == "ana" && body["password"] == "secret" {
        (StatusCode::OK, Json(json!({ "token": GOOD_TOKEN })))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Credenciales inválidas" })))
    }
}

async fn upload(
    State(state): State<ServerState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    state.upload_hits.fetch_add(1, Ordering::SeqCst);

    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if bearer != format!("Bearer {}", GOOD_TOKEN) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Token inválido" })));
    }

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let mime = field.content_type().unwrap_or_default().to_string();
        let Ok(data) = field.bytes().await else {
            break;
        };
        let mensaje = format!("{} [{}] {} bytes", name, mime, data.len());
        return (StatusCode::OK, Json(json!({ "mensaje": mensaje })));
    }

    (StatusCode::BAD_REQUEST, Json(json!({})))
}

async fn spawn_server() -> (String, ServerState) {
    let state = ServerState::default();
    let app = Router::new()
        .route("/", get(|| async { "dropgate test server ok" }))
        .route("/login", post(login))
        .route("/upload", post(upload))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), state)
}

/// Address nobody is listening on
async fn dead_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn components(base_url: &str) -> (Authenticator, UploadSession, Arc<MemoryTokenStore>) {
    let api = Arc::new(ApiClient::new(base_url).unwrap());
    let store = Arc::new(MemoryTokenStore::new());
    (
        Authenticator::new(api.clone(), store.clone()),
        UploadSession::new(api, store.clone()),
        store,
    )
}

fn notes() -> UploadPayload {
    UploadPayload::new("notes.txt", b"hello".to_vec())
}

#[tokio::test]
async fn test_login_then_upload() {
    let (base_url, state) = spawn_server().await;
    let (auth, session, store) = components(&base_url);

    let outcome = auth.submit(&Credential::new("ana", "secret")).await;
    assert_eq!(outcome, Outcome::Redirect(Route::Upload));
    assert_eq!(store.load().unwrap(), Some(SessionToken::new(GOOD_TOKEN)));

    let outcome = session.submit(notes()).await;
    assert_eq!(
        outcome,
        Outcome::Success {
            message: "notes.txt [text/plain] 5 bytes".to_string()
        }
    );
    assert_eq!(state.upload_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_bad_password_stores_nothing() {
    let (base_url, _state) = spawn_server().await;
    let (auth, _session, store) = components(&base_url);

    let outcome = auth.submit(&Credential::new("ana", "wrong")).await;

    assert_eq!(
        outcome,
        Outcome::AuthError {
            reason: INVALID_CREDENTIALS_MESSAGE.to_string()
        }
    );
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn test_stale_token_gets_server_error() {
    let (base_url, _state) = spawn_server().await;
    let (_auth, session, store) = components(&base_url);
    store.save(&SessionToken::new("expired")).unwrap();

    let outcome = session.submit(notes()).await;

    assert_eq!(
        outcome,
        Outcome::ValidationError {
            message: "Token inválido".to_string()
        }
    );
}

#[tokio::test]
async fn test_missing_token_never_hits_server() {
    let (base_url, state) = spawn_server().await;
    let (_auth, session, _store) = components(&base_url);

    let outcome = session.submit(notes()).await;

    assert_eq!(outcome, Outcome::Redirect(Route::Login));
    assert_eq!(state.upload_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unreachable_server_is_network_error_for_both() {
    let base_url = dead_address().await;
    let (auth, session, store) = components(&base_url);

    let login = auth.submit(&Credential::new("ana", "secret")).await;
    assert!(matches!(login, Outcome::NetworkError { .. }));
    assert!(store.load().unwrap().is_none());

    store.save(&SessionToken::new(GOOD_TOKEN)).unwrap();
    let upload = session.submit(notes()).await;
    assert!(matches!(upload, Outcome::NetworkError { .. }));
}

#[tokio::test]
async fn test_probe_reports_status() {
    let (base_url, _state) = spawn_server().await;
    let api = ApiClient::new(&base_url).unwrap();

    let response = api.probe().await.unwrap();
    assert!(response.is_success());
    assert_eq!(response.body, "dropgate test server ok");
}
