use async_trait::async_trait;
use salvo::http::header::SET_COOKIE;
use salvo::prelude::*;
use salvo::test::{ResponseExt, TestClient};
use salvo_docstore_session::{
    DocSessionStore, DocumentStore, MemoryStore, SessionConfig, SessionDepotExt, SessionError,
    SessionHandler, StoredDocument,
};

const NAME: &str = "middleware-test";

#[handler]
async fn count(depot: &mut Depot) -> String {
    let session = depot.session_mut().expect("session in depot");
    let views: i64 = session.get("views").unwrap_or(0);
    session.set("views", views + 1).expect("views serialize");
    (views + 1).to_string()
}

#[handler]
async fn peek(depot: &mut Depot) -> String {
    let session = depot.session().expect("session in depot");
    session.get::<i64>("views").unwrap_or(0).to_string()
}

fn service<S: salvo_docstore_session::SessionStore>(store: S) -> Service {
    let router = Router::new()
        .hoop(SessionHandler::new(store, NAME))
        .get(count)
        .push(Router::with_path("peek").get(peek));
    Service::new(router)
}

fn issued_cookie(res: &Response) -> Option<String> {
    if let Some(cookie) = res.cookie(NAME) {
        return Some(format!("{}={}", NAME, cookie.value()));
    }
    res.headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or_default().to_string())
        .find(|pair| pair.starts_with(&format!("{}=", NAME)))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[tokio::test]
async fn test_header_identity_persists_values() {
    init_tracing();
    let backend = MemoryStore::new();
    let service = service(DocSessionStore::with_header(backend.clone()));

    let mut res = TestClient::get("http://127.0.0.1:5800/")
        .add_header(NAME, "client-chosen-id", true)
        .send(&service)
        .await;
    assert_eq!(res.take_string().await.unwrap(), "1");
    assert!(issued_cookie(&res).is_none());
    assert!(backend.get(NAME, "client-chosen-id").await.is_ok());

    let mut res = TestClient::get("http://127.0.0.1:5800/")
        .add_header(NAME, "client-chosen-id", true)
        .send(&service)
        .await;
    assert_eq!(res.take_string().await.unwrap(), "2");
    assert_eq!(backend.len(NAME), 1);
}

#[tokio::test]
async fn test_cookie_identity_persists_values() {
    init_tracing();
    let backend = MemoryStore::new();
    let store = DocSessionStore::with_cookie(backend.clone(), SessionConfig::new("test-secret"));
    let service = service(store);

    let mut res = TestClient::get("http://127.0.0.1:5800/").send(&service).await;
    assert_eq!(res.take_string().await.unwrap(), "1");
    let cookie = issued_cookie(&res).expect("session cookie issued");

    let mut res = TestClient::get("http://127.0.0.1:5800/")
        .add_header("cookie", cookie.as_str(), true)
        .send(&service)
        .await;
    assert_eq!(res.take_string().await.unwrap(), "2");
    assert_eq!(backend.len(NAME), 1);
}

#[tokio::test]
async fn test_unmodified_session_is_not_saved() {
    let backend = MemoryStore::new();
    let service = service(DocSessionStore::with_header(backend.clone()));

    let mut res = TestClient::get("http://127.0.0.1:5800/peek")
        .add_header(NAME, "reader", true)
        .send(&service)
        .await;
    assert_eq!(res.take_string().await.unwrap(), "0");
    assert!(backend.is_empty(NAME));
}

struct UnavailableStore;

#[async_trait]
impl DocumentStore for UnavailableStore {
    async fn get(&self, _: &str, _: &str) -> Result<StoredDocument, SessionError> {
        Err(SessionError::StoreError("backend unavailable".into()))
    }
    async fn set(&self, _: &str, _: &str, _: &StoredDocument) -> Result<(), SessionError> {
        Err(SessionError::StoreError("backend unavailable".into()))
    }
    async fn delete(&self, _: &str, _: &str) -> Result<(), SessionError> {
        Ok(())
    }
    async fn new_id(&self, _: &str) -> Result<String, SessionError> {
        Err(SessionError::StoreError("backend unavailable".into()))
    }
}

#[tokio::test]
async fn test_load_failure_is_server_error() {
    let service = service(DocSessionStore::with_header(UnavailableStore));

    let res = TestClient::get("http://127.0.0.1:5800/")
        .add_header(NAME, "some-id", true)
        .send(&service)
        .await;
    assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));
}
