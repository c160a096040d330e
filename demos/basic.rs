//! Basic example using the in-memory document store and cookie identity

use salvo::prelude::*;
use salvo_docstore_session::{
    DocSessionStore, MemoryStore, SessionConfig, SessionDepotExt, SessionHandler,
};

#[handler]
async fn index(depot: &mut Depot) -> String {
    let session = depot.session_mut().expect("Session not found");

    let views: i32 = session.get("views").unwrap_or(0);
    session.set("views", views + 1).expect("views serialize");

    format!(
        "Hello! You have viewed this page {} time(s).\nSession ID: {}",
        views + 1,
        session.id()
    )
}

#[handler]
async fn get_user(depot: &mut Depot) -> String {
    let session = depot.session_mut().expect("Session not found");

    match session.get::<String>("user") {
        Some(user) => format!("Logged in as: {}", user),
        None => "Not logged in".to_string(),
    }
}

#[handler]
async fn set_user(req: &mut Request, depot: &mut Depot) -> String {
    let session = depot.session_mut().expect("Session not found");

    let username = req.query::<String>("name").unwrap_or_else(|| "anonymous".to_string());
    session.set("user", &username).expect("username serialize");

    format!("User set to: {}", username)
}

#[handler]
async fn logout(depot: &mut Depot) -> &'static str {
    let session = depot.session_mut().expect("Session not found");

    // The document stays in the store, only its values are cleared
    session.clear();

    "Logged out successfully"
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = SessionConfig::new("your-super-secret-key-change-in-production")
        .with_max_age(3600);
    let store = DocSessionStore::with_cookie(MemoryStore::new(), config);

    // The session name doubles as the collection name and the cookie name
    let session_handler = SessionHandler::new(store, "demo-sessions");

    let router = Router::new()
        .hoop(session_handler)
        .get(index)
        .push(Router::with_path("user").get(get_user))
        .push(Router::with_path("login").get(set_user))
        .push(Router::with_path("logout").get(logout));

    let acceptor = TcpListener::new("127.0.0.1:5800").bind().await;
    println!("Server running at http://127.0.0.1:5800");
    println!("Try these endpoints:");
    println!("  GET /           - View counter");
    println!("  GET /user       - Get current user");
    println!("  GET /login?name=alice - Set user");
    println!("  GET /logout     - Clear session");

    Server::new(acceptor).serve(router).await;
}
