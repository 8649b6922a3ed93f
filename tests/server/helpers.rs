use std::sync::Arc;

use bookshelf::application::routes::app_router;
use bookshelf::application::services::UserService;
use bookshelf::application::state::{AppState, AppStateConfig};
use bookshelf::domain::repositories::{BookRepository, UserRepository};
use bookshelf::infrastructure::database::Database;
use reqwest::{Client, Response};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::AbortHandle;

pub struct TestApp {
    pub address: String,
    /// Client with a cookie store, so a login carries over to later requests.
    pub client: Client,
    pub user_repo: Arc<dyn UserRepository>,
    pub book_repo: Arc<dyn BookRepository>,
    pub user_service: UserService,
    server_handle: AbortHandle,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn create_user(&self, email: &str, password: &str) -> Response {
        self.client
            .post(self.url("/api/user"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.client
            .post(self.url("/api/user/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn profile(&self) -> Response {
        self.client
            .get(self.url("/user/profile"))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// POSTs a book and returns its assigned id.
    pub async fn create_book(&self, fields: Value) -> i64 {
        let body: Value = self
            .client
            .post(self.url("/api/book"))
            .json(&fields)
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .expect("Failed to parse response");

        assert_eq!(body["post"], true);
        body["bookId"].as_i64().expect("bookId should be an integer")
    }

    pub async fn get_book(&self, id: i64) -> Response {
        self.client
            .get(self.url(&format!("/api/getBook?id={id}")))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn list_books(&self, query: &str) -> Vec<Value> {
        self.client
            .get(self.url(&format!("/api/books{query}")))
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .expect("Failed to parse response")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}

pub async fn spawn_app() -> TestApp {
    let database = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    let state = AppState::from_database(
        &database,
        AppStateConfig {
            insecure_cookies: true,
        },
    );

    // Clone what the tests need before the router consumes the state
    let user_repo = state.user_repo.clone();
    let book_repo = state.book_repo.clone();
    let user_service = state.user_service.clone();

    let app = app_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");

    let local_addr = listener.local_addr().expect("Failed to get local address");
    let address = format!("http://{local_addr}");

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Server failed to start");
    })
    .abort_handle();

    let client = Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to build client");

    TestApp {
        address,
        client,
        user_repo,
        book_repo,
        user_service,
        server_handle,
    }
}

/// Spawns an app with one registered and logged-in user.
pub async fn spawn_app_with_session(email: &str, password: &str) -> TestApp {
    let app = spawn_app().await;
    assert_eq!(app.create_user(email, password).await.status(), 200);
    assert_eq!(app.login(email, password).await.status(), 200);
    app
}

pub fn auth_cookie(response: &Response) -> Option<String> {
    response
        .cookies()
        .find(|c| c.name() == "auth")
        .map(|c| c.value().to_string())
}
