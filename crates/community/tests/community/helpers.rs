use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    extract::{Path, State},
    http::{header, Request, Response, StatusCode},
    routing::{self, delete, post},
    Json, Router,
};
use community::{
    build_reqwest_client,
    domain::giveaways::{CommunityStats, Giveaway, NewGiveaway},
    infra::backend::{Backend, BackendClient, BackendHealth, Error},
    AppState, GiveawayStore, UISettings,
};
use mockall::mock;
use reqwest_middleware::reqwest::Url;
use serde_json::{json, Value};
use std::{
    sync::{Arc, Mutex, Once},
    time::Duration,
};
use tokio::net::TcpListener;

static INIT_LOGGER: Once = Once::new();

pub fn setup_static_logger() {
    INIT_LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

mock! {
    pub BackendClient { }

    #[async_trait]
    impl Backend for BackendClient {
        async fn list_giveaways(&self) -> Result<Vec<Giveaway>, Error>;
        async fn login(&self, password: &str) -> Result<(), Error>;
        async fn create_giveaway(&self, giveaway: &NewGiveaway) -> Result<(), Error>;
        async fn delete_giveaway(&self, giveaway_id: &str) -> Result<(), Error>;
        async fn health(&self) -> Result<BackendHealth, Error>;
        async fn stats(&self) -> Result<CommunityStats, Error>;
    }
}

/// Stand-in for the giveaway backend, served over real http on an ephemeral port
#[derive(Clone)]
pub struct FakeBackend {
    password: String,
    pub giveaways: Arc<Mutex<Vec<Value>>>,
    pub received: Arc<Mutex<Vec<Value>>>,
}

impl FakeBackend {
    pub async fn spawn(password: &str, giveaways: Vec<Value>) -> (Self, Url) {
        let fake = FakeBackend {
            password: password.to_string(),
            giveaways: Arc::new(Mutex::new(giveaways)),
            received: Arc::new(Mutex::new(Vec::new())),
        };

        let router = Router::new()
            .route("/api/giveaways", routing::get(list_giveaways))
            .route("/api/admin/login", post(login))
            .route("/api/admin/giveaways", post(create_giveaway))
            .route("/api/admin/giveaways/{id}", delete(delete_giveaway))
            .route("/api/health", routing::get(health))
            .route("/api/stats", routing::get(stats))
            .with_state(fake.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let url = Url::parse(&format!("http://{}", address)).unwrap();
        (fake, url)
    }

    pub fn client(url: &Url) -> BackendClient {
        BackendClient::new(build_reqwest_client(), url)
    }
}

async fn list_giveaways(State(fake): State<FakeBackend>) -> Json<Vec<Value>> {
    let mut giveaways = fake.giveaways.lock().unwrap().clone();
    giveaways.reverse();
    Json(giveaways)
}

async fn login(
    State(fake): State<FakeBackend>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if body["password"] == json!(fake.password) {
        (StatusCode::OK, Json(json!({"message": "Login successful"})))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Invalid admin password"})),
        )
    }
}

async fn create_giveaway(
    State(fake): State<FakeBackend>,
    Json(body): Json<Value>,
) -> Json<Value> {
    fake.received.lock().unwrap().push(body.clone());

    let mut giveaways = fake.giveaways.lock().unwrap();
    let mut created = body;
    created["id"] = json!(format!("fake-{}", giveaways.len() + 1));
    created["createdAt"] = json!("2025-01-01T00:00:00");
    giveaways.push(created.clone());
    Json(created)
}

async fn delete_giveaway(State(fake): State<FakeBackend>, Path(id): Path<String>) -> StatusCode {
    let mut giveaways = fake.giveaways.lock().unwrap();
    let before = giveaways.len();
    giveaways.retain(|g| g["id"] != json!(id));
    if giveaways.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    }
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy", "database": "connected"}))
}

async fn stats(State(fake): State<FakeBackend>) -> Json<Value> {
    let total = fake.giveaways.lock().unwrap().len();
    Json(json!({"totalGiveaways": total, "activeGiveaways": total, "memberCount": 500}))
}

pub fn giveaway_json(id: &str, title: &str, end_date: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": "Nitro for a lucky tiger",
        "prize": "Discord Nitro",
        "endDate": end_date,
        "entryRequirement": "Join the server",
        "createdAt": "2025-01-01T00:00:00"
    })
}

pub fn giveaway(id: &str, title: &str, end_date: &str) -> Giveaway {
    serde_json::from_value(giveaway_json(id, title, end_date)).unwrap()
}

pub fn test_state(store: GiveawayStore, backend: Arc<dyn Backend>) -> AppState {
    setup_static_logger();
    let ui = UISettings {
        ui_dir: String::from("./ui"),
        ..Default::default()
    };
    AppState::new(
        ui,
        String::from("community_session"),
        Duration::from_secs(60),
        store,
        backend,
    )
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, cookie: Option<&str>, form: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

/// `name=value` part of the session cookie the site handed out
pub fn session_cookie(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
        .expect("response sets a session cookie")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
