use crate::{
    api::routes::{
        active_giveaways_fragment, add_giveaway_handler, cancel_delete_handler,
        cancel_login_handler, close_panel_handler, confirm_delete_handler, dismiss_alert_handler,
        health, home_page_handler, login_handler, open_login_handler, request_delete_handler,
        update_form_handler,
    },
    config::{Settings, UISettings},
    domain::{AdminActions, GiveawayStore, GiveawayWatcher, SessionStore, SessionSweeper},
    infra::backend::{Backend, BackendClient},
};

// Mock implementations only available with e2e-testing feature or debug builds
#[cfg(any(feature = "e2e-testing", debug_assertions))]
use crate::infra::backend_mock::MockBackend;
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::{connect_info::IntoMakeServiceWithConnectInfo, ConnectInfo, Path, Request, State},
    http::{header, Extensions, HeaderValue, StatusCode},
    middleware::{self, AddExtension, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    serve::Serve,
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::{error, info, warn};
use reqwest_middleware::{
    reqwest::{self, Client, Url},
    ClientBuilder, ClientWithMiddleware, Middleware,
};
use std::{net::SocketAddr, str::FromStr, sync::Arc, time::Duration};
use tokio::signal::unix::{signal, SignalKind};
use tokio::{net::TcpListener, select};
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tower_http::cors::{AllowOrigin, CorsLayer};

pub struct Application {
    server: Serve<
        TcpListener,
        IntoMakeServiceWithConnectInfo<Router, SocketAddr>,
        AddExtension<Router, ConnectInfo<SocketAddr>>,
    >,
    cancellation_token: CancellationToken,
    background_tasks: TaskTracker,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let address = format!(
            "{}:{}",
            config.api_settings.domain, config.api_settings.port
        );
        let listener = SocketAddr::from_str(&address)?;
        let (app_state, background_tasks, cancellation_token) = build_app(config.clone()).await?;
        let server = build_server(listener, app_state, config.api_settings.origins).await?;
        Ok(Self {
            server,
            cancellation_token,
            background_tasks,
        })
    }

    pub async fn run_until_stopped(self) -> Result<(), anyhow::Error> {
        info!("Starting server...");
        match self.server.with_graceful_shutdown(shutdown_signal()).await {
            Ok(_) => {
                info!("Server shutdown initiated");
                self.cancellation_token.cancel();

                let timeout = tokio::time::sleep(Duration::from_secs(10));
                select! {
                    _ = self.background_tasks.wait() => {
                        info!("Background tasks completed gracefully");
                    }
                    _ = timeout => {
                        warn!("Background tasks timed out during shutdown");
                    }
                }

                info!("Shutdown complete");
                Ok(())
            }
            Err(e) => {
                error!("Server shutdown error: {}", e);
                self.cancellation_token.cancel();

                let _ = tokio::time::timeout(Duration::from_secs(5), self.background_tasks.wait())
                    .await;

                Err(anyhow!("Error during server shutdown: {}", e))
            }
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub ui: UISettings,
    pub cookie_name: String,
    pub store: GiveawayStore,
    pub sessions: SessionStore,
    pub actions: Arc<AdminActions>,
}

impl AppState {
    pub fn new(
        ui: UISettings,
        cookie_name: String,
        session_idle_ttl: Duration,
        store: GiveawayStore,
        backend: Arc<dyn Backend>,
    ) -> Self {
        let sessions = SessionStore::new(session_idle_ttl);
        let actions = Arc::new(AdminActions::new(backend, store.clone(), sessions.clone()));
        Self {
            ui,
            cookie_name,
            store,
            sessions,
            actions,
        }
    }
}

pub async fn build_app(
    config: Settings,
) -> Result<(AppState, TaskTracker, CancellationToken), anyhow::Error> {
    info!(
        "Static UI assets configured at {}",
        config.ui_settings.ui_dir
    );

    // Create backend client (real or mock based on config)
    #[cfg(any(feature = "e2e-testing", debug_assertions))]
    let backend: Arc<dyn Backend> = if config.backend_settings.mock_enabled {
        info!("Mock giveaway backend configured");
        Arc::new(MockBackend::new(
            config.backend_settings.mock_admin_password.clone(),
        ))
    } else {
        build_backend_client(&config.backend_settings.base_url)?
    };

    #[cfg(not(any(feature = "e2e-testing", debug_assertions)))]
    let backend: Arc<dyn Backend> = {
        if config.backend_settings.mock_enabled {
            return Err(anyhow!(
                "Mock giveaway backend requires e2e-testing feature or debug build"
            ));
        }
        build_backend_client(&config.backend_settings.base_url)?
    };

    match backend.health().await {
        Ok(health) if health.is_healthy() => info!("Giveaway backend is healthy"),
        Ok(health) => warn!("Giveaway backend reports status '{}'", health.status),
        Err(e) => warn!("Giveaway backend health check failed: {}", e),
    }

    let store = GiveawayStore::new();
    let tracker = TaskTracker::new();
    let cancel_token = CancellationToken::new();

    let giveaway_watcher = GiveawayWatcher::new(
        backend.clone(),
        store.clone(),
        cancel_token.clone(),
        Duration::from_secs(config.backend_settings.poll_interval_secs),
    );
    tracker.spawn(async move {
        match giveaway_watcher.watch().await {
            Ok(_) => {
                info!("Successfully shutdown giveaway watcher")
            }
            Err(e) => {
                error!("Error in giveaway watcher: {}", e)
            }
        }
    });

    let app_state = AppState::new(
        config.ui_settings,
        config.session_settings.cookie_name,
        Duration::from_secs(config.session_settings.idle_ttl_secs),
        store,
        backend,
    );

    let session_sweeper = SessionSweeper::new(
        app_state.sessions.clone(),
        cancel_token.clone(),
        Duration::from_secs(config.session_settings.sweep_interval_secs),
    );
    tracker.spawn(async move {
        match session_sweeper.watch().await {
            Ok(_) => {
                info!("Successfully shutdown session sweeper")
            }
            Err(e) => {
                error!("Error in session sweeper: {}", e)
            }
        }
    });
    tracker.close();

    Ok((app_state, tracker, cancel_token))
}

fn build_backend_client(base_url: &str) -> Result<Arc<dyn Backend>, anyhow::Error> {
    let backend_url =
        Url::parse(base_url).map_err(|e| anyhow!("Failed to parse backend url: {}", e))?;
    let client = BackendClient::new(build_reqwest_client(), &backend_url);
    info!("Giveaway backend configured at {}", backend_url);
    Ok(Arc::new(client))
}

pub async fn build_server(
    socket_addr: SocketAddr,
    app_state: AppState,
    origins: Vec<String>,
) -> Result<
    Serve<
        TcpListener,
        IntoMakeServiceWithConnectInfo<Router, SocketAddr>,
        AddExtension<Router, ConnectInfo<SocketAddr>>,
    >,
    anyhow::Error,
> {
    let listener = TcpListener::bind(socket_addr).await?;

    info!("Setting up service");
    let app = app(app_state, origins);
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    );
    info!(
        "Service running @: http://{}:{}",
        socket_addr.ip(),
        socket_addr.port()
    );
    Ok(server)
}

pub fn app(app_state: AppState, origins: Vec<String>) -> Router {
    let origins: Vec<HeaderValue> = origins
        .into_iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true);

    let admin_routes = Router::new()
        .route("/login/open", post(open_login_handler))
        .route("/login/cancel", post(cancel_login_handler))
        .route("/login", post(login_handler))
        .route("/close", post(close_panel_handler))
        .route("/form", post(update_form_handler))
        .route("/giveaways", post(add_giveaway_handler))
        .route("/giveaways/{giveaway_id}/delete", post(request_delete_handler))
        .route("/delete/confirm", post(confirm_delete_handler))
        .route("/delete/cancel", post(cancel_delete_handler));

    Router::new()
        .route("/", get(home_page_handler))
        .route("/giveaways/active", get(active_giveaways_fragment))
        .route("/alert/dismiss", post(dismiss_alert_handler))
        .nest("/admin", admin_routes)
        .route("/api/v1/health_check", get(health))
        .route("/ui/{*path}", get(serve_static_file))
        .fallback(home_page_handler)
        .layer(middleware::from_fn(log_request))
        .with_state(Arc::new(app_state))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}

async fn serve_static_file(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Response {
    if path.contains("..") {
        return (StatusCode::BAD_REQUEST, "Bad request").into_response();
    }

    let file_path = std::path::Path::new(&state.ui.ui_dir).join(&path);

    let content = match tokio::fs::read(&file_path).await {
        Ok(c) => c,
        Err(_) => return (StatusCode::NOT_FOUND, "Not found").into_response(),
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, get_mime_type(&path))
        .body(Body::from(content))
        .unwrap_or_else(|_| (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response())
}

fn get_mime_type(path: &str) -> &'static str {
    match path.rsplit('.').next().unwrap_or("") {
        "css" => "text/css; charset=utf-8",
        "js" => "application/javascript; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}

/// Outbound client for the giveaway backend, no retries: every call is made once
pub fn build_reqwest_client() -> ClientWithMiddleware {
    ClientBuilder::new(Client::new())
        .with(LoggingMiddleware)
        .build()
}

struct LoggingMiddleware;

#[async_trait::async_trait]
impl Middleware for LoggingMiddleware {
    async fn handle(
        &self,
        req: reqwest::Request,
        extensions: &mut Extensions,
        next: reqwest_middleware::Next<'_>,
    ) -> reqwest_middleware::Result<reqwest::Response> {
        let method = req.method().clone();
        let url = req.url().clone();

        info!("Making {} request to: {}", method, url);

        let result = next.run(req, extensions).await;

        match &result {
            Ok(response) => {
                info!("{} {} -> Status: {}", method, url, response.status());
            }
            Err(error) => {
                warn!("{} {} -> Error: {:?}", method, url, error);
            }
        }

        result
    }
}

async fn shutdown_signal() {
    let mut sigint = signal(SignalKind::interrupt()).expect("Failed to install SIGINT handler");
    let mut sigterm = signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");

    select! {
        _ = sigint.recv() => info!("Received SIGINT signal"),
        _ = sigterm.recv() => info!("Received SIGTERM signal"),
    }
}
