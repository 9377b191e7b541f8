use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::config::{AppConfig, SecurityConfig};
use crate::database::Store;
use crate::generator::{FieldTypeRegistry, RecordSynthesizer};
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;

/// Shared, read-only application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub synthesizer: Arc<RecordSynthesizer>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Self {
        Self::with_registry(config, store, FieldTypeRegistry::with_defaults())
    }

    pub fn with_registry(config: AppConfig, store: Arc<dyn Store>, registry: FieldTypeRegistry) -> Self {
        Self {
            config: Arc::new(config),
            store,
            synthesizer: Arc::new(RecordSynthesizer::new(registry)),
        }
    }
}

/// Build the full router. Every path is registered exactly once.
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(service_routes())
        .merge(auth_public_routes())
        .merge(management_routes(state.clone()))
        .merge(generate_routes());

    if let Some(dir) = &state.config.api.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    let layers = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.security))
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes));

    router.layer(layers).with_state(state)
}

fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::service::root))
        .route("/health", get(public::service::health))
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/auth/signup", post(auth::signup_post))
        .route("/api/auth/login", post(auth::login_post))
}

/// Project and resource management, token required
fn management_routes(state: AppState) -> Router<AppState> {
    use protected::{greeting, projects, resources};

    Router::new()
        .route("/api/protected", get(greeting::greeting_get))
        .route("/api/projects", get(projects::projects_get).post(projects::projects_post))
        .route("/api/projects/:id", delete(projects::project_delete))
        .route("/api/resources", post(resources::resources_post))
        // GET takes a project prefix, DELETE a resource id
        .route(
            "/api/resources/:key",
            get(resources::resources_get).delete(resources::resource_delete),
        )
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

/// The generated mock endpoints. Public on purpose.
fn generate_routes() -> Router<AppState> {
    Router::new().route("/api/:prefix/:resource", get(public::generate::generate_get))
}

/// Resolves on Ctrl-C or, on unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C, draining connections"),
        _ = terminate => tracing::info!("Received SIGTERM, draining connections"),
    }
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}
