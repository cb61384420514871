use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Authentication and authorization core.
pub mod auth;
pub mod password;
pub mod policy;
pub mod token;

// Application services and components.
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod repository;

// Routing segregated by access tier (Public, Authenticated, Admin).
pub mod routes;
use auth::AuthUser;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use password::PasswordService;
pub use repository::{PostgresRepository, RepositoryState};
pub use token::TokenCodec;

/// ApiDoc
///
/// Aggregates every `#[utoipa::path]` handler and `ToSchema` model into the OpenAPI
/// document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::register_user, handlers::login_user, handlers::get_me,
        handlers::get_user, handlers::list_users
    ),
    components(
        schemas(
            models::RegisterUserRequest, models::LoginRequest, models::TokenResponse,
            models::UserProfile, models::ErrorBody,
        )
    ),
    tags(
        (name = "forum-auth", description = "Forum accounts and authorization API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, immutable container shared by every request: persistence, the two
/// crypto services and the loaded configuration. Everything inside is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Credential Store behind the `Repository` trait.
    pub repo: RepositoryState,
    /// Password hashing and verification.
    pub passwords: PasswordService,
    /// Bearer token issue/verify, keyed from `config.jwt_secret`.
    pub tokens: TokenCodec,
    pub config: AppConfig,
}

impl AppState {
    /// Derives the crypto services from `config`, so the signing key and hash cost
    /// come from exactly one place.
    pub fn new(
        repo: RepositoryState,
        config: AppConfig,
    ) -> Result<Self, password::PasswordError> {
        Ok(Self {
            repo,
            passwords: PasswordService::new(config.hash_cost)?,
            tokens: TokenCodec::from_config(&config),
            config,
        })
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for TokenCodec {
    fn from_ref(app_state: &AppState) -> TokenCodec {
        app_state.tokens.clone()
    }
}

/// auth_middleware
///
/// Guards a router with the authenticated-only gate. Extracting `AuthUser` does the
/// work: a missing, forged or expired token is rejected with 401 before any handler runs.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the routing table, applies the access-tier middleware and the
/// observability stack, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let auth_layer = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(authenticated::authenticated_routes().route_layer(auth_layer.clone()))
        .nest("/api/admin", admin::admin_routes().route_layer(auth_layer))
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                // Every request gets an x-request-id, echoed back on the response.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Opens the per-request span, tagged with the request id so every log line of one
/// request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
