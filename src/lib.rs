use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::{IntoResponse, Response},
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

// Core application services and components.
pub mod auth;
pub mod config;
pub mod directory;
pub mod handlers;
pub mod models;
pub mod policy;

// Module for routing segregation (Public, Authenticated, Restricted, Admin).
pub mod routes;
use auth::Session; // The resolved session state for the gates.
use routes::{admin, authenticated, public, restricted};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point (main.rs).
pub use config::AppConfig;
pub use directory::{Directory, DirectoryState, StaticDirectory};
pub use policy::{AccessPolicy, PolicyState};

/// ApiDoc
///
/// This struct auto-generates the OpenAPI documentation (Swagger JSON) for the application.
/// It aggregates all API paths and data schemas that have been decorated with
/// the `#[utoipa::path]` and `#[derive(utoipa::ToSchema)]` macros.
/// The resulting JSON is served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    // List all public handler functions here for documentation generation.
    paths(
        handlers::login, handlers::get_me, handlers::get_nav, handlers::check_access,
        handlers::get_landing, handlers::get_dashboard, handlers::get_checkin_station,
        handlers::get_abstract_queue, handlers::list_users, handlers::view_policy
    ),
    // List all models (schemas) used in the request/response bodies.
    components(
        schemas(
            models::User, models::UserProfile, models::LoginRequest, models::LoginResponse,
            models::NavItem, models::RouteAccess, models::Landing, models::DashboardSummary,
            models::CheckinStation, models::AbstractQueue, policy::AccessPolicy,
        )
    ),
    tags(
        (name = "event-portal", description = "Event Portal Auth & Access Control API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Implements the **Unified State Pattern**. This is the single, thread-safe, and immutable
/// container holding all essential application services and configuration.
/// The application state is shared across all incoming requests; the directory
/// and the policy are read-only snapshots, so no request can observe a
/// partially-updated view of either.
#[derive(Clone)]
pub struct AppState {
    /// Identity Layer: Abstracts credential verification and user lookup.
    pub directory: DirectoryState,
    /// Authorization Layer: The immutable role → route-prefix policy snapshot.
    pub policy: PolicyState,
    /// Configuration: The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These implementations allow extractors and handlers to selectively pull
// components from the shared AppState. This is critical for dependency
// injection: the Session extractor needs only the directory and the config,
// never the whole state.

impl FromRef<AppState> for DirectoryState {
    fn from_ref(app_state: &AppState) -> DirectoryState {
        app_state.directory.clone()
    }
}

impl FromRef<AppState> for PolicyState {
    fn from_ref(app_state: &AppState) -> PolicyState {
        app_state.policy.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

// --- Gate Middleware Adapters ---
//
// The gates themselves are pure functions in `auth`; these adapters translate
// their verdicts into HTTP effects at the router layer. Composition order is
// carried by the router assembly below (explicit gate composition), never
// baked into a single monolithic check.

/// auth_middleware
///
/// Enforces authentication for the `authenticated_routes`.
///
/// *Mechanism*: resolves the `Session` (infallible; anonymous on any token
/// failure) and evaluates the authenticated-access gate. A denial short-
/// circuits with the gate's redirect; otherwise the request proceeds and
/// handlers re-resolve the actor via the `CurrentUser` extractor.
async fn auth_middleware(session: Session, request: Request, next: Next) -> Response {
    match auth::require_auth(&session) {
        Ok(_) => next.run(request).await,
        Err(denial) => denial.into_response(),
    }
}

/// role_gate
///
/// Shared adapter for the role-based authorization gate, parameterized at
/// configuration time by the allowed-role set of a route group.
async fn role_gate(
    allowed_roles: &'static [&'static str],
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    match auth::require_role(allowed_roles, &session) {
        Ok(_) => next.run(request).await,
        Err(denial) => denial.into_response(),
    }
}

/// Gate for the organizer area (dashboard). Admin passes via the bypass.
async fn organizer_gate(session: Session, request: Request, next: Next) -> Response {
    role_gate(&["organizer"], session, request, next).await
}

/// Gate for the staff area (check-in scanner).
async fn staff_gate(session: Session, request: Request, next: Next) -> Response {
    role_gate(&["staff"], session, request, next).await
}

/// Gate for the reviewer area (abstracts).
async fn reviewer_gate(session: Session, request: Request, next: Next) -> Response {
    role_gate(&["reviewer"], session, request, next).await
}

/// Gate for the admin module. The allowed set is empty: only the
/// unconditional admin bypass admits.
async fn admin_gate(session: Session, request: Request, next: Next) -> Response {
    role_gate(&[], session, request, next).await
}

/// create_router
///
/// Assembles the application's entire routing structure, applies global and scoped middleware,
/// and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: Serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public Routes: No middleware applied.
        .merge(public::public_routes())
        // Authenticated Routes: Protected by the authenticated-access gate.
        // Anonymous visitors are redirected to /login, never shown a 403.
        .merge(
            authenticated::authenticated_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        // Restricted Areas: each feature area sits behind its role gate.
        // Gate ordering (authentication before authorization) lives inside
        // `require_role`, so a bare role gate is sufficient on its own.
        .merge(
            restricted::organizer_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), organizer_gate)),
        )
        .merge(
            restricted::staff_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), staff_gate)),
        )
        .merge(
            restricted::reviewer_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), reviewer_gate)),
        )
        // Admin Routes: Nested under '/admin', admitted solely via the admin
        // bypass inside the role gate.
        .nest(
            "/admin",
            admin::admin_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), admin_gate)),
        )
        // Apply the Unified State to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (Applied outermost/first)
    // This section implements the Production Observability Stack.
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: Generates a unique UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request Tracing: Wraps the entire request/response lifecycle in a tracing span.
                // Uses the `trace_span_logger` to include the generated request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: Ensures the generated x-request-id header is
                // returned to the client and injected into subsequent service calls.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer (Applied last, allowing all traffic in/out after processing)
        .layer(cors)
}

/// trace_span_logger
///
/// Helper function used by `TraceLayer` to customize the tracing span creation.
/// It extracts the `x-request-id` header (if present) and includes it in the
/// structured logging metadata alongside the HTTP method and URI.
///
/// *Goal*: Ensure every log line for a single request is correlated by a unique ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    // The structured log format used by the tracing macros.
    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
