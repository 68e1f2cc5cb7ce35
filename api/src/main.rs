//! UPSTAC API Server
//!
//! Tracks COVID test requests from the patient's submission through lab
//! testing and doctor consultation to completion.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::postgres::{
    PostgresTestRequestFlowRepository, PostgresTestRequestRepository, PostgresUserRepository,
};
use adapters::PostgresBackend;
use app::{
    TestRequestFlowService, TestRequestQueryService, TestRequestService,
    TestRequestUpdateService, UserService,
};
use config::Config;
use domain::ports::Backend;

/// Application state shared across all handlers
pub struct AppState<B: Backend> {
    pub user_service: Arc<UserService<B::Users>>,
    pub query_service: Arc<TestRequestQueryService<B::Requests>>,
    pub update_service: Arc<TestRequestUpdateService<B::Requests, B::Flows>>,
    pub test_request_service: Arc<TestRequestService<B::Requests, B::Flows>>,
    pub flow_service: Arc<TestRequestFlowService<B::Requests, B::Flows>>,
    pub config: Config,
}

// Derived Clone would require `B: Clone`
impl<B: Backend> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            user_service: self.user_service.clone(),
            query_service: self.query_service.clone(),
            update_service: self.update_service.clone(),
            test_request_service: self.test_request_service.clone(),
            flow_service: self.flow_service.clone(),
            config: self.config.clone(),
        }
    }
}

impl<B: Backend> AppState<B> {
    /// Wire every service from one set of repositories
    pub fn new(
        users: Arc<B::Users>,
        requests: Arc<B::Requests>,
        flows: Arc<B::Flows>,
        config: Config,
    ) -> Self {
        Self {
            user_service: Arc::new(UserService::new(
                users,
                config.staff_registration_secret.clone(),
            )),
            query_service: Arc::new(TestRequestQueryService::new(requests.clone())),
            update_service: Arc::new(TestRequestUpdateService::new(
                requests.clone(),
                flows.clone(),
            )),
            test_request_service: Arc::new(TestRequestService::new(
                requests.clone(),
                flows.clone(),
            )),
            flow_service: Arc::new(TestRequestFlowService::new(requests, flows)),
            config,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Unauthenticated account creation; main wraps these in the rate limiter
pub fn registration_routes<B: Backend>() -> Router<AppState<B>> {
    Router::new().route("/auth/register", post(handlers::register::<B>))
}

/// Full application router
pub fn build_router<B: Backend>(
    state: AppState<B>,
    registration_routes: Router<AppState<B>>,
) -> Router {
    let api_routes = Router::new()
        // Patients
        .route(
            "/api/testrequests",
            post(handlers::create_test_request::<B>).get(handlers::list_my_requests::<B>),
        )
        .route("/api/testrequests/:id", get(handlers::get_my_request::<B>))
        .route("/api/testrequests/:id/flow", get(handlers::get_flow::<B>))
        // Testers
        .route(
            "/api/labrequests/to-be-tested",
            get(handlers::list_to_be_tested::<B>),
        )
        .route("/api/labrequests", get(handlers::list_for_tester::<B>))
        .route(
            "/api/labrequests/assign/:id",
            put(handlers::assign_for_lab_test::<B>),
        )
        .route(
            "/api/labrequests/update/:id",
            put(handlers::update_lab_test::<B>),
        )
        // Doctors
        .route(
            "/api/consultations/in-queue",
            get(handlers::list_in_queue::<B>),
        )
        .route("/api/consultations", get(handlers::list_for_doctor::<B>))
        .route(
            "/api/consultations/assign/:id",
            put(handlers::assign_for_consultation::<B>),
        )
        .route(
            "/api/consultations/update/:id",
            put(handlers::update_consultation::<B>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware::<B>,
        ));

    Router::new()
        // Health check (no auth)
        .route("/health", get(health))
        .merge(registration_routes)
        .merge(api_routes)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,upstac_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting UPSTAC API...");

    let config = Config::from_env();
    if !config.staff_registration_enabled() {
        tracing::warn!("STAFF_REGISTRATION_SECRET not set; only patients can register");
    }

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connected");

    let state = AppState::<PostgresBackend>::new(
        Arc::new(PostgresUserRepository::new(db.clone())),
        Arc::new(PostgresTestRequestRepository::new(db.clone())),
        Arc::new(PostgresTestRequestFlowRepository::new(db)),
        config.clone(),
    );

    // Uses PeerIpKeyExtractor to get client IP from socket connection
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(config.rate_limit_per_second)
            .burst_size(config.rate_limit_burst)
            .finish()
            .expect("Failed to build governor config"),
    );

    let rate_limited_routes = registration_routes::<PostgresBackend>().layer(GovernorLayer {
        config: governor_config,
    });

    let app = build_router(state, rate_limited_routes);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
