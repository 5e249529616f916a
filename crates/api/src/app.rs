use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::{BroadcastService, CooldownGate, IdentityService, MembershipService, PushService};
use domain::store::{AccountStore, GroupStore};
use shared::jwt::JwtConfig;
use sqlx::PgPool;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware};
use crate::routes::{alarms, auth, groups, health};

/// Store and collaborator handles the application is wired with.
///
/// Production wiring uses the Postgres stores and the HTTP push client;
/// tests inject in-memory stores and a mock push service.
pub struct AppDeps {
    pub groups: Arc<dyn GroupStore>,
    pub accounts: Arc<dyn AccountStore>,
    pub push: Arc<dyn PushService>,
    /// Pool for health probes. `None` when running without Postgres.
    pub pool: Option<PgPool>,
}

#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<IdentityService>,
    pub membership: Arc<MembershipService>,
    pub broadcast: Arc<BroadcastService>,
    pub jwt: Arc<JwtConfig>,
    pub config: Arc<Config>,
    pub pool: Option<PgPool>,
}

pub fn create_app(config: Config, deps: AppDeps) -> Router {
    let config = Arc::new(config);

    let gate = CooldownGate::new(config.limits.cooldown_secs);
    let jwt = Arc::new(JwtConfig::with_leeway(
        &config.auth.session_secret,
        config.auth.session_ttl_secs,
        config.auth.leeway_secs,
    ));

    let state = AppState {
        identity: Arc::new(IdentityService::new(
            deps.accounts,
            config.auth.device_secret.clone(),
        )),
        membership: Arc::new(MembershipService::new(
            deps.groups.clone(),
            gate,
            config.limits.max_members,
        )),
        broadcast: Arc::new(BroadcastService::new(deps.groups, gate, deps.push)),
        jwt,
        config: config.clone(),
        pool: deps.pool,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Authentication happens per-handler through the UserAuth extractor;
    // only the auth endpoint and the probes are reachable without a token.
    let api_routes = Router::new()
        .route("/api/v1/auth/device", post(auth::register_device))
        .route("/api/v1/groups", post(groups::create_group))
        .route("/api/v1/groups/:code", get(groups::get_group_info))
        .route("/api/v1/groups/:code/join", post(groups::join_group))
        .route("/api/v1/groups/:code/leave", post(groups::leave_group))
        .route("/api/v1/groups/:code/alarm", post(alarms::send_alarm));

    let ops_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/live", get(health::live))
        .route("/api/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(api_routes)
        .merge(ops_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors)
        .with_state(state)
}
