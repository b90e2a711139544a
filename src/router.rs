use crate::db::ConnectionProvider;
use crate::handlers::lab::{reset_database, run_attack};
use crate::handlers::users::user_routes;
use crate::service::{SecureUserService, VulnerableUserService};
use axum::{Router, routing::post};

#[derive(Clone)]
pub struct LabState {
    pub provider: ConnectionProvider,
    pub vulnerable: VulnerableUserService,
    pub secure: SecureUserService,
}

impl LabState {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self {
            vulnerable: VulnerableUserService::new(provider.clone()),
            secure: SecureUserService::new(provider.clone()),
            provider,
        }
    }
}

pub fn lab_router(state: LabState) -> Router {
    Router::new()
        .nest(
            "/api/users/secure",
            user_routes().with_state(state.secure.clone()),
        )
        .nest(
            "/api/users",
            user_routes().with_state(state.vulnerable.clone()),
        )
        .route("/api/lab/reset", post(reset_database))
        .route("/api/lab/{attack}", post(run_attack))
        .with_state(state)
}
