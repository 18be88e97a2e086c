pub mod health;
pub mod session;
pub mod simulate;

use crate::config::Config;
use crate::session::SimulatorSession;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<SimulatorSession>>,
    pub config: Config,
}

impl AppState {
    pub fn new(session: SimulatorSession, config: Config) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            config,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/simulate", post(simulate::simulate))
        .route("/v1/aggregate", post(simulate::aggregate))
        .route("/v1/session", get(session::get_session))
        .route("/v1/session/inputs", put(session::update_inputs))
        .route("/v1/session/calculate", post(session::calculate))
        .route(
            "/v1/session/rounds/:round/toggle",
            post(session::toggle_round),
        )
        .route("/v1/session/tab", put(session::switch_tab))
        .route("/v1/session/save", post(session::save))
        .route("/v1/session/reset", post(session::reset))
        .layer(cors)
        .with_state(state)
}
