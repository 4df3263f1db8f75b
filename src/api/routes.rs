use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::{
    handlers::{get_turn, register_turn, start_game, AppState},
    middleware::{cors, logging},
};
use crate::config::ServerConfig;

pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/api/games", post(start_game))
        .route("/api/games/latest/turns", post(register_turn))
        .route("/api/games/latest/turns/:turn_count", get(get_turn))
        .route("/health", get(health_check))
        .with_state(state);

    if server.enable_cors {
        router = router.layer(middleware::from_fn(cors));
    }
    if server.enable_logging {
        router = router.layer(middleware::from_fn(logging));
    }

    router
}

async fn health_check() -> &'static str {
    "Reversi turn server is running"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::{Request, StatusCode}};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_check_route() {
        let router = create_router(AppState::in_memory(), &ServerConfig::default());

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["Access-Control-Allow-Origin"], "*");
    }

    #[tokio::test]
    async fn test_cors_can_be_disabled() {
        let server = ServerConfig {
            enable_cors: false,
            ..ServerConfig::default()
        };
        let router = create_router(AppState::in_memory(), &server);

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.headers().get("Access-Control-Allow-Origin").is_none());
    }
}
