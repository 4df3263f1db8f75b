use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

use super::dto::{ErrorResponse, RegisterTurnRequest, TurnResponse};
use crate::error::ServiceError;
use crate::service::TurnService;
use crate::store::Stores;

type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Debug, Clone)]
pub struct AppState {
    pub turn_service: Arc<TurnService>,
}

impl AppState {
    pub fn new(turn_service: Arc<TurnService>) -> Self {
        Self { turn_service }
    }

    /// メモリストアを使う状態（テスト・ローカル実行用）
    pub fn in_memory() -> Self {
        Self::new(Arc::new(TurnService::new(Stores::memory())))
    }
}

pub async fn start_game(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.turn_service.start_game().await?;
    Ok(StatusCode::CREATED)
}

pub async fn get_turn(
    State(state): State<AppState>,
    Path(turn_count): Path<u32>,
) -> Result<Json<TurnResponse>, ApiError> {
    let view = state
        .turn_service
        .find_latest_game_turn_by_turn_count(turn_count)
        .await?;
    Ok(Json(TurnResponse::from(view)))
}

pub async fn register_turn(
    State(state): State<AppState>,
    payload: Result<Json<RegisterTurnRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = payload.map_err(invalid_request)?;
    let game_move = request.game_move.to_move().map_err(ServiceError::from)?;

    state
        .turn_service
        .register_turn(request.turn_count, game_move)
        .await?;
    Ok(StatusCode::CREATED)
}

/// ボディの解析失敗もエラーレスポンスの形に揃える
fn invalid_request(rejection: JsonRejection) -> ApiError {
    let error_response = ErrorResponse::with_code(
        "INVALID_REQUEST",
        rejection.body_text(),
        "INVALID_REQUEST",
    );
    (rejection.status(), Json(error_response))
}
