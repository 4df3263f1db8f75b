//! ターンAPIの統合テストモジュール
//! 実際のHTTPリクエストをシミュレートしてAPIの動作を確認し、
//! エラー種別ごとのステータスコードや同時着手の直列化をテストする。

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use reversi_turns::{
    api::{handlers::AppState, routes::create_router},
    config::ServerConfig,
    game::{Game, GameResult, Move, MoveValidator, Player},
};

fn create_test_app() -> Router {
    create_router(AppState::in_memory(), &ServerConfig::default())
}

async fn parse_response_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send_request(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");

    let request = match body {
        Some(body) => request.body(Body::from(serde_json::to_vec(&body).unwrap())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

async fn start_game(app: &Router) {
    let response = send_request(app, Method::POST, "/api/games", None).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

async fn get_turn(app: &Router, turn_count: u32) -> Response<Body> {
    send_request(
        app,
        Method::GET,
        &format!("/api/games/latest/turns/{}", turn_count),
        None,
    )
    .await
}

async fn post_move(app: &Router, turn_count: u32, disc: i64, x: i64, y: i64) -> Response<Body> {
    send_request(
        app,
        Method::POST,
        "/api/games/latest/turns",
        Some(json!({
            "turnCount": turn_count,
            "move": { "disc": disc, "x": x, "y": y }
        })),
    )
    .await
}

async fn assert_error(response: Response<Body>, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let error_data = parse_response_json(response).await;
    assert_eq!(error_data["error"], code);
    assert_eq!(error_data["error_code"], code);
}

#[tokio::test]
async fn test_requests_before_any_game_are_not_found() {
    let app = create_test_app();

    assert_error(get_turn(&app, 0).await, StatusCode::NOT_FOUND, "GAME_NOT_FOUND").await;
    assert_error(
        post_move(&app, 1, 1, 2, 3).await,
        StatusCode::NOT_FOUND,
        "GAME_NOT_FOUND",
    )
    .await;
}

#[tokio::test]
async fn test_opening_turn_and_first_move() {
    let app = create_test_app();
    start_game(&app).await;

    let response = get_turn(&app, 0).await;
    assert_eq!(response.status(), StatusCode::OK);
    let turn = parse_response_json(response).await;
    assert_eq!(turn["turnCount"], 0);
    assert_eq!(turn["nextDisc"], 1);
    assert!(turn["winnerDisc"].is_null());
    assert_eq!(turn["board"][3][4], 1);
    assert_eq!(turn["board"][4][3], 1);
    assert_eq!(turn["board"][3][3], 2);
    assert_eq!(turn["board"][4][4], 2);

    let response = post_move(&app, 1, 1, 2, 3).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());

    let turn = parse_response_json(get_turn(&app, 1).await).await;
    assert_eq!(turn["turnCount"], 1);
    assert_eq!(turn["nextDisc"], 2);
    assert_eq!(turn["board"][3][2], 1);
    assert_eq!(turn["board"][3][3], 1);

    let board = turn["board"].as_array().unwrap();
    let count = |code: u64| {
        board
            .iter()
            .flat_map(|row| row.as_array().unwrap())
            .filter(|disc| disc.as_u64() == Some(code))
            .count()
    };
    assert_eq!(count(1), 4);
    assert_eq!(count(2), 1);
}

#[tokio::test]
async fn test_illegal_moves_are_rejected_without_persisting() {
    let app = create_test_app();
    start_game(&app).await;

    // 挟める石がない
    assert_error(post_move(&app, 1, 1, 2, 2).await, StatusCode::BAD_REQUEST, "INVALID_MOVE").await;
    // 既に石がある
    assert_error(post_move(&app, 1, 1, 3, 3).await, StatusCode::BAD_REQUEST, "INVALID_MOVE").await;
    // 盤外
    assert_error(post_move(&app, 1, 1, 10, 3).await, StatusCode::BAD_REQUEST, "INVALID_MOVE").await;
    // 空マスは着手できない
    assert_error(post_move(&app, 1, 0, 2, 3).await, StatusCode::BAD_REQUEST, "INVALID_MOVE").await;

    assert_error(get_turn(&app, 1).await, StatusCode::NOT_FOUND, "TURN_NOT_FOUND").await;
}

#[tokio::test]
async fn test_wrong_disc_is_out_of_turn() {
    let app = create_test_app();
    start_game(&app).await;

    assert_error(post_move(&app, 1, 2, 4, 2).await, StatusCode::CONFLICT, "OUT_OF_TURN").await;
}

#[tokio::test]
async fn test_turn_count_must_follow_existing_turn() {
    let app = create_test_app();
    start_game(&app).await;

    assert_error(post_move(&app, 5, 1, 2, 3).await, StatusCode::NOT_FOUND, "TURN_NOT_FOUND").await;

    assert_eq!(post_move(&app, 1, 1, 2, 3).await.status(), StatusCode::CREATED);
    assert_error(
        post_move(&app, 1, 1, 3, 2).await,
        StatusCode::CONFLICT,
        "TURN_ALREADY_EXISTS",
    )
    .await;
}

#[tokio::test]
async fn test_concurrent_submissions_for_same_turn() {
    let app = create_test_app();
    start_game(&app).await;

    let openings = [(3, 2), (2, 3), (5, 4), (4, 5)];
    let requests = openings
        .iter()
        .map(|&(x, y)| post_move(&app, 1, 1, x, y));
    let statuses: Vec<StatusCode> = futures::future::join_all(requests)
        .await
        .into_iter()
        .map(|response| response.status())
        .collect();

    let created = statuses.iter().filter(|&&s| s == StatusCode::CREATED).count();
    let conflicts = statuses.iter().filter(|&&s| s == StatusCode::CONFLICT).count();
    assert_eq!(created, 1, "statuses: {:?}", statuses);
    assert_eq!(conflicts, openings.len() - 1);
}

#[tokio::test]
async fn test_full_game_reaches_terminal_turn() {
    let app = create_test_app();
    start_game(&app).await;

    // ローカルのエンジンで手を選び、同じ手をAPIに送る
    let mut game = Game::new();
    while let Some(mover) = game.latest().next_mover() {
        let position = MoveValidator::legal_moves(game.latest().board(), mover)[0];
        let turn_count = game.latest().turn_count() + 1;
        let disc = match mover {
            Player::Dark => 1,
            Player::Light => 2,
        };

        let response = post_move(&app, turn_count, disc, position.x() as i64, position.y() as i64).await;
        assert_eq!(response.status(), StatusCode::CREATED, "turn {}", turn_count);
        game.play(Move::new(mover, position)).unwrap();

        let remote = parse_response_json(get_turn(&app, turn_count).await).await;
        let expected_next = game.latest().next_mover().map(|player| player.to_disc().code());
        assert_eq!(remote["nextDisc"].as_u64(), expected_next.map(u64::from));
    }

    let last = game.latest().turn_count();
    let result = GameResult::winner(game.latest()).unwrap();

    let turn = parse_response_json(get_turn(&app, last).await).await;
    assert!(turn["nextDisc"].is_null());
    assert_eq!(turn["winnerDisc"], result.winner.code());

    assert_error(post_move(&app, last + 1, 1, 0, 0).await, StatusCode::CONFLICT, "GAME_OVER").await;
}

#[tokio::test]
async fn test_malformed_bodies_use_error_response_shape() {
    let app = create_test_app();
    start_game(&app).await;

    let missing_move = send_request(
        &app,
        Method::POST,
        "/api/games/latest/turns",
        Some(json!({ "turnCount": 1 })),
    )
    .await;
    assert_error(missing_move, StatusCode::UNPROCESSABLE_ENTITY, "INVALID_REQUEST").await;

    let negative_turn = send_request(
        &app,
        Method::POST,
        "/api/games/latest/turns",
        Some(json!({ "turnCount": -1, "move": { "disc": 1, "x": 2, "y": 3 } })),
    )
    .await;
    assert_error(negative_turn, StatusCode::UNPROCESSABLE_ENTITY, "INVALID_REQUEST").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/games/latest/turns")
        .header("Content-Type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let not_json = app.clone().oneshot(request).await.unwrap();
    assert_eq!(not_json.status(), StatusCode::BAD_REQUEST);
    let error_data = parse_response_json(not_json).await;
    assert_eq!(error_data["error_code"], "INVALID_REQUEST");
    assert!(error_data["message"].is_string());
    assert!(error_data["timestamp"].is_string());

    // 不正なボディでは何も保存されない
    assert_error(get_turn(&app, 1).await, StatusCode::NOT_FOUND, "TURN_NOT_FOUND").await;
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();
    let response = send_request(&app, Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}
