//! リバーシ ターンAPIサーバーのエントリポイント
//! 設定読み込み、ログ初期化、ストア構築、HTTPサーバー起動を行う。

use std::sync::Arc;

use reversi_turns::{
    api::{handlers::AppState, routes::create_router},
    config::Config,
    service::TurnService,
    store::Stores,
};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if std::env::args().any(|arg| arg == "--generate-config") {
        match Config::default().save_to_file("config.json") {
            Ok(()) => println!("config.json を生成しました"),
            Err(e) => {
                eprintln!("設定ファイル生成失敗: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    // 設定ファイルと環境変数から統合設定を読み込み
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("設定エラー: {}", e);
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = config.validate() {
        error!("設定エラー: {}", e);
        error!("デフォルト設定を生成: cargo run -- --generate-config");
        std::process::exit(1);
    }

    info!(
        bind = %config.bind_address(),
        storage = ?config.storage.backend,
        path = %config.storage.path.display(),
        "設定読み込み完了"
    );

    let stores = match Stores::from_config(&config.storage).await {
        Ok(stores) => stores,
        Err(e) => {
            error!("ストア初期化失敗: {}", e);
            std::process::exit(1);
        }
    };

    let state = AppState::new(Arc::new(TurnService::new(stores)));
    let app = create_router(state, &config.server);

    let bind_address = config.bind_address();
    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("アドレスバインド失敗 {}: {}", bind_address, e);
            std::process::exit(1);
        }
    };

    info!("サーバー稼働中: {} (Ctrl+C で停止)", bind_address);

    if let Err(e) = axum::serve(listener, app).await {
        error!("サーバー停止: {}", e);
        std::process::exit(1);
    }
}
