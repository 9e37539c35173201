//! 活动反馈服务
//!
//! 提供反馈提交、查询、更新、删除 REST API。

use std::sync::Arc;

use feedback_service::{FeedbackRepository, routes, state::AppState};
use feedback_shared::{config::AppConfig, database::Database, observability};
use tokio::net::TcpListener;
use tracing::{info, warn};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 本地开发允许通过 .env 注入环境变量，文件不存在时忽略
    dotenvy::dotenv().ok();

    // 统一加载配置：default.toml → {env}.toml → {service_name}.toml → 环境变量
    let config = AppConfig::load("feedback-service")?;

    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    let _guard = observability::init(&obs_config).await?;

    info!(
        environment = %config.environment,
        "Starting feedback-service on {}",
        config.server_addr()
    );

    let db = Database::connect(&config.database).await?;
    // 连接池建立后先确认数据库可用，失败时直接退出
    db.health_check().await?;
    info!("Database health check passed");
    if config.database.run_migrations {
        db.run_migrations(&MIGRATOR).await?;
    } else {
        info!("Skipping database migrations");
    }

    if config.cors.allows_any() && config.is_production() {
        warn!("CORS allowed_origins=\"*\" 在生产环境中不安全，请设置为具体域名");
    }

    let repo = Arc::new(FeedbackRepository::new(db.pool().clone()));
    let state = AppState::new(repo, !config.is_production());
    let app = routes::app(state, &config);

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());
    info!(
        "API available at {}/feedback, docs at /api-docs",
        config.api.base_path()
    );

    // 优雅关闭：收到 SIGTERM 或 Ctrl+C 时停止接收新连接并等待已有请求完成
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");

    Ok(())
}

/// 监听关闭信号
///
/// 收到 SIGTERM 或 Ctrl+C 后返回，触发 axum 的优雅关闭流程。
/// 信号处理器注册失败时只记录日志，该信号源视为永不触发。
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "注册 Ctrl+C 处理器失败");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "注册 SIGTERM 处理器失败");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}
