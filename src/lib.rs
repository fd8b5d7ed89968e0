pub mod config;
pub mod content;
pub mod error;
pub mod pagination;
pub mod query;
pub mod render;
pub mod state;
pub mod storage;
pub mod upload;
pub mod view;
pub mod web;

use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

use config::Config;
use render::TemplateRenderer;
use state::AppState;

/// 启动博客服务
///
/// 1. 初始化日志（`BLOG_LOG` 控制过滤级别）
/// 2. 读取配置
/// 3. 连接数据库，加载模板
/// 4. 启动 HTTP 服务
pub async fn run() -> error::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
        .with_env_filter(EnvFilter::from_env("BLOG_LOG"))
        .init();

    let config = Config::from_env()?;
    let pool = storage::init_db_from_env().await?;
    let renderer = TemplateRenderer::from_config(&config)?;

    let app = AppState::new(pool, renderer, config.per_page);

    web::run_server(app, &config.listen, config.static_dir.as_deref()).await
}
