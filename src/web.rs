mod handlers;

use std::path::Path;

use axum::{Router, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::instrument;

use crate::{error::Result, state::AppState, storage::ContentStore};

/// 设置应用的路由。
///
/// - `GET /`：首页文章列表
/// - `GET /created_by/{author_id}`：作者文章列表
/// - `GET /category/{slug}`：分类文章列表
/// - `GET /tag/{slug}`：标签文章列表
/// - `GET /search?search=`：搜索
/// - `GET /page/{slug}`：静态页面
/// - `GET /post/{slug}`：文章详情
pub fn setup_route<S: ContentStore>(app: AppState<S>) -> Router {
    Router::new()
        .route("/", get(handlers::index::<S>))
        .route("/created_by/{author_id}", get(handlers::created_by::<S>))
        .route("/category/{slug}", get(handlers::category::<S>))
        .route("/tag/{slug}", get(handlers::tag::<S>))
        .route("/search", get(handlers::search::<S>))
        .route("/page/{slug}", get(handlers::page::<S>))
        .route("/post/{slug}", get(handlers::post::<S>))
        .with_state(app)
}

/// 挂载静态文件目录到 `/static`
pub fn with_static_dir(router: Router, dir: &Path) -> Router {
    router.nest_service("/static", ServeDir::new(dir))
}

/// 启动 HTTP 服务，并使用给定的路由处理请求。
#[instrument(name = "http server", skip(router))]
pub async fn run_server_with_router(router: Router, listen: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(listen).await?;

    tracing::info!("listening on {listen}");

    axum::serve(listener, router).await?;
    Ok(())
}

/// 启动 HTTP 服务，自动设置路由和中间件。
///
/// 1. 生成路由
/// 2. 挂载静态文件（如果配置了目录）
/// 3. 添加日志和追踪中间件
/// 4. 启动服务器
pub async fn run_server<S: ContentStore>(
    app: AppState<S>,
    listen: &str,
    static_dir: Option<&Path>,
) -> Result<()> {
    let mut router = setup_route(app);
    if let Some(dir) = static_dir {
        router = with_static_dir(router, dir);
    }
    let router = add_middlewares(router);
    run_server_with_router(router, listen).await
}

/// 为博客路由添加追踪中间件
///
/// 只记录服务端失败（5xx），普通页面请求不输出日志；
/// 404 和空搜索重定向都属于正常响应。
fn add_middlewares(router: Router) -> Router {
    fn log_failure(
        err: tower_http::classify::ServerErrorsFailureClass,
        _latency: std::time::Duration,
        _span: &tracing::Span,
    ) {
        tracing::error!(error = %err, "request failed");
    }

    router.layer(
        TraceLayer::new_for_http()
            .on_failure(log_failure)
            .on_request(|_req: &_, _span: &tracing::Span| {
                // 空实现，关闭请求日志
            }),
    )
}
