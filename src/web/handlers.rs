use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::Query;
use serde::Deserialize;
use tracing::instrument;

use crate::{
    error::{Error, Result},
    state::AppState,
    storage::ContentStore,
    view::{Intent, Resolution},
};

/// 列表页查询参数
///
/// `page` 保持原始字符串，由分页器容错解析。
/// 参数重复出现时取最后一个值。
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListParams {
    page: Vec<String>,
}

impl ListParams {
    fn page(&self) -> Option<&str> {
        self.page.last().map(String::as_str)
    }
}

/// 搜索查询参数，重复时取最后一个值
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    search: Vec<String>,
}

/// 首页
pub async fn index<S: ContentStore>(
    State(app): State<AppState<S>>,
    Query(params): Query<ListParams>,
) -> Result<Response> {
    respond(&app, Intent::ListAll, params.page()).await
}

/// 作者文章列表
///
/// 非数字的作者 id 视为不存在。
pub async fn created_by<S: ContentStore>(
    Path(author_id): Path<String>,
    State(app): State<AppState<S>>,
    Query(params): Query<ListParams>,
) -> Result<Response> {
    let author_id = author_id.parse::<i64>().map_err(|_| Error::NotFound)?;
    respond(&app, Intent::ByAuthor(author_id), params.page()).await
}

/// 分类文章列表
pub async fn category<S: ContentStore>(
    Path(slug): Path<String>,
    State(app): State<AppState<S>>,
    Query(params): Query<ListParams>,
) -> Result<Response> {
    respond(&app, Intent::ByCategory(slug), params.page()).await
}

/// 标签文章列表
pub async fn tag<S: ContentStore>(
    Path(slug): Path<String>,
    State(app): State<AppState<S>>,
    Query(params): Query<ListParams>,
) -> Result<Response> {
    respond(&app, Intent::ByTag(slug), params.page()).await
}

/// 搜索，结果不分页
pub async fn search<S: ContentStore>(
    State(app): State<AppState<S>>,
    Query(mut params): Query<SearchParams>,
) -> Result<Response> {
    respond(&app, Intent::Search(params.search.pop()), None).await
}

/// 静态页面
pub async fn page<S: ContentStore>(
    Path(slug): Path<String>,
    State(app): State<AppState<S>>,
) -> Result<Response> {
    respond(&app, Intent::PageDetail(slug), None).await
}

/// 文章详情
pub async fn post<S: ContentStore>(
    Path(slug): Path<String>,
    State(app): State<AppState<S>>,
) -> Result<Response> {
    respond(&app, Intent::PostDetail(slug), None).await
}

#[instrument(skip(app))]
async fn respond<S: ContentStore>(
    app: &AppState<S>,
    intent: Intent,
    page: Option<&str>,
) -> Result<Response> {
    match app.resolver().resolve(intent, page).await? {
        Resolution::Render(view) => {
            let html = app.renderer().render_view(&view)?;
            Ok(Html(html).into_response())
        }
        Resolution::Redirect(to) => Ok(Redirect::to(to).into_response()),
    }
}
