//! 视图解析：请求意图 → 查询 → 分页 → 面包屑上下文 → 模板。

use serde::Serialize;
use tracing::instrument;

use crate::{
    content::{Page, Post},
    error::{Error, Result},
    pagination::{PageWindow, Paginated},
    query::{QueryBuilder, SearchTerm, Selection},
    storage::ContentStore,
};

/// 请求意图，每个请求只对应一个
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    ListAll,
    ByAuthor(i64),
    ByCategory(String),
    ByTag(String),
    /// 原始搜索参数，未去除空白
    Search(Option<String>),
    PostDetail(String),
    PageDetail(String),
}

/// 模板
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Index,
    Post,
    Page,
}

impl Template {
    pub fn name(&self) -> &'static str {
        match self {
            Template::Index => "blog/pages/index.html",
            Template::Post => "blog/pages/post.html",
            Template::Page => "blog/pages/page.html",
        }
    }
}

/// 面包屑标题
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub page_title: String,
    pub page_title_main: String,
}

impl Breadcrumb {
    fn new(page_title: String, page_title_main: String) -> Self {
        Self {
            page_title,
            page_title_main,
        }
    }

    pub fn home() -> Self {
        Self::new("Home".into(), "Home >".into())
    }

    pub fn author(display_name: &str) -> Self {
        Self::new(
            format!("{display_name} - Author posts"),
            format!("Home > Author > {display_name}"),
        )
    }

    pub fn category(name: &str) -> Self {
        Self::new(
            format!("{name} - Category"),
            format!("Home > Category > {name}"),
        )
    }

    pub fn tag(name: &str) -> Self {
        Self::new(format!("{name} - Tag"), format!("Home > Tag > {name}"))
    }

    pub fn search(term: &SearchTerm) -> Self {
        let headline = term.headline();
        Self::new(
            format!("{headline} - Search"),
            format!("Home > Search > {headline}"),
        )
    }

    pub fn post(title: &str) -> Self {
        Self::new(format!("{title} - Post"), format!("Home > Post > {title}"))
    }

    pub fn page(title: &str) -> Self {
        Self::new(format!("{title} - Page"), format!("Home > Page > {title}"))
    }
}

/// 视图主体
#[derive(Debug, Clone)]
pub enum ViewBody {
    Listing {
        page_obj: Paginated<Post>,
        search_value: Option<String>,
    },
    Post(Post),
    Page(Page),
}

/// 可以直接交给渲染器的视图
#[derive(Debug, Clone)]
pub struct View {
    pub template: Template,
    pub breadcrumb: Breadcrumb,
    pub body: ViewBody,
}

impl View {
    /// 模板上下文
    pub fn context(&self) -> tera::Result<tera::Context> {
        let mut ctx = tera::Context::from_serialize(&self.breadcrumb)?;
        match &self.body {
            ViewBody::Listing {
                page_obj,
                search_value,
            } => {
                ctx.insert("page_obj", page_obj);
                if let Some(search_value) = search_value {
                    ctx.insert("search_value", search_value);
                }
            }
            ViewBody::Post(post) => ctx.insert("post", post),
            ViewBody::Page(page) => ctx.insert("page", page),
        }
        Ok(ctx)
    }
}

/// 解析结果
#[derive(Debug)]
pub enum Resolution {
    Render(View),
    /// 空搜索，重定向到首页
    Redirect(&'static str),
}

/// 视图解析器
///
/// 每个请求创建一个，不保存任何跨请求状态。
pub struct ViewResolver<'s, S> {
    queries: QueryBuilder<'s, S>,
    per_page: u64,
}

impl<'s, S: ContentStore> ViewResolver<'s, S> {
    pub const HOME: &'static str = "/";

    pub fn new(store: &'s S, per_page: u64) -> Self {
        Self {
            queries: QueryBuilder::new(store, per_page),
            per_page,
        }
    }

    /// 解析请求意图
    ///
    /// `page` 为原始 `page` 查询参数，只对列表意图生效。
    #[instrument(skip(self))]
    pub async fn resolve(&self, intent: Intent, page: Option<&str>) -> Result<Resolution> {
        let view = match intent {
            Intent::ListAll => {
                self.list(self.queries.list_all(), page, |_| Ok(Breadcrumb::home()))
                    .await?
            }

            Intent::ByAuthor(author_id) => {
                let (author, selection) = self.queries.list_by_author(author_id).await?;
                let name = author.display_name();
                self.list(selection, page, |_| Ok(Breadcrumb::author(&name)))
                    .await?
            }

            Intent::ByCategory(slug) => {
                let selection = self.queries.list_by_category(&slug).await?;
                self.list(selection, page, |posts| {
                    first_post(posts)?
                        .category
                        .as_ref()
                        .map(|c| Breadcrumb::category(&c.name))
                        .ok_or(Error::NotFound)
                })
                .await?
            }

            Intent::ByTag(slug) => {
                let selection = self.queries.list_by_tag(&slug).await?;
                self.list(selection, page, |posts| {
                    first_post(posts)?
                        .representative_tag()
                        .map(|t| Breadcrumb::tag(&t.name))
                        .ok_or(Error::NotFound)
                })
                .await?
            }

            Intent::Search(raw) => {
                let Some(term) = SearchTerm::parse(raw.as_deref()) else {
                    return Ok(Resolution::Redirect(Self::HOME));
                };

                let posts = self.queries.search(&term).await?;
                View {
                    template: Template::Index,
                    breadcrumb: Breadcrumb::search(&term),
                    body: ViewBody::Listing {
                        page_obj: Paginated::single(posts),
                        search_value: Some(term.as_str().to_string()),
                    },
                }
            }

            Intent::PostDetail(slug) => {
                let post = self.queries.detail_post(&slug).await?;
                View {
                    template: Template::Post,
                    breadcrumb: Breadcrumb::post(&post.title),
                    body: ViewBody::Post(post),
                }
            }

            Intent::PageDetail(slug) => {
                let page = self.queries.detail_page(&slug).await?;
                View {
                    template: Template::Page,
                    breadcrumb: Breadcrumb::page(&page.title),
                    body: ViewBody::Page(page),
                }
            }
        };

        Ok(Resolution::Render(view))
    }

    /// 列表视图：统计、分页、取当前页，再由 `breadcrumb` 生成标题
    async fn list<F>(
        &self,
        selection: Selection<'s, S>,
        page: Option<&str>,
        breadcrumb: F,
    ) -> Result<View>
    where
        F: FnOnce(&Paginated<Post>) -> Result<Breadcrumb>,
    {
        let count = selection.count().await?;
        let window = PageWindow::resolve(count, self.per_page, page);
        let posts = selection.fetch(window.window()).await?;

        tracing::debug!(count, page = window.number, "listing posts");

        let page_obj = Paginated::new(posts, window);
        let breadcrumb = breadcrumb(&page_obj)?;

        Ok(View {
            template: Template::Index,
            breadcrumb,
            body: ViewBody::Listing {
                page_obj,
                search_value: None,
            },
        })
    }
}

fn first_post(page: &Paginated<Post>) -> Result<&Post> {
    page.items.first().ok_or(Error::NotFound)
}
