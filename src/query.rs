//! 查询构造：把请求意图转换为有序、已筛选的文章选择集。

use tracing::instrument;

use crate::{
    content::{Page, Post, User},
    error::{Error, Result},
    storage::{ContentStore, PostFilter, Window},
};

/// 去除首尾空白后的非空搜索词
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// 面包屑中搜索词的最大字符数
    pub const HEADLINE_CHARS: usize = 30;

    /// 空白或缺失的搜索词返回 `None`，调用方应回退到首页
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        raw.map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 截断到 [`Self::HEADLINE_CHARS`] 个字符
    pub fn headline(&self) -> String {
        self.0.chars().take(Self::HEADLINE_CHARS).collect()
    }
}

/// 尚未分页的文章选择集
#[derive(Debug)]
pub struct Selection<'s, S> {
    store: &'s S,
    filter: PostFilter,
    count: Option<u64>,
}

impl<'s, S: ContentStore> Selection<'s, S> {
    fn new(store: &'s S, filter: PostFilter) -> Self {
        Self {
            store,
            filter,
            count: None,
        }
    }

    pub async fn count(&self) -> Result<u64> {
        match self.count {
            Some(count) => Ok(count),
            None => self.store.count_posts(&self.filter).await,
        }
    }

    pub async fn fetch(&self, window: Window) -> Result<Vec<Post>> {
        self.store.find_posts(&self.filter, window).await
    }

    /// 选择集为空时返回 [`Error::NotFound`]
    async fn require_non_empty(mut self) -> Result<Self> {
        let count = self.store.count_posts(&self.filter).await?;
        if count == 0 {
            return Err(Error::NotFound);
        }
        self.count = Some(count);
        Ok(self)
    }
}

/// 文章/页面查询构造器
pub struct QueryBuilder<'s, S> {
    store: &'s S,
    per_page: u64,
}

impl<'s, S: ContentStore> QueryBuilder<'s, S> {
    pub fn new(store: &'s S, per_page: u64) -> Self {
        Self {
            store,
            per_page: per_page.max(1),
        }
    }

    /// 所有已发布文章
    pub fn list_all(&self) -> Selection<'s, S> {
        Selection::new(self.store, PostFilter::All)
    }

    /// 指定作者的已发布文章
    ///
    /// 作者不存在时返回 [`Error::NotFound`]，不会查询文章。
    #[instrument(skip(self))]
    pub async fn list_by_author(&self, author_id: i64) -> Result<(User, Selection<'s, S>)> {
        let author = self
            .store
            .find_user(author_id)
            .await?
            .ok_or(Error::NotFound)?;

        Ok((author, Selection::new(self.store, PostFilter::Author(author_id))))
    }

    /// 指定分类的已发布文章，结果为空时返回 [`Error::NotFound`]
    #[instrument(skip(self))]
    pub async fn list_by_category(&self, slug: &str) -> Result<Selection<'s, S>> {
        Selection::new(self.store, PostFilter::Category(slug.to_string()))
            .require_non_empty()
            .await
    }

    /// 指定标签的已发布文章，结果为空时返回 [`Error::NotFound`]
    #[instrument(skip(self))]
    pub async fn list_by_tag(&self, slug: &str) -> Result<Selection<'s, S>> {
        Selection::new(self.store, PostFilter::Tag(slug.to_string()))
            .require_non_empty()
            .await
    }

    /// 搜索结果，最多返回一页，不再分页
    #[instrument(skip_all, fields(term = term.as_str()))]
    pub async fn search(&self, term: &SearchTerm) -> Result<Vec<Post>> {
        Selection::new(self.store, PostFilter::Search(term.as_str().to_string()))
            .fetch(Window::first(self.per_page))
            .await
    }

    /// 根据 slug 获取已发布文章
    #[instrument(skip(self))]
    pub async fn detail_post(&self, slug: &str) -> Result<Post> {
        Selection::new(self.store, PostFilter::Slug(slug.to_string()))
            .fetch(Window::first(1))
            .await?
            .into_iter()
            .next()
            .ok_or(Error::NotFound)
    }

    /// 根据 slug 获取已发布页面
    #[instrument(skip(self))]
    pub async fn detail_page(&self, slug: &str) -> Result<Page> {
        self.store.find_page(slug).await?.ok_or(Error::NotFound)
    }
}
