use std::sync::Arc;

use super::{ContentStore, PostFilter, Window};
use crate::{
    content::{Page, Post, User},
    error::Result,
};

/// 内存中的只读 [`ContentStore`] 快照
///
/// 用于测试和本地演示，克隆开销为一次引用计数。
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<MemoryData>,
}

#[derive(Default)]
struct MemoryData {
    users: Vec<User>,
    posts: Vec<Post>,
    pages: Vec<Page>,
}

impl MemoryStore {
    pub fn new(users: Vec<User>, mut posts: Vec<Post>, pages: Vec<Page>) -> Self {
        posts.sort_by(|a, b| b.id.cmp(&a.id));
        for post in &mut posts {
            post.tags.sort_by_key(|t| t.id);
        }

        Self {
            data: Arc::new(MemoryData {
                users,
                posts,
                pages,
            }),
        }
    }

    fn matching<'a>(&'a self, filter: &'a PostFilter) -> impl Iterator<Item = &'a Post> + 'a {
        self.data.posts.iter().filter(move |p| filter.matches(p))
    }
}

impl ContentStore for MemoryStore {
    async fn count_posts(&self, filter: &PostFilter) -> Result<u64> {
        Ok(self.matching(filter).count() as u64)
    }

    async fn find_posts(&self, filter: &PostFilter, window: Window) -> Result<Vec<Post>> {
        let skip = usize::try_from(window.offset).unwrap_or(usize::MAX);
        let take = usize::try_from(window.limit).unwrap_or(usize::MAX);

        Ok(self.matching(filter).skip(skip).take(take).cloned().collect())
    }

    async fn find_page(&self, slug: &str) -> Result<Option<Page>> {
        Ok(self
            .data
            .pages
            .iter()
            .find(|p| p.is_published && p.slug == slug)
            .cloned())
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>> {
        Ok(self.data.users.iter().find(|u| u.id == id).cloned())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::content::{Category, Tag};

    /// 记录文章查询次数的 [`MemoryStore`] 包装
    #[derive(Clone)]
    pub struct CountingStore {
        inner: MemoryStore,
        post_queries: Arc<AtomicUsize>,
    }

    impl CountingStore {
        pub fn new(inner: MemoryStore) -> Self {
            Self {
                inner,
                post_queries: Arc::default(),
            }
        }

        /// `count_posts` 与 `find_posts` 的调用总数
        pub fn post_queries(&self) -> usize {
            self.post_queries.load(Ordering::SeqCst)
        }
    }

    impl ContentStore for CountingStore {
        async fn count_posts(&self, filter: &PostFilter) -> Result<u64> {
            self.post_queries.fetch_add(1, Ordering::SeqCst);
            self.inner.count_posts(filter).await
        }

        async fn find_posts(&self, filter: &PostFilter, window: Window) -> Result<Vec<Post>> {
            self.post_queries.fetch_add(1, Ordering::SeqCst);
            self.inner.find_posts(filter, window).await
        }

        async fn find_page(&self, slug: &str) -> Result<Option<Page>> {
            self.inner.find_page(slug).await
        }

        async fn find_user(&self, id: i64) -> Result<Option<User>> {
            self.inner.find_user(id).await
        }
    }

    /// 测试数据：
    ///
    /// - 用户 1 `asilva`（Ana Silva），用户 2 `bob`（无名字）
    /// - 文章 1..=20 已发布，作者 1；偶数 id 属于分类 `rust`，
    ///   3 的倍数带标签 `web`(id 5) 和 `axum`(id 2)
    /// - 文章 21 已发布，作者 2，标题 "Hello World"，摘要 "intro"
    /// - 文章 22 未发布，分类 `rust`，标签 `web`，标题 "Hello draft"
    /// - 页面 `about` 已发布，`draft-page` 未发布
    pub fn sample_store() -> MemoryStore {
        let ana = User::new(1, "asilva").with_name("Ana", "Silva");
        let bob = User::new(2, "bob");
        let rust = Category::new(1, "Rust", "rust");
        let web = Tag::new(5, "Web", "web");
        let axum = Tag::new(2, "Axum", "axum");

        let mut posts: Vec<Post> = (1..=20)
            .map(|id| {
                let mut p = post(id, &format!("Post {id}"), ana.clone());
                if id % 2 == 0 {
                    p.category = Some(rust.clone());
                }
                if id % 3 == 0 {
                    p.tags = vec![web.clone(), axum.clone()];
                }
                p
            })
            .collect();

        let mut hello = post(21, "Hello World", bob.clone());
        hello.excerpt = "intro".into();
        posts.push(hello);

        let mut draft = post(22, "Hello draft", ana.clone());
        draft.is_published = false;
        draft.category = Some(rust);
        draft.tags = vec![web];
        posts.push(draft);

        let pages = vec![
            Page {
                id: 1,
                title: "About".into(),
                slug: "about".into(),
                content: "<p>About me</p>".into(),
                is_published: true,
            },
            Page {
                id: 2,
                title: "Draft".into(),
                slug: "draft-page".into(),
                content: String::new(),
                is_published: false,
            },
        ];

        MemoryStore::new(vec![ana, bob], posts, pages)
    }

    pub fn post(id: i64, title: &str, author: User) -> Post {
        Post {
            id,
            title: title.to_string(),
            slug: format!("post-{id}"),
            excerpt: format!("excerpt {id}"),
            content: format!("<p>content {id}</p>"),
            is_published: true,
            created_at: Utc
                .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .single()
                .unwrap_or_default()
                + chrono::Duration::days(id),
            author,
            category: None,
            tags: Vec::new(),
        }
    }
}
