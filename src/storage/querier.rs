use std::future::Future;

use super::{DBPool, PostFilter, models::PostRow};
use crate::{
    content::{Page, Post, User},
    error::Result,
};

/// 结果窗口：跳过 `offset` 条，最多返回 `limit` 条
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

impl Window {
    pub fn first(limit: u64) -> Self {
        Self { offset: 0, limit }
    }
}

/// 内容存储，只读
///
/// 所有文章查询只返回已发布文章，按 id 降序排列。
pub trait ContentStore: Clone + Send + Sync + 'static {
    /// 统计满足 [`PostFilter`] 的文章数量
    fn count_posts(&self, filter: &PostFilter) -> impl Future<Output = Result<u64>> + Send;

    /// 查询满足 [`PostFilter`] 的文章，限定在 [`Window`] 内
    fn find_posts(
        &self,
        filter: &PostFilter,
        window: Window,
    ) -> impl Future<Output = Result<Vec<Post>>> + Send;

    /// 根据 slug 查询已发布的页面
    fn find_page(&self, slug: &str) -> impl Future<Output = Result<Option<Page>>> + Send;

    /// 根据 id 查询用户
    fn find_user(&self, id: i64) -> impl Future<Output = Result<Option<User>>> + Send;
}

const POST_COLUMNS: &str = r#"
    SELECT p.id, p.title, p.slug, p.excerpt, p.content, p.is_published, p.created_at,
           jsonb_build_object(
               'id', u.id,
               'username', u.username,
               'first_name', u.first_name,
               'last_name', u.last_name
           ) AS author,
           CASE WHEN c.id IS NULL THEN NULL
                ELSE jsonb_build_object('id', c.id, 'name', c.name, 'slug', c.slug)
           END AS category,
           COALESCE(
               (SELECT jsonb_agg(
                           jsonb_build_object('id', t.id, 'name', t.name, 'slug', t.slug)
                           ORDER BY t.id
                       )
                FROM post_tags pt
                INNER JOIN tags t ON t.id = pt.tag_id
                WHERE pt.post_id = p.id),
               '[]'::jsonb
           ) AS tags
"#;

const POST_FROM: &str = r#"
    FROM posts p
    INNER JOIN users u ON u.id = p.created_by
    LEFT JOIN categories c ON c.id = p.category_id
"#;

impl ContentStore for DBPool {
    async fn count_posts(&self, filter: &PostFilter) -> Result<u64> {
        let mut builder = sqlx::QueryBuilder::new("SELECT COUNT(*)");
        builder.push(POST_FROM);
        filter.push_where(&mut builder);

        let count = builder.build_query_scalar::<i64>().fetch_one(self).await?;
        Ok(count.max(0) as u64)
    }

    async fn find_posts(&self, filter: &PostFilter, window: Window) -> Result<Vec<Post>> {
        let mut builder = sqlx::QueryBuilder::new(POST_COLUMNS);
        builder.push(POST_FROM);
        filter.push_where(&mut builder);

        builder.push(" ORDER BY p.id DESC ");
        builder.push(" LIMIT ").push_bind(to_i64(window.limit));
        builder.push(" OFFSET ").push_bind(to_i64(window.offset));

        let rows = builder.build_query_as::<PostRow>().fetch_all(self).await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn find_page(&self, slug: &str) -> Result<Option<Page>> {
        let page = sqlx::query_as::<_, Page>(
            r#"
            SELECT id, title, slug, content, is_published
            FROM pages
            WHERE slug = $1
            AND is_published = TRUE
            LIMIT 1
            "#,
        )
        .bind(slug)
        .fetch_optional(self)
        .await?;
        Ok(page)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, first_name, last_name
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self)
        .await?;
        Ok(user)
    }
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
