use chrono::{DateTime, Utc};
use sqlx::types::Json;

use crate::content::{Category, Post, Tag, User};

/// 文章查询结果行
///
/// 作者、分类和标签以 JSON 聚合返回。
#[derive(Debug, sqlx::FromRow)]
pub struct PostRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,

    pub author: Json<User>,
    /// 未设置分类时为 NULL
    pub category: Option<Json<Category>>,
    /// 按标签 id 升序
    pub tags: Json<Vec<Tag>>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            title: row.title,
            slug: row.slug,
            excerpt: row.excerpt,
            content: row.content,
            is_published: row.is_published,
            created_at: row.created_at,
            author: row.author.0,
            category: row.category.map(|c| c.0),
            tags: row.tags.0,
        }
    }
}
