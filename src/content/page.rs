use serde::Serialize;

/// 静态页面，没有作者、分类或标签
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Page {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub is_published: bool,
}
