use sqlx::{Postgres, QueryBuilder};

use crate::content::Post;

/// 已发布文章的筛选条件
///
/// 同一个条件既可以拼接为 SQL（[`PostFilter::push_where`]），
/// 也可以直接在内存中匹配（[`PostFilter::matches`]），两者语义一致：
/// 始终只包含已发布文章。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Author(i64),
    Category(String),
    Tag(String),
    /// 标题、摘要或正文包含该文本（不区分大小写）
    Search(String),
    Slug(String),
}

impl PostFilter {
    /// 追加 `WHERE` 子句
    ///
    /// 依赖查询中的别名：`p` 为 posts，`c` 为 categories。
    pub(crate) fn push_where(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        builder.push(" WHERE p.is_published = TRUE");

        match self {
            PostFilter::All => {}
            PostFilter::Author(id) => {
                builder.push(" AND p.created_by = ").push_bind(*id);
            }
            PostFilter::Category(slug) => {
                builder.push(" AND c.slug = ").push_bind(slug.clone());
            }
            PostFilter::Tag(slug) => {
                builder
                    .push(
                        " AND EXISTS (SELECT 1 FROM post_tags pt \
                         INNER JOIN tags t ON t.id = pt.tag_id \
                         WHERE pt.post_id = p.id AND t.slug = ",
                    )
                    .push_bind(slug.clone())
                    .push(")");
            }
            PostFilter::Search(text) => {
                let pattern = like_pattern(text);
                builder
                    .push(" AND (p.title ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR p.excerpt ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR p.content ILIKE ")
                    .push_bind(pattern)
                    .push(")");
            }
            PostFilter::Slug(slug) => {
                builder.push(" AND p.slug = ").push_bind(slug.clone());
            }
        }
    }

    /// 在内存中判断文章是否满足条件
    pub fn matches(&self, post: &Post) -> bool {
        if !post.is_published {
            return false;
        }

        match self {
            PostFilter::All => true,
            PostFilter::Author(id) => post.author.id == *id,
            PostFilter::Category(slug) => post.category.as_ref().is_some_and(|c| &c.slug == slug),
            PostFilter::Tag(slug) => post.tags.iter().any(|t| &t.slug == slug),
            PostFilter::Search(text) => {
                let needle = text.to_lowercase();
                [&post.title, &post.excerpt, &post.content]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
            PostFilter::Slug(slug) => &post.slug == slug,
        }
    }
}

/// 子串匹配模式，转义 `LIKE` 的通配符
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
