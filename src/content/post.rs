use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Category, Tag, User};

/// 文章
///
/// 只有 `is_published` 为真的文章对读者可见。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub author: User,
    pub category: Option<Category>,
    /// 按标签 id 升序
    pub tags: Vec<Tag>,
}

impl Post {
    /// 代表标签：id 最小的标签
    ///
    /// 标签列表为空时返回 `None`。
    pub fn representative_tag(&self) -> Option<&Tag> {
        self.tags.iter().min_by_key(|t| t.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_with_tags(tags: Vec<Tag>) -> Post {
        Post {
            id: 1,
            title: "Hello".into(),
            slug: "hello".into(),
            excerpt: String::new(),
            content: String::new(),
            is_published: true,
            created_at: Utc::now(),
            author: User::new(1, "ana"),
            category: None,
            tags,
        }
    }

    #[test]
    fn test_representative_tag_is_lowest_id() {
        let post = post_with_tags(vec![
            Tag::new(9, "Rust", "rust"),
            Tag::new(2, "Web", "web"),
            Tag::new(5, "Axum", "axum"),
        ]);
        assert_eq!(post.representative_tag().map(|t| t.slug.as_str()), Some("web"));
    }

    #[test]
    fn test_representative_tag_empty() {
        assert!(post_with_tags(vec![]).representative_tag().is_none());
    }
}
