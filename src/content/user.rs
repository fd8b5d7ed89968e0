use serde::{Deserialize, Serialize, ser::SerializeStruct};

/// 文章作者
///
/// 名字为空时以 `username` 展示，参见 [`User::display_name`]。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl User {
    pub fn new(id: i64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    /// 作者展示名
    ///
    /// - 设置了 `first_name`：`"first last"`
    /// - 否则：`username`
    pub fn display_name(&self) -> String {
        let first = self.first_name.trim();
        if first.is_empty() {
            return self.username.clone();
        }

        let last = self.last_name.trim();
        if last.is_empty() {
            first.to_string()
        } else {
            format!("{first} {last}")
        }
    }
}

// 模板需要直接使用展示名
impl Serialize for User {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut s = serializer.serialize_struct("User", 5)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("username", &self.username)?;
        s.serialize_field("first_name", &self.first_name)?;
        s.serialize_field("last_name", &self.last_name)?;
        s.serialize_field("display_name", &self.display_name())?;
        s.end()
    }
}
