use std::{
    env,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    pagination::DEFAULT_PER_PAGE,
    upload,
};

/// 应用配置
///
/// 从 `BLOG_CONFIG` 指向的 TOML 文件读取，未设置时全部使用默认值。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 监听地址，可由 `BLOG_LISTEN` 覆盖
    pub listen: String,
    /// 列表每页文章数
    pub per_page: u64,
    /// 自定义模板目录，覆盖内置模板
    pub template_dir: Option<PathBuf>,
    /// 静态文件目录，挂载在 `/static`
    pub static_dir: Option<PathBuf>,
    pub site: SiteSetup,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:3000".to_string(),
            per_page: DEFAULT_PER_PAGE,
            template_dir: None,
            static_dir: None,
            site: SiteSetup::default(),
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        let mut config = match env::var_os("BLOG_CONFIG") {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Ok(listen) = env::var("BLOG_LISTEN") {
            config.listen = listen;
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.per_page == 0 {
            return Err(Error::InvalidConfig("`per_page` must be at least 1"));
        }
        if let Some(favicon) = &self.site.favicon {
            upload::validate_png(favicon)?;
        }
        Ok(())
    }
}

/// 站点设置，注入到每个页面的 `site_setup`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteSetup {
    pub title: String,
    pub description: String,

    pub show_header: bool,
    pub show_search: bool,
    pub show_menu: bool,
    pub show_description: bool,
    pub show_pagination: bool,
    pub show_footer: bool,

    /// 网站图标路径，必须是 `.png`
    pub favicon: Option<String>,
    pub menu: Vec<MenuLink>,
}

impl Default for SiteSetup {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            description: String::new(),
            show_header: true,
            show_search: true,
            show_menu: true,
            show_description: true,
            show_pagination: true,
            show_footer: true,
            favicon: None,
            menu: Vec::new(),
        }
    }
}

/// 导航菜单链接
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MenuLink {
    pub text: String,
    pub url: String,
    #[serde(default)]
    pub new_tab: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = Config::from_toml("").expect("解析失败");
        assert_eq!(config.listen, "0.0.0.0:3000");
        assert_eq!(config.per_page, 9);
        assert!(config.template_dir.is_none());
        assert_eq!(config.site.title, "Blog");
        assert!(config.site.show_pagination);
    }

    #[test]
    fn test_full_toml() {
        let toml_content = r#"
            listen = "127.0.0.1:8080"
            per_page = 5
            static_dir = "static"

            [site]
            title = "Meu Blog"
            description = "Notas"
            show_footer = false
            favicon = "assets/favicon/icon.PNG"

            [[site.menu]]
            text = "About"
            url = "/page/about"

            [[site.menu]]
            text = "GitHub"
            url = "https://github.com"
            new_tab = true
        "#;

        let config = Config::from_toml(toml_content).expect("解析失败");
        assert_eq!(config.listen, "127.0.0.1:8080");
        assert_eq!(config.per_page, 5);
        assert_eq!(config.static_dir.as_deref(), Some(Path::new("static")));
        assert_eq!(config.site.title, "Meu Blog");
        assert!(!config.site.show_footer);
        assert!(config.site.show_header);
        assert_eq!(config.site.menu.len(), 2);
        assert!(!config.site.menu[0].new_tab);
        assert!(config.site.menu[1].new_tab);
    }

    #[test]
    fn test_non_png_favicon_rejected() {
        let result = Config::from_toml(
            r#"
            [site]
            favicon = "favicon.ico"
            "#,
        );
        assert!(matches!(result, Err(Error::InvalidUpload(_))));
    }

    #[test]
    fn test_zero_per_page_rejected() {
        assert!(matches!(
            Config::from_toml("per_page = 0"),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            Config::from_toml("per_page = \"nine\""),
            Err(Error::Toml(_))
        ));
    }
}
