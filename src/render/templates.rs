use std::{collections::HashMap, path::Path, sync::Arc};

use chrono::DateTime;
use tera::Tera;

use crate::{
    config::{Config, SiteSetup},
    error::Result,
    view::View,
};

/// 内置模板，名称与 [`Template::name`] 一致
const BUILTIN_TEMPLATES: [(&str, &str); 5] = [
    ("base.html", include_str!("../../templates/base.html")),
    (
        "partials/post_list.html",
        include_str!("../../templates/partials/post_list.html"),
    ),
    (
        "blog/pages/index.html",
        include_str!("../../templates/blog/pages/index.html"),
    ),
    (
        "blog/pages/post.html",
        include_str!("../../templates/blog/pages/post.html"),
    ),
    (
        "blog/pages/page.html",
        include_str!("../../templates/blog/pages/page.html"),
    ),
];

/// 基于 Tera 的模板渲染器
///
/// 每次渲染都会注入 `site_setup`，参见 [`SiteSetup`]。
#[derive(Clone)]
pub struct TemplateRenderer {
    tera: Arc<Tera>,
    site: Arc<SiteSetup>,
}

impl TemplateRenderer {
    /// 使用内置模板
    pub fn builtin(site: SiteSetup) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(BUILTIN_TEMPLATES)?;
        Ok(Self::with_tera(tera, site))
    }

    /// 加载目录下所有 `*.html` 模板
    pub fn from_dir(dir: &Path, site: SiteSetup) -> Result<Self> {
        let tera = Tera::new(&format!("{}/**/*.html", dir.display()))?;
        tracing::info!(dir = %dir.display(), "loaded templates");
        Ok(Self::with_tera(tera, site))
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.template_dir {
            Some(dir) => Self::from_dir(dir, config.site.clone()),
            None => Self::builtin(config.site.clone()),
        }
    }

    fn with_tera(mut tera: Tera, site: SiteSetup) -> Self {
        tera.register_filter("date_format", date_format_filter);
        Self {
            tera: Arc::new(tera),
            site: Arc::new(site),
        }
    }

    /// 渲染模板
    pub fn render(&self, template: &str, context: &tera::Context) -> Result<String> {
        let mut context = context.clone();
        context.insert("site_setup", self.site.as_ref());
        Ok(self.tera.render(template, &context)?)
    }

    /// 渲染 [`View`]
    pub fn render_view(&self, view: &View) -> Result<String> {
        self.render(view.template.name(), &view.context()?)
    }
}

/// 将 RFC 3339 时间格式化，默认 `%d/%m/%Y`
///
/// 无法解析时原样返回。
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let Some(date) = value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    else {
        return Ok(value.clone());
    };

    let format = args
        .get("format")
        .and_then(|f| f.as_str())
        .unwrap_or("%d/%m/%Y");
    Ok(tera::Value::String(date.format(format).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::MenuLink,
        content::{Category, Page, Tag, User},
        pagination::Paginated,
        storage::fixtures::{post, sample_store},
        view::{Breadcrumb, Intent, Resolution, Template, ViewBody, ViewResolver},
    };

    fn renderer() -> TemplateRenderer {
        TemplateRenderer::builtin(SiteSetup {
            title: "Test Blog".into(),
            ..SiteSetup::default()
        })
        .expect("加载内置模板失败")
    }

    async fn resolve(intent: Intent, page: Option<&str>) -> View {
        let store = sample_store();
        match ViewResolver::new(&store, 9).resolve(intent, page).await {
            Ok(Resolution::Render(view)) => view,
            other => panic!("unexpected resolution: {other:?}"),
        }
    }

    #[test]
    fn test_date_format_filter() {
        let value = tera::Value::String("2024-06-01T10:00:00Z".into());
        let out = date_format_filter(&value, &HashMap::new()).unwrap();
        assert_eq!(out, tera::Value::String("01/06/2024".into()));

        let raw = tera::Value::String("yesterday".into());
        assert_eq!(date_format_filter(&raw, &HashMap::new()).unwrap(), raw);
    }

    #[tokio::test]
    async fn test_render_index() {
        let view = resolve(Intent::ListAll, Some("2")).await;
        let html = renderer().render_view(&view).expect("渲染失败");

        assert!(html.contains("<title>Home | Test Blog</title>"));
        assert!(html.contains("Post 12"));
        assert!(html.contains("Page 2 of 3"));
        assert!(html.contains("href=\"?page=3\""));
        assert!(html.contains("href=\"?page=1\""));
    }

    #[tokio::test]
    async fn test_render_search_keeps_query() {
        let view = resolve(Intent::Search(Some("hello".into())), None).await;
        let html = renderer().render_view(&view).expect("渲染失败");
        assert!(html.contains("value=\"hello\""));
        assert!(html.contains("Hello World"));
        assert!(!html.contains("Page 1 of 1"));
    }

    #[test]
    fn test_render_post_escapes_title_but_not_content() {
        let mut p = post(1, "<b>Bold</b>", User::new(1, "ana").with_name("Ana", "Silva"));
        p.content = "<p>Rich</p>".into();
        p.category = Some(Category::new(1, "Rust", "rust"));
        p.tags = vec![Tag::new(1, "Web", "web")];

        let view = View {
            template: Template::Post,
            breadcrumb: Breadcrumb::post(&p.title),
            body: ViewBody::Post(p),
        };
        let html = renderer().render_view(&view).expect("渲染失败");

        assert!(html.contains("&lt;b&gt;Bold&lt;&#x2F;b&gt;"));
        assert!(html.contains("<p>Rich</p>"));
        assert!(html.contains("Ana Silva"));
        assert!(html.contains("href=\"/created_by/1\""));
        assert!(html.contains("href=\"/category/rust\""));
        assert!(html.contains("href=\"/tag/web\""));
    }

    #[test]
    fn test_render_page() {
        let view = View {
            template: Template::Page,
            breadcrumb: Breadcrumb::page("About"),
            body: ViewBody::Page(Page {
                id: 1,
                title: "About".into(),
                slug: "about".into(),
                content: "<p>About me</p>".into(),
                is_published: true,
            }),
        };
        let html = renderer().render_view(&view).expect("渲染失败");
        assert!(html.contains("<p>About me</p>"));
        assert!(html.contains("Home &gt; Page &gt; About"));
    }

    #[test]
    fn test_render_empty_listing() {
        let view = View {
            template: Template::Index,
            breadcrumb: Breadcrumb::home(),
            body: ViewBody::Listing {
                page_obj: Paginated::single(Vec::new()),
                search_value: None,
            },
        };
        let html = renderer().render_view(&view).expect("渲染失败");
        assert!(html.contains("No posts found"));
    }

    #[test]
    fn test_site_setup_menu_rendered() {
        let renderer = TemplateRenderer::builtin(SiteSetup {
            menu: vec![MenuLink {
                text: "About".into(),
                url: "/page/about".into(),
                new_tab: true,
            }],
            favicon: Some("/static/favicon.png".into()),
            ..SiteSetup::default()
        })
        .unwrap();
        let html = renderer
            .render("base.html", &tera::Context::new())
            .expect("渲染失败");
        assert!(html.contains("href=\"&#x2F;page&#x2F;about\" target=\"_blank\""));
        assert!(html.contains("rel=\"icon\""));
    }
}
