use crate::{render::TemplateRenderer, storage::ContentStore, view::ViewResolver};

/// 应用程序上下文
///
/// [`AppState`] 封装了内容存储、模板渲染器和分页大小，提供统一访问入口。
/// 不保存任何请求级数据。
#[derive(Clone)]
pub struct AppState<S> {
    store: S,
    renderer: TemplateRenderer,
    per_page: u64,
}

impl<S: ContentStore> AppState<S> {
    /// 创建一个新的 [`AppState`] 实例
    pub fn new(store: S, renderer: TemplateRenderer, per_page: u64) -> Self {
        Self {
            store,
            renderer,
            per_page,
        }
    }

    /// 获取模板渲染器
    pub fn renderer(&self) -> &TemplateRenderer {
        &self.renderer
    }

    /// 为当前请求创建 [`ViewResolver`]
    pub fn resolver(&self) -> ViewResolver<'_, S> {
        ViewResolver::new(&self.store, self.per_page)
    }
}
