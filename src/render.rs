mod templates;

pub use self::templates::TemplateRenderer;
