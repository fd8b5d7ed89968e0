use std::io;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// 引用的作者、slug 不存在，或分类/标签列表为空
    #[error("Not Found")]
    NotFound,

    #[error("{0}")]
    InvalidUpload(String),

    #[error("{0}")]
    InvalidConfig(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Template(#[from] tera::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
            Error::InvalidUpload(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            Error::Sqlx(e) => {
                tracing::error!(%e, "sqlx error");
                internal_error()
            }
            Error::Template(e) => {
                tracing::error!(?e, "template error");
                internal_error()
            }
            Error::Io(e) => {
                tracing::error!(%e, "file io error");
                internal_error()
            }
            e @ (Error::InvalidConfig(_) | Error::Toml(_)) => {
                tracing::error!(%e, "config error");
                internal_error()
            }
        }
    }
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let resp = Error::NotFound.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_upload_maps_to_400() {
        let resp = Error::InvalidUpload("bad".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_errors_are_hidden() {
        let resp = Error::InvalidConfig("per_page").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
