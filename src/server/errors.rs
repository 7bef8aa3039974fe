//! Errors surfaced to documentation visitors.
use actix_web::{
    http::{header::ContentType, StatusCode},
    HttpResponse, ResponseError,
};
use derive_more::Display;

use super::pages;

/// HTTP errors rendered with the site's error pages.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum HTTPError {
    /// 404
    #[display(fmt = "Not Found")]
    NotFound,
    /// 500
    #[display(fmt = "Internal Server Error")]
    InternalServerError,
}

impl ResponseError for HTTPError {
    fn status_code(&self) -> StatusCode {
        match *self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let page = match *self {
            Self::NotFound => pages::NOT_FOUND,
            Self::InternalServerError => pages::SERVER_ERROR,
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::html())
            .body(page)
    }
}

/// Catch-all for unmatched routes.
pub async fn not_found() -> Result<HttpResponse, HTTPError> {
    Err(HTTPError::NotFound)
}
