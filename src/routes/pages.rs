//! Shared response plumbing for the page handlers.

use actix_web::http::header::{
    ACCEPT_LANGUAGE,
    LOCATION,
};
use actix_web::{
    HttpRequest,
    HttpResponse,
};
use askama::Template;

use crate::l10n::FALLBACK_LOCALE;
use crate::routes::RouteError;

pub fn render<T: Template>(page: &T) -> Result<HttpResponse, RouteError> {
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page.render()?))
}

pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location.to_string()))
        .finish()
}

/// First tag of the `Accept-Language` header, defaulting to the fallback
/// locale. Quality weights are ignored; only the first preference counts.
pub fn request_locale(request: &HttpRequest) -> String {
    request
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|tag| tag.split(';').next().unwrap_or(tag).trim().to_string())
        .filter(|tag| !tag.is_empty())
        .unwrap_or_else(|| FALLBACK_LOCALE.to_string())
}
