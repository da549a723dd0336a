use actix_web::http::StatusCode;
use actix_web::{
    HttpResponse,
    ResponseError,
};
use custom_error::custom_error;

custom_error! {
///! Error inside route handler
pub RouteError
    RenderError{source: askama::Error} = "Error rendering page: {source}",
}

impl ResponseError for RouteError {
    fn status_code(&self) -> StatusCode {
        match self {
            RouteError::RenderError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            RouteError::RenderError { .. } => HttpResponse::InternalServerError().finish(),
        }
    }
}
