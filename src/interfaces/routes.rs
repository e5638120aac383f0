use actix_web::{
    body::MessageBody,
    http::StatusCode,
    middleware::ErrorHandlers,
    web,
};

use crate::web::page::render_error_page;

mod admin;
mod auth;
mod json_error;
mod public;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(json_error::config_routes);

    cfg.configure(public::config_routes);
    cfg.configure(auth::config_routes);
    cfg.configure(admin::config_routes);
}

/// Error statuses that render the `Error` page instead of a bare body.
pub fn error_pages<B: MessageBody + 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new()
        .handler(StatusCode::BAD_REQUEST, render_error_page)
        .handler(StatusCode::FORBIDDEN, render_error_page)
        .handler(StatusCode::NOT_FOUND, render_error_page)
        .handler(StatusCode::INTERNAL_SERVER_ERROR, render_error_page)
}
