use actix_multipart::form::MultipartFormConfig;
use actix_web::{
    web,
    error::{JsonPayloadError, QueryPayloadError, UrlencodedError},
};

use crate::errors::AppError;

/// Upper bound for a whole upload request; each image field is capped
/// separately on the form struct.
const MULTIPART_TOTAL_LIMIT: usize = 10 * 1024 * 1024;
const MULTIPART_MEMORY_LIMIT: usize = 1024 * 1024;

/// Malformed bodies and query strings become `AppError::InvalidInput` so
/// they share the error page and JSON shape of every other failure.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        payload_error(PayloadKind::Json(err)).into()
    }))
    .app_data(web::FormConfig::default().error_handler(|err, _req| {
        payload_error(PayloadKind::Form(err)).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        payload_error(PayloadKind::Query(err)).into()
    }))
    .app_data(
        MultipartFormConfig::default()
            .total_limit(MULTIPART_TOTAL_LIMIT)
            .memory_limit(MULTIPART_MEMORY_LIMIT)
            .error_handler(|err, _req| AppError::from(err).into()),
    );
}

enum PayloadKind {
    Json(JsonPayloadError),
    Form(UrlencodedError),
    Query(QueryPayloadError),
}

fn payload_error(kind: PayloadKind) -> AppError {
    let message = match kind {
        PayloadKind::Json(err) => format!("JSON payload error: {}", err),
        PayloadKind::Form(err) => format!("Form payload error: {}", err),
        PayloadKind::Query(err) => format!("Query string error: {}", err),
    };
    tracing::debug!("{}", message);
    AppError::InvalidInput(message)
}
