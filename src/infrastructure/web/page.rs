//! Server-side half of the page hand-off: a handler names a client component
//! and its props, and the response is either the JSON page object (for the
//! client router, flagged by `X-Inertia`) or an HTML shell embedding it.

use actix_web::{
    body::{BoxBody, MessageBody},
    dev::ServiceResponse,
    http::{header, StatusCode},
    middleware::ErrorHandlerResponse,
    web, HttpMessage, HttpRequest, HttpResponse, Responder,
};
use askama::Template;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::{
    entities::{token::Claims, user::SessionUser},
    errors::AppError,
    settings::AppConfig,
    web::flash::{read_flash, removal_cookie},
};

pub const INERTIA_HEADER: &str = "x-inertia";
pub const INERTIA_VERSION_HEADER: &str = "x-inertia-version";
pub const INERTIA_LOCATION_HEADER: &str = "x-inertia-location";

/// Site-wide values every page needs.
#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub name: String,
    pub asset_version: String,
    pub storage_url_prefix: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        SiteSettings {
            name: "Portfolio".to_string(),
            asset_version: "1".to_string(),
            storage_url_prefix: "/storage".to_string(),
        }
    }
}

impl From<&AppConfig> for SiteSettings {
    fn from(config: &AppConfig) -> Self {
        SiteSettings {
            name: config.name.clone(),
            asset_version: config.asset_version.clone(),
            storage_url_prefix: config.storage_url_prefix.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageObject {
    pub component: String,
    pub props: Map<String, Value>,
    pub url: String,
    pub version: String,
}

#[derive(Template)]
#[template(path = "app.html")]
struct AppShell<'a> {
    title: &'a str,
    version: &'a str,
    page: &'a str,
}

#[derive(Debug)]
pub struct Page {
    component: String,
    props: Map<String, Value>,
    status: StatusCode,
}

impl Page {
    pub fn new(component: impl Into<String>) -> Self {
        Page {
            component: component.into(),
            props: Map::new(),
            status: StatusCode::OK,
        }
    }

    pub fn prop(mut self, key: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or_else(|e| {
            tracing::error!(component = %self.component, key, "Failed to serialize page prop: {}", e);
            Value::Null
        });
        self.props.insert(key.to_string(), value);
        self
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Re-render of a form after a failed validation: 422 with the field
    /// messages and the submitted input.
    pub fn with_errors(self, err: &AppError, old: impl Serialize) -> Self {
        self.status(StatusCode::UNPROCESSABLE_ENTITY)
            .prop("errors", err.field_messages())
            .prop("old", old)
    }

    pub fn error(status: StatusCode) -> Self {
        Page::new("Error")
            .prop("status", status.as_u16())
            .status(status)
    }

    pub fn to_object(&self, req: &HttpRequest, site: &SiteSettings) -> PageObject {
        let user = req.extensions().get::<Claims>().map(SessionUser::from);
        let flash = read_flash(req).unwrap_or_default();

        let mut props = Map::new();
        props.insert("appName".into(), json!(site.name));
        props.insert("auth".into(), json!({ "user": user }));
        props.insert("flash".into(), json!(flash));
        props.insert("storageUrl".into(), json!(site.storage_url_prefix));
        for (key, value) in &self.props {
            props.insert(key.clone(), value.clone());
        }

        PageObject {
            component: self.component.clone(),
            props,
            url: request_url(req),
            version: site.asset_version.clone(),
        }
    }

    pub fn render(self, req: &HttpRequest) -> HttpResponse {
        let site = req
            .app_data::<web::Data<SiteSettings>>()
            .map(|data| data.get_ref().clone())
            .unwrap_or_default();

        if is_inertia(req) && req.method() == actix_web::http::Method::GET {
            if let Some(client_version) = header_str(req, INERTIA_VERSION_HEADER) {
                if client_version != site.asset_version {
                    return HttpResponse::Conflict()
                        .insert_header((INERTIA_LOCATION_HEADER, request_url(req)))
                        .finish();
                }
            }
        }

        let object = self.to_object(req, &site);
        let mut builder = HttpResponse::build(self.status);
        builder.insert_header((header::VARY, "X-Inertia"));
        if req.cookie(crate::web::flash::FLASH_COOKIE).is_some() {
            builder.cookie(removal_cookie());
        }

        if is_inertia(req) {
            return builder.insert_header(("X-Inertia", "true")).json(object);
        }

        let page_json = match serde_json::to_string(&object) {
            Ok(page_json) => page_json,
            Err(e) => {
                tracing::error!("Failed to encode page object: {}", e);
                return HttpResponse::InternalServerError().finish();
            }
        };

        let shell = AppShell {
            title: &site.name,
            version: &site.asset_version,
            page: &page_json,
        };

        match shell.render() {
            Ok(html) => builder.content_type("text/html; charset=utf-8").body(html),
            Err(e) => {
                tracing::error!("Failed to render app shell: {}", e);
                HttpResponse::InternalServerError().finish()
            }
        }
    }
}

impl Responder for Page {
    type Body = BoxBody;

    fn respond_to(self, req: &HttpRequest) -> HttpResponse<Self::Body> {
        self.render(req)
    }
}

pub fn is_inertia(req: &HttpRequest) -> bool {
    header_str(req, INERTIA_HEADER).is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

fn header_str<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|value| value.to_str().ok())
}

fn request_url(req: &HttpRequest) -> String {
    req.uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.path().to_string())
}

fn wants_plain_json(req: &HttpRequest) -> bool {
    !is_inertia(req)
        && header_str(req, header::ACCEPT.as_str()).is_some_and(|accept| accept.contains("application/json"))
}

/// Replaces error responses with the `Error` page for browser and page-object
/// requests. Plain JSON clients keep the JSON error body.
pub fn render_error_page<B: MessageBody + 'static>(
    res: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    if wants_plain_json(res.request()) {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let status = res.status();
    let (req, _) = res.into_parts();
    let response = Page::error(status).render(&req);

    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, response).map_into_right_body(),
    ))
}
