use actix_web::{
    cookie::{Cookie, SameSite},
    http::header,
    HttpRequest, HttpResponse,
};
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "flash";

/// One-shot notice carried from a write's redirect to the next rendered page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    pub success: Option<String>,
    pub error: Option<String>,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Flash { success: Some(message.into()), error: None }
    }

    fn to_cookie(&self) -> Cookie<'static> {
        let json = serde_json::to_string(self).unwrap_or_default();
        Cookie::build(FLASH_COOKIE, urlencoding::encode(&json).into_owned())
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .finish()
    }
}

pub fn read_flash(req: &HttpRequest) -> Option<Flash> {
    let cookie = req.cookie(FLASH_COOKIE)?;
    let decoded = urlencoding::decode(cookie.value()).ok()?;
    serde_json::from_str(&decoded).ok()
}

/// Expires the flash cookie once a page has shown it.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(FLASH_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

/// `303 See Other`, so browsers follow a PUT/PATCH/DELETE with a GET.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn redirect_with(location: &str, flash: Flash) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .cookie(flash.to_cookie())
        .finish()
}

/// Path of the Referer when present, `fallback` otherwise. Only the path and
/// query are kept so a forged Referer cannot redirect off-site.
pub fn back_or(req: &HttpRequest, fallback: &str) -> String {
    req.headers()
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|referer| url::Url::parse(referer).ok())
        .map(|url| match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        })
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test::TestRequest};

    #[test]
    fn redirect_with_sets_location_and_cookie() {
        let res = redirect_with("/admin/blogs", Flash::success("Blog post created successfully!"));
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/admin/blogs");

        let cookie = res.cookies().find(|c| c.name() == FLASH_COOKIE).unwrap();
        let req = TestRequest::default().cookie(cookie.into_owned()).to_http_request();
        assert_eq!(read_flash(&req), Some(Flash::success("Blog post created successfully!")));
    }

    #[test]
    fn tampered_cookie_is_ignored() {
        let req = TestRequest::default()
            .cookie(Cookie::new(FLASH_COOKIE, "%7Bnot-json"))
            .to_http_request();
        assert_eq!(read_flash(&req), None);
    }

    #[test]
    fn back_keeps_only_path_and_query() {
        let req = TestRequest::default()
            .insert_header((header::REFERER, "https://evil.example/admin/contacts?page=2"))
            .to_http_request();
        assert_eq!(back_or(&req, "/admin/contacts"), "/admin/contacts?page=2");

        let req = TestRequest::default().to_http_request();
        assert_eq!(back_or(&req, "/admin/contacts"), "/admin/contacts");
    }
}
