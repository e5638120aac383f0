use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    web::{self, Either},
    HttpRequest, HttpResponse,
};
use tracing::instrument;

use crate::{
    entities::{
        token::{AuthResponse, SESSION_COOKIE},
        user::{LoginForm, RegisterForm},
    },
    errors::AppError,
    repositories::token::TokenServiceRepository,
    web::{
        flash::{redirect, redirect_with, Flash},
        page::Page,
    },
    AppState,
};

pub async fn login_form(req: HttpRequest) -> HttpResponse {
    Page::new("Auth/Login").render(&req)
}

#[instrument(skip(req, state, body))]
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: Either<web::Json<LoginForm>, web::Form<LoginForm>>,
) -> Result<HttpResponse, AppError> {
    let form = body.into_inner();

    match state.auth_handler.login(&form).await {
        Ok(auth) => Ok(signed_in(&state, &auth)),
        Err(e) if e.is_validation() => Ok(Page::new("Auth/Login")
            .with_errors(&e, &form)
            .render(&req)),
        Err(e) => Err(e),
    }
}

pub async fn register_form(req: HttpRequest) -> HttpResponse {
    Page::new("Auth/Register").render(&req)
}

#[instrument(skip(req, state, body))]
pub async fn register(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: Either<web::Json<RegisterForm>, web::Form<RegisterForm>>,
) -> Result<HttpResponse, AppError> {
    let form = body.into_inner();

    match state.auth_handler.register(&form).await {
        Ok(auth) => Ok(signed_in(&state, &auth)),
        Err(e) if e.is_validation() => Ok(Page::new("Auth/Register")
            .with_errors(&e, &form)
            .render(&req)),
        Err(e) => Err(e),
    }
}

#[instrument(skip(state))]
pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    let mut cookie = session_cookie(&state, String::new());
    cookie.make_removal();

    let mut response = redirect("/");
    if let Err(e) = response.add_cookie(&cookie) {
        tracing::warn!("Failed to clear session cookie: {}", e);
    }
    response
}

fn signed_in(state: &AppState, auth: &AuthResponse) -> HttpResponse {
    let mut cookie = session_cookie(state, auth.access_token.clone());
    cookie.set_max_age(CookieDuration::minutes(
        state.auth_handler.token_service.expiration_minutes(),
    ));

    let mut response = redirect_with(auth.home_path(), Flash::success("Signed in successfully."));
    if let Err(e) = response.add_cookie(&cookie) {
        tracing::warn!("Failed to set session cookie: {}", e);
    }
    response
}

fn session_cookie(state: &AppState, value: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, value)
        .path("/")
        .http_only(true)
        .secure(state.secure_cookies)
        .same_site(SameSite::Lax)
        .finish()
}
