use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage, ResponseError,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{
    entities::token::{Claims, SESSION_COOKIE},
    errors::AppError,
    web::flash::redirect,
    AppState,
};

/// Resolves the session token (cookie first, then `Authorization: Bearer`)
/// and attaches its claims to the request. Never rejects: requests without a
/// valid token simply carry no claims.
pub struct SessionMiddleware;

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SessionMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct SessionMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if let Some(claims) = session_claims(&req) {
                req.extensions_mut().insert(claims);
            }
            service.call(req).await
        })
    }
}

fn extract_token(req: &ServiceRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let parts: Vec<&str> = header.split_whitespace().collect();
            if parts.len() == 2 && parts[0].eq_ignore_ascii_case("bearer") {
                Some(parts[1].to_string())
            } else {
                None
            }
        })
}

fn session_claims(req: &ServiceRequest) -> Option<Claims> {
    let token = extract_token(req)?;

    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        tracing::error!("AppState missing in session middleware");
        return None;
    };

    match state.auth_handler.token_service.decode_jwt(&token) {
        Ok(decoded) => Some(decoded.claims),
        Err(e) => {
            tracing::debug!("Ignoring session token: {}", e);
            None
        }
    }
}

/// Who may pass a guarded route group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Signed-out visitors only; signed-in users are sent to their home.
    Guest,
    User,
    Admin,
}

/// Route-group authorization. Runs after `SessionMiddleware`.
pub struct AuthGuard {
    access: Access,
}

impl AuthGuard {
    pub fn guest() -> Self {
        AuthGuard { access: Access::Guest }
    }

    pub fn user() -> Self {
        AuthGuard { access: Access::User }
    }

    pub fn admin() -> Self {
        AuthGuard { access: Access::Admin }
    }
}

impl<S> Transform<S, ServiceRequest> for AuthGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGuardService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthGuardService {
            service: Rc::new(service),
            access: self.access,
        })
    }
}

pub struct AuthGuardService<S> {
    service: Rc<S>,
    access: Access,
}

impl<S> Service<ServiceRequest> for AuthGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let access = self.access;

        Box::pin(async move {
            let claims = req.extensions().get::<Claims>().cloned();

            match (access, claims) {
                (Access::Guest, Some(claims)) => {
                    let home = if claims.admin { "/admin" } else { "/dashboard" };
                    Ok(req.into_response(redirect(home)))
                }
                (Access::Guest, None) => service.call(req).await,
                (_, None) => {
                    tracing::warn!(path = %req.path(), "Guest sent to login");
                    Ok(req.into_response(redirect("/login")))
                }
                (Access::Admin, Some(claims)) if !claims.admin => {
                    tracing::warn!(path = %req.path(), user_id = %claims.sub, "Admin access required");
                    Ok(req.into_response(AppError::ForbiddenAccess.error_response()))
                }
                (_, Some(_)) => service.call(req).await,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App, HttpResponse};

    fn claims(admin: bool) -> Claims {
        Claims {
            sub: "7".into(),
            email: "someone@example.com".into(),
            name: "Someone".into(),
            admin,
            exp: usize::MAX,
            iat: 0,
        }
    }

    async fn call_guarded(guard: AuthGuard, claims: Option<Claims>) -> ServiceResponse<BoxBody> {
        let app = test::init_service(
            App::new()
                .wrap_fn(move |req, srv| {
                    if let Some(claims) = claims.clone() {
                        req.extensions_mut().insert(claims);
                    }
                    srv.call(req)
                })
                .service(
                    web::scope("/area")
                        .wrap(guard)
                        .route("", web::get().to(|| async { HttpResponse::Ok().body("inside") })),
                ),
        )
        .await;

        let req = test::TestRequest::get().uri("/area").to_request();
        test::call_service(&app, req).await
    }

    #[actix_rt::test]
    async fn guest_is_redirected_to_login() {
        let res = call_guarded(AuthGuard::admin(), None).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/login");
    }

    #[actix_rt::test]
    async fn non_admin_is_forbidden() {
        let res = call_guarded(AuthGuard::admin(), Some(claims(false))).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_rt::test]
    async fn admin_passes() {
        let res = call_guarded(AuthGuard::admin(), Some(claims(true))).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_rt::test]
    async fn signed_in_user_skips_guest_pages() {
        let res = call_guarded(AuthGuard::guest(), Some(claims(false))).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/dashboard");

        let res = call_guarded(AuthGuard::guest(), None).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
