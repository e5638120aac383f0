use actix_web::web;

use crate::{
    handlers::{auth, dashboard},
    middlewares::auth::AuthGuard,
};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/login")
            .wrap(AuthGuard::guest())
            .route(web::get().to(auth::login_form))
            .route(web::post().to(auth::login))
    )
    .service(
        web::resource("/register")
            .wrap(AuthGuard::guest())
            .route(web::get().to(auth::register_form))
            .route(web::post().to(auth::register))
    )
    .service(
        web::resource("/logout")
            .wrap(AuthGuard::user())
            .route(web::post().to(auth::logout))
    )
    .service(
        web::resource("/dashboard")
            .wrap(AuthGuard::user())
            .route(web::get().to(dashboard::user_dashboard))
    );
}
