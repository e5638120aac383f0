use actix_web::web;

use crate::handlers::{blogs, contacts, home, projects};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(home::home)))
        .service(web::resource("/about").route(web::get().to(home::about)))
        .service(web::resource("/projects").route(web::get().to(projects::public_index)))
        .service(web::resource("/blog").route(web::get().to(blogs::public_index)))
        .service(web::resource("/blog/{slug}").route(web::get().to(blogs::public_show)))
        .service(
            web::resource("/contact")
                .route(web::get().to(contacts::create_form))
                .route(web::post().to(contacts::submit))
        );
}
