use actix_web::web;

use crate::{
    handlers::{blogs, contacts, dashboard, projects},
    middlewares::auth::AuthGuard,
};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(AuthGuard::admin())
            .service(web::resource("").route(web::get().to(dashboard::admin_dashboard)))
            .configure(blog_routes)
            .configure(project_routes)
            .configure(contact_routes)
    );
}

fn blog_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/blogs")
            .route(web::get().to(blogs::admin_index))
            .route(web::post().to(blogs::store))
    )
    .service(web::resource("/blogs/create").route(web::get().to(blogs::create_form)))
    .service(
        web::resource("/blogs/{id}")
            .route(web::get().to(blogs::admin_show))
            .route(web::put().to(blogs::update))
            .route(web::post().to(blogs::update))
            .route(web::delete().to(blogs::destroy))
    )
    .service(web::resource("/blogs/{id}/edit").route(web::get().to(blogs::edit_form)))
    .service(
        web::resource("/blogs/{id}/toggle-publish")
            .route(web::patch().to(blogs::toggle_publish))
    );
}

fn project_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/projects")
            .route(web::get().to(projects::admin_index))
            .route(web::post().to(projects::store))
    )
    .service(web::resource("/projects/create").route(web::get().to(projects::create_form)))
    .service(
        web::resource("/projects/{id}")
            .route(web::get().to(projects::admin_show))
            .route(web::put().to(projects::update))
            .route(web::post().to(projects::update))
            .route(web::delete().to(projects::destroy))
    )
    .service(web::resource("/projects/{id}/edit").route(web::get().to(projects::edit_form)))
    .service(
        web::resource("/projects/{id}/toggle-featured")
            .route(web::patch().to(projects::toggle_featured))
    );
}

fn contact_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/contacts").route(web::get().to(contacts::admin_index)))
        .service(
            web::resource("/contacts/{id}")
                .route(web::get().to(contacts::admin_show))
                .route(web::delete().to(contacts::destroy))
        )
        .service(
            web::resource("/contacts/{id}/mark-read")
                .route(web::patch().to(contacts::mark_read))
        );
}
