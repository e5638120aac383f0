use actix_web::{web, HttpRequest, HttpResponse};
use tracing::instrument;

use crate::{errors::AppError, web::page::Page, AppState};

#[instrument(skip(req, state))]
pub async fn home(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (latest_blogs, featured_projects) = state.home_handler.landing().await?;

    Ok(Page::new("Home")
        .prop("latestBlogs", latest_blogs)
        .prop("featuredProjects", featured_projects)
        .render(&req))
}

pub async fn about(req: HttpRequest) -> HttpResponse {
    Page::new("About").render(&req)
}
