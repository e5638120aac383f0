use actix_web::{web, HttpRequest, HttpResponse};
use tracing::instrument;

use crate::{errors::AppError, use_cases::extractors::AuthClaims, web::page::Page, AppState};

#[instrument(skip(req, state))]
pub async fn admin_dashboard(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let data = state.dashboard_handler.overview().await?;

    Ok(Page::new("Admin/Dashboard")
        .prop("analytics", data.analytics)
        .prop("recentBlogs", data.recent_blogs)
        .prop("recentProjects", data.recent_projects)
        .prop("recentContacts", data.recent_contacts)
        .render(&req))
}

/// Landing page for signed-in users without admin rights.
#[instrument(skip(req, claims, state))]
pub async fn user_dashboard(
    req: HttpRequest,
    claims: AuthClaims,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = state.auth_handler.current_user(&claims.0.sub).await?;
    Ok(Page::new("Dashboard").prop("user", user).render(&req))
}
