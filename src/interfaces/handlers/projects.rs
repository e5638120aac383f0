use actix_multipart::form::MultipartForm;
use actix_web::{web, HttpRequest, HttpResponse};
use tracing::instrument;

use crate::{
    entities::{
        pagination::PageQuery,
        project::{ProjectListQuery, ProjectUpload},
    },
    errors::AppError,
    web::{
        flash::{back_or, redirect_with, Flash},
        page::Page,
    },
    AppState,
};

const ADMIN_INDEX: &str = "/admin/projects";

#[instrument(skip(req, state))]
pub async fn public_index(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let projects = state.project_handler.list_public_projects(&query).await?;
    Ok(Page::new("Projects/Index").prop("projects", projects).render(&req))
}

#[instrument(skip(req, state))]
pub async fn admin_index(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<ProjectListQuery>,
) -> Result<HttpResponse, AppError> {
    let projects = state.project_handler.list_admin_projects(&query).await?;

    Ok(Page::new("Admin/Project/Index")
        .prop("projects", projects)
        .prop("filters", query.into_inner())
        .render(&req))
}

pub async fn create_form(req: HttpRequest) -> HttpResponse {
    Page::new("Admin/Project/Create").render(&req)
}

#[instrument(skip(req, state, form))]
pub async fn store(
    req: HttpRequest,
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<ProjectUpload>,
) -> Result<HttpResponse, AppError> {
    let parts = form.into_parts().await?;
    let old = parts.input.clone();

    match state.project_handler.create_project(parts).await {
        Ok(_) => Ok(redirect_with(ADMIN_INDEX, Flash::success("Project created successfully!"))),
        Err(e) if e.is_validation() => Ok(Page::new("Admin/Project/Create")
            .with_errors(&e, &old)
            .render(&req)),
        Err(e) => Err(e),
    }
}

#[instrument(skip(req, state))]
pub async fn admin_show(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let project = state.project_handler.get_project_by_id(&id).await?;
    Ok(Page::new("Admin/Project/Show").prop("project", project).render(&req))
}

#[instrument(skip(req, state))]
pub async fn edit_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let project = state.project_handler.get_project_by_id(&id).await?;
    Ok(Page::new("Admin/Project/Edit").prop("project", project).render(&req))
}

#[instrument(skip(req, state, form))]
pub async fn update(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<String>,
    MultipartForm(form): MultipartForm<ProjectUpload>,
) -> Result<HttpResponse, AppError> {
    let parts = form.into_parts().await?;
    let old = parts.input.clone();

    match state.project_handler.update_project(&id, parts).await {
        Ok(_) => Ok(redirect_with(ADMIN_INDEX, Flash::success("Project updated successfully!"))),
        Err(e) if e.is_validation() => {
            let project = state.project_handler.get_project_by_id(&id).await?;
            Ok(Page::new("Admin/Project/Edit")
                .prop("project", project)
                .with_errors(&e, &old)
                .render(&req))
        }
        Err(e) => Err(e),
    }
}

#[instrument(skip(req, state))]
pub async fn toggle_featured(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let project = state.project_handler.toggle_featured(&id).await?;
    let message = if project.is_featured {
        "Project marked as featured."
    } else {
        "Project removed from featured."
    };

    Ok(redirect_with(&back_or(&req, ADMIN_INDEX), Flash::success(message)))
}

#[instrument(skip(state))]
pub async fn destroy(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.project_handler.delete_project(&id).await?;
    Ok(redirect_with(ADMIN_INDEX, Flash::success("Project deleted successfully!")))
}
