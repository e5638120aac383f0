use actix_web::{
    web::{self, Either},
    HttpRequest, HttpResponse,
};
use tracing::instrument;

use crate::{
    entities::{contact::ContactForm, pagination::PageQuery},
    errors::AppError,
    web::{
        flash::{back_or, redirect_with, Flash},
        page::Page,
    },
    AppState,
};

const ADMIN_INDEX: &str = "/admin/contacts";

pub async fn create_form(req: HttpRequest) -> HttpResponse {
    Page::new("Contact/Create").render(&req)
}

/// Accepts the form as JSON (client router) or urlencoded (plain form post).
#[instrument(skip(req, state, body))]
pub async fn submit(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: Either<web::Json<ContactForm>, web::Form<ContactForm>>,
) -> Result<HttpResponse, AppError> {
    let form = body.into_inner();

    match state.contact_handler.submit_contact(form.clone()).await {
        Ok(_) => Ok(redirect_with(
            "/contact",
            Flash::success("Thank you for your message! I'll get back to you soon."),
        )),
        Err(e) if e.is_validation() => Ok(Page::new("Contact/Create")
            .with_errors(&e, &form)
            .render(&req)),
        Err(e) => Err(e),
    }
}

#[instrument(skip(req, state))]
pub async fn admin_index(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let (contacts, unread_count) = state.contact_handler.list_contacts(&query).await?;

    Ok(Page::new("Admin/Contact/Index")
        .prop("contacts", contacts)
        .prop("unreadCount", unread_count)
        .render(&req))
}

#[instrument(skip(req, state))]
pub async fn admin_show(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let contact = state.contact_handler.view_contact(&id).await?;
    Ok(Page::new("Admin/Contact/Show").prop("contact", contact).render(&req))
}

#[instrument(skip(req, state))]
pub async fn mark_read(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.contact_handler.mark_as_read(&id).await?;
    Ok(redirect_with(&back_or(&req, ADMIN_INDEX), Flash::success("Message marked as read.")))
}

#[instrument(skip(state))]
pub async fn destroy(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.contact_handler.delete_contact(&id).await?;
    Ok(redirect_with(ADMIN_INDEX, Flash::success("Contact message deleted successfully!")))
}
