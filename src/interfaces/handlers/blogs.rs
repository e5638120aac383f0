use actix_multipart::form::MultipartForm;
use actix_web::{web, HttpRequest, HttpResponse};
use tracing::instrument;

use crate::{
    entities::{
        blog::{BlogCard, BlogListQuery, BlogUpload},
        pagination::PageQuery,
    },
    errors::AppError,
    web::{
        flash::{back_or, redirect_with, Flash},
        page::Page,
    },
    AppState,
};

const ADMIN_INDEX: &str = "/admin/blogs";

#[instrument(skip(req, state))]
pub async fn public_index(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let blogs = state.blog_handler.list_public_blogs(&query).await?;

    Ok(Page::new("Blog/Index")
        .prop("blogs", blogs.map(BlogCard::from))
        .render(&req))
}

#[instrument(skip(req, state))]
pub async fn public_show(
    req: HttpRequest,
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let (blog, related) = state.blog_handler.get_public_blog(&slug).await?;

    Ok(Page::new("Blog/Show")
        .prop("blog", blog)
        .prop("relatedBlogs", related)
        .render(&req))
}

#[instrument(skip(req, state))]
pub async fn admin_index(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<BlogListQuery>,
) -> Result<HttpResponse, AppError> {
    let blogs = state.blog_handler.list_admin_blogs(&query).await?;

    Ok(Page::new("Admin/Blog/Index")
        .prop("blogs", blogs)
        .prop("filters", query.into_inner())
        .render(&req))
}

pub async fn create_form(req: HttpRequest) -> HttpResponse {
    Page::new("Admin/Blog/Create").render(&req)
}

#[instrument(skip(req, state, form))]
pub async fn store(
    req: HttpRequest,
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<BlogUpload>,
) -> Result<HttpResponse, AppError> {
    let (input, image) = form.into_parts().await?;

    match state.blog_handler.create_blog(&input, image).await {
        Ok(_) => Ok(redirect_with(ADMIN_INDEX, Flash::success("Blog post created successfully!"))),
        Err(e) if e.is_validation() => Ok(Page::new("Admin/Blog/Create")
            .with_errors(&e, &input)
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
    let blog = state.blog_handler.get_blog_by_id(&id).await?;
    Ok(Page::new("Admin/Blog/Show").prop("blog", blog).render(&req))
}

#[instrument(skip(req, state))]
pub async fn edit_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let blog = state.blog_handler.get_blog_by_id(&id).await?;
    Ok(Page::new("Admin/Blog/Edit").prop("blog", blog).render(&req))
}

#[instrument(skip(req, state, form))]
pub async fn update(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<String>,
    MultipartForm(form): MultipartForm<BlogUpload>,
) -> Result<HttpResponse, AppError> {
    let (input, image) = form.into_parts().await?;

    match state.blog_handler.update_blog(&id, &input, image).await {
        Ok(_) => Ok(redirect_with(ADMIN_INDEX, Flash::success("Blog post updated successfully!"))),
        Err(e) if e.is_validation() => {
            let blog = state.blog_handler.get_blog_by_id(&id).await?;
            Ok(Page::new("Admin/Blog/Edit")
                .prop("blog", blog)
                .with_errors(&e, &input)
                .render(&req))
        }
        Err(e) => Err(e),
    }
}

#[instrument(skip(req, state))]
pub async fn toggle_publish(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let blog = state.blog_handler.toggle_publish(&id).await?;
    let message = if blog.is_published {
        "Blog post published successfully!"
    } else {
        "Blog post unpublished successfully!"
    };

    Ok(redirect_with(&back_or(&req, ADMIN_INDEX), Flash::success(message)))
}

#[instrument(skip(state))]
pub async fn destroy(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.blog_handler.delete_blog(&id).await?;
    Ok(redirect_with(ADMIN_INDEX, Flash::success("Blog post deleted successfully!")))
}
