use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        blog::{Blog, BlogFilter, BlogInput, BlogListQuery, BlogRecord, PublishState, RelatedBlog, IMAGE_FOLDER},
        pagination::{PageQuery, PageRequest, Paginated, ADMIN_PER_PAGE, PUBLIC_PER_PAGE},
        upload::ImageUpload,
    },
    errors::{field_errors, AppError, FieldError},
    repositories::blog::BlogRepository,
    slug::derive_slug,
    storage::MediaStorage,
    utils::{html::sanitize_html, valid_uuid::valid_uuid},
};

const RELATED_LIMIT: u32 = 3;
const MAX_SLUG_LENGTH: usize = 255;

pub struct BlogHandler<R, S>
where
    R: BlogRepository,
    S: MediaStorage,
{
    pub blog_repo: R,
    pub storage: S,
}

impl<R, S> BlogHandler<R, S>
where
    R: BlogRepository,
    S: MediaStorage,
{
    pub fn new(blog_repo: R, storage: S) -> Self {
        BlogHandler { blog_repo, storage }
    }

    /// Public listing: posts that are published and due, newest first.
    pub async fn list_public_blogs(&self, query: &PageQuery) -> Result<Paginated<Blog>, AppError> {
        let page = PageRequest::new(query.page(), PUBLIC_PER_PAGE);
        let (blogs, total) = self.blog_repo
            .list_blogs(&BlogFilter::public(Utc::now()), page)
            .await?;

        Ok(Paginated::new(blogs, total, page))
    }

    /// Admin listing with optional title search and status filter.
    pub async fn list_admin_blogs(&self, query: &BlogListQuery) -> Result<Paginated<Blog>, AppError> {
        let page_query = PageQuery { page: query.page.clone() };
        let page = PageRequest::new(page_query.page(), ADMIN_PER_PAGE);
        let (blogs, total) = self.blog_repo.list_blogs(&query.filter(), page).await?;

        Ok(Paginated::new(blogs, total, page))
    }

    /// A public post and up to three other public posts.
    pub async fn get_public_blog(&self, slug: &str) -> Result<(Blog, Vec<RelatedBlog>), AppError> {
        let now = Utc::now();
        let blog = self.blog_repo
            .get_public_blog_by_slug(slug, now)
            .await
            .map_err(not_found)?;

        if !blog.publish_state(now).is_public() {
            warn!(blog_id = %blog.id, "Non-public post returned for public slug lookup");
            return Err(not_found(AppError::NotFound(slug.to_string())));
        }

        let related_filter = BlogFilter {
            exclude_id: Some(blog.id),
            ..BlogFilter::public(now)
        };
        let (related, _) = self.blog_repo
            .list_blogs(&related_filter, PageRequest::first(RELATED_LIMIT))
            .await?;

        Ok((blog, related.into_iter().map(RelatedBlog::from).collect()))
    }

    /// Retrieves a blog post by its ID, whatever its status
    pub async fn get_blog_by_id(&self, id: &str) -> Result<Blog, AppError> {
        let valid_id = valid_uuid(id)?;
        self.blog_repo.get_blog_by_id(&valid_id).await.map_err(not_found)
    }

    pub async fn create_blog(&self, input: &BlogInput, image: Option<ImageUpload>) -> Result<Blog, AppError> {
        let (slug, extension) = self.check_input(input, image.as_ref(), None).await?;
        let featured_image = self.store_image(image, extension).await?;

        let record = BlogRecord {
            title: input.title.clone(),
            slug,
            content: sanitize_html(&input.content),
            excerpt: input.excerpt.clone(),
            tags: input.tags.clone(),
            featured_image: featured_image.clone(),
            is_published: input.is_published,
            published_at: PublishState::resolve_published_at(
                input.is_published,
                input.published_at(),
                None,
                Utc::now(),
            ),
        };

        match self.blog_repo.create_blog(&record).await {
            Ok(blog) => {
                info!(id = %blog.id, slug = %blog.slug, "Blog post created");
                Ok(blog)
            }
            Err(e) => {
                if let Some(path) = &featured_image {
                    self.discard_image(path).await;
                }
                Err(slug_conflict(e))
            }
        }
    }

    pub async fn update_blog(
        &self,
        id: &str,
        input: &BlogInput,
        image: Option<ImageUpload>,
    ) -> Result<Blog, AppError> {
        let valid_id = valid_uuid(id)?;
        let existing = self.blog_repo.get_blog_by_id(&valid_id).await.map_err(not_found)?;
        let (slug, extension) = self.check_input(input, image.as_ref(), Some(valid_id)).await?;

        let mut featured_image = existing.featured_image.clone();
        let mut stored = None;
        let mut replaced = None;
        if image.is_some() {
            if let Some(old) = &existing.featured_image {
                self.storage.delete(old).await?;
                replaced = Some(old.as_str());
            }
            stored = self.store_image(image, extension).await.inspect_err(|e| {
                if let Some(old) = replaced {
                    warn!(id = %valid_id, old = %old, "Blog post now references a deleted image: {}", e);
                }
            })?;
            featured_image = stored.clone();
        }

        let record = BlogRecord {
            title: input.title.clone(),
            slug,
            content: sanitize_html(&input.content),
            excerpt: input.excerpt.clone(),
            tags: input.tags.clone(),
            featured_image,
            is_published: input.is_published,
            published_at: PublishState::resolve_published_at(
                input.is_published,
                input.published_at(),
                existing.published_at,
                Utc::now(),
            ),
        };

        match self.blog_repo.update_blog(&valid_id, &record).await {
            Ok(blog) => {
                info!(id = %blog.id, "Blog post updated");
                Ok(blog)
            }
            Err(e) => {
                if let Some(path) = &stored {
                    self.discard_image(path).await;
                }
                if let Some(old) = replaced {
                    warn!(id = %valid_id, old = %old, "Blog post now references a deleted image: {}", e);
                }
                Err(slug_conflict(not_found(e)))
            }
        }
    }

    /// Flips the published flag. Publishing a post that never had a date
    /// stamps it with the current time.
    pub async fn toggle_publish(&self, id: &str) -> Result<Blog, AppError> {
        let valid_id = valid_uuid(id)?;
        let blog = self.blog_repo.get_blog_by_id(&valid_id).await.map_err(not_found)?;

        let publish = !blog.is_published;
        let published_at = match blog.published_at {
            None if publish => Some(Utc::now()),
            other => other,
        };

        let blog = self.blog_repo
            .set_published(&valid_id, publish, published_at)
            .await
            .map_err(not_found)?;

        info!(id = %blog.id, is_published = blog.is_published, "Blog publish state toggled");
        Ok(blog)
    }

    /// Deletes the stored image, then the row.
    pub async fn delete_blog(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(id)?;
        let blog = self.blog_repo.get_blog_by_id(&valid_id).await.map_err(not_found)?;

        if let Some(path) = &blog.featured_image {
            if let Err(e) = self.storage.delete(path).await {
                warn!(id = %blog.id, path = %path, "Failed to delete blog image: {}", e);
            }
        }

        self.blog_repo.delete_blog(&valid_id).await.map_err(not_found)?;
        info!(id = %valid_id, "Blog post deleted");
        Ok(())
    }

    /// Runs every check before anything is written and reports all failures
    /// at once. Returns the slug to persist and the image extension.
    async fn check_input(
        &self,
        input: &BlogInput,
        image: Option<&ImageUpload>,
        exclude_id: Option<Uuid>,
    ) -> Result<(String, Option<&'static str>), AppError> {
        let mut errors = match input.validate() {
            Ok(()) => Vec::new(),
            Err(e) => field_errors(&e),
        };

        let extension = match image.map(|img| img.check("featured_image", "featured image")) {
            Some(Ok(ext)) => Some(ext),
            Some(Err(e)) => {
                errors.push(e);
                None
            }
            None => None,
        };

        let slug = match &input.slug {
            Some(slug) => slug.clone(),
            None => derive_slug(&input.title),
        };
        let slug_source_invalid = errors
            .iter()
            .any(|e| e.field == "slug" || (input.slug.is_none() && e.field == "title"));

        if !slug_source_invalid {
            if slug.is_empty() {
                errors.push(slug_error("The slug could not be generated from the title. Please provide one."));
            } else if slug.len() > MAX_SLUG_LENGTH {
                errors.push(slug_error("The slug may not be greater than 255 characters."));
            } else if self.blog_repo.slug_exists(&slug, exclude_id).await? {
                errors.push(slug_error("The slug has already been taken."));
            }
        }

        if errors.is_empty() {
            Ok((slug, extension))
        } else {
            Err(AppError::ValidationError(errors))
        }
    }

    async fn store_image(
        &self,
        image: Option<ImageUpload>,
        extension: Option<&'static str>,
    ) -> Result<Option<String>, AppError> {
        match (image, extension) {
            (Some(image), Some(extension)) => {
                let path = self.storage.store(&image.bytes, IMAGE_FOLDER, extension).await?;
                Ok(Some(path))
            }
            _ => Ok(None),
        }
    }

    async fn discard_image(&self, path: &str) {
        match self.storage.delete(path).await {
            Ok(()) => info!(path = %path, "Removed image after failed write"),
            Err(e) => warn!(path = %path, "Orphaned image after failed write: {}", e),
        }
    }
}

fn slug_error(message: &str) -> FieldError {
    FieldError {
        field: "slug".to_string(),
        message: message.to_string(),
    }
}

fn not_found(e: AppError) -> AppError {
    match e {
        AppError::NotFound(_) => AppError::NotFound("Blog post not found".to_string()),
        _ => e,
    }
}

/// A unique violation that slipped past the pre-check (concurrent write).
fn slug_conflict(e: AppError) -> AppError {
    match e {
        AppError::Conflict(_) => AppError::ValidationError(vec![slug_error("The slug has already been taken.")]),
        _ => e,
    }
}
