use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    entities::upload::ImageUpload,
    errors::AppError,
    validation::{
        blank_to_none, new_validation_error, normalize_list, parse_datetime, parse_flag,
        validate_datetime, validate_slug, validate_tags,
    },
};

// ───── Constants ──────────────────────────────────────────────────────
const MAX_TITLE_LENGTH: usize = 255;
const MAX_EXCERPT_LENGTH: u64 = 500;
pub const IMAGE_FOLDER: &str = "blog-images";

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Blog {
    pub fn publish_state(&self, now: DateTime<Utc>) -> PublishState {
        PublishState::of(self.is_published, self.published_at, now)
    }
}

/// Column values written on create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogRecord {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Clone, Copy, sqlx::FromRow)]
pub struct BlogCounts {
    pub total: i64,
    pub published: i64,
}

// ───── Publish status ────────────────────────────────────────────────

/// Publication status derived from the stored flag and date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishState {
    Draft,
    Scheduled(DateTime<Utc>),
    Published(DateTime<Utc>),
}

impl PublishState {
    pub fn of(is_published: bool, published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        match (is_published, published_at) {
            (true, Some(at)) if at > now => PublishState::Scheduled(at),
            (true, Some(at)) => PublishState::Published(at),
            // A flagged post without a date never matches the public filter.
            _ => PublishState::Draft,
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, PublishState::Published(_))
    }

    /// Date to persist on a write. A supplied date always wins, then the
    /// record's previous date; publishing without either stamps `now`.
    pub fn resolve_published_at(
        is_published: bool,
        supplied: Option<DateTime<Utc>>,
        previous: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        match (supplied, previous) {
            (Some(at), _) => Some(at),
            (None, Some(at)) => Some(at),
            (None, None) if is_published => Some(now),
            (None, None) => None,
        }
    }
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct BlogInput {
    #[validate(custom(function = "validate_blog_title"))]
    pub title: String,

    #[validate(
        length(max = 255, message = "The slug may not be greater than 255 characters."),
        custom(function = "validate_slug")
    )]
    pub slug: Option<String>,

    #[validate(length(min = 1, message = "The blog content is required."))]
    pub content: String,

    #[validate(length(max = MAX_EXCERPT_LENGTH, message = "The excerpt may not be greater than 500 characters."))]
    pub excerpt: Option<String>,

    #[validate(custom(function = "validate_tags"))]
    pub tags: Vec<String>,

    pub is_published: bool,

    #[validate(custom(function = "validate_datetime"))]
    pub published_at: Option<String>,
}

fn validate_blog_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(new_validation_error("title_required", "The blog title is required."));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(new_validation_error("title_too_long", "The blog title may not be greater than 255 characters."));
    }
    Ok(())
}

impl BlogInput {
    /// Trims text fields, turns blanks into `None` and tidies the tag list.
    pub fn normalized(self) -> Self {
        BlogInput {
            title: self.title.trim().to_string(),
            slug: blank_to_none(self.slug),
            content: self.content.trim().to_string(),
            excerpt: blank_to_none(self.excerpt),
            tags: normalize_list(self.tags),
            is_published: self.is_published,
            published_at: blank_to_none(self.published_at),
        }
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at.as_deref().and_then(parse_datetime)
    }
}

/// Multipart body of the admin blog create and update forms.
#[derive(Debug, MultipartForm)]
pub struct BlogUpload {
    pub title: Option<Text<String>>,
    pub slug: Option<Text<String>>,
    pub content: Option<Text<String>>,
    pub excerpt: Option<Text<String>>,
    /// Comma separated, or repeated.
    pub tags: Vec<Text<String>>,
    #[multipart(rename = "tags[]")]
    pub tag_list: Vec<Text<String>>,
    pub is_published: Option<Text<String>>,
    pub published_at: Option<Text<String>>,
    #[multipart(limit = "8MB")]
    pub featured_image: Option<TempFile>,
}

impl BlogUpload {
    pub async fn into_parts(self) -> Result<(BlogInput, Option<ImageUpload>), AppError> {
        let image = ImageUpload::from_temp_file(self.featured_image).await?;

        let tags = self.tags
            .into_iter()
            .flat_map(|t| t.into_inner().split(',').map(str::to_string).collect::<Vec<_>>())
            .chain(self.tag_list.into_iter().map(Text::into_inner))
            .collect();

        let input = BlogInput {
            title: text_or_empty(self.title),
            slug: self.slug.map(Text::into_inner),
            content: text_or_empty(self.content),
            excerpt: self.excerpt.map(Text::into_inner),
            tags,
            is_published: self.is_published.is_some_and(|v| parse_flag(&v)),
            published_at: self.published_at.map(Text::into_inner),
        };

        Ok((input.normalized(), image))
    }
}

pub(crate) fn text_or_empty(value: Option<Text<String>>) -> String {
    value.map(Text::into_inner).unwrap_or_default()
}

// ───── Listing ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogStatus {
    Published,
    Draft,
}

impl BlogStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "published" => Some(BlogStatus::Published),
            "draft" => Some(BlogStatus::Draft),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogFilter {
    /// Only posts that are public at this instant.
    pub public_at: Option<DateTime<Utc>>,
    pub search: Option<String>,
    pub status: Option<BlogStatus>,
    pub exclude_id: Option<Uuid>,
}

impl BlogFilter {
    pub fn public(now: DateTime<Utc>) -> Self {
        BlogFilter {
            public_at: Some(now),
            ..Default::default()
        }
    }
}

/// Query string of the admin list page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogListQuery {
    #[serde(default, skip_serializing)]
    pub page: Option<String>,
    pub search: Option<String>,
    pub status: Option<String>,
}

impl BlogListQuery {
    pub fn filter(&self) -> BlogFilter {
        BlogFilter {
            search: blank_to_none(self.search.clone()),
            status: self.status.as_deref().and_then(BlogStatus::parse),
            ..Default::default()
        }
    }
}

// ───── Projections ───────────────────────────────────────────────────

/// Home page card.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BlogCard {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub featured_image: Option<String>,
}

impl From<Blog> for BlogCard {
    fn from(blog: Blog) -> Self {
        BlogCard {
            id: blog.id,
            title: blog.title,
            slug: blog.slug,
            excerpt: blog.excerpt,
            published_at: blog.published_at,
            featured_image: blog.featured_image,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RelatedBlog {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<Blog> for RelatedBlog {
    fn from(blog: Blog) -> Self {
        RelatedBlog {
            id: blog.id,
            title: blog.title,
            slug: blog.slug,
            excerpt: blog.excerpt,
            published_at: blog.published_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecentBlog {
    pub id: Uuid,
    pub title: String,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Blog> for RecentBlog {
    fn from(blog: Blog) -> Self {
        RecentBlog {
            id: blog.id,
            title: blog.title,
            is_published: blog.is_published,
            published_at: blog.published_at,
            created_at: blog.created_at,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_blog(title: &str, slug: &str) -> Blog {
    let now = Utc::now();
    Blog {
        id: Uuid::new_v4(),
        title: title.to_string(),
        slug: slug.to_string(),
        content: "<p>Body</p>".to_string(),
        excerpt: None,
        tags: vec![],
        featured_image: None,
        is_published: false,
        published_at: None,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn input() -> BlogInput {
        BlogInput {
            title: "Hello World".into(),
            content: "<p>Hi</p>".into(),
            ..Default::default()
        }
    }

    #[test]
    fn excerpt_boundary_is_500_characters() {
        let mut ok = input();
        ok.excerpt = Some("a".repeat(500));
        assert!(ok.validate().is_ok());

        let mut too_long = input();
        too_long.excerpt = Some("a".repeat(501));
        let errors = too_long.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("excerpt"));
    }

    #[test]
    fn title_and_content_are_required() {
        let errors = BlogInput::default().validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("content"));
    }

    #[test]
    fn normalization_drops_blank_optionals() {
        let raw = BlogInput {
            title: "  Hello  ".into(),
            slug: Some("   ".into()),
            excerpt: Some("".into()),
            tags: vec![" rust ".into(), " ".into()],
            published_at: Some(" ".into()),
            ..input()
        };
        let normalized = raw.normalized();
        assert_eq!(normalized.title, "Hello");
        assert_eq!(normalized.slug, None);
        assert_eq!(normalized.excerpt, None);
        assert_eq!(normalized.tags, vec!["rust".to_string()]);
        assert_eq!(normalized.published_at, None);
    }

    #[test]
    fn publish_state_covers_future_and_missing_dates() {
        let now = Utc::now();
        assert_eq!(PublishState::of(false, Some(now), now), PublishState::Draft);
        assert_eq!(PublishState::of(true, None, now), PublishState::Draft);

        let later = now + Duration::days(1);
        assert_eq!(PublishState::of(true, Some(later), now), PublishState::Scheduled(later));
        assert!(!PublishState::of(true, Some(later), now).is_public());

        let earlier = now - Duration::days(1);
        assert!(PublishState::of(true, Some(earlier), now).is_public());
    }

    #[test]
    fn published_at_resolution() {
        let now = Utc::now();
        let earlier = now - Duration::days(3);
        let supplied = now - Duration::days(1);

        assert_eq!(PublishState::resolve_published_at(true, None, None, now), Some(now));
        assert_eq!(PublishState::resolve_published_at(false, None, None, now), None);
        assert_eq!(PublishState::resolve_published_at(true, None, Some(earlier), now), Some(earlier));
        assert_eq!(PublishState::resolve_published_at(true, Some(supplied), Some(earlier), now), Some(supplied));
    }

    #[test]
    fn status_filter_parsing() {
        let query = BlogListQuery { page: None, search: Some(" rust ".into()), status: Some("draft".into()) };
        let filter = query.filter();
        assert_eq!(filter.search.as_deref(), Some("rust"));
        assert_eq!(filter.status, Some(BlogStatus::Draft));
        assert_eq!(BlogStatus::parse("everything"), None);
    }
}
