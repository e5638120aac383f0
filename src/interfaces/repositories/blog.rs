use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::{
        blog::{Blog, BlogCounts, BlogFilter, BlogRecord, BlogStatus},
        pagination::PageRequest,
    },
    errors::AppError,
    repositories::sqlx_repo::{like_pattern, SqlxBlogRepo},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// One page of posts matching `filter`, newest first, plus the total match count.
    async fn list_blogs(&self, filter: &BlogFilter, page: PageRequest) -> Result<(Vec<Blog>, i64), AppError>;
    async fn get_blog_by_id(&self, id: &Uuid) -> Result<Blog, AppError>;
    async fn get_public_blog_by_slug(&self, slug: &str, now: DateTime<Utc>) -> Result<Blog, AppError>;
    async fn slug_exists(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError>;
    async fn create_blog(&self, record: &BlogRecord) -> Result<Blog, AppError>;
    async fn update_blog(&self, id: &Uuid, record: &BlogRecord) -> Result<Blog, AppError>;
    async fn set_published(
        &self,
        id: &Uuid,
        is_published: bool,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<Blog, AppError>;
    async fn delete_blog(&self, id: &Uuid) -> Result<(), AppError>;
    async fn count_blogs(&self) -> Result<BlogCounts, AppError>;
}

impl SqlxBlogRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxBlogRepo { pool }
    }
}

fn push_blog_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &BlogFilter) {
    builder.push(" WHERE TRUE");

    if let Some(now) = filter.public_at {
        builder
            .push(" AND is_published = TRUE AND published_at IS NOT NULL AND published_at <= ")
            .push_bind(now);
    }

    if let Some(search) = &filter.search {
        builder.push(" AND title ILIKE ").push_bind(like_pattern(search));
    }

    match filter.status {
        Some(BlogStatus::Published) => {
            builder.push(" AND is_published = TRUE");
        }
        Some(BlogStatus::Draft) => {
            builder.push(" AND is_published = FALSE");
        }
        None => {}
    }

    if let Some(exclude_id) = filter.exclude_id {
        builder.push(" AND id <> ").push_bind(exclude_id);
    }
}

fn map_slug_conflict(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.constraint() == Some("blogs_slug_key") {
            return AppError::Conflict("Slug already exists".into());
        }
    }
    AppError::from(e)
}

#[async_trait]
impl BlogRepository for SqlxBlogRepo {
    async fn list_blogs(&self, filter: &BlogFilter, page: PageRequest) -> Result<(Vec<Blog>, i64), AppError> {
        let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM blogs");
        push_blog_filters(&mut count_builder, filter);
        let total: i64 = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut builder = QueryBuilder::new("SELECT * FROM blogs");
        push_blog_filters(&mut builder, filter);
        builder.push(" ORDER BY created_at DESC, id DESC");
        builder.push(" LIMIT ").push_bind(page.limit());
        builder.push(" OFFSET ").push_bind(page.offset());

        let blogs = builder
            .build_query_as::<Blog>()
            .fetch_all(&self.pool)
            .await?;

        Ok((blogs, total))
    }

    async fn get_blog_by_id(&self, id: &Uuid) -> Result<Blog, AppError> {
        let blog = sqlx::query_as::<_, Blog>("SELECT * FROM blogs WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(blog)
    }

    async fn get_public_blog_by_slug(&self, slug: &str, now: DateTime<Utc>) -> Result<Blog, AppError> {
        let blog = sqlx::query_as::<_, Blog>(
            r#"
            SELECT * FROM blogs
            WHERE slug = $1
              AND is_published = TRUE
              AND published_at IS NOT NULL
              AND published_at <= $2
            "#,
        )
        .bind(slug)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(blog)
    }

    async fn slug_exists(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM blogs
                WHERE slug = $1
                  AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create_blog(&self, record: &BlogRecord) -> Result<Blog, AppError> {
        let blog = sqlx::query_as::<_, Blog>(
            r#"
            INSERT INTO blogs (
                id, title, slug, content, excerpt, tags, featured_image,
                is_published, published_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&record.title)
        .bind(&record.slug)
        .bind(&record.content)
        .bind(&record.excerpt)
        .bind(&record.tags)
        .bind(&record.featured_image)
        .bind(record.is_published)
        .bind(record.published_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_slug_conflict)?;

        Ok(blog)
    }

    async fn update_blog(&self, id: &Uuid, record: &BlogRecord) -> Result<Blog, AppError> {
        let blog = sqlx::query_as::<_, Blog>(
            r#"
            UPDATE blogs SET
                title = $1,
                slug = $2,
                content = $3,
                excerpt = $4,
                tags = $5,
                featured_image = $6,
                is_published = $7,
                published_at = $8,
                updated_at = NOW()
            WHERE id = $9
            RETURNING *
            "#,
        )
        .bind(&record.title)
        .bind(&record.slug)
        .bind(&record.content)
        .bind(&record.excerpt)
        .bind(&record.tags)
        .bind(&record.featured_image)
        .bind(record.is_published)
        .bind(record.published_at)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_slug_conflict)?;

        Ok(blog)
    }

    async fn set_published(
        &self,
        id: &Uuid,
        is_published: bool,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<Blog, AppError> {
        let blog = sqlx::query_as::<_, Blog>(
            r#"
            UPDATE blogs SET
                is_published = $1,
                published_at = $2,
                updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(is_published)
        .bind(published_at)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(blog)
    }

    async fn delete_blog(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Blog post not found".into()));
        }

        Ok(())
    }

    async fn count_blogs(&self) -> Result<BlogCounts, AppError> {
        let counts = sqlx::query_as::<_, BlogCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE is_published) AS published
            FROM blogs
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }
}
