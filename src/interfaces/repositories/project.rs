use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::{
        pagination::PageRequest,
        project::{Project, ProjectCounts, ProjectFilter, ProjectRecord},
    },
    errors::AppError,
    repositories::sqlx_repo::{like_pattern, SqlxProjectRepo},
};

/// Display order shared by every project list.
const PROJECT_ORDER: &str = " ORDER BY sort_order ASC, created_at DESC, id ASC";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// One page of projects in display order, plus the total match count.
    async fn list_projects(&self, filter: &ProjectFilter, page: PageRequest) -> Result<(Vec<Project>, i64), AppError>;
    /// Newest first, regardless of display order.
    async fn recent_projects(&self, limit: u32) -> Result<Vec<Project>, AppError>;
    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError>;
    async fn create_project(&self, record: &ProjectRecord) -> Result<Project, AppError>;
    async fn update_project(&self, id: &Uuid, record: &ProjectRecord) -> Result<Project, AppError>;
    async fn set_featured(&self, id: &Uuid, is_featured: bool) -> Result<Project, AppError>;
    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError>;
    async fn count_projects(&self) -> Result<ProjectCounts, AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

fn push_project_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &ProjectFilter) {
    builder.push(" WHERE TRUE");

    if let Some(search) = &filter.search {
        builder.push(" AND name ILIKE ").push_bind(like_pattern(search));
    }

    if let Some(featured) = filter.featured {
        builder.push(" AND is_featured = ").push_bind(featured);
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn list_projects(&self, filter: &ProjectFilter, page: PageRequest) -> Result<(Vec<Project>, i64), AppError> {
        let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM projects");
        push_project_filters(&mut count_builder, filter);
        let total = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut builder = QueryBuilder::new("SELECT * FROM projects");
        push_project_filters(&mut builder, filter);
        builder.push(PROJECT_ORDER);
        builder.push(" LIMIT ").push_bind(page.limit());
        builder.push(" OFFSET ").push_bind(page.offset());

        let projects = builder
            .build_query_as::<Project>()
            .fetch_all(&self.pool)
            .await?;

        Ok((projects, total))
    }

    async fn recent_projects(&self, limit: u32) -> Result<Vec<Project>, AppError> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError> {
        let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(project)
    }

    async fn create_project(&self, record: &ProjectRecord) -> Result<Project, AppError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (
                id, name, description, image, github_url, demo_url,
                technologies, is_featured, sort_order, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&record.name)
        .bind(&record.description)
        .bind(&record.image)
        .bind(&record.github_url)
        .bind(&record.demo_url)
        .bind(&record.technologies)
        .bind(record.is_featured)
        .bind(record.sort_order)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    async fn update_project(&self, id: &Uuid, record: &ProjectRecord) -> Result<Project, AppError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects SET
                name = $1,
                description = $2,
                image = $3,
                github_url = $4,
                demo_url = $5,
                technologies = $6,
                is_featured = $7,
                sort_order = $8,
                updated_at = NOW()
            WHERE id = $9
            RETURNING *
            "#,
        )
        .bind(&record.name)
        .bind(&record.description)
        .bind(&record.image)
        .bind(&record.github_url)
        .bind(&record.demo_url)
        .bind(&record.technologies)
        .bind(record.is_featured)
        .bind(record.sort_order)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    async fn set_featured(&self, id: &Uuid, is_featured: bool) -> Result<Project, AppError> {
        let project = sqlx::query_as::<_, Project>(
            "UPDATE projects SET is_featured = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(is_featured)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Project not found".into()));
        }

        Ok(())
    }

    async fn count_projects(&self) -> Result<ProjectCounts, AppError> {
        let counts = sqlx::query_as::<_, ProjectCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE is_featured) AS featured
            FROM projects
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }
}
