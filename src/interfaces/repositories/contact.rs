use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::{
        contact::{Contact, ContactCounts, ContactForm},
        pagination::PageRequest,
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxContactRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create_contact(&self, form: &ContactForm) -> Result<Contact, AppError>;
    async fn list_contacts(&self, page: PageRequest) -> Result<(Vec<Contact>, i64), AppError>;
    async fn get_contact_by_id(&self, id: &Uuid) -> Result<Contact, AppError>;
    async fn mark_read(&self, id: &Uuid) -> Result<Contact, AppError>;
    async fn delete_contact(&self, id: &Uuid) -> Result<(), AppError>;
    async fn count_contacts(&self) -> Result<ContactCounts, AppError>;
}

impl SqlxContactRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxContactRepo { pool }
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepo {
    async fn create_contact(&self, form: &ContactForm) -> Result<Contact, AppError> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (id, name, email, message, is_read, created_at, updated_at)
            VALUES ($1, $2, $3, $4, FALSE, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&form.name)
        .bind(&form.email)
        .bind(&form.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(contact)
    }

    async fn list_contacts(&self, page: PageRequest) -> Result<(Vec<Contact>, i64), AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contacts")
            .fetch_one(&self.pool)
            .await?;

        let contacts = sqlx::query_as::<_, Contact>(
            "SELECT * FROM contacts ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((contacts, total))
    }

    async fn get_contact_by_id(&self, id: &Uuid) -> Result<Contact, AppError> {
        let contact = sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(contact)
    }

    async fn mark_read(&self, id: &Uuid) -> Result<Contact, AppError> {
        let contact = sqlx::query_as::<_, Contact>(
            "UPDATE contacts SET is_read = TRUE, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(contact)
    }

    async fn delete_contact(&self, id: &Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|result| {
                if result.rows_affected() == 0 {
                    Err(AppError::NotFound("Contact message not found".into()))
                } else {
                    Ok(())
                }
            })?
    }

    async fn count_contacts(&self) -> Result<ContactCounts, AppError> {
        let counts = sqlx::query_as::<_, ContactCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE NOT is_read) AS unread
            FROM contacts
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }
}
