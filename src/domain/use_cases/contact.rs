use tracing::info;
use validator::Validate;

use crate::{
    entities::{
        contact::{Contact, ContactForm},
        pagination::{PageQuery, PageRequest, Paginated, ADMIN_PER_PAGE},
    },
    errors::AppError,
    repositories::contact::ContactRepository,
    utils::valid_uuid::valid_uuid,
};

pub struct ContactHandler<R>
where
    R: ContactRepository,
{
    pub contact_repo: R,
}

impl<R> ContactHandler<R>
where
    R: ContactRepository,
{
    pub fn new(contact_repo: R) -> Self {
        ContactHandler { contact_repo }
    }

    /// Handles a message from the public contact form
    pub async fn submit_contact(&self, form: ContactForm) -> Result<Contact, AppError> {
        let form = form.normalized();
        form.validate()?;

        let contact = self.contact_repo.create_contact(&form).await?;
        info!(id = %contact.id, "Contact message received");
        Ok(contact)
    }

    /// Newest first, together with the number of unread messages
    pub async fn list_contacts(&self, query: &PageQuery) -> Result<(Paginated<Contact>, i64), AppError> {
        let page = PageRequest::new(query.page(), ADMIN_PER_PAGE);
        let (contacts, total) = self.contact_repo.list_contacts(page).await?;
        let counts = self.contact_repo.count_contacts().await?;

        Ok((Paginated::new(contacts, total, page), counts.unread))
    }

    /// Opening a message marks it read. Already read messages are not written.
    pub async fn view_contact(&self, id: &str) -> Result<Contact, AppError> {
        let valid_id = valid_uuid(id)?;
        let contact = self.contact_repo.get_contact_by_id(&valid_id).await.map_err(not_found)?;

        if contact.is_read {
            return Ok(contact);
        }

        self.contact_repo.mark_read(&valid_id).await.map_err(not_found)
    }

    pub async fn mark_as_read(&self, id: &str) -> Result<Contact, AppError> {
        let valid_id = valid_uuid(id)?;
        let contact = self.contact_repo.mark_read(&valid_id).await.map_err(not_found)?;
        info!(id = %contact.id, "Contact message marked as read");
        Ok(contact)
    }

    pub async fn delete_contact(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(id)?;
        self.contact_repo.delete_contact(&valid_id).await.map_err(not_found)?;
        info!(id = %valid_id, "Contact message deleted");
        Ok(())
    }
}

fn not_found(e: AppError) -> AppError {
    match e {
        AppError::NotFound(_) => AppError::NotFound("Contact message not found".to_string()),
        _ => e,
    }
}
