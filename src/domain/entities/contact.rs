use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 1, max = 255, message = "Please enter your name (up to 255 characters)."))]
    #[serde(default)]
    pub name: String,

    #[validate(
        email(message = "Please enter a valid email address."),
        length(max = 255, message = "The email may not be greater than 255 characters.")
    )]
    #[serde(default)]
    pub email: String,

    #[validate(length(min = 1, max = 5000, message = "Please enter a message (up to 5000 characters)."))]
    #[serde(default)]
    pub message: String,
}

impl ContactForm {
    pub fn normalized(self) -> Self {
        ContactForm {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Copy, sqlx::FromRow)]
pub struct ContactCounts {
    pub total: i64,
    pub unread: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecentContact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Contact> for RecentContact {
    fn from(contact: Contact) -> Self {
        RecentContact {
            id: contact.id,
            name: contact.name,
            email: contact.email,
            is_read: contact.is_read,
            created_at: contact.created_at,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_contact(is_read: bool) -> Contact {
    let now = Utc::now();
    Contact {
        id: Uuid::new_v4(),
        name: "Jane".into(),
        email: "jane@x.com".into(),
        message: "Hi".into(),
        is_read,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_valid_message_passes() {
        let form = ContactForm { name: "Jane".into(), email: "jane@x.com".into(), message: "Hi".into() };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn whitespace_only_fields_fail_after_normalizing() {
        let form = ContactForm { name: "  ".into(), email: "jane@x.com".into(), message: "\n".into() }.normalized();
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
        assert!(errors.field_errors().contains_key("message"));
    }

    #[test]
    fn message_limit_is_5000() {
        let mut form = ContactForm { name: "Jane".into(), email: "jane@x.com".into(), message: "a".repeat(5000) };
        assert!(form.validate().is_ok());
        form.message.push('a');
        assert!(form.validate().is_err());
    }
}
