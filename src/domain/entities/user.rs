use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use validator::Validate;
use uuid::Uuid;

use crate::domain::password::validate_password_strength;
use crate::entities::token::Claims;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserInsert {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1, max = 255, message = "The name is required."))]
    pub name: String,

    #[validate(
        email(message = "The email must be a valid email address."),
        length(max = 255, message = "The email may not be greater than 255 characters.")
    )]
    pub email: String,

    #[serde(skip_serializing)]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,

    #[serde(default, skip_serializing)]
    pub password_confirmation: String,
}

impl RegisterForm {
    pub fn password_confirmed(&self) -> bool {
        self.password == self.password_confirmation
    }

    pub fn prepare_for_insert(&self, password_hash: String) -> UserInsert {
        UserInsert {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            password_hash,
            is_admin: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: String,

    #[serde(skip_serializing)]
    #[validate(length(min = 1, message = "The password is required."))]
    pub password: String,
}

/// The `auth.user` shared prop.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<&Claims> for SessionUser {
    fn from(claims: &Claims) -> Self {
        SessionUser {
            id: claims.sub.clone(),
            name: claims.name.clone(),
            email: claims.email.clone(),
            is_admin: claims.admin,
        }
    }
}

#[derive(Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(password: &str, confirmation: &str) -> RegisterForm {
        RegisterForm {
            name: "Jane".into(),
            email: "Jane@Example.com".into(),
            password: password.into(),
            password_confirmation: confirmation.into(),
        }
    }

    #[test]
    fn confirmation_must_match() {
        assert!(!form("Tr0ub4dour&Horse!", "something-else").password_confirmed());
        assert!(form("Tr0ub4dour&Horse!", "Tr0ub4dour&Horse!").password_confirmed());
    }

    #[test]
    fn insert_normalizes_email_and_is_never_admin() {
        let insert = form("Tr0ub4dour&Horse!", "Tr0ub4dour&Horse!").prepare_for_insert("hash".into());
        assert_eq!(insert.email, "jane@example.com");
        assert!(!insert.is_admin);
    }
}
