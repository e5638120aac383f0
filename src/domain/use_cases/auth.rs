use uuid::Uuid;
use validator::Validate;

use crate::entities::token::AuthResponse;
use crate::entities::user::{LoginForm, PublicUser, RegisterForm, User};
use crate::errors::{field_errors, AppError, AuthError, FieldError};
use crate::interfaces::repositories::user::UserRepository;
use crate::auth::password::{hash_password, verify_password};
use crate::repositories::token::TokenServiceRepository;

const BAD_CREDENTIALS: &str = "These credentials do not match our records.";

pub struct AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenServiceRepository,
{
    pub user_repo: R,
    pub token_service: T,
}

impl<R, T> AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenServiceRepository,
{
    pub fn new(user_repo: R, token_service: T) -> Self {
        AuthHandler {
            user_repo,
            token_service
        }
    }

    /// Registers a non-admin user and signs them in
    pub async fn register(&self, request: &RegisterForm) -> Result<AuthResponse, AppError> {
        let mut errors = match request.validate() {
            Ok(()) => Vec::new(),
            Err(e) => field_errors(&e),
        };
        if !request.password_confirmed() && !errors.iter().any(|e| e.field == "password") {
            errors.push(FieldError {
                field: "password".into(),
                message: "The password confirmation does not match.".into(),
            });
        }
        let email = request.email.trim().to_lowercase();
        if !errors.iter().any(|e| e.field == "email") && self.user_repo.email_exists(&email).await? {
            errors.push(FieldError {
                field: "email".into(),
                message: "The email has already been taken.".into(),
            });
        }
        if !errors.is_empty() {
            return Err(AppError::ValidationError(errors));
        }

        let hashed_password = hash_password(&request.password)?;
        let user_insert = request.prepare_for_insert(hashed_password);

        let user = match self.user_repo.create_user(&user_insert).await {
            Ok(user) => user,
            Err(AppError::Conflict(_)) => {
                return Err(AppError::field("email", "The email has already been taken."));
            }
            Err(e) => return Err(e),
        };

        tracing::info!(user_id = %user.id, "User registered");
        Ok(self.create_auth_response(&user)?)
    }

    /// Verifies credentials and issues a session token. Unknown emails and
    /// wrong passwords produce the same field error.
    pub async fn login(&self, request: &LoginForm) -> Result<AuthResponse, AppError> {
        request.validate()?;

        let user = self.user_repo.get_user_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Login attempt for unknown email");
                AppError::field("email", BAD_CREDENTIALS)
            })?;

        let is_password_valid = verify_password(&request.password, &user.password_hash)
            .map_err(|e| {
                tracing::warn!(user_id = %user.id, "Password verification error: {}", e);
                AppError::field("email", BAD_CREDENTIALS)
            })?;
        if !is_password_valid {
            tracing::warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AppError::field("email", BAD_CREDENTIALS));
        }

        let response = self.create_auth_response(&user)?;

        tracing::info!(user_id = %user.id, "User logged in successfully");
        Ok(response)
    }

    /// Profile of the signed-in user for the user dashboard
    pub async fn current_user(&self, subject: &str) -> Result<PublicUser, AppError> {
        let user_id = Uuid::parse_str(subject).map_err(|_| AppError::UnauthorizedAccess)?;

        self.user_repo.get_user_by_id(&user_id)
            .await?
            .map(PublicUser::from)
            .ok_or(AppError::UnauthorizedAccess)
    }

    /// Create auth response
    pub fn create_auth_response(&self, user: &User) -> Result<AuthResponse, AuthError> {
        let access_token = self.token_service.create_jwt(user)
            .map_err(|e| {
                tracing::warn!("Failed to create JWT: {}", e);
                AuthError::TokenCreation
            })?;

        Ok(AuthResponse::new(access_token, user.is_admin))
    }
}
