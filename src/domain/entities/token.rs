use serde::{Deserialize, Serialize};

/// Name of the HttpOnly cookie carrying the session JWT.
pub const SESSION_COOKIE: &str = "portfolio_session";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub admin: bool,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub is_admin: bool,
}

impl AuthResponse {
    pub fn new(access_token: String, is_admin: bool) -> Self {
        AuthResponse {
            access_token,
            token_type: "Bearer".to_string(),
            is_admin,
        }
    }

    /// Where the browser lands after signing in.
    pub fn home_path(&self) -> &'static str {
        if self.is_admin { "/admin" } else { "/dashboard" }
    }
}
