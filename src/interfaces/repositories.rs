pub mod blog;
pub mod contact;
pub mod project;
pub mod sqlx_repo;
pub mod token;
pub mod user;
