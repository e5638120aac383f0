pub mod auth;
pub mod blog;
pub mod contact;
pub mod dashboard;
pub mod extractors;
pub mod home;
pub mod project;
