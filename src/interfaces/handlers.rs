pub mod auth;
pub mod blogs;
pub mod contacts;
pub mod dashboard;
pub mod home;
pub mod projects;
