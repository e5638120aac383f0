pub mod blog;
pub mod contact;
pub mod dashboard;
pub mod pagination;
pub mod project;
pub mod token;
pub mod upload;
pub mod user;
