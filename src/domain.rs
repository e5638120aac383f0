pub mod entities;
pub mod use_cases;
pub mod password;
pub mod slug;
pub mod validation;
