pub mod flash;
pub mod page;
