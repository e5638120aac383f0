pub mod auth;
pub mod db;
pub mod storage;
pub mod utils;
pub mod web;
