pub mod app;
pub mod cache;
pub mod client;
pub mod config;
pub mod conversation;
pub mod message;
