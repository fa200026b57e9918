pub mod auth;
pub mod catalog;
pub mod chat;
pub mod health;
pub mod search;
