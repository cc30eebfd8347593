pub mod chat;
pub mod config_init;
pub mod paper;
pub mod search;
