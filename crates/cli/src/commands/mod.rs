pub mod chat;
pub mod config;
pub mod doctor;
pub mod menu;
