// src/handlers/mod.rs
pub mod convert;
pub mod error;
pub mod health;
pub mod history;
pub mod index;
