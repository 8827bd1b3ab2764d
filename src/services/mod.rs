// src/services/mod.rs
pub mod converter;
pub mod db;
pub mod format;
pub mod rates;
pub mod resolver;
