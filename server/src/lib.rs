//! Recipe sharing backend: accounts, recipe catalogue, saved recipe boxes,
//! full-text search, and photo storage.

pub mod api;
pub mod app;
pub mod core;
pub mod data;
pub mod domain;
