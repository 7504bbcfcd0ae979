//! Collection-level data operations
//!
//! Free functions over typed collection handles. Callers pass the handle in
//! explicitly; nothing here resolves collections by name at a distance.

pub mod recipes;
pub mod users;
