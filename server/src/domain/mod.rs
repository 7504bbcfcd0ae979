//! Domain logic for the recipe catalogue
//!
//! - `recipes` - Recipe catalogue: search, create, scraped import, update
//! - `users` - Accounts, recipe boxes, groups, follow graph

pub mod recipes;
pub mod users;

pub use recipes::RecipeService;
pub use users::UserService;
