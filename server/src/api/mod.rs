//! API server and routes

pub mod auth;
pub mod middleware;
pub mod routes;
mod server;
pub mod types;

pub use auth::AuthService;
pub use server::ApiServer;
