//! Application-wide constants

pub const APP_NAME: &str = "foodtomake";

// Environment variables
pub const ENV_LOG: &str = "FOODTOMAKE_LOG";
pub const ENV_HOST: &str = "FOODTOMAKE_HOST";
pub const ENV_PORT: &str = "FOODTOMAKE_PORT";
pub const ENV_CONFIG: &str = "FOODTOMAKE_CONFIG";
pub const ENV_DEBUG: &str = "FOODTOMAKE_DEBUG";
pub const ENV_DB_URL: &str = "DB_CONNECTION_STRING";
pub const ENV_DB_NAME: &str = "FOODTOMAKE_DB_NAME";
pub const ENV_JWT_SECRET: &str = "JWT_SECRET";
pub const ENV_JWT_AUDIENCE: &str = "JWT_AUDIENCE";
pub const ENV_MEDIA_RECIPE_BUCKET: &str = "FOODTOMAKE_MEDIA_RECIPE_BUCKET";
pub const ENV_MEDIA_USER_BUCKET: &str = "FOODTOMAKE_MEDIA_USER_BUCKET";
pub const ENV_MEDIA_REGION: &str = "FOODTOMAKE_MEDIA_REGION";
pub const ENV_MEDIA_ENDPOINT: &str = "FOODTOMAKE_MEDIA_ENDPOINT";
pub const ENV_MEDIA_PUBLIC_BASE_URL: &str = "FOODTOMAKE_MEDIA_PUBLIC_BASE_URL";

// Defaults
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_DB_NAME: &str = "foodtomake";
pub const CONFIG_FILE_NAME: &str = "foodtomake.json";
pub const DEFAULT_MEDIA_PUBLIC_BASE_URL: &str = "https://storage.googleapis.com";

/// JWT issuer claim, fixed for all issued session tokens
pub const JWT_ISSUER: &str = "api.foodtomake.com";
/// Session token lifetime
pub const SESSION_TTL_HOURS: i64 = 2;

// Collections
pub const USERS_COLLECTION: &str = "users";
pub const RECIPES_COLLECTION: &str = "recipes";

/// Request body limit (clients upload photo batches up to 100mb)
pub const DEFAULT_BODY_LIMIT: usize = 100 * 1024 * 1024;

/// Default page size for search and list endpoints
pub const DEFAULT_SEARCH_LIMIT: i64 = 50;
