use clap::Parser;

use std::path::PathBuf;

use super::constants::{
    ENV_CONFIG, ENV_DB_NAME, ENV_DB_URL, ENV_DEBUG, ENV_HOST, ENV_JWT_AUDIENCE, ENV_JWT_SECRET,
    ENV_MEDIA_ENDPOINT, ENV_MEDIA_PUBLIC_BASE_URL, ENV_MEDIA_RECIPE_BUCKET, ENV_MEDIA_REGION,
    ENV_MEDIA_USER_BUCKET, ENV_PORT,
};

#[derive(Parser)]
#[command(name = "foodtomake")]
#[command(version, about = "Recipe sharing backend", long_about = None)]
pub struct Cli {
    /// Server host address
    #[arg(long, short = 'H', env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', env = ENV_PORT)]
    pub port: Option<u16>,

    /// Disable bearer-token enforcement (for development)
    #[arg(long)]
    pub no_auth: bool,

    /// Enable debug mode (verbose request logging)
    #[arg(long, env = ENV_DEBUG)]
    pub debug: bool,

    /// Path to config file
    #[arg(long, short = 'c', env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// MongoDB connection string
    #[arg(long, env = ENV_DB_URL)]
    pub db_url: Option<String>,

    /// MongoDB database name
    #[arg(long, env = ENV_DB_NAME)]
    pub db_name: Option<String>,

    /// JWT signing secret
    #[arg(long, env = ENV_JWT_SECRET, hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// JWT audience claim
    #[arg(long, env = ENV_JWT_AUDIENCE)]
    pub jwt_audience: Option<String>,

    // Media storage options
    /// Bucket for recipe photos
    #[arg(long, env = ENV_MEDIA_RECIPE_BUCKET)]
    pub media_recipe_bucket: Option<String>,

    /// Bucket for user profile pictures
    #[arg(long, env = ENV_MEDIA_USER_BUCKET)]
    pub media_user_bucket: Option<String>,

    /// Object storage region
    #[arg(long, env = ENV_MEDIA_REGION)]
    pub media_region: Option<String>,

    /// Object storage endpoint override (S3-compatible stores)
    #[arg(long, env = ENV_MEDIA_ENDPOINT)]
    pub media_endpoint: Option<String>,

    /// Base URL for public object links
    #[arg(long, env = ENV_MEDIA_PUBLIC_BASE_URL)]
    pub media_public_base_url: Option<String>,
}

/// Configuration values extracted from CLI arguments
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub no_auth: bool,
    pub debug: bool,
    pub config: Option<PathBuf>,
    pub db_url: Option<String>,
    pub db_name: Option<String>,
    pub jwt_secret: Option<String>,
    pub jwt_audience: Option<String>,
    pub media_recipe_bucket: Option<String>,
    pub media_user_bucket: Option<String>,
    pub media_region: Option<String>,
    pub media_endpoint: Option<String>,
    pub media_public_base_url: Option<String>,
}

/// Parse CLI arguments into a config struct
pub fn parse() -> CliConfig {
    let cli = Cli::parse();

    CliConfig {
        host: cli.host,
        port: cli.port,
        no_auth: cli.no_auth,
        debug: cli.debug,
        config: cli.config,
        db_url: cli.db_url,
        db_name: cli.db_name,
        jwt_secret: cli.jwt_secret,
        jwt_audience: cli.jwt_audience,
        media_recipe_bucket: cli.media_recipe_bucket,
        media_user_bucket: cli.media_user_bucket,
        media_region: cli.media_region,
        media_endpoint: cli.media_endpoint,
        media_public_base_url: cli.media_public_base_url,
    }
}
