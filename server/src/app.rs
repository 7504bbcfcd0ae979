//! Core application

use std::sync::Arc;

use anyhow::Result;

use crate::api::{ApiServer, AuthService};
use crate::core::cli;
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::data::{MediaStore, MongoService};
use crate::domain::{RecipeService, UserService};

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub mongo: MongoService,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub recipes: Arc<RecipeService>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let cli_config = cli::parse();
        let app = Self::init(&cli_config).await?;
        Self::start_server(app).await
    }

    async fn init(cli: &cli::CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;

        let mongo = MongoService::init(&config.database).await?;

        let media = match &config.media {
            Some(media_config) => Some(MediaStore::init(media_config.clone()).await?),
            None => {
                tracing::debug!("Media storage not configured; photo URIs pass through");
                None
            }
        };

        let auth = Arc::new(AuthService::new(&config.auth));
        let users = Arc::new(UserService::new(
            mongo.users(),
            mongo.recipes(),
            media.clone(),
        ));
        let recipes = Arc::new(RecipeService::new(mongo.recipes(), mongo.users(), media));

        Ok(Self {
            shutdown: ShutdownService::new(),
            config,
            mongo,
            auth,
            users,
            recipes,
        })
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        let server = ApiServer::new(app);
        let app = server.start().await?;

        if app.shutdown.is_triggered() {
            tracing::info!("Shutdown complete");
        }
        Ok(())
    }
}
