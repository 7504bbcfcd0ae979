//! API server initialization

use std::net::SocketAddr;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::auth::{AuthState, require_auth};
use super::middleware;
use super::routes::health::HealthState;
use super::routes::{auth, health, recipes, users};
use crate::app::CoreApp;
use crate::core::constants::DEFAULT_BODY_LIMIT;

pub struct ApiServer {
    app: CoreApp,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        Self { app }
    }

    /// Serve until shutdown is triggered; returns CoreApp for final cleanup
    pub async fn start(self) -> Result<CoreApp> {
        let Self { app } = self;

        // Clone shutdown before moving app
        let shutdown = app.shutdown.clone();

        let host = app.config.server.host.clone();
        let port = app.config.server.port;
        let addr = SocketAddr::new(host.parse()?, port);

        let auth_state = AuthState {
            auth: app.auth.clone(),
        };
        let enforce = |router: Router<()>| -> Router<()> {
            router.layer(axum::middleware::from_fn_with_state(
                auth_state.clone(),
                require_auth,
            ))
        };

        // Login/registration routes are always public; mutations require a
        // bearer token when enforcement is enabled.
        let auth_routes = auth::routes(app.users.clone(), app.auth.clone());
        let users_routes = users::routes(app.users.clone())
            .merge(enforce(users::mutation_routes(app.users.clone())));
        let recipes_routes = recipes::routes(app.recipes.clone())
            .merge(enforce(recipes::mutation_routes(app.recipes.clone())));

        let router = Router::new()
            .route("/api/v1/health", get(health::health))
            .with_state(HealthState {
                mongo: app.mongo.clone(),
            })
            .nest("/api/v1/auth", auth_routes)
            .nest("/api/v1/users", users_routes)
            .nest("/api/v1/recipes", recipes_routes)
            .fallback(middleware::handle_404)
            .layer(middleware::cors())
            .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT));

        let router = if app.config.debug {
            router.layer(TraceLayer::new_for_http())
        } else {
            router
        };

        tracing::info!(%addr, auth_enabled = app.auth.is_enabled(), "API server listening");

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        Ok(app)
    }
}
