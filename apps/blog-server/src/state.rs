//! Application state - shared across all handlers.

use std::sync::Arc;

use blogicum_core::forms::RegistrationForm;
use blogicum_core::ports::{PasswordService, Repositories, TokenService};
use blogicum_core::services::BlogService;
use blogicum_infra::database::DatabaseConfig;
use blogicum_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService};

use crate::config::{AdminBootstrap, AppConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    /// Which store backs the repositories, for the health report.
    pub storage: &'static str,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (repos, storage) = open_repositories(config.database.as_ref()).await;

        let state = Self::from_parts(
            repos,
            storage,
            Arc::new(JwtTokenService::new(config.jwt.clone())),
            Arc::new(Argon2PasswordService::new()),
        );

        if let Some(admin) = &config.admin {
            state.bootstrap_admin(admin).await;
        }

        tracing::info!(storage, "Application state initialized");
        state
    }

    pub fn from_parts(
        repos: Repositories,
        storage: &'static str,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            blog: BlogService::new(repos),
            tokens,
            passwords,
            storage,
        }
    }

    async fn bootstrap_admin(&self, admin: &AdminBootstrap) {
        let form = RegistrationForm {
            username: admin.username.clone(),
            email: admin.email.clone(),
            password: admin.password.clone(),
            ..RegistrationForm::default()
        };
        match self.blog.ensure_staff(form, self.passwords.as_ref()).await {
            Ok(user) => tracing::info!(username = %user.username, "Staff account available"),
            Err(e) => tracing::error!("Failed to create staff account: {}", e),
        }
    }
}

fn in_memory() -> (Repositories, &'static str) {
    (InMemoryStore::new().repositories(), "memory")
}

#[cfg(feature = "postgres")]
async fn open_repositories(db_config: Option<&DatabaseConfig>) -> (Repositories, &'static str) {
    use blogicum_infra::DatabaseConnections;

    let Some(config) = db_config else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return in_memory();
    };

    match DatabaseConnections::init(config).await {
        Ok(connections) => (connections.repositories(), "postgres"),
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            in_memory()
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn open_repositories(_db_config: Option<&DatabaseConfig>) -> (Repositories, &'static str) {
    tracing::info!("Running without postgres feature - using in-memory repositories");
    in_memory()
}
