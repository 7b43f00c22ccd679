use crate::api;
use crate::auth::SessionService;
use crate::blog::BlogService;
use crate::bootstrap::{self, BootstrapResources};
use crate::config::BlogConfig;
use crate::database::Database;
use anyhow::Result;

/// Bootstraps the backend once and hands out cloned handles for whichever
/// entrypoint (REST server, admin CLI) needs them.
pub struct BlogNode {
    config: BlogConfig,
    bootstrap: BootstrapResources,
}

impl BlogNode {
    pub async fn start(config: BlogConfig) -> Result<Self> {
        let bootstrap = bootstrap::initialize(&config).await?;

        tracing::info!(
            directories_created = ?bootstrap.directories_created,
            database_initialized = bootstrap.database_initialized,
            seeded_post_id = ?bootstrap.seeded_post_id,
            db_path = %config.paths.db_path.display(),
            "blog node initialized"
        );

        let purged = SessionService::new(bootstrap.database.clone(), &config.session)
            .purge_expired()?;
        if purged > 0 {
            tracing::info!(purged, "removed expired sessions");
        }

        Ok(Self { config, bootstrap })
    }

    /// Runs the REST API server until shutdown.
    pub async fn run_http_server(&self) -> Result<()> {
        api::serve_http(self.config.clone(), self.database()).await
    }

    pub fn config(&self) -> &BlogConfig {
        &self.config
    }

    pub fn database(&self) -> Database {
        self.bootstrap.database.clone()
    }

    pub fn blog(&self) -> BlogService {
        BlogService::new(self.database())
    }

    pub fn sessions(&self) -> SessionService {
        SessionService::new(self.database(), &self.config.session)
    }
}
