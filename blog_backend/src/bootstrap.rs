use crate::blog::BlogService;
use crate::config::BlogConfig;
use crate::database::Database;
use anyhow::Result;
use std::fs;

pub struct BootstrapResources {
    pub directories_created: Vec<String>,
    pub database_initialized: bool,
    pub seeded_post_id: Option<i64>,
    pub database: Database,
}

/// Creates the data directories, opens and migrates the database, and seeds
/// the welcome post when enabled.
pub async fn initialize(config: &BlogConfig) -> Result<BootstrapResources> {
    let mut directories_created = Vec::new();
    create_dir_if_missing(&config.paths.data_dir, &mut directories_created)?;
    create_dir_if_missing(&config.paths.logs_dir, &mut directories_created)?;

    let database = Database::connect(&config.paths)?;
    let database_initialized = database.ensure_migrations()?;

    let seeded_post_id = if config.seed {
        BlogService::new(database.clone())
            .seed_welcome_post()?
            .map(|post| post.id)
    } else {
        None
    };

    Ok(BootstrapResources {
        directories_created,
        database_initialized,
        seeded_post_id,
        database,
    })
}

fn create_dir_if_missing(path: &std::path::Path, created: &mut Vec<String>) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
        created.push(path.display().to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BlogPaths;

    #[tokio::test]
    async fn initialize_creates_layout_and_seeds_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = BlogConfig::new(0, BlogPaths::from_base_dir(dir.path()).expect("paths"));

        let first = initialize(&config).await.expect("first bootstrap");
        assert!(first.database_initialized);
        assert!(first.seeded_post_id.is_some());
        assert_eq!(first.directories_created.len(), 2);
        assert!(config.paths.db_path.exists());
        drop(first);

        let second = initialize(&config).await.expect("second bootstrap");
        assert!(!second.database_initialized);
        assert!(second.seeded_post_id.is_none());
        assert!(second.directories_created.is_empty());
    }

    #[tokio::test]
    async fn seeding_can_be_disabled() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = BlogConfig::new(0, BlogPaths::from_base_dir(dir.path()).expect("paths"));
        config.seed = false;
        let resources = initialize(&config).await.expect("bootstrap");
        assert!(resources.seeded_post_id.is_none());
        let count = BlogService::new(resources.database)
            .count_posts()
            .expect("count");
        assert_eq!(count, 0);
    }
}
