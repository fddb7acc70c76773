use crate::{config::Config, database::DbPool, services::storage::UploadStorage};

/// Application state shared across all HTTP handlers
///
/// Holds the process-wide resources: the MySQL connection pool, the loaded
/// configuration and the uploads directory handle. Cloning is cheap (the
/// pool is an `Arc` internally).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for accessing the database
    pub pool: DbPool,
    /// Runtime configuration (port, credentials, secrets, uploads dir)
    pub config: Config,
    /// Storage behind the `/uploads` static mount
    pub storage: UploadStorage,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config) -> Self {
        let storage = UploadStorage::new(&config.uploads_dir);
        Self {
            pool,
            config,
            storage,
        }
    }
}
