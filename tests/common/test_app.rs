use reqwest::{Client, redirect::Policy};
use salon_backend::{AppState, Config, DbPool, build_app, database};
use tokio::net::TcpListener;

/// HTTP test application wrapper
///
/// Boots the full router (middleware stack included) on a random port so
/// tests exercise the server exactly as a browser would. Each test gets its
/// own server instance and its own uploads directory, allowing parallel
/// execution.
pub struct TestApp {
    /// Server base URL (e.g., "http://127.0.0.1:54321")
    pub address: String,
    /// HTTP client for making requests
    pub client: Client,
    /// Configuration the server was started with
    pub config: Config,
    /// Handle to the same pool the server uses, for direct DB assertions
    pub pool: DbPool,
}

impl TestApp {
    /// Create a test app without waiting for MySQL.
    ///
    /// The startup probe runs in the background exactly as in production,
    /// so this works with or without a reachable database. Suites that
    /// query MySQL should use [`TestApp::new_with_db`] instead.
    pub async fn new() -> Self {
        Self::build(test_config(), false).await
    }

    /// Create a test app and wait until the startup probe has finished,
    /// so migrations are applied before the first request. Panics with a
    /// clear message when MySQL is not reachable.
    pub async fn new_with_db() -> Self {
        Self::build(test_config(), true).await
    }

    /// Create a test app from an explicit configuration, e.g. one pointing
    /// at an unreachable database host.
    pub async fn with_config(config: Config) -> Self {
        Self::build(config, false).await
    }

    async fn build(config: Config, wait_for_db: bool) -> Self {
        let pool = database::create_pool(&config).expect("Failed to create pool");
        let state = AppState::new(pool.clone(), config.clone());
        state
            .storage
            .init()
            .await
            .expect("Failed to create uploads directory");

        if wait_for_db {
            database::startup_probe(&pool).await;
            pool.acquire()
                .await
                .expect("MySQL is not reachable; start a server and set the DB_* variables");
        } else {
            let probe_pool = pool.clone();
            tokio::spawn(async move {
                database::startup_probe(&probe_pool).await;
            });
        }

        let app = build_app(state);

        // Bind to random port (port 0 tells the OS to assign an available one)
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{port}");

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give server time to start
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        let client = Client::builder()
            .redirect(Policy::none())
            .cookie_store(true)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            address,
            client,
            config,
            pool,
        }
    }

    /// Get the full URL for an endpoint path
    ///
    /// # Example
    /// ```rust,ignore
    /// let url = app.url("/api/productos");
    /// // Returns: "http://127.0.0.1:54321/api/productos"
    /// ```
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

/// Loads the real configuration and swaps the uploads directory for a
/// per-instance temp dir so parallel tests never share files.
pub fn test_config() -> Config {
    let mut config = Config::load().expect("Failed to load config");
    let dir = std::env::temp_dir().join(format!("salon-uploads-{}", nanoid::nanoid!(8)));
    config.uploads_dir = dir.to_string_lossy().into_owned();
    config
}
