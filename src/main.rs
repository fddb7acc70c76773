use std::net::SocketAddr;

use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use salon_backend::{AppState, Config, build_app, database};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("salon_backend=debug,tower_http=debug,info")
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::debug!("Configuración cargada:\n{}", config);

    let pool = database::create_pool(&config)?;
    let state = AppState::new(pool.clone(), config.clone());

    state.storage.init().await?;

    // The probe runs in the background so an unreachable database never
    // delays nor aborts the listener.
    tokio::spawn(async move {
        database::startup_probe(&pool).await;
    });

    let app = build_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("🚀 Servidor corriendo en http://localhost:{}", config.port);
    tracing::info!("📡 API disponible en http://localhost:{}/api", config.port);
    tracing::info!("🌍 Entorno: {}", config.node_env);
    tracing::info!(
        "🔐 Admin: {} / {}",
        config.admin_email,
        config.admin_password.expose_secret()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Apagando el servidor");
}
