use std::net::SocketAddr;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use erp_backend::config::environment::EnvironmentConfig;
use erp_backend::create_app;
use erp_backend::database::DatabaseConnection;
use erp_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,erp_backend=debug")),
        )
        .init();

    info!("🏗️  ERP Backend v{}", env!("CARGO_PKG_VERSION"));
    info!("================================================");

    let config = EnvironmentConfig::from_env().context("Configuración inválida")?;
    if config.is_development() {
        warn!("⚠️ Modo desarrollo: las respuestas de error incluyen detalles");
    }

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {:#}", e);
            return Err(e);
        }
    };
    db_connection.run_migrations().await?;

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("No se pudo crear UPLOAD_DIR '{}'", config.upload_dir))?;

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("Dirección inválida: {}", config.server_url()))?;

    let state = AppState::new(db_connection.pool().clone(), config);
    let app = create_app(state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("   GET  /health");
    info!("   POST /api/auth/login");
    info!("   /api/{{users, customers, invoices, projects, materials, warehouse, purchase-orders}}");
    info!("   /api/{{suppliers, labor, fuel-requisitions, pre-inventory, catalogs}}");
    info!("   /api/{{chatter, notes, files, history, dashboard, ml-analysis}}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo escuchar SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
