// --- Administración de transporte - punto de entrada ---

use tracing::error;
use tracing_subscriber::EnvFilter;
use transporte_admin::{run_server, Config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("configuración inválida: {}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };
    run_server(config).await
}
