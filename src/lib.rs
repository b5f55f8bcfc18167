// Biblioteca raíz del crate `transporte_admin`.
// Servicio de administración para la API de transporte: cliente REST tipado,
// lógica de presentación (horarios, filtros, agregados) y endpoints HTTP.
pub mod agregados;
pub mod alertas;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod exportar;
pub mod filtros;
pub mod horarios;
pub mod models;
pub mod refresh;
pub mod server;
pub mod server_handlers;
pub mod sesion;
pub mod utils;

pub use config::Config;
pub use error::AppError;
pub use sesion::Session;

/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;
