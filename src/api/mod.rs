//! Servicios REST de la API de transporte: una función por operación, sin
//! lógica más allá de armar la ruta y los parámetros.

mod client;
pub mod personas;
pub mod solicitudes;
pub mod transporte;

pub use client::{push_param, ApiClient, ListResponse};
pub use personas::TipoPersona;
