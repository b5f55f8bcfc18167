//! Notificaciones para el usuario y textos de alerta fijos.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NivelAlerta {
    Exito,
    Info,
    Advertencia,
    Error,
}

/// Banner descartable que muestra la interfaz tras una acción.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Notificacion {
    pub tipo: NivelAlerta,
    pub mensaje: String,
}

impl Notificacion {
    pub fn error(mensaje: impl Into<String>) -> Self {
        Notificacion { tipo: NivelAlerta::Error, mensaje: mensaje.into() }
    }

    pub fn exito(mensaje: impl Into<String>) -> Self {
        Notificacion { tipo: NivelAlerta::Exito, mensaje: mensaje.into() }
    }
}

pub const ACCESO_DENEGADO: &str = "Acceso denegado: no tienes permisos para realizar esta acción.";
pub const ERROR_GENERICO: &str = "Ocurrió un error al procesar la solicitud. Intenta de nuevo.";

/// Mensaje para respuestas 403. Si el servidor indica el permiso requerido se
/// nombra explícitamente.
pub fn permission_denied_message(permission: Option<&str>) -> String {
    match permission.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => format!("{} Permiso requerido: {}", ACCESO_DENEGADO, p),
        None => ACCESO_DENEGADO.to_string(),
    }
}

/// Mensaje del servidor si viene uno utilizable; si no, el genérico.
pub fn generic_error_message(server_message: Option<&str>) -> String {
    match server_message.map(str::trim).filter(|m| !m.is_empty()) {
        Some(m) => m.to_string(),
        None => ERROR_GENERICO.to_string(),
    }
}
