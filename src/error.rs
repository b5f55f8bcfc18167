use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::alertas::{generic_error_message, permission_denied_message};

/// Cuerpo de error que devuelve el backend. Todos los campos son opcionales;
/// `roleLabel`/`associated` sólo aparecen en conflictos de correo duplicado.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorPayload {
    #[serde(default, deserialize_with = "message_text")]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub role_label: Option<String>,
    #[serde(default)]
    pub associated: Option<Value>,
    #[serde(default, alias = "requiredPermission")]
    pub permission: Option<String>,
}

// `message` puede venir como cadena o como lista de validaciones.
fn message_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(match v {
        Some(Value::String(s)) => Some(s),
        Some(Value::Array(items)) => {
            let parts: Vec<String> = items.iter().filter_map(|i| i.as_str().map(str::to_string)).collect();
            if parts.is_empty() { None } else { Some(parts.join("; ")) }
        }
        _ => None,
    })
}

impl ApiErrorPayload {
    /// Intenta leer el cuerpo como JSON; cuerpos vacíos o HTML devuelven None.
    pub fn parse(body: &str) -> Option<ApiErrorPayload> {
        serde_json::from_str::<ApiErrorPayload>(body).ok()
    }

    pub fn server_message(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Error de red al contactar la API: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Sesión no autorizada")]
    Unauthorized,

    #[error("La sesión fue cerrada")]
    SessionClosed,

    #[error("{}", permission_denied_message(.permission.as_deref()))]
    Forbidden { permission: Option<String> },

    #[error("La API respondió {status}: {message}")]
    Upstream { status: u16, message: String, payload: Option<ApiErrorPayload> },

    #[error("Respuesta inválida de la API: {0}")]
    Decode(String),

    #[error("Error al exportar: {0}")]
    Export(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),
}

impl AppError {
    pub fn payload(&self) -> Option<&ApiErrorPayload> {
        match self {
            AppError::Upstream { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    /// Mensaje apto para el banner de la interfaz.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Upstream { payload, .. } => {
                generic_error_message(payload.as_ref().and_then(|p| p.server_message()))
            }
            AppError::Network(_) | AppError::Decode(_) => generic_error_message(None),
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Network(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            AppError::Network(_) | AppError::Decode(_) => StatusCode::BAD_GATEWAY,
            AppError::Unauthorized | AppError::SessionClosed => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::Upstream { status, .. } => match StatusCode::from_u16(*status) {
                Ok(s) if s.is_client_error() => s,
                _ => StatusCode::BAD_GATEWAY,
            },
            AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = json!({ "error": self.user_message() });
        if let AppError::Forbidden { permission: Some(p) } = self {
            body["permission"] = json!(p);
        }
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_mensaje_lista() {
        let p = ApiErrorPayload::parse(r#"{"message": ["email must be an email", "name should not be empty"]}"#)
            .expect("Debe parsear payload");
        assert_eq!(p.server_message(), Some("email must be an email; name should not be empty"));
        assert!(ApiErrorPayload::parse("<html>502</html>").is_none());
    }

    #[test]
    fn test_status_codes() {
        let e = AppError::Upstream { status: 404, message: "no".into(), payload: None };
        assert_eq!(e.status_code(), StatusCode::NOT_FOUND);
        let e = AppError::Upstream { status: 503, message: "caído".into(), payload: None };
        assert_eq!(e.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(AppError::SessionClosed.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden { permission: None }.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_user_message_upstream() {
        let payload = ApiErrorPayload { error: Some("Bus en mantenimiento".into()), ..Default::default() };
        let e = AppError::Upstream { status: 400, message: "x".into(), payload: Some(payload) };
        assert_eq!(e.user_message(), "Bus en mantenimiento");
        let e = AppError::Forbidden { permission: Some("rutas.ver".into()) };
        assert!(e.user_message().contains("rutas.ver"));
    }
}
