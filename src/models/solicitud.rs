use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::de;

/// Vocabulario fijo de estados de una solicitud.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    InReview,
    Approved,
    Rejected,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 6] = [
        RequestStatus::Pending,
        RequestStatus::InReview,
        RequestStatus::Approved,
        RequestStatus::Rejected,
        RequestStatus::Completed,
        RequestStatus::Cancelled,
    ];

    /// Valor tal como lo espera el backend.
    pub fn as_wire(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::InReview => "in_review",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Completed => "completed",
            RequestStatus::Cancelled => "cancelled",
            RequestStatus::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pendiente",
            RequestStatus::InReview => "En revisión",
            RequestStatus::Approved => "Aprobada",
            RequestStatus::Rejected => "Rechazada",
            RequestStatus::Completed => "Completada",
            RequestStatus::Cancelled => "Cancelada",
            RequestStatus::Unknown => "Desconocido",
        }
    }

    /// Acepta el valor de wire o la etiqueta en español.
    pub fn parse(s: &str) -> Option<RequestStatus> {
        let key = crate::utils::normalize_key(s).replace(' ', "_");
        RequestStatus::ALL.into_iter().find(|st| {
            st.as_wire() == key || crate::utils::normalize_key(st.label()).replace(' ', "_") == key
        })
    }
}

// Estados fuera del vocabulario, null o no textuales quedan como Unknown
// sin invalidar el registro completo.
fn status_lenient<'de, D>(deserializer: D) -> Result<RequestStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::String(s) => RequestStatus::parse(&s).unwrap_or(RequestStatus::Unknown),
        _ => RequestStatus::Unknown,
    })
}

/// Solicitud genérica de usuario (ticket).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub request_type: String,
    #[serde(default, deserialize_with = "status_lenient")]
    pub status: RequestStatus,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub title: String,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "de::opt_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::opt_datetime")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reviewer: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub review_notes: Option<String>,
}

impl Request {
    /// Nombre del revisor; el backend lo envía como objeto `{name}` o cadena.
    pub fn reviewer_name(&self) -> Option<String> {
        match self.reviewer.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(o) => o.get("name").and_then(|v| v.as_str()).map(str::to_string),
            _ => None,
        }
    }
}

/// Ticket de taller mecánico.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MechanicRequest {
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub bus_id: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub placa: Option<String>,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub tipo: String,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub descripcion: Option<String>,
    #[serde(default, deserialize_with = "status_lenient")]
    pub status: RequestStatus,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "de::opt_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub mechanic: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_desconocido_no_rompe() {
        let r: Request = serde_json::from_str(r#"{"id": 1, "status": "archived", "title": "x"}"#).unwrap();
        assert_eq!(r.status, RequestStatus::Unknown);
        let r: Request = serde_json::from_str(r#"{"id": 2, "status": "in_review"}"#).unwrap();
        assert_eq!(r.status, RequestStatus::InReview);
        assert_eq!(r.status.label(), "En revisión");
    }

    #[test]
    fn test_status_nulo_o_numerico_es_desconocido() {
        let r: Request = serde_json::from_str(r#"{"id": 3, "status": null}"#).unwrap();
        assert_eq!(r.status, RequestStatus::Unknown);
        let r: Request = serde_json::from_str(r#"{"id": 4, "status": 2, "title": "x"}"#).unwrap();
        assert_eq!(r.status, RequestStatus::Unknown);
        assert_eq!(r.title, "x");
        let m: MechanicRequest = serde_json::from_str(r#"{"id": 5, "status": {"x": 1}}"#).unwrap();
        assert_eq!(m.status, RequestStatus::Unknown);
    }

    #[test]
    fn test_parse_status_wire_y_etiqueta() {
        assert_eq!(RequestStatus::parse("in_review"), Some(RequestStatus::InReview));
        assert_eq!(RequestStatus::parse("En Revisión"), Some(RequestStatus::InReview));
        assert_eq!(RequestStatus::parse("aprobada"), Some(RequestStatus::Approved));
        assert_eq!(RequestStatus::parse("otra"), None);
    }

    #[test]
    fn test_reviewer_objeto_o_cadena() {
        let r: Request = serde_json::from_str(r#"{"reviewer": {"name": "Marta"}}"#).unwrap();
        assert_eq!(r.reviewer_name().as_deref(), Some("Marta"));
        let r: Request = serde_json::from_str(r#"{"reviewer": "Jorge"}"#).unwrap();
        assert_eq!(r.reviewer_name().as_deref(), Some("Jorge"));
    }
}
