use serde::{Deserialize, Serialize};

use super::de;

/// Punto de parada asignado a una persona.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSlot {
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub id: Option<i64>,
    /// Hora "HH:MM" tal como la guarda el backend; vacía si falta.
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub time: String,
    #[serde(default, deserialize_with = "de::vec_or_default")]
    pub days: Vec<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub route_number: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub note: Option<String>,
}

/// Etiqueta de un slot dentro de su día.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SlotLabel {
    Entrada,
    Salida,
    Parada,
}

impl SlotLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotLabel::Entrada => "Entrada",
            SlotLabel::Salida => "Salida",
            SlotLabel::Parada => "Parada",
        }
    }
}

/// Slot con su etiqueta calculada.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TaggedSlot {
    #[serde(flatten)]
    pub slot: ScheduleSlot,
    #[serde(rename = "_label")]
    pub label: SlotLabel,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CorporationSchedule {
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub entry_time: String,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub exit_time: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtraField {
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub field_name: String,
    #[serde(rename = "type", default, deserialize_with = "de::string_or_default")]
    pub field_type: String,
    #[serde(default, deserialize_with = "de::vec_or_default")]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Corporation {
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "de::vec_or_default")]
    pub schedules: Vec<CorporationSchedule>,
    #[serde(default, deserialize_with = "de::vec_or_default")]
    pub extra_enrollment_fields: Vec<ExtraField>,
    #[serde(default, deserialize_with = "de::vec_or_default")]
    pub route_numbers: Vec<serde_json::Value>,
}

impl Corporation {
    /// Números de ruta como texto, sin importar si llegan como número o cadena.
    pub fn route_numbers(&self) -> Vec<String> {
        self.route_numbers
            .iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect()
    }
}
