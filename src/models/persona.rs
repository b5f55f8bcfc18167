use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::de;

/// Estado activo en el backend (`state == 1`).
pub const ESTADO_ACTIVO: i64 = 1;
/// Estado inactivo en el backend (`state == 0`).
pub const ESTADO_INACTIVO: i64 = 0;

/// Colaborador de una corporación o empleado; ambos comparten forma y sólo
/// cambia la clave del detalle (`ColaboradorDetail` / `employeeDetail`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub email: String,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub state: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub corporation_id: Option<i64>,
    #[serde(
        default,
        alias = "ColaboradorDetail",
        alias = "colaboradorDetail",
        alias = "employeeDetail",
        alias = "EmployeeDetail"
    )]
    pub detail: Option<PersonaDetalle>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonaDetalle {
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub service_address: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub zone_or_sector: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub route_type: Option<String>,
    #[serde(default, deserialize_with = "de::opt_index")]
    pub selected_schedule: Option<usize>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub emergency_contact: Option<String>,
    /// Campos extra definidos por la corporación (`extraEnrollmentFields`).
    #[serde(default)]
    pub extra_fields: Option<Value>,
}

impl Persona {
    /// Nombre para mostrar: "Nombre Apellido" del detalle o, si falta, `name`.
    pub fn nombre_completo(&self) -> String {
        if let Some(d) = &self.detail {
            let full = format!("{} {}", d.first_name.trim(), d.last_name.trim());
            let full = full.trim();
            if !full.is_empty() {
                return full.to_string();
            }
        }
        self.name.trim().to_string()
    }

    pub fn is_activo(&self) -> bool {
        self.state == Some(ESTADO_ACTIVO)
    }

    pub fn estado_label(&self) -> &'static str {
        match self.state {
            Some(ESTADO_ACTIVO) => "Activo",
            Some(ESTADO_INACTIVO) => "Inactivo",
            _ => "Desconocido",
        }
    }

    pub fn selected_schedule(&self) -> Option<usize> {
        self.detail.as_ref().and_then(|d| d.selected_schedule)
    }

    /// Valor de un campo extra como texto (cadena, número o booleano).
    pub fn extra_field(&self, field_name: &str) -> Option<String> {
        let extra = self.detail.as_ref()?.extra_fields.as_ref()?;
        match extra.get(field_name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(if *b { "Sí".to_string() } else { "No".to_string() }),
            Value::Array(items) => Some(
                items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detalle_desde_colaborador_y_empleado() {
        let colab: Persona = serde_json::from_str(
            r#"{"id": 7, "name": "ana", "email": "ana@x.com", "state": "1",
                "ColaboradorDetail": {"firstName": "Ana", "lastName": "Pérez", "selectedSchedule": "2"}}"#,
        )
        .expect("Debe parsear colaborador");
        assert_eq!(colab.nombre_completo(), "Ana Pérez");
        assert_eq!(colab.selected_schedule(), Some(2));
        assert!(colab.is_activo());

        let emp: Persona = serde_json::from_str(
            r#"{"id": 8, "name": "Luis", "email": "l@x.com", "state": false,
                "employeeDetail": {"firstName": "", "lastName": null}}"#,
        )
        .expect("Debe parsear empleado");
        assert_eq!(emp.nombre_completo(), "Luis");
        assert_eq!(emp.estado_label(), "Inactivo");
    }

    #[test]
    fn test_extra_field_formatos() {
        let p: Persona = serde_json::from_str(
            r#"{"ColaboradorDetail": {"extraFields": {"Planta": "Norte", "Turnos": ["A", "B"], "Carnet": true}}}"#,
        )
        .unwrap();
        assert_eq!(p.extra_field("Planta").as_deref(), Some("Norte"));
        assert_eq!(p.extra_field("Turnos").as_deref(), Some("A, B"));
        assert_eq!(p.extra_field("Carnet").as_deref(), Some("Sí"));
        assert_eq!(p.extra_field("Nada"), None);
        assert_eq!(p.estado_label(), "Desconocido");
    }
}
