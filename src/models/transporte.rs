use serde::{Deserialize, Serialize};

use super::de;

/// Registro de asistencia de una ruta escolar.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub fecha: String,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub day: String,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub schedule: String,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub monitora: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub piloto: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub bus: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub school: Option<String>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub total_alumnos: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub alumnos_presentes: Option<i64>,
}

impl Attendance {
    /// Porcentaje de presentes (0-100); None si no hay total.
    pub fn porcentaje(&self) -> Option<f64> {
        let total = self.total_alumnos.filter(|t| *t > 0)?;
        let presentes = self.alumnos_presentes.unwrap_or(0);
        Some(presentes as f64 * 100.0 / total as f64)
    }
}

/// Entrada del historial de rutas de un transportista.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteHistoryEntry {
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub fecha: String,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub ruta: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub bus: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub piloto: Option<String>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub kilometros: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub estado: Option<String>,
}

/// Kilómetros recorridos por bus en una fecha.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KmStat {
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub fecha: String,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub bus: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub piloto: Option<String>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub kilometros: Option<f64>,
}

/// Respuesta paginada del backend (`{ data, total, page, limit }`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    #[serde(default = "Vec::new", alias = "items", alias = "rows")]
    pub data: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default)]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_porcentaje_asistencia() {
        let a = Attendance { total_alumnos: Some(40), alumnos_presentes: Some(30), ..Default::default() };
        assert_eq!(a.porcentaje(), Some(75.0));
        let sin_total = Attendance { total_alumnos: Some(0), ..Default::default() };
        assert_eq!(sin_total.porcentaje(), None);
    }

    #[test]
    fn test_page_con_alias_rows() {
        let p: Page<KmStat> = serde_json::from_str(
            r#"{"rows": [{"fecha": "2024-05-01", "bus": 12, "kilometros": "35,5"}], "total": 1}"#,
        )
        .expect("Debe parsear página");
        assert_eq!(p.page, 1);
        assert_eq!(p.data[0].bus.as_deref(), Some("12"));
        assert_eq!(p.data[0].kilometros, Some(35.5));
    }
}
