// Helpers de deserialización tolerante.
//
// El backend no es consistente con los tipos: `state` llega como 1/0, "1"/"0"
// o true/false; `selectedSchedule` como número o cadena. Se normaliza aquí,
// una sola vez, para que el resto del crate trabaje con tipos concretos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn value_to_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(if *b { 1 } else { 0 }),
        _ => None,
    }
}

fn value_to_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    }
}

/// Entero opcional aceptando número, cadena numérica o booleano.
pub fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(v.as_ref().and_then(value_to_i64))
}

/// Índice opcional (>= 0) aceptando número o cadena numérica.
pub fn opt_index<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(v.as_ref().and_then(value_to_i64).and_then(|i| usize::try_from(i).ok()))
}

/// Decimal opcional; acepta "12,5" además de 12.5.
pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(v.as_ref().and_then(value_to_f64))
}

/// Cadena que puede llegar como null o como número (p. ej. ids o rutas).
pub fn string_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(match v {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

/// Igual que `string_or_default` pero conservando la ausencia.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(match v {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Fecha RFC 3339 opcional; formatos no reconocidos se descartan.
pub fn opt_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(match v {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s.trim()).ok().map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    })
}

/// Lista que puede llegar como null.
pub fn vec_or_default<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_to_i64_variantes() {
        assert_eq!(value_to_i64(&json!(1)), Some(1));
        assert_eq!(value_to_i64(&json!("0")), Some(0));
        assert_eq!(value_to_i64(&json!(true)), Some(1));
        assert_eq!(value_to_i64(&json!(2.0)), Some(2));
        assert_eq!(value_to_i64(&json!("abc")), None);
        assert_eq!(value_to_i64(&json!(null)), None);
    }

    #[test]
    fn test_value_to_f64_con_coma() {
        assert_eq!(value_to_f64(&json!("12,5")), Some(12.5));
        assert_eq!(value_to_f64(&json!(3)), Some(3.0));
    }
}
