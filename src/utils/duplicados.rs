use serde_json::Value;

use crate::alertas::Notificacion;
use crate::error::ApiErrorPayload;

// Artículo y participio concordados con el rol ("una monitora asociada").
fn concordancia(role: &str) -> (&'static str, &'static str) {
    if role.trim().to_lowercase().ends_with('a') {
        ("una", "asociada")
    } else {
        ("un", "asociado")
    }
}

fn english_article(role: &str) -> &'static str {
    match role.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

/// Texto en español y en inglés de la entidad asociada (colegio o corporación).
fn describe_associated(associated: &Value) -> Option<(String, String)> {
    match associated {
        Value::String(s) if !s.trim().is_empty() => Some((format!("a {}", s.trim()), s.trim().to_string())),
        Value::Object(o) => {
            let name = o.get("name").or_else(|| o.get("nombre")).and_then(Value::as_str)?.trim();
            if name.is_empty() {
                return None;
            }
            let kind = o
                .get("type")
                .or_else(|| o.get("tipo"))
                .and_then(Value::as_str)
                .map(crate::utils::normalize_key)
                .unwrap_or_default();
            match kind.as_str() {
                "school" | "colegio" => Some((format!("al colegio {}", name), format!("the school {}", name))),
                "corporation" | "corporacion" => {
                    Some((format!("a la corporación {}", name), format!("the corporation {}", name)))
                }
                _ => Some((format!("a {}", name), name.to_string())),
            }
        }
        _ => None,
    }
}

/// Construye el mensaje bilingüe para un correo ya registrado con otro rol.
pub fn duplicate_email_message(role_label: &str, associated: Option<&Value>) -> String {
    let role = role_label.trim();
    let (articulo, participio) = concordancia(role);
    let asociado = associated.and_then(describe_associated);

    let mut es = format!("Este correo ya está registrado como {} {}", articulo, role);
    let mut en = format!("This email is already registered as {} {}", english_article(role), role);
    if let Some((es_assoc, en_assoc)) = asociado {
        es.push_str(&format!(" {} {}", participio, es_assoc));
        en.push_str(&format!(" associated with {}", en_assoc));
    }
    format!("{}. / {}.", es, en)
}

/// Detecta un conflicto de correo duplicado en la respuesta de error.
///
/// Devuelve `true` y notifica una sola vez cuando el payload trae
/// `roleLabel`; en cualquier otro caso devuelve `false` sin notificar, para
/// que quien llama use su mensaje genérico.
pub fn handle_duplicate_email_error<F>(payload: &ApiErrorPayload, mut notify: F) -> bool
where
    F: FnMut(Notificacion),
{
    let role = match payload.role_label.as_deref().map(str::trim) {
        Some(r) if !r.is_empty() => r,
        _ => return false,
    };
    notify(Notificacion::error(duplicate_email_message(role, payload.associated.as_ref())));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_concordancia_rol() {
        assert_eq!(concordancia("monitora"), ("una", "asociada"));
        assert_eq!(concordancia("piloto"), ("un", "asociado"));
    }

    #[test]
    fn test_mensaje_con_colegio() {
        let msg = duplicate_email_message("monitora", Some(&json!({"type": "school", "name": "Colegio Sol"})));
        assert!(msg.contains("una monitora asociada al colegio Colegio Sol"));
        assert!(msg.contains("associated with the school Colegio Sol"));
    }

    #[test]
    fn test_mensaje_sin_asociado() {
        let msg = duplicate_email_message("administrador", None);
        assert_eq!(
            msg,
            "Este correo ya está registrado como un administrador. / This email is already registered as an administrador."
        );
    }
}
