/// Quita tildes y diacríticos comunes del español/latin-1.
fn strip_diacritic(ch: char) -> char {
    match ch {
        'Á' | 'À' | 'Ä' | 'Â' | 'Ã' | 'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
        'É' | 'È' | 'Ë' | 'Ê' | 'é' | 'è' | 'ë' | 'ê' => 'e',
        'Í' | 'Ì' | 'Ï' | 'Î' | 'í' | 'ì' | 'ï' | 'î' => 'i',
        'Ó' | 'Ò' | 'Ö' | 'Ô' | 'Õ' | 'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'Ú' | 'Ù' | 'Ü' | 'Û' | 'ú' | 'ù' | 'ü' | 'û' => 'u',
        'Ñ' | 'ñ' => 'n',
        'Ç' | 'ç' => 'c',
        other => other,
    }
}

/// Clave normalizada para comparar textos ingresados por usuarios:
/// sin diacríticos, en minúsculas, espacios colapsados y recortados.
///
/// `normalize_key("Zoné 10  ") == "zone 10"`
pub fn normalize_key(s: &str) -> String {
    let plano: String = s
        .chars()
        .map(strip_diacritic)
        .flat_map(char::to_lowercase)
        .collect();
    plano.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Búsqueda por subcadena insensible a mayúsculas y tildes.
/// Una consulta vacía coincide con todo.
pub fn contains_normalized(haystack: &str, needle: &str) -> bool {
    let needle = normalize_key(needle);
    if needle.is_empty() {
        return true;
    }
    normalize_key(haystack).contains(&needle)
}
