//! Etiquetado de paradas por día.
//!
//! Para cada día, la primera parada (por hora) es la Entrada, la última la
//! Salida y las demás Paradas. Un día con una sola parada la marca como
//! Parada.
//!
//! La comparación de horas es lexicográfica sobre la cadena "HH:MM", igual
//! que en los datos del backend: horas sin cero a la izquierda ("9:05")
//! quedan después de "10:00".

use crate::models::{ScheduleSlot, SlotLabel, TaggedSlot};
use crate::utils::normalize_key;

const SEMANA: [(&str, &str); 7] = [
    ("lunes", "monday"),
    ("martes", "tuesday"),
    ("miercoles", "wednesday"),
    ("jueves", "thursday"),
    ("viernes", "friday"),
    ("sabado", "saturday"),
    ("domingo", "sunday"),
];

/// Posición del día en la semana (lunes = 0). Acepta nombres en español o
/// inglés, completos o abreviados a 3 letras.
pub fn day_index(day: &str) -> Option<usize> {
    let key = normalize_key(day);
    if key.is_empty() {
        return None;
    }
    SEMANA.iter().position(|(es, en)| {
        key == *es || key == *en || (key.len() == 3 && (es.starts_with(&key) || en.starts_with(&key)))
    })
}

/// Ordena las paradas de un día y les asigna etiqueta.
pub fn tag_slots_for_day(slots: &[ScheduleSlot]) -> Vec<TaggedSlot> {
    let mut ordenados: Vec<ScheduleSlot> = slots.to_vec();
    // sort_by es estable: horas iguales conservan el orden recibido
    ordenados.sort_by(|a, b| a.time.cmp(&b.time));

    let n = ordenados.len();
    ordenados
        .into_iter()
        .enumerate()
        .map(|(i, slot)| {
            let label = if n == 1 {
                SlotLabel::Parada
            } else if i == 0 {
                SlotLabel::Entrada
            } else if i == n - 1 {
                SlotLabel::Salida
            } else {
                SlotLabel::Parada
            };
            TaggedSlot { slot, label }
        })
        .collect()
}

/// Grupo para paradas que no indican ningún día.
pub const SIN_DIA: &str = "Sin día";

/// Agrupa las paradas por día. Una parada con varios días aparece en cada
/// uno. Los días conocidos van en orden de semana; el resto después, en
/// orden alfabético, y al final el grupo `SIN_DIA` si alguna parada no
/// trae días.
pub fn group_slots_by_day(slots: &[ScheduleSlot]) -> Vec<(String, Vec<ScheduleSlot>)> {
    let mut grupos: Vec<(String, String, Vec<ScheduleSlot>)> = Vec::new();
    let mut sin_dia: Vec<ScheduleSlot> = Vec::new();

    for slot in slots {
        if slot.days.iter().all(|d| normalize_key(d).is_empty()) {
            sin_dia.push(slot.clone());
            continue;
        }
        let mut vistos: Vec<String> = Vec::new();
        for day in &slot.days {
            let key = normalize_key(day);
            if key.is_empty() || vistos.contains(&key) {
                continue;
            }
            vistos.push(key.clone());
            match grupos.iter_mut().find(|(k, _, _)| *k == key) {
                Some((_, _, lista)) => lista.push(slot.clone()),
                None => grupos.push((key, day.trim().to_string(), vec![slot.clone()])),
            }
        }
    }

    grupos.sort_by(|(ka, _, _), (kb, _, _)| match (day_index(ka), day_index(kb)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => ka.cmp(kb),
    });

    let mut out: Vec<(String, Vec<ScheduleSlot>)> = grupos.into_iter().map(|(_, day, lista)| (day, lista)).collect();
    if !sin_dia.is_empty() {
        out.push((SIN_DIA.to_string(), sin_dia));
    }
    out
}

/// Aplica `tag_slots_for_day` a cada día.
pub fn tag_slots_by_day(by_day: &[(String, Vec<ScheduleSlot>)]) -> Vec<(String, Vec<TaggedSlot>)> {
    by_day
        .iter()
        .map(|(day, slots)| (day.clone(), tag_slots_for_day(slots)))
        .collect()
}

/// Resumen semanal "<Entrada más temprana> - <Salida más tardía>".
///
/// Si la semana no tiene ni Entrada ni Salida devuelve cadena vacía; si
/// falta sólo una, ese lado queda vacío.
pub fn summarize_schedule(tagged_by_day: &[(String, Vec<TaggedSlot>)]) -> String {
    let mut entrada: Option<&str> = None;
    let mut salida: Option<&str> = None;

    for (_, slots) in tagged_by_day {
        for t in slots {
            let time = t.slot.time.as_str();
            match t.label {
                SlotLabel::Entrada => {
                    if entrada.map_or(true, |e| time < e) {
                        entrada = Some(time);
                    }
                }
                SlotLabel::Salida => {
                    if salida.map_or(true, |s| time > s) {
                        salida = Some(time);
                    }
                }
                SlotLabel::Parada => {}
            }
        }
    }

    if entrada.is_none() && salida.is_none() {
        return String::new();
    }
    format!("{} - {}", entrada.unwrap_or(""), salida.unwrap_or(""))
}
