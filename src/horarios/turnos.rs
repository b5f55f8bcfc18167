use chrono::NaiveTime;

use crate::models::{Corporation, CorporationSchedule};

/// "14:00" -> "2:00 PM". Acepta "HH:MM" y "HH:MM:SS"; None si no parsea.
pub fn format_time_12h(hhmm: &str) -> Option<String> {
    let s = hhmm.trim();
    let t = NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()?;
    Some(t.format("%-I:%M %p").to_string())
}

fn hora_o_cruda(hhmm: &str) -> String {
    format_time_12h(hhmm).unwrap_or_else(|| hhmm.trim().to_string())
}

/// Texto de un turno: "Turno C — 2:00 PM - 6:00 PM".
pub fn schedule_label(schedule: &CorporationSchedule) -> String {
    format!(
        "{} — {} - {}",
        schedule.name.trim(),
        hora_o_cruda(&schedule.entry_time),
        hora_o_cruda(&schedule.exit_time)
    )
}

/// Resuelve `selectedSchedule` (índice en `corporation.schedules`) a su texto.
/// Índices fuera de rango o ausentes devuelven None.
pub fn resolve_schedule_label(corporation: &Corporation, selected: Option<usize>) -> Option<String> {
    let idx = selected?;
    corporation.schedules.get(idx).map(schedule_label)
}
