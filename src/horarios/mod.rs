//! Lógica de horarios compartida por los tableros de colaboradores y empleados.

pub mod etiquetas;
pub mod turnos;

pub use etiquetas::{day_index, group_slots_by_day, summarize_schedule, tag_slots_by_day, tag_slots_for_day, SIN_DIA};
pub use turnos::{format_time_12h, resolve_schedule_label, schedule_label};
