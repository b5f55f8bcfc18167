//! Tablero de una persona (colaborador o empleado).
//!
//! Ambas vistas usan la misma construcción: datos de perfil, turno de la
//! corporación resuelto a texto y paradas etiquetadas por día.

use serde::Serialize;

use crate::api::{personas, ApiClient, TipoPersona};
use crate::error::AppError;
use crate::horarios::{group_slots_by_day, resolve_schedule_label, summarize_schedule, tag_slots_by_day};
use crate::models::{Corporation, Persona, ScheduleSlot, TaggedSlot};
use crate::sesion::Session;

pub const SIN_HORARIO: &str = "Sin horario";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DiaParadas {
    pub dia: String,
    pub paradas: Vec<TaggedSlot>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CampoExtra {
    pub nombre: String,
    pub valor: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardView {
    pub id: Option<i64>,
    pub nombre: String,
    pub email: String,
    pub telefono: Option<String>,
    pub estado: &'static str,
    pub direccion: Option<String>,
    pub zona: Option<String>,
    pub tipo_ruta: Option<String>,
    pub contacto_emergencia: Option<String>,
    pub horario: String,
    pub resumen_semanal: String,
    pub dias: Vec<DiaParadas>,
    pub campos_extra: Vec<CampoExtra>,
    /// Rutas que ofrece la corporación.
    pub rutas: Vec<String>,
}

/// Arma la vista a partir de los tres recursos ya obtenidos.
pub fn build_dashboard(persona: &Persona, corporation: &Corporation, slots: &[ScheduleSlot]) -> DashboardView {
    let tagged = tag_slots_by_day(&group_slots_by_day(slots));
    let resumen_semanal = summarize_schedule(&tagged);
    let horario = resolve_schedule_label(corporation, persona.selected_schedule())
        .unwrap_or_else(|| SIN_HORARIO.to_string());

    let detalle = persona.detail.as_ref();
    let campos_extra = corporation
        .extra_enrollment_fields
        .iter()
        .map(|f| CampoExtra { nombre: f.field_name.clone(), valor: persona.extra_field(&f.field_name) })
        .collect();

    DashboardView {
        id: persona.id,
        nombre: persona.nombre_completo(),
        email: persona.email.clone(),
        telefono: persona.phone_number.clone(),
        estado: persona.estado_label(),
        direccion: detalle.and_then(|d| d.service_address.clone()),
        zona: detalle.and_then(|d| d.zone_or_sector.clone()),
        tipo_ruta: detalle.and_then(|d| d.route_type.clone()),
        contacto_emergencia: detalle.and_then(|d| d.emergency_contact.clone()),
        horario,
        resumen_semanal,
        dias: tagged.into_iter().map(|(dia, paradas)| DiaParadas { dia, paradas }).collect(),
        campos_extra,
        rutas: corporation.route_numbers(),
    }
}

/// Obtiene perfil, corporación y paradas en paralelo y arma el tablero.
/// Si cualquiera de las tres llamadas falla, falla el tablero completo.
pub async fn load_dashboard(
    api: &ApiClient,
    session: &Session,
    tipo: TipoPersona,
    corporation_id: i64,
    persona_id: i64,
) -> Result<DashboardView, AppError> {
    let (persona, corporation, slots) = tokio::try_join!(
        personas::get_persona(api, session, tipo, corporation_id, persona_id),
        personas::get_corporation(api, session, corporation_id),
        personas::get_schedule_slots(api, session, tipo, persona_id),
    )?;
    Ok(build_dashboard(&persona, &corporation, &slots))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CorporationSchedule, ExtraField, SlotLabel};

    #[test]
    fn test_build_dashboard_completo() {
        let persona: Persona = serde_json::from_str(
            r#"{"id": 5, "name": "kp", "email": "k@x.com", "state": 1,
                "ColaboradorDetail": {"firstName": "Karla", "lastName": "Paz", "selectedSchedule": 0,
                                      "zoneOrSector": "Zona 10", "extraFields": {"Planta": "Sur"}}}"#,
        )
        .unwrap();
        let corp = Corporation {
            schedules: vec![CorporationSchedule { name: "Diurno".into(), entry_time: "07:00".into(), exit_time: "15:30".into() }],
            extra_enrollment_fields: vec![
                ExtraField { field_name: "Planta".into(), ..Default::default() },
                ExtraField { field_name: "Área".into(), ..Default::default() },
            ],
            route_numbers: vec![serde_json::json!(12), serde_json::json!("12-B"), serde_json::Value::Null],
            ..Default::default()
        };
        let slots = vec![
            ScheduleSlot { time: "06:40".into(), days: vec!["Lunes".into(), "Martes".into()], ..Default::default() },
            ScheduleSlot { time: "15:45".into(), days: vec!["Lunes".into()], ..Default::default() },
        ];

        let v = build_dashboard(&persona, &corp, &slots);
        assert_eq!(v.nombre, "Karla Paz");
        assert_eq!(v.estado, "Activo");
        assert_eq!(v.horario, "Diurno — 7:00 AM - 3:30 PM");
        assert_eq!(v.resumen_semanal, "06:40 - 15:45");
        assert_eq!(v.dias.len(), 2);
        assert_eq!(v.dias[0].paradas[0].label, SlotLabel::Entrada);
        assert_eq!(v.dias[1].paradas[0].label, SlotLabel::Parada);
        assert_eq!(v.campos_extra[0].valor.as_deref(), Some("Sur"));
        assert_eq!(v.campos_extra[1].valor, None);
        assert_eq!(v.rutas, vec!["12".to_string(), "12-B".to_string()]);
    }

    #[test]
    fn test_sin_turno_seleccionado() {
        let v = build_dashboard(&Persona::default(), &Corporation::default(), &[]);
        assert_eq!(v.horario, SIN_HORARIO);
        assert_eq!(v.resumen_semanal, "");
        assert!(v.dias.is_empty());
        assert!(v.rutas.is_empty());
    }
}
