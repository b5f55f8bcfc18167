use serde_json::json;
use transporte_admin::alertas::Notificacion;
use transporte_admin::error::ApiErrorPayload;
use transporte_admin::filtros::{filter_by_estado, EstadoFiltro};
use transporte_admin::horarios::{resolve_schedule_label, tag_slots_for_day};
use transporte_admin::models::{Corporation, Persona, ScheduleSlot, SlotLabel};
use transporte_admin::utils::{handle_duplicate_email_error, normalize_key};

fn slot(time: &str) -> ScheduleSlot {
    ScheduleSlot { time: time.to_string(), days: vec!["Lunes".into()], ..Default::default() }
}

#[test]
fn test_etiquetas_tres_paradas() {
    let tagged = tag_slots_for_day(&[slot("09:00"), slot("08:00"), slot("08:15")]);
    let labels: Vec<SlotLabel> = tagged.iter().map(|t| t.label).collect();
    assert_eq!(labels, vec![SlotLabel::Entrada, SlotLabel::Parada, SlotLabel::Salida]);
    assert_eq!(tagged[0].slot.time, "08:00");
    assert_eq!(tagged[2].slot.time, "09:00");
}

#[test]
fn test_etiquetas_conteos() {
    assert!(tag_slots_for_day(&[]).is_empty());

    let uno = tag_slots_for_day(&[slot("07:00")]);
    assert_eq!(uno.len(), 1);
    assert_eq!(uno[0].label, SlotLabel::Parada);

    let dos = tag_slots_for_day(&[slot("16:00"), slot("07:00")]);
    assert_eq!(dos[0].label, SlotLabel::Entrada);
    assert_eq!(dos[1].label, SlotLabel::Salida);

    let cinco = tag_slots_for_day(&[slot("06:00"), slot("06:30"), slot("07:00"), slot("07:30"), slot("08:00")]);
    let paradas = cinco.iter().filter(|t| t.label == SlotLabel::Parada).count();
    assert_eq!(paradas, 3);
}

#[test]
fn test_orden_lexico_de_horas() {
    // "10:00" < "9:05" al comparar como texto
    let tagged = tag_slots_for_day(&[slot("9:05"), slot("10:00")]);
    let horas: Vec<&str> = tagged.iter().map(|t| t.slot.time.as_str()).collect();
    assert_eq!(horas, vec!["10:00", "9:05"]);
    assert_eq!(tagged[0].label, SlotLabel::Entrada);
}

#[test]
fn test_correo_duplicado_con_rol() {
    let payload = ApiErrorPayload {
        message: Some("Email already registered".into()),
        role_label: Some("monitora".into()),
        ..Default::default()
    };
    let mut recibidas: Vec<Notificacion> = Vec::new();
    assert!(handle_duplicate_email_error(&payload, |n| recibidas.push(n)));
    assert_eq!(recibidas.len(), 1);
    assert!(recibidas[0].mensaje.contains("una monitora"));
}

#[test]
fn test_correo_duplicado_sin_rol() {
    let payload = ApiErrorPayload { message: Some("Email already registered".into()), ..Default::default() };
    let mut llamadas = 0;
    assert!(!handle_duplicate_email_error(&payload, |_| llamadas += 1));
    assert_eq!(llamadas, 0);
}

#[test]
fn test_normalize_key() {
    assert_eq!(normalize_key("Zoné 10  "), "zone 10");
    for s in ["Zoné 10  ", "  MAÑANA  Ñuñoa", "Ágil\tÚnico"] {
        let una = normalize_key(s);
        assert_eq!(normalize_key(&una), una, "normalize_key debe ser idempotente para {:?}", s);
    }
}

#[test]
fn test_filtro_inactivo() {
    let personas: Vec<Persona> = serde_json::from_value(json!([
        {"id": 1, "name": "a", "state": 1},
        {"id": 2, "name": "b", "state": 0},
        {"id": 3, "name": "c", "state": "0"},
        {"id": 4, "name": "d"},
        {"id": 5, "name": "e", "state": 1}
    ]))
    .expect("Debe parsear personas");

    let inactivas = filter_by_estado(personas.clone(), EstadoFiltro::parse("Inactivo"));
    let ids: Vec<Option<i64>> = inactivas.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![Some(2), Some(3)]);
    assert!(inactivas.iter().all(|p| p.state == Some(0)));

    let activas = filter_by_estado(personas, EstadoFiltro::Activo);
    assert_eq!(activas.len(), 2);
}

#[test]
fn test_resolver_turno_por_indice() {
    let corp: Corporation = serde_json::from_value(json!({
        "schedules": [
            {"name": "Turno A", "entryTime": "06:00", "exitTime": "14:00"},
            {"name": "Turno B", "entryTime": "10:00", "exitTime": "18:00"},
            {"name": "Turno C", "entryTime": "14:00", "exitTime": "18:00"}
        ]
    }))
    .expect("Debe parsear corporación");
    let persona: Persona = serde_json::from_value(json!({
        "id": 9, "ColaboradorDetail": {"selectedSchedule": 2}
    }))
    .expect("Debe parsear colaborador");

    assert_eq!(
        resolve_schedule_label(&corp, persona.selected_schedule()).as_deref(),
        Some("Turno C — 2:00 PM - 6:00 PM")
    );
    assert_eq!(resolve_schedule_label(&corp, Some(3)), None);
    assert_eq!(resolve_schedule_label(&corp, None), None);
}
