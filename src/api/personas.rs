// Servicios de colaboradores y empleados. Ambos recursos tienen la misma
// forma; sólo cambia el segmento de ruta.
use reqwest::Method;
use serde_json::{json, Value};

use super::ApiClient;
use crate::error::AppError;
use crate::models::{Corporation, Persona, ScheduleSlot};
use crate::sesion::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipoPersona {
    Colaborador,
    Empleado,
}

impl TipoPersona {
    fn coleccion(&self) -> &'static str {
        match self {
            TipoPersona::Colaborador => "colaboradores",
            TipoPersona::Empleado => "employees",
        }
    }

    fn slots_segment(&self) -> &'static str {
        match self {
            TipoPersona::Colaborador => "colaborador",
            TipoPersona::Empleado => "employee",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TipoPersona::Colaborador => "Colaboradores",
            TipoPersona::Empleado => "Empleados",
        }
    }
}

fn base(tipo: TipoPersona, corporation_id: i64) -> String {
    format!("/corporations/{}/{}", corporation_id, tipo.coleccion())
}

pub async fn get_corporation(api: &ApiClient, session: &Session, corporation_id: i64) -> Result<Corporation, AppError> {
    api.get_json(session, &format!("/corporations/{}", corporation_id), &[]).await
}

pub async fn list_personas(
    api: &ApiClient,
    session: &Session,
    tipo: TipoPersona,
    corporation_id: i64,
) -> Result<Vec<Persona>, AppError> {
    api.get_list(session, &base(tipo, corporation_id), &[]).await
}

pub async fn get_persona(
    api: &ApiClient,
    session: &Session,
    tipo: TipoPersona,
    corporation_id: i64,
    id: i64,
) -> Result<Persona, AppError> {
    api.get_json(session, &format!("{}/{}", base(tipo, corporation_id), id), &[]).await
}

/// El cuerpo se reenvía tal cual: los campos extra de la corporación no
/// tienen forma fija.
pub async fn create_persona(
    api: &ApiClient,
    session: &Session,
    tipo: TipoPersona,
    corporation_id: i64,
    body: &Value,
) -> Result<Value, AppError> {
    api.send_json(session, Method::POST, &base(tipo, corporation_id), body).await
}

pub async fn update_persona(
    api: &ApiClient,
    session: &Session,
    tipo: TipoPersona,
    corporation_id: i64,
    id: i64,
    body: &Value,
) -> Result<Value, AppError> {
    api.send_json(session, Method::PUT, &format!("{}/{}", base(tipo, corporation_id), id), body).await
}

pub async fn delete_persona(
    api: &ApiClient,
    session: &Session,
    tipo: TipoPersona,
    corporation_id: i64,
    id: i64,
) -> Result<(), AppError> {
    api.delete(session, &format!("{}/{}", base(tipo, corporation_id), id)).await
}

/// Cambia `state` (1 activo, 0 inactivo).
pub async fn set_state(
    api: &ApiClient,
    session: &Session,
    tipo: TipoPersona,
    corporation_id: i64,
    id: i64,
    activo: bool,
) -> Result<Value, AppError> {
    let body = json!({ "state": if activo { 1 } else { 0 } });
    update_persona(api, session, tipo, corporation_id, id, &body).await
}

pub async fn get_schedule_slots(
    api: &ApiClient,
    session: &Session,
    tipo: TipoPersona,
    persona_id: i64,
) -> Result<Vec<ScheduleSlot>, AppError> {
    api.get_list(session, &format!("/schedule-slots/{}/{}", tipo.slots_segment(), persona_id), &[])
        .await
}
