use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use super::{descarga, generar, recargar_vista, registrar_recarga, AppState};
use crate::alertas::Notificacion;
use crate::api::{personas, TipoPersona};
use crate::dashboard::load_dashboard;
use crate::error::AppError;
use crate::exportar::{export_personas, XLSX_CONTENT_TYPE};
use crate::filtros::{filter_by_estado, paginate, search_personas, sort_personas, EstadoFiltro, OrdenPersonas};
use crate::models::Persona;
use crate::sesion::Session;
use crate::utils::handle_duplicate_email_error;

/// Parámetros de la tabla de colaboradores.
#[derive(Debug, Default, Deserialize)]
pub struct ListaQuery {
    pub estado: Option<String>,
    pub q: Option<String>,
    pub orden: Option<String>,
    pub asc: Option<bool>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl ListaQuery {
    fn aplicar(&self, personas: Vec<Persona>) -> Vec<Persona> {
        let estado = self.estado.as_deref().map(EstadoFiltro::parse).unwrap_or_default();
        let mut out = filter_by_estado(personas, estado);
        if let Some(q) = self.q.as_deref() {
            out = search_personas(out, q);
        }
        let orden = self.orden.as_deref().map(OrdenPersonas::parse).unwrap_or_default();
        sort_personas(&mut out, orden, self.asc.unwrap_or(true));
        out
    }
}

#[derive(Debug, Deserialize)]
pub struct EstadoBody {
    pub activo: bool,
}

/// Si el backend rechazó el correo por estar registrado con otro rol, el
/// error pasa a 409 con el mensaje bilingüe.
fn conflicto_correo(e: AppError) -> AppError {
    let mut mensaje = None;
    if let Some(payload) = e.payload() {
        handle_duplicate_email_error(payload, |n| mensaje = Some(n.mensaje));
    }
    match mensaje {
        Some(m) => {
            warn!(error = %e, "correo duplicado");
            AppError::Conflict(m)
        }
        None => e,
    }
}

/// GET /corporations/{cid}/colaboradores
pub async fn list_colaboradores(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<i64>,
    query: web::Query<ListaQuery>,
) -> Result<HttpResponse, AppError> {
    let cid = path.into_inner();
    let lista = personas::list_personas(&state.api, &session, TipoPersona::Colaborador, cid).await?;
    registrar_recarga(&state, &session, format!("colaboradores:{}", cid), move |api, s| async move {
        personas::list_personas(&api, &s, TipoPersona::Colaborador, cid).await
    });

    let filtradas = query.aplicar(lista);
    Ok(HttpResponse::Ok().json(paginate(filtradas, query.page.unwrap_or(1), query.per_page.unwrap_or(0))))
}

/// POST /corporations/{cid}/colaboradores
pub async fn create_colaborador(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let cid = path.into_inner();
    let creado = personas::create_persona(&state.api, &session, TipoPersona::Colaborador, cid, &body)
        .await
        .map_err(conflicto_correo)?;
    let refrescada = recargar_vista(&state, &session).await;
    Ok(HttpResponse::Created().json(json!({
        "data": creado,
        "notificacion": Notificacion::exito("Colaborador creado correctamente."),
        "refreshed": refrescada,
    })))
}

/// PUT /corporations/{cid}/colaboradores/{id}
pub async fn update_colaborador(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<(i64, i64)>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let (cid, id) = path.into_inner();
    let actualizado = personas::update_persona(&state.api, &session, TipoPersona::Colaborador, cid, id, &body)
        .await
        .map_err(conflicto_correo)?;
    let refrescada = recargar_vista(&state, &session).await;
    Ok(HttpResponse::Ok().json(json!({ "data": actualizado, "refreshed": refrescada })))
}

/// DELETE /corporations/{cid}/colaboradores/{id}
pub async fn delete_colaborador(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, AppError> {
    let (cid, id) = path.into_inner();
    personas::delete_persona(&state.api, &session, TipoPersona::Colaborador, cid, id).await?;
    let refrescada = recargar_vista(&state, &session).await;
    Ok(HttpResponse::Ok().json(json!({ "deleted": id, "refreshed": refrescada })))
}

/// PATCH /corporations/{cid}/colaboradores/{id}/estado
pub async fn set_estado_colaborador(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<(i64, i64)>,
    body: web::Json<EstadoBody>,
) -> Result<HttpResponse, AppError> {
    let (cid, id) = path.into_inner();
    let actualizado = personas::set_state(&state.api, &session, TipoPersona::Colaborador, cid, id, body.activo).await?;
    let refrescada = recargar_vista(&state, &session).await;
    Ok(HttpResponse::Ok().json(json!({ "data": actualizado, "refreshed": refrescada })))
}

async fn dashboard(
    state: &AppState,
    session: &Session,
    tipo: TipoPersona,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, AppError> {
    let (cid, id) = path.into_inner();
    let vista = load_dashboard(&state.api, session, tipo, cid, id).await?;
    Ok(HttpResponse::Ok().json(vista))
}

/// GET /corporations/{cid}/colaboradores/{id}/dashboard
pub async fn dashboard_colaborador(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, AppError> {
    dashboard(&state, &session, TipoPersona::Colaborador, path).await
}

/// GET /corporations/{cid}/employees/{id}/dashboard
pub async fn dashboard_empleado(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, AppError> {
    dashboard(&state, &session, TipoPersona::Empleado, path).await
}

/// GET /corporations/{cid}/colaboradores/export
/// Respeta los mismos filtros de la tabla (estado, q, orden) sin paginar.
pub async fn export_colaboradores(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<i64>,
    query: web::Query<ListaQuery>,
) -> Result<HttpResponse, AppError> {
    let cid = path.into_inner();
    let (lista, corporation) = tokio::try_join!(
        personas::list_personas(&state.api, &session, TipoPersona::Colaborador, cid),
        personas::get_corporation(&state.api, &session, cid),
    )?;
    let filtradas = query.aplicar(lista);
    let bytes = generar(move || export_personas(TipoPersona::Colaborador.label(), &filtradas, &corporation)).await?;
    Ok(descarga(bytes, XLSX_CONTENT_TYPE, &format!("colaboradores-{}.xlsx", cid)))
}
