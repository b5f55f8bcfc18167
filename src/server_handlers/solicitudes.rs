use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{descarga, generar, recargar_vista, registrar_recarga, AppState};
use crate::agregados::request_status_counts;
use crate::alertas::Notificacion;
use crate::api::solicitudes::{self, RequestQuery, StatusUpdate};
use crate::error::AppError;
use crate::exportar::{export_requests, XLSX_CONTENT_TYPE};
use crate::filtros::{filter_requests, paginate, Pagina};
use crate::models::{Request, RequestStatus};
use crate::sesion::Session;

#[derive(Debug, Default, Deserialize)]
pub struct SolicitudesQuery {
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub tipo: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl SolicitudesQuery {
    /// Estado pedido; texto no reconocido es un 400.
    fn status(&self) -> Result<Option<RequestStatus>, AppError> {
        match self.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(s) => RequestStatus::parse(s)
                .map(Some)
                .ok_or_else(|| AppError::BadRequest(format!("estado de solicitud desconocido: {}", s))),
        }
    }

    fn upstream(&self, status: Option<RequestStatus>) -> RequestQuery {
        RequestQuery { status: status.map(|s| s.as_wire().to_string()), request_type: self.tipo.clone() }
    }
}

#[derive(Debug, Serialize)]
pub struct ConteoEstado {
    pub status: RequestStatus,
    pub label: &'static str,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ListaSolicitudes {
    #[serde(flatten)]
    pub pagina: Pagina<Request>,
    pub conteo: Vec<ConteoEstado>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MecanicaQuery {
    pub status: Option<String>,
}

async fn cargar(state: &AppState, session: &Session, query: &SolicitudesQuery) -> Result<Vec<Request>, AppError> {
    let status = query.status()?;
    let lista = solicitudes::get_all_requests(&state.api, session, &query.upstream(status)).await?;
    Ok(filter_requests(lista, status, query.tipo.as_deref()))
}

/// GET /requests
/// `conteo` se calcula sobre la lista filtrada completa, antes de paginar.
pub async fn list_requests(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<SolicitudesQuery>,
) -> Result<HttpResponse, AppError> {
    let lista = cargar(&state, &session, &query).await?;
    let upstream = query.upstream(query.status()?);
    registrar_recarga(&state, &session, "solicitudes".to_string(), move |api, s| {
        let filtros = upstream.clone();
        async move { solicitudes::get_all_requests(&api, &s, &filtros).await }
    });

    let conteo = request_status_counts(&lista)
        .into_iter()
        .map(|(status, total)| ConteoEstado { status, label: status.label(), total })
        .collect();
    let pagina = paginate(lista, query.page.unwrap_or(1), query.per_page.unwrap_or(0));
    Ok(HttpResponse::Ok().json(ListaSolicitudes { pagina, conteo }))
}

/// GET /requests/export
pub async fn export_requests_xlsx(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<SolicitudesQuery>,
) -> Result<HttpResponse, AppError> {
    let lista = cargar(&state, &session, &query).await?;
    let bytes = generar(move || export_requests(&lista)).await?;
    Ok(descarga(bytes, XLSX_CONTENT_TYPE, "solicitudes.xlsx"))
}

/// POST /requests
pub async fn create_request(
    state: web::Data<AppState>,
    session: Session,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let creada = solicitudes::create_request(&state.api, &session, &body).await?;
    let refrescada = recargar_vista(&state, &session).await;
    Ok(HttpResponse::Created().json(json!({
        "data": creada,
        "notificacion": Notificacion::exito("Solicitud creada correctamente."),
        "refreshed": refrescada,
    })))
}

/// GET /requests/{id}
pub async fn get_request(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let solicitud = solicitudes::get_request_by_id(&state.api, &session, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(solicitud))
}

/// PATCH /requests/{id}/status
pub async fn update_request_status(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<StatusUpdate>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let actualizada = solicitudes::update_request_status(&state.api, &session, id, &body).await?;
    let refrescada = recargar_vista(&state, &session).await;
    Ok(HttpResponse::Ok().json(json!({ "data": actualizada, "refreshed": refrescada })))
}

/// DELETE /requests/{id}
pub async fn delete_request(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    solicitudes::delete_request(&state.api, &session, id).await?;
    let refrescada = recargar_vista(&state, &session).await;
    Ok(HttpResponse::Ok().json(json!({ "deleted": id, "refreshed": refrescada })))
}

/// GET /mechanic-requests
pub async fn list_mechanic_requests(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<MecanicaQuery>,
) -> Result<HttpResponse, AppError> {
    let status = query.status.clone();
    let lista = solicitudes::get_all_mechanic_requests(&state.api, &session, status.as_deref()).await?;
    registrar_recarga(&state, &session, "taller".to_string(), move |api, s| {
        let status = status.clone();
        async move { solicitudes::get_all_mechanic_requests(&api, &s, status.as_deref()).await }
    });
    Ok(HttpResponse::Ok().json(lista))
}

/// GET /mechanic-requests/{id}
pub async fn get_mechanic_request(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let solicitud = solicitudes::get_mechanic_request_by_id(&state.api, &session, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(solicitud))
}

/// PATCH /mechanic-requests/{id}
pub async fn update_mechanic_request(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let actualizada = solicitudes::update_mechanic_request(&state.api, &session, id, &body).await?;
    let refrescada = recargar_vista(&state, &session).await;
    Ok(HttpResponse::Ok().json(json!({ "data": actualizada, "refreshed": refrescada })))
}

/// DELETE /mechanic-requests/{id}
pub async fn delete_mechanic_request(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    solicitudes::delete_mechanic_request(&state.api, &session, id).await?;
    let refrescada = recargar_vista(&state, &session).await;
    Ok(HttpResponse::Ok().json(json!({ "deleted": id, "refreshed": refrescada })))
}
