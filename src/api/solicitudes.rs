// Servicios de solicitudes genéricas y de taller mecánico.
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::client::push_param;
use super::ApiClient;
use crate::error::AppError;
use crate::models::{MechanicRequest, Request, RequestStatus};
use crate::sesion::Session;

/// Filtros que acepta `GET /requests`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "type")]
    pub request_type: Option<String>,
}

/// Cuerpo de `PATCH /requests/:id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
}

pub async fn get_all_requests(api: &ApiClient, session: &Session, filtros: &RequestQuery) -> Result<Vec<Request>, AppError> {
    let mut query = Vec::new();
    push_param(&mut query, "status", filtros.status.as_deref());
    push_param(&mut query, "requestType", filtros.request_type.as_deref());
    api.get_list(session, "/requests", &query).await
}

pub async fn get_request_by_id(api: &ApiClient, session: &Session, id: i64) -> Result<Request, AppError> {
    api.get_json(session, &format!("/requests/{}", id), &[]).await
}

pub async fn create_request(api: &ApiClient, session: &Session, body: &Value) -> Result<Request, AppError> {
    api.send_json(session, Method::POST, "/requests", body).await
}

pub async fn update_request_status(
    api: &ApiClient,
    session: &Session,
    id: i64,
    update: &StatusUpdate,
) -> Result<Request, AppError> {
    if update.status == RequestStatus::Unknown {
        return Err(AppError::BadRequest("estado de solicitud no válido".into()));
    }
    api.send_json(session, Method::PATCH, &format!("/requests/{}", id), update).await
}

pub async fn delete_request(api: &ApiClient, session: &Session, id: i64) -> Result<(), AppError> {
    api.delete(session, &format!("/requests/{}", id)).await
}

pub async fn get_all_mechanic_requests(
    api: &ApiClient,
    session: &Session,
    status: Option<&str>,
) -> Result<Vec<MechanicRequest>, AppError> {
    let mut query = Vec::new();
    push_param(&mut query, "status", status);
    api.get_list(session, "/mechanic-requests", &query).await
}

pub async fn get_mechanic_request_by_id(api: &ApiClient, session: &Session, id: i64) -> Result<MechanicRequest, AppError> {
    api.get_json(session, &format!("/mechanic-requests/{}", id), &[]).await
}

pub async fn update_mechanic_request(
    api: &ApiClient,
    session: &Session,
    id: i64,
    body: &Value,
) -> Result<MechanicRequest, AppError> {
    api.send_json(session, Method::PATCH, &format!("/mechanic-requests/{}", id), body).await
}

pub async fn delete_mechanic_request(api: &ApiClient, session: &Session, id: i64) -> Result<(), AppError> {
    api.delete(session, &format!("/mechanic-requests/{}", id)).await
}
