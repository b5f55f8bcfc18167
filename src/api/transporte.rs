// Asistencia, historial de rutas, kilometraje y comprobantes de pago.
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::client::push_param;
use super::ApiClient;
use crate::error::AppError;
use crate::filtros::AttendanceFilter;
use crate::models::{Attendance, KmStat, Page, RouteHistoryEntry};
use crate::sesion::Session;

pub async fn get_attendance(
    api: &ApiClient,
    session: &Session,
    filtro: &AttendanceFilter,
) -> Result<Vec<Attendance>, AppError> {
    let mut query = Vec::new();
    push_param(&mut query, "fecha", filtro.fecha.as_deref());
    push_param(&mut query, "monitora", filtro.monitora.as_deref());
    push_param(&mut query, "bus", filtro.bus.as_deref());
    push_param(&mut query, "school", filtro.school.as_deref());
    api.get_list(session, "/monitora/asistencia", &query).await
}

/// Rango y bus para historial y estadísticas de kilometraje.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KmQuery {
    #[serde(default)]
    pub desde: Option<String>,
    #[serde(default)]
    pub hasta: Option<String>,
    #[serde(default)]
    pub bus: Option<String>,
}

impl KmQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        push_param(&mut query, "desde", self.desde.as_deref());
        push_param(&mut query, "hasta", self.hasta.as_deref());
        push_param(&mut query, "bus", self.bus.as_deref());
        query
    }
}

pub async fn get_route_history(
    api: &ApiClient,
    session: &Session,
    page: u64,
    limit: u64,
    filtro: &KmQuery,
) -> Result<Page<RouteHistoryEntry>, AppError> {
    let mut query = filtro.params();
    query.push(("page", page.max(1).to_string()));
    query.push(("limit", limit.to_string()));
    api.get_json(session, "/transportistas/historial-rutas", &query).await
}

pub async fn get_km_stats(api: &ApiClient, session: &Session, filtro: &KmQuery) -> Result<Vec<KmStat>, AppError> {
    api.get_list(session, "/transportistas/estadisticas-kilometros", &filtro.params()).await
}

/// Reporte PDF generado por el backend.
pub async fn get_km_report_pdf(
    api: &ApiClient,
    session: &Session,
    filtro: &KmQuery,
) -> Result<(Vec<u8>, Option<String>), AppError> {
    api.get_bytes(session, "/transportistas/estadisticas-kilometros/reporte", &filtro.params()).await
}

/// Archivo de comprobante recibido del navegador.
#[derive(Debug, Clone)]
pub struct ReceiptFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

pub async fn upload_receipt(
    api: &ApiClient,
    session: &Session,
    file: ReceiptFile,
    fields: Vec<(String, String)>,
) -> Result<Value, AppError> {
    let mut part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
    if let Some(ct) = file.content_type.as_deref() {
        part = part
            .mime_str(ct)
            .map_err(|e| AppError::BadRequest(format!("content-type inválido: {}", e)))?;
    }
    let mut form = reqwest::multipart::Form::new().part("receipt", part);
    for (k, v) in fields {
        form = form.text(k, v);
    }
    api.post_multipart(session, "/parents/upload-receipt", form).await
}
