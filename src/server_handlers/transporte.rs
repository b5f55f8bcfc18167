use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::stream::StreamExt;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{descarga, generar, registrar_recarga, AppState};
use crate::agregados::{group_attendance_by_piloto, km_totals_by_bus, km_totals_by_fecha};
use crate::api::transporte::{self, KmQuery, ReceiptFile};
use crate::error::AppError;
use crate::exportar::{export_attendance, km_chart_svg, XLSX_CONTENT_TYPE};
use crate::filtros::{filter_attendance, AttendanceFilter};
use crate::models::Attendance;
use crate::sesion::Session;

/// Tamaño máximo aceptado para un comprobante.
const MAX_COMPROBANTE: usize = 10 * 1024 * 1024;
const HISTORIAL_LIMIT: u64 = 10;

async fn asistencia_filtrada(
    state: &AppState,
    session: &Session,
    filtro: &AttendanceFilter,
) -> Result<Vec<Attendance>, AppError> {
    let rows = transporte::get_attendance(&state.api, session, filtro).await?;
    Ok(filter_attendance(rows, filtro))
}

/// GET /asistencia
pub async fn list_asistencia(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<AttendanceFilter>,
) -> Result<HttpResponse, AppError> {
    let filtro = query.into_inner();
    let rows = asistencia_filtrada(&state, &session, &filtro).await?;
    registrar_recarga(&state, &session, "asistencia".to_string(), move |api, s| {
        let filtro = filtro.clone();
        async move { transporte::get_attendance(&api, &s, &filtro).await }
    });
    Ok(HttpResponse::Ok().json(rows))
}

/// GET /asistencia/resumen
pub async fn resumen_asistencia(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<AttendanceFilter>,
) -> Result<HttpResponse, AppError> {
    let rows = asistencia_filtrada(&state, &session, &query).await?;
    Ok(HttpResponse::Ok().json(group_attendance_by_piloto(&rows)))
}

/// GET /asistencia/export
pub async fn export_asistencia(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<AttendanceFilter>,
) -> Result<HttpResponse, AppError> {
    let rows = asistencia_filtrada(&state, &session, &query).await?;
    let nombre = match query.fecha.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
        Some(f) => format!("asistencia-{}.xlsx", f),
        None => "asistencia.xlsx".to_string(),
    };
    let bytes = generar(move || export_attendance(&rows)).await?;
    Ok(descarga(bytes, XLSX_CONTENT_TYPE, &nombre))
}

#[derive(Debug, Default, Deserialize)]
pub struct HistorialQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub desde: Option<String>,
    pub hasta: Option<String>,
    pub bus: Option<String>,
}

/// GET /transportistas/historial-rutas
pub async fn historial_rutas(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<HistorialQuery>,
) -> Result<HttpResponse, AppError> {
    let q = query.into_inner();
    let filtro = KmQuery { desde: q.desde, hasta: q.hasta, bus: q.bus };
    let pagina = transporte::get_route_history(
        &state.api,
        &session,
        q.page.unwrap_or(1),
        q.limit.filter(|l| *l > 0).unwrap_or(HISTORIAL_LIMIT),
        &filtro,
    )
    .await?;
    Ok(HttpResponse::Ok().json(pagina))
}

#[derive(Debug, Default, Deserialize)]
pub struct KmStatsQuery {
    pub desde: Option<String>,
    pub hasta: Option<String>,
    pub bus: Option<String>,
    /// "bus" (por defecto) o "fecha".
    pub agrupar: Option<String>,
}

impl KmStatsQuery {
    fn filtro(&self) -> KmQuery {
        KmQuery { desde: self.desde.clone(), hasta: self.hasta.clone(), bus: self.bus.clone() }
    }

    fn por_fecha(&self) -> bool {
        self.agrupar.as_deref().map(str::trim).is_some_and(|a| a.eq_ignore_ascii_case("fecha"))
    }
}

/// GET /transportistas/estadisticas-kilometros
pub async fn estadisticas_km(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<KmStatsQuery>,
) -> Result<HttpResponse, AppError> {
    let stats = transporte::get_km_stats(&state.api, &session, &query.filtro()).await?;
    let totales = if query.por_fecha() { km_totals_by_fecha(&stats) } else { km_totals_by_bus(&stats) };
    let total_km: f64 = totales.iter().map(|t| t.kilometros).sum();
    Ok(HttpResponse::Ok().json(json!({ "totales": totales, "totalKilometros": total_km, "registros": stats.len() })))
}

/// GET /transportistas/estadisticas-kilometros/grafico
pub async fn grafico_km(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<KmStatsQuery>,
) -> Result<HttpResponse, AppError> {
    let stats = transporte::get_km_stats(&state.api, &session, &query.filtro()).await?;
    let (totales, titulo) = if query.por_fecha() {
        (km_totals_by_fecha(&stats), "Kilómetros por día")
    } else {
        (km_totals_by_bus(&stats), "Kilómetros por bus")
    };
    let svg = km_chart_svg(&totales, titulo)?;
    Ok(HttpResponse::Ok().content_type("image/svg+xml").body(svg))
}

/// GET /transportistas/estadisticas-kilometros/reporte
/// El PDF lo genera el backend; aquí sólo se reenvía.
pub async fn reporte_km(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<KmStatsQuery>,
) -> Result<HttpResponse, AppError> {
    let (bytes, content_type) = transporte::get_km_report_pdf(&state.api, &session, &query.filtro()).await?;
    let content_type = content_type.unwrap_or_else(|| "application/pdf".to_string());
    Ok(descarga(bytes, &content_type, "reporte-kilometraje.pdf"))
}

/// POST /parents/upload-receipt
/// La parte con nombre de archivo es el comprobante; las demás partes se
/// reenvían como campos de texto.
pub async fn upload_receipt(
    state: web::Data<AppState>,
    session: Session,
    mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let mut archivo: Option<ReceiptFile> = None;
    let mut campos: Vec<(String, String)> = Vec::new();

    while let Some(field) = payload.next().await {
        let mut field = field.map_err(|e| AppError::BadRequest(format!("multipart inválido: {}", e)))?;
        let nombre = field.content_disposition().and_then(|cd| cd.get_name()).unwrap_or_default().to_string();
        let file_name = field.content_disposition().and_then(|cd| cd.get_filename()).map(str::to_string);
        let content_type = field.content_type().map_or_else(|| "application/octet-stream".to_string(), |m| m.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::BadRequest(format!("multipart inválido: {}", e)))?;
            if bytes.len() + chunk.len() > MAX_COMPROBANTE {
                return Err(AppError::BadRequest("el comprobante supera los 10 MB".into()));
            }
            bytes.extend_from_slice(&chunk);
        }

        match file_name {
            Some(file_name) if archivo.is_none() => {
                archivo = Some(ReceiptFile { file_name, content_type: Some(content_type), bytes });
            }
            Some(_) => return Err(AppError::BadRequest("sólo se acepta un comprobante por envío".into())),
            None => campos.push((nombre, String::from_utf8_lossy(&bytes).into_owned())),
        }
    }

    let archivo = archivo.ok_or_else(|| AppError::BadRequest("falta el archivo del comprobante".into()))?;
    info!(archivo = %archivo.file_name, bytes = archivo.bytes.len(), campos = campos.len(), "reenviando comprobante");
    let respuesta = transporte::upload_receipt(&state.api, &session, archivo, campos).await?;
    Ok(HttpResponse::Ok().json(respuesta))
}
