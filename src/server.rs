use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use tracing::info;

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::AppError;
use crate::server_handlers::{personas, sistema, solicitudes, transporte, AppState};

/// Registra todas las rutas. Las rutas fijas (`/export`) van antes que las
/// que llevan `{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| AppError::BadRequest(err.to_string()).into()))
        .app_data(web::QueryConfig::default().error_handler(|err, _| AppError::BadRequest(err.to_string()).into()))
        .route("/health", web::get().to(sistema::health))
        .route("/refresh", web::post().to(sistema::refresh))
        .route("/logout", web::post().to(sistema::logout))
        // colaboradores y empleados
        .route("/corporations/{cid}/colaboradores/export", web::get().to(personas::export_colaboradores))
        .route("/corporations/{cid}/colaboradores", web::get().to(personas::list_colaboradores))
        .route("/corporations/{cid}/colaboradores", web::post().to(personas::create_colaborador))
        .route("/corporations/{cid}/colaboradores/{id}", web::put().to(personas::update_colaborador))
        .route("/corporations/{cid}/colaboradores/{id}", web::delete().to(personas::delete_colaborador))
        .route("/corporations/{cid}/colaboradores/{id}/estado", web::patch().to(personas::set_estado_colaborador))
        .route("/corporations/{cid}/colaboradores/{id}/dashboard", web::get().to(personas::dashboard_colaborador))
        .route("/corporations/{cid}/employees/{id}/dashboard", web::get().to(personas::dashboard_empleado))
        // solicitudes
        .route("/requests/export", web::get().to(solicitudes::export_requests_xlsx))
        .route("/requests", web::get().to(solicitudes::list_requests))
        .route("/requests", web::post().to(solicitudes::create_request))
        .route("/requests/{id}/status", web::patch().to(solicitudes::update_request_status))
        .route("/requests/{id}", web::get().to(solicitudes::get_request))
        .route("/requests/{id}", web::delete().to(solicitudes::delete_request))
        .route("/mechanic-requests", web::get().to(solicitudes::list_mechanic_requests))
        .route("/mechanic-requests/{id}", web::get().to(solicitudes::get_mechanic_request))
        .route("/mechanic-requests/{id}", web::patch().to(solicitudes::update_mechanic_request))
        .route("/mechanic-requests/{id}", web::delete().to(solicitudes::delete_mechanic_request))
        // transporte
        .route("/asistencia/export", web::get().to(transporte::export_asistencia))
        .route("/asistencia/resumen", web::get().to(transporte::resumen_asistencia))
        .route("/asistencia", web::get().to(transporte::list_asistencia))
        .route("/transportistas/historial-rutas", web::get().to(transporte::historial_rutas))
        .route("/transportistas/estadisticas-kilometros/grafico", web::get().to(transporte::grafico_km))
        .route("/transportistas/estadisticas-kilometros/reporte", web::get().to(transporte::reporte_km))
        .route("/transportistas/estadisticas-kilometros", web::get().to(transporte::estadisticas_km))
        .route("/parents/upload-receipt", web::post().to(transporte::upload_receipt));
}

fn cors(origin: Option<&str>) -> Cors {
    match origin {
        Some(o) => Cors::default().allowed_origin(o).allow_any_method().allow_any_header().max_age(3600),
        None => Cors::permissive(),
    }
}

/// Levanta el servidor HTTP con la configuración dada.
pub async fn run_server(config: Config) -> std::io::Result<()> {
    let api = ApiClient::new(&config.api_url, config.api_timeout).map_err(|e| std::io::Error::other(e.to_string()))?;
    let state = web::Data::new(AppState::new(api));
    let origin = config.cors_origin.clone();

    info!(bind = %config.bind, upstream = %config.api_url, workers = config.workers, "iniciando servidor");
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(cors(origin.as_deref()))
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .workers(config.workers)
    .bind(&config.bind)?
    .run()
    .await
}
