//! Handlers HTTP. Cada uno obtiene los datos del backend con la sesión del
//! request, los da forma con los módulos puros y responde JSON o un archivo.

pub mod personas;
pub mod sistema;
pub mod solicitudes;
pub mod transporte;

use std::future::{ready, Future, Ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest, HttpResponse};
use serde::Serialize;
use tracing::warn;

use crate::api::ApiClient;
use crate::error::AppError;
use crate::refresh::{Recarga, RefreshChannel};
use crate::sesion::Session;

/// Estado compartido entre workers.
pub struct AppState {
    pub api: ApiClient,
    pub refresh: RefreshChannel,
}

impl AppState {
    pub fn new(api: ApiClient) -> AppState {
        AppState { api, refresh: RefreshChannel::new() }
    }
}

impl FromRequest for Session {
    type Error = actix_web::Error;
    type Future = Ready<Result<Session, actix_web::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let auth = req.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok());
        ready(Ok(Session::from_authorization(auth)))
    }
}

/// Registra la vista como activa para la sesión del request. El callback
/// vuelve a pedir la lista con esa misma sesión. Sin token no se registra
/// nada.
pub(crate) fn registrar_recarga<T, F, Fut>(state: &AppState, session: &Session, vista: String, cargar: F)
where
    T: Serialize + 'static,
    F: Fn(ApiClient, Session) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<T>, AppError>> + Send + 'static,
{
    let Some(token) = session.bearer() else {
        return;
    };
    let api = state.api.clone();
    let session = session.clone();
    state.refresh.register(&token, vista, move || {
        let pendiente = cargar(api.clone(), session.clone());
        async move {
            let items = pendiente.await?;
            serde_json::to_value(items).map_err(|e| AppError::Decode(e.to_string()))
        }
    });
}

/// Recarga la vista de quien hizo la mutación. Un fallo al recargar no
/// invalida la mutación ya hecha: queda en el log y se responde sin lista.
pub(crate) async fn recargar_vista(state: &AppState, session: &Session) -> Option<Recarga> {
    let token = session.bearer()?;
    match state.refresh.trigger(&token).await {
        Ok(recarga) => recarga,
        Err(e) => {
            warn!(error = %e, "no se pudo recargar la vista");
            None
        }
    }
}

/// Genera un archivo fuera del executor (escribir xlsx es trabajo de CPU).
pub(crate) async fn generar<F>(trabajo: F) -> Result<Vec<u8>, AppError>
where
    F: FnOnce() -> Result<Vec<u8>, AppError> + Send + 'static,
{
    web::block(trabajo)
        .await
        .map_err(|e| AppError::Export(format!("tarea de exportación cancelada: {}", e)))?
}

pub(crate) fn descarga(bytes: Vec<u8>, content_type: &str, nombre_archivo: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", nombre_archivo)))
        .body(bytes)
}
