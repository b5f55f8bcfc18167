use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::info;

use super::AppState;
use crate::error::AppError;
use crate::sesion::Session;

/// GET /health
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "upstream": state.api.base_url(),
        "registeredViews": state.refresh.len(),
    }))
}

/// POST /refresh
/// Recarga la vista activa de quien llama y devuelve la lista obtenida;
/// `refreshed` es null si esa sesión no tenía ninguna.
pub async fn refresh(state: web::Data<AppState>, session: Session) -> Result<HttpResponse, AppError> {
    let token = session.bearer().ok_or(AppError::Unauthorized)?;
    let recarga = state.refresh.trigger(&token).await?;
    info!(vista = ?recarga.as_ref().map(|r| r.view.as_str()), "refresco solicitado");
    Ok(HttpResponse::Ok().json(json!({ "refreshed": recarga })))
}

/// POST /logout
/// Olvida la vista registrada por la sesión. El token en sí lo revoca el
/// backend; aquí sólo se deja de usar.
pub async fn logout(state: web::Data<AppState>, session: Session) -> Result<HttpResponse, AppError> {
    let token = session.bearer().ok_or(AppError::Unauthorized)?;
    let olvidada = state.refresh.forget(&token);
    session.logout();
    Ok(HttpResponse::Ok().json(json!({ "loggedOut": true, "viewDropped": olvidada })))
}
