use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::error::{ApiErrorPayload, AppError};
use crate::sesion::Session;

/// Listas del backend: a veces un arreglo plano, a veces `{ data: [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Plain(Vec<T>),
    Wrapped {
        #[serde(alias = "items", alias = "rows")]
        data: Vec<T>,
    },
}

impl<T> ListResponse<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListResponse::Plain(v) => v,
            ListResponse::Wrapped { data } => data,
        }
    }
}

/// Cliente HTTP de la API de transporte. Barato de clonar.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<ApiClient, AppError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(ApiClient { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, session: &Session, method: Method, path: &str) -> Result<RequestBuilder, AppError> {
        if !session.is_active() {
            return Err(AppError::SessionClosed);
        }
        let mut rb = self.http.request(method, self.url(path));
        if let Some(token) = session.bearer() {
            rb = rb.bearer_auth(token);
        }
        Ok(rb)
    }

    /// Envía la petición y traduce respuestas no exitosas a `AppError`.
    /// Un 401 invalida la sesión.
    async fn send(&self, session: &Session, method: &Method, path: &str, rb: RequestBuilder) -> Result<Response, AppError> {
        debug!(%method, path, "llamando API");
        let resp = rb.send().await.map_err(|e| {
            error!(%method, path, error = %e, "fallo de red");
            AppError::Network(e)
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let payload = ApiErrorPayload::parse(&body);
        warn!(%method, path, status = status.as_u16(), "la API respondió con error");

        match status {
            StatusCode::UNAUTHORIZED => {
                session.invalidate();
                Err(AppError::Unauthorized)
            }
            StatusCode::FORBIDDEN => Err(AppError::Forbidden { permission: payload.and_then(|p| p.permission) }),
            _ => {
                let message = payload
                    .as_ref()
                    .and_then(|p| p.server_message())
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        let b = body.trim();
                        if b.is_empty() || b.len() > 300 {
                            status.canonical_reason().unwrap_or("error").to_string()
                        } else {
                            b.to_string()
                        }
                    });
                Err(AppError::Upstream { status: status.as_u16(), message, payload })
            }
        }
    }

    async fn decode<T: DeserializeOwned>(path: &str, resp: Response) -> Result<T, AppError> {
        let text = resp.text().await?;
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str::<T>(text).map_err(|e| {
            error!(path, error = %e, "respuesta no decodificable");
            AppError::Decode(format!("{}: {}", path, e))
        })
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let rb = self.request(session, Method::GET, path)?.query(query);
        let resp = self.send(session, &Method::GET, path, rb).await?;
        Self::decode(path, resp).await
    }

    /// GET de una lista aceptando ambas formas de respuesta.
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, AppError> {
        let list: Option<ListResponse<T>> = self.get_json(session, path, query).await?;
        Ok(list.map(ListResponse::into_vec).unwrap_or_default())
    }

    pub async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        session: &Session,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let rb = self.request(session, method.clone(), path)?.json(body);
        let resp = self.send(session, &method, path, rb).await?;
        Self::decode(path, resp).await
    }

    pub async fn delete(&self, session: &Session, path: &str) -> Result<(), AppError> {
        let rb = self.request(session, Method::DELETE, path)?;
        self.send(session, &Method::DELETE, path, rb).await?;
        Ok(())
    }

    /// GET binario (PDF). Devuelve bytes y content-type.
    pub async fn get_bytes(
        &self,
        session: &Session,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(Vec<u8>, Option<String>), AppError> {
        let rb = self.request(session, Method::GET, path)?.query(query);
        let resp = self.send(session, &Method::GET, path, rb).await?;
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = resp.bytes().await?;
        Ok((bytes.to_vec(), content_type))
    }

    pub async fn post_multipart(
        &self,
        session: &Session,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Value, AppError> {
        let rb = self.request(session, Method::POST, path)?.multipart(form);
        let resp = self.send(session, &Method::POST, path, rb).await?;
        Self::decode(path, resp).await
    }
}

/// Agrega un parámetro de query sólo si tiene valor.
pub fn push_param(query: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&str>) {
    if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
        query.push((key, v.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_sin_barras_dobles() {
        let api = ApiClient::new("http://localhost:3000/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(api.url("/requests/4"), "http://localhost:3000/api/requests/4");
        assert_eq!(api.url("requests"), "http://localhost:3000/api/requests");
    }

    #[test]
    fn test_list_response_ambas_formas() {
        let plano: ListResponse<i32> = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(plano.into_vec(), vec![1, 2]);
        let envuelto: ListResponse<i32> = serde_json::from_str(r#"{"data": [3], "total": 1}"#).unwrap();
        assert_eq!(envuelto.into_vec(), vec![3]);
    }

    #[test]
    fn test_push_param() {
        let mut q = Vec::new();
        push_param(&mut q, "status", Some("pending"));
        push_param(&mut q, "bus", Some("  "));
        push_param(&mut q, "fecha", None);
        assert_eq!(q, vec![("status", "pending".to_string())]);
    }

    #[tokio::test]
    async fn test_sesion_cerrada_no_llama() {
        let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let s = Session::login("t", None);
        s.logout();
        let r: Result<Value, AppError> = api.get_json(&s, "/requests", &[]).await;
        assert!(matches!(r, Err(AppError::SessionClosed)));
    }
}
