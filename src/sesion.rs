//! Sesión explícita que se pasa a cada llamada de la API.
//!
//! Se crea al iniciar sesión y queda invalidada al cerrar sesión o cuando el
//! backend responde 401. Los clones comparten el mismo estado.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub corporation_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstadoSesion {
    Activa,
    /// Cerrada por el usuario.
    Cerrada,
    /// El backend rechazó el token (401).
    Expirada,
}

#[derive(Debug)]
struct Inner {
    token: Option<String>,
    usuario: Option<SessionUser>,
    estado: EstadoSesion,
    closed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<RwLock<Inner>>,
    created_at: DateTime<Utc>,
}

impl Session {
    pub fn login(token: impl Into<String>, usuario: Option<SessionUser>) -> Session {
        Session {
            inner: Arc::new(RwLock::new(Inner {
                token: Some(token.into()),
                usuario,
                estado: EstadoSesion::Activa,
                closed_at: None,
            })),
            created_at: Utc::now(),
        }
    }

    /// Sesión sin token (endpoints públicos del backend).
    pub fn anonymous() -> Session {
        Session {
            inner: Arc::new(RwLock::new(Inner {
                token: None,
                usuario: None,
                estado: EstadoSesion::Activa,
                closed_at: None,
            })),
            created_at: Utc::now(),
        }
    }

    /// Toma el token de un encabezado `Authorization: Bearer <token>`.
    pub fn from_authorization(header: Option<&str>) -> Session {
        let token = header
            .map(str::trim)
            .and_then(|h| h.strip_prefix("Bearer ").or_else(|| h.strip_prefix("bearer ")))
            .map(str::trim)
            .filter(|t| !t.is_empty());
        match token {
            Some(t) => Session::login(t, None),
            None => Session::anonymous(),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn estado(&self) -> EstadoSesion {
        match self.inner.read() {
            Ok(g) => g.estado,
            Err(poisoned) => poisoned.into_inner().estado,
        }
    }

    pub fn is_active(&self) -> bool {
        self.estado() == EstadoSesion::Activa
    }

    /// Token sólo mientras la sesión está activa.
    pub fn bearer(&self) -> Option<String> {
        let g = match self.inner.read() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        if g.estado == EstadoSesion::Activa { g.token.clone() } else { None }
    }

    pub fn usuario(&self) -> Option<SessionUser> {
        match self.inner.read() {
            Ok(g) => g.usuario.clone(),
            Err(poisoned) => poisoned.into_inner().usuario.clone(),
        }
    }

    fn cerrar(&self, estado: EstadoSesion) {
        let mut g = match self.inner.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        if g.estado == EstadoSesion::Activa {
            g.estado = estado;
            g.token = None;
            g.closed_at = Some(Utc::now());
        }
    }

    pub fn logout(&self) {
        self.cerrar(EstadoSesion::Cerrada);
    }

    /// Marca la sesión como expirada tras un 401.
    pub fn invalidate(&self) {
        self.cerrar(EstadoSesion::Expirada);
    }

    pub fn closed_at(&self) -> Option<DateTime<Utc>> {
        match self.inner.read() {
            Ok(g) => g.closed_at,
            Err(poisoned) => poisoned.into_inner().closed_at,
        }
    }
}
