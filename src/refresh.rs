//! Canal explícito de "refrescar".
//!
//! Cada sesión tiene a lo sumo una vista activa, indexada por su token: la
//! lista que consultó por última vez. Registrar otra vista con el mismo
//! token reemplaza la anterior; otros tokens no se ven afectados. La
//! recarga devuelve la lista obtenida de nuevo.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::AppError;

pub type RefreshFuture = Pin<Box<dyn Future<Output = Result<Value, AppError>> + Send>>;
type Callback = Arc<dyn Fn() -> RefreshFuture + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationId(u64);

/// Resultado de recargar una vista.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recarga {
    pub view: String,
    pub items: Value,
}

struct Registro {
    id: RegistrationId,
    view: String,
    callback: Callback,
}

#[derive(Default)]
pub struct RefreshChannel {
    activos: Mutex<HashMap<String, Registro>>,
    siguiente: AtomicU64,
}

impl std::fmt::Debug for RefreshChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RefreshChannel(sessions={})", self.len())
    }
}

impl RefreshChannel {
    pub fn new() -> RefreshChannel {
        RefreshChannel::default()
    }

    /// Registra la vista activa de la sesión `clave`. Devuelve el id
    /// necesario para darla de baja.
    pub fn register<F, Fut>(&self, clave: &str, view: impl Into<String>, callback: F) -> RegistrationId
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, AppError>> + Send + 'static,
    {
        let id = RegistrationId(self.siguiente.fetch_add(1, Ordering::Relaxed));
        let view = view.into();
        let callback: Callback = Arc::new(move || Box::pin(callback()) as RefreshFuture);
        debug!(view = %view, "vista registrada para refresco");
        let mut g = self.activos.lock().unwrap_or_else(|p| p.into_inner());
        g.insert(clave.to_string(), Registro { id, view, callback });
        id
    }

    /// Da de baja sólo si `id` sigue siendo la vista activa de la sesión, de
    /// modo que una vista que se desmonta tarde no borra a la que la
    /// reemplazó.
    pub fn unregister(&self, clave: &str, id: RegistrationId) -> bool {
        let mut g = self.activos.lock().unwrap_or_else(|p| p.into_inner());
        if g.get(clave).is_some_and(|r| r.id == id) {
            g.remove(clave);
            true
        } else {
            false
        }
    }

    /// Olvida la vista de la sesión (logout o token rechazado).
    pub fn forget(&self, clave: &str) -> bool {
        let mut g = self.activos.lock().unwrap_or_else(|p| p.into_inner());
        g.remove(clave).is_some()
    }

    pub fn active_view(&self, clave: &str) -> Option<String> {
        let g = self.activos.lock().unwrap_or_else(|p| p.into_inner());
        g.get(clave).map(|r| r.view.clone())
    }

    /// Sesiones con una vista registrada.
    pub fn len(&self) -> usize {
        let g = self.activos.lock().unwrap_or_else(|p| p.into_inner());
        g.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Recarga la vista activa de la sesión; `Ok(None)` si no tiene ninguna.
    /// Si el backend rechaza la sesión, la vista se da de baja.
    pub async fn trigger(&self, clave: &str) -> Result<Option<Recarga>, AppError> {
        let (id, view, callback) = {
            let g = self.activos.lock().unwrap_or_else(|p| p.into_inner());
            match g.get(clave) {
                Some(r) => (r.id, r.view.clone(), Arc::clone(&r.callback)),
                None => return Ok(None),
            }
        };
        debug!(view = %view, "refrescando vista");
        match callback().await {
            Ok(items) => Ok(Some(Recarga { view, items })),
            Err(e @ (AppError::Unauthorized | AppError::SessionClosed)) => {
                info!(view = %view, "sesión rechazada; se descarta la vista");
                self.unregister(clave, id);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn test_trigger_invoca_vista_de_la_sesion() {
        let canal = RefreshChannel::new();
        assert_eq!(canal.trigger("tok-a").await.unwrap(), None);

        let llamadas = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&llamadas);
        canal.register("tok-a", "colaboradores", move || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok(json!([{"id": 1}]))
            }
        });

        let r = canal.trigger("tok-a").await.unwrap().expect("Debe recargar");
        assert_eq!(r.view, "colaboradores");
        assert_eq!(r.items, json!([{"id": 1}]));
        assert!(canal.trigger("tok-a").await.unwrap().is_some());
        assert_eq!(llamadas.load(Ordering::SeqCst), 2);

        // otra sesión no alcanza la vista de tok-a
        assert_eq!(canal.trigger("tok-b").await.unwrap(), None);
        assert_eq!(llamadas.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unregister_tardio_no_borra_reemplazo() {
        let canal = RefreshChannel::new();
        let viejo = canal.register("tok", "asistencia", || async { Ok(Value::Null) });
        let nuevo = canal.register("tok", "solicitudes", || async { Ok(Value::Null) });
        canal.register("otro", "taller", || async { Ok(Value::Null) });

        assert!(!canal.unregister("tok", viejo));
        assert_eq!(canal.active_view("tok").as_deref(), Some("solicitudes"));
        assert!(canal.unregister("tok", nuevo));
        assert_eq!(canal.trigger("tok").await.unwrap(), None);
        assert_eq!(canal.active_view("otro").as_deref(), Some("taller"));
        assert!(canal.forget("otro"));
        assert!(canal.is_empty());
    }

    #[tokio::test]
    async fn test_sesion_rechazada_se_descarta() {
        let canal = RefreshChannel::new();
        canal.register("vencido", "asistencia", || async { Err(AppError::Unauthorized) });

        assert!(matches!(canal.trigger("vencido").await, Err(AppError::Unauthorized)));
        assert_eq!(canal.active_view("vencido"), None);
    }
}
