//! Configuración del servicio a partir de variables de entorno (y `.env`).

use std::{env, fmt::Display, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT_SECS: &str = "30";

#[derive(Debug, Error, PartialEq)]
#[error("valor inválido para {key}: {reason}")]
pub struct ConfigError {
    pub key: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind: String,
    pub api_url: String,
    pub api_timeout: Duration,
    pub workers: usize,
    /// Origen permitido para CORS; `None` deja CORS permisivo.
    pub cors_origin: Option<String>,
}

impl Config {
    /// Carga `.env` si existe y luego lee el entorno del proceso.
    pub fn load() -> Result<Config, ConfigError> {
        if dotenv::dotenv().is_err() {
            info!(".env no encontrado, usando sólo variables de entorno");
        }
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `load` pero con una fuente de variables arbitraria.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let workers_default = num_cpus::get().max(1).to_string();
        let timeout_secs: u64 = try_load(&lookup, "TRANSPORTE_API_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let workers: usize = try_load(&lookup, "TRANSPORTE_WORKERS", &workers_default)?;
        if workers == 0 {
            return Err(ConfigError { key: "TRANSPORTE_WORKERS".into(), reason: "debe ser mayor que 0".into() });
        }
        let api_url: String = try_load(&lookup, "TRANSPORTE_API_URL", DEFAULT_API_URL)?;
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError { key: "TRANSPORTE_API_URL".into(), reason: format!("'{}' no es una URL http(s)", api_url) });
        }

        Ok(Config {
            bind: try_load(&lookup, "TRANSPORTE_BIND", DEFAULT_BIND)?,
            api_url,
            api_timeout: Duration::from_secs(timeout_secs),
            workers,
            cors_origin: lookup("TRANSPORTE_CORS_ORIGIN").map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
        })
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} no definido, usando valor por defecto: {default}");
        default.to_string()
    });
    raw.trim().parse().map_err(|e: T::Err| {
        warn!("valor inválido para {key}: {e}");
        ConfigError { key: key.to_string(), reason: e.to_string() }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn desde(pares: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let m: HashMap<String, String> = pares.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|k| m.get(k).cloned())
    }

    #[test]
    fn test_valores_por_defecto() {
        let c = desde(&[]).expect("Debe cargar con valores por defecto");
        assert_eq!(c.bind, DEFAULT_BIND);
        assert_eq!(c.api_url, DEFAULT_API_URL);
        assert_eq!(c.api_timeout, Duration::from_secs(30));
        assert!(c.workers >= 1);
        assert_eq!(c.cors_origin, None);
    }

    #[test]
    fn test_valores_del_entorno() {
        let c = desde(&[
            ("TRANSPORTE_BIND", "0.0.0.0:9000"),
            ("TRANSPORTE_API_TIMEOUT_SECS", " 5 "),
            ("TRANSPORTE_WORKERS", "2"),
            ("TRANSPORTE_CORS_ORIGIN", "https://admin.example.com"),
        ])
        .expect("Debe cargar configuración");
        assert_eq!(c.bind, "0.0.0.0:9000");
        assert_eq!(c.api_timeout, Duration::from_secs(5));
        assert_eq!(c.workers, 2);
        assert_eq!(c.cors_origin.as_deref(), Some("https://admin.example.com"));
    }

    #[test]
    fn test_valores_invalidos() {
        let e = desde(&[("TRANSPORTE_API_TIMEOUT_SECS", "treinta")]).unwrap_err();
        assert_eq!(e.key, "TRANSPORTE_API_TIMEOUT_SECS");
        assert!(desde(&[("TRANSPORTE_WORKERS", "0")]).is_err());
        assert!(desde(&[("TRANSPORTE_API_URL", "localhost:3000")]).is_err());
    }
}
