//! Filtros, orden y paginación de las tablas de administración.
//!
//! Se aplican sobre listas ya obtenidas del backend; cada predicado es una
//! igualdad de campo o una búsqueda por subcadena normalizada.

use serde::{Deserialize, Serialize};

use crate::models::{Attendance, Persona, Request, RequestStatus, ESTADO_ACTIVO, ESTADO_INACTIVO};
use crate::utils::{contains_normalized, normalize_key};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EstadoFiltro {
    #[default]
    Todos,
    Activo,
    Inactivo,
}

impl EstadoFiltro {
    /// "Activo" / "Inactivo" / "Todos" (sin importar mayúsculas ni tildes).
    /// Valores vacíos o desconocidos equivalen a `Todos`.
    pub fn parse(s: &str) -> EstadoFiltro {
        match normalize_key(s).as_str() {
            "activo" | "activos" | "1" => EstadoFiltro::Activo,
            "inactivo" | "inactivos" | "0" => EstadoFiltro::Inactivo,
            _ => EstadoFiltro::Todos,
        }
    }
}

/// Filtra por `state`: Inactivo ⇔ 0, Activo ⇔ 1.
pub fn filter_by_estado(personas: Vec<Persona>, filtro: EstadoFiltro) -> Vec<Persona> {
    match filtro {
        EstadoFiltro::Todos => personas,
        EstadoFiltro::Activo => personas.into_iter().filter(|p| p.state == Some(ESTADO_ACTIVO)).collect(),
        EstadoFiltro::Inactivo => personas.into_iter().filter(|p| p.state == Some(ESTADO_INACTIVO)).collect(),
    }
}

/// Búsqueda libre sobre nombre, correo, nombre/apellido y zona.
pub fn search_personas(personas: Vec<Persona>, query: &str) -> Vec<Persona> {
    if normalize_key(query).is_empty() {
        return personas;
    }
    personas
        .into_iter()
        .filter(|p| {
            let mut campos: Vec<&str> = vec![p.name.as_str(), p.email.as_str()];
            if let Some(d) = &p.detail {
                campos.push(d.first_name.as_str());
                campos.push(d.last_name.as_str());
                if let Some(z) = &d.zone_or_sector {
                    campos.push(z.as_str());
                }
            }
            let nombre = p.nombre_completo();
            campos.iter().any(|c| contains_normalized(c, query)) || contains_normalized(&nombre, query)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrdenPersonas {
    #[default]
    Nombre,
    Email,
    Estado,
}

impl OrdenPersonas {
    pub fn parse(s: &str) -> OrdenPersonas {
        match normalize_key(s).as_str() {
            "email" | "correo" => OrdenPersonas::Email,
            "estado" | "state" => OrdenPersonas::Estado,
            _ => OrdenPersonas::Nombre,
        }
    }
}

pub fn sort_personas(personas: &mut [Persona], orden: OrdenPersonas, asc: bool) {
    personas.sort_by(|a, b| {
        let ord = match orden {
            OrdenPersonas::Nombre => normalize_key(&a.nombre_completo()).cmp(&normalize_key(&b.nombre_completo())),
            OrdenPersonas::Email => a.email.to_lowercase().cmp(&b.email.to_lowercase()),
            OrdenPersonas::Estado => a.state.cmp(&b.state),
        };
        if asc { ord } else { ord.reverse() }
    });
}

/// Filtra solicitudes por estado y tipo (ambos opcionales).
pub fn filter_requests(requests: Vec<Request>, status: Option<RequestStatus>, request_type: Option<&str>) -> Vec<Request> {
    let tipo = request_type.map(normalize_key).filter(|t| !t.is_empty());
    requests
        .into_iter()
        .filter(|r| status.map_or(true, |s| r.status == s))
        .filter(|r| tipo.as_ref().map_or(true, |t| normalize_key(&r.request_type) == *t))
        .collect()
}

/// Criterios de la tabla de asistencia. Campos vacíos no filtran.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AttendanceFilter {
    #[serde(default)]
    pub fecha: Option<String>,
    #[serde(default)]
    pub monitora: Option<String>,
    #[serde(default)]
    pub bus: Option<String>,
    #[serde(default)]
    pub school: Option<String>,
}

fn campo_coincide(valor: Option<&str>, filtro: &Option<String>) -> bool {
    match filtro.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
        None => true,
        Some(f) => valor.is_some_and(|v| contains_normalized(v, f)),
    }
}

pub fn filter_attendance(rows: Vec<Attendance>, filtro: &AttendanceFilter) -> Vec<Attendance> {
    rows.into_iter()
        .filter(|a| match filtro.fecha.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
            // fechas llegan como "2024-05-01" o "2024-05-01T00:00:00Z"
            Some(f) => a.fecha.trim().starts_with(f),
            None => true,
        })
        .filter(|a| campo_coincide(a.monitora.as_deref(), &filtro.monitora))
        .filter(|a| campo_coincide(a.bus.as_deref(), &filtro.bus))
        .filter(|a| campo_coincide(a.school.as_deref(), &filtro.school))
        .collect()
}

/// Página de resultados (1-based).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Pagina<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Corta `items` en la página pedida. `page == 0` se trata como 1;
/// `per_page == 0` devuelve todo en una sola página.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Pagina<T> {
    let total = items.len();
    let page = page.max(1);
    if per_page == 0 {
        return Pagina { items, page: 1, per_page: total, total, total_pages: 1 };
    }
    let total_pages = total.div_ceil(per_page).max(1);
    let start = (page - 1).saturating_mul(per_page);
    let items: Vec<T> = items.into_iter().skip(start).take(per_page).collect();
    Pagina { items, page, per_page, total, total_pages }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PersonaDetalle;

    fn persona(name: &str, state: Option<i64>) -> Persona {
        Persona { name: name.into(), email: format!("{}@x.com", name.to_lowercase()), state, ..Default::default() }
    }

    #[test]
    fn test_filtro_inactivo_exacto() {
        let ps = vec![
            persona("Ana", Some(1)),
            persona("Beto", Some(0)),
            persona("Carla", None),
            persona("Dario", Some(0)),
            persona("Eva", Some(2)),
        ];
        let inactivos = filter_by_estado(ps.clone(), EstadoFiltro::parse("Inactivo"));
        let nombres: Vec<&str> = inactivos.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(nombres, vec!["Beto", "Dario"]);
        assert!(inactivos.iter().all(|p| p.state == Some(0)));

        assert_eq!(filter_by_estado(ps.clone(), EstadoFiltro::Activo).len(), 1);
        assert_eq!(filter_by_estado(ps, EstadoFiltro::parse("")).len(), 5);
    }

    #[test]
    fn test_busqueda_por_zona_con_tildes() {
        let mut p = persona("Ana", Some(1));
        p.detail = Some(PersonaDetalle { zone_or_sector: Some("Zoná 10".into()), ..Default::default() });
        let ps = vec![p, persona("Beto", Some(1))];
        let r = search_personas(ps, "zona 10");
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].name, "Ana");
    }

    #[test]
    fn test_orden_por_nombre_desc() {
        let mut ps = vec![persona("beto", Some(1)), persona("Álvaro", Some(1)), persona("Carla", Some(0))];
        sort_personas(&mut ps, OrdenPersonas::Nombre, false);
        let nombres: Vec<&str> = ps.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(nombres, vec!["Carla", "beto", "Álvaro"]);
    }

    #[test]
    fn test_filter_requests() {
        let rs = vec![
            Request { request_type: "Vacaciones".into(), status: RequestStatus::Pending, ..Default::default() },
            Request { request_type: "vacaciones".into(), status: RequestStatus::Approved, ..Default::default() },
            Request { request_type: "Permiso".into(), status: RequestStatus::Pending, ..Default::default() },
        ];
        assert_eq!(filter_requests(rs.clone(), Some(RequestStatus::Pending), None).len(), 2);
        assert_eq!(filter_requests(rs.clone(), None, Some("VACACIONES")).len(), 2);
        assert_eq!(filter_requests(rs, Some(RequestStatus::Pending), Some("permiso")).len(), 1);
    }

    #[test]
    fn test_filter_attendance() {
        let rows = vec![
            Attendance { fecha: "2024-05-01T00:00:00Z".into(), monitora: Some("Lucía".into()), ..Default::default() },
            Attendance { fecha: "2024-05-02".into(), monitora: Some("Marta".into()), ..Default::default() },
        ];
        let f = AttendanceFilter { fecha: Some("2024-05-01".into()), ..Default::default() };
        assert_eq!(filter_attendance(rows.clone(), &f).len(), 1);
        let f = AttendanceFilter { monitora: Some("lucia".into()), ..Default::default() };
        assert_eq!(filter_attendance(rows.clone(), &f)[0].fecha, "2024-05-01T00:00:00Z");
        let f = AttendanceFilter { bus: Some("12".into()), ..Default::default() };
        assert!(filter_attendance(rows, &f).is_empty());
    }

    #[test]
    fn test_paginate() {
        let p = paginate((1..=23).collect::<Vec<_>>(), 3, 10);
        assert_eq!(p.items, vec![21, 22, 23]);
        assert_eq!(p.total_pages, 3);
        let p = paginate((1..=5).collect::<Vec<_>>(), 0, 2);
        assert_eq!(p.page, 1);
        assert_eq!(p.items, vec![1, 2]);
        let p = paginate((1..=5).collect::<Vec<_>>(), 9, 2);
        assert!(p.items.is_empty());
        let p = paginate(Vec::<u8>::new(), 1, 0);
        assert_eq!(p.total_pages, 1);
    }
}
