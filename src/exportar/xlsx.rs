//! Libros Excel generados en memoria para descarga.
//!
//! Cada exportación arma una o más `Hoja` con un esquema de columnas fijo y
//! las escribe con `umya-spreadsheet`; el resultado son los bytes del .xlsx.

use std::io::Cursor;

use crate::agregados::group_attendance_by_piloto;
use crate::error::AppError;
use crate::horarios::resolve_schedule_label;
use crate::models::{Attendance, Corporation, Persona, Request};

pub const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Clone, PartialEq)]
pub enum Celda {
    Texto(String),
    Numero(f64),
    Vacia,
}

impl From<&str> for Celda {
    fn from(s: &str) -> Celda {
        if s.is_empty() { Celda::Vacia } else { Celda::Texto(s.to_string()) }
    }
}

impl From<String> for Celda {
    fn from(s: String) -> Celda {
        if s.is_empty() { Celda::Vacia } else { Celda::Texto(s) }
    }
}

impl From<Option<String>> for Celda {
    fn from(s: Option<String>) -> Celda {
        s.map(Celda::from).unwrap_or(Celda::Vacia)
    }
}

impl From<Option<&str>> for Celda {
    fn from(s: Option<&str>) -> Celda {
        s.map(Celda::from).unwrap_or(Celda::Vacia)
    }
}

impl From<Option<i64>> for Celda {
    fn from(n: Option<i64>) -> Celda {
        n.map(|n| Celda::Numero(n as f64)).unwrap_or(Celda::Vacia)
    }
}

impl From<Option<f64>> for Celda {
    fn from(n: Option<f64>) -> Celda {
        n.map(Celda::Numero).unwrap_or(Celda::Vacia)
    }
}

#[derive(Debug, Clone)]
pub struct Hoja {
    pub nombre: String,
    pub encabezados: Vec<String>,
    pub filas: Vec<Vec<Celda>>,
}

/// Índice 1-based a letras de columna (1 = "A", 27 = "AA").
pub fn column_letters(mut index: u32) -> String {
    let mut letras = Vec::new();
    while index > 0 {
        let rem = ((index - 1) % 26) as u8;
        letras.push((b'A' + rem) as char);
        index = (index - 1) / 26;
    }
    letras.iter().rev().collect()
}

/// Escribe las hojas en un libro nuevo y devuelve los bytes.
pub fn build_workbook(hojas: &[Hoja]) -> Result<Vec<u8>, AppError> {
    let mut book = umya_spreadsheet::new_file_empty_worksheet();

    for hoja in hojas {
        let sheet = book
            .new_sheet(hoja.nombre.clone())
            .map_err(|e| AppError::Export(format!("hoja '{}': {}", hoja.nombre, e)))?;

        for (i, titulo) in hoja.encabezados.iter().enumerate() {
            let col = i as u32 + 1;
            sheet.get_cell_mut((col, 1)).set_value(titulo.clone());
            sheet.get_style_mut((col, 1)).get_font_mut().set_bold(true);
            let ancho = hoja
                .filas
                .iter()
                .filter_map(|f| match f.get(i) {
                    Some(Celda::Texto(t)) => Some(t.chars().count()),
                    _ => None,
                })
                .chain(std::iter::once(titulo.chars().count()))
                .max()
                .unwrap_or(10)
                .clamp(8, 50);
            sheet.get_column_dimension_mut(&column_letters(col)).set_width(ancho as f64 + 2.0);
        }

        for (r, fila) in hoja.filas.iter().enumerate() {
            let row = r as u32 + 2;
            for (c, celda) in fila.iter().enumerate() {
                let col = c as u32 + 1;
                match celda {
                    Celda::Texto(t) => {
                        sheet.get_cell_mut((col, row)).set_value(t.clone());
                    }
                    Celda::Numero(n) => {
                        sheet.get_cell_mut((col, row)).set_value_number(*n);
                    }
                    Celda::Vacia => {}
                }
            }
        }
    }

    let mut buf = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut buf)
        .map_err(|e| AppError::Export(format!("no se pudo escribir el xlsx: {}", e)))?;
    Ok(buf.into_inner())
}

/// Hoja de colaboradores/empleados; agrega una columna por cada campo extra
/// de la corporación.
pub fn personas_sheet(nombre_hoja: &str, personas: &[Persona], corporation: &Corporation) -> Hoja {
    let mut encabezados: Vec<String> = [
        "ID",
        "Nombre",
        "Apellido",
        "Correo",
        "Teléfono",
        "Estado",
        "Dirección de servicio",
        "Zona/Sector",
        "Tipo de ruta",
        "Horario",
        "Contacto de emergencia",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    encabezados.extend(corporation.extra_enrollment_fields.iter().map(|f| f.field_name.clone()));

    let filas = personas
        .iter()
        .map(|p| {
            let d = p.detail.clone().unwrap_or_default();
            let mut fila: Vec<Celda> = vec![
                p.id.into(),
                if d.first_name.is_empty() { p.name.clone().into() } else { d.first_name.clone().into() },
                d.last_name.clone().into(),
                p.email.clone().into(),
                p.phone_number.clone().into(),
                p.estado_label().into(),
                d.service_address.clone().into(),
                d.zone_or_sector.clone().into(),
                d.route_type.clone().into(),
                resolve_schedule_label(corporation, d.selected_schedule).into(),
                d.emergency_contact.clone().into(),
            ];
            fila.extend(corporation.extra_enrollment_fields.iter().map(|f| p.extra_field(&f.field_name).into()));
            fila
        })
        .collect();

    Hoja { nombre: nombre_hoja.to_string(), encabezados, filas }
}

pub fn export_personas(nombre_hoja: &str, personas: &[Persona], corporation: &Corporation) -> Result<Vec<u8>, AppError> {
    build_workbook(&[personas_sheet(nombre_hoja, personas, corporation)])
}

fn redondear(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}

/// Detalle de asistencia más una hoja "Resumen" por piloto.
pub fn export_attendance(rows: &[Attendance]) -> Result<Vec<u8>, AppError> {
    let detalle = Hoja {
        nombre: "Asistencia".into(),
        encabezados: ["Fecha", "Día", "Horario", "Monitora", "Piloto", "Bus", "Colegio", "Total alumnos", "Presentes", "% Asistencia"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        filas: rows
            .iter()
            .map(|a| {
                vec![
                    a.fecha.clone().into(),
                    a.day.clone().into(),
                    a.schedule.clone().into(),
                    a.monitora.clone().into(),
                    a.piloto.clone().into(),
                    a.bus.clone().into(),
                    a.school.clone().into(),
                    a.total_alumnos.into(),
                    a.alumnos_presentes.into(),
                    a.porcentaje().map(redondear).into(),
                ]
            })
            .collect(),
    };

    let resumen = Hoja {
        nombre: "Resumen".into(),
        encabezados: ["Piloto", "Registros", "Días", "Total alumnos", "Presentes", "% Asistencia"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        filas: group_attendance_by_piloto(rows)
            .into_iter()
            .map(|g| {
                vec![
                    g.piloto.into(),
                    Celda::Numero(g.registros as f64),
                    Celda::Numero(g.dias as f64),
                    Celda::Numero(g.total_alumnos as f64),
                    Celda::Numero(g.alumnos_presentes as f64),
                    g.porcentaje.map(redondear).into(),
                ]
            })
            .collect(),
    };

    build_workbook(&[detalle, resumen])
}

pub fn export_requests(requests: &[Request]) -> Result<Vec<u8>, AppError> {
    let fecha = |d: Option<chrono::DateTime<chrono::Utc>>| d.map(|d| d.format("%Y-%m-%d %H:%M").to_string());
    let hoja = Hoja {
        nombre: "Solicitudes".into(),
        encabezados: ["ID", "Tipo", "Título", "Estado", "Prioridad", "Motivo", "Creada", "Revisada", "Revisor", "Notas de revisión"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        filas: requests
            .iter()
            .map(|r| {
                vec![
                    r.id.into(),
                    r.request_type.clone().into(),
                    r.title.clone().into(),
                    r.status.label().into(),
                    r.priority.clone().into(),
                    r.reason.clone().into(),
                    fecha(r.created_at).into(),
                    fecha(r.reviewed_at).into(),
                    r.reviewer_name().into(),
                    r.review_notes.clone().into(),
                ]
            })
            .collect(),
    };
    build_workbook(&[hoja])
}
