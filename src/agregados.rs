// Agregaciones para gráficos y hojas de resumen.
use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Attendance, KmStat, Request, RequestStatus};

pub const SIN_ASIGNAR: &str = "Sin asignar";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResumenAsistencia {
    pub piloto: String,
    pub registros: usize,
    pub dias: usize,
    pub total_alumnos: i64,
    pub alumnos_presentes: i64,
    /// 0-100; None cuando no hubo alumnos esperados.
    pub porcentaje: Option<f64>,
}

fn responsable(row: &Attendance) -> String {
    [row.piloto.as_deref(), row.monitora.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(SIN_ASIGNAR)
        .to_string()
}

/// Agrupa la asistencia por piloto (o monitora si no hay piloto). Los
/// grupos salen ordenados por nombre.
pub fn group_attendance_by_piloto(rows: &[Attendance]) -> Vec<ResumenAsistencia> {
    let mut grupos: BTreeMap<String, (usize, Vec<String>, i64, i64)> = BTreeMap::new();
    for row in rows {
        let entry = grupos.entry(responsable(row)).or_insert_with(|| (0, Vec::new(), 0, 0));
        entry.0 += 1;
        let fecha = row.fecha.get(..10).unwrap_or(row.fecha.as_str()).to_string();
        if !fecha.is_empty() && !entry.1.contains(&fecha) {
            entry.1.push(fecha);
        }
        entry.2 += row.total_alumnos.unwrap_or(0);
        entry.3 += row.alumnos_presentes.unwrap_or(0);
    }

    grupos
        .into_iter()
        .map(|(piloto, (registros, fechas, total, presentes))| ResumenAsistencia {
            piloto,
            registros,
            dias: fechas.len(),
            total_alumnos: total,
            alumnos_presentes: presentes,
            porcentaje: if total > 0 { Some(presentes as f64 * 100.0 / total as f64) } else { None },
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TotalKm {
    pub clave: String,
    pub kilometros: f64,
    pub viajes: usize,
}

fn km_totals_by<F>(stats: &[KmStat], clave: F) -> Vec<TotalKm>
where
    F: Fn(&KmStat) -> String,
{
    let mut acc: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for s in stats {
        let e = acc.entry(clave(s)).or_insert((0.0, 0));
        e.0 += s.kilometros.unwrap_or(0.0);
        e.1 += 1;
    }
    acc.into_iter()
        .map(|(clave, (kilometros, viajes))| TotalKm { clave, kilometros, viajes })
        .collect()
}

/// Kilómetros totales por bus, ordenados por bus.
pub fn km_totals_by_bus(stats: &[KmStat]) -> Vec<TotalKm> {
    km_totals_by(stats, |s| {
        s.bus.as_deref().map(str::trim).filter(|b| !b.is_empty()).unwrap_or(SIN_ASIGNAR).to_string()
    })
}

/// Kilómetros totales por día (YYYY-MM-DD), en orden cronológico.
pub fn km_totals_by_fecha(stats: &[KmStat]) -> Vec<TotalKm> {
    km_totals_by(stats, |s| s.fecha.get(..10).unwrap_or(s.fecha.as_str()).to_string())
}

/// Conteo por estado, incluyendo los estados sin solicitudes.
pub fn request_status_counts(requests: &[Request]) -> Vec<(RequestStatus, usize)> {
    let mut out: Vec<(RequestStatus, usize)> = RequestStatus::ALL.iter().map(|s| (*s, 0)).collect();
    for r in requests {
        match out.iter_mut().find(|(s, _)| *s == r.status) {
            Some((_, n)) => *n += 1,
            None => out.push((r.status, 1)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asistencia(fecha: &str, piloto: Option<&str>, monitora: Option<&str>, total: i64, presentes: i64) -> Attendance {
        Attendance {
            fecha: fecha.into(),
            piloto: piloto.map(Into::into),
            monitora: monitora.map(Into::into),
            total_alumnos: Some(total),
            alumnos_presentes: Some(presentes),
            ..Default::default()
        }
    }

    #[test]
    fn test_agrupa_por_piloto_con_respaldo_monitora() {
        let rows = vec![
            asistencia("2024-05-01", Some("Pedro"), Some("Lucía"), 20, 18),
            asistencia("2024-05-01T12:00:00Z", Some("Pedro"), None, 20, 12),
            asistencia("2024-05-02", None, Some("Lucía"), 10, 10),
            asistencia("2024-05-02", Some("  "), None, 5, 0),
        ];
        let r = group_attendance_by_piloto(&rows);
        let nombres: Vec<&str> = r.iter().map(|g| g.piloto.as_str()).collect();
        assert_eq!(nombres, vec!["Lucía", "Pedro", SIN_ASIGNAR]);

        let pedro = &r[1];
        assert_eq!(pedro.registros, 2);
        assert_eq!(pedro.dias, 1);
        assert_eq!(pedro.total_alumnos, 40);
        assert_eq!(pedro.porcentaje, Some(75.0));
    }

    #[test]
    fn test_km_totales() {
        let stats = vec![
            KmStat { fecha: "2024-05-02".into(), bus: Some("B-2".into()), kilometros: Some(10.0), ..Default::default() },
            KmStat { fecha: "2024-05-01".into(), bus: Some("B-1".into()), kilometros: Some(7.5), ..Default::default() },
            KmStat { fecha: "2024-05-01".into(), bus: Some("B-2".into()), kilometros: None, ..Default::default() },
        ];
        let por_bus = km_totals_by_bus(&stats);
        assert_eq!(por_bus[1], TotalKm { clave: "B-2".into(), kilometros: 10.0, viajes: 2 });
        let por_fecha = km_totals_by_fecha(&stats);
        assert_eq!(por_fecha[0].clave, "2024-05-01");
        assert_eq!(por_fecha[0].kilometros, 7.5);
    }

    #[test]
    fn test_conteo_estados() {
        let rs = vec![
            Request { status: RequestStatus::Pending, ..Default::default() },
            Request { status: RequestStatus::Pending, ..Default::default() },
            Request { status: RequestStatus::Unknown, ..Default::default() },
        ];
        let c = request_status_counts(&rs);
        assert_eq!(c[0], (RequestStatus::Pending, 2));
        assert_eq!(c.len(), 7);
        assert_eq!(c[6], (RequestStatus::Unknown, 1));
    }
}
