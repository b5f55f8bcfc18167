// Gráfico de barras de kilometraje en SVG (sin dependencias de fuentes).
use plotters::prelude::*;

use crate::agregados::TotalKm;
use crate::error::AppError;

const ANCHO: u32 = 900;
const ALTO: u32 = 480;

fn export_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(format!("no se pudo dibujar el gráfico: {}", e))
}

/// Barras verticales, una por clave (bus o día), con el total de kilómetros.
pub fn km_chart_svg(totales: &[TotalKm], titulo: &str) -> Result<String, AppError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (ANCHO, ALTO)).into_drawing_area();
        root.fill(&WHITE).map_err(export_err)?;

        let max = totales.iter().map(|t| t.kilometros).fold(0.0_f64, f64::max);
        let tope = if max > 0.0 { max * 1.1 } else { 1.0 };
        let barras = totales.len().max(1) as u32;

        let mut chart = ChartBuilder::on(&root)
            .caption(titulo, ("sans-serif", 22))
            .margin(16)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d((0u32..barras).into_segmented(), 0f64..tope)
            .map_err(export_err)?;

        let etiqueta = |x: &SegmentValue<u32>| match x {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => totales.get(*i as usize).map(|t| t.clave.clone()).unwrap_or_default(),
            _ => String::new(),
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(totales.len() + 1)
            .x_label_formatter(&etiqueta)
            .y_desc("Kilómetros")
            .draw()
            .map_err(export_err)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(BLUE.mix(0.7).filled())
                    .margin(8)
                    .data(totales.iter().enumerate().map(|(i, t)| (i as u32, t.kilometros))),
            )
            .map_err(export_err)?;

        root.present().map_err(export_err)?;
    }
    Ok(svg)
}
