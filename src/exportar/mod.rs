//! Descargas generadas por el servicio: libros xlsx y gráficos SVG.

pub mod graficos;
pub mod xlsx;

pub use graficos::km_chart_svg;
pub use xlsx::{export_attendance, export_personas, export_requests, XLSX_CONTENT_TYPE};
