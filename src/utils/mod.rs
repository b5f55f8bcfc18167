//! Utilidades puras compartidas por las vistas.

mod duplicados;
mod texto;

pub use duplicados::{duplicate_email_message, handle_duplicate_email_error};
pub use texto::{contains_normalized, normalize_key};
