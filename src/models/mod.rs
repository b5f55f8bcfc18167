// Estructuras de datos principales.
//
// Todas reflejan formas JSON definidas por el backend; los campos opcionales
// se resuelven al deserializar (ver `de`) y no más adelante.

pub(crate) mod de;
mod horario;
mod persona;
mod solicitud;
mod transporte;

pub use horario::{Corporation, CorporationSchedule, ExtraField, ScheduleSlot, SlotLabel, TaggedSlot};
pub use persona::{Persona, PersonaDetalle, ESTADO_ACTIVO, ESTADO_INACTIVO};
pub use solicitud::{MechanicRequest, Request, RequestStatus};
pub use transporte::{Attendance, KmStat, Page, RouteHistoryEntry};
