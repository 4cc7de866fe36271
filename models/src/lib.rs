// models/src/lib.rs

pub mod calendar;
pub mod clinic;
pub mod errors;

pub use calendar::{DayOfWeek, day_of_week};
pub use errors::{ClinicError, ClinicResult};
