// storage/src/lib.rs

pub mod errors;
pub mod store;

pub use errors::{StoreError, StoreResult};
pub use store::ClinicStore;
