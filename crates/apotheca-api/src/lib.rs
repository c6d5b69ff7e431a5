// apotheca-api: Async Rust client for the medicine inventory REST service

pub mod client;
pub mod error;
pub mod field;
pub mod transport;
pub mod types;

pub use client::{DEFAULT_EXPIRING_DAYS, DEFAULT_LOW_STOCK_THRESHOLD, MedicineClient};
pub use error::Error;
pub use field::Field;
pub use transport::{DEFAULT_TIMEOUT, TransportConfig};
pub use types::{MedicineCreateRequest, MedicineResponse, MedicineUpdateRequest};
