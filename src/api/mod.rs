pub mod client;
pub mod error;

pub use client::{decode_payload, TrainingClient};
pub use error::ApiError;
