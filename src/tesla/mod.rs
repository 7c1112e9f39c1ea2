mod client;
pub mod images;

pub use client::{ApiError, ClientConfig, TeslaClient};
