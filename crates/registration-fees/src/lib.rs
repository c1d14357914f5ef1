pub mod config;
pub mod error;
pub mod relaxation;
pub mod telemetry;
