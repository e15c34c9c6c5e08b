//! Shared types for the UltraSinger job API.

pub mod request;
pub mod response;

pub use crate::types::{JobSource, JobStatus, ProcessingStep, QualityPreset};
