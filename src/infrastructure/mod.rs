//! Infrastructure layer: wire DTOs and store implementations.

pub mod dto;
pub mod repository;
