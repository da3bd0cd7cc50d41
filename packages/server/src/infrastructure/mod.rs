//! Infrastructure layer: configuration, DTOs, repository and transport
//! implementations.

pub mod config;
pub mod dto;
pub mod repository;
pub mod transport;
