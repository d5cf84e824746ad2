//! Towercast Core - Domain models, collaborator ports, and configuration
//!
//! This crate contains the request-scoped domain types shared by the coverage
//! pipeline and the market-sizing query compiler, plus the port traits that
//! external collaborators implement.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{Result, TowercastError};
