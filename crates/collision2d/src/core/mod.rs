//! # Core Module
//!
//! Shared configuration for the collision subsystem.
//!
//! ## Organization
//!
//! - **Config**: physics world settings (grid cell size, gravity, raycast policy)

pub mod config;

pub use config::PhysicsConfig;
pub use crate::config::{Config, ConfigError};
