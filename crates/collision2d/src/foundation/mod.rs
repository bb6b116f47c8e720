//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and operations
//! - Handle types for the collider arena
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod logging;
