//! Core use-case services.
//!
//! # Responsibility
//! - Group the per-domain stores into the unit a UI works with.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod workbook_service;
