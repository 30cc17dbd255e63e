//! Flutter-facing bindings for the Plotbook core.

pub mod api;
