//! Flutter-facing bindings for TileMaster core.

pub mod api;
