//! Core firmware infrastructure
//!
//! Only the logging macros live here; every behavior algorithm is in the
//! `smartcar_core` crate.

pub mod logging;
