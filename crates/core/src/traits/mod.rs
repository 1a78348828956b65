//! Core traits for platform-agnostic controller functionality.
//!
//! This module provides trait abstractions that decouple the behavior
//! state machines from platform-specific implementations (Embassy, etc.).
//!
//! # Design
//!
//! - Trait definitions are pure and have no feature gates
//! - Mock implementations are always available for host testing
//! - Platform implementations (Embassy) live in the `smartcar` crate

pub mod time;

pub use time::{wait_until, Clock, MockClock};
