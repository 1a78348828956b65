#![cfg_attr(not(test), no_std)]

//! smartcar - Behavior controller firmware for a four-wheel smart car
//!
//! This library provides the platform abstraction, device drivers and main
//! loop glue around the hardware-independent behavior controller in
//! `smartcar_core`.

#[cfg(all(not(test), feature = "mock"))]
extern crate std;

// Platform abstraction layer
pub mod platform;

// Device drivers using platform abstraction
pub mod devices;

// Logging macros
pub mod core;

// Shared driver libraries (motor bridges)
pub mod libraries;

// Vehicle glue: Bluetooth mode source and main-loop runner
pub mod rover;

pub use smartcar_core;
