//! smartcar_core - Pure no_std behavior logic for the smart car
//!
//! This crate contains the behavior controller and every algorithm it
//! needs, written against collaborator traits so that it can be tested on
//! the host without hardware or feature flags.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives
//! - **Pure no_std**: No std library dependencies outside tests
//! - **Trait abstractions**: Motors, servo, sensors and time are injected
//!
//! # Modules
//!
//! - [`traits`]: Time abstraction (`Clock`, `MockClock`, `wait_until`)
//! - [`motor`]: Differential drive commands and dead-zone rules
//! - [`servo`]: Scan head contract and sweep sequencing
//! - [`sensors`]: Range sensor, range map and line sensors
//! - [`parameters`]: Parameter store and behavior tunables
//! - [`behavior`]: Ramp, obstacle avoidance, line tracking, park, custom, remote orders
//! - [`mode`]: Mode selection and the `ModeController`
//! - [`remote`]: Infrared and Bluetooth command decoding
//! - [`hal`]: Fakes for hardware-free tests

#![cfg_attr(not(test), no_std)]

pub mod behavior;
pub mod hal;
pub mod mode;
pub mod motor;
pub mod parameters;
pub mod remote;
pub mod sensors;
pub mod servo;
pub mod traits;
