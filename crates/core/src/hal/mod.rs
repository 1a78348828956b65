//! Hardware abstraction helpers shared by host tests

pub mod mock;
