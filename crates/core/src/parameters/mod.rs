//! Behavior tuning parameters
//!
//! Every threshold and timing of the behavior controller is a named
//! parameter. [`ParameterStore`] holds the values at runtime and
//! [`BehaviorParams`] is the typed snapshot the controller reads each tick.
//! There is no persistence: defaults are registered at boot and may be
//! overridden before (or between) runs.

pub mod behavior;
pub mod error;
pub mod storage;

pub use behavior::BehaviorParams;
pub use error::ParameterError;
pub use storage::{ParamFlags, ParamMetadata, ParamValue, ParameterStore, MAX_PARAMS, PARAM_NAME_LEN};
