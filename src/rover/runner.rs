//! Main-loop runner
//!
//! [`Rover`] ties the behavior controller to its mode source and the
//! runtime parameter store. Each [`Rover::run_once`] call:
//!
//! 1. Reloads the tunables if the store changed since the last call
//! 2. Polls the mode source and runs one controller iteration
//!
//! A parameter set that fails validation is rejected and the controller
//! keeps running on the previous one.

use smartcar_core::behavior::OrderSource;
use smartcar_core::mode::{ModeController, ModeSource, Peripherals};
use smartcar_core::motor::MotorDriver;
use smartcar_core::parameters::{BehaviorParams, ParameterError, ParameterStore};
use smartcar_core::sensors::{LineSensorArray, RangeSensor};
use smartcar_core::servo::ServoHead;
use smartcar_core::traits::Clock;

/// Controller, mode source and parameters of one car
pub struct Rover<M, S, R, L, I, C, Src> {
    controller: ModeController<M, S, R, L, I, C>,
    source: Src,
    store: ParameterStore,
}

impl<M, S, R, L, I, C, Src> Rover<M, S, R, L, I, C, Src>
where
    M: MotorDriver,
    S: ServoHead,
    R: RangeSensor,
    L: LineSensorArray,
    I: OrderSource,
    C: Clock,
    Src: ModeSource,
{
    /// Build the rover
    ///
    /// Behavior parameters missing from `store` are registered with their
    /// defaults; the controller starts on the validated contents.
    pub fn new(hw: Peripherals<M, S, R, L, I, C>, source: Src, mut store: ParameterStore) -> Self {
        if let Err(e) = BehaviorParams::register_defaults(&mut store) {
            report("parameter registration failed", e);
        }
        let params = load(&store).unwrap_or_default();
        store.take_changed();

        Self {
            controller: ModeController::new(hw, params),
            source,
            store,
        }
    }

    /// Center the head and stop the motors
    pub fn begin(&mut self) {
        self.controller.begin();
        crate::log_info!("rover started");
    }

    /// One main-loop iteration
    pub fn run_once(&mut self) {
        if self.store.take_changed() {
            self.reload();
        }
        self.controller.run_iteration(&mut self.source);
    }

    /// Run forever
    pub fn run(&mut self) -> ! {
        loop {
            self.run_once();
        }
    }

    fn reload(&mut self) {
        if let Some(params) = load(&self.store) {
            crate::log_info!("parameters reloaded");
            self.controller.apply_params(params);
        }
    }

    /// Runtime parameter store
    pub fn store_mut(&mut self) -> &mut ParameterStore {
        &mut self.store
    }

    /// Behavior controller
    pub fn controller(&self) -> &ModeController<M, S, R, L, I, C> {
        &self.controller
    }

    /// Mode source
    pub fn source(&self) -> &Src {
        &self.source
    }
}

fn load(store: &ParameterStore) -> Option<BehaviorParams> {
    let params = BehaviorParams::from_store(store);
    match params.validate() {
        Ok(()) => Some(params),
        Err(e) => {
            report("parameters rejected", e);
            None
        }
    }
}

fn report(context: &str, err: ParameterError) {
    match err {
        ParameterError::InvalidConfig(reason) => crate::log_warn!("{}: {}", context, reason),
        ParameterError::UnknownParameter => crate::log_warn!("{}: unknown parameter", context),
        ParameterError::StoreFull => crate::log_warn!("{}: store full", context),
        ParameterError::ReadOnly => crate::log_warn!("{}: read-only", context),
        ParameterError::TypeMismatch => crate::log_warn!("{}: type mismatch", context),
    }
}
