//! Remote command decoding
//!
//! - [`infrared`]: Elegoo IR remote key decoding (an [`OrderSource`](crate::behavior::OrderSource))
//! - [`bluetooth`]: Elegoo app JSON frames (a [`ModeSource`](crate::mode::ModeSource))

pub mod bluetooth;
pub mod infrared;

pub use bluetooth::{Command, CommandError, FrameAssembler, ModeSelector};
pub use infrared::{InfraredDecoder, IrReceiver, Key};
