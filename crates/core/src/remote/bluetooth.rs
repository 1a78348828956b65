//! Bluetooth app command decoding
//!
//! The Elegoo app sends JSON objects over a serial Bluetooth module, one
//! object per command, e.g. `{"N":2,"D1":3,"D2":200}`. Bytes are collected
//! by [`FrameAssembler`] until the closing `}` and decoded into a
//! [`Command`]. [`ModeSelector`] folds commands into the requested mode.
//!
//! | Frame                  | Meaning                                     |
//! |------------------------|---------------------------------------------|
//! | `{"N":2,"D1":d,"D2":s}`| remote control, order `d` (1..9), speed `s` |
//! | `{"N":3,"D1":1}`       | line tracking                               |
//! | `{"N":3,"D1":2}`       | obstacle avoidance                          |
//! | `{"N":5}`              | toggle remote control / IR control          |
//! | `{"N":100}`            | park (one-shot)                             |
//! | `{"N":101}`            | custom                                      |
//! | any other `N`          | remote control                              |

use heapless::Vec;
use serde::Deserialize;

use crate::behavior::RemoteOrder;
use crate::mode::{Mode, ModeRequest, ModeSource};

/// Frame buffer capacity (bytes)
pub const FRAME_CAPACITY: usize = 96;

/// Errors from frame assembly and decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Frame exceeded the buffer and was discarded
    Overflow,
    /// Frame is not a JSON object of the expected shape
    Malformed,
    /// Known command with an unsupported parameter
    Unsupported,
}

impl core::fmt::Display for CommandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CommandError::Overflow => write!(f, "frame too long"),
            CommandError::Malformed => write!(f, "malformed frame"),
            CommandError::Unsupported => write!(f, "unsupported command parameter"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Frame {
    #[serde(rename = "N")]
    n: u16,
    #[serde(rename = "D1", default)]
    d1: u16,
    #[serde(rename = "D2", default)]
    d2: u16,
}

/// A decoded app command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Manual order with requested speed (0 = default)
    Drive {
        /// Order
        order: RemoteOrder,
        /// Requested speed
        speed: u8,
    },
    /// Switch to line tracking
    LineTracking,
    /// Switch to obstacle avoidance
    ObstacleAvoidance,
    /// Toggle remote control / IR control
    ToggleInfrared,
    /// Run the park script once
    Park,
    /// Switch to the custom mode
    Custom,
    /// Any other command number: back to remote control
    Other(u16),
}

fn joystick_order(d1: u16) -> RemoteOrder {
    match d1 {
        1 => RemoteOrder::Left,
        2 => RemoteOrder::Right,
        3 => RemoteOrder::Forward,
        4 => RemoteOrder::Backward,
        5 => RemoteOrder::Stop,
        6 => RemoteOrder::ForwardLeft,
        7 => RemoteOrder::BackwardLeft,
        8 => RemoteOrder::ForwardRight,
        9 => RemoteOrder::BackwardRight,
        _ => RemoteOrder::Unknown,
    }
}

impl Command {
    /// Decode one complete JSON frame
    pub fn parse(frame: &[u8]) -> Result<Self, CommandError> {
        let (frame, _) = serde_json_core::from_slice::<Frame>(frame)
            .map_err(|_| CommandError::Malformed)?;

        match frame.n {
            2 => Ok(Command::Drive {
                order: joystick_order(frame.d1),
                speed: frame.d2.min(u16::from(u8::MAX)) as u8,
            }),
            3 => match frame.d1 {
                1 => Ok(Command::LineTracking),
                2 => Ok(Command::ObstacleAvoidance),
                _ => Err(CommandError::Unsupported),
            },
            5 => Ok(Command::ToggleInfrared),
            100 => Ok(Command::Park),
            101 => Ok(Command::Custom),
            other => Ok(Command::Other(other)),
        }
    }
}

/// Collects serial bytes into complete frames
///
/// Bytes before the opening `{` are skipped. A frame longer than
/// [`FRAME_CAPACITY`] is dropped as a whole.
pub struct FrameAssembler {
    buffer: Vec<u8, FRAME_CAPACITY>,
    overflowed: bool,
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameAssembler {
    /// Empty assembler
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            overflowed: false,
        }
    }

    /// Feed one byte
    ///
    /// Returns `Some` when the byte completes a frame: the decoded command
    /// or the reason it was rejected.
    pub fn push(&mut self, byte: u8) -> Option<Result<Command, CommandError>> {
        if self.buffer.is_empty() && !self.overflowed && byte != b'{' {
            return None;
        }

        if !self.overflowed && self.buffer.push(byte).is_err() {
            self.buffer.clear();
            self.overflowed = true;
        }

        if byte != b'}' {
            return None;
        }

        if self.overflowed {
            self.overflowed = false;
            return Some(Err(CommandError::Overflow));
        }

        let result = Command::parse(&self.buffer);
        self.buffer.clear();
        Some(result)
    }

    /// Bytes of the frame in progress
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

/// Requested mode built from app commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeSelector {
    request: ModeRequest,
}

impl ModeSelector {
    /// Selector starting in remote control, stopped
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a command into the requested mode
    pub fn apply(&mut self, command: Command) {
        self.request = match command {
            Command::Drive { order, speed } => ModeRequest::remote(order, speed),
            Command::LineTracking => ModeRequest::new(Mode::LineTracking),
            Command::ObstacleAvoidance => ModeRequest::new(Mode::ObstacleAvoidance),
            Command::ToggleInfrared => {
                if self.request.mode == Mode::RemoteControl {
                    ModeRequest::new(Mode::IRControl)
                } else {
                    ModeRequest::new(Mode::RemoteControl)
                }
            }
            Command::Park => ModeRequest::new(Mode::Park),
            Command::Custom => ModeRequest::new(Mode::Custom),
            Command::Other(_) => ModeRequest::new(Mode::RemoteControl),
        };
    }

    /// Feed one serial byte; a completed frame updates the request
    ///
    /// Returns `true` when the byte closed a frame, whether or not the
    /// frame decoded.
    pub fn feed(&mut self, byte: u8, assembler: &mut FrameAssembler) -> bool {
        match assembler.push(byte) {
            Some(Ok(command)) => {
                log::debug!("bt: {:?}", command);
                self.apply(command);
                true
            }
            Some(Err(err)) => {
                log::warn!("bt: frame dropped: {}", err);
                true
            }
            None => false,
        }
    }

    /// Current request, without consuming a one-shot park
    pub fn peek(&self) -> ModeRequest {
        self.request
    }

    /// Current request; a park request is reported once, then reverts to
    /// remote control / stop
    pub fn take(&mut self) -> ModeRequest {
        let request = self.request;
        if request.mode == Mode::Park {
            self.request = ModeRequest::default();
        }
        request
    }
}

impl ModeSource for ModeSelector {
    fn poll(&mut self) -> ModeRequest {
        self.take()
    }
}
