//! Infrared remote decoding
//!
//! The receiver hands over raw 32-bit NEC codes. A raw value of 0 is the
//! repeat code sent while a key is held and stands for the previous key.

use crate::behavior::{OrderSource, RemoteOrder};

/// Raw NEC repeat code
pub const REPEAT: u32 = 0;

/// Keys of the Elegoo remote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// OK (center)
    Ok,
    /// Arrow up
    Up,
    /// Arrow down
    Down,
    /// Arrow left
    Left,
    /// Arrow right
    Right,
    /// Digit key 0-9
    Digit(u8),
    /// `*`
    Star,
    /// `#`
    Hash,
}

const KEY_TABLE: [(u32, Key); 17] = [
    (3_208_707_840, Key::Ok),
    (3_108_437_760, Key::Up),
    (3_927_310_080, Key::Down),
    (3_141_861_120, Key::Left),
    (3_158_572_800, Key::Right),
    (2_907_897_600, Key::Digit(0)),
    (3_910_598_400, Key::Digit(1)),
    (3_860_463_360, Key::Digit(2)),
    (4_061_003_520, Key::Digit(3)),
    (4_077_715_200, Key::Digit(4)),
    (3_877_175_040, Key::Digit(5)),
    (2_707_357_440, Key::Digit(6)),
    (4_144_561_920, Key::Digit(7)),
    (3_810_328_320, Key::Digit(8)),
    (2_774_204_160, Key::Digit(9)),
    (3_175_284_480, Key::Star),
    (3_041_591_040, Key::Hash),
];

impl Key {
    /// Look up a raw code
    pub fn from_raw(raw: u32) -> Option<Self> {
        KEY_TABLE
            .iter()
            .find(|(code, _)| *code == raw)
            .map(|(_, key)| *key)
    }

    /// Driving order bound to the key
    pub fn order(&self) -> RemoteOrder {
        match self {
            Key::Ok => RemoteOrder::Stop,
            Key::Up => RemoteOrder::Forward,
            Key::Down => RemoteOrder::Backward,
            Key::Left => RemoteOrder::Left,
            Key::Right => RemoteOrder::Right,
            Key::Digit(_) | Key::Star | Key::Hash => RemoteOrder::Unknown,
        }
    }
}

/// Raw IR receiver contract
pub trait IrReceiver {
    /// Next raw code, or `None` when nothing was received
    fn receive(&mut self) -> Option<u32>;
}

impl<T: IrReceiver + ?Sized> IrReceiver for &mut T {
    fn receive(&mut self) -> Option<u32> {
        (**self).receive()
    }
}

/// Turns raw codes into remote orders, resolving repeat codes
pub struct InfraredDecoder<R> {
    receiver: R,
    previous: Option<u32>,
}

impl<R: IrReceiver> InfraredDecoder<R> {
    /// Wrap a receiver
    pub fn new(receiver: R) -> Self {
        Self {
            receiver,
            previous: None,
        }
    }

    /// Resolve one raw code (repeat codes stand for the previous code)
    pub fn decode(&mut self, raw: u32) -> Option<Key> {
        let raw = if raw == REPEAT {
            self.previous?
        } else {
            self.previous = Some(raw);
            raw
        };
        Key::from_raw(raw)
    }

    /// Wrapped receiver
    pub fn receiver(&self) -> &R {
        &self.receiver
    }
}

impl<R: IrReceiver> OrderSource for InfraredDecoder<R> {
    fn poll_order(&mut self) -> Option<RemoteOrder> {
        let raw = self.receiver.receive()?;
        let order = self
            .decode(raw)
            .map_or(RemoteOrder::Unknown, |key| key.order());
        log::trace!("ir: raw {} -> {:?}", raw, order);
        Some(order)
    }
}
