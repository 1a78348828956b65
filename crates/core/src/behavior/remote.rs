//! Remote orders
//!
//! Manual driving orders come from the Bluetooth app (with the mode
//! request) or from the infrared remote (polled through [`OrderSource`]).

use crate::motor::MotorCommand;
use crate::parameters::BehaviorParams;

/// A manual driving order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemoteOrder {
    /// Spin left in place
    Left,
    /// Spin right in place
    Right,
    /// Straight ahead
    Forward,
    /// Straight back
    Backward,
    /// Stop both sides
    #[default]
    Stop,
    /// Forward arc to the left
    ForwardLeft,
    /// Reverse arc to the left
    BackwardLeft,
    /// Forward arc to the right
    ForwardRight,
    /// Reverse arc to the right
    BackwardRight,
    /// Unmapped key or command
    Unknown,
}

/// Source of remote orders, polled once per IR control tick
pub trait OrderSource {
    /// Next received order, or `None` when nothing arrived since the last poll
    fn poll_order(&mut self) -> Option<RemoteOrder>;
}

impl<T: OrderSource + ?Sized> OrderSource for &mut T {
    fn poll_order(&mut self) -> Option<RemoteOrder> {
        (**self).poll_order()
    }
}

/// Motor command for an order
///
/// Linear and diagonal orders default to `SPD_MOVE`, rotations to
/// `SPD_ROTATE`; a non-zero `speed` overrides the default. `Unknown`
/// yields `None`.
pub fn order_command(order: RemoteOrder, speed: u8, params: &BehaviorParams) -> Option<MotorCommand> {
    let pick = |default: u8| if speed == 0 { default } else { speed };
    let linear = pick(params.move_speed);
    let rotation = pick(params.rotate_speed);

    let command = match order {
        RemoteOrder::Stop => MotorCommand::STOP,
        RemoteOrder::Forward => MotorCommand::forward(linear),
        RemoteOrder::Backward => MotorCommand::backward(linear),
        RemoteOrder::Left => MotorCommand::rotate_left(rotation),
        RemoteOrder::Right => MotorCommand::rotate_right(rotation),
        RemoteOrder::ForwardLeft => MotorCommand::forward_left(linear),
        RemoteOrder::ForwardRight => MotorCommand::forward_right(linear),
        RemoteOrder::BackwardLeft => MotorCommand::backward_left(linear),
        RemoteOrder::BackwardRight => MotorCommand::backward_right(linear),
        RemoteOrder::Unknown => return None,
    };
    Some(command)
}
