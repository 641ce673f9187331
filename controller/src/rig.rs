//! Hardware seams for the leg controller.
//!
//! The real board wires these to PWM servo outputs and pulled-up limit
//! switch inputs; tests substitute recording fakes.

use std::time::Duration;

/// Positional servo outputs, one control line per joint.
///
/// Angles are degrees, nominally 0..=180. Range policy belongs to the
/// driver; the controller passes received values through uninspected.
pub trait Servos {
    /// Command joint `joint` (global index 0..11) to `degrees`.
    fn set_target(&mut self, joint: usize, degrees: i32);
}

/// Per-joint binary limit switch, active when the joint is hard against its
/// mechanical end stop. The lines idle high through pull-ups and read low
/// when pressed; implementations expose the decoded state.
pub trait LimitSwitches {
    fn is_triggered(&self, joint: usize) -> bool;
}

/// Blocking delay provider for the calibration polling loop.
pub trait Delay {
    fn sleep(&mut self, period: Duration);
}

/// [`Delay`] backed by the OS scheduler, for running on a real board.
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn sleep(&mut self, period: Duration) {
        std::thread::sleep(period);
    }
}

/// One leg: three mechanically chained joints sharing a calibration pass,
/// in order hip, knee, ankle.
#[derive(Debug, Clone, Copy)]
pub struct Leg {
    pub name: &'static str,
    /// Global index of the hip joint; knee and ankle follow at +1 and +2.
    pub base: usize,
}

impl Leg {
    /// Joint indices in calibration order.
    pub fn joints(&self) -> [usize; 3] {
        [self.base, self.base + 1, self.base + 2]
    }
}

/// Calibration runs over the legs in this order. The base indices must
/// match the angle order the coordinator assumes when it fills a packet;
/// nothing on the wire enforces that contract.
pub const LEGS: [Leg; 4] = [
    Leg {
        name: "front-left",
        base: 0,
    },
    Leg {
        name: "front-right",
        base: 3,
    },
    Leg {
        name: "back-left",
        base: 6,
    },
    Leg {
        name: "back-right",
        base: 9,
    },
];
