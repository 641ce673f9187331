//! Startup zeroing: drive each joint onto its limit switch, then park it at
//! the neutral reference angle.

use std::time::Duration;

use tracing::info;

use crate::rig::{Delay, LimitSwitches, Servos, LEGS};
use crate::Controller;
use protocol::CONFIRMED;

/// Angle commanded while seeking the end stop.
pub const SEEK_ANGLE: i32 = 0;

/// Reference pose commanded the instant a joint seats.
pub const NEUTRAL_ANGLE: i32 = 90;

/// Limit switch polling period while driving toward the stop.
pub const POLL_PERIOD: Duration = Duration::from_millis(10);

impl<S, L, D> Controller<S, L, D>
where
    S: Servos,
    L: LimitSwitches,
    D: Delay,
{
    /// Run the full zeroing sequence and advertise readiness.
    ///
    /// Legs run strictly in the [`LEGS`] order, joints within a leg hip ->
    /// knee -> ankle, one joint driving at a time. This blocks for as long
    /// as the slowest joint takes to seat; the transport must not deliver
    /// transfers until it returns (inbound callbacks drop them regardless).
    ///
    /// A joint already on its stop is parked at neutral without a seek
    /// command.
    pub fn calibrate(&mut self) {
        info!("zeroing servos");
        for leg in &LEGS {
            info!(leg = leg.name, "zeroing leg");
            for joint in leg.joints() {
                while !self.switches.is_triggered(joint) {
                    self.servos.set_target(joint, SEEK_ANGLE);
                    self.delay.sleep(POLL_PERIOD);
                }
                self.servos.set_target(joint, NEUTRAL_ANGLE);
                info!(joint, "joint seated");
            }
        }
        self.packet.confirmation = CONFIRMED;
        self.ready = true;
        info!("all servos zeroed, ready for commands");
    }
}
