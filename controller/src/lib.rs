//! Actuator-side role: zeroes the twelve leg servos at startup, then
//! services bus transfers as the fixed-address follower.
//!
//! The bus transport owns the callback timing: it invokes [`Controller::on_receive`]
//! when a transfer arrives and [`Controller::on_request`] when the coordinator
//! asks to read, and never both at once. The controller itself does nothing
//! between callbacks once calibration is over.

pub mod calibration;
pub mod rig;

use protocol::{Inbound, Packet, WireError, CONFIRMED};
use tracing::{error, info, warn};

use crate::rig::{Delay, LimitSwitches, Servos};

pub struct Controller<S, L, D> {
    servos: S,
    switches: L,
    delay: D,
    /// Last transfer, echoed back verbatim on every read request.
    packet: Packet,
    /// Set once calibration finishes; transfers before that are dropped.
    ready: bool,
}

impl<S, L, D> Controller<S, L, D>
where
    S: Servos,
    L: LimitSwitches,
    D: Delay,
{
    pub fn new(servos: S, switches: L, delay: D) -> Self {
        Self {
            servos,
            switches,
            delay,
            packet: Packet::neutral(),
            ready: false,
        }
    }

    /// Inbound transfer callback, registered with the bus transport.
    ///
    /// A transfer of the wrong size is dropped whole: the stored packet
    /// keeps whatever state the previous transfer left, and the next read
    /// request answers from that. Once a validly sized packet lands the
    /// confirmation word always ends up set, probe or command alike.
    pub fn on_receive(&mut self, bytes: &[u8]) {
        if !self.ready {
            warn!("transfer before zeroing finished, dropping");
            return;
        }
        self.packet = match Packet::decode(bytes) {
            Ok(packet) => packet,
            Err(e) => {
                error!("dropping transfer: {e}");
                return;
            }
        };
        match self.packet.classify() {
            Inbound::Probe => {
                info!("probe received, confirming readiness");
            }
            Inbound::Command(angles) => {
                for (joint, &degrees) in angles.iter().enumerate() {
                    self.servos.set_target(joint, degrees);
                    info!(joint, degrees, "servo moved");
                }
            }
        }
        self.packet.confirmation = CONFIRMED;
    }

    /// Outbound transfer callback: serialize the stored packet verbatim,
    /// in whatever state the last inbound transfer left it.
    pub fn on_request(&self) -> Result<Vec<u8>, WireError> {
        self.packet.encode()
    }
}
