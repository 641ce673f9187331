//! Wire format shared by the coordinator and the leg controller.
//!
//! Every transfer on the bus is exactly one [`Packet`]: twelve signed joint
//! angles in global joint order plus a confirmation word. The transport does
//! no framing beyond the byte count, so a transfer of any other length is a
//! protocol fault, not a parse error.

use serde::{Deserialize, Serialize};

/// Number of servo joints on the robot (4 legs x 3 joints).
pub const JOINT_COUNT: usize = 12;

/// Serialized packet length in bytes: 13 fixed-width little-endian words.
pub const PACKET_SIZE: usize = (JOINT_COUNT + 1) * 4;

/// Confirmation word value meaning "accepted and processed".
pub const CONFIRMED: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    /// Target angles in degrees, indexed by global joint id 0..11.
    pub angles: [i32; JOINT_COUNT],
    /// [`CONFIRMED`] once the receiving side has processed the last transfer.
    pub confirmation: i32,
}

/// Meaning of an inbound packet, decided by the all-zero sentinel rule.
///
/// There is no type field on the wire; a packet whose twelve angles are all
/// exactly zero is a probe, whatever its confirmation word says.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound {
    /// Link-readiness check; must not move any servo.
    Probe,
    /// Real joint targets for all twelve servos.
    Command([i32; JOINT_COUNT]),
}

impl Packet {
    /// The probe packet: all angles zero, unconfirmed.
    pub fn probe() -> Self {
        Self {
            angles: [0; JOINT_COUNT],
            confirmation: 0,
        }
    }

    /// Power-on state of the controller's stored packet: every joint at the
    /// neutral reference angle, nothing confirmed yet.
    pub fn neutral() -> Self {
        Self {
            angles: [90; JOINT_COUNT],
            confirmation: 0,
        }
    }

    pub fn is_probe(&self) -> bool {
        self.angles.iter().all(|&a| a == 0)
    }

    pub fn classify(&self) -> Inbound {
        if self.is_probe() {
            Inbound::Probe
        } else {
            Inbound::Command(self.angles)
        }
    }

    pub fn confirmed(&self) -> bool {
        self.confirmation == CONFIRMED
    }

    /// Serialize to exactly [`PACKET_SIZE`] bytes.
    pub fn encode(&self) -> Result<Vec<u8>, WireError> {
        let bytes = bincode::serialize(self)?;
        debug_assert_eq!(bytes.len(), PACKET_SIZE);
        Ok(bytes)
    }

    /// Deserialize from a buffer that must hold exactly one packet.
    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        if bytes.len() != PACKET_SIZE {
            return Err(WireError::Size {
                got: bytes.len(),
                want: PACKET_SIZE,
            });
        }
        Ok(bincode::deserialize(bytes)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("transfer was {got} bytes, expected {want}")]
    Size { got: usize, want: usize },

    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),
}
