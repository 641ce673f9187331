//! Command-source role: establishes the link with the leg controller, then
//! streams gait frames and reads back confirmations.
//!
//! The link is strictly request/response. Every write is followed by a
//! settle pause and a packet-sized read; there is no event to wait on, the
//! pause substitutes for a real acknowledgment and assumes the follower is
//! done by the time it elapses.

use std::time::Duration;

use protocol::{Packet, JOINT_COUNT, PACKET_SIZE};
use tokio::time::sleep;
use tracing::{error, info, warn};

/// The reference gait frame sent by the stock run loop.
pub const GAIT_FRAME: [i32; JOINT_COUNT] = [90, 45, 120, 90, 45, 120, 90, 45, 120, 90, 45, 120];

/// Bus transport seam: fixed-address write plus a byte-count-scoped read
/// request, as exposed by the underlying two-wire peripheral.
pub trait Bus {
    type Error: std::error::Error;

    /// Transmit `bytes` to the follower in one transfer.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Request up to `buf.len()` bytes from the follower; returns how many
    /// arrived. A short read is not an error at this layer.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Cooperative delays between bus operations.
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    /// Pause between a write and the matching confirmation read.
    pub settle: Duration,
    /// Pause between handshake attempts.
    pub retry: Duration,
    /// Pause between steady-state command cycles.
    pub cycle: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(100),
            retry: Duration::from_secs(1),
            cycle: Duration::from_secs(2),
        }
    }
}

pub struct Coordinator<B> {
    bus: B,
    timing: Timing,
    /// Constant all-zero probe, reused for every handshake attempt.
    probe: Packet,
    /// Command frame, rewritten with fresh intent every cycle.
    command: Packet,
}

impl<B: Bus> Coordinator<B> {
    pub fn new(bus: B) -> Self {
        Self::with_timing(bus, Timing::default())
    }

    pub fn with_timing(bus: B, timing: Timing) -> Self {
        Self {
            bus,
            timing,
            probe: Packet::probe(),
            command: Packet::probe(),
        }
    }

    /// Block until the follower confirms a probe.
    ///
    /// Retries forever; there is deliberately no attempt limit, since the
    /// robot must not move until the link is up. Gates entry into the
    /// command loop.
    pub async fn establish_link(&mut self) {
        info!("sending probe to follower");
        loop {
            if self.probe_once().await {
                info!("probe confirmed, follower is ready");
                return;
            }
            warn!("follower did not confirm probe, retrying");
            sleep(self.timing.retry).await;
        }
    }

    async fn probe_once(&mut self) -> bool {
        let mut reply = self.probe;
        self.transmit(&reply);
        sleep(self.timing.settle).await;
        self.read_back(&mut reply);
        // only the confirmation readback is kept; the probe itself stays
        // all-zero for the next attempt, whatever the reply carried
        self.probe.confirmation = reply.confirmation;
        self.probe.confirmed()
    }

    /// One steady-state cycle: send `angles`, settle, read the follower's
    /// packet back. Returns whether the follower confirmed.
    ///
    /// Unconfirmed cycles are not retried; the next frame supersedes them.
    /// Only the handshake retries, and that asymmetry is intentional.
    pub async fn send_frame(&mut self, angles: [i32; JOINT_COUNT]) -> bool {
        self.command.angles = angles;
        let mut command = self.command;
        self.transmit(&command);
        sleep(self.timing.settle).await;
        self.read_back(&mut command);
        self.command = command;
        if self.command.confirmed() {
            info!("frame confirmed, all servos moved");
            true
        } else {
            error!("follower did not confirm frame");
            false
        }
    }

    /// Handshake once, then send `angles` at the cycle interval forever.
    pub async fn run(&mut self, angles: [i32; JOINT_COUNT]) -> ! {
        self.establish_link().await;
        loop {
            self.send_frame(angles).await;
            sleep(self.timing.cycle).await;
        }
    }

    fn transmit(&mut self, packet: &Packet) {
        let bytes = match packet.encode() {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("could not encode packet: {e}");
                return;
            }
        };
        if let Err(e) = self.bus.write(&bytes) {
            error!("transmission failed: {e}");
        }
    }

    /// Read one packet's worth of bytes into `packet`. A short or failed
    /// read copies nothing, so the previous confirmation word stays in
    /// place; callers judge readiness from whatever value survives.
    fn read_back(&mut self, packet: &mut Packet) {
        let mut buf = [0u8; PACKET_SIZE];
        match self.bus.read(&mut buf) {
            Ok(n) if n == PACKET_SIZE => match Packet::decode(&buf) {
                Ok(reply) => *packet = reply,
                Err(e) => error!("could not decode response: {e}"),
            },
            Ok(n) => error!("read returned {n} of {PACKET_SIZE} bytes"),
            Err(e) => error!("read failed: {e}"),
        }
    }
}
