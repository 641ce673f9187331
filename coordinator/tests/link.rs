//! Drives both roles against each other through an in-memory bus.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;
use std::time::Duration;

use controller::rig::{Delay, LimitSwitches, Servos};
use controller::Controller;
use coordinator::{Bus, Coordinator, GAIT_FRAME};
use protocol::{Packet, JOINT_COUNT};

#[derive(Clone, Default)]
struct RecordingServos(Rc<RefCell<Vec<(usize, i32)>>>);

impl Servos for RecordingServos {
    fn set_target(&mut self, joint: usize, degrees: i32) {
        self.0.borrow_mut().push((joint, degrees));
    }
}

/// Every joint seats after one seek command.
struct EagerSwitches(RefCell<[bool; JOINT_COUNT]>);

impl LimitSwitches for EagerSwitches {
    fn is_triggered(&self, joint: usize) -> bool {
        let mut polled = self.0.borrow_mut();
        let seated = polled[joint];
        polled[joint] = true;
        seated
    }
}

struct NoDelay;

impl Delay for NoDelay {
    fn sleep(&mut self, _period: Duration) {}
}

type Follower = Controller<RecordingServos, EagerSwitches, NoDelay>;

/// Transport stand-in: a write becomes the follower's inbound callback, a
/// read becomes its outbound callback, never both at once.
struct LoopbackBus {
    follower: Follower,
}

impl Bus for LoopbackBus {
    type Error = Infallible;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.follower.on_receive(bytes);
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        match self.follower.on_request() {
            Ok(bytes) => {
                buf[..bytes.len()].copy_from_slice(&bytes);
                Ok(bytes.len())
            }
            Err(_) => Ok(0),
        }
    }
}

fn follower() -> (Follower, Rc<RefCell<Vec<(usize, i32)>>>) {
    let servos = RecordingServos::default();
    let log = servos.0.clone();
    let follower = Controller::new(
        servos,
        EagerSwitches(RefCell::new([false; JOINT_COUNT])),
        NoDelay,
    );
    (follower, log)
}

#[test]
fn probe_before_zeroing_is_ignored() {
    let (mut follower, log) = follower();

    follower.on_receive(&Packet::probe().encode().unwrap());

    assert!(log.borrow().is_empty());
    let echoed = Packet::decode(&follower.on_request().unwrap()).unwrap();
    assert!(!echoed.confirmed());
}

#[tokio::test(start_paused = true)]
async fn full_session_probe_then_gait_frame() {
    let (mut follower, log) = follower();

    follower.calibrate();
    // one seek plus the neutral park per joint, in global joint order
    let zeroing: Vec<(usize, i32)> = (0..JOINT_COUNT).flat_map(|j| [(j, 0), (j, 90)]).collect();
    assert_eq!(*log.borrow(), zeroing);
    log.borrow_mut().clear();

    let mut coordinator = Coordinator::new(LoopbackBus { follower });

    // probe confirms on the first attempt and moves nothing
    coordinator.establish_link().await;
    assert!(log.borrow().is_empty());

    // the gait frame lands on all twelve servos and is confirmed
    assert!(coordinator.send_frame(GAIT_FRAME).await);
    let moves: Vec<(usize, i32)> = (0..JOINT_COUNT).map(|j| (j, GAIT_FRAME[j])).collect();
    assert_eq!(*log.borrow(), moves);
}
