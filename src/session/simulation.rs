//! Synthetic anchor feed.
//!
//! Desktop builds have no AR tracking stack, so a deterministic script
//! stands in for it: tracking comes up, two horizontal planes are detected,
//! their extents grow and centers drift as refinement would report, and one
//! plane is eventually dropped. The script drives the exact event interface
//! a real tracker would, so everything downstream is exercised unchanged.

use bevy::prelude::*;

use crate::constants::TRACKING_ESCALATION_DELAY;
use crate::session::anchors::{PlaneAnchorEvent, PlaneAnchorId, PlaneCenter, PlaneExtent};
use crate::session::messages::{MessageSchedule, MessageType};
use crate::session::tracking::TrackingState;

const TABLE_PLANE: PlaneAnchorId = PlaneAnchorId(1);
const FLOOR_PLANE: PlaneAnchorId = PlaneAnchorId(2);

#[derive(Debug, Clone, Copy)]
enum FeedStep {
    Tracking(TrackingState),
    Anchor(PlaneAnchorEvent),
}

fn script() -> Vec<(f32, FeedStep)> {
    let table = Vec3::new(0.0, -0.4, -1.2);
    let floor = Vec3::new(0.4, -1.1, -1.6);
    vec![
        (0.5, FeedStep::Tracking(TrackingState::Limited)),
        (1.5, FeedStep::Tracking(TrackingState::Normal)),
        (2.0, FeedStep::Anchor(PlaneAnchorEvent::Added {
            id: TABLE_PLANE,
            origin: table,
            extent: PlaneExtent::new(0.4, 0.3),
            center: PlaneCenter::new(0.0, 0.0),
        })),
        (3.0, FeedStep::Anchor(PlaneAnchorEvent::Updated {
            id: TABLE_PLANE,
            origin: table,
            extent: PlaneExtent::new(0.7, 0.5),
            center: PlaneCenter::new(0.05, 0.0),
        })),
        (4.0, FeedStep::Anchor(PlaneAnchorEvent::Added {
            id: FLOOR_PLANE,
            origin: floor,
            extent: PlaneExtent::new(0.8, 0.8),
            center: PlaneCenter::new(0.0, 0.0),
        })),
        (5.0, FeedStep::Anchor(PlaneAnchorEvent::Updated {
            id: TABLE_PLANE,
            origin: table,
            extent: PlaneExtent::new(1.0, 0.7),
            center: PlaneCenter::new(0.1, -0.05),
        })),
        (7.0, FeedStep::Anchor(PlaneAnchorEvent::Updated {
            id: FLOOR_PLANE,
            origin: floor,
            extent: PlaneExtent::new(2.2, 2.0),
            center: PlaneCenter::new(-0.1, 0.1),
        })),
        (20.0, FeedStep::Anchor(PlaneAnchorEvent::Removed { id: TABLE_PLANE })),
    ]
}

/// Timed feed of tracking and anchor notifications.
#[derive(Resource)]
pub struct AnchorFeed {
    elapsed: f32,
    next: usize,
    steps: Vec<(f32, FeedStep)>,
}

impl Default for AnchorFeed {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            next: 0,
            steps: script(),
        }
    }
}

impl AnchorFeed {
    /// Rewind the script, used by session reset.
    pub fn restart(&mut self) {
        self.elapsed = 0.0;
        self.next = 0;
    }
}

pub fn drive_anchor_feed(
    time: Res<Time>,
    mut feed: ResMut<AnchorFeed>,
    mut tracking: ResMut<TrackingState>,
    mut messages: ResMut<MessageSchedule>,
    mut events: EventWriter<PlaneAnchorEvent>,
) {
    feed.elapsed += time.delta_secs();
    while feed.next < feed.steps.len() && feed.steps[feed.next].0 <= feed.elapsed {
        let (_, step) = feed.steps[feed.next];
        feed.next += 1;
        match step {
            FeedStep::Tracking(state) => {
                info!("Tracking state: {:?}", state);
                *tracking = state;
                // Brief pose degradation is normal; only a lasting one is
                // worth interrupting the user over.
                if state == TrackingState::Limited {
                    messages.schedule(
                        "LIMITED TRACKING\nPoint the camera at a textured surface.",
                        TRACKING_ESCALATION_DELAY,
                        MessageType::TrackingStateEscalation,
                    );
                } else {
                    messages.cancel(MessageType::TrackingStateEscalation);
                }
            }
            FeedStep::Anchor(event) => {
                events.write(event);
            }
        }
    }
}
