//! AR session side: anchor bookkeeping and scene feedback.
//!
//! The tracking subsystem (here a synthetic feed; on device, the platform
//! tracker) reports horizontal surfaces through [`anchors::PlaneAnchorEvent`].
//! All anchor-driven mutation funnels through one system into the
//! [`plane_registry::PlaneRegistry`], which owns every plane record; render
//! and placement systems only ever read it.
//!
//! ```text
//! AnchorFeed (or platform tracker)
//!   └─> PlaneAnchorEvent (buffered, fire-and-forget)
//!       └─> apply_anchor_events()
//!           ├─> PlaneRegistry upsert/remove (single writer)
//!           └─> clears supporting-plane refs on removal
//!               └─> sync_plane_visuals() mirrors records into quads
//! ```
//!
//! Also hosts the focus square reticle, the free-fly stand-in camera, the
//! guidance message panel, and session reset.

/// Plane anchor handles, extents, and tracker notification events.
pub mod anchors;

/// Free-fly camera rig standing in for a tracked device pose.
pub mod camera;

/// Focus square reticle; feeds the infinite-plane drag fallback height.
pub mod focus_square;

/// Scheduled, cancellable user guidance messages.
pub mod messages;

/// Anchor-to-record registry and the event funnel that feeds it.
pub mod plane_registry;

/// Ground quads mirroring registry records, plus the material toggle.
pub mod plane_visuals;

/// Synthetic timed anchor feed for desktop runs.
pub mod simulation;

/// Tracking quality state and session reset.
pub mod tracking;

use bevy::prelude::*;

use crate::placement::interactions::snap_elements_to_planes;

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<plane_registry::PlaneRegistry>()
            .init_resource::<plane_visuals::GroundMaterialEnabled>()
            .init_resource::<focus_square::FocusSquare>()
            .init_resource::<messages::MessageSchedule>()
            .init_resource::<simulation::AnchorFeed>()
            .init_resource::<tracking::TrackingState>()
            .add_event::<anchors::PlaneAnchorEvent>()
            .add_event::<tracking::SessionResetEvent>()
            .add_systems(
                Startup,
                (
                    camera::spawn_camera,
                    focus_square::spawn_focus_square,
                    messages::spawn_message_panel,
                    tracking::schedule_initial_guidance,
                ),
            )
            .add_systems(
                Update,
                (
                    simulation::drive_anchor_feed,
                    plane_registry::apply_anchor_events,
                    snap_elements_to_planes,
                    plane_visuals::sync_plane_visuals,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    camera::camera_controller,
                    focus_square::update_focus_square,
                    plane_visuals::toggle_ground_material,
                    messages::update_message_panel,
                    tracking::emit_reset_on_key,
                    tracking::apply_session_reset,
                ),
            );
    }
}
