//! Element placement tool.
//!
//! Translates 2D interactions plus the camera pose into 3D placement
//! decisions against the tracked planes.
//!
//! ```text
//! tap / drag / selection event
//!   └─> hit_test: camera ray vs registry plane rects
//!       ├─> closest tracked-plane hit wins
//!       └─> else infinite-plane fallback at the focus square height
//!           └─> coordinator: transform update + damped distance-average
//!               rescale + supporting-plane back-reference
//! ```
//!
//! Every mutation path is gated on tracking quality: with no usable pose
//! the systems return without touching anything.

/// Placement and rescale decisions for placed elements.
pub mod coordinator;

/// Interpretation of ray casts against the plane registry.
pub mod hit_test;

/// Input systems: taps, drags, deletion, catalog selection.
pub mod interactions;

/// Ray intersection helpers for plane rectangles and element bounds.
pub mod ray;

/// Category / pending-floor selection state.
pub mod selection;

use bevy::prelude::*;

pub struct PlacementPlugin;

impl Plugin for PlacementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<selection::SelectionState>()
            .init_resource::<interactions::PlacementSettings>()
            .add_event::<interactions::CategorySelectedEvent>()
            .add_event::<interactions::ElementSelectedEvent>()
            .add_systems(
                Update,
                (
                    interactions::emit_selection_keys,
                    interactions::apply_category_selection,
                    interactions::apply_element_selection,
                    interactions::handle_tap,
                    interactions::handle_drag,
                    interactions::release_on_mouse_up,
                    interactions::handle_delete,
                    interactions::react_to_scale,
                )
                    .chain(),
            );
    }
}
