use bevy::prelude::*;

/// Stable handle assigned by the tracking subsystem to one physical surface.
/// Never reused for a different surface within a session, so it is safe as
/// a registry key and as a back-reference from placed elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaneAnchorId(pub u64);

/// Horizontal extent of a tracked plane in metres: width along local x,
/// depth along local z.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaneExtent {
    pub width: f32,
    pub depth: f32,
}

impl PlaneExtent {
    pub fn new(width: f32, depth: f32) -> Self {
        Self { width, depth }
    }
}

/// Offset of the plane surface within the anchor's local frame. The anchor
/// origin stays put as the user walks around; the fitted surface drifts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaneCenter {
    pub x: f32,
    pub z: f32,
}

impl PlaneCenter {
    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }
}

/// Anchor notifications from the tracking subsystem. Buffered as Bevy
/// events so tracker callbacks never touch registry state directly; the
/// session schedule drains them on its own terms.
#[derive(Event, Debug, Clone, Copy)]
pub enum PlaneAnchorEvent {
    Added {
        id: PlaneAnchorId,
        origin: Vec3,
        extent: PlaneExtent,
        center: PlaneCenter,
    },
    Updated {
        id: PlaneAnchorId,
        origin: Vec3,
        extent: PlaneExtent,
        center: PlaneCenter,
    },
    Removed {
        id: PlaneAnchorId,
    },
}
