use std::collections::HashMap;
use std::collections::hash_map::Entry;

use bevy::prelude::*;

use crate::error::PlacementError;
use crate::placement::coordinator::PlacedElement;
use crate::session::anchors::{PlaneAnchorEvent, PlaneAnchorId, PlaneCenter, PlaneExtent};
use crate::session::messages::{MessageSchedule, MessageType};
use crate::session::plane_visuals::GroundMaterialEnabled;

/// Material applied to a plane's ground quad.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlaneMaterialKind {
    /// Standard detected-surface material.
    #[default]
    Default,
    /// Plane stays tracked but is not drawn.
    Transparent,
    /// Named floor texture set assigned by the user.
    Custom(String),
}

/// One tracked real-world surface. Owned exclusively by [`PlaneRegistry`];
/// updates replace the whole record so readers never see a half-written one.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneRecord {
    pub id: PlaneAnchorId,
    /// Anchor position in world space.
    pub origin: Vec3,
    pub extent: PlaneExtent,
    pub center: PlaneCenter,
    pub visible: bool,
    pub material_kind: PlaneMaterialKind,
}

impl PlaneRecord {
    /// World-space center of the fitted surface.
    pub fn surface_center(&self) -> Vec3 {
        Vec3::new(
            self.origin.x + self.center.x,
            self.origin.y,
            self.origin.z + self.center.z,
        )
    }

    /// Whether a world point lies within the plane's horizontal footprint.
    pub fn contains_horizontally(&self, point: Vec3) -> bool {
        let c = self.surface_center();
        (point.x - c.x).abs() <= self.extent.width * 0.5
            && (point.z - c.z).abs() <= self.extent.depth * 0.5
    }
}

/// Mapping from tracking-subsystem anchor handles to plane records.
///
/// At most one record exists per handle. Mutation happens only in session
/// systems holding `ResMut` access, so the ECS scheduler enforces the
/// single-writer rule; render-side systems take shared references.
#[derive(Resource, Default)]
pub struct PlaneRegistry {
    planes: HashMap<PlaneAnchorId, PlaneRecord>,
}

impl PlaneRegistry {
    /// Insert a record for an unknown handle, or replace extent, center and
    /// origin of the existing one. Last write wins; visibility and material
    /// survive updates since the tracker knows nothing about either.
    pub fn upsert(
        &mut self,
        id: PlaneAnchorId,
        origin: Vec3,
        extent: PlaneExtent,
        center: PlaneCenter,
    ) {
        match self.planes.entry(id) {
            Entry::Occupied(mut occupied) => {
                let prev = occupied.get();
                let record = PlaneRecord {
                    id,
                    origin,
                    extent,
                    center,
                    visible: prev.visible,
                    material_kind: prev.material_kind.clone(),
                };
                occupied.insert(record);
            }
            Entry::Vacant(vacant) => {
                vacant.insert(PlaneRecord {
                    id,
                    origin,
                    extent,
                    center,
                    visible: true,
                    material_kind: PlaneMaterialKind::default(),
                });
            }
        }
    }

    /// Remove and return the record for a handle. Unknown handles are not
    /// an error: removal notifications can outlive the record they name.
    pub fn remove(&mut self, id: PlaneAnchorId) -> Option<PlaneRecord> {
        self.planes.remove(&id)
    }

    /// Assign a material to a tracked plane.
    pub fn set_material(
        &mut self,
        id: PlaneAnchorId,
        kind: PlaneMaterialKind,
    ) -> Result<(), PlacementError> {
        match self.planes.get_mut(&id) {
            Some(record) => {
                record.material_kind = kind;
                Ok(())
            }
            None => Err(PlacementError::PlaneNotFound(id)),
        }
    }

    pub fn get(&self, id: PlaneAnchorId) -> Option<&PlaneRecord> {
        self.planes.get(&id)
    }

    pub fn contains(&self, id: PlaneAnchorId) -> bool {
        self.planes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// All live records, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &PlaneRecord> {
        self.planes.values()
    }

    /// Restartable iterator over visible records. Used by the global
    /// ground-material toggle.
    pub fn visible_planes(&self) -> impl Iterator<Item = &PlaneRecord> {
        self.planes.values().filter(|record| record.visible)
    }

    /// Drop every record. Session reset only.
    pub fn clear(&mut self) {
        self.planes.clear();
    }
}

/// Drain anchor notifications into the registry. This is the single funnel
/// through which tracker-driven mutation reaches plane state, mirroring the
/// serial queue the session callbacks used to dispatch onto.
pub fn apply_anchor_events(
    mut events: EventReader<PlaneAnchorEvent>,
    mut registry: ResMut<PlaneRegistry>,
    ground_material: Res<GroundMaterialEnabled>,
    mut placed: Query<&mut PlacedElement>,
    mut messages: ResMut<MessageSchedule>,
) {
    for event in events.read() {
        match *event {
            PlaneAnchorEvent::Added {
                id,
                origin,
                extent,
                center,
            } => {
                let known = registry.contains(id);
                registry.upsert(id, origin, extent, center);
                // A plane detected while surfaces are hidden starts hidden
                // too; re-announced anchors keep whatever they already wear.
                if !known && !ground_material.0 {
                    if let Err(err) = registry.set_material(id, PlaneMaterialKind::Transparent) {
                        warn!("Initial plane material skipped: {err}");
                    }
                }
                messages.cancel(MessageType::PlaneEstimation);
                messages.show("SURFACE DETECTED");
                if placed.is_empty() {
                    messages.schedule(
                        "TAP + TO PLACE AN OBJECT",
                        crate::constants::CONTENT_PLACEMENT_PROMPT_DELAY,
                        MessageType::ContentPlacement,
                    );
                }
            }
            PlaneAnchorEvent::Updated {
                id,
                origin,
                extent,
                center,
            } => {
                registry.upsert(id, origin, extent, center);
            }
            PlaneAnchorEvent::Removed { id } => {
                if registry.remove(id).is_none() {
                    continue;
                }
                // A supporting plane vanished under its elements; drop the
                // back-reference but leave each element where it stands. The
                // next interaction re-anchors it via a fresh hit test.
                for mut element in &mut placed {
                    if element.supporting_plane() == Some(id) {
                        element.clear_supporting_plane();
                        info!("Cleared supporting plane {:?} from placed element", id);
                    }
                }
            }
        }
    }
}
