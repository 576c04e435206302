use std::collections::VecDeque;

use bevy::prelude::*;

use crate::catalog::ElementDefinition;
use crate::constants::{DISTANCE_SAMPLE_WINDOW, PLANE_SNAP_VERTICAL_TOLERANCE};
use crate::session::anchors::PlaneAnchorId;
use crate::session::plane_registry::PlaneRecord;

/// A virtual element standing in the tracked scene.
///
/// The supporting plane is a lookup-only back-reference; the element never
/// owns the plane record, and the reference is cleared the moment the
/// registry drops the record.
#[derive(Component, Debug, Clone)]
pub struct PlacedElement {
    definition: ElementDefinition,
    supporting_plane: Option<PlaneAnchorId>,
    // Most-recent-N camera distances, oldest first.
    recent_distances: VecDeque<f32>,
}

impl PlacedElement {
    pub fn new(definition: ElementDefinition) -> Self {
        Self {
            definition,
            supporting_plane: None,
            recent_distances: VecDeque::with_capacity(DISTANCE_SAMPLE_WINDOW),
        }
    }

    pub fn definition(&self) -> &ElementDefinition {
        &self.definition
    }

    pub fn supporting_plane(&self) -> Option<PlaneAnchorId> {
        self.supporting_plane
    }

    pub fn clear_supporting_plane(&mut self) {
        self.supporting_plane = None;
    }

    /// Record a fresh element-to-camera distance, dropping the oldest
    /// sample once the window is full.
    fn push_distance(&mut self, distance: f32) {
        if self.recent_distances.len() == DISTANCE_SAMPLE_WINDOW {
            self.recent_distances.pop_front();
        }
        self.recent_distances.push_back(distance);
    }

    /// Uniform scale derived from the moving average of recent distances.
    /// Plane extents update every frame, so scaling off the instantaneous
    /// distance makes the element visibly jitter; the average damps it.
    pub fn smoothed_scale(&self) -> f32 {
        if self.recent_distances.is_empty() {
            return 1.0;
        }
        let sum: f32 = self.recent_distances.iter().sum();
        sum / self.recent_distances.len() as f32
    }

    pub fn distance_sample_count(&self) -> usize {
        self.recent_distances.len()
    }
}

/// Place an element at a freshly hit world position, re-anchoring it on the
/// supporting plane (if any) and rescaling from the damped distance average.
pub fn place(
    element: &mut PlacedElement,
    transform: &mut Transform,
    world_position: Vec3,
    supporting_plane: Option<PlaneAnchorId>,
    camera_position: Vec3,
) {
    transform.translation = world_position;
    element.supporting_plane = supporting_plane;
    element.push_distance(camera_position.distance(world_position));
    transform.scale = Vec3::splat(element.smoothed_scale());
}

/// Drag path: same transform update as [`place`] but visual state carried
/// by the element (particles, highlights) is left alone. Callers follow up
/// with [`particle_rescale`] for particle-carrying models.
pub fn move_to(
    element: &mut PlacedElement,
    transform: &mut Transform,
    world_position: Vec3,
    supporting_plane: Option<PlaneAnchorId>,
    camera_position: Vec3,
) {
    place(element, transform, world_position, supporting_plane, camera_position);
}

/// Detach an element prior to despawn.
pub fn remove(element: &mut PlacedElement) {
    element.supporting_plane = None;
}

/// Effective particle sizes for each named sub-node: the per-node factor
/// from the definition, proportionally scaled by the element's current
/// uniform scale.
pub fn particle_rescale(element: &PlacedElement, transform: &Transform) -> Vec<(String, f32)> {
    element
        .definition
        .particle_scale_info
        .iter()
        .map(|(node, factor)| (node.clone(), transform.scale.x * factor))
        .collect()
}

/// Re-anchor an element onto a freshly added or updated plane when the
/// element stands within the plane's footprint at roughly its height.
/// Returns true when the element snapped.
pub fn snap_to_plane(
    element: &mut PlacedElement,
    transform: &mut Transform,
    record: &PlaneRecord,
) -> bool {
    if !record.contains_horizontally(transform.translation) {
        return false;
    }
    if (transform.translation.y - record.origin.y).abs() > PLANE_SNAP_VERTICAL_TOLERANCE {
        return false;
    }
    transform.translation.y = record.origin.y;
    element.supporting_plane = Some(record.id);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ElementKind;
    use crate::session::anchors::{PlaneCenter, PlaneExtent};
    use crate::session::plane_registry::{PlaneMaterialKind, PlaneRegistry};

    fn definition() -> ElementDefinition {
        ElementDefinition {
            model_name: "candle".into(),
            display_name: "Candle".into(),
            particle_scale_info: [("flame".to_string(), 0.018)].into(),
            element_type: ElementKind::Object,
        }
    }

    #[test]
    fn scale_is_running_average_of_recent_distances() {
        let mut element = PlacedElement::new(definition());
        let mut transform = Transform::default();
        let camera = Vec3::ZERO;

        let distances: Vec<f32> = (1..=10).map(|d| d as f32).collect();
        for &d in &distances {
            place(&mut element, &mut transform, Vec3::new(0.0, 0.0, -d), None, camera);
        }

        let expected = distances.iter().sum::<f32>() / distances.len() as f32;
        assert!((transform.scale.x - expected).abs() < 1e-5);
        assert_eq!(element.distance_sample_count(), 10);
    }

    #[test]
    fn scale_is_never_instantaneous_with_multiple_samples() {
        let mut element = PlacedElement::new(definition());
        let mut transform = Transform::default();

        place(&mut element, &mut transform, Vec3::new(0.0, 0.0, -1.0), None, Vec3::ZERO);
        place(&mut element, &mut transform, Vec3::new(0.0, 0.0, -3.0), None, Vec3::ZERO);

        // Average of 1 and 3, not the instantaneous 3.
        assert!((transform.scale.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn distance_window_is_bounded_at_ten() {
        let mut element = PlacedElement::new(definition());
        let mut transform = Transform::default();
        for d in 1..=25 {
            place(
                &mut element,
                &mut transform,
                Vec3::new(0.0, 0.0, -(d as f32)),
                None,
                Vec3::ZERO,
            );
        }
        assert_eq!(element.distance_sample_count(), DISTANCE_SAMPLE_WINDOW);
        // Last ten samples are 16..=25.
        let expected = (16..=25).sum::<i32>() as f32 / 10.0;
        assert!((element.smoothed_scale() - expected).abs() < 1e-5);
    }

    #[test]
    fn removing_supporting_plane_keeps_position() {
        let mut registry = PlaneRegistry::default();
        registry.upsert(
            PlaneAnchorId(5),
            Vec3::ZERO,
            PlaneExtent::new(2.0, 2.0),
            PlaneCenter::default(),
        );

        let mut element = PlacedElement::new(definition());
        let mut transform = Transform::default();
        place(
            &mut element,
            &mut transform,
            Vec3::new(0.3, 0.0, 0.3),
            Some(PlaneAnchorId(5)),
            Vec3::new(0.0, 1.5, 0.0),
        );

        registry.remove(PlaneAnchorId(5));
        element.clear_supporting_plane();

        assert_eq!(element.supporting_plane(), None);
        assert!(transform.translation.abs_diff_eq(Vec3::new(0.3, 0.0, 0.3), 1e-6));
    }

    #[test]
    fn snap_requires_footprint_and_height() {
        let record = PlaneRecord {
            id: PlaneAnchorId(9),
            origin: Vec3::new(0.0, 0.02, 0.0),
            extent: PlaneExtent::new(1.0, 1.0),
            center: PlaneCenter::default(),
            visible: true,
            material_kind: PlaneMaterialKind::Default,
        };

        let mut element = PlacedElement::new(definition());
        let mut on_plane = Transform::from_translation(Vec3::new(0.2, 0.0, 0.2));
        assert!(snap_to_plane(&mut element, &mut on_plane, &record));
        assert_eq!(element.supporting_plane(), Some(PlaneAnchorId(9)));
        assert!((on_plane.translation.y - 0.02).abs() < 1e-6);

        let mut far_above = Transform::from_translation(Vec3::new(0.2, 1.0, 0.2));
        let mut other = PlacedElement::new(definition());
        assert!(!snap_to_plane(&mut other, &mut far_above, &record));
        assert_eq!(other.supporting_plane(), None);
    }

    #[test]
    fn particle_rescale_multiplies_by_uniform_scale() {
        let mut element = PlacedElement::new(definition());
        let mut transform = Transform::default();
        place(&mut element, &mut transform, Vec3::new(0.0, 0.0, -2.0), None, Vec3::ZERO);

        let scales = particle_rescale(&element, &transform);
        assert_eq!(scales.len(), 1);
        let (node, size) = &scales[0];
        assert_eq!(node, "flame");
        assert!((size - 2.0 * 0.018).abs() < 1e-6);
    }
}
