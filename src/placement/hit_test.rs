use bevy::prelude::*;

use crate::error::PlacementError;
use crate::placement::ray::{ray_hits_plane_rect, ray_horizontal_plane_t};
use crate::session::anchors::PlaneAnchorId;
use crate::session::focus_square::FocusSquare;
use crate::session::plane_registry::PlaneRegistry;

/// Interpreted outcome of a screen-to-world hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTestResult {
    pub world_position: Vec3,
    /// Plane the hit landed on, when it landed on a tracked one.
    pub plane_id: Option<PlaneAnchorId>,
    /// True for hits against a tracked plane's finite extent, false for
    /// synthesized infinite-plane positions.
    pub hits_existing_plane: bool,
}

/// Hit-test policy knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitTestOptions {
    /// Allow falling back to an infinite horizontal plane when no tracked
    /// plane is under the ray. Used while dragging so elements do not stall
    /// at plane edges.
    pub drag_on_infinite_planes: bool,
    /// Height of the fallback plane, normally the focus square's last known
    /// height. Without it the fallback is unavailable.
    pub infinite_plane_height: Option<f32>,
}

/// Interpret a world-space ray against the tracked planes.
///
/// Candidate hits against known plane records are ranked by ray distance
/// and the closest wins. Only when no tracked plane is under the ray does
/// the infinite-plane fallback apply; with the fallback disabled (or no
/// known height) there is nowhere to place and the caller surfaces a
/// "cannot place" notification.
pub fn world_position_from_ray(
    origin: Vec3,
    direction: Vec3,
    registry: &PlaneRegistry,
    options: &HitTestOptions,
) -> Option<HitTestResult> {
    let mut best: Option<(PlaneAnchorId, f32)> = None;
    for record in registry.iter() {
        if let Some(t) = ray_hits_plane_rect(origin, direction, record) {
            if best.is_none_or(|(_, best_t)| t < best_t) {
                best = Some((record.id, t));
            }
        }
    }

    if let Some((plane_id, t)) = best {
        return Some(HitTestResult {
            world_position: origin + direction * t,
            plane_id: Some(plane_id),
            hits_existing_plane: true,
        });
    }

    if options.drag_on_infinite_planes {
        let height = options.infinite_plane_height?;
        let t = ray_horizontal_plane_t(origin, direction, height)?;
        return Some(HitTestResult {
            world_position: origin + direction * t,
            plane_id: None,
            hits_existing_plane: false,
        });
    }

    None
}

/// Screen-point entry to the hit test: builds the camera ray, then defers
/// to [`world_position_from_ray`]. A camera that cannot produce a ray has
/// no usable pose this frame ([`PlacementError::PoseUnavailable`]); a ray
/// that lands nowhere is [`PlacementError::PlacementUnavailable`].
pub fn world_position_from_screen(
    screen_point: Vec2,
    camera: &Camera,
    camera_transform: &GlobalTransform,
    registry: &PlaneRegistry,
    focus: &FocusSquare,
    drag_on_infinite_planes: bool,
) -> Result<HitTestResult, PlacementError> {
    let ray = camera
        .viewport_to_world(camera_transform, screen_point)
        .map_err(|_| PlacementError::PoseUnavailable)?;
    let options = HitTestOptions {
        drag_on_infinite_planes,
        infinite_plane_height: focus.last_position.map(|p| p.y),
    };
    world_position_from_ray(ray.origin, ray.direction.as_vec3(), registry, &options)
        .ok_or(PlacementError::PlacementUnavailable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::anchors::{PlaneCenter, PlaneExtent};

    fn registry_with_planes(planes: &[(u64, Vec3, f32)]) -> PlaneRegistry {
        let mut registry = PlaneRegistry::default();
        for &(id, origin, side) in planes {
            registry.upsert(
                PlaneAnchorId(id),
                origin,
                PlaneExtent::new(side, side),
                PlaneCenter::default(),
            );
        }
        registry
    }

    #[test]
    fn closest_known_plane_wins() {
        // Two stacked planes under the ray; the upper one is nearer.
        let registry = registry_with_planes(&[
            (1, Vec3::new(0.0, 0.0, 0.0), 2.0),
            (2, Vec3::new(0.0, 0.6, 0.0), 2.0),
        ]);
        let hit = world_position_from_ray(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::NEG_Y,
            &registry,
            &HitTestOptions::default(),
        )
        .unwrap();
        assert_eq!(hit.plane_id, Some(PlaneAnchorId(2)));
        assert!(hit.hits_existing_plane);
        assert!((hit.world_position.y - 0.6).abs() < 1e-5);
    }

    #[test]
    fn known_plane_preferred_over_infinite_fallback() {
        let registry = registry_with_planes(&[(1, Vec3::ZERO, 2.0)]);
        let options = HitTestOptions {
            drag_on_infinite_planes: true,
            infinite_plane_height: Some(-1.0),
        };
        let hit =
            world_position_from_ray(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y, &registry, &options)
                .unwrap();
        assert!(hit.hits_existing_plane);
        assert_eq!(hit.plane_id, Some(PlaneAnchorId(1)));
    }

    #[test]
    fn fallback_used_when_ray_misses_all_planes() {
        let registry = registry_with_planes(&[(1, Vec3::new(10.0, 0.0, 10.0), 1.0)]);
        let options = HitTestOptions {
            drag_on_infinite_planes: true,
            infinite_plane_height: Some(0.0),
        };
        let hit =
            world_position_from_ray(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y, &registry, &options)
                .unwrap();
        assert!(!hit.hits_existing_plane);
        assert_eq!(hit.plane_id, None);
        assert!(hit.world_position.abs_diff_eq(Vec3::ZERO, 1e-5));
    }

    #[test]
    fn no_fallback_means_no_placement() {
        let registry = PlaneRegistry::default();
        assert!(
            world_position_from_ray(
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::NEG_Y,
                &registry,
                &HitTestOptions::default(),
            )
            .is_none()
        );
    }

    #[test]
    fn fallback_without_known_height_reports_none() {
        let registry = PlaneRegistry::default();
        let options = HitTestOptions {
            drag_on_infinite_planes: true,
            infinite_plane_height: None,
        };
        assert!(
            world_position_from_ray(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y, &registry, &options)
                .is_none()
        );
    }
}
